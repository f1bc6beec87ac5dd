//! Cleanup of labeled point clouds
//!
//! Removes disconnected fragments of a region, isolated samples, and regions touching the
//! lateral edges of the sampled domain. Every filter returns a new table.

mod connectivity;
mod distance;
mod edge;

pub use connectivity::{find_connected_components, keep_largest_component, ConnectedComponent};
pub use distance::keep_within_distance;
pub use edge::{find_edge_ids, remove_edge_regions, LateralAxis};

use tracing::info;

use crate::config::{FilterKind, ValidationConfig};
use crate::sample::SampleTable;

/// Remove fragments disconnected from the rest of their region
///
/// `threshold` is only used by [`FilterKind::Distance`].
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::*;
///
/// let table = SampleTable::from_rows(vec![
///     SampleRow::new(1, 0, 0, 0),
///     SampleRow::new(1, 0, 1, 0),
///     SampleRow::new(1, 5, 5, 5),
/// ]);
///
/// let kind: FilterKind = "connectivity".parse().unwrap();
/// let cleaned = remove_unconnected_regions(&table, kind, 0.0);
/// assert_eq!(cleaned.len(), 2);
/// ```
pub fn remove_unconnected_regions(table: &SampleTable, kind: FilterKind, threshold: f64) -> SampleTable {
    match kind {
        FilterKind::Connectivity => keep_largest_component(table),
        FilterKind::Distance => keep_within_distance(table, threshold),
    }
}

/// Applies the configured cleanup stages to sample tables
///
/// Stages run in order: id inclusion, id exclusion, unconnected-region removal, edge
/// removal. Disabled stages are skipped.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::*;
///
/// let config = ValidationConfigBuilder::new()
///     .exclude_ids([3])
///     .unconnected_filter(FilterKind::Distance, 1.5).unwrap()
///     .build();
///
/// let table = SampleTable::from_rows(vec![
///     SampleRow::new(2, 0, 0, 0),
///     SampleRow::new(2, 1, 1, 1),
///     SampleRow::new(2, 1, 2, 2),
///     SampleRow::new(3, 1, 1, 1),
///     SampleRow::new(3, 1, 1, 2),
/// ]);
///
/// let cleaned = RegionValidator::new(config).validate(&table);
/// assert_eq!(cleaned.rows(), &[SampleRow::new(2, 1, 1, 1), SampleRow::new(2, 1, 2, 2)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegionValidator {
    config: ValidationConfig,
}

impl RegionValidator {
    /// Create a validator from a configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Get the validator configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Run every enabled stage on a table
    pub fn validate(&self, table: &SampleTable) -> SampleTable {
        let config = &self.config;
        let input_rows = table.len();

        let mut samples = match &config.include_ids {
            Some(ids) => table.include_ids(ids),
            None => table.clone(),
        };

        if !config.exclude_ids.is_empty() {
            samples = samples.exclude_ids(&config.exclude_ids);
        }

        if let Some(kind) = config.unconnected_filter {
            samples = remove_unconnected_regions(&samples, kind, config.unconnected_threshold);
        }

        if let Some(edge) = config.edge_filter {
            samples = remove_edge_regions(&samples, edge.threshold, edge.padding);
        }

        info!(
            "Validated samples: {} of {} rows kept across {} ids",
            samples.len(),
            input_rows,
            samples.ids().len()
        );

        samples
    }
}
