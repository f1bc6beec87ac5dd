//! Distance-based removal of isolated samples

use rayon::prelude::*;
use tracing::debug;

use crate::sample::{SampleRow, SampleTable};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Keep samples that have another same-id sample strictly closer than `threshold`
///
/// Ids are processed in parallel. An id with a single row has no neighbour and is
/// dropped. Rows at identical coordinates are each other's neighbours. The result is
/// sorted by `(id, x, y, z)`.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::*;
///
/// let table = SampleTable::from_rows(vec![
///     SampleRow::new(2, 0, 0, 0),
///     SampleRow::new(2, 1, 1, 1),
///     SampleRow::new(2, 1, 2, 2),
/// ]);
///
/// let kept = keep_within_distance(&table, 1.5);
/// assert_eq!(kept.rows(), &[SampleRow::new(2, 1, 1, 1), SampleRow::new(2, 1, 2, 2)]);
/// ```
pub fn keep_within_distance(table: &SampleTable, threshold: f64) -> SampleTable {
    let groups: Vec<Vec<SampleRow>> = table.group_by_id().into_values().collect();

    let kept: Vec<SampleRow> = groups
        .par_iter()
        .flat_map_iter(|rows| connected_rows(rows, threshold))
        .collect();

    debug!(
        "Kept {} of {} rows within distance {}",
        kept.len(),
        table.len(),
        threshold
    );

    SampleTable::sorted(kept)
}

#[cfg(feature = "spatial-index")]
fn connected_rows(rows: &[SampleRow], threshold: f64) -> Vec<SampleRow> {
    if rows.len() < 2 {
        return Vec::new();
    }

    let positions: Vec<_> = rows.iter().map(|r| r.position().as_dvec3()).collect();
    let index = SpatialIndex::new(&positions);

    rows.iter()
        .enumerate()
        .filter(|&(i, _)| index.has_neighbour_within(i, threshold))
        .map(|(_, row)| *row)
        .collect()
}

#[cfg(not(feature = "spatial-index"))]
fn connected_rows(rows: &[SampleRow], threshold: f64) -> Vec<SampleRow> {
    let limit = threshold * threshold;

    rows.iter()
        .enumerate()
        .filter(|&(i, row)| {
            rows.iter().enumerate().any(|(j, other)| {
                j != i && row.position().as_dvec3().distance_squared(other.position().as_dvec3()) < limit
            })
        })
        .map(|(_, row)| *row)
        .collect()
}
