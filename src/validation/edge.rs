//! Removal of regions touching the lateral domain edges

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::sample::{SampleRow, SampleTable};

/// Lateral axis checked for edge contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LateralAxis {
    /// x axis
    X,
    /// y axis
    Y,
}

impl LateralAxis {
    #[inline]
    fn value(self, row: &SampleRow) -> f64 {
        match self {
            LateralAxis::X => row.x as f64,
            LateralAxis::Y => row.y as f64,
        }
    }
}

/// Ids with more than `threshold` rows at the edges of one axis, ascending
///
/// A row is at an edge when its coordinate is within `padding` of the minimum or maximum
/// coordinate of the whole table on that axis.
pub fn find_edge_ids(table: &SampleTable, axis: LateralAxis, threshold: usize, padding: f64) -> Vec<u64> {
    let (Some(min), Some(max)) = (
        table.iter().map(|r| axis.value(r)).reduce(f64::min),
        table.iter().map(|r| axis.value(r)).reduce(f64::max),
    ) else {
        return Vec::new();
    };
    let lower = min + padding;
    let upper = max - padding;

    let mut counts: BTreeMap<u64, usize> = BTreeMap::new();
    for row in table {
        let value = axis.value(row);
        let at_edge = value <= lower || value >= upper;
        *counts.entry(row.id).or_default() += usize::from(at_edge);
    }

    counts
        .into_iter()
        .filter(|&(_, count)| count > threshold)
        .map(|(id, _)| id)
        .collect()
}

/// Drop every region touching the x or y edges of the table
///
/// Row order is preserved.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::*;
///
/// let table = SampleTable::from_rows(vec![
///     SampleRow::new(1, 0, 0, 1),
///     SampleRow::new(1, 4, 0, 1),
///     SampleRow::new(2, 2, 1, 1),
///     SampleRow::new(2, 2, 2, 1),
///     SampleRow::new(3, 1, 4, 1),
///     SampleRow::new(3, 3, 4, 1),
/// ]);
///
/// let interior = remove_edge_regions(&table, 1, 0.0);
/// assert_eq!(interior.ids(), vec![2]);
/// ```
pub fn remove_edge_regions(table: &SampleTable, threshold: usize, padding: f64) -> SampleTable {
    let edge_ids: HashSet<u64> = [LateralAxis::X, LateralAxis::Y]
        .into_iter()
        .flat_map(|axis| find_edge_ids(table, axis, threshold, padding))
        .collect();

    debug!("Removing {} edge region(s)", edge_ids.len());

    table
        .iter()
        .filter(|row| !edge_ids.contains(&row.id))
        .copied()
        .collect()
}
