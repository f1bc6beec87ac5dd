//! Sample Rows and Tables
//!
//! A sample is one labeled voxel position `(id, x, y, z)`. Many samples share an id:
//! together they describe the voxels of one labeled region.

use std::collections::{BTreeMap, HashSet};

use glam::{DVec3, IVec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{CoordinateMode, SamplingConfig};
use crate::error::{Result, SeedError};
use crate::generation::increment_for;

/// A single labeled sample at an integer voxel position
///
/// Rows order by `(id, x, y, z)`, which is the canonical order of every table
/// returned by the region filters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleRow {
    /// Region label
    pub id: u64,
    /// Voxel x index
    pub x: i32,
    /// Voxel y index
    pub y: i32,
    /// Voxel z index
    pub z: i32,
}

impl SampleRow {
    /// Create a new sample row
    #[inline]
    pub fn new(id: u64, x: i32, y: i32, z: i32) -> Self {
        Self { id, x, y, z }
    }

    /// Create a sample row from an id and a voxel position
    #[inline]
    pub fn at(id: u64, position: IVec3) -> Self {
        Self::new(id, position.x, position.y, position.z)
    }

    /// Voxel position of this sample
    #[inline]
    pub fn position(&self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance to another sample's position
    pub fn distance_to(&self, other: &SampleRow) -> f64 {
        self.position()
            .as_dvec3()
            .distance(other.position().as_dvec3())
    }
}

/// An ordered collection of sample rows
///
/// Ids are not unique: every row of a region carries the region's id. Filters never
/// mutate a table in place; they return a new one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleTable {
    rows: Vec<SampleRow>,
}

impl SampleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows, preserving their order
    pub fn from_rows(rows: Vec<SampleRow>) -> Self {
        Self { rows }
    }

    /// Create a table from rows, sorted into canonical `(id, x, y, z)` order
    pub fn sorted(mut rows: Vec<SampleRow>) -> Self {
        rows.sort_unstable();
        Self { rows }
    }

    /// Append a row
    pub fn push(&mut self, row: SampleRow) {
        self.rows.push(row);
    }

    /// Get the number of rows
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get all rows as a slice
    #[inline]
    pub fn rows(&self) -> &[SampleRow] {
        &self.rows
    }

    /// Consume the table and return its rows
    pub fn into_rows(self) -> Vec<SampleRow> {
        self.rows
    }

    /// Iterate over rows
    pub fn iter(&self) -> std::slice::Iter<'_, SampleRow> {
        self.rows.iter()
    }

    /// Distinct ids in ascending order
    pub fn ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.rows.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Rows grouped by id, groups in ascending id order and rows in table order
    pub fn group_by_id(&self) -> BTreeMap<u64, Vec<SampleRow>> {
        let mut groups: BTreeMap<u64, Vec<SampleRow>> = BTreeMap::new();
        for row in &self.rows {
            groups.entry(row.id).or_default().push(*row);
        }
        groups
    }

    /// Per-axis minimum and maximum positions, or `None` for an empty table
    pub fn extent(&self) -> Option<(IVec3, IVec3)> {
        let first = self.rows.first()?.position();
        Some(self.rows.iter().fold((first, first), |(lo, hi), row| {
            let p = row.position();
            (lo.min(p), hi.max(p))
        }))
    }

    /// Keep only rows whose id is in `ids`
    ///
    /// # Example
    ///
    /// ```rust
    /// use rust_voronoi_seeds::{SampleRow, SampleTable};
    ///
    /// let table = SampleTable::from_rows(vec![
    ///     SampleRow::new(1, 0, 0, 0),
    ///     SampleRow::new(2, 1, 0, 0),
    ///     SampleRow::new(3, 2, 0, 0),
    /// ]);
    /// assert_eq!(table.include_ids(&[1, 3]).ids(), vec![1, 3]);
    /// ```
    pub fn include_ids(&self, ids: &[u64]) -> SampleTable {
        let selected: HashSet<u64> = ids.iter().copied().collect();
        self.retain_rows(|row| selected.contains(&row.id))
    }

    /// Drop rows whose id is in `ids`
    pub fn exclude_ids(&self, ids: &[u64]) -> SampleTable {
        let selected: HashSet<u64> = ids.iter().copied().collect();
        self.retain_rows(|row| !selected.contains(&row.id))
    }

    fn retain_rows(&self, keep: impl Fn(&SampleRow) -> bool) -> SampleTable {
        SampleTable::from_rows(self.rows.iter().filter(|r| keep(r)).copied().collect())
    }
}

impl FromIterator<SampleRow> for SampleTable {
    fn from_iter<I: IntoIterator<Item = SampleRow>>(iter: I) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

impl IntoIterator for SampleTable {
    type Item = SampleRow;
    type IntoIter = std::vec::IntoIter<SampleRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a SampleTable {
    type Item = &'a SampleRow;
    type IntoIter = std::slice::Iter<'a, SampleRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// A simulation seed: a region id at a converted (physical or lattice-step) position
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPosition {
    /// Region label
    pub id: u64,
    /// Converted position
    pub position: DVec3,
}

/// Convert voxel sample positions into seed positions
///
/// - [`CoordinateMode::Absolute`]: x and y are multiplied by `scale_xy`, z by `scale_z`.
/// - [`CoordinateMode::Step`]: each coordinate is divided by its lattice increment
///   `round(resolution / scale)` and truncated toward zero.
///
/// # Errors
///
/// Returns `DegenerateGeometry` in step mode when an increment rounds to zero.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::*;
/// use glam::DVec3;
///
/// let table = SampleTable::from_rows(vec![SampleRow::new(4, 6, 2, 8)]);
///
/// let absolute = scale_samples(&table, CoordinateMode::Absolute, 2.0, 0.5, 0.25).unwrap();
/// assert_eq!(absolute[0].position, DVec3::new(3.0, 1.0, 2.0));
///
/// let step = scale_samples(&table, CoordinateMode::Step, 2.0, 0.5, 0.25).unwrap();
/// assert_eq!(step[0].position, DVec3::new(1.0, 0.0, 1.0));
/// ```
pub fn scale_samples(
    table: &SampleTable,
    mode: CoordinateMode,
    resolution: f64,
    scale_xy: f64,
    scale_z: f64,
) -> Result<Vec<SeedPosition>> {
    let increments = match mode {
        CoordinateMode::Absolute => None,
        CoordinateMode::Step => {
            let increment_xy = increment_for(resolution, scale_xy);
            let increment_z = increment_for(resolution, scale_z);
            if increment_xy < 1.0 || increment_z < 1.0 {
                return Err(SeedError::DegenerateGeometry(format!(
                    "resolution {} gives zero lattice increment (xy {}, z {})",
                    resolution, increment_xy, increment_z
                )));
            }
            Some(DVec3::new(increment_xy, increment_xy, increment_z))
        }
    };
    let scale = DVec3::new(scale_xy, scale_xy, scale_z);

    Ok(table
        .iter()
        .map(|row| {
            let voxel = row.position().as_dvec3();
            let position = match increments {
                None => voxel * scale,
                Some(increments) => (voxel / increments).trunc(),
            };
            SeedPosition {
                id: row.id,
                position,
            }
        })
        .collect())
}

impl SamplingConfig {
    /// Convert sample positions into seeds using this configuration's coordinate mode
    pub fn scale(&self, table: &SampleTable) -> Result<Vec<SeedPosition>> {
        scale_samples(
            table,
            self.coordinate_mode,
            self.resolution,
            self.scale_xy,
            self.scale_z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn table() -> SampleTable {
        SampleTable::from_rows(vec![
            SampleRow::new(2, 3, 0, 0),
            SampleRow::new(1, 5, 1, 2),
            SampleRow::new(2, 0, 4, 1),
            SampleRow::new(3, 1, 1, 1),
        ])
    }

    #[test]
    fn test_row_ordering_is_id_then_xyz() {
        let sorted = SampleTable::sorted(table().into_rows());
        assert_eq!(
            sorted.rows(),
            &[
                SampleRow::new(1, 5, 1, 2),
                SampleRow::new(2, 0, 4, 1),
                SampleRow::new(2, 3, 0, 0),
                SampleRow::new(3, 1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_ids_and_groups() {
        let table = table();
        assert_eq!(table.ids(), vec![1, 2, 3]);

        let groups = table.group_by_id();
        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups[&2],
            vec![SampleRow::new(2, 3, 0, 0), SampleRow::new(2, 0, 4, 1)]
        );
    }

    #[test]
    fn test_extent() {
        let (lo, hi) = table().extent().unwrap();
        assert_eq!(lo, IVec3::new(0, 0, 0));
        assert_eq!(hi, IVec3::new(5, 4, 2));
        assert!(SampleTable::new().extent().is_none());
    }

    #[test]
    fn test_include_ids() {
        let included = table().include_ids(&[2, 7]);
        assert_eq!(
            included.rows(),
            &[SampleRow::new(2, 3, 0, 0), SampleRow::new(2, 0, 4, 1)]
        );
        assert!(table().include_ids(&[]).is_empty());
    }

    #[test]
    fn test_exclude_ids() {
        let excluded = table().exclude_ids(&[2]);
        assert_eq!(excluded.ids(), vec![1, 3]);
        assert_eq!(excluded.len(), 2);
        assert_eq!(table().exclude_ids(&[]), table());
    }

    #[test]
    fn test_distance_to() {
        let a = SampleRow::new(1, 0, 0, 0);
        let b = SampleRow::new(1, 1, 1, 1);
        assert_abs_diff_eq!(a.distance_to(&b), 3f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_scale_absolute() {
        let seeds = scale_samples(&table(), CoordinateMode::Absolute, 1.0, 0.5, 2.0).unwrap();
        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds[1].id, 1);
        assert_eq!(seeds[1].position, DVec3::new(2.5, 0.5, 4.0));
    }

    #[test]
    fn test_scale_step_truncates() {
        // increments: xy = round(3 / 1) = 3, z = round(3 / 1.5) = 2
        let seeds = scale_samples(&table(), CoordinateMode::Step, 3.0, 1.0, 1.5).unwrap();
        assert_eq!(seeds[1].position, DVec3::new(1.0, 0.0, 1.0));
        assert_eq!(seeds[2].position, DVec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_config_scale_uses_mode() {
        let config = crate::config::SamplingConfigBuilder::new()
            .resolution(3.0)
            .unwrap()
            .scale_z(1.5)
            .unwrap()
            .coordinate_mode(CoordinateMode::Step)
            .build()
            .unwrap();

        let seeds = config.scale(&table()).unwrap();
        assert_eq!(seeds[1].position, DVec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_scale_step_rejects_zero_increment() {
        let result = scale_samples(&table(), CoordinateMode::Step, 0.2, 1.0, 1.0);
        assert!(matches!(result, Err(SeedError::DegenerateGeometry(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_table_serialization() {
        let json = serde_json::to_string(&table()).unwrap();
        let restored: SampleTable = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, table());
    }
}
