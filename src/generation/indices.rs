//! Physical sampling parameters to integer voxel indices

use glam::{IVec3, UVec3};
use tracing::{debug, info};

use super::GridSpec;
use crate::config::{GridKind, SamplingConfig};
use crate::error::{Result, SeedError};
use crate::sample::{SampleRow, SampleTable};
use crate::volume::{Label, LabelVolume};

/// Lattice step in voxels for a physical resolution and voxel scale
///
/// Rounds half to even, so `increment_for(2.5, 1.0) == 2.0`.
#[inline]
pub fn increment_for(resolution: f64, scale: f64) -> f64 {
    (resolution / scale).round_ties_even()
}

/// Integer voxel indices of a sampling lattice
///
/// Increments are `round(resolution / scale_xy)` and `round(resolution / scale_z)`. Each
/// lattice coordinate is rounded to the nearest voxel.
///
/// # Errors
///
/// Returns `DegenerateGeometry` if a bound is zero or an increment rounds to zero.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::*;
/// use glam::{IVec3, UVec3};
///
/// let indices = sample_indices(GridKind::Rect, UVec3::new(2, 6, 12), 2.0, 1.0, 0.5).unwrap();
/// assert_eq!(indices.len(), 9);
/// assert!(indices.contains(&IVec3::new(0, 4, 8)));
/// ```
pub fn sample_indices(
    kind: GridKind,
    bounds: UVec3,
    resolution: f64,
    scale_xy: f64,
    scale_z: f64,
) -> Result<Vec<IVec3>> {
    let increment_xy = increment_for(resolution, scale_xy);
    let increment_z = increment_for(resolution, scale_z);
    let spec = GridSpec::new(kind, bounds, increment_xy, increment_z)?;

    let indices: Vec<IVec3> = spec
        .generate()
        .into_iter()
        .map(|c| {
            IVec3::new(
                c.x.round_ties_even() as i32,
                c.y.round_ties_even() as i32,
                c.z.round_ties_even() as i32,
            )
        })
        .collect();

    debug!(
        "Sampling {} lattice with increments ({}, {}) gives {} indices",
        kind,
        increment_xy,
        increment_z,
        indices.len()
    );

    Ok(indices)
}

impl SamplingConfig {
    /// Integer voxel indices of this configuration's lattice within `bounds`
    pub fn sample_indices(&self, bounds: UVec3) -> Result<Vec<IVec3>> {
        sample_indices(self.grid, bounds, self.resolution, self.scale_xy, self.scale_z)
    }

    /// Sample a volume on this configuration's lattice
    ///
    /// The lattice is sized from the volume's own bounds.
    pub fn sample<L: Label>(&self, volume: &LabelVolume<L>) -> Result<SampleTable> {
        let indices = self.sample_indices(volume.bounds())?;
        sample_volume(volume, &indices)
    }
}

/// Read the label at each `(x, y, z)` index, keeping labeled voxels
///
/// # Errors
///
/// Returns `SampleOutOfBounds` for the first index outside the volume.
pub fn sample_volume<L: Label>(volume: &LabelVolume<L>, indices: &[IVec3]) -> Result<SampleTable> {
    let mut table = SampleTable::new();
    for &index in indices {
        let label = volume.get(index).ok_or(SeedError::SampleOutOfBounds {
            index,
            shape: volume.shape(),
        })?;
        if label != L::BACKGROUND {
            table.push(SampleRow::at(label.to_id(), index));
        }
    }

    info!(
        "Sampled {} labeled rows from {} indices",
        table.len(),
        indices.len()
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_increment_rounds_half_to_even() {
        assert_eq!(increment_for(2.0, 1.0), 2.0);
        assert_eq!(increment_for(2.0, 0.5), 4.0);
        assert_eq!(increment_for(2.5, 1.0), 2.0);
        assert_eq!(increment_for(3.5, 1.0), 4.0);
        assert_eq!(increment_for(0.4, 1.0), 0.0);
    }

    #[test]
    fn test_hex_sample_indices() {
        let indices = sample_indices(GridKind::Hex, UVec3::new(2, 6, 12), 2.0, 1.0, 0.5).unwrap();

        let expected = vec![
            IVec3::new(0, 0, 0),
            IVec3::new(1, 2, 0),
            IVec3::new(0, 3, 0),
            IVec3::new(1, 5, 0),
            IVec3::new(1, 1, 4),
            IVec3::new(1, 4, 4),
            IVec3::new(0, 1, 8),
            IVec3::new(1, 3, 8),
            IVec3::new(0, 5, 8),
        ];
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_rect_sample_indices() {
        let indices = sample_indices(GridKind::Rect, UVec3::new(2, 6, 12), 2.0, 1.0, 0.5).unwrap();

        let mut expected = Vec::new();
        for z in [0, 4, 8] {
            for y in [0, 2, 4] {
                expected.push(IVec3::new(0, y, z));
            }
        }
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_zero_increment_is_degenerate() {
        let result = sample_indices(GridKind::Rect, UVec3::new(4, 4, 4), 0.4, 1.0, 1.0);
        assert!(matches!(result, Err(SeedError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_sample_volume_keeps_labeled_voxels() {
        // shape (z, y, x) = (2, 3, 4)
        let mut data = Array3::<u16>::zeros((2, 3, 4));
        data[[0, 0, 0]] = 5;
        data[[1, 2, 3]] = 9;
        let volume = LabelVolume::new(data).unwrap();

        let indices = [
            IVec3::new(0, 0, 0),
            IVec3::new(1, 0, 0),
            IVec3::new(3, 2, 1),
        ];
        let table = sample_volume(&volume, &indices).unwrap();

        assert_eq!(
            table.rows(),
            &[SampleRow::new(5, 0, 0, 0), SampleRow::new(9, 3, 2, 1)]
        );
    }

    #[test]
    fn test_sample_volume_out_of_bounds() {
        let volume = LabelVolume::new(Array3::<u8>::zeros((2, 3, 4))).unwrap();

        for index in [IVec3::new(4, 0, 0), IVec3::new(0, 3, 0), IVec3::new(0, 0, -1)] {
            let result = sample_volume(&volume, &[index]);
            assert!(
                matches!(result, Err(SeedError::SampleOutOfBounds { index: i, shape: (2, 3, 4) }) if i == index),
                "index {index} should be rejected"
            );
        }
    }

    #[test]
    fn test_config_samples_whole_volume() {
        let volume = LabelVolume::new(Array3::<u32>::from_elem((3, 4, 4), 7)).unwrap();
        let config = crate::config::SamplingConfigBuilder::new()
            .resolution(2.0)
            .unwrap()
            .build()
            .unwrap();

        // x, y in {0, 2}, z in {0, 2}
        let table = config.sample(&volume).unwrap();
        assert_eq!(table.len(), 8);
        assert_eq!(table.ids(), vec![7]);
    }
}
