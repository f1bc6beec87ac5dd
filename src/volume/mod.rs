//! Voronoi labeling of partially labeled segmentation volumes
//!
//! A segmentation volume usually labels only part of each region. Labeling grows a
//! boundary mask around the labeled content and assigns every unlabeled voxel inside the
//! mask the label of its nearest labeled voxel.
//!
//! Volumes are stored `(Z, Y, X)`.

mod edt;
mod mask;

pub use edt::{nearest_feature_transform, NearestFeatures};
pub use mask::{
    create_boundary_mask, dilate, fill_layer_holes, mask_bounding_box, mask_z_bounds, BoundingBox,
};

use std::fmt::Debug;
use std::hash::Hash;

use glam::{IVec3, UVec3};
use ndarray::{s, Array3, ArrayView3, Zip};
use tracing::{debug, info};

use crate::config::VoronoiConfig;
use crate::error::{Result, SeedError};

/// Unsigned integer label stored in a segmentation volume
///
/// `BACKGROUND` marks unlabeled voxels. `SENTINEL`, the type's maximum value, is reserved
/// to exclude voxels from labeling and never appears in a valid volume.
pub trait Label: Copy + Default + Eq + Hash + Ord + Debug + Send + Sync + 'static {
    /// Unlabeled voxel
    const BACKGROUND: Self;
    /// Reserved exclusion marker
    const SENTINEL: Self;

    /// Widen to a sample id
    fn to_id(self) -> u64;
}

macro_rules! impl_label {
    ($($t:ty),*) => {
        $(
            impl Label for $t {
                const BACKGROUND: Self = 0;
                const SENTINEL: Self = <$t>::MAX;

                #[inline]
                fn to_id(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_label!(u8, u16, u32, u64);

/// A dense `(Z, Y, X)` label volume that never holds the sentinel value
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVolume<L: Label> {
    data: Array3<L>,
}

impl<L: Label> LabelVolume<L> {
    /// Wrap a label array
    ///
    /// # Errors
    ///
    /// Returns `ReservedLabel` if any voxel equals `L::SENTINEL`.
    pub fn new(data: Array3<L>) -> Result<Self> {
        if data.iter().any(|&v| v == L::SENTINEL) {
            return Err(SeedError::ReservedLabel {
                value: L::SENTINEL.to_id(),
            });
        }
        Ok(Self { data })
    }

    /// Build a volume from a flat `(Z, Y, X)` row-major buffer
    ///
    /// # Errors
    ///
    /// Returns `Shape` if the buffer length does not match the shape, or `ReservedLabel`
    /// if it holds the sentinel value.
    pub fn from_shape_vec(shape: (usize, usize, usize), values: Vec<L>) -> Result<Self> {
        Self::new(Array3::from_shape_vec(shape, values)?)
    }

    /// Shape in `(Z, Y, X)` order
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Extents in `(X, Y, Z)` order, for sizing a sampling lattice
    pub fn bounds(&self) -> UVec3 {
        let (nz, ny, nx) = self.shape();
        UVec3::new(nx as u32, ny as u32, nz as u32)
    }

    /// Label at an `(x, y, z)` index, or `None` outside the volume
    pub fn get(&self, index: IVec3) -> Option<L> {
        let x = usize::try_from(index.x).ok()?;
        let y = usize::try_from(index.y).ok()?;
        let z = usize::try_from(index.z).ok()?;
        self.data.get([z, y, x]).copied()
    }

    /// Borrow the underlying array
    #[inline]
    pub fn data(&self) -> &Array3<L> {
        &self.data
    }

    /// Consume the volume and return the underlying array
    pub fn into_inner(self) -> Array3<L> {
        self.data
    }

    /// Number of labeled voxels
    pub fn labeled_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != L::BACKGROUND).count()
    }

    /// Distinct labels, ascending
    pub fn labels(&self) -> Vec<L> {
        let mut labels: Vec<L> = self
            .data
            .iter()
            .copied()
            .filter(|&v| v != L::BACKGROUND)
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

/// Assign every unlabeled voxel the label of its nearest labeled voxel
///
/// Voxels that already carry a label keep it. An array without labels is returned as is.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::voronoi_fill;
/// use ndarray::array;
///
/// let filled = voronoi_fill(array![[[4u8, 0, 0, 0, 7]]].view());
/// assert_eq!(filled, array![[[4u8, 4, 4, 7, 7]]]);
/// ```
pub fn voronoi_fill<L: Label>(labels: ArrayView3<L>) -> Array3<L> {
    let features = labels.mapv(|v| v != L::BACKGROUND);
    let nearest = nearest_feature_transform(features.view());

    let mut filled = labels.to_owned();
    Zip::indexed(&mut filled).for_each(|(z, y, x), value| {
        if *value == L::BACKGROUND {
            if let Some(source) = nearest.nearest([z, y, x]) {
                *value = labels[source];
            }
        }
    });
    filled
}

/// Label every voxel of the boundary mask with its nearest seed label
///
/// Steps:
/// 1. Build the boundary mask (dilation, then per-layer hole filling).
/// 2. Resolve the z-range from the labeled content, padded to `target_height`.
/// 3. Mark voxels outside the mask with the sentinel, then trim the mask to the z-range.
/// 4. Crop to the mask's bounding box and fill it with [`voronoi_fill`].
/// 5. Clear everything outside the mask and every leftover sentinel.
///
/// The sentinel competes with the seeds in step 4, so a mask voxel ends up labeled only
/// when its nearest non-background voxel is a seed. Voxels closer to the excluded region
/// than to any seed stay 0, which thins the labeling along the mask border.
///
/// # Errors
///
/// Returns `EmptyVolume` if the volume has no labeled voxels.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::*;
/// use ndarray::Array3;
///
/// let mut data = Array3::<u16>::zeros((3, 5, 5));
/// data[[1, 2, 2]] = 9;
/// let volume = LabelVolume::new(data).unwrap();
///
/// let labeled = label_volume(&volume, &VoronoiConfig::default()).unwrap();
/// assert_eq!(labeled.labels(), vec![9]);
/// assert_eq!(labeled.get(glam::IVec3::new(3, 2, 1)), Some(9));
/// ```
pub fn label_volume<L: Label>(volume: &LabelVolume<L>, config: &VoronoiConfig) -> Result<LabelVolume<L>> {
    let mut mask = create_boundary_mask(
        volume,
        config.dilation_iterations,
        config.dilation_connectivity,
    );

    let labeled = volume.data.mapv(|v| v != L::BACKGROUND);
    let z_range = mask_z_bounds(labeled.view(), config.target_height)?;
    debug!("Resolved z-range {:?} for target height {}", z_range, config.target_height);

    let mut working = volume.data.clone();
    Zip::from(&mut working).and(&mask).for_each(|value, &inside| {
        if !inside {
            *value = L::SENTINEL;
        }
    });

    mask.slice_mut(s![..z_range.start, .., ..]).fill(false);
    mask.slice_mut(s![z_range.end.., .., ..]).fill(false);

    let bbox = mask_bounding_box(mask.view())?;
    debug!("Labeling crop {:?} of volume {:?}", bbox, volume.shape());

    let filled = voronoi_fill(working.slice(s![bbox.z.clone(), bbox.y.clone(), bbox.x.clone()]));
    working
        .slice_mut(s![bbox.z.clone(), bbox.y.clone(), bbox.x.clone()])
        .assign(&filled);

    Zip::from(&mut working).and(&mask).for_each(|value, &inside| {
        if !inside || *value == L::SENTINEL {
            *value = L::BACKGROUND;
        }
    });

    let result = LabelVolume { data: working };
    info!(
        "Labeled {} voxels across {} regions",
        result.labeled_count(),
        result.labels().len()
    );

    Ok(result)
}

impl VoronoiConfig {
    /// Label a volume with this configuration
    pub fn label<L: Label>(&self, volume: &LabelVolume<L>) -> Result<LabelVolume<L>> {
        label_volume(volume, self)
    }
}
