//! Boundary mask construction and mask extents

use std::collections::VecDeque;
use std::ops::Range;

use ndarray::parallel::prelude::*;
use ndarray::{Array2, Array3, ArrayView3, ArrayViewMut2, Axis, Zip};
use tracing::debug;

use super::{Label, LabelVolume};
use crate::config::Connectivity;
use crate::error::{Result, SeedError};

/// Axis-aligned box around the nonzero voxels of a mask
///
/// Each range is half-open and already padded by one voxel on both sides, clipped to the
/// mask shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    /// Layer range
    pub z: Range<usize>,
    /// Row range
    pub y: Range<usize>,
    /// Column range
    pub x: Range<usize>,
}

impl BoundingBox {
    /// Shape of the cropped region in `(Z, Y, X)` order
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.z.len(), self.y.len(), self.x.len())
    }
}

/// Build the solid region eligible for labeling
///
/// Labeled voxels are dilated `iterations` times with the `connectivity` structuring
/// element, then enclosed background in every z-layer is filled.
pub fn create_boundary_mask<L: Label>(
    volume: &LabelVolume<L>,
    iterations: usize,
    connectivity: Connectivity,
) -> Array3<bool> {
    let mut mask = volume.data().mapv(|v| v != L::BACKGROUND);
    for _ in 0..iterations {
        mask = dilate(mask.view(), connectivity);
    }

    mask.axis_iter_mut(Axis(0))
        .into_par_iter()
        .for_each(fill_layer_holes);

    debug!(
        "Boundary mask covers {} voxels after {} {} dilations",
        mask.iter().filter(|&&v| v).count(),
        iterations,
        connectivity
    );

    mask
}

/// One dilation step; voxels beyond the array edge count as unset
pub fn dilate(mask: ArrayView3<bool>, connectivity: Connectivity) -> Array3<bool> {
    let offsets = connectivity.offsets();
    let (nz, ny, nx) = mask.dim();

    let mut dilated = mask.to_owned();
    Zip::indexed(&mut dilated).par_for_each(|(z, y, x), value| {
        if *value {
            return;
        }
        *value = offsets.iter().any(|&(dz, dy, dx)| {
            match (shift(z, dz, nz), shift(y, dy, ny), shift(x, dx, nx)) {
                (Some(z), Some(y), Some(x)) => mask[[z, y, x]],
                _ => false,
            }
        });
    });
    dilated
}

#[inline]
fn shift(index: usize, delta: isize, len: usize) -> Option<usize> {
    let shifted = index.checked_add_signed(delta)?;
    (shifted < len).then_some(shifted)
}

/// Fill background regions of a layer that cannot reach the layer border
///
/// Background connectivity is 4-neighbour, so diagonal gaps in a ring still enclose.
pub fn fill_layer_holes(mut layer: ArrayViewMut2<bool>) {
    let (ny, nx) = layer.dim();
    if ny == 0 || nx == 0 {
        return;
    }

    let mut outside = Array2::<bool>::from_elem((ny, nx), false);
    let mut queue = VecDeque::new();

    for y in 0..ny {
        for x in 0..nx {
            let on_border = y == 0 || x == 0 || y == ny - 1 || x == nx - 1;
            if on_border && !layer[[y, x]] {
                outside[[y, x]] = true;
                queue.push_back((y, x));
            }
        }
    }

    while let Some((y, x)) = queue.pop_front() {
        for (dy, dx) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
            let (Some(ny2), Some(nx2)) = (shift(y, dy, ny), shift(x, dx, nx)) else {
                continue;
            };
            if !layer[[ny2, nx2]] && !outside[[ny2, nx2]] {
                outside[[ny2, nx2]] = true;
                queue.push_back((ny2, nx2));
            }
        }
    }

    Zip::from(&mut layer).and(&outside).for_each(|value, &reached| {
        if !reached {
            *value = true;
        }
    });
}

/// First and last occupied index along an axis
fn occupied_extent(mask: ArrayView3<bool>, axis: Axis) -> Option<(usize, usize)> {
    let occupied: Vec<bool> = mask
        .axis_iter(axis)
        .map(|slab| slab.iter().any(|&v| v))
        .collect();
    let first = occupied.iter().position(|&v| v)?;
    let last = occupied.iter().rposition(|&v| v)?;
    Some((first, last))
}

/// Half-open z-range of the occupied layers, padded up to `target_height`
///
/// When the occupied span is shorter than `target_height`, `floor(delta / 2)` layers are
/// added below and the remainder above, clipped to the mask.
///
/// # Errors
///
/// Returns `EmptyVolume` if no voxel is set.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::mask_z_bounds;
/// use ndarray::{s, Array3};
///
/// let mut occupied = Array3::from_elem((20, 1, 1), false);
/// occupied.slice_mut(s![7..12, .., ..]).fill(true);
///
/// assert_eq!(mask_z_bounds(occupied.view(), 5).unwrap(), 7..12);
/// assert_eq!(mask_z_bounds(occupied.view(), 8).unwrap(), 6..14);
/// ```
pub fn mask_z_bounds(mask: ArrayView3<bool>, target_height: usize) -> Result<Range<usize>> {
    let (lower, upper) = occupied_extent(mask, Axis(0)).ok_or(SeedError::EmptyVolume)?;
    let current = upper - lower + 1;

    if current < target_height {
        let delta = target_height - current;
        let below = delta / 2;
        let above = delta - below;
        let depth = mask.len_of(Axis(0));
        Ok(lower.saturating_sub(below)..(upper + above + 1).min(depth))
    } else {
        Ok(lower..upper + 1)
    }
}

/// Padded bounding box of the set voxels
///
/// # Errors
///
/// Returns `DegenerateGeometry` if no voxel is set.
pub fn mask_bounding_box(mask: ArrayView3<bool>) -> Result<BoundingBox> {
    let padded = |axis: Axis| -> Result<Range<usize>> {
        let (min, max) = occupied_extent(mask, axis).ok_or_else(|| {
            SeedError::DegenerateGeometry("bounding box of an empty mask".to_string())
        })?;
        Ok(min.saturating_sub(1)..(max + 2).min(mask.len_of(axis)))
    };

    Ok(BoundingBox {
        z: padded(Axis(0))?,
        y: padded(Axis(1))?,
        x: padded(Axis(2))?,
    })
}
