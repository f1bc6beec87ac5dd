//! Sampling lattice generation
//!
//! Produces candidate 3D coordinates for a rectangular or hexagonal close-packed
//! lattice inside given bounds, and converts physical sampling parameters into
//! integer voxel sample indices.

mod hex;
mod indices;
mod rect;

pub use hex::generate_hex_lattice;
pub use indices::{increment_for, sample_indices, sample_volume};
pub use rect::generate_rect_lattice;

use glam::{DVec3, UVec3};
use tracing::debug;

use crate::config::GridKind;
use crate::error::{Result, SeedError};

/// Parameters of one lattice generation call
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::*;
/// use glam::UVec3;
///
/// let spec = GridSpec::new(GridKind::Rect, UVec3::new(4, 6, 5), 1.0, 1.0).unwrap();
/// assert_eq!(spec.generate().len(), 4 * 6 * 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    kind: GridKind,
    bounds: UVec3,
    increment_xy: f64,
    increment_z: f64,
}

impl GridSpec {
    /// Create a lattice specification
    ///
    /// # Arguments
    ///
    /// * `kind` - Rect or Hex layout
    /// * `bounds` - Exclusive upper bounds in x, y and z
    /// * `increment_xy` - Spacing between neighbouring points in x/y
    /// * `increment_z` - Spacing between z-layers
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if any bound is zero or any increment is not
    /// positive and finite.
    pub fn new(kind: GridKind, bounds: UVec3, increment_xy: f64, increment_z: f64) -> Result<Self> {
        if bounds.min_element() == 0 {
            return Err(SeedError::DegenerateGeometry(format!(
                "lattice bounds must be positive (got {bounds})"
            )));
        }
        for (name, increment) in [("xy", increment_xy), ("z", increment_z)] {
            if !increment.is_finite() || increment <= 0.0 {
                return Err(SeedError::DegenerateGeometry(format!(
                    "lattice {name} increment must be positive (got {increment})"
                )));
            }
        }

        Ok(Self {
            kind,
            bounds,
            increment_xy,
            increment_z,
        })
    }

    /// Lattice layout
    #[inline]
    pub fn kind(&self) -> GridKind {
        self.kind
    }

    /// Exclusive upper bounds in x, y and z
    #[inline]
    pub fn bounds(&self) -> UVec3 {
        self.bounds
    }

    /// Spacing in x/y
    #[inline]
    pub fn increment_xy(&self) -> f64 {
        self.increment_xy
    }

    /// Spacing between z-layers
    #[inline]
    pub fn increment_z(&self) -> f64 {
        self.increment_z
    }

    /// Generate all lattice coordinates for this specification
    pub fn generate(&self) -> Vec<DVec3> {
        generate_lattice(self)
    }
}

/// Generate lattice coordinates for a specification
///
/// Callers must not rely on the emission order.
pub fn generate_lattice(spec: &GridSpec) -> Vec<DVec3> {
    let coordinates = match spec.kind {
        GridKind::Rect => generate_rect_lattice(spec.bounds, spec.increment_xy, spec.increment_z),
        GridKind::Hex => generate_hex_lattice(spec.bounds, spec.increment_xy, spec.increment_z),
    };

    debug!(
        "Generated {} {} lattice coordinates within {}",
        coordinates.len(),
        spec.kind,
        spec.bounds
    );

    coordinates
}

/// Keep coordinates within `radius` of the XY centroid, re-centred on it
///
/// The centroid is the mean x and y over all input coordinates. Coordinates whose
/// squared XY distance to it is at most `radius²` are kept and shifted so the
/// centroid becomes the origin. z is left untouched.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::filter_within_radius;
/// use glam::DVec3;
///
/// let coordinates = [
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(2.0, 0.0, 1.0),
///     DVec3::new(10.0, 0.0, 0.0),
/// ];
/// let kept = filter_within_radius(&coordinates, 4.5);
/// assert_eq!(kept, vec![DVec3::new(-4.0, 0.0, 0.0), DVec3::new(-2.0, 0.0, 1.0)]);
/// ```
pub fn filter_within_radius(coordinates: &[DVec3], radius: f64) -> Vec<DVec3> {
    if coordinates.is_empty() {
        return Vec::new();
    }

    let sum: DVec3 = coordinates.iter().copied().sum();
    let center = sum / coordinates.len() as f64;
    let radius_sq = radius * radius;

    coordinates
        .iter()
        .filter_map(|c| {
            let dx = c.x - center.x;
            let dy = c.y - center.y;
            (dx * dx + dy * dy <= radius_sq).then(|| DVec3::new(dx, dy, c.z))
        })
        .collect()
}

/// Evenly spaced values in `[0, bound)`, matching a half-open arange
pub(crate) fn arange(bound: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = (bound / step).ceil().max(0.0) as usize;
    (0..count).map(move |i| i as f64 * step)
}
