//! Hexagonal close-packed lattice
//!
//! Each z-layer is a 2D hexagonal lattice with minimum center-to-center spacing
//! `increment_xy`. Layers repeat a three-step offset cycle so consecutive layers
//! nest into the hollows of the layer below, giving face-centered cubic (FCC)
//! stacking.
//!
//! # Layer offsets
//!
//! For layer index `i` the offset index is `o = i % 3`:
//! - x shift: `increment_xy / 2` when `o == 1`, otherwise 0
//! - y shift: `increment_xy / 2 * √3 / 3 * o`

use glam::{DVec2, DVec3, UVec3};

use super::arange;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Number of layers in one FCC stacking cycle
pub(crate) const STACKING_PERIOD: usize = 3;

/// Generate a hexagonal close-packed lattice within `bounds`
///
/// Points whose rounded x or y reaches the corresponding bound are discarded. A bound
/// shorter than one spacing still gets the origin column or row.
/// Rounding is half-to-even.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::generation::generate_hex_lattice;
/// use glam::UVec3;
///
/// let points = generate_hex_lattice(UVec3::new(4, 6, 13), 2.0, 4.0);
/// assert!(points
///     .iter()
///     .all(|p| p.x.round_ties_even() < 4.0 && p.y.round_ties_even() < 6.0));
/// ```
pub fn generate_hex_lattice(bounds: UVec3, increment_xy: f64, increment_z: f64) -> Vec<DVec3> {
    let base = hex_layer(bounds, increment_xy);
    let x_bound = bounds.x as f64;
    let y_bound = bounds.y as f64;

    let mut points = Vec::with_capacity(base.len() * bounds.z as usize);
    for (layer, z) in arange(bounds.z as f64, increment_z).enumerate() {
        let offset = layer_offset(layer, increment_xy);

        for point in &base {
            let shifted = *point + offset;
            if shifted.x.round_ties_even() < x_bound && shifted.y.round_ties_even() < y_bound {
                points.push(DVec3::new(shifted.x, shifted.y, z));
            }
        }
    }
    points
}

/// XY shift applied to every point of layer `layer`
pub(crate) fn layer_offset(layer: usize, increment_xy: f64) -> DVec2 {
    let o = layer % STACKING_PERIOD;
    let x = if o == 1 { increment_xy / 2.0 } else { 0.0 };
    let y = (increment_xy / 2.0) * SQRT_3 / 3.0 * o as f64;
    DVec2::new(x, y)
}

/// Single 2D hexagonal layer anchored at the origin
///
/// Rows are `increment_xy * √3 / 2` apart; odd rows are shifted by half a spacing.
/// The column and row counts cover the XY bounds; at least one point is always emitted.
fn hex_layer(bounds: UVec3, increment_xy: f64) -> Vec<DVec2> {
    let columns = ((bounds.x as f64 / increment_xy).floor() as usize).max(1);
    let rows = ((bounds.y as f64 / increment_xy * SQRT_3).floor() as usize).max(1);
    let row_spacing = increment_xy * SQRT_3 / 2.0;

    let mut layer = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        let stagger = if row % 2 == 1 { 0.5 } else { 0.0 };
        for column in 0..columns {
            layer.push(DVec2::new(
                (column as f64 + stagger) * increment_xy,
                row as f64 * row_spacing,
            ));
        }
    }
    layer
}
