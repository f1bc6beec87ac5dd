//! Rectangular lattice
//!
//! The Cartesian product of three arithmetic sequences starting at 0.

use glam::{DVec3, UVec3};

use super::arange;

/// Generate a rectangular lattice within `bounds`
///
/// x and y run over `[0, bound)` in steps of `increment_xy`, z over `[0, z_bound)` in
/// steps of `increment_z`.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::generation::generate_rect_lattice;
/// use glam::UVec3;
///
/// let points = generate_rect_lattice(UVec3::new(4, 6, 5), 2.0, 4.0);
/// // x in {0, 2}, y in {0, 2, 4}, z in {0, 4}
/// assert_eq!(points.len(), 12);
/// ```
pub fn generate_rect_lattice(bounds: UVec3, increment_xy: f64, increment_z: f64) -> Vec<DVec3> {
    let xs: Vec<f64> = arange(bounds.x as f64, increment_xy).collect();
    let ys: Vec<f64> = arange(bounds.y as f64, increment_xy).collect();

    let mut points = Vec::with_capacity(xs.len() * ys.len());
    for z in arange(bounds.z as f64, increment_z) {
        for &x in &xs {
            for &y in &ys {
                points.push(DVec3::new(x, y, z));
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn as_integer_set(points: &[DVec3]) -> HashSet<(i64, i64, i64)> {
        points
            .iter()
            .map(|p| (p.x as i64, p.y as i64, p.z as i64))
            .collect()
    }

    #[test]
    fn test_unit_increments_fill_bounds() {
        let points = generate_rect_lattice(UVec3::new(4, 6, 5), 1.0, 1.0);

        let expected: HashSet<(i64, i64, i64)> = (0..4)
            .flat_map(|x| (0..6).flat_map(move |y| (0..5).map(move |z| (x, y, z))))
            .collect();

        assert_eq!(points.len(), expected.len());
        assert_eq!(as_integer_set(&points), expected);
    }

    #[test]
    fn test_coarse_increments() {
        let points = generate_rect_lattice(UVec3::new(4, 6, 5), 2.0, 4.0);

        let expected: HashSet<(i64, i64, i64)> = [0, 2]
            .into_iter()
            .flat_map(|x| {
                [0, 2, 4]
                    .into_iter()
                    .flat_map(move |y| [0, 4].into_iter().map(move |z| (x, y, z)))
            })
            .collect();

        assert_eq!(as_integer_set(&points), expected);
    }

    #[test]
    fn test_fractional_increment_stays_within_bounds() {
        let points = generate_rect_lattice(UVec3::new(3, 3, 2), 0.75, 1.0);

        // 0, 0.75, 1.5, 2.25 per axis
        assert_eq!(points.len(), 4 * 4 * 2);
        for p in &points {
            assert!(p.x < 3.0 && p.y < 3.0 && p.z < 2.0);
            assert!(p.x >= 0.0 && p.y >= 0.0 && p.z >= 0.0);
        }
    }
}
