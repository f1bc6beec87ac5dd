//! Face-connected components of a labeled point cloud

use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};

use glam::IVec3;
use ndarray::Array3;
use tracing::{debug, info};

use crate::sample::{SampleRow, SampleTable};

const FACE_NEIGHBOURS: [(isize, isize, isize); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// A maximal set of same-id positions reachable through shared faces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponent {
    /// Region id shared by every voxel
    pub id: u64,
    /// Voxel positions, in discovery order
    pub voxels: Vec<IVec3>,
}

impl ConnectedComponent {
    /// Number of voxels
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Check if the component has no voxels
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }
}

/// Find the 6-connected components of every id
///
/// The table is rasterized over its bounding box; when several rows share a position the
/// last one wins. Components are returned largest first. Equal sizes keep raster order
/// (z, then y, then x) of each component's first voxel.
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
/// let components = find_connected_components(&table);
/// assert_eq!(components.len(), 2);
/// assert_eq!(components[0].len(), 2);
/// ```
pub fn find_connected_components(table: &SampleTable) -> Vec<ConnectedComponent> {
    let Some((min, max)) = table.extent() else {
        return Vec::new();
    };

    let extent = (max - min + IVec3::ONE).as_uvec3();
    let shape = (extent.z as usize, extent.y as usize, extent.x as usize);
    let mut raster = Array3::<u64>::zeros(shape);
    for row in table {
        let p = (row.position() - min).as_uvec3();
        raster[[p.z as usize, p.y as usize, p.x as usize]] = row.id;
    }

    let mut visited = Array3::<bool>::from_elem(shape, false);
    let mut components = Vec::new();

    for ((z, y, x), &id) in raster.indexed_iter() {
        if id == 0 || visited[[z, y, x]] {
            continue;
        }

        let mut voxels = Vec::new();
        let mut queue = VecDeque::from([[z, y, x]]);
        visited[[z, y, x]] = true;

        while let Some(voxel) = queue.pop_front() {
            voxels.push(min + IVec3::new(voxel[2] as i32, voxel[1] as i32, voxel[0] as i32));

            for (dz, dy, dx) in FACE_NEIGHBOURS {
                let neighbour = [
                    voxel[0].wrapping_add_signed(dz),
                    voxel[1].wrapping_add_signed(dy),
                    voxel[2].wrapping_add_signed(dx),
                ];
                if raster.get(neighbour) == Some(&id) && !visited[neighbour] {
                    visited[neighbour] = true;
                    queue.push_back(neighbour);
                }
            }
        }

        components.push(ConnectedComponent { id, voxels });
    }

    components.sort_by_key(|c| Reverse(c.len()));

    debug!(
        "Found {} connected component(s) in {} rows",
        components.len(),
        table.len()
    );

    components
}

/// Keep only the largest face-connected component of each id
///
/// Smaller components sharing an id with a larger one are dropped and logged. The result
/// is sorted by `(id, x, y, z)`.
pub fn keep_largest_component(table: &SampleTable) -> SampleTable {
    let mut kept_ids = HashSet::new();
    let mut rows = Vec::new();

    for component in find_connected_components(table) {
        if kept_ids.insert(component.id) {
            rows.extend(
                component
                    .voxels
                    .iter()
                    .map(|&voxel| SampleRow::at(component.id, voxel)),
            );
        } else {
            info!(
                "Skipping unconnected region for id {} ({} voxels)",
                component.id,
                component.len()
            );
        }
    }

    SampleTable::sorted(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[[i64; 4]]) -> SampleTable {
        data.iter()
            .map(|&[id, x, y, z]| SampleRow::new(id as u64, x as i32, y as i32, z as i32))
            .collect()
    }

    #[test]
    fn test_isolated_voxel_is_dropped() {
        let table = rows(&[[1, 0, 0, 0], [1, 0, 1, 0], [1, 5, 5, 5]]);
        let filtered = keep_largest_component(&table);
        assert_eq!(filtered, rows(&[[1, 0, 0, 0], [1, 0, 1, 0]]));
    }

    #[test]
    fn test_largest_component_per_id() {
        let table = rows(&[
            [2, 2, 0, 0],
            [2, 2, 1, 0],
            [2, 2, 0, 1],
            [2, 1, 2, 1],
            [2, 0, 2, 1],
            [1, 0, 0, 0],
            [1, 0, 1, 0],
            [1, 1, 0, 0],
            [1, 1, 1, 0],
            [1, 2, 2, 0],
        ]);

        let expected = rows(&[
            [1, 0, 0, 0],
            [1, 0, 1, 0],
            [1, 1, 0, 0],
            [1, 1, 1, 0],
            [2, 2, 0, 0],
            [2, 2, 0, 1],
            [2, 2, 1, 0],
        ]);
        assert_eq!(keep_largest_component(&table), expected);
    }

    #[test]
    fn test_diagonal_neighbours_are_not_connected() {
        let table = rows(&[[3, 0, 0, 0], [3, 1, 1, 0], [3, 2, 2, 2]]);
        let components = find_connected_components(&table);
        assert_eq!(components.len(), 3);
        assert!(components.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_equal_sizes_keep_raster_order() {
        // two single-voxel fragments; (z=0) comes before (z=3) in raster order
        let table = rows(&[[4, 9, 9, 3], [4, 0, 0, 0]]);
        let filtered = keep_largest_component(&table);
        assert_eq!(filtered, rows(&[[4, 0, 0, 0]]));
    }

    #[test]
    fn test_negative_and_offset_coordinates() {
        let table = rows(&[[5, -3, 10, 2], [5, -2, 10, 2], [5, 7, 10, 2]]);
        let filtered = keep_largest_component(&table);
        assert_eq!(filtered, rows(&[[5, -3, 10, 2], [5, -2, 10, 2]]));
    }

    #[test]
    fn test_different_ids_do_not_merge() {
        let table = rows(&[[1, 0, 0, 0], [2, 1, 0, 0], [1, 2, 0, 0]]);
        let components = find_connected_components(&table);
        assert_eq!(components.len(), 3);

        let filtered = keep_largest_component(&table);
        assert_eq!(filtered, rows(&[[1, 0, 0, 0], [2, 1, 0, 0]]));
    }

    #[test]
    fn test_empty_table() {
        assert!(find_connected_components(&SampleTable::new()).is_empty());
        assert!(keep_largest_component(&SampleTable::new()).is_empty());
    }
}
