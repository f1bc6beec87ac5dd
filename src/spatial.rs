//! Spatial indexing for fixed-radius neighbour queries over sample positions
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::DVec3;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Wrapper around KD-tree for spatial queries
///
/// Answers "is there another sample within this distance" for the distance filter.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Radius query: O(log n + k) for k neighbours in range
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    points: Vec<[f64; 3]>,
    tree: ImmutableKdTree<f64, usize, 3, 32>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from sample positions
    ///
    /// Duplicate positions are allowed.
    ///
    /// # Arguments
    ///
    /// * `positions` - Slice of DVec3 positions; a position's slice index is its item id
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_seeds::*;
    /// use glam::DVec3;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let positions = vec![
    ///     DVec3::new(0.0, 0.0, 0.0),
    ///     DVec3::new(1.0, 1.0, 1.0),
    ///     DVec3::new(1.0, 2.0, 2.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&positions);
    /// assert!(!index.has_neighbour_within(0, 1.5));
    /// assert!(index.has_neighbour_within(1, 1.5));
    /// # }
    /// ```
    pub fn new(positions: &[DVec3]) -> Self {
        let points: Vec<[f64; 3]> = positions.iter().map(|p| p.to_array()).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            points,
        }
    }

    /// Number of indexed positions
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the index holds no positions
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check whether any other indexed position lies strictly closer than `threshold`
    /// to the position stored at `index`
    ///
    /// Other entries at the same coordinates count as neighbours at distance 0.
    pub fn has_neighbour_within(&self, index: usize, threshold: f64) -> bool {
        let Some(query) = self.points.get(index) else {
            return false;
        };
        let limit = threshold * threshold;

        self.tree
            .within_unsorted::<SquaredEuclidean>(query, limit)
            .into_iter()
            .any(|neighbour| neighbour.item as usize != index && neighbour.distance < limit)
    }
}

#[cfg(test)]
#[cfg(feature = "spatial-index")]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let positions = vec![DVec3::new(0.0, 0.0, 0.0), DVec3::new(2.0, 0.0, 0.0)];
        let index = SpatialIndex::new(&positions);

        assert!(!index.has_neighbour_within(0, 2.0));
        assert!(index.has_neighbour_within(0, 2.01));
    }

    #[test]
    fn test_duplicates_are_neighbours() {
        let positions = vec![DVec3::new(3.0, 3.0, 3.0); 10];
        let index = SpatialIndex::new(&positions);

        assert_eq!(index.len(), 10);
        assert!(index.has_neighbour_within(7, 0.5));
    }

    #[test]
    fn test_single_position_has_no_neighbour() {
        let index = SpatialIndex::new(&[DVec3::new(1.0, 2.0, 3.0)]);
        assert!(!index.has_neighbour_within(0, 100.0));
        assert!(!index.has_neighbour_within(5, 100.0));
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new(&[]);
        assert!(index.is_empty());
        assert!(!index.has_neighbour_within(0, 1.0));
    }
}
