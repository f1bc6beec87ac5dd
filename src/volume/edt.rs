//! Exact Euclidean feature transform
//!
//! Separable lower-envelope algorithm (Felzenszwalb & Huttenlocher): one pass of 1D
//! squared-distance transforms per axis, each lane carrying the index of the feature
//! voxel its minimum came from. Passes run along x, then y, then z.
//!
//! Ties resolve to the feature reached first along each lane, so results are
//! deterministic and independent of thread scheduling.

use ndarray::{Array3, ArrayView3, ArrayViewMut1, Axis, Zip};

/// Voxel index in `(z, y, x)` order
pub type VoxelIndex = [usize; 3];

/// Squared distance and source index of the nearest feature voxel for every voxel
#[derive(Debug, Clone)]
pub struct NearestFeatures {
    squared_distances: Array3<f64>,
    indices: Array3<VoxelIndex>,
}

impl NearestFeatures {
    /// Index of the nearest feature voxel, or `None` when there are no features
    #[inline]
    pub fn nearest(&self, index: VoxelIndex) -> Option<VoxelIndex> {
        self.squared_distances[index]
            .is_finite()
            .then(|| self.indices[index])
    }

    /// Euclidean distance to the nearest feature voxel (infinite without features)
    #[inline]
    pub fn distance(&self, index: VoxelIndex) -> f64 {
        self.squared_distances[index].sqrt()
    }

    /// Squared distances for every voxel
    pub fn squared_distances(&self) -> &Array3<f64> {
        &self.squared_distances
    }
}

/// Compute the nearest feature voxel of every voxel
///
/// Feature voxels are `true` in `features` and map to themselves at distance 0.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::nearest_feature_transform;
/// use ndarray::Array3;
///
/// let mut features = Array3::from_elem((1, 3, 3), false);
/// features[[0, 0, 0]] = true;
///
/// let nearest = nearest_feature_transform(features.view());
/// assert_eq!(nearest.nearest([0, 2, 2]), Some([0, 0, 0]));
/// assert_eq!(nearest.distance([0, 2, 2]), 8f64.sqrt());
/// ```
pub fn nearest_feature_transform(features: ArrayView3<bool>) -> NearestFeatures {
    let mut squared_distances = features.mapv(|f| if f { 0.0 } else { f64::INFINITY });
    let mut indices = Array3::<VoxelIndex>::from_shape_fn(features.raw_dim(), |(z, y, x)| [z, y, x]);

    for axis in [Axis(2), Axis(1), Axis(0)] {
        if features.len_of(axis) < 2 {
            continue;
        }
        Zip::from(squared_distances.lanes_mut(axis))
            .and(indices.lanes_mut(axis))
            .par_for_each(transform_lane);
    }

    NearestFeatures {
        squared_distances,
        indices,
    }
}

/// 1D squared-distance transform of one lane, in place
///
/// Every position takes the minimum of `f[q] + (p - q)^2` over finite `f[q]`, together
/// with the source index stored at `q`.
fn transform_lane(mut distances: ArrayViewMut1<f64>, mut indices: ArrayViewMut1<VoxelIndex>) {
    let values = distances.to_vec();
    let sources = indices.to_vec();

    // parabola apexes of the lower envelope and the left edge of each one's interval
    let mut apexes: Vec<usize> = Vec::with_capacity(values.len());
    let mut edges: Vec<f64> = Vec::with_capacity(values.len());

    for (q, &fq) in values.iter().enumerate() {
        if !fq.is_finite() {
            continue;
        }
        loop {
            let Some(&p) = apexes.last() else {
                apexes.push(q);
                edges.push(f64::NEG_INFINITY);
                break;
            };
            let intersection = intersect(&values, p, q);
            let left_edge = edges.last().copied().unwrap_or(f64::NEG_INFINITY);
            if intersection <= left_edge {
                apexes.pop();
                edges.pop();
            } else {
                apexes.push(q);
                edges.push(intersection);
                break;
            }
        }
    }

    if apexes.is_empty() {
        return;
    }

    let mut k = 0;
    for position in 0..values.len() {
        let p = position as f64;
        while k + 1 < apexes.len() && edges[k + 1] < p {
            k += 1;
        }
        let q = apexes[k];
        let offset = p - q as f64;
        distances[position] = values[q] + offset * offset;
        indices[position] = sources[q];
    }
}

/// Position where the parabolas rooted at `p < q` meet
#[inline]
fn intersection_point(fp: f64, p: f64, fq: f64, q: f64) -> f64 {
    ((fq + q * q) - (fp + p * p)) / (2.0 * (q - p))
}

#[inline]
fn intersect(values: &[f64], p: usize, q: usize) -> f64 {
    intersection_point(values[p], p as f64, values[q], q as f64)
}
