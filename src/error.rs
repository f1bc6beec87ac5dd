//! Error types for seed generation, volume labeling and region validation

use glam::IVec3;
use thiserror::Error;

/// Errors that can occur while building lattices, labeling volumes or cleaning samples
#[derive(Debug, Clone, Error)]
pub enum SeedError {
    /// Grid kind tag is not one of `rect` or `hex`
    #[error("invalid grid type {0}")]
    InvalidGridKind(String),

    /// Filter kind tag is not one of `connectivity` or `distance`
    #[error("invalid filter type {0}")]
    InvalidFilterKind(String),

    /// Coordinate mode tag is not one of `absolute` or `step`
    #[error("invalid coordinate type {0}")]
    InvalidCoordinateMode(String),

    /// Structuring element tag is not one of `face`, `edge` or `corner`
    #[error("invalid connectivity {0}")]
    InvalidConnectivity(String),

    /// The volume holds no labeled voxels, so no z-range can be resolved
    #[error("volume contains no labeled voxels")]
    EmptyVolume,

    /// Bounds, increments or a bounding box collapsed to nothing
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A voxel uses the value reserved for the exclusion sentinel
    #[error("label {value} is reserved as the exclusion sentinel")]
    ReservedLabel {
        /// The offending label value.
        value: u64,
    },

    /// A sample index lies outside the sampled volume
    #[error("sample index {index} outside volume of shape (z, y, x) = {shape:?}")]
    SampleOutOfBounds {
        /// The requested `(x, y, z)` index.
        index: IVec3,
        /// Volume shape in `(z, y, x)` order.
        shape: (usize, usize, usize),
    },

    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raw array data did not match the requested shape
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// Result type alias for seed operations
pub type Result<T> = std::result::Result<T, SeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SeedError::InvalidGridKind("tri".into()).to_string(),
            "invalid grid type tri"
        );
        assert_eq!(
            SeedError::ReservedLabel { value: 255 }.to_string(),
            "label 255 is reserved as the exclusion sentinel"
        );
        assert_eq!(
            SeedError::EmptyVolume.to_string(),
            "volume contains no labeled voxels"
        );
    }
}
