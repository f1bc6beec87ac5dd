//! Seed preparation for agent-based cell simulations
//!
//! Turns volumetric segmentations into clean, geometrically consistent seed point sets:
//! regular or close-packed sampling lattices, Voronoi labeling of partially labeled
//! volumes, and cleanup of the sampled point clouds.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_voronoi_seeds::*;
//! use ndarray::Array3;
//!
//! // A sparse segmentation: two labeled voxels in a (Z, Y, X) volume
//! let mut data = Array3::<u16>::zeros((4, 12, 12));
//! data[[1, 3, 3]] = 1;
//! data[[1, 8, 8]] = 2;
//! let volume = LabelVolume::new(data).unwrap();
//!
//! // Grow every label over its neighbourhood, three layers deep
//! let voronoi = VoronoiConfigBuilder::new()
//!     .dilation_iterations(3).unwrap()
//!     .target_height(3)
//!     .build();
//! let labeled = label_volume(&volume, &voronoi).unwrap();
//!
//! // Sample the labeled volume on a hexagonal lattice
//! let sampling = SamplingConfigBuilder::new()
//!     .grid(GridKind::Hex)
//!     .resolution(2.0).unwrap()
//!     .build().unwrap();
//! let samples = sampling.sample(&labeled).unwrap();
//!
//! // Drop disconnected fragments and convert to simulation seeds
//! let validation = ValidationConfigBuilder::new()
//!     .unconnected_filter(FilterKind::Distance, 3.0).unwrap()
//!     .build();
//! let cleaned = RegionValidator::new(validation).validate(&samples);
//! let seeds = sampling.scale(&cleaned).unwrap();
//!
//! assert_eq!(seeds.len(), cleaned.len());
//! assert!(cleaned.ids().iter().all(|id| [1, 2].contains(id)));
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): KD-tree neighbour queries for the distance filter
//! - `serde`: Enables serialization support for configuration and sample tables

// Modules
pub mod error;
pub mod config;
pub mod sample;
pub mod generation;
pub mod volume;
pub mod validation;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{SeedError, Result};
pub use config::{
    Connectivity, CoordinateMode, EdgeFilter, FilterKind, GridKind, SamplingConfig,
    SamplingConfigBuilder, ValidationConfig, ValidationConfigBuilder, VoronoiConfig,
    VoronoiConfigBuilder,
};
pub use sample::{scale_samples, SampleRow, SampleTable, SeedPosition};
pub use generation::{
    filter_within_radius, generate_hex_lattice, generate_lattice, generate_rect_lattice,
    increment_for, sample_indices, sample_volume, GridSpec,
};
pub use volume::{
    create_boundary_mask, label_volume, mask_bounding_box, mask_z_bounds,
    nearest_feature_transform, voronoi_fill, BoundingBox, Label, LabelVolume, NearestFeatures,
};
pub use validation::{
    find_connected_components, keep_largest_component, keep_within_distance,
    remove_edge_regions, remove_unconnected_regions, ConnectedComponent, RegionValidator,
};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;
