//! Seed Generation Configuration and Builders
//!
//! This module provides the enumerated parameter kinds and the validated configuration
//! types for lattice sampling, Voronoi labeling and region validation.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedError};

/// Lattice layout used to place sample points
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridKind {
    /// Cartesian product of evenly spaced axes
    #[default]
    Rect,
    /// Hexagonal close-packed layers stacked as face-centered cubic
    Hex,
}

impl GridKind {
    /// Get the tag used for this grid kind in configuration files
    pub fn name(self) -> &'static str {
        match self {
            GridKind::Rect => "rect",
            GridKind::Hex => "hex",
        }
    }
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GridKind {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rect" => Ok(GridKind::Rect),
            "hex" => Ok(GridKind::Hex),
            other => Err(SeedError::InvalidGridKind(other.to_string())),
        }
    }
}

/// Strategy for removing fragments that are disconnected from the rest of their region
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Keep only the largest face-connected component of each id
    Connectivity,
    /// Keep samples with a same-id neighbour closer than a threshold
    Distance,
}

impl FilterKind {
    /// Get the tag used for this filter kind in configuration files
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Connectivity => "connectivity",
            FilterKind::Distance => "distance",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "connectivity" => Ok(FilterKind::Connectivity),
            "distance" => Ok(FilterKind::Distance),
            other => Err(SeedError::InvalidFilterKind(other.to_string())),
        }
    }
}

/// Units that sample coordinates are converted into
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordinateMode {
    /// Physical units: voxel index multiplied by the voxel scale
    #[default]
    Absolute,
    /// Lattice units: voxel index divided by the lattice increment
    Step,
}

impl fmt::Display for CoordinateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CoordinateMode::Absolute => "absolute",
            CoordinateMode::Step => "step",
        })
    }
}

impl FromStr for CoordinateMode {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "absolute" => Ok(CoordinateMode::Absolute),
            "step" => Ok(CoordinateMode::Step),
            other => Err(SeedError::InvalidCoordinateMode(other.to_string())),
        }
    }
}

/// Voxel neighbourhood used as the dilation structuring element
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    /// 6 neighbours sharing a face
    #[default]
    Face,
    /// 18 neighbours sharing a face or an edge
    Edge,
    /// 26 neighbours sharing a face, an edge or a corner
    Corner,
}

impl Connectivity {
    /// Offsets `(dz, dy, dx)` of every neighbour in this neighbourhood
    pub fn offsets(self) -> Vec<(isize, isize, isize)> {
        let max_steps = match self {
            Connectivity::Face => 1,
            Connectivity::Edge => 2,
            Connectivity::Corner => 3,
        };

        let mut offsets = Vec::new();
        for dz in -1..=1isize {
            for dy in -1..=1isize {
                for dx in -1..=1isize {
                    let steps = dz.abs() + dy.abs() + dx.abs();
                    if steps > 0 && steps <= max_steps {
                        offsets.push((dz, dy, dx));
                    }
                }
            }
        }
        offsets
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Connectivity::Face => "face",
            Connectivity::Edge => "edge",
            Connectivity::Corner => "corner",
        })
    }
}

impl FromStr for Connectivity {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "face" => Ok(Connectivity::Face),
            "edge" => Ok(Connectivity::Edge),
            "corner" => Ok(Connectivity::Corner),
            other => Err(SeedError::InvalidConnectivity(other.to_string())),
        }
    }
}

fn require_positive(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SeedError::InvalidConfig(format!(
            "{} must be positive and finite (got {})",
            name, value
        )));
    }
    Ok(value)
}

fn require_non_negative(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(SeedError::InvalidConfig(format!(
            "{} must be >= 0 and finite (got {})",
            name, value
        )));
    }
    Ok(value)
}

/// Configuration for turning a physical sampling resolution into voxel sample indices
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::*;
///
/// let config = SamplingConfigBuilder::new()
///     .grid(GridKind::Hex)
///     .resolution(2.0).unwrap()
///     .scale_xy(1.0).unwrap()
///     .scale_z(0.5).unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.increment_xy(), 2.0);
/// assert_eq!(config.increment_z(), 4.0);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    /// Lattice layout
    pub grid: GridKind,

    /// Distance between samples in physical units (e.g. um)
    pub resolution: f64,

    /// Physical size of one voxel in x and y (e.g. um/pixel)
    pub scale_xy: f64,

    /// Physical size of one voxel in z
    pub scale_z: f64,

    /// Units that sampled coordinates are converted into
    pub coordinate_mode: CoordinateMode,
}

impl SamplingConfig {
    /// Lattice step in x/y, in voxels
    #[inline]
    pub fn increment_xy(&self) -> f64 {
        crate::generation::increment_for(self.resolution, self.scale_xy)
    }

    /// Lattice step in z, in voxels
    #[inline]
    pub fn increment_z(&self) -> f64 {
        crate::generation::increment_for(self.resolution, self.scale_z)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfigBuilder::new().build_unchecked()
    }
}

/// Builder for creating SamplingConfig with validation
#[derive(Debug, Clone)]
pub struct SamplingConfigBuilder {
    grid: GridKind,
    resolution: f64,
    scale_xy: f64,
    scale_z: f64,
    coordinate_mode: CoordinateMode,
}

impl SamplingConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - grid: Rect
    /// - resolution: 1.0
    /// - scale_xy / scale_z: 1.0
    /// - coordinate_mode: Absolute
    pub fn new() -> Self {
        Self {
            grid: GridKind::default(),
            resolution: 1.0,
            scale_xy: 1.0,
            scale_z: 1.0,
            coordinate_mode: CoordinateMode::default(),
        }
    }

    /// Set the lattice layout
    pub fn grid(mut self, grid: GridKind) -> Self {
        self.grid = grid;
        self
    }

    /// Set the sampling resolution in physical units
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if resolution is not positive and finite
    pub fn resolution(mut self, resolution: f64) -> Result<Self> {
        self.resolution = require_positive("resolution", resolution)?;
        Ok(self)
    }

    /// Set the voxel scale in x/y
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if scale is not positive and finite
    pub fn scale_xy(mut self, scale: f64) -> Result<Self> {
        self.scale_xy = require_positive("scale_xy", scale)?;
        Ok(self)
    }

    /// Set the voxel scale in z
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if scale is not positive and finite
    pub fn scale_z(mut self, scale: f64) -> Result<Self> {
        self.scale_z = require_positive("scale_z", scale)?;
        Ok(self)
    }

    /// Set the units sampled coordinates are converted into
    pub fn coordinate_mode(mut self, mode: CoordinateMode) -> Self {
        self.coordinate_mode = mode;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the resolution is so small relative to the voxel scale
    /// that a lattice increment rounds to zero voxels.
    pub fn build(self) -> Result<SamplingConfig> {
        let config = self.build_unchecked();
        for (axis, increment) in [("xy", config.increment_xy()), ("z", config.increment_z())] {
            if increment < 1.0 {
                return Err(SeedError::InvalidConfig(format!(
                    "resolution {} rounds to a zero {} increment",
                    config.resolution, axis
                )));
            }
        }
        Ok(config)
    }

    fn build_unchecked(self) -> SamplingConfig {
        SamplingConfig {
            grid: self.grid,
            resolution: self.resolution,
            scale_xy: self.scale_xy,
            scale_z: self.scale_z,
            coordinate_mode: self.coordinate_mode,
        }
    }
}

impl Default for SamplingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for Voronoi labeling of a partially labeled volume
///
/// The boundary mask grows labeled content by `dilation_iterations` steps of the
/// `dilation_connectivity` structuring element. When the labeled content spans fewer than
/// `target_height` z-layers the mask is padded symmetrically up to that height.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoronoiConfig {
    /// Number of dilation steps used to grow the boundary mask
    pub dilation_iterations: usize,

    /// Structuring element used for each dilation step
    pub dilation_connectivity: Connectivity,

    /// Minimum number of z-layers in the labeled region (0 keeps the natural span)
    pub target_height: usize,
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        VoronoiConfigBuilder::new().build()
    }
}

/// Builder for creating VoronoiConfig with validation
#[derive(Debug, Clone)]
pub struct VoronoiConfigBuilder {
    dilation_iterations: usize,
    dilation_connectivity: Connectivity,
    target_height: usize,
}

impl VoronoiConfigBuilder {
    /// Maximum accepted number of dilation iterations
    pub const MAX_DILATION_ITERATIONS: usize = 64;

    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - dilation_iterations: 2
    /// - dilation_connectivity: Face
    /// - target_height: 0 (natural span)
    pub fn new() -> Self {
        Self {
            dilation_iterations: 2,
            dilation_connectivity: Connectivity::default(),
            target_height: 0,
        }
    }

    /// Set the number of dilation steps
    ///
    /// Zero disables dilation, so the mask is just the labeled voxels with holes filled.
    /// There is no "dilate until stable" mode; each iteration is one explicit step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 64
    pub fn dilation_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > Self::MAX_DILATION_ITERATIONS {
            return Err(SeedError::InvalidConfig(format!(
                "dilation iterations must be <= {} (got {})",
                Self::MAX_DILATION_ITERATIONS,
                iterations
            )));
        }
        self.dilation_iterations = iterations;
        Ok(self)
    }

    /// Set the dilation structuring element
    pub fn dilation_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.dilation_connectivity = connectivity;
        self
    }

    /// Set the minimum height of the labeled region in z-layers
    pub fn target_height(mut self, height: usize) -> Self {
        self.target_height = height;
        self
    }

    /// Build the configuration
    pub fn build(self) -> VoronoiConfig {
        VoronoiConfig {
            dilation_iterations: self.dilation_iterations,
            dilation_connectivity: self.dilation_connectivity,
            target_height: self.target_height,
        }
    }
}

impl Default for VoronoiConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of the domain-edge filter
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFilter {
    /// Number of edge positions on one axis above which an id is an edge region
    pub threshold: usize,
    /// Distance from the axis limits within which a position counts as an edge position
    pub padding: f64,
}

/// Configuration for cleaning a sampled point cloud
///
/// Every stage is optional. Stages run in field order: inclusion, exclusion,
/// unconnected-region filtering, edge filtering.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationConfig {
    /// Keep only these ids (all ids when `None`)
    pub include_ids: Option<Vec<u64>>,

    /// Drop these ids
    pub exclude_ids: Vec<u64>,

    /// Strategy for removing disconnected fragments
    pub unconnected_filter: Option<FilterKind>,

    /// Neighbour distance used by [`FilterKind::Distance`]
    pub unconnected_threshold: f64,

    /// Domain-edge filter parameters
    pub edge_filter: Option<EdgeFilter>,
}

/// Builder for creating ValidationConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_seeds::*;
///
/// let config = ValidationConfigBuilder::new()
///     .unconnected_filter(FilterKind::Distance, 1.5).unwrap()
///     .edge_filter(1, 0.0).unwrap()
///     .exclude_ids([7, 9])
///     .build();
///
/// assert_eq!(config.unconnected_filter, Some(FilterKind::Distance));
/// assert_eq!(config.exclude_ids, vec![7, 9]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationConfigBuilder {
    config: ValidationConfig,
}

impl ValidationConfigBuilder {
    /// Create a builder with every stage disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the given ids
    pub fn include_ids(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.config.include_ids = Some(ids.into_iter().collect());
        self
    }

    /// Drop the given ids
    pub fn exclude_ids(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.config.exclude_ids = ids.into_iter().collect();
        self
    }

    /// Enable unconnected-region removal
    ///
    /// The threshold is only read by [`FilterKind::Distance`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative or not finite
    pub fn unconnected_filter(mut self, kind: FilterKind, threshold: f64) -> Result<Self> {
        self.config.unconnected_threshold = require_non_negative("unconnected threshold", threshold)?;
        self.config.unconnected_filter = Some(kind);
        Ok(self)
    }

    /// Enable domain-edge removal
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if padding is negative or not finite
    pub fn edge_filter(mut self, threshold: usize, padding: f64) -> Result<Self> {
        let padding = require_non_negative("edge padding", padding)?;
        self.config.edge_filter = Some(EdgeFilter { threshold, padding });
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> ValidationConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("rect".parse::<GridKind>().unwrap(), GridKind::Rect);
        assert_eq!("hex".parse::<GridKind>().unwrap(), GridKind::Hex);
        assert!(matches!(
            "invalid_grid".parse::<GridKind>(),
            Err(SeedError::InvalidGridKind(tag)) if tag == "invalid_grid"
        ));

        assert_eq!("distance".parse::<FilterKind>().unwrap(), FilterKind::Distance);
        assert!(matches!(
            "invalid_filter".parse::<FilterKind>(),
            Err(SeedError::InvalidFilterKind(_))
        ));

        assert_eq!("step".parse::<CoordinateMode>().unwrap(), CoordinateMode::Step);
        assert!("pixels".parse::<CoordinateMode>().is_err());
        assert_eq!("corner".parse::<Connectivity>().unwrap(), Connectivity::Corner);
        assert!("diagonal".parse::<Connectivity>().is_err());
    }

    #[test]
    fn test_kind_display_round_trips() {
        for kind in [GridKind::Rect, GridKind::Hex] {
            assert_eq!(kind.to_string().parse::<GridKind>().unwrap(), kind);
        }
        for kind in [FilterKind::Connectivity, FilterKind::Distance] {
            assert_eq!(kind.to_string().parse::<FilterKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_connectivity_offsets() {
        assert_eq!(Connectivity::Face.offsets().len(), 6);
        assert_eq!(Connectivity::Edge.offsets().len(), 18);
        assert_eq!(Connectivity::Corner.offsets().len(), 26);
        assert!(!Connectivity::Corner.offsets().contains(&(0, 0, 0)));
    }

    #[test]
    fn test_sampling_builder_defaults() {
        let config = SamplingConfigBuilder::new().build().unwrap();
        assert_eq!(config.grid, GridKind::Rect);
        assert_eq!(config.increment_xy(), 1.0);
        assert_eq!(config.increment_z(), 1.0);
        assert_eq!(config.coordinate_mode, CoordinateMode::Absolute);
    }

    #[test]
    fn test_sampling_builder_increments() {
        let config = SamplingConfigBuilder::new()
            .resolution(2.0)
            .unwrap()
            .scale_xy(1.0)
            .unwrap()
            .scale_z(0.5)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.increment_xy(), 2.0);
        assert_eq!(config.increment_z(), 4.0);
    }

    #[test]
    fn test_sampling_builder_rejects_invalid_values() {
        assert!(SamplingConfigBuilder::new().resolution(0.0).is_err());
        assert!(SamplingConfigBuilder::new().scale_xy(-1.0).is_err());
        assert!(SamplingConfigBuilder::new().scale_z(f64::NAN).is_err());

        // 0.4 / 1.0 rounds to a zero-voxel step
        let result = SamplingConfigBuilder::new()
            .resolution(0.4)
            .unwrap()
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_voronoi_builder() {
        let config = VoronoiConfigBuilder::new()
            .dilation_iterations(3)
            .unwrap()
            .dilation_connectivity(Connectivity::Edge)
            .target_height(8)
            .build();

        assert_eq!(config.dilation_iterations, 3);
        assert_eq!(config.dilation_connectivity, Connectivity::Edge);
        assert_eq!(config.target_height, 8);

        assert!(VoronoiConfigBuilder::new().dilation_iterations(65).is_err());
        let limit = VoronoiConfigBuilder::MAX_DILATION_ITERATIONS;
        assert!(VoronoiConfigBuilder::new().dilation_iterations(limit).is_ok());
        let none = VoronoiConfigBuilder::new().dilation_iterations(0).unwrap().build();
        assert_eq!(none.dilation_iterations, 0);
        assert_eq!(VoronoiConfig::default().dilation_iterations, 2);
    }

    #[test]
    fn test_validation_builder() {
        let config = ValidationConfigBuilder::new()
            .include_ids([1, 2, 3])
            .unconnected_filter(FilterKind::Connectivity, 0.0)
            .unwrap()
            .edge_filter(2, 1.0)
            .unwrap()
            .build();

        assert_eq!(config.include_ids, Some(vec![1, 2, 3]));
        assert_eq!(config.unconnected_filter, Some(FilterKind::Connectivity));
        assert_eq!(
            config.edge_filter,
            Some(EdgeFilter {
                threshold: 2,
                padding: 1.0
            })
        );

        assert!(ValidationConfigBuilder::new()
            .unconnected_filter(FilterKind::Distance, -1.0)
            .is_err());
        assert!(ValidationConfigBuilder::new().edge_filter(0, f64::INFINITY).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = SamplingConfigBuilder::new()
            .grid(GridKind::Hex)
            .resolution(3.0)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"hex\""));
        let restored: SamplingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);

        let validation = ValidationConfigBuilder::new()
            .unconnected_filter(FilterKind::Distance, 2.0)
            .unwrap()
            .build();
        let json = serde_json::to_string(&validation).unwrap();
        let restored: ValidationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(validation, restored);
    }
}
