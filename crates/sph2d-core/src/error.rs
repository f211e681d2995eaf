//! Error types for sph2d-core.

use thiserror::Error;

/// Errors raised while validating a [`FluidConfig`](crate::config::FluidConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Boundary width or height is non-positive or not finite.
    #[error("invalid domain: {width} x {height}")]
    InvalidDomain {
        /// Boundary width.
        width: f32,
        /// Boundary height.
        height: f32,
    },

    /// The grid needs at least one cell per axis.
    #[error("cells per axis must be at least 1")]
    NoCells,

    /// The grid shape would allocate more cells than the grid allows.
    #[error("a {columns} x {rows} grid exceeds the limit of {max} cells")]
    TooManyCells {
        /// Requested cells per row.
        columns: u32,
        /// Rows needed to cover the domain height.
        rows: u32,
        /// Largest allowed cell count.
        max: usize,
    },

    /// Particles must fit inside the domain on both axes.
    #[error("particle diameter {diameter} does not fit a {width} x {height} domain")]
    ParticleTooLarge {
        /// Configured particle diameter.
        diameter: f32,
        /// Boundary width.
        width: f32,
        /// Boundary height.
        height: f32,
    },

    /// The 3x3 neighbor block only covers the kernel support when the
    /// smoothing radius is positive and no larger than a cell.
    #[error("smoothing radius {radius} must be in (0, {cell_size}] (the cell size)")]
    SmoothingRadius {
        /// Configured smoothing radius.
        radius: f32,
        /// Derived cell size.
        cell_size: f32,
    },

    /// Reflection efficiency is a fraction of the incoming speed.
    #[error("reflection efficiency {0} is outside [0, 1]")]
    ReflectionEfficiency(f32),

    /// A scalar parameter is NaN or infinite.
    #[error("parameter `{name}` is not finite: {value}")]
    NonFinite {
        /// Field name in the config.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
}

/// Errors raised when a particle cannot be spawned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    /// Position or velocity has a NaN or infinite component.
    #[error("particle state is not finite")]
    NonFinite,

    /// Mass must be positive for the density estimate to stay positive.
    #[error("particle mass must be positive and finite, got {0}")]
    InvalidMass(f32),
}
