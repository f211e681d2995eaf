//! 2D smoothed-particle hydrodynamics on a uniform cell grid.
//!
//! [`Solver`] is the entry point: build it from a [`FluidConfig`], spawn
//! particles, and call [`Solver::step`] once per frame.

pub mod boundary;
pub mod config;
pub mod error;
pub mod fluids;
pub mod grid;
pub mod math;
pub mod particle;
pub mod solver;
pub mod space;
pub mod stats;

pub use config::FluidConfig;
pub use error::{ConfigError, SpawnError};
pub use particle::{Particle, ParticleId};
pub use solver::Solver;
pub use space::{Relocation, SimulationSpace};
pub use stats::StepStats;
