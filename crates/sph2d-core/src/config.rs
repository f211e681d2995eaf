#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::{CellGrid, MAX_CELLS};

/// Construction parameters for a [`Solver`](crate::solver::Solver).
///
/// Units are screen pixels and seconds; +y points down, so a positive
/// `gravity` pulls particles toward the bottom of the domain.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FluidConfig {
    /// Full width of the bounded domain, centred on the origin.
    pub boundary_width: f32,
    /// Full height of the bounded domain, centred on the origin.
    pub boundary_height: f32,
    /// Grid columns. Cell size is `boundary_width / cells_per_axis`.
    pub cells_per_axis: u32,
    /// Kernel support radius. Must not exceed the cell size.
    pub smoothing_radius: f32,
    /// Fraction of speed kept on a wall bounce (0 absorbs, 1 is elastic).
    pub reflection_efficiency: f32,
    /// Particle diameter; walls sit half a diameter inside the domain edge.
    pub particle_diameter: f32,
    /// Rest density of the equation of state. Live-tunable after construction.
    pub target_density: f32,
    /// Stiffness of the equation of state.
    pub pressure_multiplier: f32,
    /// Viscosity coefficient toward the neighbor velocity average.
    pub friction: f32,
    /// Vertical acceleration applied every step.
    pub gravity: f32,
    /// Multiplier applied to the host's elapsed time.
    pub speed: f32,
    /// Arena slots reserved up front.
    pub particle_capacity: usize,
    /// Seed for every random draw the simulation makes.
    pub seed: u64,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            boundary_width: 900.0,
            boundary_height: 900.0,
            cells_per_axis: 10,
            smoothing_radius: 90.0,
            reflection_efficiency: 0.2,
            particle_diameter: 4.0,
            target_density: 1000.0,
            pressure_multiplier: 10000.0,
            friction: 1.0,
            gravity: 1000.0,
            speed: 1.0,
            particle_capacity: 700,
            seed: 0,
        }
    }
}

impl FluidConfig {
    /// Side length of one square grid cell.
    pub fn cell_size(&self) -> f32 {
        self.boundary_width / self.cells_per_axis.max(1) as f32
    }

    /// Check every parameter, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.boundary_width, self.boundary_height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidDomain { width, height });
        }
        if self.cells_per_axis == 0 {
            return Err(ConfigError::NoCells);
        }
        let rows = CellGrid::row_count(width, height, self.cells_per_axis);
        let cells = (self.cells_per_axis as usize).checked_mul(rows as usize);
        if !cells.is_some_and(|cells| cells <= MAX_CELLS) {
            return Err(ConfigError::TooManyCells {
                columns: self.cells_per_axis,
                rows,
                max: MAX_CELLS,
            });
        }

        let scalars = [
            ("smoothing_radius", self.smoothing_radius),
            ("reflection_efficiency", self.reflection_efficiency),
            ("particle_diameter", self.particle_diameter),
            ("target_density", self.target_density),
            ("pressure_multiplier", self.pressure_multiplier),
            ("friction", self.friction),
            ("gravity", self.gravity),
            ("speed", self.speed),
        ];
        if let Some(&(name, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { name, value });
        }

        let diameter = self.particle_diameter;
        if diameter < 0.0 || diameter >= width || diameter >= height {
            return Err(ConfigError::ParticleTooLarge {
                diameter,
                width,
                height,
            });
        }

        let cell_size = self.cell_size();
        if self.smoothing_radius <= 0.0 || self.smoothing_radius > cell_size {
            return Err(ConfigError::SmoothingRadius {
                radius: self.smoothing_radius,
                cell_size,
            });
        }

        if !(0.0..=1.0).contains(&self.reflection_efficiency) {
            return Err(ConfigError::ReflectionEfficiency(self.reflection_efficiency));
        }

        Ok(())
    }
}
