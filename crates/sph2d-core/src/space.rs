//! The bounded simulation domain: particle arena, cell grid and walls kept
//! consistent with each other.

use glam::{UVec2, Vec2};
use rand::Rng;
use tracing::info;

use crate::boundary::Boundary;
use crate::config::FluidConfig;
use crate::error::{ConfigError, SpawnError};
use crate::fluids::density::{compute_densities, density_at};
use crate::fluids::pressure::{compute_gradients, pressure_gradient, PressureParams};
use crate::grid::CellGrid;
use crate::particle::{Particle, ParticleId, ParticleSet};

/// Outcome of moving one particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Relocation {
    /// The move overshot a wall and was clamped back.
    pub collided: bool,
    /// The particle ended up in a different cell.
    pub changed_cell: bool,
}

/// Particles, the grid indexing them and the walls containing them.
///
/// Every live particle is stored in exactly the cell its current position
/// maps to; all mutation goes through methods that keep that true.
pub struct SimulationSpace {
    particles: ParticleSet,
    grid: CellGrid,
    boundary: Boundary,
    params: PressureParams,
}

impl SimulationSpace {
    pub fn new(config: &FluidConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = CellGrid::new(
            config.boundary_width,
            config.boundary_height,
            config.cells_per_axis,
        );
        info!(
            columns = grid.columns(),
            rows = grid.rows(),
            cell_size = grid.cell_size(),
            smoothing_radius = config.smoothing_radius,
            "simulation space created"
        );

        Ok(Self {
            particles: ParticleSet::with_capacity(config.particle_capacity),
            grid,
            boundary: Boundary::new(
                config.boundary_width,
                config.boundary_height,
                config.particle_diameter,
                config.reflection_efficiency,
            ),
            params: PressureParams {
                smoothing_radius: config.smoothing_radius,
                target_density: config.target_density,
                pressure_multiplier: config.pressure_multiplier,
                friction: config.friction,
            },
        })
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn params(&self) -> &PressureParams {
        &self.params
    }

    pub fn target_density(&self) -> f32 {
        self.params.target_density
    }

    pub fn set_target_density(&mut self, density: f32) {
        self.params.target_density = density;
    }

    /// Add a particle and index it under its current position.
    pub fn insert(&mut self, position: Vec2, velocity: Vec2, mass: f32) -> Result<ParticleId, SpawnError> {
        if !position.is_finite() || !velocity.is_finite() {
            return Err(SpawnError::NonFinite);
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SpawnError::InvalidMass(mass));
        }

        let cell = self.grid.cell_index(position) as u32;
        let id = self.particles.insert(position, velocity, mass, cell);
        self.grid.insert(id.index() as u32, position);
        Ok(id)
    }

    /// Detach a particle from its cell and free it.
    pub fn remove(&mut self, id: ParticleId) -> Option<Particle> {
        let slot = self.particles.resolve(id)?;
        self.grid.remove(slot as u32, self.particles.cell[slot] as usize);
        Some(self.particles.free_slot(slot))
    }

    /// Move a particle to `position`, resolve wall collisions and reindex it.
    pub fn relocate(&mut self, id: ParticleId, position: Vec2) -> Option<Relocation> {
        let slot = self.particles.resolve(id)?;
        Some(self.relocate_slot(slot, position))
    }

    /// Slot-level [`SimulationSpace::relocate`]. The slot must be live.
    ///
    /// The new cell may be any distance from the old one.
    pub(crate) fn relocate_slot(&mut self, slot: usize, position: Vec2) -> Relocation {
        let mut position = position;
        let collided = self
            .boundary
            .resolve(&mut position, &mut self.particles.velocity[slot]);
        self.particles.position[slot] = position;

        let from = self.particles.cell[slot] as usize;
        let to = self.grid.cell_index(position);
        if from == to {
            return Relocation {
                collided,
                changed_cell: false,
            };
        }

        self.grid.transfer(slot as u32, from, to);
        self.particles.cell[slot] = to as u32;
        Relocation {
            collided,
            changed_cell: true,
        }
    }

    /// Density field value at `sample`.
    pub fn density_at(&self, sample: Vec2) -> f32 {
        density_at(&self.grid, &self.particles, self.params.smoothing_radius, sample)
    }

    /// Pressure force density plus viscosity on `id`, sampled at `sample`.
    pub fn pressure_gradient<R: Rng + ?Sized>(&self, id: ParticleId, sample: Vec2, rng: &mut R) -> Option<Vec2> {
        let slot = self.particles.resolve(id)?;
        Some(pressure_gradient(
            &self.grid,
            &self.particles,
            &self.params,
            sample,
            slot,
            rng,
        ))
    }

    /// Recompute the cached density of every live particle.
    pub fn refresh_densities(&mut self) {
        let live: Vec<u32> = self.particles.live_slots().map(|slot| slot as u32).collect();
        self.update_densities(&live);
    }

    pub(crate) fn update_densities(&mut self, live: &[u32]) {
        compute_densities(
            &self.grid,
            &mut self.particles,
            self.params.smoothing_radius,
            live,
        );
    }

    pub(crate) fn compute_gradients(&self, live: &[u32], step_seed: u64, out: &mut Vec<Vec2>) {
        compute_gradients(&self.grid, &self.particles, &self.params, live, step_seed, out);
    }

    pub(crate) fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    /// `(position, density)` of every live particle, in slot order.
    pub fn enumerate(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.particles
            .live_slots()
            .map(|slot| (self.particles.position[slot], self.particles.density[slot]))
    }

    pub fn active_cells(&self) -> impl Iterator<Item = UVec2> + '_ {
        self.grid.active_cells()
    }

    /// Free every particle. The grid shape and parameters are kept.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.particles.clear();
    }
}
