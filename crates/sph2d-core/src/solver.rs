use glam::{UVec2, Vec2};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use crate::config::FluidConfig;
use crate::error::{ConfigError, SpawnError};
use crate::math::jitter;
use crate::particle::{Particle, ParticleId};
use crate::space::SimulationSpace;
use crate::stats::StepStats;

/// Per-axis range of the offset given to a particle reset after its
/// integration blew up.
const RECOVERY_JITTER: f32 = 10.0;

/// SPH integrator and the host-facing API of the simulation.
pub struct Solver {
    space: SimulationSpace,
    config: FluidConfig,
    rng: ChaCha8Rng,
    /// Live slots captured at the start of a step
    live: Vec<u32>,
    /// Force density per entry of `live`
    gradients: Vec<Vec2>,
}

impl Solver {
    /// Validate `config` and build an empty simulation.
    pub fn new(config: FluidConfig) -> Result<Self, ConfigError> {
        let space = SimulationSpace::new(&config)?;
        Ok(Self {
            space,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            live: Vec::with_capacity(config.particle_capacity),
            gradients: Vec::with_capacity(config.particle_capacity),
            config,
        })
    }

    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    pub fn space(&self) -> &SimulationSpace {
        &self.space
    }

    pub fn len(&self) -> usize {
        self.space.particles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.space.particles().is_empty()
    }

    pub fn cell_size(&self) -> f32 {
        self.space.grid().cell_size()
    }

    pub fn cell_count(&self) -> usize {
        self.space.grid().cell_count()
    }

    pub fn target_density(&self) -> f32 {
        self.space.target_density()
    }

    pub fn set_target_density(&mut self, density: f32) {
        self.space.set_target_density(density);
    }

    /// Add a particle and index it immediately.
    pub fn spawn_particle(&mut self, position: Vec2, velocity: Vec2, mass: f32) -> Result<ParticleId, SpawnError> {
        self.space.insert(position, velocity, mass)
    }

    /// Spawn `count` particles at rest on a lattice centred on the origin,
    /// `floor(sqrt(count))` per row.
    pub fn spawn_block(&mut self, count: usize, spacing: f32, mass: f32) -> Result<Vec<ParticleId>, SpawnError> {
        if !spacing.is_finite() {
            return Err(SpawnError::NonFinite);
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SpawnError::InvalidMass(mass));
        }

        let per_row = ((count as f32).sqrt() as usize).max(1);
        let rows = count.saturating_sub(1) / per_row + 1;
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let x = ((i % per_row) as f32 - (per_row / 2) as f32 + 0.5) * spacing;
            let y = ((i / per_row) as f32 - (rows / 2) as f32 + 0.5) * spacing;
            ids.push(self.space.insert(Vec2::new(x, y), Vec2::ZERO, mass)?);
        }
        debug!(count, per_row, rows, spacing, "spawned particle block");
        Ok(ids)
    }

    /// Remove a particle, returning its final state.
    pub fn remove_particle(&mut self, id: ParticleId) -> Option<Particle> {
        self.space.remove(id)
    }

    pub fn particle(&self, id: ParticleId) -> Option<Particle> {
        self.space.particles().get(id)
    }

    /// `(position, density)` of every live particle.
    pub fn particles(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.space.enumerate()
    }

    /// Grid coordinates of every cell holding at least one particle.
    pub fn active_cells(&self) -> impl Iterator<Item = UVec2> + '_ {
        self.space.active_cells()
    }

    /// Free every particle.
    pub fn clear(&mut self) {
        self.space.clear();
    }

    /// Advance the simulation by `dt * speed` seconds.
    ///
    /// Densities are refreshed for every particle before any force is
    /// evaluated. Forces are then computed against that one snapshot, and
    /// only afterwards are particles integrated and moved through the grid.
    /// A negative or non-finite time step is skipped.
    pub fn step(&mut self, dt: f32) -> StepStats {
        let sim_dt = dt * self.config.speed;
        if !sim_dt.is_finite() || sim_dt < 0.0 {
            warn!(dt, speed = self.config.speed, "skipping step with invalid time delta");
            return StepStats::default();
        }

        self.live.clear();
        self.live
            .extend(self.space.particles().live_slots().map(|slot| slot as u32));

        // Pass 1: density at each predicted position
        self.space.update_densities(&self.live);

        // Pass 2: gravity, then forces from a single snapshot
        let gravity = self.config.gravity;
        let particles = self.space.particles_mut();
        for &i in &self.live {
            particles.velocity[i as usize].y += gravity * sim_dt;
        }

        let step_seed = self.rng.next_u64();
        self.space
            .compute_gradients(&self.live, step_seed, &mut self.gradients);

        let mut stats = StepStats {
            dt: sim_dt,
            particle_count: self.live.len() as u32,
            ..Default::default()
        };

        // Integrate and reindex; the only structural mutation of the step
        for (&i, &gradient) in self.live.iter().zip(&self.gradients) {
            let slot = i as usize;
            let particles = self.space.particles_mut();

            let acceleration = gradient / particles.density[slot];
            let mut velocity = particles.velocity[slot] + acceleration * sim_dt;
            let mut candidate = particles.position[slot] + velocity * sim_dt;

            if !candidate.is_finite() {
                let predicted = particles.predicted[slot];
                let base = if predicted.is_finite() {
                    predicted
                } else {
                    particles.position[slot]
                };
                candidate = base + jitter(&mut self.rng, RECOVERY_JITTER);
                velocity = Vec2::ZERO;
                stats.recovered += 1;
                trace!(slot, x = candidate.x, y = candidate.y, "reset unstable particle");
            }
            particles.velocity[slot] = velocity;

            let moved = self.space.relocate_slot(slot, candidate);
            stats.collisions += moved.collided as u32;
            stats.cell_transfers += moved.changed_cell as u32;

            let particles = self.space.particles_mut();
            particles.predicted[slot] = particles.position[slot] + particles.velocity[slot] * sim_dt;
        }

        stats.active_cells = self.space.active_cells().count() as u32;
        debug!(
            dt = stats.dt,
            particles = stats.particle_count,
            active_cells = stats.active_cells,
            collisions = stats.collisions,
            cell_transfers = stats.cell_transfers,
            recovered = stats.recovered,
            "step complete"
        );
        if stats.recovered > 0 {
            warn!(recovered = stats.recovered, "reset particles with non-finite positions");
        }
        stats
    }
}
