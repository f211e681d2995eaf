use glam::Vec2;
use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::fluids::smoothing_kernel_derivative;
use crate::grid::CellGrid;
use crate::math::{random_unit_vector, ParticleStream};
use crate::particle::ParticleSet;

/// Equation of state and viscosity parameters for the force pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressureParams {
    pub smoothing_radius: f32,
    pub target_density: f32,
    pub pressure_multiplier: f32,
    pub friction: f32,
}

impl PressureParams {
    /// Linear equation of state. Negative below the target density.
    #[inline]
    pub fn density_to_pressure(&self, density: f32) -> f32 {
        (density - self.target_density) * self.pressure_multiplier
    }

    /// Mean of the two pressures, so a pair pushes on each other equally.
    #[inline]
    pub fn shared_pressure(&self, density_a: f32, density_b: f32) -> f32 {
        (self.density_to_pressure(density_a) + self.density_to_pressure(density_b)) * 0.5
    }
}

/// Pressure force density on the particle in `slot`, sampled at `sample`,
/// plus its viscosity term.
///
/// Every other particle in the 3x3 cell block contributes
/// `shared_pressure * m_j * W'(d) * dir / rho_j`, where `dir` points from
/// `sample` toward the neighbor's position. Coincident particles get a
/// direction drawn from `rng`. The particle itself never contributes.
///
/// Viscosity pulls the particle's velocity toward the `W'`-weighted mean of
/// its neighbors' velocities, scaled by `friction`. With no neighbors the
/// mean is zero.
///
/// Divide the result by the particle's own density to get an acceleration.
pub fn pressure_gradient<R: Rng + ?Sized>(
    grid: &CellGrid,
    particles: &ParticleSet,
    params: &PressureParams,
    sample: Vec2,
    slot: usize,
    rng: &mut R,
) -> Vec2 {
    let density_i = particles.density[slot];
    let mut gradient = Vec2::ZERO;
    let mut velocity_sum = Vec2::ZERO;
    let mut neighbor_count = 0_u32;

    grid.query_neighbors(sample, |j| {
        let j = j as usize;
        if j == slot {
            return;
        }

        let offset = particles.position[j] - sample;
        let dst = offset.length();
        let dir = if dst != 0.0 {
            offset / dst
        } else {
            random_unit_vector(&mut *rng)
        };

        let slope = smoothing_kernel_derivative(params.smoothing_radius, dst);
        let density_j = particles.density[j];
        let shared = params.shared_pressure(density_i, density_j);

        gradient += shared * particles.mass[j] * slope * dir / density_j;
        velocity_sum += particles.velocity[j] * slope;
        neighbor_count += 1;
    });

    let mean_velocity = if neighbor_count > 0 {
        velocity_sum / neighbor_count as f32
    } else {
        Vec2::ZERO
    };

    gradient + (mean_velocity - particles.velocity[slot]) * params.friction
}

/// Evaluate [`pressure_gradient`] for every slot in `live` at its predicted
/// position, writing results to `out` in the same order.
///
/// Tie-break draws come from a [`ParticleStream`] keyed on `step_seed` and
/// the slot, so the output is the same with or without `parallel`.
pub fn compute_gradients(
    grid: &CellGrid,
    particles: &ParticleSet,
    params: &PressureParams,
    live: &[u32],
    step_seed: u64,
    out: &mut Vec<Vec2>,
) {
    let gradient_of = |&i: &u32| {
        let slot = i as usize;
        let mut rng = ParticleStream::new(step_seed, i as u64);
        pressure_gradient(grid, particles, params, particles.predicted[slot], slot, &mut rng)
    };

    out.clear();

    #[cfg(feature = "parallel")]
    out.par_extend(live.par_iter().map(gradient_of));

    #[cfg(not(feature = "parallel"))]
    out.extend(live.iter().map(gradient_of));
}
