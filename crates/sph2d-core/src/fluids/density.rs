use glam::Vec2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::fluids::smoothing_kernel;
use crate::grid::CellGrid;
use crate::particle::ParticleSet;

/// Density at `sample`, summed over the 3x3 cell block around it.
///
/// Every particle in the block contributes `mass * W(|predicted - sample|)`,
/// including a particle sitting exactly at `sample`: density is a field
/// sampled at a point, not an interaction between pairs.
pub fn density_at(
    grid: &CellGrid,
    particles: &ParticleSet,
    smoothing_radius: f32,
    sample: Vec2,
) -> f32 {
    let mut density = 0.0_f32;
    grid.query_neighbors(sample, |j| {
        let j = j as usize;
        let dst = particles.predicted[j].distance(sample);
        density += particles.mass[j] * smoothing_kernel(smoothing_radius, dst);
    });
    density
}

/// Refresh `particles.density` for every slot in `live`, sampling each
/// particle at its predicted position.
///
/// Reads only predicted positions and masses, so every value comes from the
/// same state regardless of evaluation order.
pub fn compute_densities(
    grid: &CellGrid,
    particles: &mut ParticleSet,
    smoothing_radius: f32,
    live: &[u32],
) {
    #[cfg(feature = "parallel")]
    {
        let shared: &ParticleSet = particles;
        let densities: Vec<f32> = live
            .par_iter()
            .map(|&i| density_at(grid, shared, smoothing_radius, shared.predicted[i as usize]))
            .collect();
        for (&i, density) in live.iter().zip(densities) {
            particles.density[i as usize] = density;
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        for &i in live {
            let i = i as usize;
            particles.density[i] =
                density_at(grid, particles, smoothing_radius, particles.predicted[i]);
        }
    }
}
