/// Counters from a single simulation step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepStats {
    /// Time advanced, after the speed factor.
    pub dt: f32,
    /// Number of live particles.
    pub particle_count: u32,
    /// Cells holding at least one particle after the step.
    pub active_cells: u32,
    /// Particles clamped back inside the walls.
    pub collisions: u32,
    /// Particles that ended the step in a different cell.
    pub cell_transfers: u32,
    /// Particles whose candidate position was not finite and were reset.
    pub recovered: u32,
}
