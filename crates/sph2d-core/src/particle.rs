use glam::Vec2;

/// Stable handle to a particle in a [`ParticleSet`].
///
/// The generation changes every time a slot is freed, so a handle to a
/// removed particle never resolves to whatever reuses its slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ParticleId {
    index: u32,
    generation: u32,
}

impl ParticleId {
    /// Arena slot this handle points at.
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Snapshot of one particle's state.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Particle {
    pub position: Vec2,
    /// One-step lookahead used only for neighbor sampling.
    pub predicted: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    pub density: f32,
}

/// SoA particle arena.
///
/// Slots are recycled through a free list. Per-slot data of a freed slot is
/// left in place and ignored until the slot is handed out again.
#[derive(Default)]
pub struct ParticleSet {
    pub position: Vec<Vec2>,
    /// Predicted positions for neighbor sampling
    pub predicted: Vec<Vec2>,
    pub velocity: Vec<Vec2>,
    pub mass: Vec<f32>,
    /// Density estimate from the latest density pass
    pub density: Vec<f32>,
    /// Flat index of the grid cell holding each slot
    pub(crate) cell: Vec<u32>,
    generation: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
    live: usize,
}

impl ParticleSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            position: Vec::with_capacity(capacity),
            predicted: Vec::with_capacity(capacity),
            velocity: Vec::with_capacity(capacity),
            mass: Vec::with_capacity(capacity),
            density: Vec::with_capacity(capacity),
            cell: Vec::with_capacity(capacity),
            generation: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots, live or free.
    pub fn slot_count(&self) -> usize {
        self.alive.len()
    }

    #[inline]
    pub fn is_live(&self, slot: usize) -> bool {
        self.alive.get(slot).copied().unwrap_or(false)
    }

    /// Slot indices of all live particles, in ascending order.
    pub fn live_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter_map(|(slot, &alive)| alive.then_some(slot))
    }

    /// Map a handle to its slot, or `None` if the particle was removed.
    pub fn resolve(&self, id: ParticleId) -> Option<usize> {
        let slot = id.index();
        (self.is_live(slot) && self.generation[slot] == id.generation).then_some(slot)
    }

    /// Handle of the particle currently occupying a live slot.
    pub fn id_of(&self, slot: usize) -> Option<ParticleId> {
        self.is_live(slot).then(|| ParticleId {
            index: slot as u32,
            generation: self.generation[slot],
        })
    }

    pub fn get(&self, id: ParticleId) -> Option<Particle> {
        self.resolve(id).map(|slot| self.snapshot(slot))
    }

    pub(crate) fn snapshot(&self, slot: usize) -> Particle {
        Particle {
            position: self.position[slot],
            predicted: self.predicted[slot],
            velocity: self.velocity[slot],
            mass: self.mass[slot],
            density: self.density[slot],
        }
    }

    /// Store a new particle whose position maps to `cell`.
    ///
    /// The predicted position starts at the current position.
    pub(crate) fn insert(&mut self, position: Vec2, velocity: Vec2, mass: f32, cell: u32) -> ParticleId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = index as usize;
            self.position[slot] = position;
            self.predicted[slot] = position;
            self.velocity[slot] = velocity;
            self.mass[slot] = mass;
            self.density[slot] = 0.0;
            self.cell[slot] = cell;
            self.alive[slot] = true;
            return ParticleId {
                index,
                generation: self.generation[slot],
            };
        }

        let index = self.alive.len() as u32;
        self.position.push(position);
        self.predicted.push(position);
        self.velocity.push(velocity);
        self.mass.push(mass);
        self.density.push(0.0);
        self.cell.push(cell);
        self.generation.push(0);
        self.alive.push(true);
        ParticleId {
            index,
            generation: 0,
        }
    }

    /// Free a live slot, returning the particle's final state.
    pub(crate) fn free_slot(&mut self, slot: usize) -> Particle {
        let particle = self.snapshot(slot);
        self.alive[slot] = false;
        self.generation[slot] = self.generation[slot].wrapping_add(1);
        self.free.push(slot as u32);
        self.live -= 1;
        particle
    }

    /// Free every particle.
    ///
    /// Slots stay allocated and keep their generations, so handles taken
    /// before the clear stay dead. Slots are handed out again lowest first.
    pub fn clear(&mut self) {
        self.free.clear();
        for slot in (0..self.alive.len()).rev() {
            if self.alive[slot] {
                self.alive[slot] = false;
                self.generation[slot] = self.generation[slot].wrapping_add(1);
            }
            self.free.push(slot as u32);
        }
        self.live = 0;
    }
}
