use glam::Vec2;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;

/// Uniformly distributed unit vector (uniform angle, no axis bias).
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::from_angle(rng.gen_range(0.0..TAU))
}

/// Offset with each component uniform in `[-extent, extent)`.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> Vec2 {
    Vec2::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

/// Random stream private to one particle for one step.
///
/// Seeded from a per-step seed and the particle's slot, so draws do not
/// depend on the order (or thread) particles are processed in. The ChaCha
/// state is only built on first use; most particles never draw.
pub struct ParticleStream {
    seed: u64,
    stream: u64,
    rng: Option<ChaCha8Rng>,
}

impl ParticleStream {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self {
            seed,
            stream,
            rng: None,
        }
    }

    fn rng(&mut self) -> &mut ChaCha8Rng {
        let (seed, stream) = (self.seed, self.stream);
        self.rng.get_or_insert_with(move || {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(stream);
            rng
        })
    }
}

impl RngCore for ParticleStream {
    fn next_u32(&mut self) -> u32 {
        self.rng().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng().try_fill_bytes(dest)
    }
}
