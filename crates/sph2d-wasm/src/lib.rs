use glam::Vec2;
use sph2d_core::{FluidConfig, ParticleId, Solver};
use wasm_bindgen::prelude::*;

/// GPU-compatible particle struct: 16 bytes, matches WGSL Particle
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuParticle {
    position: [f32; 2], //  8 bytes
    density: f32,       //  4 bytes
    _pad: f32,          //  4 bytes
}

#[wasm_bindgen]
pub struct FluidWorld {
    solver: Solver,
    handles: Vec<ParticleId>,
    gpu_buffer: Vec<GpuParticle>,
    /// Column/row pairs of occupied cells, flattened
    cell_buffer: Vec<u32>,
}

#[wasm_bindgen]
impl FluidWorld {
    /// Build a world with the default tuning. Without a seed, one is drawn
    /// from the platform RNG.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>) -> Result<FluidWorld, JsError> {
        let seed = match seed {
            Some(seed) => seed,
            None => {
                let mut bytes = [0u8; 8];
                getrandom::getrandom(&mut bytes).map_err(|e| JsError::new(&e.to_string()))?;
                u64::from_le_bytes(bytes)
            }
        };

        let config = FluidConfig {
            seed,
            ..FluidConfig::default()
        };
        let solver = Solver::new(config).map_err(|e| JsError::new(&e.to_string()))?;

        web_sys::console::log_1(
            &format!(
                "WASM FluidWorld created: {} cells of {}px, seed {}",
                solver.cell_count(),
                solver.cell_size(),
                seed
            )
            .into(),
        );

        Ok(FluidWorld {
            solver,
            handles: Vec::new(),
            gpu_buffer: Vec::new(),
            cell_buffer: Vec::new(),
        })
    }

    /// Spawn one particle; returns its index in the particle buffer.
    #[wasm_bindgen]
    pub fn spawn(&mut self, x: f32, y: f32, vx: f32, vy: f32, mass: f32) -> Result<usize, JsError> {
        let id = self
            .solver
            .spawn_particle(Vec2::new(x, y), Vec2::new(vx, vy), mass)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.handles.push(id);
        self.write_gpu_output();
        Ok(self.handles.len() - 1)
    }

    #[wasm_bindgen]
    pub fn spawn_block(&mut self, count: usize, spacing: f32, mass: f32) -> Result<(), JsError> {
        let ids = self
            .solver
            .spawn_block(count, spacing, mass)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.handles.extend(ids);
        self.write_gpu_output();
        Ok(())
    }

    /// Remove the particle at `index` in the particle buffer. The last
    /// particle takes its place.
    #[wasm_bindgen]
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.handles.len() {
            return false;
        }
        let id = self.handles.swap_remove(index);
        let removed = self.solver.remove_particle(id).is_some();
        self.write_gpu_output();
        removed
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.solver.clear();
        self.handles.clear();
        self.write_gpu_output();
    }

    /// Advance by `dt` seconds and refresh the output buffers. Returns the
    /// time spent in milliseconds.
    #[wasm_bindgen]
    pub fn step(&mut self, dt: f32) -> f32 {
        let start = js_sys::Date::now();
        self.solver.step(dt);
        self.write_gpu_output();
        let elapsed = js_sys::Date::now() - start;
        elapsed as f32
    }

    #[wasm_bindgen]
    pub fn target_density(&self) -> f32 {
        self.solver.target_density()
    }

    #[wasm_bindgen]
    pub fn set_target_density(&mut self, density: f32) {
        self.solver.set_target_density(density);
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.handles.len()
    }

    #[wasm_bindgen]
    pub fn cell_size(&self) -> f32 {
        self.solver.cell_size()
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_ptr(&self) -> *const f32 {
        self.gpu_buffer.as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_byte_length(&self) -> usize {
        std::mem::size_of_val(self.gpu_buffer.as_slice())
    }

    #[wasm_bindgen]
    pub fn get_active_cells_ptr(&self) -> *const u32 {
        self.cell_buffer.as_ptr()
    }

    /// Number of occupied cells (the cell buffer holds two `u32` per cell).
    #[wasm_bindgen]
    pub fn active_cell_count(&self) -> usize {
        self.cell_buffer.len() / 2
    }
}

impl FluidWorld {
    fn write_gpu_output(&mut self) {
        self.gpu_buffer.clear();
        for &id in &self.handles {
            if let Some(p) = self.solver.particle(id) {
                self.gpu_buffer.push(GpuParticle {
                    position: p.position.to_array(),
                    density: p.density,
                    _pad: 0.0,
                });
            }
        }

        self.cell_buffer.clear();
        for cell in self.solver.active_cells() {
            self.cell_buffer.extend_from_slice(&[cell.x, cell.y]);
        }
    }
}
