use crate::surface::{SurfaceSample, WaveModel};

/// Fixed-step loop pairing each `advance` with a `sample`.
///
/// Single-threaded: a host that overlaps simulation with rendering has to
/// double-buffer the returned samples itself.
#[derive(Debug, Clone)]
pub struct SimulationLoop<M: WaveModel> {
    model: M,
    dt: f32,
    frame: u64,
}

impl<M: WaveModel> SimulationLoop<M> {
    pub fn new(model: M, dt: f32) -> Self {
        SimulationLoop { model, dt, frame: 0 }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Frames produced so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance one frame and sample the result
    pub fn tick(&mut self) -> SurfaceSample {
        self.model.advance(self.dt);
        self.frame += 1;
        self.model.sample()
    }

    /// Run `frames` ticks, handing every sample to `consume`
    pub fn run<F>(&mut self, frames: u64, mut consume: F)
    where
        F: FnMut(u64, &SurfaceSample),
    {
        for _ in 0..frames {
            let sample = self.tick();
            consume(self.frame, &sample);
        }
    }
}
