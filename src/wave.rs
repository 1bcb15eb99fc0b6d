use std::f32::consts::PI;
use std::sync::Arc;

use glam::Vec2;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{require_positive, SurfaceError};
use crate::lattice::Lattice;
use crate::surface::{accept_dt, SurfaceSample, WaveModel};

/// Parameters for a single plane wave component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveComponent {
    pub wave_vector: Vec2,
    pub angular_frequency: f32,
    pub phase: f32,
    pub amplitude: f32,
}

impl WaveComponent {
    /// Phase argument `φ + k·p + ω·t`
    #[inline]
    fn argument(&self, p: Vec2, t: f32) -> f32 {
        self.phase + self.wave_vector.dot(p) + self.angular_frequency * t
    }
}

/// Configuration for randomly drawn plane waves
#[derive(Debug, Clone)]
pub struct PlaneWavesConfig {
    pub count: usize,              // Number of superposed components
    pub max_height: f32,           // Upper bound on total displacement
    pub max_wave_number: f32,      // Bound on each wave vector coordinate
    pub max_angular_frequency: f32,
    pub seed: u64,
}

impl Default for PlaneWavesConfig {
    fn default() -> Self {
        Self {
            count: 5,
            max_height: 0.2,
            max_wave_number: 5.0,
            max_angular_frequency: 2.0,
            seed: 42,
        }
    }
}

/// Draw random wave components.
///
/// Each amplitude lies in `[max_height / 2N, max_height / N)`, so the summed
/// amplitude never exceeds `max_height`.
pub fn generate_components(config: &PlaneWavesConfig) -> Result<Vec<WaveComponent>, SurfaceError> {
    if config.count == 0 {
        return Err(SurfaceError::InvalidParameterCount);
    }
    require_positive("max_height", config.max_height)?;
    require_positive("max_wave_number", config.max_wave_number)?;
    require_positive("max_angular_frequency", config.max_angular_frequency)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.count as f32;
    let k_max = config.max_wave_number;

    let components = (0..config.count)
        .map(|_| {
            let wave_vector = Vec2::new(
                rng.gen_range(-k_max..k_max),
                rng.gen_range(-k_max..k_max),
            );
            let angular_frequency = rng.gen_range(0.0..config.max_angular_frequency);
            let phase = rng.gen_range(0.0..2.0 * PI);
            let amplitude = config.max_height * (1.0 + rng.gen::<f32>()) / 2.0 / n;

            WaveComponent {
                wave_vector,
                angular_frequency,
                phase,
                amplitude,
            }
        })
        .collect();

    Ok(components)
}

/// Superposition of plane waves with an analytic gradient
#[derive(Debug, Clone)]
pub struct PlaneWaves {
    lattice: Arc<Lattice>,
    components: Vec<WaveComponent>,
    t: f32,
}

impl PlaneWaves {
    /// Build a surface from randomly drawn components
    pub fn new(lattice: Arc<Lattice>, config: &PlaneWavesConfig) -> Result<Self, SurfaceError> {
        let components = generate_components(config)?;
        info!(
            "Plane waves: {} components on {}x{} lattice, max height {}, seed {}",
            components.len(),
            lattice.nx(),
            lattice.ny(),
            config.max_height,
            config.seed
        );
        Self::from_components(lattice, components)
    }

    /// Build a surface from explicit components
    pub fn from_components(
        lattice: Arc<Lattice>,
        components: Vec<WaveComponent>,
    ) -> Result<Self, SurfaceError> {
        if components.is_empty() {
            return Err(SurfaceError::InvalidParameterCount);
        }
        Ok(PlaneWaves {
            lattice,
            components,
            t: 0.0,
        })
    }

    pub fn components(&self) -> &[WaveComponent] {
        &self.components
    }

    /// `Σ|A_n|`, which bounds `|z|` everywhere and at all times
    pub fn amplitude_bound(&self) -> f32 {
        self.components.iter().map(|c| c.amplitude.abs()).sum()
    }

    /// Height and gradient at a single point
    pub fn evaluate(&self, p: Vec2) -> (f32, Vec2) {
        self.components
            .iter()
            .fold((0.0, Vec2::ZERO), |(z, grad), wave| {
                let arg = wave.argument(p, self.t);
                let dcos = -wave.amplitude * arg.sin();
                (z + wave.amplitude * arg.cos(), grad + wave.wave_vector * dcos)
            })
    }
}

impl WaveModel for PlaneWaves {
    fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    fn elapsed(&self) -> f32 {
        self.t
    }

    // `t` grows without wrapping; precision degrades only after very long runs.
    fn advance(&mut self, dt: f32) {
        if accept_dt(dt) {
            self.t += dt;
        }
    }

    fn sample(&self) -> SurfaceSample {
        let (height, gradient): (Vec<f32>, Vec<Vec2>) = self
            .lattice
            .positions()
            .par_iter()
            .map(|&p| self.evaluate(p))
            .unzip();

        SurfaceSample {
            nx: self.lattice.nx(),
            ny: self.lattice.ny(),
            height,
            gradient,
        }
    }
}
