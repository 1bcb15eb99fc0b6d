use std::f32::consts::PI;
use std::sync::Arc;

use glam::Vec2;
use log::info;
use rayon::prelude::*;

use crate::error::{require_positive, SurfaceError};
use crate::lattice::Lattice;
use crate::surface::{accept_dt, SurfaceSample, WaveModel};

/// Distances below this are treated as the wave center
const CENTER_EPSILON: f32 = 1e-6;

/// Parameters for a radial wave spreading from a point
#[derive(Debug, Clone)]
pub struct CircularConfig {
    pub max_height: f32,
    pub wavelength: f32,
    pub center: Vec2,
    pub speed: f32,
}

impl Default for CircularConfig {
    fn default() -> Self {
        Self {
            max_height: 0.1,
            wavelength: 0.3,
            center: Vec2::ZERO,
            speed: 3.0,
        }
    }
}

/// A single circular wave `A cos(ω d - speed t)`
#[derive(Debug, Clone)]
pub struct CircularWave {
    lattice: Arc<Lattice>,
    amplitude: f32,
    omega: f32,
    center: Vec2,
    speed: f32,
    t: f32,
}

impl CircularWave {
    pub fn new(lattice: Arc<Lattice>, config: &CircularConfig) -> Result<Self, SurfaceError> {
        let wavelength = require_positive("wavelength", config.wavelength)?;
        if !config.max_height.is_finite() {
            return Err(SurfaceError::InvalidParameter {
                name: "max_height",
                value: config.max_height,
            });
        }
        if !config.speed.is_finite() {
            return Err(SurfaceError::InvalidParameter {
                name: "speed",
                value: config.speed,
            });
        }

        info!(
            "Circular wave: {}x{} lattice, wavelength {}, speed {}, center ({}, {})",
            lattice.nx(),
            lattice.ny(),
            wavelength,
            config.speed,
            config.center.x,
            config.center.y
        );

        Ok(CircularWave {
            lattice,
            amplitude: config.max_height,
            omega: 2.0 * PI / wavelength,
            center: config.center,
            speed: config.speed,
            t: 0.0,
        })
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Angular wavenumber `2π / wavelength`
    pub fn omega(&self) -> f32 {
        self.omega
    }

    #[inline]
    fn argument(&self, d: f32) -> f32 {
        self.omega * d - self.speed * self.t
    }

    pub fn height_at(&self, p: Vec2) -> f32 {
        self.amplitude * self.argument(p.distance(self.center)).cos()
    }

    /// Radial gradient at `p`; undefined at the center itself.
    pub fn gradient_at(&self, p: Vec2) -> Result<Vec2, SurfaceError> {
        let offset = p - self.center;
        let d = offset.length();
        if d < CENTER_EPSILON {
            return Err(SurfaceError::DegenerateSample { x: p.x, y: p.y });
        }
        let dcos = -self.amplitude * self.omega * self.argument(d).sin();
        Ok(offset / d * dcos)
    }
}

impl WaveModel for CircularWave {
    fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    fn elapsed(&self) -> f32 {
        self.t
    }

    fn advance(&mut self, dt: f32) {
        if accept_dt(dt) {
            self.t += dt;
        }
    }

    /// The center point takes the zero-gradient limit.
    fn sample(&self) -> SurfaceSample {
        let (height, gradient): (Vec<f32>, Vec<Vec2>) = self
            .lattice
            .positions()
            .par_iter()
            .map(|&p| (self.height_at(p), self.gradient_at(p).unwrap_or(Vec2::ZERO)))
            .unzip();

        SurfaceSample {
            nx: self.lattice.nx(),
            ny: self.lattice.ny(),
            height,
            gradient,
        }
    }
}
