//! Finite-difference solution of the 2D wave equation `h_tt = c² ∇²h`.
//!
//! The grid wraps periodically on both axes, so waves leaving one edge
//! re-enter on the opposite edge.

use std::f32::consts::{FRAC_1_SQRT_2, PI};
use std::sync::Arc;

use glam::Vec2;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::{require_positive, SurfaceError};
use crate::integrator::{Integrator, WaveState};
use crate::lattice::Lattice;
use crate::surface::{accept_dt, SurfaceSample, WaveModel};

/// Largest stable `c τ / Δx` for the explicit 5-point scheme in 2D
pub const CFL_LIMIT: f32 = FRAC_1_SQRT_2;

/// Parameters for the finite-difference wave
#[derive(Debug, Clone)]
pub struct FiniteDifferenceConfig {
    pub max_height: f32,         // Amplitude of the initial profile
    pub speed: f32,              // Propagation speed c
    pub tau: f32,                // Fixed integration step
    pub integrator: Integrator,
    pub check_stability: bool,   // Reject configurations above the CFL limit
}

impl Default for FiniteDifferenceConfig {
    fn default() -> Self {
        Self {
            max_height: 0.1,
            speed: 1.0,
            tau: 0.004,
            integrator: Integrator::RungeKutta4,
            check_stability: true,
        }
    }
}

/// Right-hand side `f(h, v) = (v, c² / Δx² · L(h))` on a periodic grid
#[derive(Debug, Clone, Copy)]
struct WaveOperator {
    nx: usize,
    ny: usize,
    coeff: f32,
}

impl WaveOperator {
    /// 5-point Laplacian with indices taken modulo the grid size, scaled by `coeff`
    fn laplacian(&self, h: &[f32]) -> Vec<f32> {
        let (nx, ny) = (self.nx, self.ny);
        let mut out = vec![0.0; h.len()];

        out.par_chunks_mut(ny).enumerate().for_each(|(i, row)| {
            let up = (i + nx - 1) % nx;
            let down = (i + 1) % nx;
            for (j, value) in row.iter_mut().enumerate() {
                let left = (j + ny - 1) % ny;
                let right = (j + 1) % ny;
                let center = h[i * ny + j];
                let sum = h[i * ny + left] + h[i * ny + right] + h[up * ny + j] + h[down * ny + j]
                    - 4.0 * center;
                *value = self.coeff * sum;
            }
        });

        out
    }

    fn derivative(&self, p: &WaveState) -> WaveState {
        WaveState {
            h: p.v.clone(),
            v: self.laplacian(&p.h),
        }
    }
}

/// Wave equation integrated on the lattice with a fixed internal step.
///
/// `advance(dt)` banks `dt` and runs one integration per whole `τ`, carrying
/// the remainder to the next call.
#[derive(Debug, Clone)]
pub struct FiniteDifferenceWave {
    lattice: Arc<Lattice>,
    state: WaveState,
    operator: WaveOperator,
    speed: f32,
    tau: f32,
    integrator: Integrator,
    steps: u64,
    pending: f64,
}

impl FiniteDifferenceWave {
    /// Start from a half-sine height profile along x with a matching cosine velocity
    pub fn new(lattice: Arc<Lattice>, config: &FiniteDifferenceConfig) -> Result<Self, SurfaceError> {
        if !config.max_height.is_finite() {
            return Err(SurfaceError::InvalidParameter {
                name: "max_height",
                value: config.max_height,
            });
        }
        let (nx, ny) = (lattice.nx(), lattice.ny());
        let dx = grid_spacing(nx);
        let amplitude = config.max_height;

        let mut state = WaveState::zeros(lattice.len());
        for i in 0..nx {
            // Periodic grid: x = 1 coincides with x = -1 and is not stored
            let x = -1.0 + i as f32 * dx;
            let (s, c) = (PI * x).sin_cos();
            for j in 0..ny {
                state.h[i * ny + j] = amplitude * s;
                state.v[i * ny + j] = amplitude * c;
            }
        }

        Self::with_state(lattice, config, state)
    }

    /// Start from a caller-supplied state
    pub fn with_state(
        lattice: Arc<Lattice>,
        config: &FiniteDifferenceConfig,
        state: WaveState,
    ) -> Result<Self, SurfaceError> {
        let expected = lattice.len();
        if state.h.len() != expected || state.v.len() != expected {
            return Err(SurfaceError::StateSizeMismatch {
                expected,
                actual: state.h.len().min(state.v.len()),
            });
        }
        let speed = require_positive("speed", config.speed)?;
        let tau = require_positive("tau", config.tau)?;

        let (nx, ny) = (lattice.nx(), lattice.ny());
        let dx = grid_spacing(nx);
        let courant = speed * tau / dx;
        if config.check_stability && courant > CFL_LIMIT {
            return Err(SurfaceError::UnstableConfiguration {
                courant,
                limit: CFL_LIMIT,
            });
        }
        if !config.integrator.is_bounded_for_waves() {
            warn!(
                "{} integrator gains energy on the wave equation at any step size",
                config.integrator
            );
        }

        info!(
            "Finite-difference wave: {}x{} lattice, c={}, tau={}, courant={:.4}, integrator={}",
            nx, ny, speed, tau, courant, config.integrator
        );

        Ok(FiniteDifferenceWave {
            lattice,
            state,
            operator: WaveOperator {
                nx,
                ny,
                coeff: speed * speed / (dx * dx),
            },
            speed,
            tau,
            integrator: config.integrator,
            steps: 0,
            pending: 0.0,
        })
    }

    pub fn state(&self) -> &WaveState {
        &self.state
    }

    pub fn tau(&self) -> f32 {
        self.tau
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    /// Number of integration steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// `c τ / Δx`
    pub fn courant_number(&self) -> f32 {
        self.speed * self.tau / grid_spacing(self.lattice.nx())
    }

    /// Run exactly one integration step of size `τ`
    pub fn step(&mut self) {
        let operator = self.operator;
        self.state = self
            .integrator
            .step(&self.state, self.tau, |p| operator.derivative(p));
        self.steps += 1;
    }
}

impl WaveModel for FiniteDifferenceWave {
    fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    fn elapsed(&self) -> f32 {
        (self.steps as f64 * self.tau as f64) as f32
    }

    fn advance(&mut self, dt: f32) {
        if !accept_dt(dt) {
            return;
        }
        let tau = self.tau as f64;
        self.pending += dt as f64;

        let substeps = (self.pending / tau).floor();
        self.pending = (self.pending - substeps * tau).max(0.0);
        let substeps = substeps as u64;
        for _ in 0..substeps {
            self.step();
        }

        if substeps > 0 {
            debug!(
                "t={} substeps={} total_height={:e}",
                self.elapsed(),
                substeps,
                self.state.h.iter().sum::<f32>()
            );
        }
    }

    /// Heights as-is; the gradient is the shading proxy `(v, 0)`.
    ///
    /// The x component carries the time derivative rather than a spatial
    /// slope. Renderers shading from it get the look this model is tuned for.
    fn sample(&self) -> SurfaceSample {
        SurfaceSample {
            nx: self.lattice.nx(),
            ny: self.lattice.ny(),
            height: self.state.h.clone(),
            gradient: self.state.v.iter().map(|&v| Vec2::new(v, 0.0)).collect(),
        }
    }
}

/// `Δx = 2 / nx` for the periodic `[-1, 1)` domain
fn grid_spacing(nx: usize) -> f32 {
    2.0 / nx as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice(nx: usize, ny: usize) -> Arc<Lattice> {
        Arc::new(Lattice::new(nx, ny).unwrap())
    }

    #[test]
    fn test_first_row_starts_near_zero() {
        let config = FiniteDifferenceConfig::default();
        let mut wave = FiniteDifferenceWave::new(lattice(8, 8), &config).unwrap();
        wave.advance(config.tau);
        assert_eq!(wave.steps(), 1);

        // sin(-π) = 0; one step only moves the row by about τ · v = τ · max_height
        let sample = wave.sample();
        for j in 0..8 {
            assert!(sample.height_at(0, j).abs() <= config.max_height * config.tau * 1.05);
        }
    }

    #[test]
    fn test_zero_state_is_stationary() {
        let config = FiniteDifferenceConfig {
            max_height: 0.0,
            ..Default::default()
        };
        for integrator in [Integrator::RungeKutta4, Integrator::Heun] {
            let config = FiniteDifferenceConfig {
                integrator,
                ..config.clone()
            };
            let mut wave = FiniteDifferenceWave::new(lattice(10, 6), &config).unwrap();
            for _ in 0..20 {
                wave.advance(0.01);
                assert!(wave.sample().height.iter().all(|&h| h == 0.0));
            }
        }
    }

    #[test]
    fn test_energy_stays_bounded() {
        for integrator in [Integrator::RungeKutta4, Integrator::SemiImplicitEuler] {
            let config = FiniteDifferenceConfig {
                integrator,
                ..Default::default()
            };
            let mut wave = FiniteDifferenceWave::new(lattice(32, 16), &config).unwrap();
            assert!(wave.courant_number() <= CFL_LIMIT);

            let initial = wave.sample().energy();
            let mut peak = initial;
            for _ in 0..1000 {
                wave.step();
                peak = peak.max(wave.sample().energy());
            }
            assert!(
                peak <= initial * 1.1,
                "{} energy grew from {} to {}",
                integrator,
                initial,
                peak
            );
        }
    }

    /// Checkerboard heights excite the highest grid mode
    fn checkerboard(nx: usize, ny: usize, amplitude: f32) -> WaveState {
        let mut state = WaveState::zeros(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                state.h[i * ny + j] = if (i + j) % 2 == 0 { amplitude } else { -amplitude };
            }
        }
        state
    }

    #[test]
    fn test_highest_mode_near_cfl_limit() {
        let n = 16;
        for integrator in [
            Integrator::RungeKutta4,
            Integrator::SemiImplicitEuler,
            Integrator::Heun,
            Integrator::ForwardEuler,
        ] {
            let config = FiniteDifferenceConfig {
                tau: 0.7 * grid_spacing(n),
                integrator,
                ..Default::default()
            };
            let mut wave =
                FiniteDifferenceWave::with_state(lattice(n, n), &config, checkerboard(n, n, 0.1))
                    .unwrap();
            assert!(wave.courant_number() <= CFL_LIMIT);

            let initial = wave.sample().energy();
            let mut first_half = initial;
            let mut second_half = 0.0f32;
            let mut diverged = false;
            for k in 0..1000 {
                wave.step();
                let energy = wave.sample().energy();
                diverged |= !energy.is_finite();
                if k < 500 {
                    first_half = first_half.max(energy);
                } else {
                    second_half = second_half.max(energy);
                }
            }

            if integrator.is_bounded_for_waves() {
                assert!(!diverged, "{} diverged", integrator);
                // Symplectic Euler oscillates up to 1 / (1 - (ωτ/2)²) ≈ 50x here
                assert!(first_half <= initial * 100.0, "{} peaked at {}", integrator, first_half);
                assert!(
                    second_half <= first_half * 1.05,
                    "{} kept growing: {} -> {}",
                    integrator,
                    first_half,
                    second_half
                );
            } else {
                assert!(
                    diverged || second_half > initial * 1e3,
                    "{} stayed bounded at {}",
                    integrator,
                    second_half
                );
            }
        }
    }

    #[test]
    fn test_rejects_non_finite_height() {
        for max_height in [f32::NAN, f32::INFINITY] {
            let config = FiniteDifferenceConfig {
                max_height,
                ..Default::default()
            };
            assert!(matches!(
                FiniteDifferenceWave::new(lattice(8, 8), &config),
                Err(SurfaceError::InvalidParameter { name: "max_height", .. })
            ));
        }
    }

    #[test]
    fn test_large_dt_counts_every_step() {
        let config = FiniteDifferenceConfig {
            tau: 0.1,
            ..Default::default()
        };
        let mut wave = FiniteDifferenceWave::new(lattice(2, 2), &config).unwrap();
        wave.advance(1000.0);

        let expected = (1000.0f64 / 0.1f32 as f64).floor() as u64;
        assert_eq!(wave.steps(), expected);
        assert!((wave.elapsed() - 1000.0).abs() <= config.tau * 1.01);
    }

    #[test]
    fn test_rejects_unstable_step() {
        let config = FiniteDifferenceConfig {
            tau: 0.1,
            ..Default::default()
        };
        // Δx = 0.1, so c τ / Δx = 1
        let err = FiniteDifferenceWave::new(lattice(20, 20), &config).unwrap_err();
        assert!(matches!(err, SurfaceError::UnstableConfiguration { .. }));

        let unchecked = FiniteDifferenceConfig {
            check_stability: false,
            ..config
        };
        assert!(FiniteDifferenceWave::new(lattice(20, 20), &unchecked).is_ok());
    }

    #[test]
    fn test_advance_carries_remainder() {
        let config = FiniteDifferenceConfig {
            tau: 0.01,
            ..Default::default()
        };
        let mut wave = FiniteDifferenceWave::new(lattice(8, 8), &config).unwrap();

        wave.advance(0.004);
        assert_eq!(wave.steps(), 0);
        wave.advance(0.004);
        assert_eq!(wave.steps(), 0);
        wave.advance(0.004);
        assert_eq!(wave.steps(), 1);
        wave.advance(0.025);
        assert_eq!(wave.steps(), 3);
        assert!((wave.elapsed() - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_dt_keeps_integrating() {
        let config = FiniteDifferenceConfig::default();
        let mut wave = FiniteDifferenceWave::new(lattice(8, 8), &config).unwrap();
        let before = wave.sample();
        for _ in 0..5 {
            wave.advance(config.tau);
        }
        assert_eq!(wave.steps(), 5);
        assert_ne!(wave.sample(), before);
    }

    #[test]
    fn test_gradient_is_velocity_proxy() {
        let mut wave =
            FiniteDifferenceWave::new(lattice(8, 4), &FiniteDifferenceConfig::default()).unwrap();
        wave.advance(0.02);
        let sample = wave.sample();
        for (g, v) in sample.gradient.iter().zip(&wave.state().v) {
            assert_eq!(*g, Vec2::new(*v, 0.0));
        }
    }

    #[test]
    fn test_laplacian_wraps() {
        let operator = WaveOperator {
            nx: 3,
            ny: 3,
            coeff: 1.0,
        };
        let mut h = vec![0.0; 9];
        h[0] = 1.0;
        let lap = operator.laplacian(&h);
        assert_eq!(lap[0], -4.0);
        // Neighbours across both seams
        assert_eq!(lap[2], 1.0);
        assert_eq!(lap[6], 1.0);
        assert_eq!(lap[1], 1.0);
        assert_eq!(lap[3], 1.0);
        assert_eq!(lap[4], 0.0);
    }

    #[test]
    fn test_state_size_checked() {
        let state = WaveState::zeros(10);
        let err = FiniteDifferenceWave::with_state(
            lattice(4, 4),
            &FiniteDifferenceConfig::default(),
            state,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SurfaceError::StateSizeMismatch {
                expected: 16,
                actual: 10
            }
        );
    }
}
