use glam::Vec2;
use log::warn;

use crate::circular::CircularWave;
use crate::lattice::Lattice;
use crate::pde::FiniteDifferenceWave;
use crate::wave::PlaneWaves;

/// Height and gradient fields sampled over a lattice at one instant.
///
/// Both fields are row-major with the same layout as [`Lattice::positions`].
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSample {
    pub nx: usize,
    pub ny: usize,
    pub height: Vec<f32>,
    pub gradient: Vec<Vec2>,
}

impl SurfaceSample {
    pub fn height_at(&self, i: usize, j: usize) -> f32 {
        self.height[i * self.ny + j]
    }

    pub fn gradient_at(&self, i: usize, j: usize) -> Vec2 {
        self.gradient[i * self.ny + j]
    }

    /// Smallest and largest height in the field
    pub fn height_range(&self) -> (f32, f32) {
        self.height
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }

    /// Sum of all heights (net displacement)
    pub fn total_height(&self) -> f32 {
        self.height.iter().sum()
    }

    /// Sum of squared heights
    pub fn energy(&self) -> f32 {
        self.height.iter().map(|h| h * h).sum()
    }
}

/// A wave-generation strategy evaluated over a lattice.
///
/// All mutation happens in [`advance`](WaveModel::advance); calling
/// [`sample`](WaveModel::sample) repeatedly without advancing yields identical fields.
pub trait WaveModel {
    fn lattice(&self) -> &Lattice;

    /// Simulated time accumulated so far
    fn elapsed(&self) -> f32;

    /// Move the simulation forward by `dt` seconds
    fn advance(&mut self, dt: f32);

    fn sample(&self) -> SurfaceSample;
}

/// Returns `true` when `dt` can be applied to a simulation clock.
pub(crate) fn accept_dt(dt: f32) -> bool {
    if dt.is_finite() && dt >= 0.0 {
        true
    } else {
        warn!("Ignoring invalid time step dt={}", dt);
        false
    }
}

/// The closed set of surface models
#[derive(Debug, Clone)]
pub enum Surface {
    PlaneWaves(PlaneWaves),
    Circular(CircularWave),
    FiniteDifference(FiniteDifferenceWave),
}

impl Surface {
    pub fn name(&self) -> &'static str {
        match self {
            Surface::PlaneWaves(_) => "plane waves",
            Surface::Circular(_) => "circular wave",
            Surface::FiniteDifference(_) => "finite-difference wave",
        }
    }
}

impl WaveModel for Surface {
    fn lattice(&self) -> &Lattice {
        match self {
            Surface::PlaneWaves(model) => model.lattice(),
            Surface::Circular(model) => model.lattice(),
            Surface::FiniteDifference(model) => model.lattice(),
        }
    }

    fn elapsed(&self) -> f32 {
        match self {
            Surface::PlaneWaves(model) => model.elapsed(),
            Surface::Circular(model) => model.elapsed(),
            Surface::FiniteDifference(model) => model.elapsed(),
        }
    }

    fn advance(&mut self, dt: f32) {
        match self {
            Surface::PlaneWaves(model) => model.advance(dt),
            Surface::Circular(model) => model.advance(dt),
            Surface::FiniteDifference(model) => model.advance(dt),
        }
    }

    fn sample(&self) -> SurfaceSample {
        match self {
            Surface::PlaneWaves(model) => model.sample(),
            Surface::Circular(model) => model.sample(),
            Surface::FiniteDifference(model) => model.sample(),
        }
    }
}

impl From<PlaneWaves> for Surface {
    fn from(model: PlaneWaves) -> Self {
        Surface::PlaneWaves(model)
    }
}

impl From<CircularWave> for Surface {
    fn from(model: CircularWave) -> Self {
        Surface::Circular(model)
    }
}

impl From<FiniteDifferenceWave> for Surface {
    fn from(model: FiniteDifferenceWave) -> Self {
        Surface::FiniteDifference(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circular::CircularConfig;
    use crate::pde::FiniteDifferenceConfig;
    use crate::wave::PlaneWavesConfig;
    use std::sync::Arc;

    fn all_surfaces() -> Vec<Surface> {
        let lattice = Arc::new(Lattice::new(12, 10).unwrap());
        vec![
            PlaneWaves::new(lattice.clone(), &PlaneWavesConfig::default())
                .unwrap()
                .into(),
            CircularWave::new(lattice.clone(), &CircularConfig::default())
                .unwrap()
                .into(),
            FiniteDifferenceWave::new(lattice, &FiniteDifferenceConfig::default())
                .unwrap()
                .into(),
        ]
    }

    #[test]
    fn test_sample_is_idempotent() {
        for mut surface in all_surfaces() {
            surface.advance(0.05);
            let first = surface.sample();
            let second = surface.sample();
            assert_eq!(first, second, "{} sampling changed state", surface.name());
            assert_eq!(first.height.len(), 120);
            assert_eq!(first.gradient.len(), 120);
        }
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        for mut surface in all_surfaces() {
            let before = surface.sample();
            surface.advance(-1.0);
            surface.advance(f32::NAN);
            assert_eq!(surface.elapsed(), 0.0);
            assert_eq!(surface.sample(), before);
        }
    }

    #[test]
    fn test_sample_statistics() {
        let sample = SurfaceSample {
            nx: 2,
            ny: 2,
            height: vec![1.0, -2.0, 0.5, 0.5],
            gradient: vec![Vec2::ZERO; 4],
        };
        assert_eq!(sample.height_range(), (-2.0, 1.0));
        assert_eq!(sample.total_height(), 0.0);
        assert_eq!(sample.energy(), 5.5);
        assert_eq!(sample.height_at(1, 0), 0.5);
    }
}
