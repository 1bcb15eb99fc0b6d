// Export main modules
mod error;
mod export;
mod lattice;
mod mesh;
mod surface;
pub mod circular;
pub mod driver;
pub mod integrator;
pub mod pde;
pub mod wave;

// Re-export everything for public use
pub use circular::{CircularConfig, CircularWave};
pub use driver::SimulationLoop;
pub use error::SurfaceError;
pub use integrator::{Integrator, WaveState};
pub use lattice::{Face, Lattice};
pub use mesh::{Mesh, Vertex};
pub use pde::{FiniteDifferenceConfig, FiniteDifferenceWave};
pub use surface::{Surface, SurfaceSample, WaveModel};
pub use wave::{PlaneWaves, PlaneWavesConfig, WaveComponent};

pub mod prelude {
    pub use crate::circular::{CircularConfig, CircularWave};
    pub use crate::driver::SimulationLoop;
    pub use crate::error::SurfaceError;
    pub use crate::integrator::Integrator;
    pub use crate::lattice::{Face, Lattice};
    pub use crate::mesh::Mesh;
    pub use crate::pde::{FiniteDifferenceConfig, FiniteDifferenceWave};
    pub use crate::surface::{Surface, SurfaceSample, WaveModel};
    pub use crate::wave::{PlaneWaves, PlaneWavesConfig};
}
