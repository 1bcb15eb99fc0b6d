use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use log::info;

use surface_waves::prelude::*;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Model {
    /// Superposed random plane waves
    Plane,
    /// A single radial wave
    Circular,
    /// Finite-difference wave equation
    Pde,
}

/// Command-line tool to run a fluid surface simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Wave model to simulate
    #[arg(short, long, value_enum, default_value_t = Model::Plane)]
    model: Model,

    /// Lattice points along x
    #[arg(long, default_value_t = 100)]
    nx: usize,

    /// Lattice points along y
    #[arg(long, default_value_t = 100)]
    ny: usize,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 120)]
    frames: u64,

    /// Time step per frame in seconds
    #[arg(long, default_value_t = 0.016)]
    dt: f32,

    /// Maximum wave height
    #[arg(long)]
    max_height: Option<f32>,

    /// Number of plane wave components
    #[arg(long, default_value_t = 5)]
    waves: usize,

    /// Random seed for plane wave generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Wavelength of the circular wave
    #[arg(long, default_value_t = 0.3)]
    wavelength: f32,

    /// Center of the circular wave, X component
    #[arg(long, default_value_t = 0.0)]
    center_x: f32,

    /// Center of the circular wave, Y component
    #[arg(long, default_value_t = 0.0)]
    center_y: f32,

    /// Propagation speed (circular and PDE models)
    #[arg(long)]
    speed: Option<f32>,

    /// Internal integration step of the PDE model
    #[arg(long, default_value_t = 0.004)]
    tau: f32,

    /// Integrator for the PDE model: rk4, heun, euler, semi-implicit
    #[arg(long, default_value = "rk4")]
    integrator: Integrator,

    /// Skip the CFL stability check for the PDE model
    #[arg(long)]
    allow_unstable: bool,

    /// Log statistics every N frames
    #[arg(long, default_value_t = 30)]
    report_every: u64,

    /// Vertical exaggeration applied to the exported mesh
    #[arg(long, default_value_t = 1.0)]
    height_scale: f32,

    /// Export the final frame to this GLB file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn build_surface(args: &Args, lattice: Arc<Lattice>) -> Result<Surface, SurfaceError> {
    let surface = match args.model {
        Model::Plane => {
            let defaults = PlaneWavesConfig::default();
            let config = PlaneWavesConfig {
                count: args.waves,
                max_height: args.max_height.unwrap_or(defaults.max_height),
                seed: args.seed,
                ..defaults
            };
            PlaneWaves::new(lattice, &config)?.into()
        }
        Model::Circular => {
            let defaults = CircularConfig::default();
            let config = CircularConfig {
                max_height: args.max_height.unwrap_or(defaults.max_height),
                wavelength: args.wavelength,
                center: Vec2::new(args.center_x, args.center_y),
                speed: args.speed.unwrap_or(defaults.speed),
            };
            CircularWave::new(lattice, &config)?.into()
        }
        Model::Pde => {
            let defaults = FiniteDifferenceConfig::default();
            let config = FiniteDifferenceConfig {
                max_height: args.max_height.unwrap_or(defaults.max_height),
                speed: args.speed.unwrap_or(defaults.speed),
                tau: args.tau,
                integrator: args.integrator,
                check_stability: !args.allow_unstable,
            };
            FiniteDifferenceWave::new(lattice, &config)?.into()
        }
    };
    Ok(surface)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse();

    let lattice = Arc::new(Lattice::new(args.nx, args.ny).context("Invalid lattice size")?);
    let surface = build_surface(&args, lattice.clone()).context("Invalid surface configuration")?;
    info!(
        "Simulating {} on {}x{} lattice: {} frames at dt={}",
        surface.name(),
        args.nx,
        args.ny,
        args.frames,
        args.dt
    );

    let start_time = Instant::now();
    let report_every = args.report_every.max(1);
    let mut last = surface.sample();
    let mut sim = SimulationLoop::new(surface, args.dt);

    sim.run(args.frames, |frame, sample| {
        if frame % report_every == 0 {
            let (min_height, max_height) = sample.height_range();
            info!(
                "Frame {}: height range [{:.4}, {:.4}], energy {:.4e}",
                frame,
                min_height,
                max_height,
                sample.energy()
            );
        }
        if frame == args.frames {
            last = sample.clone();
        }
    });

    info!(
        "Simulated {} frames ({:.3}s of surface time) in {:.2?}",
        sim.frame(),
        sim.model().elapsed(),
        start_time.elapsed()
    );

    if let Some(output) = &args.output {
        let mesh = Mesh::from_sample(&lattice, &last, args.height_scale);
        mesh.save_glb(output)
            .with_context(|| format!("Failed to export {}", output.display()))?;
        info!("Mesh exported to: {}", output.display());
    }

    Ok(())
}
