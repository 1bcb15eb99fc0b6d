use glam::{Vec2, Vec3};
use rayon::prelude::*;

use crate::lattice::{Face, Lattice};
use crate::surface::SurfaceSample;

/// A vertex in 3D space
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// One sampled frame of the surface as a renderable mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Lift the lattice by the sampled heights.
    ///
    /// Normals come from the gradient field as `normalize(-gx, -gy, 1)`, so for
    /// models with a shading-proxy gradient they follow the proxy, not the geometry.
    pub fn from_sample(lattice: &Lattice, sample: &SurfaceSample, height_scale: f32) -> Self {
        let vertices = lattice
            .positions()
            .par_iter()
            .zip(sample.height.par_iter())
            .zip(sample.gradient.par_iter())
            .map(|((&p, &h), &g)| Vertex {
                position: Vec3::new(p.x, p.y, h * height_scale),
                normal: Vec3::new(-g.x * height_scale, -g.y * height_scale, 1.0).normalize(),
                uv: (p + Vec2::ONE) * 0.5,
            })
            .collect();

        Mesh {
            vertices,
            faces: lattice.triangulation(),
        }
    }

    /// Vertical extent of the mesh
    pub fn height_range(&self) -> (f32, f32) {
        self.vertices.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
            (lo.min(v.position.z), hi.max(v.position.z))
        })
    }
}
