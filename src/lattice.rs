use glam::Vec2;
use rayon::prelude::*;

use crate::error::SurfaceError;

/// A triangle referencing three lattice indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face(pub u32, pub u32, pub u32);

impl Face {
    pub fn indices(&self) -> [u32; 3] {
        [self.0, self.1, self.2]
    }
}

/// Fixed grid of sample points spanning `[-1, 1] x [-1, 1]`.
///
/// Points are stored row-major: `i` walks the x axis, `j` walks the y axis,
/// and point `(i, j)` lives at flat index `i * ny + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    nx: usize,
    ny: usize,
    positions: Vec<Vec2>,
}

impl Lattice {
    /// Create a lattice with `nx` points along x and `ny` points along y
    pub fn new(nx: usize, ny: usize) -> Result<Self, SurfaceError> {
        if nx < 2 || ny < 2 {
            return Err(SurfaceError::InvalidDimension { nx, ny });
        }

        let positions = (0..nx)
            .flat_map(|i| {
                let x = linspace(i, nx);
                (0..ny).map(move |j| Vec2::new(x, linspace(j, ny)))
            })
            .collect();

        Ok(Lattice { nx, ny, positions })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Total number of lattice points
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Row-major flat index of point `(i, j)`
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.ny + j
    }

    pub fn position(&self, i: usize, j: usize) -> Vec2 {
        self.positions[self.index(i, j)]
    }

    /// All lattice positions in row-major order
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Two triangles per cell, `(a, b, c)` then `(a, c, d)`, cells in row-major order.
    ///
    /// With `a = (i, j)`, `b = (i+1, j)`, `c = (i+1, j+1)`, `d = (i, j+1)`.
    pub fn triangulation(&self) -> Vec<Face> {
        let (nx, ny) = (self.nx, self.ny);

        (0..nx - 1)
            .into_par_iter()
            .flat_map_iter(|i| {
                (0..ny - 1).flat_map(move |j| {
                    let a = (i * ny + j) as u32;
                    let b = ((i + 1) * ny + j) as u32;
                    let c = ((i + 1) * ny + j + 1) as u32;
                    let d = (i * ny + j + 1) as u32;

                    [Face(a, b, c), Face(a, c, d)]
                })
            })
            .collect()
    }
}

/// `k`-th of `n` evenly spaced samples on `[-1, 1]`, endpoints included
fn linspace(k: usize, n: usize) -> f32 {
    -1.0 + 2.0 * k as f32 / (n - 1) as f32
}
