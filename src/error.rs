use thiserror::Error;

/// Errors raised while configuring or querying a wave surface.
///
/// Everything here is detected up front; a surface that was built successfully
/// never fails while advancing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("Lattice must be at least 2x2, got {nx}x{ny}")]
    InvalidDimension { nx: usize, ny: usize },
    #[error("At least one wave component is required")]
    InvalidParameterCount,
    #[error("Courant number {courant:.4} exceeds the stability limit {limit:.4}")]
    UnstableConfiguration { courant: f32, limit: f32 },
    #[error("Gradient is undefined at the wave center ({x}, {y})")]
    DegenerateSample { x: f32, y: f32 },
    #[error("Parameter `{name}` must be finite and positive, got {value}")]
    InvalidParameter { name: &'static str, value: f32 },
    #[error("Initial state has {actual} samples, lattice expects {expected}")]
    StateSizeMismatch { expected: usize, actual: usize },
}

/// Reject non-finite or non-positive scalar parameters.
pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<f32, SurfaceError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SurfaceError::InvalidParameter { name, value })
    }
}
