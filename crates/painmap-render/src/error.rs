//! Render errors.

use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height} pixel surface")]
    SurfaceAllocation { width: f64, height: f64 },
    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
