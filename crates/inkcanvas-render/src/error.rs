//! Renderer errors.

use inkcanvas_core::CanvasError;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RendererError {
    #[error("Could not allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },
    #[error("Pixel buffer is {actual_width}x{actual_height}, surface is {width}x{height}")]
    SurfaceSizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("Font error: {0}")]
    Font(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

impl From<RendererError> for CanvasError {
    fn from(err: RendererError) -> Self {
        CanvasError::SurfaceRead(err.to_string())
    }
}
