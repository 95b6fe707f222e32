//! Application errors.

use inkcanvas_core::CanvasError;
use inkcanvas_render::RendererError;
use thiserror::Error;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Export failed: {0}")]
    Export(String),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
