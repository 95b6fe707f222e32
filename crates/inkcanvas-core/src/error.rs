//! Error kinds shared by the core crate.

use thiserror::Error;

/// Errors raised by core canvas operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// The pixel buffer could not be read or written.
    #[error("Surface read failed: {0}")]
    SurfaceRead(String),
    /// An object snapshot could not be captured or restored.
    #[error("State serialization failed: {0}")]
    StateSerialization(String),
    /// A flood fill hit its iteration bound and stopped early.
    #[error("Fill truncated after {iterations} iterations")]
    FillTruncated { iterations: usize },
    /// A pointer event carried no usable coordinates.
    #[error("Pointer event has no resolvable coordinates")]
    InvalidPointerEvent,
    /// A color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Result type for core operations.
pub type CanvasResult<T> = Result<T, CanvasError>;
