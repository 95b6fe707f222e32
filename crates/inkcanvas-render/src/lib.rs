//! InkCanvas Render Library
//!
//! Paints scenes, freehand strokes and shape previews onto CPU pixel
//! surfaces backed by tiny-skia.

mod error;
mod renderer;
mod surface;
mod text;

pub use error::{RenderResult, RendererError};
pub use renderer::{HIGHLIGHT_DASH, HIGHLIGHT_OUTSET, SceneRenderer};
pub use surface::Surface;
pub use text::TextRasterizer;
