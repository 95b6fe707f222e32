//! InkCanvas Core Library
//!
//! Platform-agnostic model for the InkCanvas drawing surface: vector objects
//! over a raster layer, hit-testing, flood fill and snapshot history.

pub mod clock;
pub mod debounce;
pub mod error;
pub mod fill;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod input;
pub mod raster;
pub mod scene;
pub mod shapes;
pub mod tools;

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::Debouncer;
pub use error::{CanvasError, CanvasResult};
pub use fill::{DEFAULT_FILL_TOLERANCE, FillOutcome, FillStatus, SkipReason, colors_match, flood_fill, flood_fill_bounded};
pub use gesture::GestureState;
pub use history::{History, HistoryEntry, MAX_HISTORY};
pub use input::{KeyEvent, Modifiers, PointerEvent};
pub use raster::RasterBuffer;
pub use scene::Scene;
pub use shapes::{CanvasObject, Circle, Color, LineCap, Line, ObjectId, Rectangle, ShapeTrait, StrokeStyle, Text};
pub use tools::{CompositeMode, ToolKind, ToolSettings, ToolStyle, build_shape, build_text};
