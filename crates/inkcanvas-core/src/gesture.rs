//! Per-gesture interaction state.

use crate::raster::RasterBuffer;
use crate::shapes::ObjectId;
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};

/// Where the current pointer gesture stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    /// Painting into the raster layer.
    FreehandDrawing {
        tool: ToolKind,
        /// Where the stroke started.
        anchor: Point,
        /// End of the last painted segment.
        last: Point,
    },
    /// Showing a shape outline on the overlay.
    ShapePreviewing {
        tool: ToolKind,
        anchor: Point,
        current: Point,
    },
    /// Moving a selected object.
    Dragging {
        id: ObjectId,
        /// Pointer position minus the object's origin at drag start.
        offset: Vec2,
        /// Where the pointer went down.
        anchor: Point,
        /// Raster layer as it was when the drag began.
        background: RasterBuffer,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Pointer-down position of the gesture in progress.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            GestureState::Idle => None,
            GestureState::FreehandDrawing { anchor, .. }
            | GestureState::ShapePreviewing { anchor, .. }
            | GestureState::Dragging { anchor, .. } => Some(*anchor),
        }
    }

    /// Short name, used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::FreehandDrawing { .. } => "freehand",
            GestureState::ShapePreviewing { .. } => "shape-preview",
            GestureState::Dragging { .. } => "dragging",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor() {
        assert_eq!(GestureState::Idle.anchor(), None);
        let state = GestureState::ShapePreviewing {
            tool: ToolKind::Line,
            anchor: Point::new(3.0, 4.0),
            current: Point::new(9.0, 9.0),
        };
        assert_eq!(state.anchor(), Some(Point::new(3.0, 4.0)));
        assert!(!state.is_idle());
        assert_eq!(state.name(), "shape-preview");
    }
}
