//! Pointer and keyboard events as delivered by the UI layer.

use crate::error::{CanvasError, CanvasResult};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in canvas-local coordinates. The position is optional
/// because some platforms deliver events without usable coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Option<Point> },
    Move { position: Option<Point> },
    Up { position: Option<Point> },
}

impl PointerEvent {
    pub fn down(position: Point) -> Self {
        PointerEvent::Down { position: Some(position) }
    }

    pub fn moved(position: Point) -> Self {
        PointerEvent::Move { position: Some(position) }
    }

    pub fn up(position: Point) -> Self {
        PointerEvent::Up { position: Some(position) }
    }

    /// Position as delivered, possibly missing or non-finite.
    pub fn raw_position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => *position,
        }
    }

    /// A finite position, or `InvalidPointerEvent`.
    pub fn position(&self) -> CanvasResult<Point> {
        self.raw_position()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .ok_or(CanvasError::InvalidPointerEvent)
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name as reported by the platform, e.g. `z`, `Delete`.
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// Key without modifiers.
    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::default())
    }
}
