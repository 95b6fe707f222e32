//! Text shape.

use super::{CLICK_PADDING, Color, ObjectId, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// Family name used when none is configured.
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Average advance of one character, in em, used before the renderer has
/// measured the text.
const APPROX_CHAR_WIDTH_EM: f64 = 0.55;

/// Line height as a multiple of the font size.
const LINE_HEIGHT_EM: f64 = 1.2;

/// A single line of filled text anchored at its baseline.
#[derive(Debug, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ObjectId,
    /// Left end of the baseline.
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family name.
    #[serde(default = "default_family")]
    pub font_family: String,
    /// Fill color.
    pub color: Color,
    /// Advance width measured by the renderer. None until measured.
    #[serde(skip)]
    cached_width: RwLock<Option<f64>>,
}

fn default_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

impl Clone for Text {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            position: self.position,
            content: self.content.clone(),
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            color: self.color,
            cached_width: RwLock::new(self.cached_width()),
        }
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.position == other.position
            && self.content == other.content
            && self.font_size == other.font_size
            && self.font_family == other.font_family
            && self.color == other.color
    }
}

impl Text {
    /// Create a new text object.
    pub fn new(position: Point, content: String, font_size: f64, color: Color) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size,
            font_family: default_family(),
            color,
            cached_width: RwLock::new(None),
        }
    }

    /// CSS-style font shorthand, e.g. `16px sans-serif`.
    pub fn font(&self) -> String {
        format!("{}px {}", self.font_size, self.font_family)
    }

    /// Measured width, if the renderer has reported one.
    pub fn cached_width(&self) -> Option<f64> {
        self.cached_width.read().ok().and_then(|guard| *guard)
    }

    /// Record the width measured by the renderer.
    pub fn set_cached_width(&self, width: f64) {
        if let Ok(mut guard) = self.cached_width.write() {
            *guard = Some(width);
        }
    }

    /// Drop any measurement, e.g. after the content changed.
    pub fn invalidate_cache(&self) {
        if let Ok(mut guard) = self.cached_width.write() {
            *guard = None;
        }
    }

    /// Width estimate from character count.
    pub fn approximate_width(&self) -> f64 {
        self.content.chars().count() as f64 * self.font_size * APPROX_CHAR_WIDTH_EM
    }

    /// Measured width, or the estimate.
    pub fn width(&self) -> f64 {
        self.cached_width().unwrap_or_else(|| self.approximate_width())
    }

    /// Approximate line height.
    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT_EM
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn color(&self) -> Color {
        self.color
    }

    fn bounds(&self) -> Rect {
        let x0 = self.position.x - CLICK_PADDING;
        let y0 = self.position.y - self.font_size + CLICK_PADDING;
        Rect::new(
            x0,
            y0,
            x0 + self.width() + CLICK_PADDING * 2.0,
            y0 + self.line_height() + CLICK_PADDING * 2.0,
        )
    }

    fn hit_test(&self, point: Point) -> bool {
        crate::geometry::point_in_bounds(point, self.bounds())
    }

    fn origin(&self) -> Point {
        self.position
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
