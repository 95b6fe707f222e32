//! Vector objects that live above the raster layer.

mod circle;
mod line;
mod rectangle;
mod text;

pub use circle::Circle;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::{DEFAULT_FONT_FAMILY, Text};

use crate::error::{CanvasError, CanvasResult};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for canvas objects.
pub type ObjectId = Uuid;

/// Extra slack around an object's geometry that still counts as a click on it.
pub const CLICK_PADDING: f64 = 5.0;

/// Straight-alpha RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse(s: &str) -> CanvasResult<Self> {
        let invalid = || CanvasError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        match hex.len() {
            3 => Ok(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<peniko::Color> for Color {
    fn from(color: peniko::Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Color> for peniko::Color {
    fn from(color: Color) -> Self {
        peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke end cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Stroke properties carried by outlined objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub line_width: f64,
    #[serde(default)]
    pub line_cap: LineCap,
}

impl StrokeStyle {
    pub fn new(color: Color, line_width: f64) -> Self {
        Self {
            color,
            line_width,
            line_cap: LineCap::Round,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(Color::black(), 5.0)
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}

/// Behaviour shared by every object variant.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ObjectId;

    /// Stroke or fill color.
    fn color(&self) -> Color;

    /// Axis-aligned box used for selection highlight and click tests.
    fn bounds(&self) -> Rect;

    /// Whether a click at `point` lands on this object.
    fn hit_test(&self, point: Point) -> bool;

    /// Reference point used as the drag anchor.
    fn origin(&self) -> Point;

    /// Move by a delta, preserving size and orientation.
    fn translate(&mut self, delta: Vec2);
}

/// Closed set of vector objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CanvasObject {
    Line(Line),
    Rectangle(Rectangle),
    Circle(Circle),
    Text(Text),
}

impl CanvasObject {
    pub fn id(&self) -> ObjectId {
        match self {
            CanvasObject::Line(s) => s.id(),
            CanvasObject::Rectangle(s) => s.id(),
            CanvasObject::Circle(s) => s.id(),
            CanvasObject::Text(s) => s.id(),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            CanvasObject::Line(s) => s.color(),
            CanvasObject::Rectangle(s) => s.color(),
            CanvasObject::Circle(s) => s.color(),
            CanvasObject::Text(s) => s.color(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            CanvasObject::Line(s) => s.bounds(),
            CanvasObject::Rectangle(s) => s.bounds(),
            CanvasObject::Circle(s) => s.bounds(),
            CanvasObject::Text(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            CanvasObject::Line(s) => s.hit_test(point),
            CanvasObject::Rectangle(s) => s.hit_test(point),
            CanvasObject::Circle(s) => s.hit_test(point),
            CanvasObject::Text(s) => s.hit_test(point),
        }
    }

    pub fn origin(&self) -> Point {
        match self {
            CanvasObject::Line(s) => s.origin(),
            CanvasObject::Rectangle(s) => s.origin(),
            CanvasObject::Circle(s) => s.origin(),
            CanvasObject::Text(s) => s.origin(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            CanvasObject::Line(s) => s.translate(delta),
            CanvasObject::Rectangle(s) => s.translate(delta),
            CanvasObject::Circle(s) => s.translate(delta),
            CanvasObject::Text(s) => s.translate(delta),
        }
    }

    /// Move the object so its drag origin lands on `target`.
    pub fn move_origin_to(&mut self, target: Point) {
        let delta = target - self.origin();
        self.translate(delta);
    }

    /// Short variant name, used in log lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CanvasObject::Line(_) => "line",
            CanvasObject::Rectangle(_) => "rectangle",
            CanvasObject::Circle(_) => "circle",
            CanvasObject::Text(_) => "text",
        }
    }
}

impl From<Line> for CanvasObject {
    fn from(line: Line) -> Self {
        CanvasObject::Line(line)
    }
}

impl From<Rectangle> for CanvasObject {
    fn from(rect: Rectangle) -> Self {
        CanvasObject::Rectangle(rect)
    }
}

impl From<Circle> for CanvasObject {
    fn from(circle: Circle) -> Self {
        CanvasObject::Circle(circle)
    }
}

impl From<Text> for CanvasObject {
    fn from(text: Text) -> Self {
        CanvasObject::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(Color::parse("#f00").unwrap(), Color::new(255, 0, 0, 255));
        assert_eq!(Color::parse("#00ff80").unwrap(), Color::new(0, 255, 128, 255));
        assert_eq!(
            Color::parse("#11223344").unwrap(),
            Color::new(0x11, 0x22, 0x33, 0x44)
        );
    }

    #[test]
    fn test_parse_invalid_color() {
        assert!(matches!(Color::parse("red"), Err(CanvasError::InvalidColor(_))));
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("#gggggg").is_err());
    }

    #[test]
    fn test_color_hex_round_trip() {
        let color = Color::new(18, 52, 86, 255);
        assert_eq!(color.to_hex(), "#123456");
        assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
    }

    #[test]
    fn test_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < f64::EPSILON);
        assert!((point_to_segment_dist(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_origin_to() {
        let mut obj = CanvasObject::from(Circle::new(Point::new(10.0, 10.0), 5.0, StrokeStyle::default()));
        obj.move_origin_to(Point::new(40.0, 25.0));
        assert_eq!(obj.origin(), Point::new(40.0, 25.0));
    }
}
