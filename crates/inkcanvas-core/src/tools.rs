//! Tool kinds, per-tool drawing styles and shape construction.

use crate::shapes::{CanvasObject, Circle, Color, LineCap, Line, Rectangle, StrokeStyle, Text};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Shapes whose extent does not exceed this many pixels are discarded as
/// accidental clicks.
pub const MIN_SHAPE_EXTENT: f64 = 2.0;

/// Opacity of highlighter strokes.
pub const HIGHLIGHTER_ALPHA: f32 = 0.4;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Select,
    #[default]
    Pen,
    Highlighter,
    Eraser,
    Fill,
    Line,
    Rectangle,
    Circle,
    Text,
}

impl ToolKind {
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Select,
            ToolKind::Pen,
            ToolKind::Highlighter,
            ToolKind::Eraser,
            ToolKind::Fill,
            ToolKind::Line,
            ToolKind::Rectangle,
            ToolKind::Circle,
            ToolKind::Text,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pen => "pen",
            ToolKind::Highlighter => "highlighter",
            ToolKind::Eraser => "eraser",
            ToolKind::Fill => "fill",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Text => "text",
        }
    }

    /// Tools that paint straight into the raster layer.
    pub fn is_freehand(&self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Highlighter | ToolKind::Eraser)
    }

    /// Tools that preview on the overlay and commit a vector object.
    pub fn is_shape(&self) -> bool {
        matches!(self, ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle)
    }
}

/// User-chosen drawing parameters, read at gesture start or commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
    /// Font size in pixels.
    pub font_size: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            color: Color::black(),
            width: 5.0,
            font_size: 16.0,
        }
    }
}

impl ToolSettings {
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle::new(self.color, self.width)
    }
}

/// How new pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    #[default]
    SourceOver,
    Multiply,
    /// Removes existing pixels, leaving transparency.
    DestinationOut,
}

/// Composite, opacity and cap used when painting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolStyle {
    pub composite: CompositeMode,
    pub alpha: f32,
    pub cap: LineCap,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            composite: CompositeMode::SourceOver,
            alpha: 1.0,
            cap: LineCap::Round,
        }
    }
}

impl ToolStyle {
    /// Style for live input with a tool.
    pub fn for_tool(tool: ToolKind) -> Self {
        match tool {
            ToolKind::Highlighter => Self {
                composite: CompositeMode::Multiply,
                alpha: HIGHLIGHTER_ALPHA,
                cap: LineCap::Butt,
            },
            ToolKind::Eraser => Self {
                composite: CompositeMode::DestinationOut,
                alpha: 1.0,
                cap: LineCap::Square,
            },
            _ => Self::default(),
        }
    }

    /// Style an object is painted with, independent of the active tool.
    pub fn for_object(object: &CanvasObject) -> Self {
        let cap = match object {
            CanvasObject::Line(s) => s.style.line_cap,
            CanvasObject::Rectangle(s) => s.style.line_cap,
            CanvasObject::Circle(s) => s.style.line_cap,
            CanvasObject::Text(_) => LineCap::Round,
        };
        Self {
            cap,
            ..Self::default()
        }
    }
}

/// Build the object a shape gesture from `anchor` to `end` commits, or None
/// when the tool makes no shapes or the gesture was too small.
pub fn build_shape(
    tool: ToolKind,
    anchor: Point,
    end: Point,
    settings: &ToolSettings,
) -> Option<CanvasObject> {
    let style = settings.stroke_style();
    match tool {
        ToolKind::Line => {
            (anchor.distance(end) > MIN_SHAPE_EXTENT).then(|| Line::new(anchor, end, style).into())
        }
        ToolKind::Rectangle => {
            let wide = (end.x - anchor.x).abs() > MIN_SHAPE_EXTENT;
            let tall = (end.y - anchor.y).abs() > MIN_SHAPE_EXTENT;
            (wide && tall).then(|| Rectangle::from_corners(anchor, end, style).into())
        }
        ToolKind::Circle => {
            let radius = anchor.distance(end);
            (radius > MIN_SHAPE_EXTENT).then(|| Circle::new(anchor, radius, style).into())
        }
        _ => None,
    }
}

/// Build a text object, or None when the input is blank.
pub fn build_text(position: Point, input: &str, settings: &ToolSettings) -> Option<CanvasObject> {
    if input.trim().is_empty() {
        return None;
    }
    Some(Text::new(position, input.to_string(), settings.font_size, settings.color).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_categories() {
        assert!(ToolKind::Eraser.is_freehand());
        assert!(!ToolKind::Fill.is_freehand());
        assert!(ToolKind::Circle.is_shape());
        assert!(!ToolKind::Text.is_shape());
        assert_eq!(ToolKind::all().len(), 9);
    }

    #[test]
    fn test_tool_names_match_serde() {
        for tool in ToolKind::all() {
            let json = serde_json::to_string(tool).unwrap();
            assert_eq!(json, format!("\"{}\"", tool.name()));
        }
    }

    #[test]
    fn test_style_table() {
        let highlighter = ToolStyle::for_tool(ToolKind::Highlighter);
        assert_eq!(highlighter.composite, CompositeMode::Multiply);
        assert!((highlighter.alpha - 0.4).abs() < f32::EPSILON);
        assert_eq!(highlighter.cap, LineCap::Butt);

        let eraser = ToolStyle::for_tool(ToolKind::Eraser);
        assert_eq!(eraser.composite, CompositeMode::DestinationOut);
        assert_eq!(eraser.cap, LineCap::Square);

        assert_eq!(ToolStyle::for_tool(ToolKind::Pen), ToolStyle::default());
        assert_eq!(ToolStyle::for_tool(ToolKind::Rectangle).cap, LineCap::Round);
    }

    #[test]
    fn test_object_style_uses_own_cap() {
        let mut style = StrokeStyle::default();
        style.line_cap = LineCap::Square;
        let line: CanvasObject = Line::new(Point::ZERO, Point::new(10.0, 0.0), style).into();
        assert_eq!(ToolStyle::for_object(&line).cap, LineCap::Square);
        assert_eq!(ToolStyle::for_object(&line).composite, CompositeMode::SourceOver);
    }

    #[test]
    fn test_build_rectangle_normalizes() {
        let settings = ToolSettings::default();
        let shape = build_shape(
            ToolKind::Rectangle,
            Point::new(110.0, 60.0),
            Point::new(10.0, 10.0),
            &settings,
        );
        match shape {
            Some(CanvasObject::Rectangle(rect)) => {
                assert_eq!(rect.position, Point::new(10.0, 10.0));
                assert!((rect.width - 100.0).abs() < f64::EPSILON);
                assert!((rect.height - 50.0).abs() < f64::EPSILON);
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_shapes_discarded() {
        let settings = ToolSettings::default();
        let p = Point::new(50.0, 50.0);
        assert!(build_shape(ToolKind::Rectangle, p, p, &settings).is_none());
        // A flat rectangle is discarded even when long.
        assert!(build_shape(ToolKind::Rectangle, p, Point::new(150.0, 51.0), &settings).is_none());
        assert!(build_shape(ToolKind::Line, p, Point::new(51.0, 51.0), &settings).is_none());
        assert!(build_shape(ToolKind::Circle, p, Point::new(52.0, 50.0), &settings).is_none());
        assert!(build_shape(ToolKind::Pen, p, Point::new(90.0, 90.0), &settings).is_none());
    }

    #[test]
    fn test_build_circle_uses_distance() {
        let settings = ToolSettings::default();
        let shape = build_shape(ToolKind::Circle, Point::ZERO, Point::new(3.0, 4.0), &settings);
        match shape {
            Some(CanvasObject::Circle(circle)) => assert!((circle.radius - 5.0).abs() < f64::EPSILON),
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn test_build_text_rejects_blank() {
        let settings = ToolSettings::default();
        assert!(build_text(Point::ZERO, "   ", &settings).is_none());
        match build_text(Point::ZERO, " hi ", &settings) {
            Some(CanvasObject::Text(text)) => {
                assert_eq!(text.content, " hi ");
                assert!((text.font_size - 16.0).abs() < f64::EPSILON);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }
}
