//! Rectangle shape.

use super::{Color, ObjectId, ShapeTrait, StrokeStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An outlined, axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ObjectId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle (never negative).
    pub width: f64,
    /// Height of the rectangle (never negative).
    pub height: f64,
    /// Stroke properties.
    pub style: StrokeStyle,
}

impl Rectangle {
    /// Create a new rectangle. Negative sizes are folded into the position.
    pub fn new(position: Point, width: f64, height: f64, style: StrokeStyle) -> Self {
        Self::from_corners(position, Point::new(position.x + width, position.y + height), style)
    }

    /// Create a rectangle from two opposite corner points.
    pub fn from_corners(p1: Point, p2: Point, style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            width: (p2.x - p1.x).abs(),
            height: (p2.y - p1.y).abs(),
            style,
        }
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn color(&self) -> Color {
        self.style.color
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
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
