//! Circle shape.

use super::{CLICK_PADDING, Color, ObjectId, ShapeTrait, StrokeStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An outlined circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ObjectId,
    /// Center point (drag origin).
    pub center: Point,
    /// Radius, always positive for committed circles.
    pub radius: f64,
    /// Stroke properties.
    pub style: StrokeStyle,
}

impl Circle {
    /// Create a new circle.
    pub fn new(center: Point, radius: f64, style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius: radius.abs(),
            style,
        }
    }

    /// Radius at which a click still counts as touching the circle.
    pub fn hit_radius(&self) -> f64 {
        self.radius + CLICK_PADDING.max(self.style.line_width / 2.0)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn color(&self) -> Color {
        self.style.color
    }

    fn bounds(&self) -> Rect {
        let half = self.radius + CLICK_PADDING;
        Rect::new(
            self.center.x - half,
            self.center.y - half,
            self.center.x + half,
            self.center.y + half,
        )
    }

    fn hit_test(&self, point: Point) -> bool {
        crate::geometry::point_in_bounds(point, self.bounds())
            && self.center.distance(point) <= self.hit_radius()
    }

    fn origin(&self) -> Point {
        self.center
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}
