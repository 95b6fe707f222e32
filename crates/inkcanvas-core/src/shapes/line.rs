//! Line shape.

use super::{CLICK_PADDING, Color, ObjectId, ShapeTrait, StrokeStyle, point_to_segment_dist};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight segment between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ObjectId,
    /// Start point (drag origin).
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Stroke properties.
    pub style: StrokeStyle,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point, style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style,
        }
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Direction vector from start to end.
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    /// Whether `point` lies within `tolerance` of the segment.
    ///
    /// The effective tolerance never drops below half the stroke width.
    /// Zero-length lines never match.
    pub fn hits_segment(&self, point: Point, tolerance: f64) -> bool {
        if self.direction().hypot2() == 0.0 {
            return false;
        }
        let effective = tolerance.max(self.style.line_width / 2.0);
        point_to_segment_dist(point, self.start, self.end) <= effective
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn color(&self) -> Color {
        self.style.color
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.end.x) - CLICK_PADDING,
            self.start.y.min(self.end.y) - CLICK_PADDING,
            self.start.x.max(self.end.x) + CLICK_PADDING,
            self.start.y.max(self.end.y) + CLICK_PADDING,
        )
    }

    fn hit_test(&self, point: Point) -> bool {
        self.hits_segment(point, CLICK_PADDING)
    }

    fn origin(&self) -> Point {
        self.start
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
