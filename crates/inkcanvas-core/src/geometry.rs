//! Bounds and point-in-object tests.

use crate::shapes::{CanvasObject, Circle, Line, ShapeTrait};
use kurbo::{Point, Rect};

/// Click-slack box of an object.
pub fn bounds(object: &CanvasObject) -> Rect {
    object.bounds()
}

/// Inclusive rectangle containment. Points on every edge count.
pub fn point_in_bounds(point: Point, bounds: Rect) -> bool {
    let bounds = bounds.abs();
    point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
}

/// Whether `point` is within `tolerance` of the segment, widened to half the
/// stroke width. Zero-length lines never match.
pub fn point_on_line(point: Point, line: &Line, tolerance: f64) -> bool {
    line.hits_segment(point, tolerance)
}

/// Circle click test: inside the padded square and within the stroke-aware radius.
pub fn point_in_circle(point: Point, circle: &Circle) -> bool {
    circle.hit_test(point)
}

/// Topmost object under `point`, scanning from the last painted to the first.
pub fn pick_topmost<'a, I>(objects: I, point: Point) -> Option<&'a CanvasObject>
where
    I: DoubleEndedIterator<Item = &'a CanvasObject>,
{
    objects.rev().find(|object| object.hit_test(point))
}
