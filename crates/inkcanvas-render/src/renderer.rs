//! Scene painting: objects, selection highlight and shape previews.

use crate::error::RenderResult;
use crate::surface::{Surface, paint_for, stroke_for};
use crate::text::TextRasterizer;
use inkcanvas_core::{
    CanvasObject, Color, LineCap, ObjectId, RasterBuffer, Scene, ToolKind, ToolStyle,
};
use kurbo::{Point, Rect};
use tiny_skia::{PathBuilder, Rect as SkiaRect, StrokeDash, Transform};

/// Dash pattern of the selection highlight, on then off, in pixels.
pub const HIGHLIGHT_DASH: [f32; 2] = [4.0, 2.0];

/// How far the highlight box sits outside an object's bounds.
pub const HIGHLIGHT_OUTSET: f64 = 3.0;

const HIGHLIGHT_WIDTH: f64 = 1.0;

/// Paints scenes onto surfaces.
#[derive(Debug)]
pub struct SceneRenderer {
    /// Selection highlight color, independent of object colors.
    pub highlight_color: peniko::Color,
    text: TextRasterizer,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new(TextRasterizer::new())
    }
}

impl SceneRenderer {
    pub fn new(text: TextRasterizer) -> Self {
        Self {
            highlight_color: peniko::Color::from_rgba8(0, 100, 255, 179),
            text,
        }
    }

    pub fn text(&self) -> &TextRasterizer {
        &self.text
    }

    /// Paint every object in order, highlighting the selected one.
    pub fn render_objects(&self, surface: &mut Surface, scene: &Scene, selection: Option<ObjectId>) {
        for object in scene.iter() {
            self.paint_object(surface, object);
            if selection == Some(object.id()) {
                self.paint_highlight(surface, object);
            }
        }
    }

    /// Clear `display`, lay down the raster layer (or the drag background
    /// when given) and paint the objects on top.
    pub fn render_all(
        &self,
        display: &mut Surface,
        raster: &Surface,
        scene: &Scene,
        selection: Option<ObjectId>,
        background: Option<&RasterBuffer>,
    ) -> RenderResult<()> {
        display.clear();
        match background {
            Some(snapshot) => display.draw_surface(&Surface::from_raster(snapshot)?),
            None => display.draw_surface(raster),
        }
        self.render_objects(display, scene, selection);
        Ok(())
    }

    /// Raster layer with every object painted over it and no highlight.
    pub fn flatten(&self, raster: &Surface, scene: &Scene) -> Surface {
        let mut flat = raster.clone();
        self.render_objects(&mut flat, scene, None);
        flat
    }

    /// Redraw the overlay with the outline a shape gesture would commit.
    pub fn render_preview(
        &self,
        overlay: &mut Surface,
        tool: ToolKind,
        anchor: Point,
        current: Point,
        color: Color,
        width: f64,
    ) {
        overlay.clear();
        let style = ToolStyle::for_tool(ToolKind::Pen);
        let path = match tool {
            ToolKind::Line => line_path(anchor, current),
            ToolKind::Rectangle => rect_path(Rect::from_points(anchor, current)),
            ToolKind::Circle => circle_path(anchor, anchor.distance(current)),
            _ => None,
        };
        if let (Some(path), Some(pixmap)) = (path, overlay.pixmap_mut()) {
            let paint = paint_for(color, style);
            let stroke = stroke_for(width, style.cap);
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    pub fn clear_overlay(&self, overlay: &mut Surface) {
        overlay.clear();
    }

    /// Paint one object using its own style.
    pub fn paint_object(&self, surface: &mut Surface, object: &CanvasObject) {
        let style = ToolStyle::for_object(object);
        let (path, stroke_style) = match object {
            CanvasObject::Line(line) => (line_path(line.start, line.end), line.style),
            CanvasObject::Rectangle(rect) => (rect_path(rect.as_rect()), rect.style),
            CanvasObject::Circle(circle) => (circle_path(circle.center, circle.radius), circle.style),
            CanvasObject::Text(text) => {
                text.set_cached_width(self.text.measure(&text.content, text.font_size));
                self.text
                    .draw(surface, &text.content, text.position, text.font_size, text.color);
                return;
            }
        };
        let (Some(path), Some(pixmap)) = (path, surface.pixmap_mut()) else {
            return;
        };
        let paint = paint_for(stroke_style.color, style);
        let stroke = stroke_for(stroke_style.line_width, style.cap);
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Dashed box around an object's bounds.
    pub fn paint_highlight(&self, surface: &mut Surface, object: &CanvasObject) {
        let Some(path) = rect_path(object.bounds().inflate(HIGHLIGHT_OUTSET, HIGHLIGHT_OUTSET)) else {
            return;
        };
        let Some(pixmap) = surface.pixmap_mut() else {
            return;
        };
        let paint = paint_for(self.highlight_color.into(), ToolStyle::default());
        let mut stroke = stroke_for(HIGHLIGHT_WIDTH, LineCap::Butt);
        stroke.line_join = tiny_skia::LineJoin::Miter;
        stroke.dash = StrokeDash::new(HIGHLIGHT_DASH.to_vec(), 0.0);
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

fn line_path(from: Point, to: Point) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x as f32, from.y as f32);
    pb.line_to(to.x as f32, to.y as f32);
    pb.finish()
}

fn rect_path(rect: Rect) -> Option<tiny_skia::Path> {
    let rect = rect.abs();
    SkiaRect::from_ltrb(rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32)
        .map(PathBuilder::from_rect)
}

fn circle_path(center: Point, radius: f64) -> Option<tiny_skia::Path> {
    PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkcanvas_core::{Rectangle, StrokeStyle, Text};

    fn red_rect() -> CanvasObject {
        let style = StrokeStyle::new(Color::new(255, 0, 0, 255), 4.0);
        Rectangle::new(Point::new(10.0, 10.0), 30.0, 20.0, style).into()
    }

    #[test]
    fn test_render_objects_strokes_outline() {
        let renderer = SceneRenderer::default();
        let mut scene = Scene::new();
        scene.add(red_rect());
        let mut surface = Surface::new(60, 60).unwrap();
        renderer.render_objects(&mut surface, &scene, None);
        assert_eq!(surface.pixel(10, 20), Some(Color::new(255, 0, 0, 255)));
        // Interior stays empty.
        assert_eq!(surface.pixel(25, 20).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_selection_adds_highlight() {
        let renderer = SceneRenderer::default();
        let mut scene = Scene::new();
        let id = scene.add(red_rect());
        let mut plain = Surface::new(60, 60).unwrap();
        renderer.render_objects(&mut plain, &scene, None);
        let mut selected = Surface::new(60, 60).unwrap();
        renderer.render_objects(&mut selected, &scene, Some(id));
        assert_ne!(plain, selected);
        // The highlight runs 3px outside the bounds.
        assert!((7..43).any(|x| selected.pixel(x, 7).is_some_and(|c| c.a > 0)));
        assert!((7..43).all(|x| plain.pixel(x, 7).is_some_and(|c| c.a == 0)));
    }

    #[test]
    fn test_render_all_uses_background_when_given() {
        let renderer = SceneRenderer::default();
        let scene = Scene::new();
        let raster = Surface::new(8, 8).unwrap();
        let background = RasterBuffer::filled(8, 8, Color::white());
        let mut display = Surface::new(8, 8).unwrap();
        renderer
            .render_all(&mut display, &raster, &scene, None, Some(&background))
            .unwrap();
        assert_eq!(display.pixel(4, 4), Some(Color::white()));
        renderer.render_all(&mut display, &raster, &scene, None, None).unwrap();
        assert_eq!(display.pixel(4, 4), Some(Color::transparent()));
    }

    #[test]
    fn test_flatten_leaves_raster_untouched() {
        let renderer = SceneRenderer::default();
        let mut scene = Scene::new();
        scene.add(red_rect());
        let raster = Surface::new(60, 60).unwrap();
        let flat = renderer.flatten(&raster, &scene);
        assert_eq!(flat.pixel(10, 20), Some(Color::new(255, 0, 0, 255)));
        assert_eq!(raster.pixel(10, 20), Some(Color::transparent()));
    }

    #[test]
    fn test_preview_replaces_previous_outline() {
        let renderer = SceneRenderer::default();
        let mut overlay = Surface::new(50, 50).unwrap();
        renderer.render_preview(&mut overlay, ToolKind::Line, Point::new(0.0, 10.0), Point::new(50.0, 10.0), Color::black(), 4.0);
        assert_eq!(overlay.pixel(25, 10).map(|c| c.a), Some(255));
        renderer.render_preview(&mut overlay, ToolKind::Line, Point::new(0.0, 40.0), Point::new(50.0, 40.0), Color::black(), 4.0);
        assert_eq!(overlay.pixel(25, 10).map(|c| c.a), Some(0));
        assert_eq!(overlay.pixel(25, 40).map(|c| c.a), Some(255));
        renderer.clear_overlay(&mut overlay);
        assert_eq!(overlay.pixel(25, 40).map(|c| c.a), Some(0));
    }

    #[test]
    fn test_text_measurement_cached_on_render() {
        let renderer = SceneRenderer::new(TextRasterizer::without_font());
        let mut scene = Scene::new();
        let id = scene.add(Text::new(Point::new(5.0, 20.0), "abcd".to_string(), 10.0, Color::black()).into());
        let mut surface = Surface::new(40, 40).unwrap();
        renderer.render_objects(&mut surface, &scene, None);
        match scene.get(id) {
            Some(CanvasObject::Text(text)) => {
                assert!(text.cached_width().is_some_and(|w| (w - 22.0).abs() < 1e-9));
            }
            other => panic!("expected text, got {other:?}"),
        }
    }
}
