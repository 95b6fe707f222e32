//! Pixel surfaces backed by tiny-skia.

use crate::error::{RenderResult, RendererError};
use inkcanvas_core::{Color, CompositeMode, LineCap, RasterBuffer, ToolStyle};
use kurbo::Point;
use tiny_skia::{
    BlendMode, ColorU8, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, PremultipliedColorU8,
    Rect as SkiaRect, Stroke, Transform,
};

/// A drawable RGBA surface. Zero-area surfaces are valid and ignore drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
}

impl Surface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = if width == 0 || height == 0 {
            None
        } else {
            Some(Pixmap::new(width, height).ok_or(RendererError::SurfaceAllocation { width, height })?)
        };
        Ok(Self { width, height, pixmap })
    }

    /// Create a surface holding a copy of a raster buffer.
    pub fn from_raster(raster: &RasterBuffer) -> RenderResult<Self> {
        let mut surface = Self::new(raster.width(), raster.height())?;
        surface.load_raster(raster)?;
        Ok(surface)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixmap.is_none()
    }

    /// The underlying pixmap, absent for zero-area surfaces.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub(crate) fn pixmap_mut(&mut self) -> Option<&mut Pixmap> {
        self.pixmap.as_mut()
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(tiny_skia::Color::TRANSPARENT);
        }
    }

    /// Change size, keeping existing pixels anchored at the top-left.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == self.width && height == self.height {
            return Ok(());
        }
        let mut resized = Self::new(width, height)?;
        if let (Some(src), Some(dst)) = (&self.pixmap, &mut resized.pixmap) {
            let row_bytes = self.width.min(width) as usize * 4;
            let src_stride = self.width as usize * 4;
            let dst_stride = width as usize * 4;
            let src_data = src.data();
            let dst_data = dst.data_mut();
            for y in 0..self.height.min(height) as usize {
                let s = y * src_stride;
                let d = y * dst_stride;
                dst_data[d..d + row_bytes].copy_from_slice(&src_data[s..s + row_bytes]);
            }
        }
        *self = resized;
        Ok(())
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_raster(&self) -> RasterBuffer {
        let Some(pixmap) = &self.pixmap else {
            return RasterBuffer::new(self.width, self.height);
        };
        let mut data = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        match RasterBuffer::from_rgba(self.width, self.height, data) {
            Ok(raster) => raster,
            Err(err) => {
                log::error!("Surface readback failed: {err}");
                RasterBuffer::new(self.width, self.height)
            }
        }
    }

    /// Replace every pixel with the contents of a same-sized raster buffer.
    pub fn load_raster(&mut self, raster: &RasterBuffer) -> RenderResult<()> {
        if raster.width() != self.width || raster.height() != self.height {
            return Err(RendererError::SurfaceSizeMismatch {
                width: self.width,
                height: self.height,
                actual_width: raster.width(),
                actual_height: raster.height(),
            });
        }
        let Some(pixmap) = &mut self.pixmap else {
            return Ok(());
        };
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(raster.data().chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(())
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Color::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Composite another surface on top of this one.
    pub fn draw_surface(&mut self, other: &Surface) {
        if let (Some(dst), Some(src)) = (&mut self.pixmap, &other.pixmap) {
            dst.draw_pixmap(0, 0, src.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
        }
    }

    /// Paint one freehand segment.
    pub fn stroke_segment(&mut self, from: Point, to: Point, color: Color, width: f64, style: ToolStyle) {
        if from == to {
            self.dot(from, color, width, style);
            return;
        }
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };
        let paint = paint_for(color, style);
        let stroke = stroke_for(width, style.cap);
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Paint the cap a stroke with no movement leaves behind.
    pub fn dot(&mut self, at: Point, color: Color, width: f64, style: ToolStyle) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        let half = (width / 2.0) as f32;
        if half <= 0.0 {
            return;
        }
        let (x, y) = (at.x as f32, at.y as f32);
        let path = match style.cap {
            LineCap::Butt => return,
            LineCap::Round => PathBuilder::from_circle(x, y, half),
            LineCap::Square => {
                SkiaRect::from_ltrb(x - half, y - half, x + half, y + half).map(PathBuilder::from_rect)
            }
        };
        if let Some(path) = path {
            let paint = paint_for(color, style);
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    /// Blend a solid color into one pixel with the given coverage.
    pub(crate) fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let src_a = coverage.clamp(0.0, 1.0) * f32::from(color.a) / 255.0;
        if src_a <= 0.0 {
            return;
        }
        let dst = pixmap.pixels()[idx];
        let inv = 1.0 - src_a;
        let channel = |src: u8, dst: u8| f32::from(src) * src_a + f32::from(dst) * inv;
        let a = (src_a * 255.0 + f32::from(dst.alpha()) * inv).round().min(255.0) as u8;
        let clamp = |v: f32| (v.round() as u8).min(a);
        if let Some(out) = PremultipliedColorU8::from_rgba(
            clamp(channel(color.r, dst.red())),
            clamp(channel(color.g, dst.green())),
            clamp(channel(color.b, dst.blue())),
            a,
        ) {
            pixmap.pixels_mut()[idx] = out;
        }
    }
}

/// Paint configured for a color under a tool style.
pub(crate) fn paint_for(color: Color, style: ToolStyle) -> Paint<'static> {
    let mut paint = Paint::default();
    let alpha = f32::from(color.a) * style.alpha;
    paint.set_color_rgba8(color.r, color.g, color.b, alpha.round().clamp(0.0, 255.0) as u8);
    paint.anti_alias = true;
    paint.blend_mode = match style.composite {
        CompositeMode::SourceOver => BlendMode::SourceOver,
        CompositeMode::Multiply => BlendMode::Multiply,
        CompositeMode::DestinationOut => BlendMode::DestinationOut,
    };
    paint
}

/// Stroke with round joins and the given cap.
pub(crate) fn stroke_for(width: f64, cap: LineCap) -> Stroke {
    Stroke {
        width: width as f32,
        line_cap: match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        },
        line_join: tiny_skia::LineJoin::Round,
        ..Default::default()
    }
}
