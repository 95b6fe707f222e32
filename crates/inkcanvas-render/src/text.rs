//! Text measurement and glyph rasterization.

use crate::error::{RenderResult, RendererError};
use crate::surface::Surface;
use ab_glyph::{Font as _, FontArc, GlyphId, ScaleFont as _};
use inkcanvas_core::Color;
use kurbo::Point;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Average character advance in em, used when no font is loaded.
const APPROX_CHAR_WIDTH_EM: f64 = 0.55;

/// DejaVu Sans, used unless a font file is configured.
static DEFAULT_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Lays out and draws single-line text with an optional font.
///
/// Without a font, widths are estimated and nothing is drawn.
pub struct TextRasterizer {
    font: Option<FontArc>,
    warned: AtomicBool,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRasterizer {
    /// Rasterizer using the bundled DejaVu Sans.
    pub fn new() -> Self {
        match FontArc::try_from_slice(DEFAULT_FONT) {
            Ok(font) => Self::with_font(font),
            Err(e) => {
                log::error!("Failed to parse bundled font: {e}");
                Self::without_font()
            }
        }
    }

    /// Rasterizer that only estimates widths.
    pub fn without_font() -> Self {
        Self {
            font: None,
            warned: AtomicBool::new(false),
        }
    }

    pub fn with_font(font: FontArc) -> Self {
        Self {
            font: Some(font),
            warned: AtomicBool::new(false),
        }
    }

    /// Parse a TTF/OTF font from memory.
    pub fn from_bytes(data: Vec<u8>) -> RenderResult<Self> {
        let font = FontArc::try_from_vec(data).map_err(|e| RendererError::Font(e.to_string()))?;
        Ok(Self::with_font(font))
    }

    /// Load a TTF/OTF font file.
    pub fn load(path: &Path) -> RenderResult<Self> {
        let data = std::fs::read(path)
            .map_err(|e| RendererError::Font(format!("{}: {e}", path.display())))?;
        let rasterizer = Self::from_bytes(data)?;
        log::info!("Loaded font {}", path.display());
        Ok(rasterizer)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Advance width of `text` at `px` pixels.
    pub fn measure(&self, text: &str, px: f64) -> f64 {
        let Some(font) = &self.font else {
            return text.chars().count() as f64 * px * APPROX_CHAR_WIDTH_EM;
        };
        let scaled = font.as_scaled(px as f32);
        let mut width = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let gid = font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, gid);
            }
            width += scaled.h_advance(gid);
            prev = Some(gid);
        }
        f64::from(width)
    }

    /// Draw `text` with its baseline starting at `baseline`.
    pub fn draw(&self, surface: &mut Surface, text: &str, baseline: Point, px: f64, color: Color) {
        let Some(font) = &self.font else {
            if !self.warned.swap(true, Ordering::Relaxed) {
                log::warn!("No font loaded, text objects are not drawn");
            }
            return;
        };
        let size = px as f32;
        let scaled = font.as_scaled(size);
        let mut x = baseline.x as f32;
        let y = baseline.y as f32;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let gid = font.glyph_id(ch);
            if let Some(prev) = prev {
                x += scaled.kern(prev, gid);
            }
            let glyph = gid.with_scale_and_position(size, ab_glyph::point(x, y));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px_x = bounds.min.x as i32 + gx as i32;
                    let px_y = bounds.min.y as i32 + gy as i32;
                    surface.blend_pixel(px_x, px_y, color, coverage);
                });
            }
            x += scaled.h_advance(gid);
            prev = Some(gid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_font_draws() {
        let text = TextRasterizer::new();
        assert!(text.has_font());
        let width = text.measure("Hello", 20.0);
        assert!(width > 0.0 && width < 100.0);
        let mut surface = Surface::new(60, 30).unwrap();
        text.draw(&mut surface, "Hi", Point::new(2.0, 22.0), 20.0, Color::black());
        let painted = (0..30)
            .flat_map(|y| (0..60).map(move |x| (x, y)))
            .filter(|&(x, y)| surface.pixel(x, y).is_some_and(|c| c.a > 0))
            .count();
        assert!(painted > 10);
    }

    #[test]
    fn test_fallback_measure() {
        let text = TextRasterizer::without_font();
        assert!((text.measure("Hello", 20.0) - 55.0).abs() < 1e-9);
        assert!(text.measure("", 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_draw_without_font_is_noop() {
        let text = TextRasterizer::without_font();
        let mut surface = Surface::new(10, 10).unwrap();
        let before = surface.clone();
        text.draw(&mut surface, "hi", Point::new(1.0, 8.0), 12.0, Color::black());
        assert_eq!(surface, before);
    }

    #[test]
    fn test_invalid_font_bytes() {
        let result = TextRasterizer::from_bytes(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(RendererError::Font(_))));
    }

    #[test]
    fn test_missing_font_file() {
        let result = TextRasterizer::load(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(RendererError::Font(_))));
    }
}
