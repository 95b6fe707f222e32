//! Plain pixel buffer for the raster layer.

use crate::error::{CanvasError, CanvasResult};
use crate::shapes::Color;

/// Straight-alpha RGBA8 pixels, row-major, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wrap existing RGBA bytes. The length must match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> CanvasResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CanvasError::SurfaceRead(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Buffer filled with one color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let data = color.to_array().repeat(width as usize * height as usize);
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Zero-area buffers carry no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether signed coordinates fall inside the buffer.
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Color at `(x, y)`, or None outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Color::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Overwrite one pixel. Returns false outside the buffer.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&color.to_array());
        true
    }

    /// Copy into a buffer of a new size, anchored at the top-left corner.
    /// Pixels outside the new area are lost; new area is transparent.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        let mut out = Self::new(width, height);
        let copy_w = self.width.min(width) as usize * 4;
        for y in 0..self.height.min(height) {
            let src = self.offset(0, y);
            let dst = out.offset(0, y);
            out.data[dst..dst + copy_w].copy_from_slice(&self.data[src..src + copy_w]);
        }
        out
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}
