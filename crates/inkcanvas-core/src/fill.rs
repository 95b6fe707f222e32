//! Bounded, tolerance-based flood fill over a raster buffer.

use crate::error::CanvasError;
use crate::raster::RasterBuffer;
use crate::shapes::Color;
use std::collections::VecDeque;

/// Default color distance under which a pixel joins the filled region.
pub const DEFAULT_FILL_TOLERANCE: f64 = 32.0;

/// Tolerance used to decide that the seed already has the fill color.
const SEED_MATCH_TOLERANCE: f64 = 1.0;

/// Pixels this transparent are all considered the same color.
const TRANSPARENT_ALPHA: u8 = 10;

/// Why a fill did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Seed lies outside the buffer.
    OutOfBounds,
    /// Seed pixel already has the fill color.
    AlreadyFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    Skipped(SkipReason),
    Completed,
    /// The iteration bound was reached with work still queued. The partial
    /// result has been written back.
    Truncated,
}

/// Summary of one flood fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOutcome {
    pub status: FillStatus,
    /// Queue pops performed.
    pub pops: usize,
    /// Pixels recolored.
    pub filled: usize,
}

impl FillOutcome {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            status: FillStatus::Skipped(reason),
            pops: 0,
            filled: 0,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.status == FillStatus::Truncated
    }

    /// The error to report when the fill stopped early.
    pub fn truncation(&self) -> Option<CanvasError> {
        self.is_truncated()
            .then_some(CanvasError::FillTruncated { iterations: self.pops })
    }
}

/// Whether two colors are close enough to be treated as one.
///
/// Two nearly transparent pixels always match. Otherwise the alpha difference
/// and the Euclidean RGB distance must both stay within `tolerance`.
pub fn colors_match(a: Color, b: Color, tolerance: f64) -> bool {
    if a.a < TRANSPARENT_ALPHA && b.a < TRANSPARENT_ALPHA {
        return true;
    }
    if f64::from(a.a.abs_diff(b.a)) > tolerance {
        return false;
    }
    let dr = f64::from(a.r) - f64::from(b.r);
    let dg = f64::from(a.g) - f64::from(b.g);
    let db = f64::from(a.b) - f64::from(b.b);
    (dr * dr + dg * dg + db * db).sqrt() <= tolerance
}

/// Fill the 4-connected region around the seed, bounded to one pass over
/// the buffer.
pub fn flood_fill(
    buffer: &mut RasterBuffer,
    seed_x: i64,
    seed_y: i64,
    fill: Color,
    tolerance: f64,
) -> FillOutcome {
    let max_iterations = buffer.width() as usize * buffer.height() as usize;
    flood_fill_bounded(buffer, seed_x, seed_y, fill, tolerance, max_iterations)
}

/// [`flood_fill`] with an explicit iteration bound.
///
/// Works on a scratch copy; the buffer is replaced once at the end.
pub fn flood_fill_bounded(
    buffer: &mut RasterBuffer,
    seed_x: i64,
    seed_y: i64,
    fill: Color,
    tolerance: f64,
    max_iterations: usize,
) -> FillOutcome {
    if !buffer.in_bounds(seed_x, seed_y) {
        log::debug!("Fill seed ({seed_x}, {seed_y}) is outside the canvas");
        return FillOutcome::skipped(SkipReason::OutOfBounds);
    }
    let (sx, sy) = (seed_x as u32, seed_y as u32);
    let Some(seed_color) = buffer.pixel(sx, sy) else {
        return FillOutcome::skipped(SkipReason::OutOfBounds);
    };
    if colors_match(seed_color, fill, SEED_MATCH_TOLERANCE) {
        log::debug!("Fill seed already has color {fill}");
        return FillOutcome::skipped(SkipReason::AlreadyFilled);
    }

    let width = buffer.width();
    let height = buffer.height();
    let mut scratch = buffer.clone();
    let mut visited = vec![false; width as usize * height as usize];
    let mut queue = VecDeque::new();

    queue.push_back((sx, sy));
    visited[sy as usize * width as usize + sx as usize] = true;

    let mut pops = 0;
    let mut filled = 0;
    while pops < max_iterations {
        let Some((x, y)) = queue.pop_front() else {
            break;
        };
        pops += 1;

        let matches = scratch
            .pixel(x, y)
            .is_some_and(|current| colors_match(seed_color, current, tolerance));
        if !matches {
            continue;
        }
        scratch.set_pixel(x, y, fill);
        filled += 1;

        let neighbors = [
            (i64::from(x) + 1, i64::from(y)),
            (i64::from(x) - 1, i64::from(y)),
            (i64::from(x), i64::from(y) + 1),
            (i64::from(x), i64::from(y) - 1),
        ];
        for (nx, ny) in neighbors {
            if !scratch.in_bounds(nx, ny) {
                continue;
            }
            let vi = ny as usize * width as usize + nx as usize;
            if !visited[vi] {
                visited[vi] = true;
                queue.push_back((nx as u32, ny as u32));
            }
        }
    }

    let status = if queue.is_empty() {
        FillStatus::Completed
    } else {
        log::warn!("Flood fill stopped after {pops} iterations, result may be incomplete");
        FillStatus::Truncated
    };
    *buffer = scratch;
    log::debug!("Flood fill finished: {pops} pops, {filled} pixels");
    FillOutcome { status, pops, filled }
}
