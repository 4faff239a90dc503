//! The analytic scanline rasterizer.
//!
//! `spec.md` §4.3: an anti-aliased edge rasterizer in the FreeType/AGG
//! family, 256 subpixel steps (8-bit coverage). Segments contribute signed
//! area to a per-row accumulator; a left-to-right sweep turns the running
//! sum into per-pixel coverage, which is then run-length-encoded into
//! [`RasterSpan`]s.

use fog_geom::BoxI;
use fog_path::FlatPath;

use crate::error::RasterError;
use crate::span::{Coverage, RasterSpan, Scanline};

/// Which pixels are considered "inside" a self-intersecting or multi-contour
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    /// A point is inside if the winding number is non-zero.
    NonZero,
    /// A point is inside if an odd number of edges cross to its left.
    EvenOdd,
}

/// The rasterizer's working coordinate precision (`spec.md` §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// 24 integer bits, 8 fractional bits — the default, typical-graphics
    /// range.
    Precision24x8,
    /// 16 integer bits, 8 fractional bits — a degraded fallback for very
    /// large coordinates that would overflow the 24.8 accumulator.
    Precision16x8,
}

impl Precision {
    /// Largest absolute coordinate value this precision can represent
    /// without overflow.
    #[must_use]
    pub fn max_coord(self) -> f64 {
        match self {
            Self::Precision24x8 => f64::from(1_i64 << 24) - 1.0,
            Self::Precision16x8 => f64::from(1_i64 << 16) - 1.0,
        }
    }
}

/// Converts a flattened path into per-row coverage spans within a device
/// clip box.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    clip: BoxI,
    fill_rule: FillRule,
    precision: Precision,
}

impl Rasterizer {
    /// A rasterizer bound to `clip` (typically the intersection of the
    /// device clip region and this worker's Y band), using the default
    /// 24.8 precision.
    #[must_use]
    pub fn new(clip: BoxI, fill_rule: FillRule) -> Self {
        Self { clip, fill_rule, precision: Precision::Precision24x8 }
    }

    /// Overrides the working precision, used by the engine when source
    /// coordinates are known to exceed the 24.8 range.
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Rasterizes `flat`, producing one [`Scanline`] per non-empty row in
    /// the clip box.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::CoordinateOverflow`] if any vertex exceeds the
    /// working precision's representable range; per `spec.md` §4.2 this is
    /// treated by the caller as a no-op for the draw call, not a hard error.
    #[tracing::instrument(level = "trace", skip_all, fields(subpaths = flat.subpaths.len()))]
    pub fn rasterize(&self, flat: &FlatPath) -> Result<Vec<Scanline>, RasterError> {
        let width = self.clip.width().max(0) as usize;
        let height = self.clip.height().max(0) as usize;
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }

        let max_coord = self.precision.max_coord();
        for sp in &flat.subpaths {
            for p in &sp.points {
                if p.x.abs() > max_coord {
                    return Err(RasterError::CoordinateOverflow(p.x));
                }
                if p.y.abs() > max_coord {
                    return Err(RasterError::CoordinateOverflow(p.y));
                }
            }
        }

        let mut acc = vec![0f32; height * (width + 1)];
        for sp in &flat.subpaths {
            if sp.points.len() < 2 {
                continue;
            }
            let local: Vec<(f64, f64)> = sp
                .points
                .iter()
                .map(|p| (p.x - f64::from(self.clip.x0), p.y - f64::from(self.clip.y0)))
                .collect();
            for w in local.windows(2) {
                draw_line(&mut acc, width, height, w[0], w[1]);
            }
            // A fill rasterizer implicitly closes every contour, regardless
            // of whether the source path carried an explicit Close.
            if local.first() != local.last() {
                draw_line(&mut acc, width, height, *local.last().unwrap(), local[0]);
            }
        }

        let mut out = Vec::new();
        for y in 0..height {
            let row_start = y * (width + 1);
            let row = &acc[row_start..row_start + width + 1];
            let bytes = sweep_row(row, self.fill_rule);
            if bytes.iter().all(|&b| b == 0) {
                continue;
            }
            let spans = build_spans(&bytes);
            if !spans.is_empty() {
                out.push(Scanline { y: self.clip.y0 + y as i32, spans });
            }
        }
        Ok(out)
    }
}

fn add(acc: &mut [f32], i: usize, v: f32) {
    if let Some(c) = acc.get_mut(i) {
        *c += v;
    }
}

/// Accumulates the signed-area contribution of one line segment into the
/// per-row accumulator `acc` (row-major, `width + 1` columns per row, the
/// extra column catching rightward coverage spill before the sweep).
fn draw_line(acc: &mut [f32], width: usize, height: usize, p0: (f64, f64), p1: (f64, f64)) {
    if (p0.1 - p1.1).abs() < 1e-12 {
        return;
    }
    let (dir, p0, p1) = if p0.1 < p1.1 { (1.0, p0, p1) } else { (-1.0, p1, p0) };
    let dxdy = (p1.0 - p0.0) / (p1.1 - p0.1);

    let y0 = p0.1.max(0.0);
    let y1 = p1.1.min(height as f64);
    if y0 >= y1 {
        return;
    }
    let mut x = p0.0 + dxdy * (y0 - p0.1);

    let y0i = y0 as usize;
    let y1i = (y1.ceil() as usize).min(height);

    for y in y0i..y1i {
        let row_start = y * (width + 1);
        let dy = (f64::from(y as u32 + 1)).min(y1) - (f64::from(y as u32)).max(y0);
        if dy <= 0.0 {
            continue;
        }
        let xnext = x + dxdy * dy;
        let d = (dy * dir) as f32;

        let (xa, xb) = if x < xnext { (x, xnext) } else { (xnext, x) };
        let xa = xa.clamp(0.0, width as f64);
        let xb = xb.clamp(0.0, width as f64);

        let x0f = xa.floor();
        let x0i = x0f as usize;
        let x1c = xb.ceil();
        let x1i = (x1c as usize).min(width);

        if x1i <= x0i + 1 {
            let xmf = (0.5 * (xa + xb) - x0f) as f32;
            add(acc, row_start + x0i, d - d * xmf);
            add(acc, row_start + x0i + 1, d * xmf);
        } else {
            let s = (1.0 / (xb - xa)) as f32;
            let x0fr = (xa - x0f) as f32;
            let a0 = s * (1.0 - x0fr);
            let x1fr = (xb - x1c + 1.0) as f32;
            let am = s * x1fr;

            add(acc, row_start + x0i, d * a0);
            if x1i == x0i + 2 {
                add(acc, row_start + x0i + 1, d * (1.0 - a0 - am));
            } else {
                let a1 = s * (1.5 - x0fr - x0fr);
                add(acc, row_start + x0i + 1, d * (a1 - a0));
                for xi in (x0i + 2)..(x1i - 1) {
                    add(acc, row_start + xi, d * s);
                }
                let a2 = a1 + ((x1i - x0i) as f32 - 3.0) * s;
                add(acc, row_start + x1i - 1, d * (1.0 - a2 - am));
            }
            add(acc, row_start + x1i, d * am);
        }
        x = xnext;
    }
}

/// Sweeps one row's signed-area deltas left to right, applying the fill
/// rule, yielding one coverage byte per pixel column.
fn sweep_row(acc_row: &[f32], fill_rule: FillRule) -> Vec<u8> {
    let mut running = 0f32;
    let mut out = Vec::with_capacity(acc_row.len() - 1);
    for &delta in &acc_row[..acc_row.len() - 1] {
        running += delta;
        let coverage = match fill_rule {
            FillRule::NonZero => running.abs().min(1.0),
            FillRule::EvenOdd => {
                let m = running.rem_euclid(2.0);
                if m > 1.0 {
                    2.0 - m
                } else {
                    m
                }
            }
        };
        out.push((coverage * 255.0).round().clamp(0.0, 255.0) as u8);
    }
    out
}

/// Run-length-encodes a row of coverage bytes: maximal full-coverage runs
/// become `CMASK(255)` spans, maximal runs of varying partial coverage
/// become `VMASK` spans, and zero-coverage pixels emit no span.
fn build_spans(row: &[u8]) -> Vec<RasterSpan> {
    let mut spans = Vec::new();
    let mut x = 0usize;
    let width = row.len();
    while x < width {
        match row[x] {
            0 => x += 1,
            255 => {
                let start = x;
                while x < width && row[x] == 255 {
                    x += 1;
                }
                spans.push(RasterSpan { x0: start as i32, x1: x as i32, coverage: Coverage::Constant(255) });
            }
            _ => {
                let start = x;
                while x < width && row[x] != 0 && row[x] != 255 {
                    x += 1;
                }
                spans.push(RasterSpan {
                    x0: start as i32,
                    x1: x as i32,
                    coverage: Coverage::Mask(std::sync::Arc::from(&row[start..x])),
                });
            }
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_geom::RectD;
    use fog_path::{flatten, FlattenOptions, Path};

    fn flatten_rect(x: f64, y: f64, w: f64, h: f64) -> FlatPath {
        let mut p = Path::new();
        p.add_rect(RectD::new(x, y, w, h));
        flatten(&p, &FlattenOptions::default())
    }

    #[test]
    fn axis_aligned_rect_is_fully_opaque_inside_and_empty_outside() {
        let flat = flatten_rect(2.0, 2.0, 4.0, 4.0);
        let rasterizer = Rasterizer::new(BoxI::new(0, 0, 10, 10), FillRule::NonZero);
        let scanlines = rasterizer.rasterize(&flat).unwrap();
        assert_eq!(scanlines.len(), 4); // rows 2..6

        for sl in &scanlines {
            assert!((2..6).contains(&sl.y));
            assert_eq!(sl.spans.len(), 1);
            assert_eq!(sl.spans[0].x0, 2);
            assert_eq!(sl.spans[0].x1, 6);
            assert!(sl.spans[0].is_opaque());
        }
    }

    #[test]
    fn row_conserves_total_area_for_half_pixel_offset_rect() {
        let flat = flatten_rect(2.5, 2.0, 4.0, 1.0);
        let rasterizer = Rasterizer::new(BoxI::new(0, 0, 10, 10), FillRule::NonZero);
        let scanlines = rasterizer.rasterize(&flat).unwrap();
        assert_eq!(scanlines.len(), 1);
        let total = scanlines[0].total_coverage();
        // area = 4.0 * 255 within rounding of the subpixel grid.
        let expected = (4.0 * 255.0).round() as u64;
        assert!(total.abs_diff(expected) <= 3);
    }

    #[test]
    fn empty_path_produces_no_scanlines() {
        let flat = FlatPath::default();
        let rasterizer = Rasterizer::new(BoxI::new(0, 0, 10, 10), FillRule::NonZero);
        assert!(rasterizer.rasterize(&flat).unwrap().is_empty());
    }

    #[test]
    fn overflowing_coordinate_is_rejected() {
        let flat = flatten_rect(0.0, 0.0, 1.0, 1.0);
        let mut flat = flat;
        flat.subpaths[0].points[0].x = 1e20;
        let rasterizer =
            Rasterizer::new(BoxI::new(0, 0, 10, 10), FillRule::NonZero).with_precision(Precision::Precision16x8);
        assert!(matches!(rasterizer.rasterize(&flat), Err(RasterError::CoordinateOverflow(_))));
    }

    #[test]
    fn even_odd_rule_creates_a_hole_for_nested_opposite_winding_rects() {
        let mut p = Path::new();
        p.add_rect(RectD::new(0.0, 0.0, 10.0, 10.0));
        p.add_rect(RectD::new(3.0, 3.0, 4.0, 4.0));
        let flat = flatten(&p, &FlattenOptions::default());
        let rasterizer = Rasterizer::new(BoxI::new(0, 0, 10, 10), FillRule::EvenOdd);
        let scanlines = rasterizer.rasterize(&flat).unwrap();
        let row5 = scanlines.iter().find(|s| s.y == 5).unwrap();
        // Two spans: left of the hole and right of the hole.
        assert_eq!(row5.spans.len(), 2);
    }
}
