//! Linear, radial, conical, and rectangular gradients with a cached color
//! LUT (`spec.md` §4.4).

use std::sync::Arc;

use fog_geom::{PointD, Transform};
use once_cell::sync::Lazy;

use crate::color::Color;
use crate::error::PatternError;
use crate::spread::Spread;

/// One color stop: a position in `[0, 1]` and the color at that position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

/// Default LUT resolution; `spec.md` §4.4 allows 256/512/1024.
pub const DEFAULT_LUT_SIZE: usize = 256;

/// The geometric shape a gradient is projected onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
    /// Linearly interpolates along the segment `p0 -> p1`.
    Linear { p0: PointD, p1: PointD },
    /// Interpolates by distance from `focal` towards the circle of `radius`
    /// centered at `center`.
    Radial { center: PointD, radius: f64, focal: PointD },
    /// Interpolates by angle around `center`, normalized to `[0, 1)` via
    /// `atan2`.
    Conical { center: PointD, angle: f64 },
    /// SVG-style rectangular shading: distance metric is the max of the two
    /// axis-normalized distances from `rect`'s center.
    Rectangular { rect: fog_geom::RectD },
}

/// A gradient pattern: geometry, stops, and a spread mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    pub stops: Vec<ColorStop>,
    pub spread: Spread,
    /// Maps device space into gradient space (inverted before fetching).
    pub transform: Transform,
}

impl Gradient {
    /// Validates stop/geometry invariants and builds the fetcher's LUT.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NoStops`] if `stops` is empty, or
    /// [`PatternError::DegenerateGeometry`] for a zero-length linear axis or
    /// zero outer radius.
    pub fn new(kind: GradientKind, mut stops: Vec<ColorStop>, spread: Spread, transform: Transform) -> Result<Self, PatternError> {
        if stops.is_empty() {
            return Err(PatternError::NoStops);
        }
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        match kind {
            GradientKind::Linear { p0, p1 } if p0 == p1 => return Err(PatternError::DegenerateGeometry),
            GradientKind::Radial { radius, .. } if radius <= 0.0 => return Err(PatternError::DegenerateGeometry),
            _ => {}
        }
        Ok(Self { kind, stops, spread, transform })
    }

    fn lut(&self) -> Arc<Vec<u32>> {
        lookup_lut(&self.stops, self.spread, DEFAULT_LUT_SIZE)
    }

    /// Parameterizes `p` (already in gradient space) to `t`, or `None` if
    /// [`Spread::None`] excludes it.
    fn parameter_at(&self, p: PointD) -> Option<f64> {
        let t = match self.kind {
            GradientKind::Linear { p0, p1 } => {
                let dx = p1.x - p0.x;
                let dy = p1.y - p0.y;
                let len2 = dx * dx + dy * dy;
                ((p.x - p0.x) * dx + (p.y - p0.y) * dy) / len2
            }
            GradientKind::Radial { center, radius, focal } => {
                radial_parameter(p, center, radius, focal)
            }
            GradientKind::Conical { center, angle } => {
                let a = (p.y - center.y).atan2(p.x - center.x) - angle;
                let turns = a / (2.0 * std::f64::consts::PI);
                turns.rem_euclid(1.0)
            }
            GradientKind::Rectangular { rect } => {
                let cx = rect.x + rect.w / 2.0;
                let cy = rect.y + rect.h / 2.0;
                let nx = if rect.w > 0.0 { (p.x - cx).abs() / (rect.w / 2.0) } else { 0.0 };
                let ny = if rect.h > 0.0 { (p.y - cy).abs() / (rect.h / 2.0) } else { 0.0 };
                nx.max(ny)
            }
        };
        self.spread.apply(t)
    }

    /// Fetches `len` consecutive device pixels starting at `(x, y)` into
    /// `out`, inverting the gradient's transform to map each pixel into
    /// gradient space.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NotInvertible`] if `self.transform` has no
    /// inverse.
    pub fn fetch(&self, x: i32, y: i32, len: usize, out: &mut [u32]) -> Result<(), PatternError> {
        debug_assert!(out.len() >= len);
        let inv = self.transform.invert().map_err(|_| PatternError::NotInvertible)?;
        let lut = self.lut();
        let lut_last = (lut.len() - 1) as f64;
        for i in 0..len {
            let device = PointD::new(f64::from(x) + i as f64 + 0.5, f64::from(y) + 0.5);
            let local = inv.transform_point(device);
            out[i] = match self.parameter_at(local) {
                Some(t) => lut[(t * lut_last).round() as usize],
                None => Color::TRANSPARENT.to_u32(),
            };
        }
        Ok(())
    }
}

fn radial_parameter(p: PointD, center: PointD, radius: f64, focal: PointD) -> f64 {
    // Solve for t such that p lies on the circle interpolated between focal
    // (t=0) and the outer circle of `radius` around `center` (t=1):
    // |p - lerp(focal, center, t)| = t * radius is the classic CSS/SVG
    // radial-gradient quadratic in t.
    let dx = center.x - focal.x;
    let dy = center.y - focal.y;
    let fx = p.x - focal.x;
    let fy = p.y - focal.y;

    let a = dx * dx + dy * dy - radius * radius;
    let b = -2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy;

    if a.abs() < 1e-9 {
        if b.abs() < 1e-12 {
            return 0.0;
        }
        return -c / b;
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return 1.0; // outside the gradient's defined cone; spread handles clamping
    }
    let sqrt_disc = disc.sqrt();
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    let t2 = (-b - sqrt_disc) / (2.0 * a);
    t1.max(t2)
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct LutKey {
    stops: Vec<(u64, u32)>,
    spread: Spread,
    size: usize,
}

fn lut_key(stops: &[ColorStop], spread: Spread, size: usize) -> LutKey {
    LutKey {
        stops: stops.iter().map(|s| (s.offset.to_bits(), s.color.to_u32())).collect(),
        spread,
        size,
    }
}

static LUT_CACHE: Lazy<moka::sync::Cache<LutKey, Arc<Vec<u32>>>> =
    Lazy::new(|| moka::sync::Cache::builder().max_capacity(256).build());

fn lookup_lut(stops: &[ColorStop], spread: Spread, size: usize) -> Arc<Vec<u32>> {
    let key = lut_key(stops, spread, size);
    LUT_CACHE.get_with(key, || Arc::new(build_lut(stops, size)))
}

fn build_lut(stops: &[ColorStop], size: usize) -> Vec<u32> {
    let mut lut = Vec::with_capacity(size);
    for i in 0..size {
        let t = i as f64 / (size - 1).max(1) as f64;
        lut.push(sample_stops(stops, t).to_u32());
    }
    lut
}

fn sample_stops(stops: &[ColorStop], t: f64) -> Color {
    if stops.len() == 1 {
        return stops[0].color;
    }
    if t <= stops[0].offset {
        return stops[0].color;
    }
    if t >= stops[stops.len() - 1].offset {
        return stops[stops.len() - 1].color;
    }
    for w in stops.windows(2) {
        let (a, b) = (w[0], w[1]);
        if t >= a.offset && t <= b.offset {
            let span = (b.offset - a.offset).max(1e-12);
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_geom::RectD;

    fn stops() -> Vec<ColorStop> {
        vec![
            ColorStop { offset: 0.0, color: Color::from_premultiplied(255, 255, 0, 0) },
            ColorStop { offset: 1.0, color: Color::from_premultiplied(255, 0, 0, 255) },
        ]
    }

    #[test]
    fn linear_gradient_interpolates_along_axis() {
        let g = Gradient::new(
            GradientKind::Linear { p0: PointD::new(0.0, 0.0), p1: PointD::new(10.0, 0.0) },
            stops(),
            Spread::Pad,
            Transform::identity(),
        )
        .unwrap();
        let mut out = [0u32; 3];
        g.fetch(0, 0, 3, &mut out).unwrap();
        let start = Color::from_u32(out[0]);
        let end = Color::from_u32(out[2]);
        assert!(start.r > end.r);
        assert!(end.b > start.b);
    }

    #[test]
    fn zero_length_linear_axis_is_rejected() {
        let result = Gradient::new(
            GradientKind::Linear { p0: PointD::ZERO, p1: PointD::ZERO },
            stops(),
            Spread::Pad,
            Transform::identity(),
        );
        assert_eq!(result.unwrap_err(), PatternError::DegenerateGeometry);
    }

    #[test]
    fn spread_none_leaves_out_of_range_pixels_transparent() {
        let g = Gradient::new(
            GradientKind::Linear { p0: PointD::new(0.0, 0.0), p1: PointD::new(10.0, 0.0) },
            stops(),
            Spread::None,
            Transform::identity(),
        )
        .unwrap();
        let mut out = [0u32; 1];
        g.fetch(-5, 0, 1, &mut out).unwrap();
        assert_eq!(Color::from_u32(out[0]), Color::TRANSPARENT);
    }

    #[test]
    fn rectangular_gradient_uses_max_axis_distance() {
        let g = Gradient::new(
            GradientKind::Rectangular { rect: RectD::new(0.0, 0.0, 10.0, 20.0) },
            stops(),
            Spread::Pad,
            Transform::identity(),
        )
        .unwrap();
        let mut out = [0u32; 1];
        g.fetch(5, 10, 1, &mut out).unwrap(); // center, t should be ~0
        assert_eq!(Color::from_u32(out[0]).r, 255);
    }

    #[test]
    fn same_stops_share_a_cached_lut() {
        let a = lookup_lut(&stops(), Spread::Pad, DEFAULT_LUT_SIZE);
        let b = lookup_lut(&stops(), Spread::Pad, DEFAULT_LUT_SIZE);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
