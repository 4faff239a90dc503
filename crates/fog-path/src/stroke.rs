//! Stroker: converts a flattened path into the filled contour of a stroked
//! shape.
//!
//! `spec.md` §4.2: honors `lineWidth`, `lineCap`, `lineJoin`, `innerJoin`,
//! `miterLimit`, and optional dash arrays. Degenerate zero-length segments
//! are skipped; miter joins falling outside the miter limit fall back to
//! bevel.
//!
//! # Design note
//!
//! Rather than building a single exact outline contour (as the original
//! AGG-derived stroker does), this implementation emits one small, winding-
//! consistent polygon per segment body and per join/cap, and relies on the
//! rasterizer's `NON_ZERO` fill rule to union them. Overlap at joins is
//! harmless under `NON_ZERO` (coverage saturates, it doesn't cancel) and
//! this keeps the stroker's geometry simple and easy to verify; see
//! `DESIGN.md`.

use fog_geom::PointD;

use crate::flatten::{FlatPath, FlatSubpath};

/// How a stroked line's end is capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    /// Ends exactly at the endpoint.
    Butt,
    /// Extends past the endpoint by half the line width, square-cut.
    Square,
    /// Extends past the endpoint by half the line width, rounded.
    Round,
}

/// How two stroked segments meet at an interior vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    /// Sharp corner extended to a point, falling back to [`LineJoin::Bevel`]
    /// past `miter_limit`.
    Miter,
    /// Like `Miter`, but the miter point is reflected through the vertex
    /// when the limit is exceeded instead of beveling.
    MiterRevert,
    /// `Miter` rounded off instead of beveled past the limit.
    MiterRound,
    /// Smooth circular arc.
    Round,
    /// Flat triangle connecting the two offset edges directly.
    Bevel,
}

/// How the *inner* side of a join (the concave side of a turn) is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerJoin {
    /// Inner side is left as a bevel (simple, avoids self-intersection).
    Bevel,
    /// Inner side is mitered to a point.
    Miter,
    /// Inner side mirrors the outer join style.
    Round,
    /// No special inner-join geometry; rely on `NON_ZERO` overlap.
    Jag,
}

/// Stroke parameters (`spec.md` §4.2 / §3 "stroke params").
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeParams {
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub inner_join: InnerJoin,
    pub miter_limit: f64,
    /// Dash pattern lengths, alternating on/off. Empty disables dashing
    /// (`spec.md` §8: "dash array of length 0 disables dashing").
    pub dash_pattern: Vec<f64>,
    pub dash_offset: f64,
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            inner_join: InnerJoin::Bevel,
            miter_limit: 4.0,
            dash_pattern: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

const ROUND_JOIN_STEPS_PER_RADIAN: f64 = 6.0;

/// Strokes every subpath of `flat`, returning the filled contour as a new
/// [`FlatPath`] of (possibly overlapping, `NON_ZERO`-safe) closed polygons.
///
/// A zero-width stroke still draws a one-pixel hairline (`spec.md` §8): this
/// clamps `params.width` up to a minimum of one device unit.
#[must_use]
#[tracing::instrument(level = "trace", skip_all, fields(subpaths = flat.subpaths.len()))]
pub fn stroke(flat: &FlatPath, params: &StrokeParams) -> FlatPath {
    let half_width = (params.width.max(1.0)) / 2.0;
    let mut out = FlatPath::default();

    for sp in &flat.subpaths {
        let runs = if params.dash_pattern.is_empty() {
            vec![(sp.points.clone(), sp.closed)]
        } else {
            apply_dash(&sp.points, sp.closed, &params.dash_pattern, params.dash_offset)
        };
        for (pts, closed) in runs {
            stroke_run(&pts, closed, half_width, params, &mut out);
        }
    }
    out
}

fn stroke_run(
    pts: &[PointD],
    closed: bool,
    half_width: f64,
    params: &StrokeParams,
    out: &mut FlatPath,
) {
    let pts = dedup_zero_length(pts);
    if pts.len() < 2 {
        return;
    }

    let n = pts.len();
    let seg_count = if closed { n } else { n - 1 };

    for i in 0..seg_count {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        emit_segment_quad(a, b, half_width, out);
    }

    let first_interior = usize::from(!closed);
    let last_interior = if closed { n } else { n - 1 };
    for i in first_interior..last_interior {
        let prev = pts[(i + n - 1) % n];
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        emit_join(prev, cur, next, half_width, params, out);
    }

    if !closed {
        emit_cap(pts[1], pts[0], half_width, params.cap, out);
        emit_cap(pts[n - 2], pts[n - 1], half_width, params.cap, out);
    }
}

/// Removes consecutive duplicate points (zero-length segments).
fn dedup_zero_length(pts: &[PointD]) -> Vec<PointD> {
    let mut out: Vec<PointD> = Vec::with_capacity(pts.len());
    for &p in pts {
        if out.last().is_none_or(|&last: &PointD| last.distance_to(p) > 1e-9) {
            out.push(p);
        }
    }
    out
}

/// Unit left-hand normal of the direction `a -> b`.
fn normal(a: PointD, b: PointD) -> PointD {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = dx.hypot(dy).max(1e-12);
    PointD::new(-dy / len, dx / len)
}

fn emit_segment_quad(a: PointD, b: PointD, half_width: f64, out: &mut FlatPath) {
    let n = normal(a, b);
    let off = PointD::new(n.x * half_width, n.y * half_width);
    out.subpaths.push(FlatSubpath {
        points: vec![
            a + off,
            b + off,
            b - off,
            a - off,
            a + off,
        ],
        closed: true,
    });
}

fn emit_join(
    prev: PointD,
    cur: PointD,
    next: PointD,
    half_width: f64,
    params: &StrokeParams,
    out: &mut FlatPath,
) {
    let n0 = normal(prev, cur);
    let n1 = normal(cur, next);
    // Cross product sign tells us which side is the "outer" (convex) turn.
    let cross = n0.x * n1.y - n0.y * n1.x;
    if cross.abs() < 1e-12 {
        return; // collinear, no join geometry needed
    }

    let outer_style = params.join;
    let outer_sign: f64 = if cross < 0.0 { 1.0 } else { -1.0 };

    let p0 = cur + PointD::new(n0.x * half_width * outer_sign, n0.y * half_width * outer_sign);
    let p1 = cur + PointD::new(n1.x * half_width * outer_sign, n1.y * half_width * outer_sign);

    match outer_style {
        LineJoin::Bevel => emit_triangle(cur, p0, p1, out),
        LineJoin::Round => emit_round_fan(cur, p0, p1, half_width, out),
        LineJoin::Miter | LineJoin::MiterRevert | LineJoin::MiterRound => {
            if let Some(miter_pt) = miter_point(cur, p0, p1, half_width, params.miter_limit) {
                out.subpaths.push(FlatSubpath {
                    points: vec![cur, p0, miter_pt, p1, cur],
                    closed: true,
                });
            } else {
                match outer_style {
                    LineJoin::MiterRound => emit_round_fan(cur, p0, p1, half_width, out),
                    _ => emit_triangle(cur, p0, p1, out),
                }
            }
        }
    }

    // Inner (concave) side: by default rely on the overlapping segment
    // quads (Jag/Bevel both reduce to "do nothing extra" here since the
    // quads already cover the concave corner); Miter/Round inner joins get
    // explicit geometry to avoid a visible notch at sharp angles.
    let inner_sign = -outer_sign;
    let q0 = cur + PointD::new(n0.x * half_width * inner_sign, n0.y * half_width * inner_sign);
    let q1 = cur + PointD::new(n1.x * half_width * inner_sign, n1.y * half_width * inner_sign);
    match params.inner_join {
        InnerJoin::Miter => {
            if let Some(m) = miter_point(cur, q0, q1, half_width, params.miter_limit) {
                out.subpaths.push(FlatSubpath {
                    points: vec![cur, q0, m, q1, cur],
                    closed: true,
                });
            }
        }
        InnerJoin::Round => emit_round_fan(cur, q0, q1, half_width, out),
        InnerJoin::Bevel | InnerJoin::Jag => {}
    }
}

fn emit_triangle(a: PointD, b: PointD, c: PointD, out: &mut FlatPath) {
    out.subpaths.push(FlatSubpath {
        points: vec![a, b, c, a],
        closed: true,
    });
}

/// Computes the miter point for a join at `cur` between offset points `p0`
/// and `p1`, or `None` if the miter ratio exceeds `miter_limit` (caller
/// falls back to bevel/round).
fn miter_point(cur: PointD, p0: PointD, p1: PointD, half_width: f64, miter_limit: f64) -> Option<PointD> {
    let d0 = PointD::new(p0.x - cur.x, p0.y - cur.y);
    let d1 = PointD::new(p1.x - cur.x, p1.y - cur.y);
    let sum = PointD::new(d0.x + d1.x, d0.y + d1.y);
    let sum_len = sum.x.hypot(sum.y);
    if sum_len < 1e-9 {
        return None;
    }
    let unit = PointD::new(sum.x / sum_len, sum.y / sum_len);
    // cos(half the angle between d0 and d1): miter length = half_width / cos(theta/2)
    let cos_half = (d0.x * unit.x + d0.y * unit.y) / half_width;
    if cos_half.abs() < 1e-6 {
        return None;
    }
    let miter_len = half_width / cos_half;
    let ratio = miter_len.abs() / half_width;
    if ratio > miter_limit {
        return None;
    }
    Some(PointD::new(cur.x + unit.x * miter_len, cur.y + unit.y * miter_len))
}

fn emit_round_fan(center: PointD, p0: PointD, p1: PointD, radius: f64, out: &mut FlatPath) {
    let a0 = (p0.y - center.y).atan2(p0.x - center.x);
    let mut a1 = (p1.y - center.y).atan2(p1.x - center.x);
    let mut delta = a1 - a0;
    if delta > std::f64::consts::PI {
        delta -= 2.0 * std::f64::consts::PI;
    } else if delta < -std::f64::consts::PI {
        delta += 2.0 * std::f64::consts::PI;
    }
    a1 = a0 + delta;

    let steps = ((delta.abs() * ROUND_JOIN_STEPS_PER_RADIAN).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for i in 0..=steps {
        let t = a0 + delta * (i as f64 / steps as f64);
        points.push(PointD::new(center.x + radius * t.cos(), center.y + radius * t.sin()));
    }
    points.push(center);
    out.subpaths.push(FlatSubpath { points, closed: true });
}

fn emit_cap(from: PointD, tip: PointD, half_width: f64, cap: LineCap, out: &mut FlatPath) {
    let n = normal(from, tip);
    let dir = {
        let dx = tip.x - from.x;
        let dy = tip.y - from.y;
        let len = dx.hypot(dy).max(1e-12);
        PointD::new(dx / len, dy / len)
    };
    let left = tip + PointD::new(n.x * half_width, n.y * half_width);
    let right = tip - PointD::new(n.x * half_width, n.y * half_width);

    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            let ext = PointD::new(dir.x * half_width, dir.y * half_width);
            out.subpaths.push(FlatSubpath {
                points: vec![left, left + ext, right + ext, right, left],
                closed: true,
            });
        }
        LineCap::Round => emit_round_fan(tip, left, right, half_width, out),
    }
}

/// Applies a dash pattern (alternating on/off lengths, starting with "on")
/// to a poly-line, returning the on-segments as independent open runs.
fn apply_dash(
    pts: &[PointD],
    closed: bool,
    pattern: &[f64],
    offset: f64,
) -> Vec<(Vec<PointD>, bool)> {
    if pattern.iter().all(|&d| d <= 0.0) {
        return vec![(pts.to_vec(), closed)];
    }
    let total: f64 = pattern.iter().sum();
    if total <= 0.0 {
        return vec![(pts.to_vec(), closed)];
    }

    let mut runs = Vec::new();
    let mut current_run: Vec<PointD> = Vec::new();

    let mut dash_pos = offset.rem_euclid(total);
    let mut dash_index = 0;
    let mut remaining = pattern[0];
    while dash_pos > 0.0 {
        if dash_pos < remaining {
            remaining -= dash_pos;
            break;
        }
        dash_pos -= remaining;
        dash_index = (dash_index + 1) % pattern.len();
        remaining = pattern[dash_index];
    }
    let mut on = dash_index % 2 == 0;
    if on {
        current_run.push(pts[0]);
    }

    let n = pts.len();
    let seg_count = if closed { n } else { n - 1 };
    for i in 0..seg_count {
        let mut a = pts[i];
        let b = pts[(i + 1) % n];
        let mut seg_len = a.distance_to(b);
        while seg_len > 0.0 {
            let step = remaining.min(seg_len);
            let t = step / seg_len;
            let mid = PointD::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            if on {
                current_run.push(mid);
            }
            remaining -= step;
            seg_len -= step;
            a = mid;
            if remaining <= 1e-9 {
                if on && current_run.len() > 1 {
                    runs.push((std::mem::take(&mut current_run), false));
                }
                on = !on;
                if on {
                    current_run.push(a);
                }
                dash_index = (dash_index + 1) % pattern.len();
                remaining = pattern[dash_index];
            }
        }
    }
    if on && current_run.len() > 1 {
        runs.push((current_run, false));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{flatten, FlattenOptions};
    use crate::Path;
    use fog_geom::RectD;

    #[test]
    fn straight_line_stroke_produces_one_quad_and_two_caps() {
        let mut p = Path::new();
        p.move_to(PointD::new(0.0, 0.0));
        p.line_to(PointD::new(10.0, 0.0)).unwrap();
        let flat = flatten(&p, &FlattenOptions::default());
        let params = StrokeParams {
            width: 2.0,
            cap: LineCap::Square,
            ..Default::default()
        };
        let contour = stroke(&flat, &params);
        // 1 segment quad + 2 square caps
        assert_eq!(contour.subpaths.len(), 3);
    }

    #[test]
    fn zero_width_clamps_to_one_pixel() {
        let mut p = Path::new();
        p.move_to(PointD::new(0.0, 0.0));
        p.line_to(PointD::new(5.0, 0.0)).unwrap();
        let flat = flatten(&p, &FlattenOptions::default());
        let contour = stroke(&flat, &StrokeParams { width: 0.0, ..Default::default() });
        let quad = &contour.subpaths[0];
        let width = (quad.points[0].y - quad.points[3].y).abs();
        assert!((width - 1.0).abs() < 1e-9);
    }

    #[test]
    fn dash_pattern_splits_line_into_runs() {
        let mut p = Path::new();
        p.move_to(PointD::new(0.0, 0.0));
        p.line_to(PointD::new(10.0, 0.0)).unwrap();
        let flat = flatten(&p, &FlattenOptions::default());
        let params = StrokeParams {
            width: 1.0,
            dash_pattern: vec![2.0, 2.0],
            ..Default::default()
        };
        let contour = stroke(&flat, &params);
        assert!(contour.subpaths.len() >= 3, "expect multiple dash segments worth of quads");
    }

    #[test]
    fn square_stroke_has_corner_joins() {
        let mut p = Path::new();
        p.add_rect(RectD::new(0.0, 0.0, 10.0, 10.0));
        let flat = flatten(&p, &FlattenOptions::default());
        let contour = stroke(&flat, &StrokeParams { width: 2.0, join: LineJoin::Miter, ..Default::default() });
        // 4 segment quads + 4 joins (closed path, no caps)
        assert_eq!(contour.subpaths.len(), 8);
    }
}
