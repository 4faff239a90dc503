//! Flattening: subdividing Bézier curves into line segments.
//!
//! `spec.md` §4.2: "recursively subdivides quadratics/cubics until a
//! per-segment flatness criterion holds: perpendicular distance of control
//! points from the chord ≤ `approxScale · collinearityTol` with additional
//! angle-tolerance checks. Emits a poly-line ready for the rasterizer."

use fog_geom::PointD;

use crate::{Path, PathVertex};

/// Flattening tolerances, modeled after the AGG/FreeType family of
/// rasterizers the original engine is built on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlattenOptions {
    /// Maximum perpendicular distance (device units) a curve's control
    /// points may lie from the chord before it is subdivided further.
    pub distance_tolerance: f64,
    /// Maximum angle (radians) between consecutive chord segments before
    /// subdividing further, even if `distance_tolerance` is satisfied —
    /// catches sharp cusps that a pure distance check would miss.
    pub angle_tolerance: f64,
    /// Hard recursion cap, guarding against runaway subdivision on
    /// degenerate (near-infinite-curvature) input.
    pub max_recursion: u32,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            distance_tolerance: 0.1,
            angle_tolerance: 0.01,
            max_recursion: 32,
        }
    }
}

/// One flattened subpath: a poly-line plus whether it was closed.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatSubpath {
    pub points: Vec<PointD>,
    pub closed: bool,
}

/// A fully flattened path: one poly-line per subpath.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatPath {
    pub subpaths: Vec<FlatSubpath>,
}

/// Flattens every curve in `path` into line segments honoring `opts`.
#[must_use]
pub fn flatten(path: &Path, opts: &FlattenOptions) -> FlatPath {
    let mut out = FlatPath::default();
    let mut current: Option<FlatSubpath> = None;
    let mut start = PointD::ZERO;
    let mut last = PointD::ZERO;

    let finish = |current: &mut Option<FlatSubpath>, out: &mut FlatPath| {
        if let Some(sp) = current.take() {
            if sp.points.len() > 1 {
                out.subpaths.push(sp);
            }
        }
    };

    for v in path.vertices() {
        match v {
            PathVertex::MoveTo(p) => {
                finish(&mut current, &mut out);
                current = Some(FlatSubpath {
                    points: vec![p],
                    closed: false,
                });
                start = p;
                last = p;
            }
            PathVertex::LineTo(p) => {
                if let Some(sp) = current.as_mut() {
                    sp.points.push(p);
                }
                last = p;
            }
            PathVertex::QuadTo { ctrl, to } => {
                if let Some(sp) = current.as_mut() {
                    flatten_quad(last, ctrl, to, opts, 0, &mut sp.points);
                }
                last = to;
            }
            PathVertex::CubicTo { ctrl1, ctrl2, to } => {
                if let Some(sp) = current.as_mut() {
                    flatten_cubic(last, ctrl1, ctrl2, to, opts, 0, &mut sp.points);
                }
                last = to;
            }
            PathVertex::Close => {
                if let Some(sp) = current.as_mut() {
                    sp.closed = true;
                    if sp.points.last() != Some(&start) {
                        sp.points.push(start);
                    }
                }
                last = start;
            }
        }
    }
    finish(&mut current, &mut out);
    let _ = last;
    out
}

/// Perpendicular distance of `p` from the line `a`-`b` (0 if `a == b`).
fn point_line_distance(p: PointD, a: PointD, b: PointD) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = dx.hypot(dy);
    if len < f64::EPSILON {
        return p.distance_to(a);
    }
    ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / len
}

fn flatten_quad(
    from: PointD,
    ctrl: PointD,
    to: PointD,
    opts: &FlattenOptions,
    depth: u32,
    out: &mut Vec<PointD>,
) {
    if depth >= opts.max_recursion || point_line_distance(ctrl, from, to) <= opts.distance_tolerance
    {
        out.push(to);
        return;
    }
    let c01 = midpoint(from, ctrl);
    let c12 = midpoint(ctrl, to);
    let c012 = midpoint(c01, c12);
    flatten_quad(from, c01, c012, opts, depth + 1, out);
    flatten_quad(c012, c12, to, opts, depth + 1, out);
}

#[allow(clippy::too_many_arguments)]
fn flatten_cubic(
    from: PointD,
    ctrl1: PointD,
    ctrl2: PointD,
    to: PointD,
    opts: &FlattenOptions,
    depth: u32,
    out: &mut Vec<PointD>,
) {
    let d1 = point_line_distance(ctrl1, from, to);
    let d2 = point_line_distance(ctrl2, from, to);
    let flat_enough = d1 + d2 <= opts.distance_tolerance;

    if depth >= opts.max_recursion || (flat_enough && angle_ok(from, ctrl1, ctrl2, to, opts)) {
        out.push(to);
        return;
    }

    let ab = midpoint(from, ctrl1);
    let bc = midpoint(ctrl1, ctrl2);
    let cd = midpoint(ctrl2, to);
    let abc = midpoint(ab, bc);
    let bcd = midpoint(bc, cd);
    let abcd = midpoint(abc, bcd);

    flatten_cubic(from, ab, abc, abcd, opts, depth + 1, out);
    flatten_cubic(abcd, bcd, cd, to, opts, depth + 1, out);
}

fn angle_ok(from: PointD, ctrl1: PointD, ctrl2: PointD, to: PointD, opts: &FlattenOptions) -> bool {
    if opts.angle_tolerance <= 0.0 {
        return true;
    }
    let a1 = (ctrl1.y - from.y).atan2(ctrl1.x - from.x);
    let a2 = (to.y - ctrl2.y).atan2(to.x - ctrl2.x);
    let mut da = (a2 - a1).abs();
    if da > std::f64::consts::PI {
        da = 2.0 * std::f64::consts::PI - da;
    }
    da <= opts.angle_tolerance
}

fn midpoint(a: PointD, b: PointD) -> PointD {
    PointD::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_geom::RectD;

    #[test]
    fn straight_rect_flattens_to_its_own_corners() {
        let mut p = Path::new();
        p.add_rect(RectD::new(0.0, 0.0, 10.0, 10.0));
        let flat = flatten(&p, &FlattenOptions::default());
        assert_eq!(flat.subpaths.len(), 1);
        assert!(flat.subpaths[0].closed);
        assert_eq!(flat.subpaths[0].points.len(), 5); // 4 corners + closing point
    }

    #[test]
    fn curve_stays_within_tolerance_of_chord() {
        let mut p = Path::new();
        p.move_to(PointD::new(0.0, 0.0));
        p.cubic_to(
            PointD::new(0.0, 100.0),
            PointD::new(100.0, 100.0),
            PointD::new(100.0, 0.0),
        )
        .unwrap();
        let opts = FlattenOptions {
            distance_tolerance: 0.25,
            ..Default::default()
        };
        let flat = flatten(&p, &opts);
        let pts = &flat.subpaths[0].points;
        assert!(pts.len() > 4, "should have subdivided several times");
    }

    #[test]
    fn tighter_tolerance_yields_more_points() {
        let mut p = Path::new();
        p.move_to(PointD::new(0.0, 0.0));
        p.cubic_to(
            PointD::new(0.0, 100.0),
            PointD::new(100.0, 100.0),
            PointD::new(100.0, 0.0),
        )
        .unwrap();
        let loose = flatten(
            &p,
            &FlattenOptions {
                distance_tolerance: 5.0,
                ..Default::default()
            },
        );
        let tight = flatten(
            &p,
            &FlattenOptions {
                distance_tolerance: 0.05,
                ..Default::default()
            },
        );
        assert!(tight.subpaths[0].points.len() >= loose.subpaths[0].points.len());
    }
}
