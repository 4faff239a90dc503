//! [`Path`]: an implicitly-shared, copy-on-write sequence of path vertices.
//!
//! `spec.md` §3/§4.2: double-precision in the geometric core, built
//! in-place, copy-on-write shared between clones. Arc/ellipse/round
//! commands are emitted as cubic Béziers via the standard kappa
//! approximation.

use std::sync::Arc;

use fog_geom::{BoxI, PointD, RectD, Transform};

use crate::{PathCommand, PathError, PathVertex};

/// `κ = 4/3·(√2−1)`, the standard constant for approximating a quarter
/// circle with a single cubic Bézier (`spec.md` §4.2).
pub const KAPPA: f64 = 0.552_284_749_830_793_4;

/// A path: a builder-style, copy-on-write sequence of [`PathVertex`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    vertices: Arc<Vec<PathVertex>>,
    /// Index of the vertex that started the current (still-open) subpath,
    /// if any is open.
    current_move_to: Option<usize>,
}

impl Path {
    /// An empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// `true` if the path has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates the path's vertices in order.
    pub fn vertices(&self) -> impl Iterator<Item = PathVertex> + '_ {
        self.vertices.iter().copied()
    }

    fn push(&mut self, v: PathVertex) {
        Arc::make_mut(&mut self.vertices).push(v);
    }

    /// The last on-curve point appended, if any.
    #[must_use]
    pub fn last_point(&self) -> Option<PointD> {
        self.vertices.last().and_then(PathVertex::endpoint).or_else(|| {
            // `Close` carries no point of its own; fall back to the
            // subpath's MoveTo.
            self.current_move_to.and_then(|i| self.vertices.get(i)).and_then(PathVertex::endpoint)
        })
    }

    /// Starts a new subpath at `p`.
    pub fn move_to(&mut self, p: PointD) -> &mut Self {
        self.current_move_to = Some(self.vertices.len());
        self.push(PathVertex::MoveTo(p));
        self
    }

    /// Appends a straight line to `p`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::MissingMoveTo`] if no subpath is open.
    pub fn line_to(&mut self, p: PointD) -> Result<&mut Self, PathError> {
        self.require_open()?;
        self.push(PathVertex::LineTo(p));
        Ok(self)
    }

    /// Appends a quadratic Bézier through `ctrl` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::MissingMoveTo`] if no subpath is open.
    pub fn quad_to(&mut self, ctrl: PointD, to: PointD) -> Result<&mut Self, PathError> {
        self.require_open()?;
        self.push(PathVertex::QuadTo { ctrl, to });
        Ok(self)
    }

    /// Appends a cubic Bézier through `ctrl1`, `ctrl2` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::MissingMoveTo`] if no subpath is open.
    pub fn cubic_to(&mut self, ctrl1: PointD, ctrl2: PointD, to: PointD) -> Result<&mut Self, PathError> {
        self.require_open()?;
        self.push(PathVertex::CubicTo { ctrl1, ctrl2, to });
        Ok(self)
    }

    /// Closes the current subpath. Degenerate (zero-length) closes are kept
    /// — the stroker (`spec.md` §4.2) is responsible for skipping
    /// zero-length segments, not the path builder.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::MissingMoveTo`] if no subpath is open.
    pub fn close(&mut self) -> Result<&mut Self, PathError> {
        self.require_open()?;
        self.push(PathVertex::Close);
        self.current_move_to = None;
        Ok(self)
    }

    fn require_open(&self) -> Result<(), PathError> {
        if self.current_move_to.is_some() {
            Ok(())
        } else {
            Err(PathError::MissingMoveTo)
        }
    }

    /// Appends a closed rectangle subpath.
    pub fn add_rect(&mut self, r: RectD) {
        self.move_to(PointD::new(r.x, r.y));
        let _ = self.line_to(PointD::new(r.right(), r.y));
        let _ = self.line_to(PointD::new(r.right(), r.bottom()));
        let _ = self.line_to(PointD::new(r.x, r.bottom()));
        let _ = self.close();
    }

    /// Appends a closed ellipse subpath inscribed in `r`, built from four
    /// cubic Bézier quarter-arcs using [`KAPPA`].
    pub fn add_ellipse(&mut self, r: RectD) {
        let rx = r.w / 2.0;
        let ry = r.h / 2.0;
        let cx = r.x + rx;
        let cy = r.y + ry;
        let kx = rx * KAPPA;
        let ky = ry * KAPPA;

        self.move_to(PointD::new(cx + rx, cy));
        let _ = self.cubic_to(
            PointD::new(cx + rx, cy + ky),
            PointD::new(cx + kx, cy + ry),
            PointD::new(cx, cy + ry),
        );
        let _ = self.cubic_to(
            PointD::new(cx - kx, cy + ry),
            PointD::new(cx - rx, cy + ky),
            PointD::new(cx - rx, cy),
        );
        let _ = self.cubic_to(
            PointD::new(cx - rx, cy - ky),
            PointD::new(cx - kx, cy - ry),
            PointD::new(cx, cy - ry),
        );
        let _ = self.cubic_to(
            PointD::new(cx + kx, cy - ry),
            PointD::new(cx + rx, cy - ky),
            PointD::new(cx + rx, cy),
        );
        let _ = self.close();
    }

    /// Returns a new path with `t` applied to every point.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NonFinite`] if any transformed point overflows
    /// to NaN/infinity — per `spec.md` §4.2, this is reported rather than
    /// silently producing a broken path; the caller treats the draw call as
    /// a no-op.
    pub fn transformed(&self, t: &Transform) -> Result<Self, PathError> {
        let mut out = Vec::with_capacity(self.vertices.len());
        for v in self.vertices.iter() {
            let tv = match *v {
                PathVertex::MoveTo(p) => PathVertex::MoveTo(t.transform_point(p)),
                PathVertex::LineTo(p) => PathVertex::LineTo(t.transform_point(p)),
                PathVertex::QuadTo { ctrl, to } => PathVertex::QuadTo {
                    ctrl: t.transform_point(ctrl),
                    to: t.transform_point(to),
                },
                PathVertex::CubicTo { ctrl1, ctrl2, to } => PathVertex::CubicTo {
                    ctrl1: t.transform_point(ctrl1),
                    ctrl2: t.transform_point(ctrl2),
                    to: t.transform_point(to),
                },
                PathVertex::Close => PathVertex::Close,
            };
            if let Some(p) = tv.endpoint() {
                if p.is_non_finite() {
                    return Err(PathError::NonFinite);
                }
            }
            out.push(tv);
        }
        Ok(Self {
            vertices: Arc::new(out),
            current_move_to: self.current_move_to,
        })
    }

    /// The integer bounding box of all on-curve and control points
    /// (a loose bound — cubic/quadratic control points may lie outside the
    /// curve itself, which is sufficient for clip-box culling).
    #[must_use]
    pub fn control_bounds(&self) -> BoxI {
        let mut min = PointD::new(f64::INFINITY, f64::INFINITY);
        let mut max = PointD::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut touch = |p: PointD| {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        };
        for v in self.vertices.iter() {
            match *v {
                PathVertex::MoveTo(p) | PathVertex::LineTo(p) => touch(p),
                PathVertex::QuadTo { ctrl, to } => {
                    touch(ctrl);
                    touch(to);
                }
                PathVertex::CubicTo { ctrl1, ctrl2, to } => {
                    touch(ctrl1);
                    touch(ctrl2);
                    touch(to);
                }
                PathVertex::Close => {}
            }
        }
        if !min.x.is_finite() {
            return BoxI::default();
        }
        BoxI::new(
            min.x.floor() as i32,
            min.y.floor() as i32,
            max.x.ceil() as i32,
            max.y.ceil() as i32,
        )
    }

    /// `command()` for the vertex at `index`, for the rare caller that wants
    /// `(command, point)` pairs exactly as `spec.md` §3 describes.
    #[must_use]
    pub fn command_at(&self, index: usize) -> Option<PathCommand> {
        self.vertices.get(index).map(PathVertex::command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_has_no_vertices() {
        assert!(Path::new().is_empty());
    }

    #[test]
    fn line_before_move_to_errors() {
        let mut p = Path::new();
        assert_eq!(p.line_to(PointD::ZERO).unwrap_err(), PathError::MissingMoveTo);
    }

    #[test]
    fn rect_has_five_vertices() {
        let mut p = Path::new();
        p.add_rect(RectD::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(p.len(), 5); // MoveTo + 3 LineTo + Close
    }

    #[test]
    fn clone_is_cheap_and_detaches_on_write() {
        let mut a = Path::new();
        a.add_rect(RectD::new(0.0, 0.0, 1.0, 1.0));
        let b = a.clone();
        assert_eq!(Arc::strong_count(&a.vertices), 2);
        a.move_to(PointD::new(5.0, 5.0));
        assert_eq!(Arc::strong_count(&a.vertices), 1);
        assert_eq!(b.len(), 5);
        assert_eq!(a.len(), 6);
    }

    #[test]
    fn transform_translates_every_point() {
        let mut p = Path::new();
        p.move_to(PointD::new(1.0, 1.0));
        let _ = p.line_to(PointD::new(2.0, 2.0));
        let t = Transform::translation(10.0, 0.0);
        let tp = p.transformed(&t).unwrap();
        assert_eq!(tp.last_point(), Some(PointD::new(12.0, 2.0)));
    }

    #[test]
    fn ellipse_quarter_arc_uses_kappa() {
        let mut p = Path::new();
        p.add_ellipse(RectD::new(0.0, 0.0, 2.0, 2.0));
        match p.vertices().nth(1).unwrap() {
            PathVertex::CubicTo { ctrl1, .. } => {
                assert!((ctrl1.x - (2.0 + KAPPA)).abs() < 1e-9);
            }
            other => panic!("expected CubicTo, got {other:?}"),
        }
    }
}
