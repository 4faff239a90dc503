//! Clipping: restricting a flattened path to a clip region.
//!
//! `spec.md` §4.2: convex clip boxes are applied geometrically
//! (Sutherland–Hodgman polygon clipping, cheap and exact for axis-aligned
//! rectangles); general (non-rectangular) clip regions are instead applied
//! at the span level by the rasterizer, tagging each emitted scanline span
//! with the region it falls in rather than re-tessellating the path.

use fog_geom::{PointD, RectD, Region};

use crate::flatten::{FlatPath, FlatSubpath};

/// Clips every subpath of `flat` against the axis-aligned rectangle `clip`
/// using Sutherland–Hodgman polygon clipping.
///
/// Open subpaths are treated as implicitly closed for the purpose of
/// clipping (matches `spec.md` §4.2: fill-time clipping operates on closed
/// contours; stroke outlines are always closed by the time they reach this
/// stage).
#[must_use]
#[tracing::instrument(level = "trace", skip_all)]
pub fn clip_to_rect(flat: &FlatPath, clip: RectD) -> FlatPath {
    let mut out = FlatPath::default();
    for sp in &flat.subpaths {
        if sp.points.len() < 3 {
            continue;
        }
        let clipped = clip_polygon_to_rect(&sp.points, clip);
        if clipped.len() >= 3 {
            out.subpaths.push(FlatSubpath {
                points: clipped,
                closed: true,
            });
        }
    }
    out
}

fn clip_polygon_to_rect(points: &[PointD], clip: RectD) -> Vec<PointD> {
    let left = clip.x;
    let right = clip.right();
    let top = clip.y;
    let bottom = clip.bottom();

    let mut poly = points.to_vec();
    poly = clip_edge(&poly, |p| p.x >= left, |a, b| intersect_x(a, b, left));
    poly = clip_edge(&poly, |p| p.x <= right, |a, b| intersect_x(a, b, right));
    poly = clip_edge(&poly, |p| p.y >= top, |a, b| intersect_y(a, b, top));
    poly = clip_edge(&poly, |p| p.y <= bottom, |a, b| intersect_y(a, b, bottom));
    poly
}

fn clip_edge(
    poly: &[PointD],
    inside: impl Fn(PointD) -> bool,
    intersect: impl Fn(PointD, PointD) -> PointD,
) -> Vec<PointD> {
    if poly.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(poly.len() + 2);
    for i in 0..poly.len() {
        let cur = poly[i];
        let prev = poly[(i + poly.len() - 1) % poly.len()];
        let cur_in = inside(cur);
        let prev_in = inside(prev);
        if cur_in {
            if !prev_in {
                out.push(intersect(prev, cur));
            }
            out.push(cur);
        } else if prev_in {
            out.push(intersect(prev, cur));
        }
    }
    out
}

fn intersect_x(a: PointD, b: PointD, x: f64) -> PointD {
    let t = (x - a.x) / (b.x - a.x);
    PointD::new(x, a.y + (b.y - a.y) * t)
}

fn intersect_y(a: PointD, b: PointD, y: f64) -> PointD {
    let t = (y - a.y) / (b.y - a.y);
    PointD::new(a.x + (b.x - a.x) * t, y)
}

/// A non-rectangular clip, applied at the span level instead of by
/// tessellating the path.
///
/// The rasterizer intersects each scanline span it produces against
/// [`Region::row_spans`] rather than routing through this type directly;
/// `ClipStack` exists to compose user clip regions with the engine's
/// always-present meta clip (`spec.md` §12).
#[derive(Debug, Clone, Default)]
pub struct ClipStack {
    /// Engine-level clip, set once per surface and not affected by
    /// `save`/`restore` (`spec.md` §12's meta clip).
    meta: Option<Region>,
    /// User-level clip, pushed/popped with the paint state stack.
    user: Option<Region>,
}

impl ClipStack {
    /// No active clip: everything is visible.
    #[must_use]
    pub fn unclipped() -> Self {
        Self::default()
    }

    /// Sets the engine-level meta clip.
    pub fn set_meta_clip(&mut self, region: Region) {
        self.meta = Some(region);
    }

    /// Intersects the user clip with `region` (narrowing it further).
    pub fn intersect_user_clip(&mut self, region: &Region) {
        self.user = Some(match &self.user {
            Some(existing) => existing.combined(region, fog_geom::RegionOp::Intersect),
            None => region.clone(),
        });
    }

    /// Clears the user clip back to "everything visible" (does not affect
    /// the meta clip).
    pub fn clear_user_clip(&mut self) {
        self.user = None;
    }

    /// The row spans visible at scanline `y`, intersecting meta and user
    /// clips. `None` for either clip means "unbounded" for that layer.
    #[must_use]
    pub fn visible_spans(&self, y: i32, full_row: (i32, i32)) -> Vec<(i32, i32)> {
        let mut spans = vec![full_row];
        if let Some(meta) = &self.meta {
            spans = intersect_spans(&spans, &meta.row_spans(y).collect::<Vec<_>>());
        }
        if let Some(user) = &self.user {
            spans = intersect_spans(&spans, &user.row_spans(y).collect::<Vec<_>>());
        }
        spans
    }
}

fn intersect_spans(a: &[(i32, i32)], b: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for &(a0, a1) in a {
        for &(b0, b1) in b {
            let lo = a0.max(b0);
            let hi = a1.min(b1);
            if lo < hi {
                out.push((lo, hi));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{flatten, FlattenOptions};
    use crate::Path;
    use fog_geom::BoxI;

    #[test]
    fn clip_rect_fully_inside_is_unchanged() {
        let mut p = Path::new();
        p.add_rect(RectD::new(1.0, 1.0, 2.0, 2.0));
        let flat = flatten(&p, &FlattenOptions::default());
        let clipped = clip_to_rect(&flat, RectD::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(clipped.subpaths.len(), 1);
    }

    #[test]
    fn clip_rect_fully_outside_yields_nothing() {
        let mut p = Path::new();
        p.add_rect(RectD::new(100.0, 100.0, 2.0, 2.0));
        let flat = flatten(&p, &FlattenOptions::default());
        let clipped = clip_to_rect(&flat, RectD::new(0.0, 0.0, 10.0, 10.0));
        assert!(clipped.subpaths.is_empty());
    }

    #[test]
    fn clip_rect_partial_overlap_produces_cropped_polygon() {
        let mut p = Path::new();
        p.add_rect(RectD::new(5.0, 5.0, 10.0, 10.0));
        let flat = flatten(&p, &FlattenOptions::default());
        let clipped = clip_to_rect(&flat, RectD::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(clipped.subpaths.len(), 1);
        for pt in &clipped.subpaths[0].points {
            assert!(pt.x <= 10.0 + 1e-9 && pt.y <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn clip_stack_intersects_meta_and_user_regions() {
        let mut stack = ClipStack::unclipped();
        stack.set_meta_clip(Region::from_box(BoxI::new(0, 0, 100, 100)));
        stack.intersect_user_clip(&Region::from_box(BoxI::new(10, 0, 50, 100)));
        let spans = stack.visible_spans(5, (0, 1000));
        assert_eq!(spans, vec![(10, 50)]);
    }
}
