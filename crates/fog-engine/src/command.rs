//! [`Command`] and [`Calc`]: the zone-allocated work records `spec.md` §3
//! describes. *Calc* is a deferred precomputation (path transform, flatten,
//! stroke) whose result populates a *Command*; *Command* is the
//! self-sufficient rendering unit any worker can execute once its `Calc`
//! has resolved.

use std::sync::Arc;

use fog_geom::{BoxI, Transform};
use fog_geom::Region;
use fog_image::Image;
use fog_path::{flatten, stroke, FlatPath, FlattenOptions, Path, StrokeParams};
use fog_pattern::Pattern;
use fog_raster::FillRule;

use crate::error::EngineError;

/// A deferred precomputation: transforms, flattens, and (optionally)
/// strokes a path into device-space line segments. Posted alongside the
/// [`Command`] it feeds so a worker (or, today, the front-end thread
/// eagerly — see `DESIGN.md`) can resolve it before the command runs.
#[derive(Debug, Clone)]
pub struct Calc {
    pub path: Path,
    pub transform: Transform,
    pub flatten_opts: FlattenOptions,
    /// `Some` turns this into a stroke-to-fill precomputation instead of a
    /// plain fill flatten.
    pub stroke_params: Option<StrokeParams>,
}

impl Calc {
    #[must_use]
    pub fn new(path: Path, transform: Transform) -> Self {
        Self { path, transform, flatten_opts: FlattenOptions::default(), stroke_params: None }
    }

    #[must_use]
    pub fn with_stroke(mut self, params: StrokeParams) -> Self {
        self.stroke_params = Some(params);
        self
    }

    /// Resolves this precomputation into device-space flattened geometry.
    pub fn run(&self) -> Result<FlatPath, EngineError> {
        let transformed = self.path.transformed(&self.transform)?;
        let flat = flatten(&transformed, &self.flatten_opts);
        Ok(match &self.stroke_params {
            Some(params) => stroke(&flat, params),
            None => flat,
        })
    }
}

/// A self-sufficient rendering unit. Every variant carries its own clip,
/// source, operator, and opacity snapshot so workers never need to consult
/// engine state outside the command itself.
#[derive(Debug, Clone)]
pub enum Command {
    /// Fills already-flattened device-space geometry (the resolved output
    /// of a [`Calc`]) using `fill_rule`.
    Fill {
        flat: Arc<FlatPath>,
        fill_rule: FillRule,
        clip: Option<Arc<Region>>,
        source: Arc<Pattern>,
        operator: fog_compose::Operator,
        opacity: u8,
        bbox: BoxI,
    },
    /// Fills a region directly (the output of `fillRegion`, or the
    /// opaque-rectangle fast path named in `spec.md` §3's `Region` entry).
    FillRegion {
        region: Arc<Region>,
        source: Arc<Pattern>,
        operator: fog_compose::Operator,
        opacity: u8,
    },
    /// Fills the entire target surface, clipped only by the active clip.
    FillAll {
        clip: Option<Arc<Region>>,
        source: Arc<Pattern>,
        operator: fog_compose::Operator,
        opacity: u8,
    },
    /// Blits `image` at `dst`, clipped and composited like any other draw.
    DrawImage {
        image: Arc<Image>,
        dst: BoxI,
        clip: Option<Arc<Region>>,
        operator: fog_compose::Operator,
        opacity: u8,
    },
    /// Composites an intermediate group buffer back into the target
    /// through `opacity`, for soft-masked/grouped compositing
    /// (`spec.md`'s "clip is maintained as a region plus an optional mask
    /// image", generalized — see `SPEC_FULL.md` §12).
    Group {
        bounds: BoxI,
        buffer: Arc<Image>,
        opacity: u8,
    },
    /// A synchronization point: `spec.md` §4.7 step 6, `flush(SYNC)`
    /// publishes this and waits on the per-worker done counter.
    Barrier,
}

impl Command {
    /// Rough byte footprint for zone soft-cap accounting. Not exact; the
    /// zone only needs this to decide when to apply back-pressure.
    #[must_use]
    pub fn size_estimate(&self) -> usize {
        match self {
            Self::Fill { flat, .. } => {
                64 + flat.subpaths.iter().map(|s| s.points.len() * 16).sum::<usize>()
            }
            Self::FillRegion { region, .. } => 32 + region.boxes().count() * 16,
            Self::FillAll { .. } | Self::Group { .. } | Self::Barrier => 32,
            Self::DrawImage { .. } => 48,
        }
    }

    /// The command's device-space bounding box, used by workers to skip
    /// commands whose box does not intersect their band (`spec.md` §4.7
    /// step 5: "Bounded commands may have an associated precomputed
    /// bounding box").
    #[must_use]
    pub fn bbox(&self) -> Option<BoxI> {
        match self {
            Self::Fill { bbox, .. } => Some(*bbox),
            Self::FillRegion { region, .. } => Some(region.bounding_box()),
            Self::DrawImage { dst, .. } => Some(*dst),
            Self::Group { bounds, .. } => Some(*bounds),
            Self::FillAll { .. } | Self::Barrier => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_geom::PointD;

    #[test]
    fn calc_run_flattens_a_simple_triangle() {
        let mut path = Path::new();
        path.move_to(PointD::new(0.0, 0.0));
        path.line_to(PointD::new(10.0, 0.0)).unwrap();
        path.line_to(PointD::new(0.0, 10.0)).unwrap();
        path.close().unwrap();
        let calc = Calc::new(path, Transform::identity());
        let flat = calc.run().unwrap();
        assert_eq!(flat.subpaths.len(), 1);
        assert!(flat.subpaths[0].closed);
    }

    #[test]
    fn calc_with_stroke_produces_wider_geometry_than_plain_fill() {
        let mut path = Path::new();
        path.move_to(PointD::new(0.0, 0.0));
        path.line_to(PointD::new(10.0, 0.0)).unwrap();
        let fill_calc = Calc::new(path.clone(), Transform::identity());
        let stroke_calc = Calc::new(path, Transform::identity()).with_stroke(StrokeParams::default());
        let fill_flat = fill_calc.run().unwrap();
        let stroke_flat = stroke_calc.run().unwrap();
        assert!(stroke_flat.subpaths.len() >= fill_flat.subpaths.len());
    }

    #[test]
    fn barrier_has_no_bounding_box() {
        assert!(Command::Barrier.bbox().is_none());
    }
}
