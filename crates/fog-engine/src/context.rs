//! [`Context`]: the stateful front-end facade `spec.md` §4.6 describes —
//! "the stateful facade (save/restore stack, transform stack, clip stack,
//! source, operator, stroke params, font) that translates user calls into
//! work items." Every mutator touches only the top of the [`StateStack`];
//! every draw call resolves a [`crate::command::Calc`] and posts the
//! resulting [`Command`] to the active [`Serializer`].

use std::sync::Arc;

use fog_geom::{BoxI, PointD, Region, RegionOp, RectD, Transform};
use fog_image::Image;
use fog_path::{FlatPath, Path, StrokeParams};
use fog_pattern::Pattern;
use fog_raster::FillRule;

use crate::command::{Calc, Command};
use crate::error::EngineError;
use crate::serializer::{Serializer, StSerializer};
use crate::state::{PaintHints, StateStack};

/// `flush`'s synchronization mode (`spec.md` §3/§4.6 `flush(SYNC|NOWAIT)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushMode {
    /// Block until every posted command has executed.
    Sync,
    /// Post a barrier without blocking. Both serializers in this crate
    /// execute commands synchronously within `flush` itself, so `NoWait`
    /// behaves identically to `Sync` here — see `DESIGN.md`.
    NoWait,
}

fn bbox_of(flat: &FlatPath) -> BoxI {
    let mut min = PointD::new(f64::INFINITY, f64::INFINITY);
    let mut max = PointD::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for sp in &flat.subpaths {
        for p in &sp.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
    }
    if min.x > max.x || min.y > max.y {
        return BoxI::new(0, 0, 0, 0);
    }
    BoxI::new(min.x.floor() as i32, min.y.floor() as i32, max.x.ceil() as i32, max.y.ceil() as i32)
}

/// One level of [`Context::begin_group`] nesting: commands posted while it
/// is open are captured by its own offscreen serializer instead of
/// reaching the real target, until [`Context::end_group`] resolves it into
/// a single [`Command::Group`].
struct GroupFrame {
    bounds: BoxI,
    serializer: StSerializer,
    opacity: u8,
}

/// The paint engine's user-facing handle: one state stack plus one
/// executor. `S` is either [`crate::serializer::StSerializer`] or
/// [`crate::serializer::MtSerializer`]; callers pick at construction and
/// the rest of the API is identical either way (`spec.md` §8's headline
/// property).
pub struct Context<S: Serializer> {
    state: StateStack,
    serializer: S,
    groups: Vec<GroupFrame>,
}

impl<S: Serializer> Context<S> {
    #[must_use]
    pub fn new(serializer: S) -> Self {
        Self { state: StateStack::new(), serializer, groups: Vec::new() }
    }

    pub fn save(&mut self) {
        self.state.save();
    }

    pub fn restore(&mut self) {
        self.state.restore();
    }

    pub fn set_source(&mut self, source: Pattern) {
        self.state.current_mut().source = Arc::new(source);
    }

    pub fn set_operator(&mut self, operator: fog_compose::Operator) {
        self.state.current_mut().operator = operator;
    }

    pub fn set_opacity(&mut self, opacity: u8) {
        self.state.current_mut().global_opacity = opacity;
    }

    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.state.current_mut().fill_rule = fill_rule;
    }

    pub fn set_stroke_params(&mut self, params: StrokeParams) {
        self.state.current_mut().stroke_params = params;
    }

    pub fn set_hints(&mut self, hints: PaintHints) {
        self.state.current_mut().hints = hints;
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.state.current_mut().user_transform = transform;
    }

    /// Prepends `t` to the current user transform: subsequent user-space
    /// coordinates are mapped through `t` before the transform already in
    /// effect, matching `translate`/`rotate`/`scale`/`skew`'s usual
    /// "affects what comes after, composed under what came before"
    /// semantics.
    fn prepend(&mut self, t: Transform) {
        let current = self.state.current().user_transform;
        self.state.current_mut().user_transform = t.then(&current);
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.prepend(Transform::translation(tx, ty));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.prepend(Transform::scale(sx, sy));
    }

    pub fn rotate(&mut self, angle: f64) {
        self.prepend(Transform::rotation(angle));
    }

    pub fn skew(&mut self, skew_x: f64, skew_y: f64) {
        self.prepend(Transform::skew(skew_x, skew_y));
    }

    pub fn set_clip(&mut self, region: Region) {
        self.state.current_mut().user_clip = Some(region);
    }

    pub fn intersect_clip(&mut self, region: Region) {
        let next = match &self.state.current().user_clip {
            Some(existing) => existing.combined(&region, RegionOp::Intersect),
            None => region,
        };
        self.state.current_mut().user_clip = Some(next);
    }

    /// Sets the device-level origin, independent of `save`/`restore`
    /// (`spec.md` §3's meta origin; see `DESIGN.md`'s meta vs. user split).
    pub fn set_meta_origin(&mut self, origin: PointD) {
        self.state.set_meta_origin(origin);
    }

    /// Sets the device-level clip, independent of `save`/`restore`. Pass
    /// `None` to clear it back to unclipped.
    pub fn set_meta_clip(&mut self, region: Option<Region>) {
        self.state.set_meta_clip(region);
    }

    /// The effective clip: the device-level meta clip intersected with the
    /// current user-level clip, whichever of the two are set, remapped
    /// into the innermost open group's local coordinates if one is active.
    fn clip_arc(&self) -> Option<Arc<Region>> {
        let state = self.state.current();
        let effective = match (&state.meta_clip, &state.user_clip) {
            (Some(meta), Some(user)) => Some(meta.combined(user, RegionOp::Intersect)),
            (Some(meta), None) => Some(meta.clone()),
            (None, Some(user)) => Some(user.clone()),
            (None, None) => None,
        };
        effective.map(|r| Arc::new(self.to_group_local_region(&r)))
    }

    /// The effective origin: the device-level meta origin composed with the
    /// user-level origin, applied as a translation underneath the user
    /// transform when resolving geometry, then shifted into the innermost
    /// open group's local coordinates if one is active (a group's offscreen
    /// buffer is sized to its bounds and addressed from `(0, 0)`).
    fn effective_origin_transform(&self) -> Transform {
        let state = self.state.current();
        let origin = state.meta_origin + state.user_origin;
        let device = Transform::translation(origin.x, origin.y).then(&state.user_transform);
        match self.groups.last() {
            Some(frame) => device.then(&Transform::translation(-f64::from(frame.bounds.x0), -f64::from(frame.bounds.y0))),
            None => device,
        }
    }

    /// `b`, shifted into the innermost open group's local coordinates (a
    /// no-op when no group is open).
    fn to_group_local_box(&self, b: BoxI) -> BoxI {
        match self.groups.last() {
            Some(frame) => BoxI::new(b.x0 - frame.bounds.x0, b.y0 - frame.bounds.y0, b.x1 - frame.bounds.x0, b.y1 - frame.bounds.y0),
            None => b,
        }
    }

    /// `region`, shifted into the innermost open group's local coordinates
    /// (a no-op when no group is open).
    fn to_group_local_region(&self, region: &Region) -> Region {
        match self.groups.last() {
            Some(frame) => Region::from_boxes(region.boxes().map(|b| self.to_group_local_box(b))),
            None => region.clone(),
        }
    }

    /// Resolves `calc` and posts the resulting geometry as a `Fill`
    /// command using the current paint state.
    ///
    /// # Errors
    ///
    /// Propagates a [`EngineError`] if the transform is non-invertible or
    /// the path's coordinates cannot be resolved.
    fn post_fill(&mut self, calc: Calc, fill_rule: FillRule) -> Result<(), EngineError> {
        let flat = Arc::new(calc.run()?);
        let bbox = bbox_of(&flat);
        let clip = self.clip_arc();
        let state = self.state.current();
        let command = Command::Fill {
            flat,
            fill_rule,
            clip,
            source: Arc::clone(&state.source),
            operator: state.operator,
            opacity: state.global_opacity,
            bbox,
        };
        self.post_command(command);
        Ok(())
    }

    /// Routes `command` to whichever executor is currently active: the
    /// real serializer, or — while a [`Self::begin_group`] is open — the
    /// innermost group's own offscreen serializer.
    fn post_command(&mut self, command: Command) {
        match self.groups.last_mut() {
            Some(frame) => frame.serializer.post(command),
            None => self.serializer.post(command),
        }
    }

    /// Opens a grouped-composite scope: every draw call until the matching
    /// [`Self::end_group`] renders into an offscreen buffer the size of
    /// `bounds` instead of the real target. `end_group` then composites
    /// that buffer back as one [`Command::Group`] under the opacity active
    /// at that time (`SPEC_FULL.md` §12's group/layer-buffer mechanism).
    pub fn begin_group(&mut self, bounds: BoxI) {
        self.groups.push(GroupFrame {
            bounds,
            serializer: StSerializer::new(bounds, fog_raster::Precision::Precision24x8),
            opacity: self.state.current().global_opacity,
        });
    }

    /// Resolves the innermost open group: renders its buffered commands
    /// into a fresh offscreen image and posts the result as a single
    /// [`Command::Group`] to whatever scope is next (the real serializer,
    /// or an outer group).
    ///
    /// # Errors
    ///
    /// Propagates any [`EngineError`] raised while rendering the group's
    /// buffered commands.
    ///
    /// # Panics
    ///
    /// Panics if called with no matching [`Self::begin_group`].
    pub fn end_group(&mut self) -> Result<(), EngineError> {
        let mut frame = self.groups.pop().expect("end_group called without a matching begin_group");
        let width = frame.bounds.width().max(0);
        let height = frame.bounds.height().max(0);
        let mut buffer = Image::new(width, height, fog_image::PixelFormat::Prgb32)?;
        frame.serializer.flush(&mut buffer)?;
        self.post_command(Command::Group { bounds: frame.bounds, buffer: Arc::new(buffer), opacity: frame.opacity });
        Ok(())
    }

    /// Fills `path`'s interior under the active fill rule.
    ///
    /// # Errors
    ///
    /// See [`Self::post_fill`].
    pub fn fill_path(&mut self, path: Path) -> Result<(), EngineError> {
        let transform = self.effective_origin_transform();
        let fill_rule = self.state.current().fill_rule;
        self.post_fill(Calc::new(path, transform), fill_rule)
    }

    /// Fills the interior of a rectangle.
    ///
    /// # Errors
    ///
    /// See [`Self::post_fill`].
    pub fn fill_rect(&mut self, rect: RectD) -> Result<(), EngineError> {
        let mut path = Path::new();
        path.add_rect(rect);
        self.fill_path(path)
    }

    /// Fills a region directly, bypassing the rasterizer (the opaque
    /// fast path `spec.md` §3's `Region` glossary entry names).
    pub fn fill_region(&mut self, region: Region) {
        let region = self.to_group_local_region(&region);
        let state = self.state.current();
        let command = Command::FillRegion {
            region: Arc::new(region),
            source: Arc::clone(&state.source),
            operator: state.operator,
            opacity: state.global_opacity,
        };
        self.post_command(command);
    }

    /// Fills the entire target under the active clip.
    pub fn fill_all(&mut self) {
        let clip = self.clip_arc();
        let state = self.state.current();
        let command = Command::FillAll {
            clip,
            source: Arc::clone(&state.source),
            operator: state.operator,
            opacity: state.global_opacity,
        };
        self.post_command(command);
    }

    /// Strokes `path`'s outline using the active stroke parameters.
    ///
    /// # Errors
    ///
    /// See [`Self::post_fill`].
    pub fn draw_path(&mut self, path: Path) -> Result<(), EngineError> {
        let transform = self.effective_origin_transform();
        let stroke_params = self.state.current().stroke_params.clone();
        self.post_fill(Calc::new(path, transform).with_stroke(stroke_params), FillRule::NonZero)
    }

    /// Strokes a rectangle's outline.
    ///
    /// # Errors
    ///
    /// See [`Self::post_fill`].
    pub fn draw_rect(&mut self, rect: RectD) -> Result<(), EngineError> {
        let mut path = Path::new();
        path.add_rect(rect);
        self.draw_path(path)
    }

    /// Strokes a single line segment.
    ///
    /// # Errors
    ///
    /// See [`Self::post_fill`].
    pub fn draw_line(&mut self, from: PointD, to: PointD) -> Result<(), EngineError> {
        let mut path = Path::new();
        path.move_to(from);
        path.line_to(to)?;
        self.draw_path(path)
    }

    /// Blits `image` into `dst`, composited like any other draw call.
    pub fn draw_image(&mut self, image: Arc<Image>, dst: BoxI) {
        let dst = self.to_group_local_box(dst);
        let clip = self.clip_arc();
        let state = self.state.current();
        let command = Command::DrawImage {
            image,
            dst,
            clip,
            operator: state.operator,
            opacity: state.global_opacity,
        };
        self.post_command(command);
    }

    /// Drains the posted command queue against `target`.
    ///
    /// `spec.md` §4.6: "`flush(SYNC)` acts as a barrier: it signals all
    /// workers, waits until the command zone is drained, then resets the
    /// zone allocator".
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any command this frame; per
    /// `spec.md` §7's propagation policy, the error slot is conceptually
    /// cleared once this returns (the caller holds the one and only
    /// report of it).
    pub fn flush(&mut self, target: &mut Image, _mode: FlushMode) -> Result<(), EngineError> {
        self.serializer.flush(target)
    }

    /// Number of commands queued since the last flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.serializer.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_image::PixelFormat;
    use fog_pattern::{Color, Solid};

    use crate::serializer::StSerializer;

    fn st_context() -> Context<StSerializer> {
        Context::new(StSerializer::new(BoxI::new(0, 0, 16, 16), fog_raster::Precision::Precision24x8))
    }

    #[test]
    fn fill_all_then_flush_paints_every_pixel() {
        let mut ctx = st_context();
        ctx.set_source(Pattern::Solid(Solid::new(Color::from_straight(255, 0, 0, 255))));
        ctx.fill_all();
        let mut img = Image::new(16, 16, PixelFormat::Prgb32).unwrap();
        ctx.flush(&mut img, FlushMode::Sync).unwrap();
        assert_eq!(img.row(0)[0..4], [255, 0, 0, 255]);
        assert_eq!(img.row(15)[60..64], [255, 0, 0, 255]);
    }

    #[test]
    fn save_restore_undoes_a_translate() {
        let mut ctx = st_context();
        ctx.save();
        ctx.translate(5.0, 5.0);
        assert_ne!(ctx.state.current().user_transform.kind(), fog_geom::TransformType::Identity);
        ctx.restore();
        assert_eq!(ctx.state.current().user_transform.kind(), fog_geom::TransformType::Identity);
    }

    #[test]
    fn group_composites_its_buffered_contents_back_into_the_target() {
        let mut ctx = st_context();
        ctx.set_source(Pattern::Solid(Solid::new(Color::from_straight(255, 50, 60, 70))));
        ctx.begin_group(BoxI::new(4, 4, 8, 8));
        ctx.fill_all();
        ctx.end_group().unwrap();
        let mut img = Image::new(16, 16, PixelFormat::Prgb32).unwrap();
        ctx.flush(&mut img, FlushMode::Sync).unwrap();
        assert_eq!(img.row(5)[16..20], [70, 60, 50, 255]);
        assert_eq!(img.row(0)[0..4], [0, 0, 0, 0]);
    }

    #[test]
    fn meta_clip_restricts_fill_all_alongside_user_clip() {
        let mut ctx = st_context();
        ctx.set_meta_clip(Some(Region::from_box(BoxI::new(0, 0, 8, 16))));
        ctx.set_source(Pattern::Solid(Solid::new(Color::from_straight(255, 1, 2, 3))));
        ctx.fill_all();
        let mut img = Image::new(16, 16, PixelFormat::Prgb32).unwrap();
        ctx.flush(&mut img, FlushMode::Sync).unwrap();
        assert_eq!(img.row(0)[0..4], [3, 2, 1, 255]);
        assert_eq!(img.row(0)[32..36], [0, 0, 0, 0]);
    }

    #[test]
    fn clear_after_fill_all_zeroes_the_target() {
        let mut ctx = st_context();
        ctx.set_source(Pattern::Solid(Solid::new(Color::from_straight(255, 255, 255, 255))));
        ctx.fill_all();
        ctx.set_operator(fog_compose::Operator::Clear);
        ctx.fill_all();
        let mut img = Image::new(16, 16, PixelFormat::Prgb32).unwrap();
        ctx.flush(&mut img, FlushMode::Sync).unwrap();
        assert_eq!(img.row(0)[0..4], [0, 0, 0, 0]);
    }
}
