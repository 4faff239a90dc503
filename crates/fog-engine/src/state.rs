//! [`PaintState`]: one element of the save/restore stack (`spec.md` §3).
//!
//! Fields: user transform, final (device-space) transform, clip region,
//! meta origin, operator, source pattern, global opacity, stroke params,
//! fill rule, font, hint flags. `save` deep-copies what is dirty and
//! chains the previous state; `restore` pops and releases — here modeled
//! as an explicit `Vec<PaintState>` stack rather than a linked chain,
//! since every field is already cheap to clone (`Arc`/`Region`/`Transform`
//! are all COW or `Copy`).

use std::sync::Arc;

use fog_geom::{PointD, Region, Transform};
use fog_path::StrokeParams;
use fog_pattern::Pattern;
use fog_raster::FillRule;

/// Antialiasing toggle, named in `spec.md` §3's unenumerated "hint flags".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AntialiasingMode {
    #[default]
    Enabled,
    Disabled,
}

/// Render quality hint, named in `spec.md` §3's unenumerated "hint flags".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderQuality {
    Fast,
    #[default]
    Good,
    Best,
}

/// Geometric precision hint, named in `spec.md` §3's unenumerated "hint
/// flags".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometricPrecision {
    #[default]
    Default,
    High,
}

/// The antialiasing/quality/precision hint bundle carried on [`PaintState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintHints {
    pub antialiasing: AntialiasingMode,
    pub render_quality: RenderQuality,
    pub geometric_precision: GeometricPrecision,
}

/// One element of the save/restore stack.
#[derive(Debug, Clone)]
pub struct PaintState {
    /// The transform set by the user via `setTransform`/`translate`/etc.
    pub user_transform: Transform,
    /// `user_transform` composed with the engine's device mapping; what
    /// the rasterizer actually consumes.
    pub device_transform: Transform,
    /// The current user-level clip region (intersected with the engine's
    /// meta clip at fetch time, not stored pre-intersected).
    pub user_clip: Option<Region>,
    /// Optional soft clip mask image; `None` means the clip is a hard
    /// region with no per-pixel alpha.
    pub soft_clip_mask: Option<Arc<fog_image::Image>>,
    /// User-level origin offset, composed under the engine's meta origin.
    pub user_origin: PointD,
    /// Device-level clip region set once by the embedder, independent of
    /// `save`/`restore` (`spec.md` §3's "meta origin" field; see
    /// `DESIGN.md`'s meta vs. user split). Effective clip is
    /// `meta_clip ∩ user_clip`.
    pub meta_clip: Option<Region>,
    /// Device-level origin offset set once by the embedder, independent of
    /// `save`/`restore`. Effective origin is `meta_origin + user_origin`.
    pub meta_origin: PointD,
    /// Active composite operator.
    pub operator: fog_compose::Operator,
    /// Active paint source.
    pub source: Arc<Pattern>,
    /// Global opacity in `[0, 255]`, folded into per-span coverage at
    /// dispatch (`spec.md` §4.5).
    pub global_opacity: u8,
    /// Active stroke parameters (width, caps, join, miter limit, dash).
    pub stroke_params: StrokeParams,
    /// Active polygon fill rule.
    pub fill_rule: FillRule,
    /// Quality/antialiasing hints.
    pub hints: PaintHints,
}

impl PaintState {
    /// The state a freshly constructed engine context starts in: identity
    /// transform, unclipped, opaque solid black source, `SrcOver`.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            user_transform: Transform::identity(),
            device_transform: Transform::identity(),
            user_clip: None,
            soft_clip_mask: None,
            user_origin: PointD::new(0.0, 0.0),
            meta_clip: None,
            meta_origin: PointD::new(0.0, 0.0),
            operator: fog_compose::Operator::SrcOver,
            source: Arc::new(Pattern::Solid(fog_pattern::Solid::new(fog_pattern::Color::from_straight(255, 0, 0, 0)))),
            global_opacity: 255,
            stroke_params: StrokeParams::default(),
            fill_rule: FillRule::NonZero,
            hints: PaintHints::default(),
        }
    }
}

/// The save/restore stack: `restore()` with an empty stack is a no-op,
/// matching a painting API where an unbalanced `restore` is tolerated
/// rather than panicking.
#[derive(Debug, Clone)]
pub struct StateStack {
    current: PaintState,
    saved: Vec<PaintState>,
}

impl StateStack {
    #[must_use]
    pub fn new() -> Self {
        Self { current: PaintState::initial(), saved: Vec::new() }
    }

    #[must_use]
    pub fn current(&self) -> &PaintState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut PaintState {
        &mut self.current
    }

    /// Pushes a copy of the current state; cloning is cheap since every
    /// field is `Copy`, `Arc`, or a COW `Region`.
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pops the most recently saved state, discarding the current one.
    /// A no-op if the stack is empty.
    pub fn restore(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }

    /// Depth of the save stack (excluding the current, unsaved state).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Sets the device-level origin on every state in the stack, current
    /// and saved alike, so it survives `restore` the way an embedder-level
    /// setting should (`spec.md` §3's meta origin is not stack-scoped).
    pub fn set_meta_origin(&mut self, origin: PointD) {
        self.current.meta_origin = origin;
        for saved in &mut self.saved {
            saved.meta_origin = origin;
        }
    }

    /// Sets the device-level clip on every state in the stack; see
    /// [`Self::set_meta_origin`].
    pub fn set_meta_clip(&mut self, region: Option<Region>) {
        self.current.meta_clip = region.clone();
        for saved in &mut self.saved {
            saved.meta_clip = region.clone();
        }
    }
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_restore_undoes_a_mutation() {
        let mut stack = StateStack::new();
        let original_opacity = stack.current().global_opacity;
        stack.save();
        stack.current_mut().global_opacity = 10;
        assert_eq!(stack.current().global_opacity, 10);
        stack.restore();
        assert_eq!(stack.current().global_opacity, original_opacity);
    }

    #[test]
    fn meta_origin_survives_save_and_restore() {
        let mut stack = StateStack::new();
        stack.save();
        stack.set_meta_origin(PointD::new(3.0, 4.0));
        assert_eq!(stack.current().meta_origin, PointD::new(3.0, 4.0));
        stack.restore();
        assert_eq!(stack.current().meta_origin, PointD::new(3.0, 4.0));
    }

    #[test]
    fn restore_on_empty_stack_is_a_no_op() {
        let mut stack = StateStack::new();
        stack.current_mut().global_opacity = 42;
        stack.restore();
        assert_eq!(stack.current().global_opacity, 42);
    }

    #[test]
    fn nested_save_restore_unwinds_in_lifo_order() {
        let mut stack = StateStack::new();
        stack.current_mut().global_opacity = 1;
        stack.save();
        stack.current_mut().global_opacity = 2;
        stack.save();
        stack.current_mut().global_opacity = 3;
        assert_eq!(stack.depth(), 2);
        stack.restore();
        assert_eq!(stack.current().global_opacity, 2);
        stack.restore();
        assert_eq!(stack.current().global_opacity, 1);
        assert_eq!(stack.depth(), 0);
    }
}
