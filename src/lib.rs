//! Fog: a 2D raster paint engine.
//!
//! This crate is a thin facade over the workspace's layered crates:
//! geometry (`fog-geom`), pixel buffers (`fog-image`), path construction
//! and stroking (`fog-path`), scanline rasterization (`fog-raster`),
//! pattern synthesis (`fog-pattern`), pixel compositing (`fog-compose`),
//! and the stateful front-end plus ST/MT worker pool (`fog-engine`).
//!
//! Most applications only need [`Context`], [`EngineConfig`], and whatever
//! pattern/path/image types they construct a frame from; the individual
//! `fog-*` crates remain usable standalone for callers who only need one
//! layer (e.g. just the rasterizer, or just the compositor).

pub use fog_compose::{Characteristics, Operator};
pub use fog_engine::{
    AntialiasingMode, Band, Calc, Command, Context, EngineConfig, EngineError, ErrorCode, FlushMode,
    GeometricPrecision, MtSerializer, PaintHints, PaintState, RenderQuality, Serializer, StSerializer,
    StateStack, StdThreadPool, ThreadPool, WorkerContext,
};
pub use fog_geom::{
    BoxI, GeomError, PointD, PointF, PointI, Region, RegionOp, RectD, RectF, RectI, SizeD, SizeF, SizeI,
    Transform, TransformType,
};
pub use fog_image::{FormatDescriptor, Image, ImageError, PixelFormat};
pub use fog_path::{
    clip_to_rect, flatten, stroke, ClipStack, FlatPath, FlatSubpath, FlattenOptions, InnerJoin, LineCap,
    LineJoin, Path, PathCommand, PathError, PathVertex, StrokeParams,
};
pub use fog_pattern::{
    Color, ColorStop, Gradient, GradientKind, Pattern, PatternError, Solid, Spread, Texture, TextureQuality,
};
pub use fog_raster::{Coverage, FillRule, Precision, RasterError, RasterSpan, Rasterizer, Scanline, FULL_COVERAGE};

/// Installs the engine's ambient `tracing` subscriber, reading the
/// `FOG_LOG` environment variable for a filter directive. Safe to call
/// more than once; later calls are no-ops.
pub fn init_logging() {
    fog_log::init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_fill_all_paints_every_pixel() {
        let mut ctx = Context::new(StSerializer::new(BoxI::new(0, 0, 4, 4), Precision::Precision24x8));
        ctx.set_source(Pattern::Solid(Solid::new(Color::from_straight(255, 0, 0, 255))));
        ctx.fill_all();
        let mut img = Image::new(4, 4, PixelFormat::Prgb32).unwrap();
        ctx.flush(&mut img, FlushMode::Sync).unwrap();
        assert_eq!(img.row(0)[0..4], [255, 0, 0, 255]);
    }

    #[test]
    fn scenario_clear_after_fill_zeroes_target() {
        let mut ctx = Context::new(StSerializer::new(BoxI::new(0, 0, 4, 4), Precision::Precision24x8));
        ctx.set_source(Pattern::Solid(Solid::new(Color::from_straight(255, 255, 255, 255))));
        ctx.fill_all();
        ctx.set_operator(Operator::Clear);
        ctx.fill_all();
        let mut img = Image::new(4, 4, PixelFormat::Prgb32).unwrap();
        ctx.flush(&mut img, FlushMode::Sync).unwrap();
        assert_eq!(img.row(2)[4..8], [0, 0, 0, 0]);
    }

    #[test]
    fn save_restore_round_trips_opacity() {
        let mut stack = StateStack::new();
        stack.save();
        stack.current_mut().global_opacity = 10;
        stack.restore();
        assert_eq!(stack.current().global_opacity, 255);
    }

    #[test]
    fn mt_and_st_agree_on_a_translated_rect() {
        let mut st_ctx = Context::new(StSerializer::new(BoxI::new(0, 0, 10, 10), Precision::Precision24x8));
        let mut mt_ctx = Context::new(MtSerializer::new(BoxI::new(0, 0, 10, 10), Precision::Precision24x8, 4));

        st_ctx.set_source(Pattern::Solid(Solid::new(Color::from_straight(255, 10, 20, 30))));
        st_ctx.translate(2.0, 2.0);
        st_ctx.fill_rect(RectD::new(0.0, 0.0, 4.0, 4.0)).unwrap();

        mt_ctx.set_source(Pattern::Solid(Solid::new(Color::from_straight(255, 10, 20, 30))));
        mt_ctx.translate(2.0, 2.0);
        mt_ctx.fill_rect(RectD::new(0.0, 0.0, 4.0, 4.0)).unwrap();

        let mut st_img = Image::new(10, 10, PixelFormat::Prgb32).unwrap();
        let mut mt_img = Image::new(10, 10, PixelFormat::Prgb32).unwrap();
        st_ctx.flush(&mut st_img, FlushMode::Sync).unwrap();
        mt_ctx.flush(&mut mt_img, FlushMode::Sync).unwrap();

        for y in 0..10 {
            assert_eq!(st_img.row(y), mt_img.row(y), "row {y} differs between ST and MT");
        }
    }
}
