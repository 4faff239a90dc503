//! The work serializer: `spec.md` §4.7's single-threaded and
//! multi-threaded executors. Both implement [`Serializer`] so the
//! front-end (`crate::context::Context`) can be generic over which one is
//! active.

mod mt;
mod st;

pub use mt::MtSerializer;
pub use st::StSerializer;

use fog_image::Image;

use crate::command::Command;
use crate::error::EngineError;

/// The executor a [`crate::context::Context`] posts commands to.
///
/// `post` enqueues a unit of work; `flush` is the barrier from `spec.md`
/// §4.6: "`flush(SYNC)` acts as a barrier: it signals all workers, waits
/// until the command zone is drained, then resets the zone allocator".
pub trait Serializer {
    /// Enqueues `command` for execution against `target`.
    fn post(&mut self, command: Command);

    /// Drains all posted commands against `target`, then resets the zone.
    ///
    /// # Errors
    ///
    /// Returns the first [`EngineError`] raised by any command; subsequent
    /// commands in the same flush still run (`spec.md` §4.7 "Failure":
    /// "Subsequent commands continue. No worker is permitted to abort the
    /// process.").
    fn flush(&mut self, target: &mut Image) -> Result<(), EngineError>;

    /// Number of commands currently queued, unflushed.
    fn pending(&self) -> usize;
}

#[cfg(test)]
mod shared_tests {
    //! Properties every [`super::Serializer`] impl must satisfy —
    //! `spec.md` §8's headline property that ST and MT execution produce
    //! pixel-identical output for the same command stream.
    use std::sync::Arc;

    use fog_geom::{BoxI, PointD};
    use fog_image::{Image, PixelFormat};
    use fog_path::{flatten, FlattenOptions, Path};
    use fog_pattern::{Color, Pattern, Solid};

    use super::super::mt::MtSerializer;
    use super::super::st::StSerializer;
    use super::Serializer;
    use crate::command::Command;

    fn triangle_fill_command() -> Command {
        let mut path = Path::new();
        path.move_to(PointD::new(1.0, 1.0));
        path.line_to(PointD::new(8.0, 1.0)).unwrap();
        path.line_to(PointD::new(1.0, 8.0)).unwrap();
        path.close().unwrap();
        let flat = Arc::new(flatten(&path, &FlattenOptions::default()));
        Command::Fill {
            flat,
            fill_rule: fog_raster::FillRule::NonZero,
            clip: None,
            source: Arc::new(Pattern::Solid(Solid::new(Color::from_straight(255, 200, 10, 10)))),
            operator: fog_compose::Operator::SrcOver,
            opacity: 255,
            bbox: BoxI::new(0, 0, 10, 10),
        }
    }

    #[test]
    fn st_and_mt_produce_identical_pixels_for_the_same_frame() {
        let mut st_img = Image::new(10, 10, PixelFormat::Prgb32).unwrap();
        let mut mt_img = Image::new(10, 10, PixelFormat::Prgb32).unwrap();

        let mut st = StSerializer::new(BoxI::new(0, 0, 10, 10), fog_raster::Precision::Precision24x8);
        let mut mt = MtSerializer::new(BoxI::new(0, 0, 10, 10), fog_raster::Precision::Precision24x8, 3);

        st.post(triangle_fill_command());
        mt.post(triangle_fill_command());

        st.flush(&mut st_img).unwrap();
        mt.flush(&mut mt_img).unwrap();

        for y in 0..10 {
            assert_eq!(st_img.row(y), mt_img.row(y), "row {y} differs between ST and MT");
        }
    }
}
