//! The single-threaded serializer: `spec.md` §4.7's "[ST path] execute
//! command inline on one worker context". No queue, no threads — `post`
//! runs nothing, `flush` drains the zone synchronously against a single
//! full-frame [`WorkerContext`].

use fog_geom::BoxI;
use fog_image::Image;
use fog_raster::Precision;

use crate::command::Command;
use crate::error::EngineError;
use crate::render;
use crate::worker::{Band, WorkerContext};
use crate::zone::Zone;

use super::Serializer;

/// Executes every posted command inline, in order, on the calling thread.
#[derive(Debug)]
pub struct StSerializer {
    zone: Zone,
    worker: WorkerContext,
}

impl StSerializer {
    /// A serializer whose single worker owns every row (`Band { offset: 0,
    /// delta: 1 }`) within `clip_box`.
    #[must_use]
    pub fn new(clip_box: BoxI, precision: Precision) -> Self {
        let _ = clip_box;
        Self { zone: Zone::new(), worker: WorkerContext::new(Band { offset: 0, delta: 1 }, precision) }
    }
}

impl Serializer for StSerializer {
    fn post(&mut self, command: Command) {
        self.zone.push(command);
    }

    fn flush(&mut self, target: &mut Image) -> Result<(), EngineError> {
        let mut first_err = None;
        for command in self.zone.commands() {
            if let Err(e) = render::execute(command, target, &mut self.worker) {
                tracing::warn!(error = %e, "command failed during ST flush; continuing");
                first_err.get_or_insert(e);
            }
        }
        self.zone.reset();
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn pending(&self) -> usize {
        self.zone.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_image::PixelFormat;

    #[test]
    fn flush_with_no_commands_is_a_no_op() {
        let mut img = Image::new(4, 4, PixelFormat::Prgb32).unwrap();
        let mut st = StSerializer::new(BoxI::new(0, 0, 4, 4), Precision::Precision24x8);
        st.flush(&mut img).unwrap();
        assert_eq!(st.pending(), 0);
    }

    #[test]
    fn flush_resets_pending_count() {
        let mut img = Image::new(4, 4, PixelFormat::Prgb32).unwrap();
        let mut st = StSerializer::new(BoxI::new(0, 0, 4, 4), Precision::Precision24x8);
        st.post(Command::Barrier);
        assert_eq!(st.pending(), 1);
        st.flush(&mut img).unwrap();
        assert_eq!(st.pending(), 0);
    }
}
