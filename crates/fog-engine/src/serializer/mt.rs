//! The multi-threaded serializer: `spec.md` §4.7's worker pool. `worker_count`
//! workers each own a disjoint [`Band`] of rows; `flush` fans the posted
//! commands out to scoped threads and quilts each worker's band back into
//! the target image — the barrier `spec.md` §4.7 step 6 describes, minus a
//! genuinely long-lived pool (see `DESIGN.md`).

use parking_lot::Mutex;

use fog_geom::BoxI;
use fog_image::Image;
use fog_raster::Precision;

use crate::command::Command;
use crate::error::EngineError;
use crate::render;
use crate::worker::{Band, WorkerContext};

use super::Serializer;

/// A pool of `worker_count` bands over a shared target, each rendering into
/// its own detached copy of the frame before the results are quilted back
/// together. Workers never observe each other's writes mid-frame, matching
/// `spec.md`'s "no two workers touch the same pixel" invariant by
/// construction rather than by synchronized access to one buffer.
pub struct MtSerializer {
    pending: Mutex<Vec<Command>>,
    precision: Precision,
    worker_count: usize,
}

impl MtSerializer {
    /// Builds a pool with `worker_count` bands (`offset=i, delta=worker_count`
    /// for worker `i`, `spec.md` §4.7 step 2) over `clip_box`.
    #[must_use]
    pub fn new(clip_box: BoxI, precision: Precision, worker_count: usize) -> Self {
        let _ = clip_box;
        Self { pending: Mutex::new(Vec::new()), precision, worker_count: worker_count.max(1) }
    }
}

impl Serializer for MtSerializer {
    fn post(&mut self, command: Command) {
        self.pending.lock().push(command);
    }

    fn flush(&mut self, target: &mut Image) -> Result<(), EngineError> {
        let commands = std::mem::take(&mut *self.pending.lock());
        let precision = self.precision;
        let worker_count = self.worker_count;

        let outcome = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = (0..worker_count)
                .map(|i| {
                    let commands = &commands;
                    let mut local = target.clone();
                    let band = Band { offset: i, delta: worker_count };
                    scope.spawn(move |_| {
                        let mut ctx = WorkerContext::new(band, precision);
                        let mut first_err = None;
                        for command in commands {
                            if let Err(e) = render::execute(command, &mut local, &mut ctx) {
                                tracing::warn!(worker = i, error = %e, "command failed during MT flush; continuing");
                                first_err.get_or_insert(e);
                            }
                        }
                        (band, local, first_err)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("worker thread panicked")).collect::<Vec<_>>()
        })
        .expect("worker scope panicked");

        let mut first_err = None;
        for (band, local, err) in outcome {
            if err.is_some() {
                first_err = first_err.or(err);
            }
            for y in 0..target.height() {
                if band.owns_row(y) {
                    target.row_mut(y).copy_from_slice(local.row(y));
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_image::PixelFormat;

    #[test]
    fn flush_with_no_commands_is_a_no_op() {
        let mut img = Image::new(4, 4, PixelFormat::Prgb32).unwrap();
        let mut mt = MtSerializer::new(BoxI::new(0, 0, 4, 4), Precision::Precision24x8, 2);
        mt.flush(&mut img).unwrap();
        assert_eq!(mt.pending(), 0);
    }

    #[test]
    fn worker_count_is_floored_at_one() {
        let mt = MtSerializer::new(BoxI::new(0, 0, 4, 4), Precision::Precision24x8, 0);
        assert_eq!(mt.worker_count, 1);
    }
}
