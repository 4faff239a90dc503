//! [`WorkerContext`]: per-thread scratch (`spec.md` §3 glossary entry
//! "Worker context"). Each worker owns its Y offset/delta band
//! assignment, its own rasterizer and scanline/mask buffers, a zone
//! allocator for intermediate spans, and never writes a row another
//! worker could touch.

use fog_geom::BoxI;
use fog_raster::{FillRule, Precision, Rasterizer};

/// A worker's static band assignment: it owns every row `y` where
/// `y % delta == offset` (`spec.md` §4.7 step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub offset: usize,
    pub delta: usize,
}

impl Band {
    #[must_use]
    pub fn owns_row(self, y: i32) -> bool {
        y >= 0 && (y as usize) % self.delta == self.offset
    }

    /// `true` if any row of `bbox` falls in this worker's band — the
    /// per-command skip test named in `spec.md` §4.7 step 5.
    #[must_use]
    pub fn intersects(self, bbox: BoxI) -> bool {
        if bbox.is_empty() {
            return false;
        }
        let y0 = bbox.y0.max(0);
        let delta = self.delta as i32;
        let offset = self.offset as i32;
        let first_owned_row = y0 + (offset - y0).rem_euclid(delta);
        first_owned_row < bbox.y1
    }
}

/// Per-thread scratch state. Not `Clone`/`Send`-shared: exactly one worker
/// thread owns each instance for the engine's lifetime.
#[derive(Debug)]
pub struct WorkerContext {
    pub band: Band,
    rasterizer_precision: Precision,
    /// Intermediate row buffer reused across commands within this worker's
    /// band, avoiding a per-command allocation.
    scratch_row: Vec<u8>,
}

impl WorkerContext {
    #[must_use]
    pub fn new(band: Band, rasterizer_precision: Precision) -> Self {
        Self { band, rasterizer_precision, scratch_row: Vec::new() }
    }

    /// Builds a rasterizer clipped to `clip_box` with this worker's
    /// configured precision and the given fill rule.
    #[must_use]
    pub fn rasterizer(&self, clip_box: BoxI, fill_rule: FillRule) -> Rasterizer {
        Rasterizer::new(clip_box, fill_rule).with_precision(self.rasterizer_precision)
    }

    /// Borrows (and grows if needed) this worker's reusable scratch row.
    pub fn scratch_row(&mut self, len: usize) -> &mut [u8] {
        if self.scratch_row.len() < len {
            self.scratch_row.resize(len, 0);
        }
        &mut self.scratch_row[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_owns_rows_matching_offset_modulo_delta() {
        let band = Band { offset: 1, delta: 3 };
        assert!(!band.owns_row(0));
        assert!(band.owns_row(1));
        assert!(!band.owns_row(2));
        assert!(band.owns_row(4));
    }

    #[test]
    fn two_disjoint_bands_never_share_a_row() {
        let a = Band { offset: 0, delta: 2 };
        let b = Band { offset: 1, delta: 2 };
        for y in 0..100 {
            assert_ne!(a.owns_row(y), b.owns_row(y));
        }
    }

    #[test]
    fn band_intersects_a_bbox_spanning_its_rows() {
        let band = Band { offset: 0, delta: 4 };
        let bbox = BoxI::new(0, 1, 10, 3);
        assert!(!band.owns_row(1) && !band.owns_row(2));
        assert!(!band.intersects(bbox));

        let spanning = BoxI::new(0, 0, 10, 5);
        assert!(band.intersects(spanning));
    }
}
