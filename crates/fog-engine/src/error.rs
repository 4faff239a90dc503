//! Error type for `fog-engine`, plus the `err_t`-style code `spec.md` §6
//! names for FFI-style callers.

use thiserror::Error;

use fog_geom::GeomError;
use fog_image::ImageError;
use fog_path::PathError;
use fog_pattern::PatternError;
use fog_raster::RasterError;

/// The engine-wide error type. Lower-layer errors compose in via `#[from]`
/// so a single `?` at any call site produces a coherent engine error.
#[derive(Error, Debug, Clone, PartialEq)]
#[must_use = "errors should be handled or propagated"]
pub enum EngineError {
    /// A geometry operation failed (non-invertible transform, overflow).
    #[error(transparent)]
    Geom(#[from] GeomError),

    /// A path operation failed (missing `MoveTo`, non-finite coordinate).
    #[error(transparent)]
    Path(#[from] PathError),

    /// The rasterizer rejected a coordinate as out of range.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// A pattern/source fetch failed.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// An image allocation or access failed.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// A worker thread failed to allocate scratch space for a command and
    /// skipped it; the frame continues, but this draw call was dropped.
    #[error("worker {worker} failed to allocate scratch for a command, command skipped")]
    WorkerAllocationFailed {
        /// Index of the worker that hit the allocation failure.
        worker: usize,
    },

    /// `flush(SYNC)` was called with no workers configured to drain.
    #[error("flush called with no active worker pool")]
    NoWorkerPool,
}

/// `spec.md` §6's error-code surface, for callers that want a flat integer
/// rather than the rich [`EngineError`] enum (e.g. an FFI boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    /// No error.
    Ok = 0,
    /// A transform was not invertible.
    NotInvertible = 1,
    /// A coordinate overflowed the rasterizer's fixed-point range.
    Overflow = 2,
    /// A coordinate was NaN or infinite.
    NonFinite = 3,
    /// A path command preceded the initial `MoveTo`.
    MissingMoveTo = 4,
    /// A gradient/pattern was missing required geometry or stops.
    InvalidPattern = 5,
    /// An image allocation or access failed.
    ImageError = 6,
    /// A worker dropped a command after a scratch allocation failure.
    WorkerAllocationFailed = 7,
    /// No worker pool was available to service the request.
    NoWorkerPool = 8,
}

impl EngineError {
    /// Projects this error onto `spec.md` §6's flat `ErrorCode` space.
    #[must_use]
    pub fn as_code(&self) -> ErrorCode {
        match self {
            Self::Geom(GeomError::NotInvertible) | Self::Path(PathError::NotInvertible) | Self::Pattern(PatternError::NotInvertible) => {
                ErrorCode::NotInvertible
            }
            Self::Geom(GeomError::Overflow) | Self::Raster(RasterError::CoordinateOverflow(_)) => ErrorCode::Overflow,
            Self::Geom(GeomError::NonFinite) | Self::Path(PathError::NonFinite) => ErrorCode::NonFinite,
            Self::Path(PathError::MissingMoveTo) => ErrorCode::MissingMoveTo,
            Self::Pattern(PatternError::NoStops | PatternError::DegenerateGeometry) => ErrorCode::InvalidPattern,
            Self::Image(_) => ErrorCode::ImageError,
            Self::WorkerAllocationFailed { .. } => ErrorCode::WorkerAllocationFailed,
            Self::NoWorkerPool => ErrorCode::NoWorkerPool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_invertible_geom_error_maps_to_matching_code() {
        let err = EngineError::from(GeomError::NotInvertible);
        assert_eq!(err.as_code(), ErrorCode::NotInvertible);
    }

    #[test]
    fn worker_allocation_failure_round_trips_its_index() {
        let err = EngineError::WorkerAllocationFailed { worker: 3 };
        assert_eq!(err.as_code(), ErrorCode::WorkerAllocationFailed);
    }
}
