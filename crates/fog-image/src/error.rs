//! Error type for `fog-image`.

use thiserror::Error;

/// Errors raised while creating or mutating an [`crate::Image`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[must_use = "errors should be handled or propagated"]
pub enum ImageError {
    /// Requested dimensions are zero or negative.
    #[error("invalid image size {w}x{h}")]
    InvalidSize {
        /// Requested width.
        w: i32,
        /// Requested height.
        h: i32,
    },

    /// `stride`'s absolute value is smaller than `width * bytesPerPixel`.
    #[error("stride {stride} too small for width {width} in format requiring {min_stride} bytes/row")]
    StrideTooSmall {
        /// The rejected stride.
        stride: i32,
        /// The width it was checked against.
        width: i32,
        /// The minimum stride the format requires.
        min_stride: usize,
    },

    /// An indexed format (`I8`) was used without a palette, or with a
    /// palette of the wrong size.
    #[error("indexed format requires a 256-entry palette, got {got}")]
    InvalidPalette {
        /// The palette length actually supplied.
        got: usize,
    },

    /// Backing buffer allocation failed.
    #[error("out of memory allocating {bytes} bytes for image buffer")]
    OutOfMemory {
        /// Bytes that failed to allocate.
        bytes: usize,
    },
}
