//! The analytic anti-aliased scanline rasterizer.
//!
//! Converts a flattened path (`fog-path`) into per-row coverage spans ready
//! for a pattern fetcher and composite kernel to consume.

mod error;
mod rasterizer;
mod span;

pub use error::RasterError;
pub use rasterizer::{FillRule, Precision, Rasterizer};
pub use span::{Coverage, RasterSpan, Scanline, FULL_COVERAGE};
