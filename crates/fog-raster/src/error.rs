//! Error type for `fog-raster`.

use thiserror::Error;

/// Errors raised while rasterizing a flattened path.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "errors should be handled or propagated"]
pub enum RasterError {
    /// A coordinate exceeded the representable range of both the 24.8 and
    /// 16.8 fixed-point precisions and was clipped out.
    #[error("coordinate {0} overflows rasterizer fixed-point range")]
    CoordinateOverflow(f64),
}
