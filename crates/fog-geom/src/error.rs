//! Error type for `fog-geom`.

use thiserror::Error;

/// Errors raised by geometric primitives.
///
/// Per `spec.md` §4.2/§7, geometric overflow or degeneracy is generally a
/// no-op for the draw call that triggered it rather than a propagated panic;
/// this type is how that no-op is reported up through the call stack.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "errors should be handled or propagated"]
pub enum GeomError {
    /// A transform has no inverse (determinant is zero, within tolerance).
    #[error("transform is not invertible")]
    NotInvertible,

    /// A coordinate could not be represented in the rasterizer's active
    /// fixed-point precision (24.8 or 16.8) after clipping to range.
    #[error("coordinate overflows representable range")]
    Overflow,

    /// A computed value is NaN or infinite.
    #[error("non-finite coordinate")]
    NonFinite,
}
