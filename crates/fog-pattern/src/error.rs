//! Error type for `fog-pattern`.

use thiserror::Error;

/// Errors raised while building or evaluating a [`crate::Pattern`].
#[derive(Error, Debug, Clone, PartialEq)]
#[must_use = "errors should be handled or propagated"]
pub enum PatternError {
    /// A gradient was built with no color stops.
    #[error("gradient has no color stops")]
    NoStops,

    /// A linear/radial gradient's geometry collapsed to a point (zero
    /// radius or coincident endpoints).
    #[error("gradient geometry is degenerate")]
    DegenerateGeometry,

    /// The pattern's transform could not be inverted (needed to map device
    /// pixels back into pattern space).
    #[error("pattern transform is not invertible")]
    NotInvertible,
}
