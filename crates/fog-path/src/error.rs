//! Error type for `fog-path`.

use thiserror::Error;

/// Errors raised while building, transforming, or stroking a [`crate::Path`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "errors should be handled or propagated"]
pub enum PathError {
    /// A curve or `LineTo` command was appended before any `MoveTo`.
    #[error("curve or line command before initial MoveTo")]
    MissingMoveTo,

    /// A coordinate in the path is NaN or infinite.
    #[error("non-finite coordinate in path")]
    NonFinite,

    /// The transform applied to the path was not invertible where an
    /// inverse was required (e.g. hit-testing in pattern space).
    #[error("transform is not invertible")]
    NotInvertible,
}
