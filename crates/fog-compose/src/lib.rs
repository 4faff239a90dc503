//! Composite kernel registry: the 22 Porter-Duff/blend operators from
//! `spec.md` §4.5, specialized per destination pixel format and coverage
//! mode. Kernel math never fails, so this crate has no error type; callers
//! that feed it malformed buffers get a `debug_assert` in debug builds.

mod dispatch;
mod operator;
mod scalar;
mod wide;

pub use dispatch::{composite_span, SpanCoverage};
pub use operator::{Characteristics, Operator};
pub use scalar::{apply, apply_coverage, Pixel};
pub use wide::{apply4, Wide4};
