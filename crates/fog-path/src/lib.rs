//! Path storage, flattening, stroking, and clipping.
//!
//! This crate covers the geometric pipeline that turns a user-built
//! [`Path`] into flattened poly-lines ready for the rasterizer
//! (`fog-raster`): curve flattening, stroke-to-fill conversion, and
//! rectangular/region clipping.

mod clip;
mod command;
mod error;
mod flatten;
mod path;
mod stroke;

pub use clip::{clip_to_rect, ClipStack};
pub use command::{PathCommand, PathVertex};
pub use error::PathError;
pub use flatten::{flatten, FlatPath, FlatSubpath, FlattenOptions};
pub use path::{Path, KAPPA};
pub use stroke::{stroke, InnerJoin, LineCap, LineJoin, StrokeParams};
