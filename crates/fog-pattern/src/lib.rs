//! Paint source synthesizers: solid color, gradients, and textures, each
//! compiled into a fetcher that produces premultiplied `PRGB32` scanlines.

mod color;
mod error;
mod fetcher;
mod gradient;
mod solid;
mod spread;
mod texture;

pub use color::Color;
pub use error::PatternError;
pub use fetcher::Pattern;
pub use gradient::{ColorStop, Gradient, GradientKind, DEFAULT_LUT_SIZE};
pub use solid::Solid;
pub use spread::Spread;
pub use texture::{Texture, TextureQuality};
