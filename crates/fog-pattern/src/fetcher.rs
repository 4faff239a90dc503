//! [`Pattern`]: the sum type over fetcher kinds, compiled once per paint
//! call and reused across every span it touches (`spec.md` §3).

use crate::error::PatternError;
use crate::gradient::Gradient;
use crate::solid::Solid;
use crate::texture::Texture;

/// A paint source: solid color, gradient, or texture.
#[derive(Debug, Clone)]
pub enum Pattern {
    Solid(Solid),
    Gradient(Gradient),
    Texture(Texture),
}

impl Pattern {
    /// Fetches `len` consecutive premultiplied `PRGB32` pixels starting at
    /// device pixel `(x, y)` into `out`.
    ///
    /// # Errors
    ///
    /// Propagates [`PatternError::NotInvertible`] from gradient/texture
    /// fetches whose transform cannot be inverted.
    pub fn fetch(&self, x: i32, y: i32, len: usize, out: &mut [u32]) -> Result<(), PatternError> {
        match self {
            Self::Solid(s) => {
                s.fetch(len, out);
                Ok(())
            }
            Self::Gradient(g) => g.fetch(x, y, len, out),
            Self::Texture(t) => t.fetch(x, y, len, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn solid_variant_dispatches_to_solid_fetch() {
        let p = Pattern::Solid(Solid::new(Color::from_premultiplied(255, 1, 2, 3)));
        let mut out = [0u32; 2];
        p.fetch(0, 0, 2, &mut out).unwrap();
        assert_eq!(out[0], out[1]);
    }
}
