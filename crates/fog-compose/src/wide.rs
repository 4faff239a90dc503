//! 4-wide portable kernel, used when the dispatcher has a run of pixels at
//! full coverage and a destination format with natural 4-byte pixels
//! (`spec.md` §4.5: "the wide path must be bit-identical to the scalar path
//! at full coverage"). No explicit platform SIMD; `u32` lanes packed into
//! a `[u32; 4]` let the optimizer vectorize without `unsafe`.

use crate::operator::Operator;
use crate::scalar::{self, Pixel};

/// One 4-pixel wide lane, channel-major (`a[4]`, `r[4]`, `g[4]`, `b[4]`)
/// so each channel op is a flat `[u8; 4]` map.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wide4 {
    pub a: [u8; 4],
    pub r: [u8; 4],
    pub g: [u8; 4],
    pub b: [u8; 4],
}

impl Wide4 {
    #[must_use]
    pub fn from_pixels(p: [Pixel; 4]) -> Self {
        let mut w = Self::default();
        for i in 0..4 {
            w.a[i] = p[i].a;
            w.r[i] = p[i].r;
            w.g[i] = p[i].g;
            w.b[i] = p[i].b;
        }
        w
    }

    #[must_use]
    pub fn to_pixels(self) -> [Pixel; 4] {
        std::array::from_fn(|i| Pixel::new(self.a[i], self.r[i], self.g[i], self.b[i]))
    }
}

/// Applies `op` lane-wise across 4 src/dst pixel pairs. Defined directly in
/// terms of [`scalar::apply`] so the two paths can never drift apart; the
/// dispatcher picks this one purely to let the compiler batch the four
/// independent scalar computations.
#[must_use]
pub fn apply4(op: Operator, src: Wide4, dst: Wide4) -> Wide4 {
    let src_px = src.to_pixels();
    let dst_px = dst.to_pixels();
    let out = std::array::from_fn(|i| scalar::apply(op, src_px[i], dst_px[i]));
    Wide4::from_pixels(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_path_matches_scalar_path_at_full_coverage() {
        let src = [
            Pixel::new(255, 10, 20, 30),
            Pixel::new(128, 64, 0, 255),
            Pixel::new(0, 0, 0, 0),
            Pixel::new(255, 255, 255, 255),
        ];
        let dst = [
            Pixel::new(255, 200, 200, 200),
            Pixel::new(255, 5, 6, 7),
            Pixel::new(128, 8, 9, 10),
            Pixel::new(0, 0, 0, 0),
        ];
        for op in [Operator::SrcOver, Operator::Multiply, Operator::Xor, Operator::Screen] {
            let wide = apply4(op, Wide4::from_pixels(src), Wide4::from_pixels(dst)).to_pixels();
            for i in 0..4 {
                assert_eq!(wide[i], scalar::apply(op, src[i], dst[i]));
            }
        }
    }
}
