//! Portable scalar composite kernels.
//!
//! `spec.md` §4.5: per-operator arithmetic on premultiplied channels
//! `Dca', Da'`, with source coverage folded in before the operator runs.
//! One `apply` function per operator, dispatched by [`crate::Operator`];
//! [`crate::dispatch`] wraps these to walk a whole span.

use crate::operator::Operator;

/// A premultiplied pixel's four 8-bit channels, unpacked for kernel math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    #[must_use]
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    #[must_use]
    pub fn from_u32(w: u32) -> Self {
        Self::new((w >> 24) as u8, (w >> 16) as u8, (w >> 8) as u8, w as u8)
    }

    #[must_use]
    pub fn to_u32(self) -> u32 {
        (u32::from(self.a) << 24) | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// Scales a premultiplied pixel's channels by `coverage / 255`
/// (`spec.md` §4.5: "Coverage combines as `Sca *= coverage/255`").
#[must_use]
pub fn apply_coverage(src: Pixel, coverage: u8) -> Pixel {
    if coverage == 255 {
        return src;
    }
    let scale = |c: u8| (u16::from(c) * u16::from(coverage) + 127) / 255;
    Pixel::new(scale(src.a), scale(src.r), scale(src.g), scale(src.b))
}

fn div255(v: u32) -> u8 {
    (((v + 128) + ((v + 128) >> 8)) >> 8) as u8
}

fn mul(a: u8, b: u8) -> u8 {
    div255(u32::from(a) * u32::from(b))
}

fn inv(a: u8) -> u8 {
    255 - a
}

/// Applies `op` to one already-coverage-scaled source pixel over one
/// destination pixel, returning the new destination.
#[must_use]
pub fn apply(op: Operator, src: Pixel, dst: Pixel) -> Pixel {
    match op {
        Operator::Clear => Pixel::default(),
        Operator::Src => src,
        Operator::Dest => dst,
        Operator::SrcOver => porter_duff(src, dst, |_sa, _da| 255, |sa, _da| inv(sa)),
        Operator::DestOver => porter_duff(src, dst, |_sa, da| inv(da), |_sa, _da| 255),
        Operator::SrcIn => porter_duff(src, dst, |_sa, da| da, |_sa, _da| 0),
        Operator::DestIn => porter_duff(src, dst, |_sa, _da| 0, |sa, _da| sa),
        Operator::SrcOut => porter_duff(src, dst, |_sa, da| inv(da), |_sa, _da| 0),
        Operator::DestOut => porter_duff(src, dst, |_sa, _da| 0, |sa, _da| inv(sa)),
        Operator::SrcAtop => porter_duff(src, dst, |_sa, da| da, |sa, _da| inv(sa)),
        Operator::DestAtop => porter_duff(src, dst, |_sa, da| inv(da), |sa, _da| sa),
        Operator::Xor => porter_duff(src, dst, |_sa, da| inv(da), |sa, _da| inv(sa)),
        Operator::Add => add(src, dst),
        Operator::Subtract => subtract(src, dst),
        Operator::Multiply => separable(src, dst, |sca, _da, dca, _sa| u16::from(mul(sca, dca))),
        Operator::Screen => separable(src, dst, |sca, da, dca, sa| u16::from(mul(sca, da)) + u16::from(mul(dca, sa)) - u16::from(mul(sca, dca))),
        Operator::Darken => separable(src, dst, |sca, da, dca, sa| u16::from(mul(sca, da).min(mul(dca, sa)))),
        Operator::Lighten => separable(src, dst, |sca, da, dca, sa| u16::from(mul(sca, da).max(mul(dca, sa)))),
        Operator::Difference => separable(src, dst, |sca, da, dca, sa| u16::from(mul(sca, da).abs_diff(mul(dca, sa)))),
        Operator::Exclusion => separable(src, dst, |sca, da, dca, sa| u16::from(mul(sca, da)) + u16::from(mul(dca, sa)) - 2 * u16::from(mul(sca, dca))),
        Operator::Invert => invert(src, dst),
        Operator::InvertRgb => invert_rgb(src, dst),
    }
}

/// Classic Porter–Duff coefficient model: `Dca' = Fa*Sca + Fb*Dca`,
/// `Da' = Fa*Sa + Fb*Da`, where `fa`/`fb` are the per-operator blending
/// fractions (e.g. SRC_OVER is `Fa=1, Fb=1-Sa`; SRC_ATOP is `Fa=Da,
/// Fb=1-Sa`). Deriving alpha from the same coefficients as color keeps
/// operators like SRC_ATOP/XOR correct without a special-cased alpha rule.
fn porter_duff(
    src: Pixel,
    dst: Pixel,
    fa: impl Fn(u8, u8) -> u8,
    fb: impl Fn(u8, u8) -> u8,
) -> Pixel {
    let fa = fa(src.a, dst.a);
    let fb = fb(src.a, dst.a);
    let comp = |s: u8, d: u8| mul(fa, s).saturating_add(mul(fb, d));
    Pixel::new(
        comp(src.a, dst.a),
        comp(src.r, dst.r),
        comp(src.g, dst.g),
        comp(src.b, dst.b),
    )
}

/// Generic separable-blend compositor (`spec.md`'s MULTIPLY form,
/// generalized): `Dca' = Sca*(1-Da) + Dca*(1-Sa) + B(Sca,Da,Dca,Sa)`, with
/// the same shared alpha formula as [`porter_duff`]. `b` computes the
/// blend term on premultiplied channels, already alpha-weighted.
fn separable(src: Pixel, dst: Pixel, b: impl Fn(u8, u8, u8, u8) -> u16) -> Pixel {
    let a = (u16::from(src.a) + u16::from(dst.a) - u16::from(mul(src.a, dst.a))) as u8;
    let chan = |sca: u8, dca: u8| {
        let base = u16::from(mul(sca, inv(dst.a))) + u16::from(mul(dca, inv(src.a)));
        (base + b(sca, dst.a, dca, src.a)).min(255) as u8
    };
    Pixel::new(a, chan(src.r, dst.r), chan(src.g, dst.g), chan(src.b, dst.b))
}

/// `Dca' = Sca + Dca`, `Da' = Sa + Da`, saturating.
fn add(src: Pixel, dst: Pixel) -> Pixel {
    let sat = |a: u8, b: u8| a.saturating_add(b);
    Pixel::new(sat(src.a, dst.a), sat(src.r, dst.r), sat(src.g, dst.g), sat(src.b, dst.b))
}

/// `Dca' = Dca - Sca`, saturating.
fn subtract(src: Pixel, dst: Pixel) -> Pixel {
    let sat = |a: u8, b: u8| a.saturating_sub(b);
    Pixel::new(sat(dst.a, src.a), sat(dst.r, src.r), sat(dst.g, src.g), sat(dst.b, src.b))
}

/// `Dca' = Dca*(1-Sa)`, `Da' = Da*(1-Sa) + Sa` — destination inverted where
/// the source covers it.
fn invert(src: Pixel, dst: Pixel) -> Pixel {
    let ia = inv(src.a);
    Pixel::new(
        dst.a + mul(src.a, inv(dst.a)),
        mul(inv(dst.r), src.a) + mul(dst.r, ia),
        mul(inv(dst.g), src.a) + mul(dst.g, ia),
        mul(inv(dst.b), src.a) + mul(dst.b, ia),
    )
}

/// Like [`invert`] but also inverts color using the source's own color as
/// the inversion strength per channel.
fn invert_rgb(src: Pixel, dst: Pixel) -> Pixel {
    let ia = inv(src.a);
    Pixel::new(
        dst.a + mul(src.a, inv(dst.a)),
        mul(mul(inv(dst.r), src.r), src.a) + mul(dst.r, ia),
        mul(mul(inv(dst.g), src.g), src.a) + mul(dst.g, ia),
        mul(mul(inv(dst.b), src.b), src.a) + mul(dst.b, ia),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_zeroes_destination() {
        let dst = Pixel::new(255, 10, 20, 30);
        assert_eq!(apply(Operator::Clear, Pixel::default(), dst), Pixel::default());
    }

    #[test]
    fn src_over_onto_transparent_yields_source() {
        let src = Pixel::new(128, 128, 0, 0);
        let dst = Pixel::default();
        assert_eq!(apply(Operator::SrcOver, src, dst), src);
    }

    #[test]
    fn src_over_opaque_source_fully_replaces() {
        let src = Pixel::new(255, 10, 20, 30);
        let dst = Pixel::new(255, 200, 200, 200);
        assert_eq!(apply(Operator::SrcOver, src, dst), src);
    }

    #[test]
    fn dest_is_identity() {
        let dst = Pixel::new(100, 50, 60, 70);
        assert_eq!(apply(Operator::Dest, Pixel::new(255, 1, 2, 3), dst), dst);
    }

    #[test]
    fn src_in_masks_by_destination_alpha() {
        let src = Pixel::new(255, 255, 0, 0);
        let dst = Pixel::new(128, 0, 0, 0);
        let result = apply(Operator::SrcIn, src, dst);
        assert_eq!(result.a, mul(255, 128));
    }

    #[test]
    fn xor_of_two_opaque_pixels_is_transparent() {
        let src = Pixel::new(255, 255, 0, 0);
        let dst = Pixel::new(255, 0, 255, 0);
        let result = apply(Operator::Xor, src, dst);
        assert_eq!(result.a, 0);
    }

    #[test]
    fn multiply_of_opaque_black_over_anything_is_black() {
        let src = Pixel::new(255, 0, 0, 0);
        let dst = Pixel::new(255, 200, 200, 200);
        let result = apply(Operator::Multiply, src, dst);
        assert_eq!(result.r, 0);
        assert_eq!(result.a, 255);
    }

    #[test]
    fn screen_of_opaque_white_over_anything_is_white() {
        let src = Pixel::new(255, 255, 255, 255);
        let dst = Pixel::new(255, 50, 60, 70);
        let result = apply(Operator::Screen, src, dst);
        assert_eq!(result.r, 255);
    }

    #[test]
    fn coverage_scales_source_channels() {
        let src = Pixel::new(255, 255, 255, 255);
        let scaled = apply_coverage(src, 128);
        assert!(scaled.a < 255 && scaled.a > 100);
    }

    #[test]
    fn add_saturates_instead_of_wrapping() {
        let src = Pixel::new(200, 200, 200, 200);
        let dst = Pixel::new(200, 200, 200, 200);
        let result = apply(Operator::Add, src, dst);
        assert_eq!(result.a, 255);
    }
}
