//! Spread modes: how a gradient or texture extends beyond its defining
//! `[0, 1]` parameter range (`spec.md` §4.4).

/// How an out-of-range gradient/texture parameter is mapped back in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spread {
    /// Outside `[0, 1]` is fully transparent (gradients only).
    None,
    /// Clamps to the nearest edge.
    Pad,
    /// Wraps around, repeating the pattern.
    Repeat,
    /// Wraps around, mirroring every other repetition.
    Reflect,
}

impl Spread {
    /// Maps `t` (any real number) into `[0, 1]`, or `None` if it falls
    /// outside the defined range under [`Spread::None`].
    #[must_use]
    pub fn apply(self, t: f64) -> Option<f64> {
        match self {
            Self::None => (0.0..=1.0).contains(&t).then_some(t),
            Self::Pad => Some(t.clamp(0.0, 1.0)),
            Self::Repeat => Some(t.rem_euclid(1.0)),
            Self::Reflect => {
                let period = t.rem_euclid(2.0);
                Some(if period > 1.0 { 2.0 - period } else { period })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_rejects_out_of_range() {
        assert_eq!(Spread::None.apply(1.5), None);
        assert_eq!(Spread::None.apply(0.5), Some(0.5));
    }

    #[test]
    fn pad_clamps() {
        assert_eq!(Spread::Pad.apply(-0.5), Some(0.0));
        assert_eq!(Spread::Pad.apply(1.5), Some(1.0));
    }

    #[test]
    fn repeat_wraps() {
        assert!((Spread::Repeat.apply(1.25).unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn reflect_mirrors_every_other_period() {
        assert!((Spread::Reflect.apply(1.25).unwrap() - 0.75).abs() < 1e-9);
        assert!((Spread::Reflect.apply(2.25).unwrap() - 0.25).abs() < 1e-9);
    }
}
