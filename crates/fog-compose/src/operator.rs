//! [`Operator`]: the 22 Porter–Duff/blend composite modes, plus the static
//! [`Characteristics`] mask each one carries (`spec.md` §3/§4.5/§GLOSSARY).

use bitflags::bitflags;

bitflags! {
    /// Static per-operator flags the dispatcher uses to short-circuit work.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Characteristics: u8 {
        /// The destination color channels are read.
        const DST_C_USED = 0b0000_0001;
        /// The destination alpha channel is read.
        const DST_A_USED = 0b0000_0010;
        /// The source color channels are read.
        const SRC_C_USED = 0b0000_0100;
        /// The source alpha channel is read.
        const SRC_A_USED = 0b0000_1000;
        /// The operator never changes the destination (dispatcher may skip
        /// the span entirely).
        const NOP = 0b0001_0000;
        /// Output is confined to `src ∪ dst`, so the dispatcher may skip
        /// spans fully outside the source mask.
        const BOUND = 0b0010_0000;
    }
}

/// The 22 Porter–Duff/blend composite operators (`spec.md` §GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Src,
    Dest,
    SrcOver,
    DestOver,
    SrcIn,
    DestIn,
    SrcOut,
    DestOut,
    SrcAtop,
    DestAtop,
    Xor,
    Clear,
    Add,
    Subtract,
    Multiply,
    Screen,
    Darken,
    Lighten,
    Difference,
    Exclusion,
    Invert,
    InvertRgb,
}

impl Operator {
    /// This operator's static characteristics mask.
    #[must_use]
    pub const fn characteristics(self) -> Characteristics {
        use Characteristics as C;
        match self {
            Self::Clear => C::BOUND,
            Self::Src => C::SRC_C_USED.union(C::SRC_A_USED),
            Self::Dest => C::NOP,
            Self::SrcOver => C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_C_USED).union(C::SRC_A_USED).union(C::BOUND),
            Self::DestOver => C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_C_USED).union(C::SRC_A_USED),
            Self::SrcIn => C::DST_A_USED.union(C::SRC_C_USED).union(C::SRC_A_USED).union(C::BOUND),
            Self::DestIn => C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_A_USED),
            Self::SrcOut => C::DST_A_USED.union(C::SRC_C_USED).union(C::SRC_A_USED).union(C::BOUND),
            Self::DestOut => C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_A_USED),
            Self::SrcAtop => C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_C_USED).union(C::SRC_A_USED).union(C::BOUND),
            Self::DestAtop => C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_C_USED).union(C::SRC_A_USED),
            Self::Xor => C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_C_USED).union(C::SRC_A_USED),
            Self::Add => C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_C_USED).union(C::SRC_A_USED).union(C::BOUND),
            Self::Subtract
            | Self::Multiply
            | Self::Screen
            | Self::Darken
            | Self::Lighten
            | Self::Difference
            | Self::Exclusion => {
                C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_C_USED).union(C::SRC_A_USED)
            }
            Self::Invert => C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_A_USED),
            Self::InvertRgb => C::DST_C_USED.union(C::DST_A_USED).union(C::SRC_C_USED).union(C::SRC_A_USED),
        }
    }

    /// `true` for operators the dispatcher may skip entirely (`DEST`).
    #[must_use]
    pub const fn is_nop(self) -> bool {
        self.characteristics().contains(Characteristics::NOP)
    }

    /// `true` if output is confined to `src ∪ dst`, allowing the dispatcher
    /// to skip spans fully outside the source mask.
    #[must_use]
    pub const fn is_bounded(self) -> bool {
        self.characteristics().contains(Characteristics::BOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dest_is_nop() {
        assert!(Operator::Dest.is_nop());
        assert!(!Operator::SrcOver.is_nop());
    }

    #[test]
    fn clear_ignores_source() {
        let c = Operator::Clear.characteristics();
        assert!(!c.contains(Characteristics::SRC_C_USED));
        assert!(!c.contains(Characteristics::SRC_A_USED));
    }

    #[test]
    fn src_over_and_add_are_bounded() {
        assert!(Operator::SrcOver.is_bounded());
        assert!(Operator::Add.is_bounded());
        assert!(!Operator::DestOver.is_bounded());
    }
}
