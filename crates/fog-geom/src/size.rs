//! Sizes in integer, single- and double-precision flavors.

/// An integer size (width/height), used for image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizeI {
    pub w: i32,
    pub h: i32,
}

/// A single-precision size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeF {
    pub w: f32,
    pub h: f32,
}

/// A double-precision size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeD {
    pub w: f64,
    pub h: f64,
}

macro_rules! impl_size {
    ($ty:ident, $scalar:ty) => {
        impl $ty {
            /// Creates a new size.
            #[inline]
            #[must_use]
            pub const fn new(w: $scalar, h: $scalar) -> Self {
                Self { w, h }
            }

            /// True if either dimension is non-positive.
            #[inline]
            #[must_use]
            pub fn is_empty(self) -> bool {
                self.w <= 0 as $scalar || self.h <= 0 as $scalar
            }
        }
    };
}

impl_size!(SizeI, i32);
impl_size!(SizeF, f32);
impl_size!(SizeD, f64);

impl From<SizeI> for SizeF {
    #[inline]
    fn from(s: SizeI) -> Self {
        Self::new(s.w as f32, s.h as f32)
    }
}

impl From<SizeI> for SizeD {
    #[inline]
    fn from(s: SizeI) -> Self {
        Self::new(f64::from(s.w), f64::from(s.h))
    }
}

impl From<SizeF> for SizeD {
    #[inline]
    fn from(s: SizeF) -> Self {
        Self::new(f64::from(s.w), f64::from(s.h))
    }
}
