//! Points in integer, single- and double-precision flavors.
//!
//! Widening conversions (`I → F → D`) are lossless and implemented via
//! `From`; narrowing is left to explicit casts at call sites since it may
//! lose precision.

/// An integer point, used for device-pixel coordinates and [`crate::Region`]
/// boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointI {
    pub x: i32,
    pub y: i32,
}

/// A single-precision point, used for the optional user-facing float API.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

/// A double-precision point, used throughout the geometric core (path
/// vertices, transform application, stroker/clipper math).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointD {
    pub x: f64,
    pub y: f64,
}

macro_rules! impl_point {
    ($ty:ident, $scalar:ty) => {
        impl $ty {
            /// The origin, `(0, 0)`.
            pub const ZERO: Self = Self { x: 0 as $scalar, y: 0 as $scalar };

            /// Creates a new point from its coordinates.
            #[inline]
            #[must_use]
            pub const fn new(x: $scalar, y: $scalar) -> Self {
                Self { x, y }
            }

            /// Translates this point by `(dx, dy)`.
            #[inline]
            #[must_use]
            pub fn translated(self, dx: $scalar, dy: $scalar) -> Self {
                Self::new(self.x + dx, self.y + dy)
            }
        }

        impl std::ops::Add for $ty {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self::new(self.x + rhs.x, self.y + rhs.y)
            }
        }

        impl std::ops::Sub for $ty {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self::new(self.x - rhs.x, self.y - rhs.y)
            }
        }
    };
}

impl_point!(PointI, i32);
impl_point!(PointF, f32);
impl_point!(PointD, f64);

impl From<PointI> for PointF {
    #[inline]
    fn from(p: PointI) -> Self {
        Self::new(p.x as f32, p.y as f32)
    }
}

impl From<PointI> for PointD {
    #[inline]
    fn from(p: PointI) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

impl From<PointF> for PointD {
    #[inline]
    fn from(p: PointF) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

impl PointD {
    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    /// True if either coordinate is NaN or infinite.
    #[must_use]
    pub fn is_non_finite(self) -> bool {
        !self.x.is_finite() || !self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_is_lossless() {
        let i = PointI::new(3, -7);
        let f: PointF = i.into();
        let d: PointD = i.into();
        assert_eq!(f.x, 3.0);
        assert_eq!(d.y, -7.0);
    }

    #[test]
    fn translate() {
        let p = PointD::new(1.0, 2.0).translated(10.0, -5.0);
        assert_eq!(p, PointD::new(11.0, -3.0));
    }
}
