//! Affine and projective 2D transforms.
//!
//! `spec.md` §4.1: the primary transform is a 6-value 2x3 affine matrix; a
//! 3x3 projective extension is supported for textures. [`Transform`] stores
//! the full 3x3 homogeneous matrix but keeps the common 2x3 affine case
//! cheap: `transform_point` only pays for the homogeneous divide when the
//! projective row `[m13, m23, m33]` differs from `[0, 0, 1]`.
//!
//! # Type classification
//!
//! Every mutating operation re-derives [`TransformType`] from the resulting
//! coefficients, within [`crate::TRANSFORM_TYPE_EPSILON`]. Pattern fetchers
//! (`fog-pattern`) and the rasterizer dispatch on this type to choose fast
//! paths (`spec.md` §4.4's fast-path table).
//!
//! ```
//! use fog_geom::{Transform, TransformType};
//!
//! let t = Transform::translation(10.0, 0.0);
//! assert_eq!(t.kind(), TransformType::Translate);
//!
//! let t = t.then(&Transform::scale(2.0, 2.0));
//! assert_eq!(t.kind(), TransformType::Affine);
//! ```

use crate::{GeomError, PointD, TRANSFORM_TYPE_EPSILON};

/// The fast-path classification of a [`Transform`].
///
/// Variants are ordered from "most special-cased" to "most general"; callers
/// that only care whether a fast path applies can use `kind <= Scale` style
/// comparisons since the enum is `PartialOrd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransformType {
    /// No-op transform.
    Identity,
    /// Pure translation: `sx = sy = 1`, no shear.
    Translate,
    /// Axis-aligned scale + translation, no shear or rotation.
    Scale,
    /// 90-degree-multiple rotation (axes swapped), no general shear.
    Swap,
    /// General rotation (and optionally uniform scale), no shear.
    Rotate,
    /// General 2x3 affine: translation, rotation, scale and shear.
    Affine,
    /// Full 3x3 projective transform (non-trivial last row).
    Projective,
}

/// A 2D affine or projective transform, stored as a row-major 3x3
/// homogeneous matrix:
///
/// ```text
/// [ m11  m12  m13 ]   [ sx   shy  m13 ]
/// [ m21  m22  m23 ] = [ shx  sy   m23 ]
/// [ m31  m32  m33 ]   [ tx   ty   m33 ]
/// ```
///
/// For a pure affine transform `m13 = m23 = 0` and `m33 = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
    pub m13: f64,
    pub m23: f64,
    pub m33: f64,
    kind: TransformType,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        sx: 1.0,
        shy: 0.0,
        shx: 0.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
        m13: 0.0,
        m23: 0.0,
        m33: 1.0,
        kind: TransformType::Identity,
    };

    /// Creates an identity transform.
    #[inline]
    #[must_use]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Creates a translation transform.
    #[must_use]
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
        .recomputed()
    }

    /// Creates a uniform or non-uniform scale transform.
    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            sx,
            sy,
            ..Self::IDENTITY
        }
        .recomputed()
    }

    /// Creates a rotation transform, `angle` in radians, about the origin.
    #[must_use]
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            sx: c,
            shy: s,
            shx: -s,
            sy: c,
            ..Self::IDENTITY
        }
        .recomputed()
    }

    /// Creates a skew (shear) transform, angles in radians.
    #[must_use]
    pub fn skew(skew_x: f64, skew_y: f64) -> Self {
        Self {
            shx: skew_x.tan(),
            shy: skew_y.tan(),
            ..Self::IDENTITY
        }
        .recomputed()
    }

    /// Builds an affine transform directly from its six coefficients.
    #[must_use]
    pub fn from_affine(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
            m13: 0.0,
            m23: 0.0,
            m33: 1.0,
            kind: TransformType::Affine,
        }
        .recomputed()
    }

    /// Builds a full projective transform from all nine coefficients.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_projective(
        sx: f64,
        shy: f64,
        m13: f64,
        shx: f64,
        sy: f64,
        m23: f64,
        tx: f64,
        ty: f64,
        m33: f64,
    ) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
            m13,
            m23,
            m33,
            kind: TransformType::Projective,
        }
        .recomputed()
    }

    /// The cached fast-path classification.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> TransformType {
        self.kind
    }

    /// True when `kind()` is [`TransformType::Projective`] (non-trivial last
    /// row) — `spec.md` §4.4's "no projective term" fast-path condition is
    /// `!self.is_projective()`.
    #[inline]
    #[must_use]
    pub fn is_projective(&self) -> bool {
        self.kind == TransformType::Projective
    }

    /// Re-derives [`TransformType`] from the current coefficients.
    ///
    /// `spec.md` §4.1: "the type field is re-derived from the coefficients
    /// whenever coefficients change, using tolerance `ε = 1e-14`".
    #[must_use]
    fn recomputed(mut self) -> Self {
        let eps = TRANSFORM_TYPE_EPSILON;
        let near = |a: f64, b: f64| (a - b).abs() < eps;

        self.kind = if !near(self.m13, 0.0) || !near(self.m23, 0.0) || !near(self.m33, 1.0) {
            TransformType::Projective
        } else if !near(self.shx, 0.0) || !near(self.shy, 0.0) {
            if near(self.sx, 0.0) && near(self.sy, 0.0) {
                TransformType::Swap
            } else if near(self.shx, -self.shy) && near(self.sx, self.sy) {
                TransformType::Rotate
            } else {
                TransformType::Affine
            }
        } else if !near(self.sx, 1.0) || !near(self.sy, 1.0) {
            TransformType::Scale
        } else if !near(self.tx, 0.0) || !near(self.ty, 0.0) {
            TransformType::Translate
        } else {
            TransformType::Identity
        };
        self
    }

    /// Composes `self` followed by `other`: equivalent to applying `self`
    /// first, then `other` (`other * self` in matrix-multiplication order).
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        // Promote to full 3x3 multiplication when either side is projective;
        // otherwise use the cheaper 2x3 affine composition.
        if self.is_projective() || other.is_projective() {
            let a = self.as_matrix3();
            let b = other.as_matrix3();
            let mut r = [[0.0_f64; 3]; 3];
            for (i, row) in r.iter_mut().enumerate() {
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
                }
            }
            Self::from_projective(
                r[0][0], r[0][1], r[0][2], r[1][0], r[1][1], r[1][2], r[2][0], r[2][1], r[2][2],
            )
        } else {
            Self::from_affine(
                self.sx * other.sx + self.shy * other.shx,
                self.sx * other.shy + self.shy * other.sy,
                self.shx * other.sx + self.sy * other.shx,
                self.shx * other.shy + self.sy * other.sy,
                self.tx * other.sx + self.ty * other.shx + other.tx,
                self.tx * other.shy + self.ty * other.sy + other.ty,
            )
        }
    }

    fn as_matrix3(&self) -> [[f64; 3]; 3] {
        [
            [self.sx, self.shy, self.m13],
            [self.shx, self.sy, self.m23],
            [self.tx, self.ty, self.m33],
        ]
    }

    /// Transforms a point. For a projective transform this performs the
    /// homogeneous divide by `w = x*m13 + y*m23 + m33`.
    #[must_use]
    pub fn transform_point(&self, p: PointD) -> PointD {
        let x = p.x * self.sx + p.y * self.shx + self.tx;
        let y = p.x * self.shy + p.y * self.sy + self.ty;
        if self.kind == TransformType::Projective {
            let w = p.x * self.m13 + p.y * self.m23 + self.m33;
            let inv_w = if w != 0.0 { 1.0 / w } else { 1.0 };
            PointD::new(x * inv_w, y * inv_w)
        } else {
            PointD::new(x, y)
        }
    }

    /// Determinant of the 2x2 linear part (ignores translation and the
    /// projective row). Used by [`Self::invert`] and to detect degeneracy.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }

    /// Inverts the transform, following the affine case (ignoring any
    /// projective row) since the engine only needs inverses for classifying
    /// fetch direction, never for rendering a fully projective inverse scene.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::NotInvertible`] when the determinant is zero
    /// within [`crate::TRANSFORM_TYPE_EPSILON`].
    pub fn invert(&self) -> Result<Self, GeomError> {
        let det = self.determinant();
        if det.abs() < TRANSFORM_TYPE_EPSILON {
            return Err(GeomError::NotInvertible);
        }
        let inv_det = 1.0 / det;
        let sx = self.sy * inv_det;
        let shy = -self.shy * inv_det;
        let shx = -self.shx * inv_det;
        let sy = self.sx * inv_det;
        let tx = -(self.tx * sx + self.ty * shx);
        let ty = -(self.tx * shy + self.ty * sy);
        Ok(Self::from_affine(sx, shy, shx, sy, tx, ty))
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_classification() {
        assert_eq!(Transform::identity().kind(), TransformType::Identity);
    }

    #[test]
    fn translation_classification_and_apply() {
        let t = Transform::translation(5.0, -3.0);
        assert_eq!(t.kind(), TransformType::Translate);
        assert_eq!(t.transform_point(PointD::new(1.0, 1.0)), PointD::new(6.0, -2.0));
    }

    #[test]
    fn scale_classification() {
        assert_eq!(Transform::scale(2.0, 3.0).kind(), TransformType::Scale);
    }

    #[test]
    fn rotate_classification() {
        let t = Transform::rotation(std::f64::consts::FRAC_PI_4);
        assert_eq!(t.kind(), TransformType::Rotate);
    }

    #[test]
    fn invert_round_trip_within_tolerance() {
        let t = Transform::translation(3.0, 4.0)
            .then(&Transform::rotation(0.7))
            .then(&Transform::scale(1.5, 0.8));
        let inv = t.invert().expect("invertible");
        let round = t.then(&inv);
        assert!((round.sx - 1.0).abs() < 1e-9);
        assert!((round.sy - 1.0).abs() < 1e-9);
        assert!(round.tx.abs() < 1e-9);
        assert!(round.ty.abs() < 1e-9);
    }

    #[test]
    fn degenerate_scale_is_not_invertible() {
        let t = Transform::scale(0.0, 1.0);
        assert_eq!(t.invert(), Err(GeomError::NotInvertible));
    }

    #[test]
    fn projective_classification_and_divide() {
        let t = Transform::from_projective(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        // m33 == 1, all other projective terms zero -> should classify as Identity
        assert_eq!(t.kind(), TransformType::Identity);

        let t = Transform::from_projective(1.0, 0.0, 0.01, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(t.kind(), TransformType::Projective);
        let p = t.transform_point(PointD::new(10.0, 0.0));
        let expected_w = 10.0_f64.mul_add(0.01, 1.0);
        assert!((p.x - 10.0 / expected_w).abs() < 1e-12);
    }
}
