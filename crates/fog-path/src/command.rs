//! Path vertex commands.

use fog_geom::PointD;

/// The command tag of a [`PathVertex`], used for invariant checks and
/// introspection without matching the full vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathCommand {
    /// Starts a new subpath.
    MoveTo,
    /// Draws a straight line.
    LineTo,
    /// Draws a quadratic Bézier.
    QuadTo,
    /// Draws a cubic Bézier.
    CubicTo,
    /// Closes the current subpath back to its `MoveTo` point.
    Close,
}

/// One vertex of a [`crate::Path`]: a command tag together with the points
/// it carries.
///
/// `spec.md` §3 describes paths abstractly as `(command, point)` pairs;
/// curves carry more than one point, so this enum stores each command's
/// full point set directly rather than splitting curves across several
/// same-tagged tuples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathVertex {
    /// Starts a new subpath at `to`.
    MoveTo(PointD),
    /// Draws a straight line to `to`.
    LineTo(PointD),
    /// Draws a quadratic Bézier through control point `ctrl` to `to`.
    QuadTo { ctrl: PointD, to: PointD },
    /// Draws a cubic Bézier through `ctrl1`, `ctrl2` to `to`.
    CubicTo {
        ctrl1: PointD,
        ctrl2: PointD,
        to: PointD,
    },
    /// Closes the current subpath.
    Close,
}

impl PathVertex {
    /// This vertex's command tag.
    #[must_use]
    pub fn command(&self) -> PathCommand {
        match self {
            Self::MoveTo(_) => PathCommand::MoveTo,
            Self::LineTo(_) => PathCommand::LineTo,
            Self::QuadTo { .. } => PathCommand::QuadTo,
            Self::CubicTo { .. } => PathCommand::CubicTo,
            Self::Close => PathCommand::Close,
        }
    }

    /// The vertex's on-curve endpoint, if any (`Close` has none — it
    /// returns to the subpath's `MoveTo` point instead).
    #[must_use]
    pub fn endpoint(&self) -> Option<PointD> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => Some(p),
            Self::QuadTo { to, .. } | Self::CubicTo { to, .. } => Some(to),
            Self::Close => None,
        }
    }
}
