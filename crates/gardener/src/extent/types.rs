//! Transition and extent records produced by the solver.

use crate::budget::GapBudget;
use crate::geom::util::phase;
use crate::geom::Point;

/// Which side of a gap's visibility window a transition closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransitionKind {
    /// Edge `i` starts facing the pencil (pencil on the ray beyond `v_i`).
    Entry,
    /// Edge `i` stops facing the pencil (pencil on the ray beyond `v_{i+1}`).
    Exit,
}

/// A curve point on the line of a gap's edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub gap: usize,
    pub kind: TransitionKind,
    pub point: Point,
    /// Distance from the pivot vertex along the ray.
    pub ray_param: f64,
    /// Polar angle around the hull centroid, in (-π, π].
    pub polar: f64,
    pub iterations: usize,
}

/// A gap budget plus the window during which that gap faces the pencil.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GapExtent {
    pub budget: GapBudget,
    pub entry: Transition,
    pub exit: Transition,
}

impl GapExtent {
    /// Window `(entry, exit)` as phases in [0, 2π) relative to `origin`.
    #[inline]
    pub fn window(&self, origin: f64) -> (f64, f64) {
        (phase(self.entry.polar, origin), phase(self.exit.polar, origin))
    }

    /// Angular extent of the window (radians around the hull centroid).
    #[inline]
    pub fn angular_extent(&self) -> f64 {
        phase(self.exit.polar, self.entry.polar)
    }
}

/// Open cyclic interval test on phases.
#[inline]
pub(crate) fn in_window((s, e): (f64, f64), x: f64) -> bool {
    if s <= e {
        s < x && x < e
    } else {
        x > s || x < e
    }
}
