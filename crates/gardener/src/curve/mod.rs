//! The assembled closed curve and its queries.
//!
//! Purpose
//! - Hold the cyclic sequence of elliptic arcs traced by the pencil, verified
//!   for continuity and loop-length conservation, plus a cumulative
//!   arc-length table for parametrization by length.
//! - Answer point queries by polar angle (around the hull centroid) and by
//!   arc length, and report perimeter, area and curvature.
//!
//! Why this design
//! - Every arc carries its own ellipse frame, so queries never revisit the
//!   root finding: angle queries intersect a ray with one ellipse in closed
//!   form, length queries invert a Simpson integral on one arc.
//! - A `Curve` is immutable once built; concurrent readers need no locking.
//!
//! Code cross-refs: `extent::trim_arcs`, `build::build_curve`

mod arc;
mod assembly;
mod build;
mod sample;

pub use arc::{ArcSegment, Ellipse};
pub use assembly::assemble;
pub use build::{build_curve, build_curve_from_foci, build_curve_on_hull, build_curve_with_slack};
pub use sample::Sample;

use crate::geom::{CurveCfg, Point};
use crate::hull::ActiveHull;

/// Closed convex C¹ curve traced by the pencil.
///
/// Invariants:
/// - Arcs are CCW and cyclic: arc `k` ends where arc `k + 1` starts, with a
///   matching tangent.
/// - Every point has taut loop length `loop_length` (checked at build time).
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    hull: ActiveHull,
    loop_length: f64,
    slack: f64,
    center: Point,
    /// Polar angle of arc 0's start around `center`.
    origin: f64,
    arcs: Vec<ArcSegment>,
    /// Start phase of each arc relative to `origin` (ascending, first is 0).
    phases: Vec<f64>,
    /// Prefix sums of arc lengths (`arcs.len() + 1` entries).
    cumulative: Vec<f64>,
    cfg: CurveCfg,
}

impl Curve {
    #[inline]
    pub fn hull(&self) -> &ActiveHull {
        &self.hull
    }

    #[inline]
    pub fn arcs(&self) -> &[ArcSegment] {
        &self.arcs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Requested loop length `L`.
    #[inline]
    pub fn loop_length(&self) -> f64 {
        self.loop_length
    }

    /// `L − P`.
    #[inline]
    pub fn slack(&self) -> f64 {
        self.slack
    }

    /// Reference point for polar queries (hull vertex centroid).
    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn cfg(&self) -> &CurveCfg {
        &self.cfg
    }

    /// Traced perimeter: the sum of arc lengths (not the loop length).
    #[inline]
    pub fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Arc length from arc 0's start to the start of arc `k`.
    #[inline]
    pub fn arc_offset(&self, k: usize) -> f64 {
        self.cumulative[k.min(self.arcs.len())]
    }

    /// The arc traced on gap `gap`'s own ellipse, if the loop ever touches
    /// exactly that pair of foci.
    pub fn own_arc(&self, gap: usize) -> Option<&ArcSegment> {
        self.arcs
            .iter()
            .find(|a| a.is_own_arc() && a.first_gap == gap)
    }
}

#[cfg(test)]
mod tests;
