//! Basic 2D types and tolerances shared by every construction stage.
//!
//! - `Point`: plain `Vector2<f64>` value.
//! - `Focus`: a point tagged with its input index (provenance through hull filtering).
//! - `CurveCfg`: centralizes epsilons, iteration caps and probe counts.
//!
//! Code cross-refs: `hull::filter_hull`, `extent::solve_extents`, `curve::assemble`

use nalgebra::Vector2;

/// 2D coordinate (value type, no identity beyond position).
pub type Point = Vector2<f64>;

/// A pin position tagged with the index it had in the caller's input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Focus {
    pub index: usize,
    pub p: Point,
}

impl Focus {
    #[inline]
    pub fn new(index: usize, p: Point) -> Self {
        Self { index, p }
    }

    /// Tag raw points with their position in `points`.
    pub fn from_points(points: &[Point]) -> Vec<Focus> {
        points
            .iter()
            .enumerate()
            .map(|(index, &p)| Focus { index, p })
            .collect()
    }
}

/// Construction configuration (tolerances and caps).
///
/// Length-like tolerances are relative to the loop length unless noted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveCfg {
    /// Absolute distance below which two foci are the same pin.
    pub eps_dedup: f64,
    /// Absolute offset from the neighbour chord at or below which a hull
    /// vertex counts as collinear and is dropped.
    pub eps_collinear: f64,
    /// Requested absolute tolerance for transition roots (capped at 1e-9).
    pub eps_root: f64,
    /// Hard iteration cap for every bracketed root search.
    pub max_iterations: usize,
    /// Junction position tolerance. Relative to the loop length when checking
    /// continuity, relative to the slack when clustering coincident transitions.
    pub eps_junction: f64,
    /// Junction tangent tolerance (radians).
    pub eps_tangent: f64,
    /// Loop length conservation tolerance (relative).
    pub eps_length: f64,
    /// Adaptive quadrature tolerance (relative to arc scale).
    pub eps_quad: f64,
    /// Interior probes per arc for the loop length check.
    pub length_probes: usize,
}

impl Default for CurveCfg {
    fn default() -> Self {
        Self {
            eps_dedup: 1e-12,
            eps_collinear: 1e-9,
            eps_root: 1e-10,
            max_iterations: 200,
            eps_junction: 1e-7,
            eps_tangent: 1e-6,
            eps_length: 1e-6,
            eps_quad: 1e-12,
            length_probes: 4,
        }
    }
}

impl CurveCfg {
    /// Root tolerance actually used: never looser than 1e-9.
    #[inline]
    pub fn root_tolerance(&self) -> f64 {
        self.eps_root.min(1e-9)
    }

    /// Bisection tolerance for transitions at slack `slack`. Entry and Exit
    /// near a vertex sit about `slack/2` from it, so the tolerance follows.
    #[inline]
    pub fn transition_tolerance(&self, slack: f64) -> f64 {
        self.root_tolerance().min(1e-6 * slack)
    }

    #[inline]
    pub fn with_collinear(mut self, eps: f64) -> Self {
        self.eps_collinear = eps;
        self
    }
}
