//! Multi-focal "gardener's" curves.
//!
//! A closed loop of string of length `L` is laid around a set of pins (foci)
//! and pulled taut by a pencil. As the pencil goes around, the loop wraps the
//! convex hull of the pins and the pencil traces a closed convex curve made
//! of elliptic arcs: wherever the same run of hull edges faces the pencil,
//! the two free string segments have constant total length, so the pencil is
//! on an ellipse whose foci are the ends of that run.
//!
//! Pipeline
//! - `hull`: filter the foci to the active hull (CCW, collinearity policy).
//! - `budget`: per-gap string sums `S + e_i` from the slack `S = L − P`.
//! - `extent`: transitions where the pencil crosses each edge line; trim
//!   into arcs.
//! - `curve`: fuse, verify (continuity, loop-length conservation) and
//!   query the closed curve.
//! - `sweep`: many loop lengths over one hull.
//!
//! The crate is pure and deterministic: no I/O, no global state. Stages emit
//! `tracing` events at `debug` level; install a subscriber to see them.

pub mod api;
pub mod budget;
pub mod curve;
pub mod error;
pub mod extent;
pub mod geom;
pub mod hull;
pub mod sweep;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use curve::{build_curve, build_curve_with_slack, Curve, Sample};
pub use error::CurveError;
pub use geom::{CurveCfg, Point};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::curve::{build_curve, build_curve_with_slack, ArcSegment, Curve, Ellipse, Sample};
    pub use crate::error::CurveError;
    pub use crate::geom::rand::{draw_foci, FociCfg, FocusCount, ReplayToken};
    pub use crate::geom::{CurveCfg, Focus, Point};
    pub use crate::sweep::{build_curves, LoopSpec};
    pub use nalgebra::Vector2 as Vec2;
}
