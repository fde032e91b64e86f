//! Arc extents: where control passes from one focus pair to the next.
//!
//! Purpose
//! - For every gap, find the two transitions where the curve crosses the line
//!   of that gap's hull edge: `Entry` (the edge starts facing the pencil) and
//!   `Exit` (it stops). At both the pencil is collinear with the edge, which is
//!   exactly the hand-off condition between adjacent taut configurations.
//! - Order all transitions around the hull and trim the curve into arcs; each
//!   arc is a piece of the ellipse whose foci are the ends of the run of gaps
//!   facing the pencil there.
//!
//! Numerics
//! - Each transition is a 1D bracketed root of
//!   `taut_loop_length(pivot + t·dir) − L` on `t ∈ [0, L]`. The function is
//!   monotone (the hull only grows along the ray) and changes sign on the
//!   bracket (`P − L < 0` at the pivot, `≥ L` at the far end).
//! - Gaps are independent; the `parallel` feature solves them on rayon and
//!   joins in gap order.
//!
//! Code cross-refs: `hull::ActiveHull::taut_loop_length`, `geom::bisect`,
//! `curve::assemble`

mod solve;
mod trim;
mod types;

pub use solve::solve_extents;
pub use trim::trim_arcs;
pub use types::{GapExtent, Transition, TransitionKind};
