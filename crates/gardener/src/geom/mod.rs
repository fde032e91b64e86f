//! Plain 2D geometry and 1D numerics shared by the curve stages.
//!
//! Purpose
//! - Keep the primitive pieces (types, tolerances, hull predicates, root
//!   finding, quadrature) in one place so the construction modules read as
//!   straight-line geometry.
//!
//! Conventions
//! - Points are `nalgebra::Vector2<f64>`; polygons are CCW vertex lists.
//! - Every iterative routine has an explicit cap (see `solvers`).
//!
//! Code cross-refs: `hull`, `budget`, `extent`, `curve`

pub mod rand;
pub mod solvers;
mod types;
pub mod util;

pub use solvers::{adaptive_simpson, bisect, newton_bracketed, Root, RootError};
pub use types::{CurveCfg, Focus, Point};
pub use util::{convex_hull, hull_perimeter_with};
