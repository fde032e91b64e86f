//! Curated surface for callers (CLI, benches, examples).
//!
//! Everything here is a re-export; the modules stay the source of truth.

// construction
pub use crate::curve::{
    build_curve, build_curve_from_foci, build_curve_on_hull, build_curve_with_slack, ArcSegment,
    Curve, Ellipse, Sample,
};
pub use crate::error::CurveError;
pub use crate::sweep::{build_curves, slack_range, LoopSpec};
// stages
pub use crate::budget::{slack, solve_budgets, span_string_sum, GapBudget};
pub use crate::curve::assemble;
pub use crate::extent::{solve_extents, trim_arcs, GapExtent, Transition, TransitionKind};
pub use crate::hull::{filter_hull, ActiveHull, Facing, Gap};
// geometry and sampling of inputs
pub use crate::geom::rand::{draw_foci, recenter_rescale, FociCfg, FocusCount, ReplayToken};
pub use crate::geom::{CurveCfg, Focus, Point};
