//! End-to-end construction: foci + loop length → verified curve.

use tracing::info_span;

use super::assembly::assemble;
use super::Curve;
use crate::budget::solve_budgets;
use crate::error::CurveError;
use crate::extent::{solve_extents, trim_arcs};
use crate::geom::{CurveCfg, Focus, Point};
use crate::hull::{filter_hull, ActiveHull};

/// Build the curve traced by a loop of length `loop_length` around `foci`.
///
/// Foci keep their position in `foci` as `Focus::index`.
pub fn build_curve(foci: &[Point], loop_length: f64, cfg: &CurveCfg) -> Result<Curve, CurveError> {
    build_curve_from_foci(&Focus::from_points(foci), loop_length, cfg)
}

/// Same as [`build_curve`] for pre-tagged foci.
pub fn build_curve_from_foci(
    foci: &[Focus],
    loop_length: f64,
    cfg: &CurveCfg,
) -> Result<Curve, CurveError> {
    let hull = filter_hull(foci, cfg)?;
    build_curve_on_hull(&hull, loop_length, cfg)
}

/// Build with the loop length given as slack over the hull perimeter.
pub fn build_curve_with_slack(foci: &[Point], slack: f64, cfg: &CurveCfg) -> Result<Curve, CurveError> {
    let hull = filter_hull(&Focus::from_points(foci), cfg)?;
    build_curve_on_hull(&hull, hull.perimeter() + slack, cfg)
}

/// Pipeline stages after hull filtering (budgets, extents, trimming, assembly).
pub fn build_curve_on_hull(
    hull: &ActiveHull,
    loop_length: f64,
    cfg: &CurveCfg,
) -> Result<Curve, CurveError> {
    let _span = info_span!("build_curve", foci = hull.len(), loop_length).entered();
    let budgets = solve_budgets(hull, loop_length)?;
    let extents = solve_extents(hull, &budgets, cfg)?;
    let arcs = trim_arcs(hull, &extents, cfg)?;
    assemble(hull, loop_length, arcs, cfg)
}
