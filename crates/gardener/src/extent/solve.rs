//! Transition search: one bracketed root per (gap, kind).

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use super::types::{GapExtent, Transition, TransitionKind};
use crate::budget::GapBudget;
use crate::error::CurveError;
use crate::geom::util::polar;
use crate::geom::{bisect, CurveCfg, Point, RootError};
use crate::hull::ActiveHull;

/// Entry and Exit transitions for every gap, in gap order.
///
/// The loop length is recovered from the budgets (`slack + P`), so every
/// budget must come from the same `solve_budgets` call. The first failing gap
/// (in gap order) is reported.
pub fn solve_extents(
    hull: &ActiveHull,
    budgets: &[GapBudget],
    cfg: &CurveCfg,
) -> Result<Vec<GapExtent>, CurveError> {
    let Some(first) = budgets.first() else {
        return Ok(Vec::new());
    };
    let loop_length = first.slack() + hull.perimeter();
    let center = hull.centroid();

    #[cfg(feature = "parallel")]
    let results: Vec<Result<GapExtent, CurveError>> = budgets
        .par_iter()
        .map(|b| solve_gap(hull, b, loop_length, center, cfg))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<GapExtent, CurveError>> = budgets
        .iter()
        .map(|b| solve_gap(hull, b, loop_length, center, cfg))
        .collect();

    let extents = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    debug!(
        gaps = extents.len(),
        iterations = extents
            .iter()
            .map(|e| e.entry.iterations + e.exit.iterations)
            .sum::<usize>(),
        "transitions solved"
    );
    Ok(extents)
}

fn solve_gap(
    hull: &ActiveHull,
    budget: &GapBudget,
    loop_length: f64,
    center: Point,
    cfg: &CurveCfg,
) -> Result<GapExtent, CurveError> {
    let gap = budget.gap;
    let dir = (gap.to.p - gap.from.p) / gap.length;
    let entry = find_transition(
        hull,
        gap.index,
        TransitionKind::Entry,
        gap.from.p,
        -dir,
        loop_length,
        center,
        cfg,
    )?;
    let exit = find_transition(
        hull,
        gap.index,
        TransitionKind::Exit,
        gap.to.p,
        dir,
        loop_length,
        center,
        cfg,
    )?;
    trace!(
        gap = gap.index,
        entry_t = entry.ray_param,
        exit_t = exit.ray_param,
        "gap extent"
    );
    Ok(GapExtent {
        budget: *budget,
        entry,
        exit,
    })
}

/// Root of `taut_loop_length(pivot + t·dir) = L` on `t ∈ [0, L]`.
#[allow(clippy::too_many_arguments)]
fn find_transition(
    hull: &ActiveHull,
    gap: usize,
    kind: TransitionKind,
    pivot: Point,
    dir: Point,
    loop_length: f64,
    center: Point,
    cfg: &CurveCfg,
) -> Result<Transition, CurveError> {
    let f = |t: f64| hull.taut_loop_length(pivot + dir * t) - loop_length;
    let tol = cfg.transition_tolerance(loop_length - hull.perimeter());
    let root = bisect(f, 0.0, loop_length, tol, cfg.max_iterations).map_err(
        |err| {
            let (iterations, bracket) = match err {
                RootError::NoSignChange { .. } => (0, (0.0, loop_length)),
                RootError::MaxIterations { bracket, .. } => (cfg.max_iterations, bracket),
            };
            CurveError::NonConvergentTransition {
                gap,
                kind,
                iterations,
                bracket,
            }
        },
    )?;
    let point = pivot + dir * root.x;
    Ok(Transition {
        gap,
        kind,
        point,
        ray_param: root.x,
        polar: polar(center, point),
        iterations: root.iterations,
    })
}
