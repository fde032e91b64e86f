//! Slack sweeps: many loop lengths around one focus set.
//!
//! The hull is filtered once; every loop length then runs the remaining
//! stages independently. With the `parallel` feature the builds run on
//! rayon; results come back in input order either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use crate::curve::{build_curve_on_hull, Curve};
use crate::error::CurveError;
use crate::geom::{CurveCfg, Focus, Point};
use crate::hull::{filter_hull, ActiveHull};

/// How one sweep entry fixes the loop length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoopSpec {
    /// Absolute loop length `L`.
    Length(f64),
    /// Slack over the hull perimeter (`L = P + slack`).
    Slack(f64),
}

impl LoopSpec {
    #[inline]
    pub fn loop_length(&self, hull: &ActiveHull) -> f64 {
        match *self {
            LoopSpec::Length(l) => l,
            LoopSpec::Slack(s) => hull.perimeter() + s,
        }
    }
}

/// One result per spec, in input order.
///
/// A hull failure is reported for every entry.
pub fn build_curves(
    foci: &[Point],
    specs: &[LoopSpec],
    cfg: &CurveCfg,
) -> Vec<Result<Curve, CurveError>> {
    let hull = match filter_hull(&Focus::from_points(foci), cfg) {
        Ok(hull) => hull,
        Err(err) => return specs.iter().map(|_| Err(err.clone())).collect(),
    };

    #[cfg(feature = "parallel")]
    let results: Vec<Result<Curve, CurveError>> = specs
        .par_iter()
        .map(|spec| build_curve_on_hull(&hull, spec.loop_length(&hull), cfg))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<Curve, CurveError>> = specs
        .iter()
        .map(|spec| build_curve_on_hull(&hull, spec.loop_length(&hull), cfg))
        .collect();

    info!(
        curves = results.len(),
        failed = results.iter().filter(|r| r.is_err()).count(),
        "sweep finished"
    );
    results
}

/// Evenly spaced slacks `lo ..= hi` (`count >= 2`; a single entry uses `lo`).
pub fn slack_range(lo: f64, hi: f64, count: usize) -> Vec<LoopSpec> {
    match count {
        0 => Vec::new(),
        1 => vec![LoopSpec::Slack(lo)],
        _ => (0..count)
            .map(|k| LoopSpec::Slack(lo + (hi - lo) * (k as f64) / ((count - 1) as f64)))
            .collect(),
    }
}
