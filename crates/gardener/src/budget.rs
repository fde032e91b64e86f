//! Per-gap string budgets.
//!
//! With the pencil facing gap `i`, the taut loop consists of the two straight
//! segments pencil→`v_i`, pencil→`v_{i+1}` plus the rest of the hull boundary
//! (`P − e_i`). The loop length is fixed, so the two segments share the budget
//!
//! ```text
//! stringSum(i) = L − (P − e_i) = S + e_i,   S = L − P (global slack)
//! ```
//!
//! which makes the pencil trace an ellipse with foci `v_i`, `v_{i+1}`. When a
//! longer run of edges faces the pencil the same argument gives `S + Σ e_j`
//! over the run (`span_string_sum`).

use tracing::debug;

use crate::error::CurveError;
use crate::hull::{ActiveHull, Gap};

/// A gap plus the constant sum of pencil-to-vertex distances on its ellipse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GapBudget {
    pub gap: Gap,
    pub string_sum: f64,
}

impl GapBudget {
    /// Slack shared by every gap (`string_sum − e_i`).
    #[inline]
    pub fn slack(&self) -> f64 {
        self.string_sum - self.gap.length
    }
}

/// Global slack `S = L − P`, validated.
pub fn slack(hull: &ActiveHull, loop_length: f64) -> Result<f64, CurveError> {
    if !(loop_length.is_finite() && loop_length > 0.0) {
        return Err(CurveError::InvalidLoopLength { loop_length });
    }
    let perimeter = hull.perimeter();
    if loop_length <= perimeter {
        return Err(CurveError::InsufficientSlack {
            loop_length,
            perimeter,
        });
    }
    Ok(loop_length - perimeter)
}

/// One budget per gap (n gaps; for two foci the single edge appears twice).
pub fn solve_budgets(hull: &ActiveHull, loop_length: f64) -> Result<Vec<GapBudget>, CurveError> {
    let s = slack(hull, loop_length)?;
    let budgets: Vec<GapBudget> = hull
        .gaps()
        .into_iter()
        .map(|gap| GapBudget {
            gap,
            string_sum: s + gap.length,
        })
        .collect();
    debug!(gaps = budgets.len(), slack = s, loop_length, "gap budgets");
    Ok(budgets)
}

/// Budget for the cyclic edge run `first .. first + count` facing the pencil.
#[inline]
pub fn span_string_sum(hull: &ActiveHull, slack: f64, first: usize, count: usize) -> f64 {
    slack + hull.run_length(first, count)
}
