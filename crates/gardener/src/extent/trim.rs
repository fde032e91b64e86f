//! Trim the transition set into arcs.
//!
//! Transitions are sorted by phase around the hull centroid starting at gap
//! 0's Entry. Coincident transitions (the pencil on the line of two edges at
//! once, e.g. collinear-adjacent edges or the two-pin case) collapse into one
//! junction. Between consecutive junctions the facing gaps are exactly those
//! whose `(entry, exit)` window contains the arc's mid-phase.

use std::cmp::Ordering;
use std::f64::consts::TAU;

use tracing::debug;

use super::types::{in_window, GapExtent, Transition};
use crate::budget::span_string_sum;
use crate::curve::ArcSegment;
use crate::error::CurveError;
use crate::geom::util::phase;
use crate::geom::{CurveCfg, Point};
use crate::hull::ActiveHull;

#[derive(Clone, Copy, Debug)]
struct Junction {
    point: Point,
    phase: f64,
}

/// Arcs in CCW order; arc 0 starts at gap 0's Entry.
pub fn trim_arcs(
    hull: &ActiveHull,
    extents: &[GapExtent],
    cfg: &CurveCfg,
) -> Result<Vec<ArcSegment>, CurveError> {
    let n = hull.len();
    let Some(first) = extents.first() else {
        return Ok(Vec::new());
    };
    let slack = first.budget.slack();
    let origin = first.entry.polar;

    let mut events: Vec<&Transition> = extents.iter().flat_map(|e| [&e.entry, &e.exit]).collect();
    events.sort_by(|a, b| {
        phase(a.polar, origin)
            .partial_cmp(&phase(b.polar, origin))
            .unwrap_or(Ordering::Equal)
            .then(a.gap.cmp(&b.gap))
            .then(a.kind.cmp(&b.kind))
    });

    // Distinct junctions near a vertex are O(slack) apart.
    let merge = cfg.eps_junction * slack;
    let mut junctions: Vec<Junction> = Vec::with_capacity(events.len());
    for t in events {
        if let Some(last) = junctions.last() {
            if (last.point - t.point).norm() <= merge {
                continue;
            }
        }
        junctions.push(Junction {
            point: t.point,
            phase: phase(t.polar, origin),
        });
    }
    while junctions.len() > 1 {
        let (head, tail) = (junctions[0], junctions[junctions.len() - 1]);
        if (tail.point - head.point).norm() > merge {
            break;
        }
        junctions.pop();
    }

    let windows: Vec<(f64, f64)> = extents.iter().map(|e| e.window(origin)).collect();
    let m = junctions.len();
    let mut arcs = Vec::with_capacity(m);
    for k in 0..m {
        let start = junctions[k];
        let end = junctions[(k + 1) % m];
        let end_phase = if k + 1 == m { TAU } else { end.phase };
        let mid = 0.5 * (start.phase + end_phase);
        let visible: Vec<usize> = (0..extents.len())
            .filter(|&i| in_window(windows[i], mid))
            .map(|i| extents[i].budget.gap.index)
            .collect();
        let (first_gap, gap_count) = contiguous_run(&visible, n)
            .ok_or_else(|| CurveError::InconsistentTransitions {
                arc: k,
                visible: visible.clone(),
            })?;
        let string_sum = span_string_sum(hull, slack, first_gap, gap_count);
        arcs.push(ArcSegment::new(
            first_gap,
            gap_count,
            hull.vertex(first_gap),
            hull.vertex(first_gap + gap_count),
            string_sum,
            start.point,
            end.point,
            cfg,
        ));
    }
    debug!(
        junctions = m,
        arcs = arcs.len(),
        own = arcs.iter().filter(|a| a.gap_count == 1).count(),
        "arcs trimmed"
    );
    Ok(arcs)
}

/// `(first, count)` if `visible` is one cyclic run of `1 ..= n-1` gaps.
fn contiguous_run(visible: &[usize], n: usize) -> Option<(usize, usize)> {
    if visible.is_empty() || visible.len() >= n {
        return None;
    }
    let mut set = vec![false; n];
    for &i in visible {
        *set.get_mut(i)? = true;
    }
    let first = (0..n).find(|&i| set[i] && !set[(i + n - 1) % n])?;
    let count = visible.len();
    (0..count)
        .all(|k| set[(first + k) % n])
        .then_some((first, count))
}

#[cfg(test)]
mod tests {
    use super::contiguous_run;

    #[test]
    fn runs_wrap_and_reject_gaps() {
        assert_eq!(contiguous_run(&[1], 4), Some((1, 1)));
        assert_eq!(contiguous_run(&[0, 3], 4), Some((3, 2)));
        assert_eq!(contiguous_run(&[0, 1, 2], 4), Some((0, 3)));
        assert_eq!(contiguous_run(&[0, 2], 4), None);
        assert_eq!(contiguous_run(&[], 4), None);
        assert_eq!(contiguous_run(&[0, 1, 2, 3], 4), None);
        assert_eq!(contiguous_run(&[1], 2), Some((1, 1)));
    }
}
