//! Assemble trimmed arcs into a verified closed curve.

use tracing::{debug, warn};

use super::arc::ArcSegment;
use super::Curve;
use crate::budget;
use crate::error::CurveError;
use crate::geom::util::{cross2, phase, polar};
use crate::geom::{hull_perimeter_with, CurveCfg};
use crate::hull::ActiveHull;

/// Fuse, verify and index the arcs.
///
/// - Consecutive arcs on one ellipse are fused (two foci give one full ellipse).
/// - Each junction must match in position (`eps_junction · L`) and tangent
///   direction (`eps_tangent`).
/// - At every arc end and `length_probes` interior points the taut loop,
///   recomputed from scratch, must equal `L` to `eps_length` (relative).
pub fn assemble(
    hull: &ActiveHull,
    loop_length: f64,
    arcs: Vec<ArcSegment>,
    cfg: &CurveCfg,
) -> Result<Curve, CurveError> {
    let slack = budget::slack(hull, loop_length)?;
    let arcs = fuse_same_ellipse(arcs, cfg);
    if arcs.is_empty() {
        return Err(CurveError::InconsistentTransitions {
            arc: 0,
            visible: Vec::new(),
        });
    }
    check_junctions(&arcs, loop_length, cfg)?;
    check_loop_length(hull, &arcs, loop_length, cfg)?;

    let center = hull.centroid();
    let origin = polar(center, arcs[0].start_point());
    let phases: Vec<f64> = arcs
        .iter()
        .enumerate()
        .map(|(k, a)| {
            if k == 0 {
                0.0
            } else {
                phase(polar(center, a.start_point()), origin)
            }
        })
        .collect();
    let mut cumulative = Vec::with_capacity(arcs.len() + 1);
    let mut acc = 0.0;
    cumulative.push(acc);
    for a in &arcs {
        acc += a.length;
        cumulative.push(acc);
    }
    debug!(
        arcs = arcs.len(),
        total_length = acc,
        loop_length,
        "curve assembled"
    );
    Ok(Curve {
        hull: hull.clone(),
        loop_length,
        slack,
        center,
        origin,
        arcs,
        phases,
        cumulative,
        cfg: *cfg,
    })
}

fn fuse_same_ellipse(arcs: Vec<ArcSegment>, cfg: &CurveCfg) -> Vec<ArcSegment> {
    let mut out: Vec<ArcSegment> = Vec::with_capacity(arcs.len());
    for arc in arcs {
        if let Some(last) = out.last_mut() {
            if last.same_ellipse(&arc) {
                last.extend_by(&arc, cfg);
                continue;
            }
        }
        out.push(arc);
    }
    while out.len() > 1 {
        let k = out.len() - 1;
        if !out[k].same_ellipse(&out[0]) {
            break;
        }
        if let Some(mut tail) = out.pop() {
            tail.extend_by(&out[0], cfg);
            out[0] = tail;
        }
    }
    out
}

fn check_junctions(arcs: &[ArcSegment], loop_length: f64, cfg: &CurveCfg) -> Result<(), CurveError> {
    let m = arcs.len();
    for k in 0..m {
        let out = &arcs[k];
        let inc = &arcs[(k + 1) % m];
        let position_error = (out.end_point() - inc.start_point()).norm();
        let (t0, t1) = (out.end_tangent(), inc.start_tangent());
        let tangent_error = cross2(t0, t1).atan2(t0.dot(&t1)).abs();
        if position_error > cfg.eps_junction * loop_length || tangent_error > cfg.eps_tangent {
            warn!(junction = (k + 1) % m, position_error, tangent_error, "junction mismatch");
            return Err(CurveError::JunctionMismatch {
                junction: (k + 1) % m,
                position_error,
                tangent_error,
            });
        }
    }
    Ok(())
}

fn check_loop_length(
    hull: &ActiveHull,
    arcs: &[ArcSegment],
    loop_length: f64,
    cfg: &CurveCfg,
) -> Result<(), CurveError> {
    let pins = hull.points();
    let steps = cfg.length_probes + 1;
    for (k, arc) in arcs.iter().enumerate() {
        for j in 0..=steps {
            let theta = arc.theta_start + arc.extent() * (j as f64) / (steps as f64);
            let point = arc.point_at(theta);
            let measured = hull_perimeter_with(&pins, point);
            if (measured - loop_length).abs() > cfg.eps_length * loop_length {
                warn!(arc = k, measured, loop_length, "loop length not conserved");
                return Err(CurveError::CurveLengthMismatch {
                    expected: loop_length,
                    measured,
                    arc: k,
                    point,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Focus;
    use nalgebra::vector;

    #[test]
    fn split_full_ellipse_fuses_across_the_wrap() {
        let cfg = CurveCfg::default();
        let (f0, f1) = (Focus::new(0, vector![-1.0, 0.0]), Focus::new(1, vector![1.0, 0.0]));
        // three pieces of one ellipse, the last two wrapping back onto the first
        let e = super::super::Ellipse::from_foci(f0.p, f1.p, 4.0);
        let cuts = [0.3, 2.0, 4.0];
        let arcs: Vec<ArcSegment> = (0..3)
            .map(|k| {
                ArcSegment::new(
                    0,
                    1,
                    f0,
                    f1,
                    4.0,
                    e.point_at(cuts[k]),
                    e.point_at(cuts[(k + 1) % 3]),
                    &cfg,
                )
            })
            .collect();
        let fused = fuse_same_ellipse(arcs, &cfg);
        assert_eq!(fused.len(), 1);
        assert!((fused[0].extent() - std::f64::consts::TAU).abs() < 1e-12);
        assert_eq!(fused[0].junctions.1, e.point_at(cuts[0]));
    }

    #[test]
    fn broken_junction_is_reported() {
        let cfg = CurveCfg::default();
        let f = [
            Focus::new(0, vector![0.0, 0.0]),
            Focus::new(1, vector![2.0, 0.0]),
            Focus::new(2, vector![0.0, 2.0]),
        ];
        let a = ArcSegment::new(0, 1, f[0], f[1], 4.0, vector![1.0, -1.0], vector![3.0, 0.0], &cfg);
        let b = ArcSegment::new(1, 1, f[1], f[2], 5.0, vector![3.0, 1.0], vector![1.0, -1.0], &cfg);
        assert!(matches!(
            check_junctions(&[a, b], 10.0, &cfg),
            Err(CurveError::JunctionMismatch { .. })
        ));
    }
}
