//! End-to-end curve construction and queries.

use super::*;
use crate::error::CurveError;
use crate::geom::rand::{draw_foci, FociCfg, FocusCount, ReplayToken};
use crate::geom::util::{cross2, polar};
use crate::geom::{hull_perimeter_with, CurveCfg, Focus, Point};
use crate::hull::filter_hull;
use nalgebra::vector;
use proptest::prelude::*;
use std::f64::consts::{PI, TAU};

fn triangle() -> Vec<Point> {
    vec![vector![0.0, 0.0], vector![4.0, 0.0], vector![2.0, 3.0]]
}

fn square() -> Vec<Point> {
    vec![
        vector![0.0, 0.0],
        vector![4.0, 0.0],
        vector![4.0, 4.0],
        vector![0.0, 4.0],
    ]
}

fn assert_conserves(curve: &Curve, samples: &[Sample], tol: f64) {
    let pins = curve.hull().points();
    for s in samples {
        let measured = hull_perimeter_with(&pins, s.point);
        assert!(
            (measured - curve.loop_length()).abs() < tol,
            "loop {measured} at {:?}",
            s.point
        );
    }
}

#[test]
fn triangle_loop_of_twenty() {
    let cfg = CurveCfg::default();
    let curve = build_curve(&triangle(), 20.0, &cfg).unwrap();
    let perimeter = 4.0 + 2.0 * 13f64.sqrt();
    assert!((curve.slack() - (20.0 - perimeter)).abs() < 1e-12);
    assert_eq!(curve.len(), 6);
    for gap in 0..3 {
        let own = curve.own_arc(gap).expect("every gap has its own arc");
        assert!((own.string_sum - (curve.slack() + curve.hull().edge_length(gap))).abs() < 1e-12);
    }
    let samples = curve.sample_uniform(400);
    assert_conserves(&curve, &samples, 1e-7);
    assert!(curve.total_length() > perimeter);
    assert!(curve.area() > curve.hull().area());
}

#[test]
fn total_length_matches_dense_polyline() {
    let curve = build_curve(&triangle(), 20.0, &CurveCfg::default()).unwrap();
    let pts: Vec<Point> = curve.sample_angles(0.0, 4000).iter().map(|s| s.point).collect();
    let poly: f64 = (0..pts.len())
        .map(|k| (pts[(k + 1) % pts.len()] - pts[k]).norm())
        .sum();
    assert!((poly - curve.total_length()).abs() / curve.total_length() < 1e-4);
}

#[test]
fn short_loop_is_rejected() {
    match build_curve(&triangle(), 10.0, &CurveCfg::default()) {
        Err(CurveError::InsufficientSlack {
            loop_length,
            perimeter,
        }) => {
            assert_eq!(loop_length, 10.0);
            assert!((perimeter - 11.2111).abs() < 1e-4);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn coincident_foci_are_degenerate() {
    let pts = vec![vector![1.0, 1.0]; 3];
    assert!(matches!(
        build_curve(&pts, 5.0, &CurveCfg::default()),
        Err(CurveError::DegenerateInput { .. })
    ));
}

#[test]
fn two_foci_trace_one_ellipse() {
    let pts = vec![vector![-1.0, 0.0], vector![1.0, 0.0]];
    let curve = build_curve(&pts, 8.0, &CurveCfg::default()).unwrap();
    assert_eq!(curve.len(), 1);
    let arc = &curve.arcs()[0];
    assert!((arc.extent() - TAU).abs() < 1e-9);
    // string sum L − d = 6: a = 3, c = 1, b = sqrt(8)
    assert!((arc.ellipse.semi_major - 3.0).abs() < 1e-12);
    for s in curve.sample_uniform(64) {
        let sum = (s.point - pts[0]).norm() + (s.point - pts[1]).norm();
        assert!((sum - 6.0).abs() < 1e-9);
    }
    assert!((curve.area() - PI * 3.0 * 8f64.sqrt()).abs() < 1e-9);
}

#[test]
fn samples_by_angle_lie_on_their_rays() {
    let curve = build_curve(&square(), 24.0, &CurveCfg::default()).unwrap();
    let c = curve.center();
    for k in 0..360 {
        let phi = -PI + (k as f64) * TAU / 360.0 + 1e-3;
        let s = curve.sample_by_angle(phi);
        let got = polar(c, s.point);
        let diff = (got - phi + PI).rem_euclid(TAU) - PI;
        assert!(diff.abs() < 1e-7, "phi {phi} got {got}");
        // wrapping the query angle does not move the point
        let again = curve.sample_by_angle(phi + 2.0 * TAU);
        assert!((again.point - s.point).norm() < 1e-9);
    }
    assert_conserves(&curve, &curve.sample_angles(0.3, 97), 1e-7);
}

#[test]
fn curve_is_convex_and_c1() {
    let curve = build_curve(&triangle(), 16.0, &CurveCfg::default()).unwrap();
    let samples = curve.sample_uniform(720);
    for k in 0..samples.len() {
        let (a, b) = (samples[k], samples[(k + 1) % samples.len()]);
        assert!(cross2(a.tangent, b.tangent) >= -1e-12);
        assert!(curve.curvature(&a) > 0.0);
        assert!((a.tangent.norm() - 1.0).abs() < 1e-12);
        // outward normal points away from the center
        assert!(a.normal().dot(&(a.point - curve.center())) > 0.0);
    }
    let arcs = curve.arcs();
    for k in 0..arcs.len() {
        let next = &arcs[(k + 1) % arcs.len()];
        let t0 = arcs[k].tangent_at(arcs[k].theta_end);
        let t1 = next.tangent_at(next.theta_start);
        assert!((t0 - t1).norm() < 1e-6);
    }
}

fn assert_junctions_c1(curve: &Curve, tol: f64) {
    let arcs = curve.arcs();
    for k in 0..arcs.len() {
        let next = &arcs[(k + 1) % arcs.len()];
        let turn = cross2(arcs[k].end_tangent(), next.start_tangent()).abs();
        assert!(turn < tol, "junction {k}: turn {turn}");
    }
}

#[test]
fn tiny_slack_keeps_every_corner_arc() {
    let cfg = CurveCfg::default();
    for slack in [1e-7, 1e-6, 1e-5, 1e-4] {
        for pts in [square(), triangle()] {
            let curve = build_curve_with_slack(&pts, slack, &cfg)
                .unwrap_or_else(|e| panic!("slack {slack}, {} pins: {e}", pts.len()));
            let n = pts.len();
            assert_eq!(curve.len(), 2 * n);
            assert_eq!(curve.arcs().iter().filter(|a| a.is_own_arc()).count(), n);
            assert_eq!(curve.arcs().iter().filter(|a| a.gap_count == 2).count(), n);
            assert_junctions_c1(&curve, 1e-6);
            assert_conserves(&curve, &curve.sample_uniform(64), 1e-7);
            assert!(curve.area() > curve.hull().area());
        }
    }
}

#[test]
fn thin_own_ellipses_meet_corner_arcs_smoothly() {
    // own ellipses have semi-minor ~ 5e-3 here; junctions sit near their major vertices
    let curve = build_curve_with_slack(&triangle(), 1e-5, &CurveCfg::default()).unwrap();
    assert_junctions_c1(&curve, 1e-8);
    for arc in curve.arcs() {
        assert!((arc.start_point() - arc.junctions.0).norm() < 1e-9);
        assert!((arc.end_point() - arc.junctions.1).norm() < 1e-9);
    }
}

#[test]
fn non_finite_queries_fall_back_to_the_start() {
    let curve = build_curve(&square(), 20.0, &CurveCfg::default()).unwrap();
    let start = curve.arcs()[0].start_point();
    for q in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let by_angle = curve.sample_by_angle(q);
        let by_length = curve.sample_by_arc_length(q);
        assert_eq!(by_angle.arc, 0);
        assert_eq!(by_length.arc, 0);
        assert!((by_angle.point - start).norm() < 1e-12);
        assert!((by_length.point - start).norm() < 1e-12);
    }
}

#[test]
fn longer_loops_enclose_shorter_ones() {
    let cfg = CurveCfg::default();
    let curves: Vec<Curve> = [13.0, 16.0, 20.0, 30.0]
        .iter()
        .map(|&l| build_curve(&triangle(), l, &cfg).unwrap())
        .collect();
    for w in curves.windows(2) {
        assert!(w[1].area() > w[0].area());
        assert!(w[1].total_length() > w[0].total_length());
        for k in 0..32 {
            let phi = (k as f64) * TAU / 32.0;
            let r0 = (w[0].sample_by_angle(phi).point - w[0].center()).norm();
            let r1 = (w[1].sample_by_angle(phi).point - w[1].center()).norm();
            assert!(r1 > r0);
        }
    }
}

#[test]
fn construction_is_deterministic() {
    let cfg = CurveCfg::default();
    let a = build_curve(&square(), 21.0, &cfg).unwrap();
    let b = build_curve(&square(), 21.0, &cfg).unwrap();
    assert_eq!(a, b);
    let slack = build_curve_with_slack(&square(), 5.0, &cfg).unwrap();
    assert_eq!(a, slack);
}

#[test]
fn arc_length_queries_wrap_and_invert() {
    let curve = build_curve(&square(), 20.0, &CurveCfg::default()).unwrap();
    let total = curve.total_length();
    for &s in &[0.0, 1.3, 7.7, total * 0.5, total - 1e-6] {
        let p = curve.sample_by_arc_length(s);
        let wrapped = curve.sample_by_arc_length(s + total);
        let negative = curve.sample_by_arc_length(s - 3.0 * total);
        assert!((p.point - wrapped.point).norm() < 1e-8);
        assert!((p.point - negative.point).norm() < 1e-8);
        assert!((curve.arc_length_at(&p) - s).abs() < 1e-7);
    }
    let first = curve.sample_by_arc_length(0.0);
    assert_eq!(first.arc, 0);
    assert!((first.point - curve.arcs()[0].start_point()).norm() < 1e-12);
}

#[test]
fn interior_foci_do_not_change_the_curve() {
    let cfg = CurveCfg::default();
    let mut pts = square();
    let bare = build_curve(&pts, 22.0, &cfg).unwrap();
    pts.push(vector![2.0, 2.0]);
    pts.push(vector![1.0, 3.0]);
    let cluttered = build_curve(&pts, 22.0, &cfg).unwrap();
    assert_eq!(bare.len(), cluttered.len());
    assert!((bare.total_length() - cluttered.total_length()).abs() < 1e-12);
    assert!((bare.area() - cluttered.area()).abs() < 1e-12);
}

#[test]
fn nearly_collinear_focus_is_kept_under_tight_tolerance() {
    let mut pts = square();
    pts.push(vector![2.0, -1e-4]);
    let tight = CurveCfg::default().with_collinear(1e-6);
    let curve = build_curve(&pts, 20.0, &tight).unwrap();
    assert_eq!(curve.hull().len(), 5);
    assert_conserves(&curve, &curve.sample_uniform(200), 1e-7);
    let loose = CurveCfg::default().with_collinear(1e-3);
    assert_eq!(build_curve(&pts, 20.0, &loose).unwrap().hull().len(), 4);
}

#[test]
fn verification_failures_surface_as_typed_errors() {
    let strict_tangent = CurveCfg {
        eps_tangent: -1.0,
        ..CurveCfg::default()
    };
    assert!(matches!(
        build_curve(&triangle(), 20.0, &strict_tangent),
        Err(CurveError::JunctionMismatch { .. })
    ));
    let strict_length = CurveCfg {
        eps_length: -1.0,
        ..CurveCfg::default()
    };
    match build_curve(&triangle(), 20.0, &strict_length) {
        Err(CurveError::CurveLengthMismatch { expected, arc, .. }) => {
            assert_eq!(expected, 20.0);
            assert_eq!(arc, 0);
        }
        other => panic!("unexpected {other:?}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_clouds_conserve_loop_length(seed in 0u64..10_000, log_ratio in -7.0f64..0.5) {
        let cfg = FociCfg {
            outer: FocusCount::Uniform { min: 3, max: 9 },
            interior: 3,
            ..FociCfg::default()
        };
        let foci = draw_foci(cfg, ReplayToken { seed, index: 0 });
        let curve_cfg = CurveCfg::default();
        // slack log-uniform in [1e-7, 3]·P
        let perimeter = filter_hull(&Focus::from_points(&foci), &curve_cfg).unwrap().perimeter();
        let slack = perimeter * 10f64.powf(log_ratio);
        let curve = build_curve_with_slack(&foci, slack, &curve_cfg).unwrap();
        prop_assert!(curve.len() >= curve.hull().len());
        let arcs = curve.arcs();
        for k in 0..arcs.len() {
            let next = &arcs[(k + 1) % arcs.len()];
            prop_assert!((arcs[k].end_tangent() - next.start_tangent()).norm() < 1e-6);
        }
        let pins = curve.hull().points();
        for s in curve.sample_uniform(48) {
            let measured = hull_perimeter_with(&pins, s.point);
            prop_assert!((measured - curve.loop_length()).abs() < 1e-6 * curve.loop_length());
        }
        prop_assert!(curve.area() > curve.hull().area());
    }
}
