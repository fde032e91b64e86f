//! Criterion benchmarks for curve construction and queries.
//! Outer focus counts: n in {2, 4, 8, 16, 32}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p gardener

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use gardener::api::{
    build_curve_with_slack, draw_foci, filter_hull, Curve, CurveCfg, FociCfg, Focus, FocusCount,
    ReplayToken,
};
use nalgebra::Vector2;

fn cloud(n: usize, token: ReplayToken) -> Vec<Vector2<f64>> {
    let cfg = FociCfg {
        outer: FocusCount::Fixed(n),
        interior: n / 2,
        ..FociCfg::default()
    };
    draw_foci(cfg, token)
}

fn bench_build(c: &mut Criterion) {
    let cfg = CurveCfg::default();
    let mut group = c.benchmark_group("curve");
    for &n in &[2usize, 4, 8, 16, 32] {
        group.bench_with_input(BenchmarkId::new("filter_hull", n), &n, |b, &n| {
            let mut token = ReplayToken { seed: 41, index: 0 };
            b.iter_batched(
                || {
                    token = token.next();
                    Focus::from_points(&cloud(n, token))
                },
                |foci| {
                    let _hull = filter_hull(&foci, &cfg).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("build", n), &n, |b, &n| {
            let mut token = ReplayToken { seed: 42, index: 0 };
            b.iter_batched(
                || {
                    token = token.next();
                    cloud(n, token)
                },
                |foci| {
                    let _curve = build_curve_with_slack(&foci, 1.5, &cfg).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_sample(c: &mut Criterion) {
    let cfg = CurveCfg::default();
    let curve: Curve = build_curve_with_slack(&cloud(8, ReplayToken { seed: 43, index: 0 }), 1.5, &cfg).unwrap();
    let total = curve.total_length();
    let mut group = c.benchmark_group("sample");
    group.bench_function("by_angle", |b| {
        let mut phi = 0.0f64;
        b.iter(|| {
            phi += 0.377;
            curve.sample_by_angle(phi)
        })
    });
    group.bench_function("by_arc_length", |b| {
        let mut s = 0.0f64;
        b.iter(|| {
            s = (s + 0.377 * total / 7.0) % total;
            curve.sample_by_arc_length(s)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_sample);
criterion_main!(benches);
