//! Random focus clouds in 2D (radial jitter + replay tokens).
//!
//! Purpose
//! - Provide a small, deterministic sampler of focus sets for property tests,
//!   sweeps and benchmarks. Draws are reproducible from `(seed, index)`.
//!
//! Model
//! - `n` outer foci at equally spaced angles on [0, 2π) with bounded angular
//!   and radial jitter (these tend to become hull vertices), plus `m` interior
//!   foci drawn inside a disk of `interior_frac * base_radius` (these are
//!   never felt by the loop and exercise hull filtering).
//!
//! Code cross-refs: `hull::filter_hull`, `sweep::build_curves`

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::Point;

/// Outer focus count distribution.
#[derive(Clone, Copy, Debug)]
pub enum FocusCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl FocusCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            FocusCount::Fixed(n) => n.max(2),
            FocusCount::Uniform { min, max } => {
                let lo = min.max(2);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct FociCfg {
    pub outer: FocusCount,
    /// Interior foci drawn strictly inside the outer ring.
    pub interior: usize,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.45].
    pub angle_jitter_frac: f64,
    /// Radial jitter (relative amplitude), clamped to [0, 0.5].
    pub radial_jitter: f64,
    pub base_radius: f64,
    /// Interior disk radius as a fraction of the smallest possible outer radius.
    pub interior_frac: f64,
    pub random_phase: bool,
}
impl Default for FociCfg {
    fn default() -> Self {
        Self {
            outer: FocusCount::Uniform { min: 3, max: 8 },
            interior: 2,
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            interior_frac: 0.4,
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }

    /// Token for the next draw in the same stream.
    #[inline]
    pub fn next(self) -> Self {
        Self {
            seed: self.seed,
            index: self.index.wrapping_add(1),
        }
    }
}

/// Draw a focus cloud: outer ring first, then interior points.
pub fn draw_foci(cfg: FociCfg, tok: ReplayToken) -> Vec<Point> {
    let mut rng = tok.to_std_rng();
    let n = cfg.outer.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.45);
    let rj = cfg.radial_jitter.clamp(0.0, 0.5);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    let mut pts: Vec<Point> = (0..n)
        .map(|k| {
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let th = phase + (k as f64) * delta + jitter;
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u) * r0;
            Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    // interior disk stays inside the inscribed circle of the jittered ring
    let half_gap = ((0.5 + aj) * delta).min(std::f64::consts::FRAC_PI_2);
    let r_in = cfg.interior_frac.clamp(0.0, 0.9) * (1.0 - rj) * r0 * half_gap.cos();
    for _ in 0..cfg.interior {
        let th = rng.gen::<f64>() * std::f64::consts::TAU;
        let r = r_in * rng.gen::<f64>().sqrt();
        pts.push(Vector2::new(th.cos() * r, th.sin() * r));
    }
    pts
}

/// Translate to the vertex centroid and scale so the farthest focus sits at `r_out`.
///
/// Returns `None` for empty or fully coincident clouds.
pub fn recenter_rescale(points: &[Point], r_out: f64) -> Option<Vec<Point>> {
    if points.is_empty() || !(r_out > 0.0) {
        return None;
    }
    let c = points.iter().fold(Vector2::zeros(), |acc, p| acc + p) / (points.len() as f64);
    let r0 = points.iter().map(|p| (p - c).norm()).fold(0.0, f64::max);
    if r0 <= 0.0 {
        return None;
    }
    let s = r_out / r0;
    Some(points.iter().map(|p| (p - c) * s).collect())
}
