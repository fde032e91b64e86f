//! Small 1D numerics used by transition search, sampling and quadrature.
//!
//! - `bisect`: bracketed bisection with an explicit iteration cap.
//! - `newton_bracketed`: Newton steps kept inside a shrinking bracket.
//! - `adaptive_simpson`: bounded-depth adaptive quadrature (explicit stack).
//!
//! Every loop terminates: either the tolerance is met, the bracket is
//! exhausted in floating point, or the cap is hit and a typed error returns
//! the best estimate seen so far.

use std::fmt;

/// Converged root with the number of iterations spent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Root {
    pub x: f64,
    pub iterations: usize,
}

/// Why a bracketed search stopped without a root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RootError {
    /// `f(lo)` and `f(hi)` do not straddle zero.
    NoSignChange { f_lo: f64, f_hi: f64 },
    /// Iteration cap hit; `best` is the midpoint of the final bracket.
    MaxIterations { best: f64, bracket: (f64, f64) },
}

impl RootError {
    /// Best available estimate, if the search got far enough to have one.
    pub fn best(&self) -> Option<f64> {
        match self {
            RootError::NoSignChange { .. } => None,
            RootError::MaxIterations { best, .. } => Some(*best),
        }
    }
}

impl fmt::Display for RootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootError::NoSignChange { f_lo, f_hi } => {
                write!(f, "no sign change on bracket (f(lo)={f_lo:e}, f(hi)={f_hi:e})")
            }
            RootError::MaxIterations { best, bracket } => write!(
                f,
                "iteration cap hit near {best} (bracket [{}, {}])",
                bracket.0, bracket.1
            ),
        }
    }
}

/// Bisection for `f(x) = 0` on `[lo, hi]` with `f(lo) < 0 < f(hi)` (either orientation accepted).
///
/// Stops when the bracket is narrower than `tol`, when `f(mid) == 0`, or when the
/// midpoint no longer separates the endpoints in f64.
pub fn bisect<F>(mut f: F, mut lo: f64, mut hi: f64, tol: f64, max_iter: usize) -> Result<Root, RootError>
where
    F: FnMut(f64) -> f64,
{
    let f_lo = f(lo);
    let f_hi = f(hi);
    if !(f_lo.is_finite() && f_hi.is_finite()) || f_lo.signum() == f_hi.signum() {
        if f_lo == 0.0 {
            return Ok(Root { x: lo, iterations: 0 });
        }
        if f_hi == 0.0 {
            return Ok(Root { x: hi, iterations: 0 });
        }
        return Err(RootError::NoSignChange { f_lo, f_hi });
    }
    // orient so that f(lo) < 0
    let rising = f_lo < 0.0;
    for it in 1..=max_iter {
        let mid = 0.5 * (lo + hi);
        if (hi - lo).abs() <= tol || mid == lo || mid == hi {
            return Ok(Root { x: mid, iterations: it });
        }
        let fm = f(mid);
        if fm == 0.0 {
            return Ok(Root { x: mid, iterations: it });
        }
        if (fm < 0.0) == rising {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Err(RootError::MaxIterations {
        best: 0.5 * (lo + hi),
        bracket: (lo, hi),
    })
}

/// Newton iteration for an increasing `f` on `[lo, hi]`, falling back to
/// bisection whenever a step leaves the bracket. `df` must be positive.
pub fn newton_bracketed<F, D>(
    mut f: F,
    mut df: D,
    mut lo: f64,
    mut hi: f64,
    x0: f64,
    tol: f64,
    max_iter: usize,
) -> Result<Root, RootError>
where
    F: FnMut(f64) -> f64,
    D: FnMut(f64) -> f64,
{
    let mut x = x0.clamp(lo, hi);
    for it in 1..=max_iter {
        let fx = f(x);
        if fx == 0.0 {
            return Ok(Root { x, iterations: it });
        }
        if fx < 0.0 {
            lo = x;
        } else {
            hi = x;
        }
        let d = df(x);
        let mut next = if d > 0.0 && d.is_finite() { x - fx / d } else { f64::NAN };
        if !(next > lo && next < hi) {
            next = 0.5 * (lo + hi);
        }
        if (next - x).abs() <= tol || hi - lo <= tol {
            return Ok(Root { x: next, iterations: it });
        }
        x = next;
    }
    Err(RootError::MaxIterations {
        best: x,
        bracket: (lo, hi),
    })
}

/// Adaptive Simpson quadrature of `f` over `[a, b]`.
///
/// Intervals are refined until the Richardson error estimate is below the
/// local share of `tol` or `max_depth` halvings were spent on that branch.
pub fn adaptive_simpson<F>(f: F, a: f64, b: f64, tol: f64, max_depth: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return 0.0;
    }
    let fa = f(a);
    let fb = f(b);
    let m = 0.5 * (a + b);
    let fm = f(m);
    let whole = (b - a) / 6.0 * (fa + 4.0 * fm + fb);

    struct Piece {
        a: f64,
        b: f64,
        fa: f64,
        fm: f64,
        fb: f64,
        whole: f64,
        tol: f64,
        depth: usize,
    }

    let mut total = 0.0;
    let mut stack = vec![Piece {
        a,
        b,
        fa,
        fm,
        fb,
        whole,
        tol,
        depth: 0,
    }];
    while let Some(p) = stack.pop() {
        let m = 0.5 * (p.a + p.b);
        let lm = 0.5 * (p.a + m);
        let rm = 0.5 * (m + p.b);
        let flm = f(lm);
        let frm = f(rm);
        let left = (m - p.a) / 6.0 * (p.fa + 4.0 * flm + p.fm);
        let right = (p.b - m) / 6.0 * (p.fm + 4.0 * frm + p.fb);
        let delta = left + right - p.whole;
        if p.depth >= max_depth || delta.abs() <= 15.0 * p.tol {
            total += left + right + delta / 15.0;
            continue;
        }
        stack.push(Piece {
            a: p.a,
            b: m,
            fa: p.fa,
            fm: flm,
            fb: p.fm,
            whole: left,
            tol: 0.5 * p.tol,
            depth: p.depth + 1,
        });
        stack.push(Piece {
            a: m,
            b: p.b,
            fa: p.fm,
            fm: frm,
            fb: p.fb,
            whole: right,
            tol: 0.5 * p.tol,
            depth: p.depth + 1,
        });
    }
    total
}
