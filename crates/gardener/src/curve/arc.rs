//! Elliptic arcs in the focal frame.
//!
//! Frame: center `C = (F0 + F1)/2`, unit major axis `u` from `F0` to `F1`,
//! `w = perp(u)`. With `a = s/2`, `c = |F1 − F0|/2`, `b = sqrt(a² − c²)` a
//! point is `C + a·cosθ·u + b·sinθ·w` (θ = eccentric anomaly, CCW).

use std::f64::consts::TAU;

use crate::geom::util::{cross2, perp};
use crate::geom::{adaptive_simpson, newton_bracketed, CurveCfg, Focus, Point};

/// Ellipse given by its foci and string sum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    pub foci: (Point, Point),
    pub center: Point,
    /// Unit major axis, from `foci.0` to `foci.1`.
    pub axis: Point,
    pub semi_major: f64,
    pub semi_minor: f64,
}

impl Ellipse {
    /// `string_sum` must exceed `|f1 − f0|`; coincident foci give a circle
    /// with axis `+x`.
    pub fn from_foci(f0: Point, f1: Point, string_sum: f64) -> Self {
        let d = f1 - f0;
        let dist = d.norm();
        let axis = if dist > 0.0 { d / dist } else { Point::new(1.0, 0.0) };
        let a = 0.5 * string_sum;
        let c = 0.5 * dist;
        let b = ((a - c) * (a + c)).max(0.0).sqrt();
        Self {
            foci: (f0, f1),
            center: 0.5 * (f0 + f1),
            axis,
            semi_major: a,
            semi_minor: b,
        }
    }

    /// Major axis angle in (-π, π].
    #[inline]
    pub fn tilt(&self) -> f64 {
        self.axis.y.atan2(self.axis.x)
    }

    #[inline]
    pub fn focal_distance(&self) -> f64 {
        0.5 * (self.foci.1 - self.foci.0).norm()
    }

    #[inline]
    pub fn eccentricity(&self) -> f64 {
        self.focal_distance() / self.semi_major
    }

    #[inline]
    pub fn string_sum(&self) -> f64 {
        2.0 * self.semi_major
    }

    #[inline]
    pub fn point_at(&self, theta: f64) -> Point {
        let (s, c) = theta.sin_cos();
        self.center + self.axis * (self.semi_major * c) + perp(self.axis) * (self.semi_minor * s)
    }

    /// dP/dθ.
    #[inline]
    pub fn derivative_at(&self, theta: f64) -> Point {
        let (s, c) = theta.sin_cos();
        self.axis * (-self.semi_major * s) + perp(self.axis) * (self.semi_minor * c)
    }

    /// |dP/dθ|.
    #[inline]
    pub fn speed(&self, theta: f64) -> f64 {
        let (s, c) = theta.sin_cos();
        let (a, b) = (self.semi_major, self.semi_minor);
        (a * a * s * s + b * b * c * c).sqrt()
    }

    #[inline]
    pub fn tangent_at(&self, theta: f64) -> Point {
        let d = self.derivative_at(theta);
        d / d.norm()
    }

    /// Unit CCW tangent at a point on the ellipse, from the focal directions.
    ///
    /// The outward normal bisects the unit vectors from the two foci, so this
    /// needs no eccentric anomaly and stays accurate on very thin ellipses.
    pub fn tangent_through(&self, p: Point) -> Point {
        let (d0, d1) = (p - self.foci.0, p - self.foci.1);
        let (l0, l1) = (d0.norm(), d1.norm());
        if l0 > 0.0 && l1 > 0.0 {
            let n = d0 / l0 + d1 / l1;
            let len = n.norm();
            if len > 0.0 {
                return perp(n) / len;
            }
        }
        self.tangent_at(self.theta_of(p))
    }

    /// Signed curvature (positive: turning left).
    #[inline]
    pub fn curvature_at(&self, theta: f64) -> f64 {
        let v = self.speed(theta);
        self.semi_major * self.semi_minor / (v * v * v)
    }

    /// Eccentric anomaly of (a point on or near) the ellipse, in (-π, π].
    pub fn theta_of(&self, p: Point) -> f64 {
        let q = p - self.center;
        let x = q.dot(&self.axis) / self.semi_major;
        let y = if self.semi_minor > 0.0 {
            q.dot(&perp(self.axis)) / self.semi_minor
        } else {
            0.0
        };
        y.atan2(x)
    }

    /// Largest `t` with `origin + t·dir` on the ellipse, if the ray's line meets it.
    pub fn ray_exit(&self, origin: Point, dir: Point) -> Option<f64> {
        let (a, b) = (self.semi_major, self.semi_minor);
        if !(a > 0.0 && b > 0.0) {
            return None;
        }
        let w = perp(self.axis);
        let q = origin - self.center;
        let (qx, qy) = (q.dot(&self.axis) / a, q.dot(&w) / b);
        let (dx, dy) = (dir.dot(&self.axis) / a, dir.dot(&w) / b);
        let qa = dx * dx + dy * dy;
        let qb = 2.0 * (qx * dx + qy * dy);
        let qc = qx * qx + qy * qy - 1.0;
        if qa == 0.0 {
            return None;
        }
        let disc = qb * qb - 4.0 * qa * qc;
        if disc < 0.0 {
            return None;
        }
        // stable pair: q/A and C/q
        let h = -0.5 * (qb + qb.signum() * disc.sqrt());
        let r0 = h / qa;
        let r1 = if h != 0.0 { qc / h } else { r0 };
        Some(r0.max(r1))
    }

    /// Exact area of the sector-like region swept from the origin: `½∮ x dy − y dx`
    /// over `[t0, t1]`.
    pub fn swept_area(&self, t0: f64, t1: f64) -> f64 {
        let (a, b) = (self.semi_major, self.semi_minor);
        0.5 * (a * b * (t1 - t0) + cross2(self.center, self.point_at(t1) - self.point_at(t0)))
    }
}

/// A traced piece of the curve: part of the ellipse on the ends of a facing run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSegment {
    /// First gap of the facing run.
    pub first_gap: usize,
    /// Number of gaps in the run (1 on a gap's own ellipse).
    pub gap_count: usize,
    /// Run ends: `v_first` and `v_{first + count}`.
    pub foci: (Focus, Focus),
    pub string_sum: f64,
    pub theta_start: f64,
    /// Always `> theta_start` (CCW traversal).
    pub theta_end: f64,
    pub ellipse: Ellipse,
    pub length: f64,
    /// Junction points the arc was cut at (start, end).
    pub junctions: (Point, Point),
}

impl ArcSegment {
    /// Arc of the `(from, to)` ellipse between two junction points.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first_gap: usize,
        gap_count: usize,
        from: Focus,
        to: Focus,
        string_sum: f64,
        start: Point,
        end: Point,
        cfg: &CurveCfg,
    ) -> Self {
        let ellipse = Ellipse::from_foci(from.p, to.p, string_sum);
        let theta_start = ellipse.theta_of(start);
        let mut theta_end = ellipse.theta_of(end);
        while theta_end <= theta_start {
            theta_end += TAU;
        }
        let mut arc = Self {
            first_gap,
            gap_count,
            foci: (from, to),
            string_sum,
            theta_start,
            theta_end,
            ellipse,
            length: 0.0,
            junctions: (start, end),
        };
        arc.length = arc.length_between(theta_start, theta_end, cfg);
        arc
    }

    #[inline]
    pub fn extent(&self) -> f64 {
        self.theta_end - self.theta_start
    }

    #[inline]
    pub fn point_at(&self, theta: f64) -> Point {
        self.ellipse.point_at(theta)
    }

    #[inline]
    pub fn tangent_at(&self, theta: f64) -> Point {
        self.ellipse.tangent_at(theta)
    }

    #[inline]
    pub fn curvature_at(&self, theta: f64) -> f64 {
        self.ellipse.curvature_at(theta)
    }

    #[inline]
    pub fn start_point(&self) -> Point {
        self.point_at(self.theta_start)
    }

    #[inline]
    pub fn end_point(&self) -> Point {
        self.point_at(self.theta_end)
    }

    /// Tangent at the start junction (focal form, see [`Ellipse::tangent_through`]).
    #[inline]
    pub fn start_tangent(&self) -> Point {
        self.ellipse.tangent_through(self.junctions.0)
    }

    /// Tangent at the end junction.
    #[inline]
    pub fn end_tangent(&self) -> Point {
        self.ellipse.tangent_through(self.junctions.1)
    }

    /// Does this arc lie on its gap's own ellipse?
    #[inline]
    pub fn is_own_arc(&self) -> bool {
        self.gap_count == 1
    }

    /// Same focus pair (either order) and same string sum.
    pub fn same_ellipse(&self, other: &ArcSegment) -> bool {
        let (a, b) = (self.foci.0.index, self.foci.1.index);
        let (c, d) = (other.foci.0.index, other.foci.1.index);
        let pair = (a == c && b == d) || (a == d && b == c);
        pair && (self.string_sum - other.string_sum).abs() <= 1e-9 * self.string_sum.max(1.0)
    }

    /// Continue this arc by `other`'s angular extent (both on one ellipse).
    pub(crate) fn extend_by(&mut self, other: &ArcSegment, cfg: &CurveCfg) {
        self.theta_end += other.extent();
        self.junctions.1 = other.junctions.1;
        self.length = self.length_between(self.theta_start, self.theta_end, cfg);
    }

    /// Map any angle into `[theta_start, theta_end]`, snapping outside values
    /// to the nearer end.
    pub fn clamp_theta(&self, theta: f64) -> f64 {
        let t = self.theta_start + (theta - self.theta_start).rem_euclid(TAU);
        if t <= self.theta_end {
            return t;
        }
        if t - self.theta_end < self.theta_start + TAU - t {
            self.theta_end
        } else {
            self.theta_start
        }
    }

    /// Arc length between two parameters (adaptive Simpson on the speed).
    pub fn length_between(&self, t0: f64, t1: f64, cfg: &CurveCfg) -> f64 {
        let tol = cfg.eps_quad * self.ellipse.semi_major.max(1.0) * (t1 - t0).abs().max(1e-3);
        adaptive_simpson(|t| self.ellipse.speed(t), t0, t1, tol, 50)
    }

    /// Parameter at arc length `s` from the start (clamped to the arc).
    pub fn theta_at_length(&self, s: f64, cfg: &CurveCfg) -> f64 {
        if s <= 0.0 {
            return self.theta_start;
        }
        if s >= self.length {
            return self.theta_end;
        }
        let guess = self.theta_start + self.extent() * s / self.length;
        let tol = cfg.root_tolerance() / self.ellipse.semi_major.max(1.0);
        let f = |t: f64| self.length_between(self.theta_start, t, cfg) - s;
        let df = |t: f64| self.ellipse.speed(t);
        match newton_bracketed(
            f,
            df,
            self.theta_start,
            self.theta_end,
            guess,
            tol,
            cfg.max_iterations,
        ) {
            Ok(root) => root.x,
            Err(err) => err.best().unwrap_or(guess),
        }
    }
}
