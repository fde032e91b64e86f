//! Point queries on an assembled curve.

use nalgebra::Vector2;

use super::arc::ArcSegment;
use super::Curve;
use crate::geom::util::{perp, phase};
use crate::geom::{bisect, Point};

/// A point on the curve with its unit tangent and where it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub point: Point,
    /// Unit tangent in the CCW direction of travel.
    pub tangent: Point,
    /// Index into `Curve::arcs()`.
    pub arc: usize,
    /// Eccentric anomaly on that arc's ellipse.
    pub theta: f64,
}

impl Sample {
    /// Outward unit normal.
    #[inline]
    pub fn normal(&self) -> Point {
        -perp(self.tangent)
    }
}

impl Curve {
    fn sample_on(&self, k: usize, theta: f64) -> Sample {
        let arc = &self.arcs[k];
        Sample {
            point: arc.point_at(theta),
            tangent: arc.tangent_at(theta),
            arc: k,
            theta,
        }
    }

    /// Arc whose angular window (seen from `center`) contains `phi`.
    fn arc_for_phase(&self, p: f64) -> usize {
        self.phases
            .partition_point(|&s| s <= p)
            .saturating_sub(1)
            .min(self.arcs.len() - 1)
    }

    /// Curve point on the ray from the hull centroid at polar angle `phi`.
    ///
    /// Any real angle is accepted (wrapped into one turn). The curve is
    /// star-shaped around the centroid, so the answer is unique. A NaN or
    /// infinite angle names no direction and yields arc 0's start point.
    pub fn sample_by_angle(&self, phi: f64) -> Sample {
        if !phi.is_finite() {
            return self.sample_on(0, self.arcs[0].theta_start);
        }
        let p = phase(phi, self.origin);
        let k = self.arc_for_phase(p);
        let arc = &self.arcs[k];
        let dir = Vector2::new(phi.cos(), phi.sin());
        let target = match arc.ellipse.ray_exit(self.center, dir) {
            Some(t) if t > 0.0 => self.center + dir * t,
            _ => self.radial_point(dir),
        };
        self.sample_on(k, arc.clamp_theta(arc.ellipse.theta_of(target)))
    }

    /// Point at arc length `s` from arc 0's start, CCW; `s` wraps modulo the perimeter.
    /// A NaN or infinite `s` yields arc 0's start point.
    pub fn sample_by_arc_length(&self, s: f64) -> Sample {
        let total = self.total_length();
        let s = if total > 0.0 && s.is_finite() {
            s.rem_euclid(total)
        } else {
            0.0
        };
        let k = self
            .cumulative
            .partition_point(|&c| c <= s)
            .saturating_sub(1)
            .min(self.arcs.len() - 1);
        let local = s - self.arc_offset(k);
        let theta = self.arcs[k].theta_at_length(local, &self.cfg);
        self.sample_on(k, theta)
    }

    /// `count` points equally spaced in arc length, starting at arc 0's start.
    pub fn sample_uniform(&self, count: usize) -> Vec<Sample> {
        let total = self.total_length();
        (0..count)
            .map(|j| self.sample_by_arc_length(total * (j as f64) / (count as f64)))
            .collect()
    }

    /// `count` points equally spaced in polar angle, starting at `phi0`.
    pub fn sample_angles(&self, phi0: f64, count: usize) -> Vec<Sample> {
        (0..count)
            .map(|j| self.sample_by_angle(phi0 + std::f64::consts::TAU * (j as f64) / (count as f64)))
            .collect()
    }

    /// Enclosed area (exact per arc, Green's theorem).
    pub fn area(&self) -> f64 {
        self.arcs
            .iter()
            .map(|a| a.ellipse.swept_area(a.theta_start, a.theta_end))
            .sum()
    }

    /// Curvature at a sample (strictly positive: the curve is convex).
    pub fn curvature(&self, sample: &Sample) -> f64 {
        self.arcs[sample.arc].curvature_at(sample.theta)
    }

    /// Arc length from arc 0's start to `sample`.
    pub fn arc_length_at(&self, sample: &Sample) -> f64 {
        let arc: &ArcSegment = &self.arcs[sample.arc];
        self.arc_offset(sample.arc) + arc.length_between(arc.theta_start, sample.theta, &self.cfg)
    }

    /// Fallback for a ray that misses its arc's ellipse in floating point:
    /// walk outwards until the taut loop reaches `L`.
    fn radial_point(&self, dir: Point) -> Point {
        let center = self.center;
        let f = |t: f64| self.hull.taut_loop_length(center + dir * t) - self.loop_length;
        let t = match bisect(
            f,
            0.0,
            self.loop_length,
            self.cfg.root_tolerance(),
            self.cfg.max_iterations,
        ) {
            Ok(root) => root.x,
            Err(err) => err.best().unwrap_or(0.0),
        };
        center + dir * t
    }
}
