//! Active hull: the foci a taut loop can ever touch, in CCW cyclic order.
//!
//! Purpose
//! - Reduce the input focus set to the convex hull vertices; interior foci
//!   never constrain the loop and are dropped.
//! - Provide the loop-length bookkeeping every later stage needs: edge
//!   lengths, perimeter, the run of edges facing a pencil position, and the
//!   taut loop length for that position.
//!
//! Conventions
//! - Vertices live in a small arena (`Vec<Focus>`); indices wrap modulo `n`.
//!   Edge `i` runs from vertex `i` to vertex `i + 1`.
//! - Order is CCW starting at the lowest-y (then lowest-x) vertex.
//! - For `n = 2` the single segment is both edge 0 and edge 1, so the
//!   perimeter is the round trip `2·|F0F1|`.
//!
//! Collinearity policy
//! - A vertex is kept only if its perpendicular offset from the chord of its
//!   two hull neighbours exceeds `CurveCfg::eps_collinear`. Points exactly on
//!   an edge are never kept. Three or more distinct foci that collapse onto a
//!   segment are rejected (`CurveError::DegenerateInput`).
//!
//! Code cross-refs: `geom::util::convex_hull_sorted`, `budget::solve_budgets`

use nalgebra::Vector2;
use tracing::debug;

use crate::error::CurveError;
use crate::geom::util::{convex_hull_sorted, cross, cross2, hull_perimeter_with, lex_cmp};
use crate::geom::{CurveCfg, Focus, Point};

/// A cyclically adjacent pair of active foci and the hull edge between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gap {
    pub index: usize,
    pub from: Focus,
    pub to: Focus,
    pub length: f64,
}

/// Which hull edges face a pencil position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    /// No edge faces the point (inside or on the hull).
    Inside,
    /// Edges `first .. first + count` (cyclic) face the point.
    Run { first: usize, count: usize },
    /// Facing edges are not one contiguous run (numerical noise on collinear edges).
    Ragged,
}

/// CCW cyclic sequence of hull vertices.
///
/// Invariants:
/// - `len() >= 2`, vertices pairwise distinct.
/// - Strict left turn at every vertex for `len() >= 3`.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveHull {
    vertices: Vec<Focus>,
    edges: Vec<f64>,
    perimeter: f64,
}

impl ActiveHull {
    fn from_ccw(vertices: Vec<Focus>) -> Self {
        let n = vertices.len();
        let edges: Vec<f64> = (0..n)
            .map(|i| (vertices[(i + 1) % n].p - vertices[i].p).norm())
            .collect();
        let perimeter = edges.iter().sum();
        Self {
            vertices,
            edges,
            perimeter,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[Focus] {
        &self.vertices
    }

    /// Vertex `i` (wraps modulo `n`).
    #[inline]
    pub fn vertex(&self, i: usize) -> Focus {
        self.vertices[i % self.len()]
    }

    #[inline]
    pub fn point(&self, i: usize) -> Point {
        self.vertex(i).p
    }

    pub fn points(&self) -> Vec<Point> {
        self.vertices.iter().map(|f| f.p).collect()
    }

    /// Length of edge `i` (wraps modulo `n`).
    #[inline]
    pub fn edge_length(&self, i: usize) -> f64 {
        self.edges[i % self.len()]
    }

    #[inline]
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Summed length of the cyclic edge run `first .. first + count`.
    pub fn run_length(&self, first: usize, count: usize) -> f64 {
        (first..first + count).map(|i| self.edge_length(i)).sum()
    }

    /// Enclosed area (zero for two vertices).
    pub fn area(&self) -> f64 {
        crate::geom::util::shoelace_area(&self.points())
    }

    /// Vertex average; strictly inside the hull for `n >= 3`, the midpoint for `n = 2`.
    pub fn centroid(&self) -> Point {
        self.vertices
            .iter()
            .fold(Vector2::zeros(), |acc, f| acc + f.p)
            / (self.len() as f64)
    }

    pub fn gaps(&self) -> Vec<Gap> {
        (0..self.len())
            .map(|i| Gap {
                index: i,
                from: self.vertex(i),
                to: self.vertex(i + 1),
                length: self.edge_length(i),
            })
            .collect()
    }

    /// Signed distance of `x` from the line of edge `i`; positive on the hull side.
    #[inline]
    pub fn side(&self, i: usize, x: Point) -> f64 {
        let a = self.point(i);
        let b = self.point(i + 1);
        cross2(b - a, x - a) / self.edge_length(i)
    }

    /// Edges facing `x` (strictly outside their lines).
    pub fn facing(&self, x: Point) -> Facing {
        let n = self.len();
        let visible: Vec<bool> = (0..n).map(|i| self.side(i, x) < 0.0).collect();
        let mut first = None;
        let mut starts = 0;
        for i in 0..n {
            if visible[i] && !visible[(i + n - 1) % n] {
                starts += 1;
                first = Some(i);
            }
        }
        match (starts, first) {
            (0, _) if !visible.iter().any(|v| *v) => Facing::Inside,
            (1, Some(first)) => {
                let count = (0..n).take_while(|k| visible[(first + k) % n]).count();
                Facing::Run { first, count }
            }
            _ => Facing::Ragged,
        }
    }

    /// Length of the taut loop around the hull and a pencil at `x`.
    ///
    /// Equals the perimeter of `conv(hull ∪ {x})`: the facing edges are replaced
    /// by the two straight segments from `x` to the ends of the facing run.
    pub fn taut_loop_length(&self, x: Point) -> f64 {
        if self.len() == 2 {
            // both edges share one line, so points on it beyond the pins face nothing
            return self.edges[0] + (x - self.point(0)).norm() + (x - self.point(1)).norm();
        }
        match self.facing(x) {
            Facing::Inside => self.perimeter,
            Facing::Run { first, count } => {
                self.perimeter - self.run_length(first, count)
                    + (x - self.point(first)).norm()
                    + (x - self.point(first + count)).norm()
            }
            Facing::Ragged => hull_perimeter_with(&self.points(), x),
        }
    }
}

/// Reduce `foci` to the active hull (see module docs for the collinearity policy).
pub fn filter_hull(foci: &[Focus], cfg: &CurveCfg) -> Result<ActiveHull, CurveError> {
    let raw = || foci.iter().map(|f| f.p).collect::<Vec<_>>();
    if foci.is_empty() {
        return Err(CurveError::DegenerateInput {
            reason: "no foci",
            foci: Vec::new(),
        });
    }
    if foci.iter().any(|f| !(f.p.x.is_finite() && f.p.y.is_finite())) {
        return Err(CurveError::DegenerateInput {
            reason: "non-finite focus coordinates",
            foci: raw(),
        });
    }

    let mut sorted: Vec<Focus> = foci.to_vec();
    sorted.sort_by(|a, b| lex_cmp(&a.p, &b.p).then(a.index.cmp(&b.index)));
    let mut distinct: Vec<Focus> = Vec::with_capacity(sorted.len());
    for f in sorted {
        if let Some(last) = distinct.last() {
            if (last.p - f.p).norm() < cfg.eps_dedup {
                continue;
            }
        }
        distinct.push(f);
    }
    if distinct.len() < 2 {
        return Err(CurveError::DegenerateInput {
            reason: "fewer than two distinct foci",
            foci: raw(),
        });
    }

    let pts: Vec<Point> = distinct.iter().map(|f| f.p).collect();
    let mut ring: Vec<Focus> = convex_hull_sorted(&pts)
        .into_iter()
        .map(|k| distinct[k])
        .collect();
    drop_collinear(&mut ring, cfg.eps_collinear);

    if ring.len() < 2 || (ring.len() == 2 && distinct.len() > 2) {
        return Err(CurveError::DegenerateInput {
            reason: "foci are collinear (hull encloses no area)",
            foci: raw(),
        });
    }

    // anchor: lowest y, then lowest x
    let anchor = (0..ring.len())
        .min_by(|&a, &b| {
            let (pa, pb) = (ring[a].p, ring[b].p);
            pa.y.partial_cmp(&pb.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(pa.x.partial_cmp(&pb.x).unwrap_or(std::cmp::Ordering::Equal))
        })
        .unwrap_or(0);
    ring.rotate_left(anchor);

    let hull = ActiveHull::from_ccw(ring);
    debug!(
        input = foci.len(),
        distinct = distinct.len(),
        active = hull.len(),
        perimeter = hull.perimeter(),
        "hull filtered"
    );
    Ok(hull)
}

/// Repeatedly drop the flattest vertex while its offset is within `eps`.
fn drop_collinear(ring: &mut Vec<Focus>, eps: f64) {
    while ring.len() > 2 {
        let n = ring.len();
        let flattest = (0..n)
            .map(|i| {
                let prev = ring[(i + n - 1) % n].p;
                let next = ring[(i + 1) % n].p;
                let chord = (next - prev).norm();
                let offset = if chord > 0.0 {
                    cross(prev, ring[i].p, next) / chord
                } else {
                    0.0
                };
                (i, offset)
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        match flattest {
            Some((i, offset)) if offset <= eps => {
                ring.remove(i);
            }
            _ => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn foci(pts: &[(f64, f64)]) -> Vec<Focus> {
        pts.iter()
            .enumerate()
            .map(|(i, &(x, y))| Focus::new(i, vector![x, y]))
            .collect()
    }

    #[test]
    fn triangle_ccw_from_lowest_anchor() {
        let hull = filter_hull(&foci(&[(2.0, 3.0), (4.0, 0.0), (0.0, 0.0)]), &CurveCfg::default())
            .unwrap();
        let idx: Vec<usize> = hull.vertices().iter().map(|f| f.index).collect();
        assert_eq!(idx, vec![2, 1, 0]);
        assert!(hull.area() > 0.0);
        let expected = 4.0 + 2.0 * 13f64.sqrt();
        assert!((hull.perimeter() - expected).abs() < 1e-12);
        assert_eq!(hull.gaps().len(), 3);
        assert!((hull.gaps()[0].length - 4.0).abs() < 1e-12);
    }

    #[test]
    fn interior_foci_are_dropped() {
        let hull = filter_hull(
            &foci(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (2.0, 2.0), (1.0, 3.0)]),
            &CurveCfg::default(),
        )
        .unwrap();
        assert_eq!(hull.len(), 4);
        assert!(hull.vertices().iter().all(|f| f.index < 4));
    }

    #[test]
    fn coincident_and_empty_inputs_fail() {
        let cfg = CurveCfg::default();
        assert!(matches!(
            filter_hull(&[], &cfg),
            Err(CurveError::DegenerateInput { .. })
        ));
        assert!(matches!(
            filter_hull(&foci(&[(0.0, 0.0), (0.0, 0.0)]), &cfg),
            Err(CurveError::DegenerateInput { .. })
        ));
        assert!(matches!(
            filter_hull(&foci(&[(1.0, 1.0)]), &cfg),
            Err(CurveError::DegenerateInput { .. })
        ));
        assert!(matches!(
            filter_hull(&foci(&[(0.0, f64::NAN), (1.0, 1.0)]), &cfg),
            Err(CurveError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn collinear_foci_fail_but_two_distinct_succeed() {
        let cfg = CurveCfg::default();
        let err = filter_hull(&foci(&[(0.0, 0.0), (1.0, 1.0), (3.0, 3.0)]), &cfg).unwrap_err();
        match err {
            CurveError::DegenerateInput { foci, .. } => assert_eq!(foci.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
        // duplicates collapse to the classical two-pin case
        let hull = filter_hull(&foci(&[(0.0, 0.0), (2.0, 0.0), (0.0, 0.0)]), &cfg).unwrap();
        assert_eq!(hull.len(), 2);
        assert!((hull.perimeter() - 4.0).abs() < 1e-12);
        assert_eq!(hull.gaps().len(), 2);
    }

    #[test]
    fn collinear_tolerance_changes_active_set() {
        // square plus a focus slightly below the bottom edge midpoint
        let pts = foci(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (2.0, -1e-4)]);
        let tight = filter_hull(&pts, &CurveCfg::default().with_collinear(1e-6)).unwrap();
        assert_eq!(tight.len(), 5);
        let loose = filter_hull(&pts, &CurveCfg::default().with_collinear(1e-3)).unwrap();
        assert_eq!(loose.len(), 4);
        assert!(loose.vertices().iter().all(|f| f.index != 4));
        // exactly on the edge is never active, even with a zero tolerance
        let on_edge = foci(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (2.0, 0.0)]);
        assert_eq!(
            filter_hull(&on_edge, &CurveCfg::default().with_collinear(0.0))
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn near_collinear_triple_depends_on_tolerance() {
        let pts = foci(&[(0.0, 0.0), (1.0, 1e-7), (2.0, 0.0)]);
        assert!(matches!(
            filter_hull(&pts, &CurveCfg::default().with_collinear(1e-6)),
            Err(CurveError::DegenerateInput { .. })
        ));
        assert_eq!(
            filter_hull(&pts, &CurveCfg::default().with_collinear(1e-9))
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn facing_runs_and_loop_length() {
        let hull = filter_hull(
            &foci(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            &CurveCfg::default(),
        )
        .unwrap();
        assert_eq!(hull.facing(vector![0.5, 0.5]), Facing::Inside);
        assert_eq!(
            hull.facing(vector![0.5, -1.0]),
            Facing::Run { first: 0, count: 1 }
        );
        // below-right: bottom and right edges face the point
        assert_eq!(
            hull.facing(vector![2.0, -1.0]),
            Facing::Run { first: 0, count: 2 }
        );
        // below-left wraps around: left edge (3) then bottom (0)
        assert_eq!(
            hull.facing(vector![-1.0, -1.0]),
            Facing::Run { first: 3, count: 2 }
        );
        for x in [vector![0.5, -1.0], vector![2.0, -1.0], vector![-3.0, 0.2]] {
            let fast = hull.taut_loop_length(x);
            let slow = hull_perimeter_with(&hull.points(), x);
            assert!((fast - slow).abs() < 1e-12);
        }
        assert!((hull.taut_loop_length(vector![0.2, 0.3]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn two_pin_loop_length_is_textbook() {
        let hull = filter_hull(&foci(&[(0.0, 0.0), (2.0, 0.0)]), &CurveCfg::default()).unwrap();
        let x = vector![1.0, 3.0];
        let expected = 2.0 + 2.0 * 10f64.sqrt();
        assert!((hull.taut_loop_length(x) - expected).abs() < 1e-12);
        // on the axis beyond a pin the loop doubles back over the overhang
        assert!((hull.taut_loop_length(vector![-1.5, 0.0]) - 7.0).abs() < 1e-12);
        assert!((hull.taut_loop_length(vector![0.5, 0.0]) - 4.0).abs() < 1e-12);
        assert!((hull.centroid() - vector![1.0, 0.0]).norm() < 1e-15);
    }

    #[test]
    fn ragged_visibility_falls_back_to_the_hull_oracle() {
        // a ring with a shallow dent in the bottom edge; seen from (5, 0) the
        // first and third edges face the pencil but the second does not
        let ring = ActiveHull::from_ccw(foci(&[
            (0.0, 0.0),
            (2.0, 1e-3),
            (4.0, 0.0),
            (4.0, 4.0),
            (0.0, 4.0),
        ]));
        let x = vector![5.0, 0.0];
        assert_eq!(ring.facing(x), Facing::Ragged);
        let expected = 13.0 + 17f64.sqrt();
        assert!((ring.taut_loop_length(x) - expected).abs() < 1e-12);
        assert_eq!(ring.taut_loop_length(x), hull_perimeter_with(&ring.points(), x));
    }
}
