use nalgebra::Vector2;
use std::cmp::Ordering;
use std::f64::consts::TAU;

/// Signed area of the parallelogram spanned by `a` and `b`.
/// Positive for a→b counterclockwise.
#[inline]
pub fn cross2(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Orientation of the triple (a, b, c): > 0 for a left turn.
#[inline]
pub fn cross(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    cross2(b - a, c - a)
}

/// Counterclockwise perpendicular.
#[inline]
pub fn perp(v: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// Polar angle of `p` seen from `center`, in (-π, π].
#[inline]
pub fn polar(center: Vector2<f64>, p: Vector2<f64>) -> f64 {
    let d = p - center;
    d.y.atan2(d.x)
}

/// Wrap `angle - origin` into [0, 2π).
#[inline]
pub fn phase(angle: f64, origin: f64) -> f64 {
    let w = (angle - origin).rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs
    if w >= TAU {
        0.0
    } else {
        w
    }
}

/// Lexicographic (x, y) order; NaN-free inputs are assumed.
#[inline]
pub fn lex_cmp(a: &Vector2<f64>, b: &Vector2<f64>) -> Ordering {
    match a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal),
        o => o,
    }
}

/// Andrew’s monotone chain convex hull (returns hull in CCW order, strict turns only).
///
/// Input must be sorted by `lex_cmp` and free of duplicates. Returns the
/// original indices of the hull vertices, starting at the lexicographic minimum.
pub fn convex_hull_sorted(pts: &[Vector2<f64>]) -> Vec<usize> {
    if pts.len() < 2 {
        return (0..pts.len()).collect();
    }
    let mut lower: Vec<usize> = Vec::with_capacity(pts.len());
    for (k, p) in pts.iter().enumerate() {
        while lower.len() >= 2
            && cross(pts[lower[lower.len() - 2]], pts[lower[lower.len() - 1]], *p) <= 0.0
        {
            lower.pop();
        }
        lower.push(k);
    }
    let mut upper: Vec<usize> = Vec::with_capacity(pts.len());
    for (k, p) in pts.iter().enumerate().rev() {
        while upper.len() >= 2
            && cross(pts[upper[upper.len() - 2]], pts[upper[upper.len() - 1]], *p) <= 0.0
        {
            upper.pop();
        }
        upper.push(k);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    hull
}

/// Convex hull of arbitrary points (sorted and deduplicated internally).
pub fn convex_hull(points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let mut pts: Vec<_> = points.to_vec();
    pts.sort_by(lex_cmp);
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    convex_hull_sorted(&pts)
        .into_iter()
        .map(|k| pts[k])
        .collect()
}

/// Perimeter of a closed polygon (vertex order as given).
pub fn closed_perimeter(poly: &[Vector2<f64>]) -> f64 {
    let n = poly.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|k| (poly[(k + 1) % n] - poly[k]).norm()).sum()
}

/// Shoelace area (positive for CCW order).
pub fn shoelace_area(poly: &[Vector2<f64>]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    0.5 * (0..n)
        .map(|k| cross2(poly[k], poly[(k + 1) % n]))
        .sum::<f64>()
}

/// Perimeter of conv(points ∪ {x}); the loop length seen by a pencil at `x`.
///
/// This is the slow, independent path used to verify assembled curves.
pub fn hull_perimeter_with(points: &[Vector2<f64>], x: Vector2<f64>) -> f64 {
    let mut all = Vec::with_capacity(points.len() + 1);
    all.extend_from_slice(points);
    all.push(x);
    closed_perimeter(&convex_hull(&all))
}
