//! Mixed Voronoi area weights.
//!
//! Each triangle distributes its area among its three corners. For
//! non-obtuse triangles the share is the corner's Voronoi region; when one
//! angle is obtuse the Voronoi region leaves the triangle, so the obtuse
//! corner takes half the area and the other two a quarter each.
//!
//! # References
//!
//! - Meyer, M., et al. (2003). "Discrete Differential-Geometry Operators for
//!   Triangulated 2-Manifolds." Visualization and Mathematics III.

use nalgebra::Point3;

/// Relative tolerance on `|cross|` against the longest squared edge.
const AREA_EPS: f64 = 1e-12;

/// Area of triangle `(p0, p1, p2)`.
#[inline]
pub fn triangle_area(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
}

/// Returns `true` if the triangle's area vanishes relative to its size.
pub fn is_degenerate(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> bool {
    let longest = (p1 - p0)
        .norm_squared()
        .max((p2 - p1).norm_squared())
        .max((p0 - p2).norm_squared());
    let cross = (p1 - p0).cross(&(p2 - p0)).norm();
    !(longest > 0.0) || cross <= AREA_EPS * longest
}

/// Cotangent of the angle at `a` in triangle `(a, b, c)`.
#[inline]
fn cotangent_angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.dot(&ac) / ab.cross(&ac).norm()
}

/// Index of the corner whose angle is at least 90 degrees, if any.
fn obtuse_corner(p: [&Point3<f64>; 3]) -> Option<usize> {
    (0..3).find(|&i| {
        let a = p[i];
        let b = p[(i + 1) % 3];
        let c = p[(i + 2) % 3];
        (b - a).dot(&(c - a)) <= 0.0
    })
}

/// Mixed Voronoi weight of each corner of triangle `(p0, p1, p2)`.
///
/// The three weights are non-negative and sum to the triangle area. Returns
/// `None` for a degenerate triangle.
///
/// # Example
///
/// ```
/// use weingarten::algo::voronoi::{mixed_voronoi_weights, triangle_area};
/// use nalgebra::Point3;
///
/// let p0 = Point3::new(0.0, 0.0, 0.0);
/// let p1 = Point3::new(1.0, 0.0, 0.0);
/// let p2 = Point3::new(0.3, 0.8, 0.0);
///
/// let w = mixed_voronoi_weights(&p0, &p1, &p2).unwrap();
/// let total: f64 = w.iter().sum();
/// assert!((total - triangle_area(&p0, &p1, &p2)).abs() < 1e-12);
/// ```
pub fn mixed_voronoi_weights(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Option<[f64; 3]> {
    if is_degenerate(p0, p1, p2) {
        return None;
    }

    let area = triangle_area(p0, p1, p2);
    let corners = [p0, p1, p2];

    if let Some(obtuse) = obtuse_corner(corners) {
        let mut weights = [0.25 * area; 3];
        weights[obtuse] = 0.5 * area;
        return Some(weights);
    }

    // Voronoi region of P with neighbours Q (previous) and R (next):
    // (|PR|² cot Q + |PQ|² cot R) / 8
    let mut weights = [0.0; 3];
    for (i, weight) in weights.iter_mut().enumerate() {
        let p = corners[i];
        let q = corners[(i + 2) % 3];
        let r = corners[(i + 1) % 3];
        let cot_q = cotangent_angle(q, p, r);
        let cot_r = cotangent_angle(r, p, q);
        *weight = 0.125 * ((r - p).norm_squared() * cot_q + (q - p).norm_squared() * cot_r);
    }
    Some(weights)
}
