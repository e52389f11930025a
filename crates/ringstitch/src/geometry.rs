//! Small geometric helpers shared by planning and measurement.
//!
//! Everything here works on closed polylines given as point slices and
//! never allocates more than the result.

use nalgebra::{Point3, Vector3};

/// Below this length a vector is treated as zero.
pub const DEGENERATE_LENGTH: f64 = 1e-12;

/// Length of a closed loop, including the edge from last back to first.
pub fn closed_length(points: &[Point3<f64>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let n = points.len();
    (0..n).map(|i| (points[(i + 1) % n] - points[i]).norm()).sum()
}

/// Arithmetic mean of a set of points, `None` when empty.
pub fn mean_point<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Point3<f64>> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(Point3::from(sum / count as f64))
    }
}

/// Normalize a vector, falling back when it is (nearly) zero.
pub fn normalize_or(v: Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    let len = v.norm();
    if len > DEGENERATE_LENGTH && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

/// Orthonormal in-plane basis `(u, v)` for a plane with normal `axis`.
///
/// The seed axis is X unless the axis is close to X, in which case Y is
/// used, so the basis never degenerates. `(u, v, axis)` is right-handed.
pub fn plane_basis(axis: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let n = normalize_or(*axis, Vector3::z());
    let seed = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = (seed - n * seed.dot(&n)).normalize();
    let v = n.cross(&u);
    (u, v)
}

/// Remove the component of `v` along unit vector `axis`.
#[inline]
pub fn reject(v: &Vector3<f64>, axis: &Vector3<f64>) -> Vector3<f64> {
    v - axis * v.dot(axis)
}

/// Intersection of segment `a→b` with a plane, if the segment crosses it.
pub fn plane_edge_intersection(
    plane_point: &Point3<f64>,
    plane_normal: &Vector3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
) -> Option<Point3<f64>> {
    let d_a = (*a - *plane_point).dot(plane_normal);
    let d_b = (*b - *plane_point).dot(plane_normal);

    if d_a * d_b > 0.0 {
        return None;
    }

    if (d_a - d_b).abs() < 1e-12 {
        // Edge lies in the plane
        return if d_a.abs() < 1e-12 { Some(*a) } else { None };
    }

    let t = d_a / (d_a - d_b);
    Some(*a + (*b - *a) * t)
}

/// All crossings of a closed polyline with a plane.
///
/// Shared vertices produce one point, not two.
pub fn plane_polyline_intersections(
    plane_point: &Point3<f64>,
    plane_normal: &Vector3<f64>,
    points: &[Point3<f64>],
) -> Vec<Point3<f64>> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let mut hits: Vec<Point3<f64>> = Vec::new();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        if let Some(p) = plane_edge_intersection(plane_point, plane_normal, a, b) {
            if hits.iter().all(|h| (*h - p).norm_squared() > 1e-18) {
                hits.push(p);
            }
        }
    }
    hits
}

/// Closest point to `p` on segment `a→b`.
pub fn closest_point_on_segment(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
) -> Point3<f64> {
    let ab = *b - *a;
    let len_sq = ab.norm_squared();
    if len_sq < DEGENERATE_LENGTH * DEGENERATE_LENGTH {
        return *a;
    }
    let t = ((*p - *a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    *a + ab * t
}

/// Closest point to `p` on a closed polyline.
pub fn closest_point_on_polyline(p: &Point3<f64>, points: &[Point3<f64>]) -> Option<Point3<f64>> {
    match points.len() {
        0 => None,
        1 => Some(points[0]),
        n => (0..n)
            .map(|i| closest_point_on_segment(p, &points[i], &points[(i + 1) % n]))
            .min_by(|x, y| (*x - *p).norm_squared().total_cmp(&(*y - *p).norm_squared())),
    }
}

/// Point halfway along a closed polyline, measured by arc length from
/// the first point.
pub fn polyline_midpoint(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    match points.len() {
        0 => None,
        1 => Some(points[0]),
        n => {
            let half = closed_length(points) / 2.0;
            if half <= DEGENERATE_LENGTH {
                return Some(points[0]);
            }
            let mut walked = 0.0;
            for i in 0..n {
                let a = points[i];
                let b = points[(i + 1) % n];
                let len = (b - a).norm();
                if walked + len >= half {
                    let t = if len > 0.0 { (half - walked) / len } else { 0.0 };
                    return Some(a + (b - a) * t);
                }
                walked += len;
            }
            Some(points[n - 1])
        }
    }
}

/// Smallest distance between two indices on a ring of `n` slots.
#[inline]
pub fn circular_distance(a: usize, b: usize, n: usize) -> usize {
    let d = a.abs_diff(b) % n.max(1);
    d.min(n - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn circle(n: usize, r: f64, z: f64) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                let a = TAU * i as f64 / n as f64;
                Point3::new(r * a.cos(), r * a.sin(), z)
            })
            .collect()
    }

    #[test]
    fn test_closed_length_square() {
        let square = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert!((closed_length(&square) - 4.0).abs() < 1e-12);
        assert_eq!(closed_length(&square[..1]), 0.0);
    }

    #[test]
    fn test_plane_basis_orthonormal() {
        for axis in [Vector3::z(), Vector3::x(), Vector3::new(1.0, 2.0, -0.5)] {
            let n = axis.normalize();
            let (u, v) = plane_basis(&axis);
            assert!((u.norm() - 1.0).abs() < 1e-12);
            assert!((v.norm() - 1.0).abs() < 1e-12);
            assert!(u.dot(&v).abs() < 1e-12);
            assert!(u.dot(&n).abs() < 1e-12);
            assert!((u.cross(&v) - n).norm() < 1e-12);
        }
    }

    #[test]
    fn test_plane_polyline_intersections_circle() {
        let ring = circle(64, 2.0, 1.0);
        let hits = plane_polyline_intersections(&Point3::origin(), &Vector3::y(), &ring);
        assert_eq!(hits.len(), 2);
        for h in hits {
            assert!(h.y.abs() < 1e-9);
            assert!((h.x.abs() - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_closest_point_on_polyline() {
        let ring = circle(128, 1.0, 0.0);
        let p = closest_point_on_polyline(&Point3::new(5.0, 0.0, 0.0), &ring).unwrap();
        assert!((p - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-6);
        assert!(closest_point_on_polyline(&Point3::origin(), &[]).is_none());
    }

    #[test]
    fn test_polyline_midpoint() {
        let segment = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)];
        // Closed loop of an out-and-back segment: halfway is the far end
        let mid = polyline_midpoint(&segment).unwrap();
        assert!((mid - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_circular_distance() {
        assert_eq!(circular_distance(0, 7, 8), 1);
        assert_eq!(circular_distance(2, 6, 8), 4);
        assert_eq!(circular_distance(3, 3, 8), 0);
    }
}
