//! Placement of stitch nodes around a ring.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};

use crate::geometry::{normalize_or, plane_basis};
use crate::types::{Handedness, Node};

/// Place `count` nodes evenly on the circle of `radius` around `center`,
/// in the plane perpendicular to `axis`.
///
/// Node `i` sits at angle `±i·2π/count`, negative for
/// [`Handedness::Left`]. The in-plane basis comes from
/// [`plane_basis`], so equal inputs always give equal positions.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use ringstitch::{Handedness, distribute_nodes};
///
/// let nodes = distribute_nodes(4, Point3::origin(), Vector3::z(), 2.0, Handedness::Right);
/// assert_eq!(nodes.len(), 4);
/// assert!((nodes[0].position.coords.norm() - 2.0).abs() < 1e-12);
/// ```
pub fn distribute_nodes(
    count: usize,
    center: Point3<f64>,
    axis: Vector3<f64>,
    radius: f64,
    handedness: Handedness,
) -> Vec<Node> {
    if count == 0 {
        return Vec::new();
    }
    let (u, v) = plane_basis(&axis);
    let step = handedness.sign() * TAU / count as f64;

    (0..count)
        .map(|i| {
            let angle = step * i as f64;
            Node {
                position: center + (u * angle.cos() + v * angle.sin()) * radius,
                angle,
            }
        })
        .collect()
}

/// Azimuth of `point` around `axis` through `center`, in `(-π, π]`.
///
/// Uses the same basis as [`distribute_nodes`], so the angle of a placed
/// node is recovered up to a multiple of 2π.
pub fn azimuth_of(point: &Point3<f64>, center: &Point3<f64>, axis: &Vector3<f64>) -> f64 {
    let (u, v) = plane_basis(axis);
    let n = normalize_or(*axis, Vector3::z());
    let offset = *point - *center;
    let in_plane = offset - n * offset.dot(&n);
    in_plane.dot(&v).atan2(in_plane.dot(&u))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn wrapped_diff(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn test_nodes_on_circle() {
        let center = Point3::new(1.0, -2.0, 3.0);
        let axis = Vector3::new(0.3, 0.4, 1.0);
        let nodes = distribute_nodes(9, center, axis, 1.5, Handedness::Right);
        let n = axis.normalize();
        for node in &nodes {
            let offset = node.position - center;
            assert!((offset.norm() - 1.5).abs() < 1e-9);
            assert!(offset.dot(&n).abs() < 1e-9);
        }
    }

    #[test]
    fn test_azimuth_round_trip() {
        let center = Point3::new(0.0, 5.0, 0.0);
        for axis in [Vector3::z(), Vector3::x(), Vector3::new(-1.0, 2.0, 0.5)] {
            for count in [3, 7, 16] {
                let nodes = distribute_nodes(count, center, axis, 2.0, Handedness::Right);
                for (i, node) in nodes.iter().enumerate() {
                    let recovered = azimuth_of(&node.position, &center, &axis);
                    let expected = TAU * i as f64 / count as f64;
                    assert!(wrapped_diff(recovered, expected) < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_left_handed_mirrors_angles() {
        let right = distribute_nodes(4, Point3::origin(), Vector3::z(), 1.0, Handedness::Right);
        let left = distribute_nodes(4, Point3::origin(), Vector3::z(), 1.0, Handedness::Left);
        assert!((right[1].angle - PI / 2.0).abs() < 1e-12);
        assert!((left[1].angle + PI / 2.0).abs() < 1e-12);
        assert!((right[1].position - left[3].position).norm() < 1e-12);
    }

    #[test]
    fn test_zero_count() {
        assert!(distribute_nodes(0, Point3::origin(), Vector3::z(), 1.0, Handedness::Right).is_empty());
    }
}
