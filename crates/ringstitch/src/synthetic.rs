//! Deterministic ring stacks for common primitives.
//!
//! Used by tests, benchmarks and the CLI `sample` command. Every generator
//! returns rings sampled as regular polygons plus a labeled start/end pole
//! pair.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};

use crate::geometry::plane_basis;
use crate::types::{ObjectKind, Pole, PoleRole, Ring};

/// Rings and poles of one generated object.
#[derive(Debug, Clone, PartialEq)]
pub struct RingStack {
    pub object_id: String,
    pub kind: ObjectKind,
    pub rings: Vec<Ring>,
    pub poles: Vec<Pole>,
}

/// Sphere centered at the origin, sliced along Z.
///
/// `layers` rings are spaced evenly between the poles, excluding the poles
/// themselves. The start pole is at `-Z`.
pub fn sphere(object_id: &str, radius: f64, layers: usize, segments: usize) -> RingStack {
    let step = 2.0 * radius / (layers + 1) as f64;
    let rings = (0..layers)
        .map(|i| {
            let z = -radius + step * (i + 1) as f64;
            let r = (radius * radius - z * z).max(0.0).sqrt();
            ring_around(object_id, z, Point3::new(0.0, 0.0, z), Vector3::z(), r, segments)
        })
        .collect();
    stack(
        object_id,
        ObjectKind::Sphere,
        rings,
        Point3::new(0.0, 0.0, -radius),
        Point3::new(0.0, 0.0, radius),
    )
}

/// Cone with its tip at the origin opening towards `+Z`.
///
/// The last ring is the full base. The start pole is the tip.
pub fn cone(
    object_id: &str,
    base_radius: f64,
    height: f64,
    layers: usize,
    segments: usize,
) -> RingStack {
    let rings = (0..layers)
        .map(|i| {
            let t = (i + 1) as f64 / layers as f64;
            let z = height * t;
            ring_around(
                object_id,
                z,
                Point3::new(0.0, 0.0, z),
                Vector3::z(),
                base_radius * t,
                segments,
            )
        })
        .collect();
    stack(
        object_id,
        ObjectKind::Cone,
        rings,
        Point3::origin(),
        Point3::new(0.0, 0.0, height),
    )
}

/// Upright cylinder from `z = 0` to `z = height`, end rings included.
pub fn cylinder(
    object_id: &str,
    radius: f64,
    height: f64,
    layers: usize,
    segments: usize,
) -> RingStack {
    let rings = (0..layers)
        .map(|i| {
            let z = height * fraction(i, layers);
            ring_around(object_id, z, Point3::new(0.0, 0.0, z), Vector3::z(), radius, segments)
        })
        .collect();
    stack(
        object_id,
        ObjectKind::Generic,
        rings,
        Point3::origin(),
        Point3::new(0.0, 0.0, height),
    )
}

/// Cylinder lying on the `z = 0` plane with its axis along `+X`.
///
/// Slicing keys are X coordinates.
pub fn lying_cylinder(
    object_id: &str,
    radius: f64,
    length: f64,
    layers: usize,
    segments: usize,
) -> RingStack {
    let rings = (0..layers)
        .map(|i| {
            let x = length * fraction(i, layers);
            ring_around(object_id, x, Point3::new(x, 0.0, radius), Vector3::x(), radius, segments)
        })
        .collect();
    stack(
        object_id,
        ObjectKind::Generic,
        rings,
        Point3::new(0.0, 0.0, radius),
        Point3::new(length, 0.0, radius),
    )
}

/// Position of layer `i` of `layers` in `[0, 1]`, ends included.
fn fraction(i: usize, layers: usize) -> f64 {
    if layers > 1 {
        i as f64 / (layers - 1) as f64
    } else {
        0.0
    }
}

/// Regular polygon with `segments` corners around `axis`.
pub fn ring_around(
    object_id: &str,
    key: f64,
    center: Point3<f64>,
    axis: Vector3<f64>,
    radius: f64,
    segments: usize,
) -> Ring {
    let segments = segments.max(3);
    let (u, v) = plane_basis(&axis);
    let points = (0..segments)
        .map(|i| {
            let a = TAU * i as f64 / segments as f64;
            center + (u * a.cos() + v * a.sin()) * radius
        })
        .collect();
    Ring::new(object_id, key, points)
}

fn stack(
    object_id: &str,
    kind: ObjectKind,
    rings: Vec<Ring>,
    start: Point3<f64>,
    end: Point3<f64>,
) -> RingStack {
    let provenance = format!("synthetic:{}", kind.as_str());
    let rings = rings
        .into_iter()
        .map(|mut r| {
            r.kind = kind;
            r.provenance = Some(provenance.clone());
            r
        })
        .collect();
    RingStack {
        object_id: object_id.to_string(),
        kind,
        rings,
        poles: vec![
            Pole::with_role(start, PoleRole::Start).for_object(object_id),
            Pole::with_role(end, PoleRole::End).for_object(object_id),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_rings_inside() {
        let s = sphere("ball", 3.0, 5, 24);
        assert_eq!(s.rings.len(), 5);
        assert_eq!(s.kind, ObjectKind::Sphere);
        for ring in &s.rings {
            for p in &ring.polylines[0].points {
                assert!((p.coords.norm() - 3.0).abs() < 1e-9);
            }
        }
        // Equator ring is the widest
        assert!(s.rings[2].radius() > s.rings[0].radius());
    }

    #[test]
    fn test_cone_grows_to_base() {
        let c = cone("hat", 4.0, 8.0, 4, 32);
        let radii: Vec<f64> = c.rings.iter().map(Ring::radius).collect();
        assert!(radii.windows(2).all(|w| w[1] > w[0]));
        assert!((c.rings[3].key - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_lying_cylinder_axis() {
        let l = lying_cylinder("log", 1.0, 10.0, 6, 16);
        assert_eq!(l.rings[5].key, 10.0);
        for p in &l.rings[2].polylines[0].points {
            assert!((p.x - 4.0).abs() < 1e-9);
            assert!(p.z >= -1e-9);
        }
        assert_eq!(l.poles[0].role, Some(PoleRole::Start));
    }

    #[test]
    fn test_single_layer_and_min_segments() {
        let c = cylinder("puck", 1.0, 2.0, 1, 2);
        assert_eq!(c.rings.len(), 1);
        assert_eq!(c.rings[0].key, 0.0);
        assert_eq!(c.rings[0].point_count(), 3);
    }
}
