//! The facing frame: one cutting plane per object.
//!
//! Anchors are found by cutting every ring with the same plane, the one
//! spanned by the object axis and a fixed forward direction. Building the
//! frame once and reusing it is what keeps anchors from jumping around
//! the ring from one layer to the next.

use nalgebra::{Point3, Vector3};
use ringstitch::Ring;
use ringstitch::geometry::{
    mean_point, normalize_or, plane_basis, plane_polyline_intersections, reject,
};

/// Axis, forward direction and cutting plane of one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacingFrame {
    /// Point the plane passes through, normally the start pole.
    pub origin: Point3<f64>,
    /// Unit object axis, start to end.
    pub axis: Vector3<f64>,
    /// Unit direction perpendicular to the axis that anchors face.
    pub forward: Vector3<f64>,
    /// Unit normal of the cutting plane, `axis × forward`.
    pub plane_normal: Vector3<f64>,
}

impl FacingFrame {
    /// Build the frame for an object.
    ///
    /// With `azimuth_deg` the forward direction is the in-plane reference
    /// direction of [`plane_basis`] rotated by that angle around the axis.
    /// Without it, forward points from the start pole towards the first
    /// ring's midpoint. When that direction has no component across the
    /// axis (rings centered on the axis) the reference direction is used.
    ///
    /// The origin is the start pole, else the first ring midpoint, else the
    /// coordinate origin.
    pub fn build(
        axis: Vector3<f64>,
        first_ring_midpoint: Option<Point3<f64>>,
        start_pole: Option<Point3<f64>>,
        azimuth_deg: Option<f64>,
    ) -> Self {
        let axis = normalize_or(axis, Vector3::z());
        let origin = start_pole
            .or(first_ring_midpoint)
            .unwrap_or_else(Point3::origin);
        let (u, v) = plane_basis(&axis);

        let forward = match azimuth_deg {
            Some(degrees) => {
                let a = degrees.to_radians();
                u * a.cos() + v * a.sin()
            }
            None => match first_ring_midpoint {
                Some(mid) => normalize_or(reject(&(mid - origin), &axis), u),
                None => u,
            },
        };

        Self {
            origin,
            axis,
            forward,
            plane_normal: axis.cross(&forward),
        }
    }

    /// Signed distance of `p` along the axis from the origin.
    #[inline]
    pub fn axial(&self, p: &Point3<f64>) -> f64 {
        (*p - self.origin).dot(&self.axis)
    }

    /// Signed distance of `p` along the forward direction.
    #[inline]
    pub fn forward_offset(&self, p: &Point3<f64>) -> f64 {
        (*p - self.origin).dot(&self.forward)
    }

    /// Azimuth of the forward direction in degrees, in `(-180, 180]`.
    pub fn azimuth_deg(&self) -> f64 {
        let (u, v) = plane_basis(&self.axis);
        self.forward.dot(&v).atan2(self.forward.dot(&u)).to_degrees()
    }

    /// Points where the cutting plane crosses the ring's measurable
    /// polylines.
    pub fn candidates(&self, ring: &Ring) -> Vec<Point3<f64>> {
        ring.measurable_polylines()
            .flat_map(|p| plane_polyline_intersections(&self.origin, &self.plane_normal, &p.points))
            .collect()
    }
}

/// Mean of all measurable points of a ring.
///
/// Unlike [`Ring::midpoint`] this includes chain-start fragments, which
/// are skipped for planning but still measured.
pub fn measurable_midpoint(ring: &Ring) -> Option<Point3<f64>> {
    mean_point(ring.measurable_polylines().flat_map(|p| p.points.iter()))
}
