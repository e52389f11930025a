use nalgebra::Point3;

use super::{AnchorStrategy, most_forward};
use crate::config::Strategy;
use crate::frame::FacingFrame;

/// Round objects: the most forward crossing of the fixed azimuth plane.
///
/// The previous anchor is ignored here; it only matters in the fallback
/// chain when a ring does not cross the plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphereStrategy;

impl AnchorStrategy for SphereStrategy {
    fn kind(&self) -> Strategy {
        Strategy::Sphere
    }

    fn pick(
        &self,
        candidates: &[Point3<f64>],
        frame: &FacingFrame,
        _previous: Option<&Point3<f64>>,
    ) -> Option<Point3<f64>> {
        most_forward(candidates, frame)
    }
}
