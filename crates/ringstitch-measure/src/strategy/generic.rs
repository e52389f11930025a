use nalgebra::Point3;

use super::{AnchorStrategy, most_forward, nearest_to};
use crate::config::Strategy;
use crate::frame::FacingFrame;

/// Upright stacks: rings in layer order, anchors on the forward half of
/// the cutting plane.
///
/// The first anchor is the most forward crossing. Later anchors take the
/// forward-side crossing closest to the previous anchor, so a ring that
/// crosses the plane several times on the same side does not make the
/// anchor line zig-zag. A ring with crossings only behind the axis still
/// gets one of those.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericStrategy;

impl AnchorStrategy for GenericStrategy {
    fn kind(&self) -> Strategy {
        Strategy::Generic
    }

    fn pick(
        &self,
        candidates: &[Point3<f64>],
        frame: &FacingFrame,
        previous: Option<&Point3<f64>>,
    ) -> Option<Point3<f64>> {
        let front: Vec<Point3<f64>> = candidates
            .iter()
            .copied()
            .filter(|p| frame.forward_offset(p) >= 0.0)
            .collect();
        let pool = if front.is_empty() { candidates } else { &front };

        match previous {
            Some(prev) => nearest_to(pool, prev),
            None => most_forward(pool, frame),
        }
    }
}
