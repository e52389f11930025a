use nalgebra::Point3;
use ringstitch::{LabeledLayer, Ring};
use tracing::debug;

use super::{AnchorStrategy, most_forward, nearest_to};
use crate::config::Strategy;
use crate::frame::{FacingFrame, measurable_midpoint};

/// Share of the pole-to-pole span, measured from the start pole, in which
/// the starting ring is searched.
pub const START_WINDOW_FRACTION: f64 = 0.4;

/// Relative perimeter difference below which two rings count as equal
/// and the one nearer the start pole wins.
const PERIMETER_TIE: f64 = 1e-9;

/// Stacks lying on their side.
///
/// Slicing keys of a horizontal stack often do not run from the start pole,
/// so the walk starts at the smallest ring near the start pole instead of
/// at layer 0. When no ring lies inside [`START_WINDOW_FRACTION`] of the
/// span, the ring nearest to the start pole is used. The remaining rings
/// follow in order of their axial position. Each anchor is the crossing
/// closest to the previous anchor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidewaysStrategy;

impl AnchorStrategy for SidewaysStrategy {
    fn kind(&self) -> Strategy {
        Strategy::Sideways
    }

    fn order<'a>(
        &self,
        layers: &'a [LabeledLayer],
        frame: &FacingFrame,
        end_pole: Option<Point3<f64>>,
    ) -> Vec<&'a LabeledLayer> {
        let start = frame.origin;
        let located: Vec<(&LabeledLayer, Point3<f64>)> = layers
            .iter()
            .filter_map(|l| measurable_midpoint(&l.ring).map(|m| (l, m)))
            .collect();
        if located.is_empty() {
            return layers.iter().collect();
        }

        let distance = |m: &Point3<f64>| (*m - start).norm();
        let span = match end_pole {
            Some(end) => (end - start).norm(),
            None => located.iter().map(|(_, m)| distance(m)).fold(0.0, f64::max),
        };
        let window = START_WINDOW_FRACTION * span;

        let in_window = located
            .iter()
            .filter(|(_, m)| distance(m) <= window)
            .min_by(|a, b| {
                let pa = measurable_perimeter(&a.0.ring);
                let pb = measurable_perimeter(&b.0.ring);
                if (pa - pb).abs() <= PERIMETER_TIE * pa.max(pb) {
                    distance(&a.1).total_cmp(&distance(&b.1))
                } else {
                    pa.total_cmp(&pb)
                }
            });
        let first = match in_window {
            Some(found) => found.0,
            None => {
                debug!(
                    target: "ringstitch::measure",
                    window,
                    "No ring near the start pole, starting from the nearest ring"
                );
                match located
                    .iter()
                    .min_by(|a, b| distance(&a.1).total_cmp(&distance(&b.1)))
                {
                    Some(nearest) => nearest.0,
                    None => return layers.iter().collect(),
                }
            }
        };

        let axial_of = |layer: &LabeledLayer| {
            measurable_midpoint(&layer.ring)
                .map(|m| frame.axial(&m))
                .unwrap_or(f64::INFINITY)
        };
        let mut rest: Vec<&LabeledLayer> = layers
            .iter()
            .filter(|l| l.s_index != first.s_index)
            .collect();
        rest.sort_by(|a, b| axial_of(a).total_cmp(&axial_of(b)));

        let mut ordered = Vec::with_capacity(layers.len());
        ordered.push(first);
        ordered.extend(rest);
        ordered
    }

    fn pick(
        &self,
        candidates: &[Point3<f64>],
        frame: &FacingFrame,
        previous: Option<&Point3<f64>>,
    ) -> Option<Point3<f64>> {
        match previous {
            Some(prev) => nearest_to(candidates, prev),
            None => most_forward(candidates, frame),
        }
    }
}

fn measurable_perimeter(ring: &Ring) -> f64 {
    ring.measurable_polylines().map(|p| p.perimeter()).sum()
}
