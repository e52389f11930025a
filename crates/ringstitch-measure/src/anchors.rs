//! One anchor per ring, computed as a fold over the ring order.
//!
//! The state carried from ring to ring is the last anchor found. Each step
//! takes that state and the next ring and returns the ring's anchor. Rings
//! without an anchor leave the state untouched.
//!
//! Per ring, the first of these that succeeds wins:
//!
//! 1. a crossing of the facing plane, chosen by the strategy
//! 2. the point on the ring nearest to the previous anchor
//! 3. the arc-length midpoint of the ring's longest polyline
//!
//! A ring with no measurable polyline gets no anchor.

use nalgebra::Point3;
use ringstitch::geometry::{closest_point_on_polyline, polyline_midpoint};
use ringstitch::{LabeledLayer, Ring};
use tracing::trace;

use crate::frame::FacingFrame;
use crate::strategy::AnchorStrategy;

/// Which step of the fallback chain produced an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorSource {
    PlaneCut,
    NearestToPrevious,
    PolylineMidpoint,
}

impl AnchorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorSource::PlaneCut => "plane_cut",
            AnchorSource::NearestToPrevious => "nearest_to_previous",
            AnchorSource::PolylineMidpoint => "polyline_midpoint",
        }
    }
}

/// The anchor of one ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingAnchor {
    /// Index of the ring counted from the start pole.
    pub s_index: usize,
    /// Slicing key of the ring.
    pub key: f64,
    /// `None` when no fallback produced a point.
    pub point: Option<Point3<f64>>,
    pub source: Option<AnchorSource>,
}

impl RingAnchor {
    pub fn is_found(&self) -> bool {
        self.point.is_some()
    }
}

/// Compute anchors for every ring, in the strategy's visiting order.
///
/// Pure in its inputs: the same layers, frame and strategy always give the
/// same anchors.
pub fn stabilize_anchors(
    strategy: &dyn AnchorStrategy,
    layers: &[LabeledLayer],
    frame: &FacingFrame,
    end_pole: Option<Point3<f64>>,
) -> Vec<RingAnchor> {
    strategy
        .order(layers, frame, end_pole)
        .into_iter()
        .scan(None, |previous: &mut Option<Point3<f64>>, layer| {
            let anchor = anchor_step(strategy, frame, previous.as_ref(), layer);
            if anchor.point.is_some() {
                *previous = anchor.point;
            }
            Some(anchor)
        })
        .collect()
}

/// One step of the fold: the anchor of `layer` given the previous anchor.
pub fn anchor_step(
    strategy: &dyn AnchorStrategy,
    frame: &FacingFrame,
    previous: Option<&Point3<f64>>,
    layer: &LabeledLayer,
) -> RingAnchor {
    let candidates = frame.candidates(&layer.ring);
    let found = strategy
        .pick(&candidates, frame, previous)
        .map(|p| (p, AnchorSource::PlaneCut))
        .or_else(|| fallback_anchor(&layer.ring, previous));

    if let Some((_, source)) = found {
        if source != AnchorSource::PlaneCut {
            trace!(
                target: "ringstitch::measure",
                layer = layer.s_index,
                source = source.as_str(),
                "Anchor from fallback"
            );
        }
    }

    RingAnchor {
        s_index: layer.s_index,
        key: layer.ring.key,
        point: found.map(|(p, _)| p),
        source: found.map(|(_, s)| s),
    }
}

/// The fallback chain for a ring the facing plane does not cross.
pub fn fallback_anchor(
    ring: &Ring,
    previous: Option<&Point3<f64>>,
) -> Option<(Point3<f64>, AnchorSource)> {
    if let Some(prev) = previous {
        let nearest = ring
            .measurable_polylines()
            .filter_map(|p| closest_point_on_polyline(prev, &p.points))
            .min_by(|a, b| (*a - *prev).norm_squared().total_cmp(&(*b - *prev).norm_squared()));
        if let Some(point) = nearest {
            return Some((point, AnchorSource::NearestToPrevious));
        }
    }

    ring.measurable_polylines()
        .max_by(|a, b| a.perimeter().total_cmp(&b.perimeter()))
        .and_then(|p| polyline_midpoint(&p.points))
        .map(|p| (p, AnchorSource::PolylineMidpoint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{GenericStrategy, SphereStrategy};
    use nalgebra::Vector3;
    use ringstitch::{Polyline, label_layers, synthetic};

    fn frame() -> FacingFrame {
        FacingFrame::build(Vector3::z(), None, Some(Point3::origin()), None)
    }

    #[test]
    fn test_plane_cut_anchors_on_cylinder() {
        let stack = synthetic::cylinder("tube", 2.0, 4.0, 5, 16);
        let layers = label_layers(stack.rings, &stack.poles);
        let anchors = stabilize_anchors(&GenericStrategy, &layers, &frame(), None);

        assert_eq!(anchors.len(), 5);
        for (i, anchor) in anchors.iter().enumerate() {
            assert_eq!(anchor.s_index, i);
            assert_eq!(anchor.source, Some(AnchorSource::PlaneCut));
            let p = anchor.point.unwrap();
            assert!((p.x - 2.0).abs() < 1e-9);
            assert!(p.y.abs() < 1e-9);
        }
    }

    #[test]
    fn test_ring_off_plane_uses_previous() {
        // Second ring sits entirely at y > 0, so the y = 0 plane misses it
        let mut stack = synthetic::cylinder("tube", 1.0, 2.0, 3, 16);
        stack.rings[1] = synthetic::ring_around(
            "tube",
            stack.rings[1].key,
            Point3::new(0.0, 5.0, 1.0),
            Vector3::z(),
            1.0,
            16,
        );
        let layers = label_layers(stack.rings, &stack.poles);
        let anchors = stabilize_anchors(&GenericStrategy, &layers, &frame(), None);

        assert_eq!(anchors[0].source, Some(AnchorSource::PlaneCut));
        assert_eq!(anchors[1].source, Some(AnchorSource::NearestToPrevious));
        let p = anchors[1].point.unwrap();
        // Nearest point of the shifted ring to (1, 0, 0)
        assert!(p.y < 5.0);
        assert!((p.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_first_ring_off_plane_uses_midpoint() {
        let ring = Ring::new(
            "o",
            0.0,
            vec![
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
                Point3::new(2.0, 3.0, 0.0),
                Point3::new(0.0, 3.0, 0.0),
            ],
        );
        let (p, source) = fallback_anchor(&ring, None).unwrap();
        assert_eq!(source, AnchorSource::PolylineMidpoint);
        assert!((p - Point3::new(2.0, 3.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_empty_ring_has_no_anchor() {
        let mut ring = Ring::new("o", 0.0, vec![Point3::origin()]);
        ring.polylines.push(Polyline::new(Vec::new()));
        let layer = LabeledLayer {
            ring,
            s_index: 0,
            e_index: 0,
            t01: 0.0,
        };
        let prev = Point3::new(1.0, 0.0, 0.0);
        let anchor = anchor_step(&SphereStrategy, &frame(), Some(&prev), &layer);
        assert!(!anchor.is_found());
        assert_eq!(anchor.source, None);
    }

    #[test]
    fn test_missing_anchor_keeps_previous_state() {
        let mut stack = synthetic::cylinder("tube", 1.0, 3.0, 4, 16);
        stack.rings[1].polylines.clear();
        let layers = label_layers(stack.rings, &stack.poles);
        let anchors = stabilize_anchors(&GenericStrategy, &layers, &frame(), None);
        assert!(anchors[1].point.is_none());
        assert_eq!(anchors[2].source, Some(AnchorSource::PlaneCut));
    }
}
