//! Measurement segments between consecutive anchors and the poles.

use nalgebra::{Point3, Vector3};
use tracing::trace;

use crate::anchors::RingAnchor;
use crate::config::DistanceMode;

/// Where a segment starts and ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    PoleToAnchor,
    AnchorToAnchor,
    AnchorToPole,
}

/// One measured line of the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSegment {
    pub object_id: String,
    /// `start→3`, `3→5`, `9→end`: ring indices counted from the start pole.
    pub label: String,
    /// Length under the object's distance mode.
    pub value: f64,
    pub a: Point3<f64>,
    pub b: Point3<f64>,
    pub kind: SegmentKind,
}

/// Everything segment synthesis needs besides the anchors.
#[derive(Debug, Clone, Copy)]
pub struct SegmentContext<'a> {
    pub object_id: &'a str,
    pub axis: Vector3<f64>,
    pub mode: DistanceMode,
    pub start_pole: Option<Point3<f64>>,
    pub end_pole: Option<Point3<f64>>,
    pub include_poles: bool,
    pub snap_epsilon: f64,
}

/// Length of `a→b`: straight, or along the unit `axis` only.
pub fn segment_value(
    a: &Point3<f64>,
    b: &Point3<f64>,
    mode: DistanceMode,
    axis: &Vector3<f64>,
) -> f64 {
    match mode {
        DistanceMode::Euclidean => (*b - *a).norm(),
        DistanceMode::AxisProjected => (*b - *a).dot(axis).abs(),
    }
}

/// Found anchors thinned to every `every`-th one, the last always kept.
///
/// A stride of 0 is treated as 1.
pub fn stride_anchors(anchors: &[RingAnchor], every: usize) -> Vec<&RingAnchor> {
    let every = every.max(1);
    let found: Vec<&RingAnchor> = anchors.iter().filter(|a| a.is_found()).collect();
    let last = found.len().saturating_sub(1);
    found
        .into_iter()
        .enumerate()
        .filter(|(i, _)| i % every == 0 || *i == last)
        .map(|(_, a)| a)
        .collect()
}

/// Segments along the given anchors, plus pole segments at both ends.
///
/// Anchors without a point are skipped. The last anchor always connects to
/// the end pole. When it already lies within `snap_epsilon` of the pole the
/// segment is still emitted, with a near-zero value.
pub fn build_segments(ctx: &SegmentContext<'_>, anchors: &[&RingAnchor]) -> Vec<MeasurementSegment> {
    let points: Vec<(usize, Point3<f64>)> = anchors
        .iter()
        .filter_map(|a| a.point.map(|p| (a.s_index, p)))
        .collect();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };

    let segment = |label: String, a: Point3<f64>, b: Point3<f64>, kind: SegmentKind| {
        MeasurementSegment {
            object_id: ctx.object_id.to_string(),
            label,
            value: segment_value(&a, &b, ctx.mode, &ctx.axis),
            a,
            b,
            kind,
        }
    };

    let mut segments = Vec::with_capacity(points.len() + 1);
    if ctx.include_poles {
        if let Some(start) = ctx.start_pole {
            segments.push(segment(
                format!("start→{}", first.0),
                start,
                first.1,
                SegmentKind::PoleToAnchor,
            ));
        }
    }

    segments.extend(points.windows(2).map(|pair| {
        segment(
            format!("{}→{}", pair[0].0, pair[1].0),
            pair[0].1,
            pair[1].1,
            SegmentKind::AnchorToAnchor,
        )
    }));

    if ctx.include_poles {
        if let Some(end) = ctx.end_pole {
            if (end - last.1).norm() <= ctx.snap_epsilon {
                trace!(
                    target: "ringstitch::measure",
                    object = ctx.object_id,
                    "Last anchor already on the end pole"
                );
            }
            segments.push(segment(
                format!("{}→end", last.0),
                last.1,
                end,
                SegmentKind::AnchorToPole,
            ));
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::AnchorSource;

    fn anchor(s_index: usize, z: f64) -> RingAnchor {
        RingAnchor {
            s_index,
            key: z,
            point: Some(Point3::new(1.0, 0.0, z)),
            source: Some(AnchorSource::PlaneCut),
        }
    }

    fn ctx(mode: DistanceMode, include_poles: bool) -> SegmentContext<'static> {
        SegmentContext {
            object_id: "tube",
            axis: Vector3::z(),
            mode,
            start_pole: Some(Point3::origin()),
            end_pole: Some(Point3::new(0.0, 0.0, 4.0)),
            include_poles,
            snap_epsilon: 1e-3,
        }
    }

    #[test]
    fn test_segment_values() {
        let a = Point3::origin();
        let b = Point3::new(3.0, 0.0, 4.0);
        assert_eq!(segment_value(&a, &b, DistanceMode::Euclidean, &Vector3::z()), 5.0);
        assert_eq!(segment_value(&a, &b, DistanceMode::AxisProjected, &Vector3::z()), 4.0);
        assert_eq!(segment_value(&b, &a, DistanceMode::AxisProjected, &Vector3::z()), 4.0);
    }

    #[test]
    fn test_stride_keeps_last() {
        let anchors: Vec<RingAnchor> = (0..7).map(|i| anchor(i, i as f64)).collect();
        let kept: Vec<usize> = stride_anchors(&anchors, 3).iter().map(|a| a.s_index).collect();
        assert_eq!(kept, vec![0, 3, 6]);
        let kept: Vec<usize> = stride_anchors(&anchors, 4).iter().map(|a| a.s_index).collect();
        assert_eq!(kept, vec![0, 4, 6]);
    }

    #[test]
    fn test_stride_skips_missing() {
        let mut anchors: Vec<RingAnchor> = (0..4).map(|i| anchor(i, i as f64)).collect();
        anchors[1].point = None;
        let kept: Vec<usize> = stride_anchors(&anchors, 1).iter().map(|a| a.s_index).collect();
        assert_eq!(kept, vec![0, 2, 3]);
    }

    #[test]
    fn test_segments_with_poles() {
        let anchors: Vec<RingAnchor> = (0..3).map(|i| anchor(i, 1.0 + i as f64)).collect();
        let refs: Vec<&RingAnchor> = anchors.iter().collect();
        let segments = build_segments(&ctx(DistanceMode::AxisProjected, true), &refs);

        let labels: Vec<&str> = segments.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["start→0", "0→1", "1→2", "2→end"]);
        assert_eq!(segments[0].kind, SegmentKind::PoleToAnchor);
        assert_eq!(segments[3].kind, SegmentKind::AnchorToPole);
        let total: f64 = segments.iter().map(|s| s.value).sum();
        assert!((total - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_suppressed_pole_segments() {
        let anchors: Vec<RingAnchor> = (0..3).map(|i| anchor(i, 1.0 + i as f64)).collect();
        let refs: Vec<&RingAnchor> = anchors.iter().collect();
        let segments = build_segments(&ctx(DistanceMode::Euclidean, false), &refs);
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.kind == SegmentKind::AnchorToAnchor));
    }

    #[test]
    fn test_no_anchors_no_segments() {
        assert!(build_segments(&ctx(DistanceMode::Euclidean, true), &[]).is_empty());
    }
}
