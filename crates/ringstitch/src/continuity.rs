//! Continuity between stacked scaffold steps.
//!
//! The start points of a freshly built step are snapped to the end points
//! of the previous step so the two layers share nodes exactly. Each
//! distinct previous end point is claimed at most once; all segments that
//! leave the same start point move together, so increases stay split from
//! a single node.

use nalgebra::Point3;
use tracing::trace;

use crate::types::ScaffoldSegment;

/// Squared distance under which two points are the same node.
const SAME_POINT_SQ: f64 = 1e-18;

/// Snap `current` start points onto the nearest unused end point of
/// `previous`.
///
/// Segments whose start point finds no free end point pass through
/// unchanged. With an empty `previous` the input is returned as is.
pub fn enforce_continuity(
    previous: &[ScaffoldSegment],
    mut current: Vec<ScaffoldSegment>,
) -> Vec<ScaffoldSegment> {
    let targets = distinct_points(previous.iter().map(|s| s.b));
    if targets.is_empty() {
        return current;
    }
    let mut used = vec![false; targets.len()];

    let starts = distinct_points(current.iter().map(|s| s.a));
    let mut snapped = 0usize;
    for start in starts {
        let Some(target) = nearest_unused(&start, &targets, &used) else {
            continue;
        };
        used[target] = true;
        snapped += 1;
        for segment in current
            .iter_mut()
            .filter(|s| (s.a - start).norm_squared() <= SAME_POINT_SQ)
        {
            segment.a = targets[target];
        }
    }

    trace!(
        target: "ringstitch::chain",
        targets = targets.len(),
        snapped,
        "Enforced continuity"
    );
    current
}

fn distinct_points(points: impl Iterator<Item = Point3<f64>>) -> Vec<Point3<f64>> {
    let mut out: Vec<Point3<f64>> = Vec::new();
    for p in points {
        if out.iter().all(|q| (*q - p).norm_squared() > SAME_POINT_SQ) {
            out.push(p);
        }
    }
    out
}

fn nearest_unused(p: &Point3<f64>, targets: &[Point3<f64>], used: &[bool]) -> Option<usize> {
    targets
        .iter()
        .enumerate()
        .filter(|(i, _)| !used[*i])
        .min_by(|(_, a), (_, b)| {
            (**a - *p)
                .norm_squared()
                .total_cmp(&(**b - *p).norm_squared())
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: [f64; 3], b: [f64; 3]) -> ScaffoldSegment {
        ScaffoldSegment::new(Point3::from(a), Point3::from(b))
    }

    #[test]
    fn test_snaps_to_previous_ends() {
        let previous = vec![
            seg([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            seg([1.0, 0.0, 0.0], [1.0, 0.0, 1.0]),
        ];
        let current = vec![
            seg([0.05, 0.0, 1.0], [0.0, 0.0, 2.0]),
            seg([0.98, 0.0, 1.0], [1.0, 0.0, 2.0]),
        ];
        let out = enforce_continuity(&previous, current);
        assert_eq!(out[0].a, Point3::new(0.0, 0.0, 1.0));
        assert_eq!(out[1].a, Point3::new(1.0, 0.0, 1.0));
        assert_eq!(out[1].b, Point3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_each_end_used_once() {
        let previous = vec![seg([0.0, 0.0, 0.0], [0.0, 0.0, 1.0])];
        let current = vec![
            seg([0.1, 0.0, 1.0], [0.0, 0.0, 2.0]),
            seg([0.2, 0.0, 1.0], [1.0, 0.0, 2.0]),
        ];
        let out = enforce_continuity(&previous, current);
        assert_eq!(out[0].a, Point3::new(0.0, 0.0, 1.0));
        // No target left for the second start point
        assert_eq!(out[1].a, Point3::new(0.2, 0.0, 1.0));
    }

    #[test]
    fn test_split_segments_move_together() {
        let previous = vec![
            seg([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            seg([0.5, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let current = vec![
            seg([0.1, 0.0, 1.0], [0.0, 0.0, 2.0]),
            seg([0.1, 0.0, 1.0], [1.0, 0.0, 2.0]),
        ];
        let out = enforce_continuity(&previous, current);
        assert!(out.iter().all(|s| s.a == Point3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_empty_previous_passes_through() {
        let current = vec![seg([0.3, 0.0, 1.0], [0.0, 0.0, 2.0])];
        let out = enforce_continuity(&[], current.clone());
        assert_eq!(out, current);
    }
}
