//! Ordering and labeling of an object's ring stack.

use tracing::debug;

use crate::types::{LabeledLayer, Pole, PoleRole, Ring, pole_position};

/// Sort rings along the pole axis and label them.
///
/// Rings are sorted by slicing key. When a start pole is known, the order
/// is reversed unless the first ring is strictly closer to it than the
/// last, so `s_index == 0` is always the ring nearest the start pole.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use ringstitch::{Pole, PoleRole, Ring, label_layers};
///
/// let ring = |z: f64| Ring::new("obj", z, vec![Point3::new(1.0, 0.0, z), Point3::new(-1.0, 0.0, z)]);
/// let poles = vec![Pole::with_role(Point3::new(0.0, 0.0, 10.0), PoleRole::Start)];
/// let layers = label_layers(vec![ring(0.0), ring(5.0), ring(9.0)], &poles);
///
/// assert_eq!(layers[0].ring.key, 9.0);
/// assert_eq!(layers[0].e_index, 2);
/// assert_eq!(layers[2].t01, 1.0);
/// ```
pub fn label_layers(mut rings: Vec<Ring>, poles: &[Pole]) -> Vec<LabeledLayer> {
    rings.sort_by(|a, b| a.key.total_cmp(&b.key));

    if rings.len() >= 2 && should_reverse(&rings, poles) {
        rings.reverse();
    }

    let count = rings.len();
    let layers: Vec<LabeledLayer> = rings
        .into_iter()
        .enumerate()
        .map(|(position, ring)| LabeledLayer {
            ring,
            s_index: position,
            e_index: count - 1 - position,
            t01: if count > 1 {
                position as f64 / (count - 1) as f64
            } else {
                0.0
            },
        })
        .collect();

    debug!(
        target: "ringstitch::layers",
        count,
        first_key = layers.first().map(|l| l.ring.key),
        last_key = layers.last().map(|l| l.ring.key),
        "Labeled ring stack"
    );
    layers
}

fn should_reverse(sorted: &[Ring], poles: &[Pole]) -> bool {
    let Some(start) = pole_position(poles, PoleRole::Start) else {
        return false;
    };
    let (Some(first), Some(last)) = (
        sorted.first().and_then(Ring::midpoint),
        sorted.last().and_then(Ring::midpoint),
    ) else {
        return false;
    };
    let d_first = (first - start).norm_squared();
    let d_last = (last - start).norm_squared();
    d_first >= d_last
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn ring(z: f64) -> Ring {
        Ring::new(
            "obj",
            z,
            vec![
                Point3::new(1.0, 0.0, z),
                Point3::new(0.0, 1.0, z),
                Point3::new(-1.0, 0.0, z),
                Point3::new(0.0, -1.0, z),
            ],
        )
    }

    #[test]
    fn test_natural_order_without_poles() {
        let layers = label_layers(vec![ring(3.0), ring(1.0), ring(2.0)], &[]);
        let keys: Vec<f64> = layers.iter().map(|l| l.ring.key).collect();
        assert_eq!(keys, vec![1.0, 2.0, 3.0]);
        assert_eq!(layers[0].s_index, 0);
        assert_eq!(layers[0].e_index, 2);
        assert_eq!(layers[1].t01, 0.5);
    }

    #[test]
    fn test_reversed_when_start_near_last() {
        let poles = vec![Pole::with_role(Point3::new(0.0, 0.0, 4.0), PoleRole::Start)];
        let layers = label_layers(vec![ring(1.0), ring(2.0), ring(3.0)], &poles);
        let keys: Vec<f64> = layers.iter().map(|l| l.ring.key).collect();
        assert_eq!(keys, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_kept_when_start_near_first() {
        let poles = vec![Pole::with_role(Point3::new(0.0, 0.0, 0.0), PoleRole::Start)];
        let layers = label_layers(vec![ring(3.0), ring(1.0), ring(2.0)], &poles);
        assert_eq!(layers[0].ring.key, 1.0);
    }

    #[test]
    fn test_single_ring() {
        let layers = label_layers(vec![ring(1.0)], &[]);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].t01, 0.0);
        assert_eq!(layers[0].e_index, 0);
    }

    #[test]
    fn test_empty() {
        assert!(label_layers(Vec::new(), &[]).is_empty());
    }
}
