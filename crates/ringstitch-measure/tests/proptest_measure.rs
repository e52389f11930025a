//! Property-based tests for anchor stabilization.
//!
//! Run with: cargo test -p ringstitch-measure -- proptest

use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use ringstitch::{LabeledLayer, Pole, PoleRole, Ring, label_layers, synthetic};
use ringstitch_measure::{MeasureBuilder, Strategy as AnchorChoice, stride_anchors};

// =============================================================================
// Strategies
// =============================================================================

fn arb_strategy() -> impl Strategy<Value = AnchorChoice> {
    prop_oneof![
        Just(AnchorChoice::Auto),
        Just(AnchorChoice::Generic),
        Just(AnchorChoice::Sideways),
        Just(AnchorChoice::Sphere),
    ]
}

/// Upright stack of rings with random radii and sideways offsets.
fn arb_stack() -> impl Strategy<Value = (Vec<LabeledLayer>, Vec<Pole>)> {
    prop::collection::vec((0.2..4.0f64, -0.5..0.5f64, -0.5..0.5f64), 2..16).prop_map(|specs| {
        let n = specs.len();
        let rings: Vec<Ring> = specs
            .into_iter()
            .enumerate()
            .map(|(i, (r, dx, dy))| {
                let z = i as f64;
                synthetic::ring_around("obj", z, Point3::new(dx, dy, z), Vector3::z(), r, 20)
            })
            .collect();
        let poles = vec![
            Pole::with_role(Point3::new(0.0, 0.0, -1.0), PoleRole::Start),
            Pole::with_role(Point3::new(0.0, 0.0, n as f64), PoleRole::End),
        ];
        (label_layers(rings, &poles), poles)
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_measure_is_idempotent(
        (layers, poles) in arb_stack(),
        strategy in arb_strategy(),
        azimuth in prop::option::of(-180.0..180.0f64),
        every in 1usize..5,
    ) {
        let run = || {
            let mut builder = MeasureBuilder::new("obj", &layers, &poles)
                .strategy(strategy)
                .measure_every(every);
            if let Some(a) = azimuth {
                builder = builder.azimuth_deg(a);
            }
            builder.build().unwrap()
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn proptest_every_ring_gets_an_anchor(
        (layers, poles) in arb_stack(),
        strategy in arb_strategy(),
    ) {
        let m = MeasureBuilder::new("obj", &layers, &poles)
            .strategy(strategy)
            .build()
            .unwrap();
        prop_assert_eq!(m.anchors.len(), layers.len());
        prop_assert_eq!(m.missing_anchors(), 0);

        let mut visited: Vec<usize> = m.anchors.iter().map(|a| a.s_index).collect();
        visited.sort_unstable();
        prop_assert_eq!(visited, (0..layers.len()).collect::<Vec<_>>());
    }

    #[test]
    fn proptest_segment_count_matches_stride(
        (layers, poles) in arb_stack(),
        every in 1usize..6,
        suppress in any::<bool>(),
    ) {
        let m = MeasureBuilder::new("obj", &layers, &poles)
            .measure_every(every)
            .suppress_pole_segments(suppress)
            .build()
            .unwrap();
        let kept = stride_anchors(&m.anchors, every).len();
        let pole_segments = if suppress { 0 } else { 2 };
        prop_assert_eq!(m.segments.len(), kept - 1 + pole_segments);
        prop_assert!(m.segments.iter().all(|s| s.value >= 0.0 && s.value.is_finite()));
    }
}
