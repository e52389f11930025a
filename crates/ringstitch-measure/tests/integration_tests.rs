//! End-to-end tests for anchor stabilization.

use nalgebra::{Point3, Vector3};
use ringstitch::{Pole, PoleRole, Ring, label_layers, resolve_poles, synthetic};
use ringstitch_measure::{
    AnchorSource, DistanceMode, MeasureBuilder, MeasureConfig, SegmentKind, Strategy,
    measure_scene,
};

fn log_ring(x: f64, radius: f64) -> Ring {
    synthetic::ring_around("log", x, Point3::new(x, 0.0, 1.0), Vector3::x(), radius, 24)
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn test_scenario_sideways_nearest_ring_fallback() {
    // Span 10, window 4: every ring is farther than that from the start pole
    let rings = vec![
        log_ring(5.0, 1.0),
        log_ring(6.0, 1.2),
        log_ring(7.0, 1.1),
        log_ring(8.0, 0.3),
    ];
    let poles = vec![
        Pole::with_role(Point3::new(0.0, 0.0, 1.0), PoleRole::Start),
        Pole::with_role(Point3::new(10.0, 0.0, 1.0), PoleRole::End),
    ];
    let layers = label_layers(rings, &poles);
    let m = MeasureBuilder::new("log", &layers, &poles).build().unwrap();

    assert_eq!(m.strategy, Strategy::Sideways);
    assert_eq!(m.anchors[0].key, 5.0);
    let keys: Vec<f64> = m.anchors.iter().map(|a| a.key).collect();
    assert_eq!(keys, vec![5.0, 6.0, 7.0, 8.0]);
}

#[test]
fn test_sideways_starts_at_smallest_ring_near_pole() {
    let rings = vec![log_ring(1.0, 1.0), log_ring(3.0, 0.4), log_ring(6.0, 1.0)];
    let poles = vec![
        Pole::with_role(Point3::new(0.0, 0.0, 1.0), PoleRole::Start),
        Pole::with_role(Point3::new(10.0, 0.0, 1.0), PoleRole::End),
    ];
    let layers = label_layers(rings, &poles);
    let m = MeasureBuilder::new("log", &layers, &poles).build().unwrap();

    let keys: Vec<f64> = m.anchors.iter().map(|a| a.key).collect();
    assert_eq!(keys, vec![3.0, 1.0, 6.0]);
    assert_eq!(m.segments[0].label, "start→1");
}

#[test]
fn test_measurement_is_idempotent() {
    let hat = synthetic::cone("hat", 3.0, 5.0, 8, 40);
    let layers = label_layers(hat.rings, &hat.poles);
    let run = || {
        MeasureBuilder::new("hat", &layers, &hat.poles)
            .measure_every(3)
            .build()
            .unwrap()
    };
    let first = run();
    assert_eq!(first, run());
    assert_eq!(first.strategy, Strategy::Generic);
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn test_unlabeled_poles_resolved_before_measuring() {
    let tube = synthetic::cylinder("tube", 1.0, 5.0, 6, 32);
    let raw = vec![
        Pole::new(Point3::new(0.0, 0.0, 5.0)),
        Pole::new(Point3::origin()),
    ];
    let poles = resolve_poles(&raw, &tube.rings);
    let layers = label_layers(tube.rings, &poles);
    let m = MeasureBuilder::new("tube", &layers, &poles).build().unwrap();

    let first = m.segments.first().unwrap();
    assert_eq!(first.kind, SegmentKind::PoleToAnchor);
    assert_eq!(first.a, Point3::origin());
    assert!((m.total_length() - 5.0).abs() < 1e-9);
}

#[test]
fn test_chain_start_fragments_are_measured() {
    let mut tube = synthetic::cylinder("tube", 1.0, 4.0, 5, 32);
    for polyline in &mut tube.rings[2].polylines {
        polyline.chain_start = true;
    }
    let layers = label_layers(tube.rings, &tube.poles);
    let m = MeasureBuilder::new("tube", &layers, &tube.poles).build().unwrap();
    assert_eq!(m.missing_anchors(), 0);
    assert_eq!(m.anchors[2].source, Some(AnchorSource::PlaneCut));
}

#[test]
fn test_scene_with_custom_up() {
    // Y-up scene: the upright cylinder along Z now lies sideways
    let tube = synthetic::cylinder("tube", 1.0, 4.0, 5, 32);
    let results =
        measure_scene(tube.rings, &tube.poles, &MeasureConfig::default(), Vector3::y()).unwrap();
    assert_eq!(results[0].strategy, Strategy::Sideways);
}

#[test]
fn test_sphere_forced_axis_projection() {
    let ball = synthetic::sphere("ball", 2.0, 7, 32);
    let config = MeasureConfig {
        distance_mode: Some(DistanceMode::AxisProjected),
        ..Default::default()
    };
    let results = measure_scene(ball.rings, &ball.poles, &config, Vector3::z()).unwrap();
    // Projected onto the axis the segments add up to the diameter
    assert!((results[0].total_length() - 4.0).abs() < 1e-9);
}

#[cfg(feature = "config")]
#[test]
fn test_config_file_drives_measurement() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "measure_every = 2\nsuppress_pole_segments = true\nstrategy = \"generic\""
    )
    .unwrap();
    let config = MeasureConfig::from_toml_file(file.path()).unwrap();

    let tube = synthetic::cylinder("tube", 1.0, 4.0, 5, 32);
    let results = measure_scene(tube.rings, &tube.poles, &config, Vector3::z()).unwrap();
    let labels: Vec<&str> = results[0].segments.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["0→2", "2→4"]);
}
