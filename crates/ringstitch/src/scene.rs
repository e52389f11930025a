//! Scene-level planning: many objects in one flat ring list.
//!
//! Rings and poles are grouped by object id into a map that lives only for
//! the duration of the call. Each object is prepared and planned
//! independently, so objects are processed in parallel with rayon.
//! Results are sorted by object id.

use hashbrown::HashMap;
use rayon::prelude::*;
use tracing::debug;

use crate::chain::{ChainPlan, ChainPlanner};
use crate::config::PlanConfig;
use crate::error::{StitchError, StitchResult};
use crate::layers::label_layers;
use crate::poles::{poles_for_object, resolve_poles};
use crate::tracing_ext::{OperationTimer, log_stack_stats};
use crate::types::{LabeledLayer, ObjectKind, Pole, Ring};

/// One object's labeled layers and resolved poles.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectStack {
    pub object_id: String,
    pub kind: ObjectKind,
    pub layers: Vec<LabeledLayer>,
    pub poles: Vec<Pole>,
}

/// Group rings by object, resolve each object's poles and label its layers.
///
/// # Errors
///
/// Returns [`StitchError::InvalidCoordinate`] for a ring or pole with a
/// non-finite coordinate.
pub fn prepare_scene(rings: Vec<Ring>, poles: &[Pole]) -> StitchResult<Vec<ObjectStack>> {
    for ring in &rings {
        ring.validate()?;
    }
    for (i, pole) in poles.iter().enumerate() {
        if let Some(bad) = pole.position.coords.iter().find(|c| !c.is_finite()) {
            return Err(StitchError::invalid_coordinate(format!("pole {}", i), *bad));
        }
    }
    log_stack_stats(&rings, "scene");

    let mut groups: HashMap<String, Vec<Ring>> = HashMap::new();
    for ring in rings {
        groups.entry(ring.object_id.clone()).or_default().push(ring);
    }

    let mut stacks: Vec<ObjectStack> = groups
        .into_iter()
        .map(|(object_id, rings)| {
            let kind = rings.first().map(|r| r.kind).unwrap_or_default();
            let resolved = resolve_poles(&poles_for_object(poles, &object_id), &rings);
            let layers = label_layers(rings, &resolved);
            ObjectStack {
                object_id,
                kind,
                layers,
                poles: resolved,
            }
        })
        .collect();
    stacks.sort_by(|a, b| a.object_id.cmp(&b.object_id));

    debug!(
        target: "ringstitch::scene",
        objects = stacks.len(),
        "Prepared scene"
    );
    Ok(stacks)
}

/// Plan every object of a scene.
///
/// # Errors
///
/// Fails on invalid input coordinates or an invalid configuration.
pub fn plan_scene(
    rings: Vec<Ring>,
    poles: &[Pole],
    config: &PlanConfig,
) -> StitchResult<Vec<ChainPlan>> {
    let _timer = OperationTimer::new("plan_scene");
    config.validate()?;
    let stacks = prepare_scene(rings, poles)?;
    let planner = ChainPlanner::new(config.clone());

    stacks
        .par_iter()
        .map(|stack| planner.plan(&stack.object_id, &stack.layers, &stack.poles))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;
    use crate::types::PoleRole;
    use nalgebra::Point3;

    fn scene() -> (Vec<Ring>, Vec<Pole>) {
        let ball = synthetic::sphere("ball", 2.0, 6, 32);
        let hat = synthetic::cone("hat", 3.0, 4.0, 5, 32);
        let mut rings = hat.rings;
        rings.extend(ball.rings);
        let mut poles = hat.poles;
        poles.extend(ball.poles);
        (rings, poles)
    }

    #[test]
    fn test_prepare_groups_by_object() {
        let (rings, poles) = scene();
        let stacks = prepare_scene(rings, &poles).unwrap();
        let ids: Vec<&str> = stacks.iter().map(|s| s.object_id.as_str()).collect();
        assert_eq!(ids, vec!["ball", "hat"]);
        assert_eq!(stacks[0].layers.len(), 6);
        assert_eq!(stacks[0].kind, ObjectKind::Sphere);
        assert_eq!(stacks[1].poles.len(), 2);
    }

    #[test]
    fn test_plan_scene_sorted_and_complete() {
        let (rings, poles) = scene();
        let plans = plan_scene(rings, &poles, &PlanConfig::default()).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].object_id, "ball");
        assert_eq!(plans[1].object_id, "hat");
        assert_eq!(plans[1].steps.len(), 4);
    }

    #[test]
    fn test_untagged_poles_shared() {
        let mut stack = synthetic::cylinder("tube", 1.0, 3.0, 4, 16);
        for pole in &mut stack.poles {
            pole.object_id = None;
            pole.role = None;
        }
        let stacks = prepare_scene(stack.rings, &stack.poles).unwrap();
        // Farthest pair, start nearer the z=0 ring
        let start = stacks[0]
            .poles
            .iter()
            .find(|p| p.role == Some(PoleRole::Start))
            .unwrap();
        assert_eq!(start.position, Point3::origin());
    }

    #[test]
    fn test_invalid_pole_rejected() {
        let (rings, mut poles) = scene();
        poles[0].position.y = f64::NAN;
        let err = prepare_scene(rings, &poles).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidCoordinate);
    }
}
