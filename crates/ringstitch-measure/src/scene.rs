//! Measuring every object of a scene.

use nalgebra::Vector3;
use rayon::prelude::*;
use ringstitch::tracing_ext::OperationTimer;
use ringstitch::{Pole, Ring, prepare_scene};

use crate::builder::{MeasureBuilder, Measurement};
use crate::config::MeasureConfig;
use crate::error::MeasureResult;

/// Group rings by object and measure each object in parallel.
///
/// Results are sorted by object id. `up` is the scene's up direction.
///
/// # Errors
///
/// Fails on non-finite input coordinates or invalid settings.
pub fn measure_scene(
    rings: Vec<Ring>,
    poles: &[Pole],
    config: &MeasureConfig,
    up: Vector3<f64>,
) -> MeasureResult<Vec<Measurement>> {
    let _timer = OperationTimer::new("measure_scene");
    config.validate()?;
    let stacks = prepare_scene(rings, poles)?;

    stacks
        .par_iter()
        .map(|stack| {
            MeasureBuilder::new(stack.object_id.clone(), &stack.layers, &stack.poles)
                .config(config.clone())
                .kind(stack.kind)
                .up(up)
                .build()
        })
        .collect()
}
