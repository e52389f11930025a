//! Anchor selection strategies.
//!
//! A strategy decides two things: the order rings are visited in, and which
//! of the cutting-plane candidates on a ring becomes its anchor. The walk
//! itself, including the fallback chain when a ring has no candidate, is
//! shared and lives in [`crate::anchors`].

mod generic;
mod sideways;
mod sphere;

pub use generic::GenericStrategy;
pub use sideways::{START_WINDOW_FRACTION, SidewaysStrategy};
pub use sphere::SphereStrategy;

use nalgebra::{Point3, Vector3};
use ringstitch::geometry::normalize_or;
use ringstitch::{LabeledLayer, ObjectKind};

use crate::config::Strategy;
use crate::frame::FacingFrame;

/// Largest `|axis · up|` at which a stack counts as lying sideways
/// (axis within 60° of horizontal).
pub const SIDEWAYS_MAX_UP_DOT: f64 = 0.5;

/// Ordering and candidate choice for one kind of ring stack.
pub trait AnchorStrategy: Sync {
    /// The strategy this implements.
    fn kind(&self) -> Strategy;

    /// Rings in the order anchors are computed. Defaults to layer order.
    fn order<'a>(
        &self,
        layers: &'a [LabeledLayer],
        _frame: &FacingFrame,
        _end_pole: Option<Point3<f64>>,
    ) -> Vec<&'a LabeledLayer> {
        layers.iter().collect()
    }

    /// Choose among the plane crossings of one ring.
    ///
    /// `previous` is the anchor of the ring visited before, if it had one.
    fn pick(
        &self,
        candidates: &[Point3<f64>],
        frame: &FacingFrame,
        previous: Option<&Point3<f64>>,
    ) -> Option<Point3<f64>>;
}

/// Replace [`Strategy::Auto`] with a concrete strategy.
///
/// Sphere objects use [`Strategy::Sphere`]. Stacks whose axis is within
/// 60° of horizontal relative to `up` use [`Strategy::Sideways`].
/// Everything else is [`Strategy::Generic`]. Concrete requests pass
/// through unchanged.
pub fn resolve_strategy(
    requested: Strategy,
    kind: ObjectKind,
    axis: &Vector3<f64>,
    up: &Vector3<f64>,
) -> Strategy {
    if requested != Strategy::Auto {
        return requested;
    }
    if kind == ObjectKind::Sphere {
        return Strategy::Sphere;
    }
    let axis = normalize_or(*axis, Vector3::z());
    let up = normalize_or(*up, Vector3::z());
    if axis.dot(&up).abs() <= SIDEWAYS_MAX_UP_DOT {
        Strategy::Sideways
    } else {
        Strategy::Generic
    }
}

/// The implementation for a concrete strategy. `Auto` maps to generic.
pub fn strategy_impl(strategy: Strategy) -> &'static dyn AnchorStrategy {
    match strategy {
        Strategy::Sideways => &SidewaysStrategy,
        Strategy::Sphere => &SphereStrategy,
        Strategy::Generic | Strategy::Auto => &GenericStrategy,
    }
}

/// Candidate farthest along the forward direction.
pub(crate) fn most_forward(candidates: &[Point3<f64>], frame: &FacingFrame) -> Option<Point3<f64>> {
    candidates
        .iter()
        .max_by(|a, b| frame.forward_offset(a).total_cmp(&frame.forward_offset(b)))
        .copied()
}

/// Candidate closest to `target`.
pub(crate) fn nearest_to(candidates: &[Point3<f64>], target: &Point3<f64>) -> Option<Point3<f64>> {
    candidates
        .iter()
        .min_by(|a, b| {
            (**a - *target)
                .norm_squared()
                .total_cmp(&(**b - *target).norm_squared())
        })
        .copied()
}
