//! Chain planning over a labeled ring stack.
//!
//! Starting from the magic ring, every layer is turned into one round:
//! the stitch count follows the layer circumference, nodes are placed
//! around the layer midpoint, scaffold segments connect the rounds, and
//! the new segments are snapped onto the previous step's end points.
//!
//! A layer that cannot be planned (no usable polyline, zero perimeter, or
//! no current nodes to work from) produces a [`StepStatus::NeedSplit`]
//! step. The current round is held unchanged and the next layer is
//! planned from it, so a later pass can re-slice the skipped boundary.
//!
//! # Example
//!
//! ```
//! use ringstitch::{ChainPlanner, PlanConfig, label_layers, synthetic};
//!
//! let stack = synthetic::cylinder("tube", 2.0, 6.0, 7, 32);
//! let layers = label_layers(stack.rings, &stack.poles);
//! let plan = ChainPlanner::new(PlanConfig::default())
//!     .plan("tube", &layers, &stack.poles)
//!     .unwrap();
//!
//! assert_eq!(plan.steps.len(), 6);
//! assert!(plan.held_steps().next().is_none());
//! ```

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

use crate::config::PlanConfig;
use crate::continuity::enforce_continuity;
use crate::counts::plan_stitches;
use crate::error::StitchResult;
use crate::geometry::{DEGENERATE_LENGTH, normalize_or};
use crate::magic_ring::{MagicRing, RadiusProfile, resolve_magic_ring};
use crate::nodes::distribute_nodes;
use crate::scaffold::build_scaffold;
use crate::tracing_ext::{OperationTimer, log_chain_summary};
use crate::types::{LabeledLayer, Node, Pole, PoleRole, ScaffoldSegment, StitchPlan, pole_position};

/// Outcome of one ring-to-ring step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The step produced a new round.
    Planned,
    /// The target layer was degenerate; the current round was held.
    NeedSplit,
}

/// One ring-to-ring step of a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStep {
    /// Layer the current round sits on.
    pub from_layer: usize,

    /// Layer this step targets.
    pub to_layer: usize,

    /// Label such as `"2→3"`.
    pub label: String,

    /// Whether the step advanced.
    pub status: StepStatus,

    /// Stitch plan; `None` for held steps.
    pub plan: Option<StitchPlan>,

    /// Scaffold segments after continuity snapping.
    pub segments: Vec<ScaffoldSegment>,

    /// Current-stitch indices holding an increase.
    pub increases: Vec<usize>,

    /// Current-stitch indices holding a decrease.
    pub decreases: Vec<usize>,

    /// Next-round indices fed by each current stitch.
    pub children: Vec<Vec<usize>>,

    /// Round after this step (the held round for `NeedSplit`).
    pub nodes: Vec<Node>,
}

impl ChainStep {
    /// Whether the step was held back.
    #[inline]
    pub fn is_held(&self) -> bool {
        self.status == StepStatus::NeedSplit
    }

    /// Stitch count of the round after this step.
    #[inline]
    pub fn stitch_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Stitch counts and shaping of one planned step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub label: String,
    pub from_count: usize,
    pub to_count: usize,
    pub increases: usize,
    pub decreases: usize,
}

/// Full chain for one object.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainPlan {
    /// Owning object.
    pub object_id: String,

    /// Unit axis the rounds are stacked along.
    pub axis: Vector3<f64>,

    /// First round; `None` when the object had no layers.
    pub magic_ring: Option<MagicRing>,

    /// Nodes of the first round.
    pub seed_nodes: Vec<Node>,

    /// Steps in layer order.
    pub steps: Vec<ChainStep>,
}

impl ChainPlan {
    /// Stitch count of every round, magic ring first.
    ///
    /// Held steps repeat the previous count.
    pub fn layer_counts(&self) -> Vec<usize> {
        let Some(magic) = &self.magic_ring else {
            return Vec::new();
        };
        std::iter::once(magic.stitch_count)
            .chain(self.steps.iter().map(ChainStep::stitch_count))
            .collect()
    }

    /// Steps marked [`StepStatus::NeedSplit`].
    pub fn held_steps(&self) -> impl Iterator<Item = &ChainStep> {
        self.steps.iter().filter(|s| s.is_held())
    }

    /// Stitches across all worked rounds (held steps add nothing).
    pub fn total_stitches(&self) -> usize {
        let seed = self.magic_ring.as_ref().map_or(0, |m| m.stitch_count);
        seed + self
            .steps
            .iter()
            .filter(|s| !s.is_held())
            .map(ChainStep::stitch_count)
            .sum::<usize>()
    }

    /// Count changes of the planned steps.
    pub fn transitions(&self) -> Vec<Transition> {
        self.steps
            .iter()
            .filter_map(|step| {
                let plan = step.plan.as_ref()?;
                Some(Transition {
                    label: step.label.clone(),
                    from_count: plan.current_count(),
                    to_count: plan.next_count,
                    increases: step.increases.len(),
                    decreases: step.decreases.len(),
                })
            })
            .collect()
    }

    /// All scaffold segments, step by step.
    pub fn segments(&self) -> impl Iterator<Item = &ScaffoldSegment> {
        self.steps.iter().flat_map(|s| s.segments.iter())
    }
}

/// State carried from one step to the next.
#[derive(Debug, Clone)]
struct ChainState {
    layer: usize,
    nodes: Vec<Node>,
    radius: f64,
    segments: Vec<ScaffoldSegment>,
}

/// Plans the chain of an object from its labeled layers.
#[derive(Debug, Clone, Default)]
pub struct ChainPlanner {
    config: PlanConfig,
}

impl ChainPlanner {
    /// Create a planner with the given configuration.
    pub fn new(config: PlanConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Plan the chain for one object.
    ///
    /// `layers` must be ordered from the start pole (as produced by
    /// [`label_layers`](crate::label_layers)). Degenerate layers never fail
    /// the plan; they yield held steps.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidParams`](crate::StitchError::InvalidParams)
    /// when the configuration does not validate.
    pub fn plan(
        &self,
        object_id: &str,
        layers: &[LabeledLayer],
        poles: &[Pole],
    ) -> StitchResult<ChainPlan> {
        self.config.validate()?;
        let _timer = OperationTimer::with_context("plan_chain", object_id, layers.len());

        let axis = chain_axis(layers, poles);
        let Some(first) = layers.first() else {
            debug!(target: "ringstitch::chain", object_id, "No layers, empty chain");
            return Ok(ChainPlan {
                object_id: object_id.to_string(),
                axis,
                magic_ring: None,
                seed_nodes: Vec::new(),
                steps: Vec::new(),
            });
        };

        let profile = RadiusProfile::from_layers(layers);
        let center = pole_position(poles, PoleRole::Start)
            .or_else(|| first.ring.midpoint())
            .unwrap_or_else(Point3::origin);
        let magic = resolve_magic_ring(
            first.ring.key,
            |key| profile.radius_at(key),
            center,
            axis,
            self.config.gauge_width,
        );
        let seed_nodes = distribute_nodes(
            magic.stitch_count,
            magic.center,
            magic.normal,
            magic.radius,
            self.config.handedness,
        );

        let mut state = ChainState {
            layer: 0,
            nodes: seed_nodes.clone(),
            radius: magic.radius,
            segments: Vec::new(),
        };
        let mut steps = Vec::with_capacity(layers.len().saturating_sub(1));
        for (index, layer) in layers.iter().enumerate().skip(1) {
            let (next_state, step) = self.advance(state, index, layer, axis, object_id);
            state = next_state;
            steps.push(step);
        }

        let plan = ChainPlan {
            object_id: object_id.to_string(),
            axis,
            magic_ring: Some(magic),
            seed_nodes,
            steps,
        };
        log_chain_summary(&plan);
        Ok(plan)
    }

    /// Work one layer from the carried state.
    fn advance(
        &self,
        state: ChainState,
        to_layer: usize,
        layer: &LabeledLayer,
        axis: Vector3<f64>,
        object_id: &str,
    ) -> (ChainState, ChainStep) {
        let label = format!("{}→{}", state.layer, to_layer);
        let next_radius = layer.ring.radius();
        let center = layer.ring.midpoint();

        let plan = match center {
            Some(_) if next_radius > DEGENERATE_LENGTH => plan_stitches(
                state.nodes.len(),
                TAU * state.radius,
                TAU * next_radius,
                &self.config,
                step_seed(self.config.seed, to_layer),
            ),
            _ => None,
        };
        let (Some(plan), Some(center)) = (plan, center) else {
            warn!(
                target: "ringstitch::chain",
                object_id,
                step = %label,
                current_nodes = state.nodes.len(),
                radius = next_radius,
                "Degenerate layer, holding current round"
            );
            let step = ChainStep {
                from_layer: state.layer,
                to_layer,
                label,
                status: StepStatus::NeedSplit,
                plan: None,
                segments: Vec::new(),
                increases: Vec::new(),
                decreases: Vec::new(),
                children: Vec::new(),
                nodes: state.nodes.clone(),
            };
            return (state, step);
        };

        let next_nodes = distribute_nodes(
            plan.next_count,
            center,
            axis,
            next_radius,
            self.config.handedness,
        );
        let mut scaffold = build_scaffold(&state.nodes, &next_nodes, &plan.actions);
        scaffold.tag(&label, object_id);
        let children = scaffold.children(state.nodes.len());
        let segments = enforce_continuity(&state.segments, scaffold.segments);

        debug!(
            target: "ringstitch::chain",
            object_id,
            step = %label,
            from = plan.current_count(),
            to = plan.next_count,
            segments = segments.len(),
            "Planned step"
        );

        let step = ChainStep {
            from_layer: state.layer,
            to_layer,
            label,
            status: StepStatus::Planned,
            increases: plan.increase_positions(),
            decreases: plan.decrease_positions(),
            plan: Some(plan),
            segments: segments.clone(),
            children,
            nodes: next_nodes.clone(),
        };
        let next_state = ChainState {
            layer: to_layer,
            nodes: next_nodes,
            radius: next_radius,
            segments,
        };
        (next_state, step)
    }
}

/// Axis from start to end: poles first, layer midpoints second, +Z last.
pub fn chain_axis(layers: &[LabeledLayer], poles: &[Pole]) -> Vector3<f64> {
    let first_mid = layers.iter().find_map(|l| l.ring.midpoint());
    let last_mid = layers.iter().rev().find_map(|l| l.ring.midpoint());
    let start = pole_position(poles, PoleRole::Start).or(first_mid);
    let end = pole_position(poles, PoleRole::End).or(last_mid);
    match (start, end) {
        (Some(s), Some(e)) => normalize_or(e - s, Vector3::z()),
        _ => Vector3::z(),
    }
}

/// Per-step seed so that jagged placement differs between rounds but is
/// reproducible for the whole chain.
#[inline]
fn step_seed(seed: u64, step: usize) -> u64 {
    seed ^ (step as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
