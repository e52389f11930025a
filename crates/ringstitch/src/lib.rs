//! Crochet stitch planning from sliced cross-section rings.
//!
//! Given a stack of closed polylines ("rings") sliced from a solid and a
//! pair of pole markers, this crate computes a round-by-round crochet
//! plan: how many stitches each round has, where increases and decreases
//! go, and a scaffold graph connecting the stitch nodes of adjacent rounds.
//!
//! The whole pipeline is a pure function of `(rings, poles, config)`.
//! Nothing is cached between calls, and identical inputs (seed included)
//! always produce identical plans.
//!
//! # Pipeline
//!
//! 1. [`resolve_poles`] fills in missing start/end roles.
//! 2. [`label_layers`] orders the rings from the start pole.
//! 3. [`resolve_magic_ring`] sizes the first round.
//! 4. [`ChainPlanner`] walks the stack: [`plan_stitches`] →
//!    [`distribute_nodes`] → [`build_scaffold`] → [`enforce_continuity`].
//! 5. [`render_pattern`] turns the result into readable rounds.
//!
//! [`plan_scene`] runs all of this for every object of a flat ring list.
//!
//! # Degenerate input
//!
//! Degenerate geometry never fails a plan. Zero radii are replaced by a
//! tiny epsilon, layers without usable polylines produce held steps
//! ([`StepStatus::NeedSplit`]), and poles that cannot be resolved keep
//! `role = None`. Errors are reserved for invalid configuration and
//! non-finite input coordinates.
//!
//! # Quick Start
//!
//! ```
//! use ringstitch::{PlanConfig, plan_scene, render_pattern, synthetic};
//!
//! let ball = synthetic::sphere("ball", 3.0, 10, 48);
//! let plans = plan_scene(ball.rings, &ball.poles, &PlanConfig::default()).unwrap();
//!
//! let pattern = render_pattern(&plans[0]);
//! println!("{}", pattern);
//! assert!(pattern.rounds[0].instructions.contains("magic ring"));
//! ```
//!
//! # Units
//!
//! Ring coordinates and the gauge width share one unit. A ring of
//! circumference `C` gets about `C / gauge_width` stitches.
//!
//! # Features
//!
//! - `config`: serde support for [`PlanConfig`] and TOML/JSON loaders.

pub mod chain;
pub mod config;
pub mod continuity;
pub mod counts;
pub mod error;
pub mod geometry;
pub mod layers;
pub mod magic_ring;
pub mod nodes;
pub mod pattern;
pub mod poles;
pub mod scaffold;
pub mod scene;
pub mod synthetic;
pub mod tracing_ext;
mod types;

pub use chain::{ChainPlan, ChainPlanner, ChainStep, StepStatus, Transition, chain_axis};
pub use config::PlanConfig;
pub use continuity::enforce_continuity;
pub use counts::{MAX_TARGET_COUNT, place_actions, plan_stitches, target_count};
pub use error::{ErrorCode, RecoverySuggestion, StitchError, StitchResult};
pub use layers::label_layers;
pub use magic_ring::{MagicRing, RadiusProfile, resolve_magic_ring};
pub use nodes::{azimuth_of, distribute_nodes};
pub use pattern::{PatternRound, StitchPattern, describe_round, render_pattern};
pub use poles::{poles_for_object, resolve_poles};
pub use scaffold::{Scaffold, build_scaffold};
pub use scene::{ObjectStack, plan_scene, prepare_scene};
pub use types::{
    Handedness, LabeledLayer, Node, ObjectKind, Pole, PoleRole, Polyline, Ring, ScaffoldSegment,
    SpacingMode, StitchAction, StitchPlan, pole_position,
};
