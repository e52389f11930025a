//! Jitter-free measurement anchors along sliced ring stacks.
//!
//! For each ring of an object this crate picks one anchor point so that
//! the anchors line up smoothly from the start pole to the end pole. The
//! lines between them (plus the poles) form a measurement overlay whose
//! total length is the object's height along its surface or axis.
//!
//! Every ring is cut with the same plane, fixed once per object by a
//! [`FacingFrame`]. Three strategies decide how rings are visited and which
//! crossing becomes the anchor:
//!
//! - [`GenericStrategy`] for upright stacks
//! - [`SidewaysStrategy`] for stacks lying on their side
//! - [`SphereStrategy`] for round objects
//!
//! [`Strategy::Auto`] chooses from the object kind and axis orientation.
//!
//! # Example
//!
//! ```
//! use nalgebra::Vector3;
//! use ringstitch::synthetic;
//! use ringstitch_measure::{MeasureConfig, Strategy, measure_scene};
//!
//! let ball = synthetic::sphere("ball", 2.0, 10, 48);
//! let results = measure_scene(ball.rings, &ball.poles, &MeasureConfig::default(), Vector3::z())
//!     .unwrap();
//!
//! assert_eq!(results[0].strategy, Strategy::Sphere);
//! assert!(results[0].total_length() > 6.0);
//! ```
//!
//! # Features
//!
//! - `config`: serde support for [`MeasureConfig`] and TOML/JSON loaders.

pub mod anchors;
pub mod builder;
pub mod config;
pub mod error;
pub mod frame;
pub mod scene;
pub mod segments;
pub mod strategy;

pub use anchors::{AnchorSource, RingAnchor, anchor_step, fallback_anchor, stabilize_anchors};
pub use builder::{MeasureBuilder, Measurement};
pub use config::{DEFAULT_SNAP_EPSILON, DistanceMode, MeasureConfig, Strategy};
pub use error::{MeasureError, MeasureErrorCode, MeasureRecoverySuggestion, MeasureResult};
pub use frame::{FacingFrame, measurable_midpoint};
pub use scene::measure_scene;
pub use segments::{
    MeasurementSegment, SegmentContext, SegmentKind, build_segments, segment_value,
    stride_anchors,
};
pub use strategy::{
    AnchorStrategy, GenericStrategy, SidewaysStrategy, SphereStrategy, resolve_strategy,
    strategy_impl,
};
