//! Fluent builder for measuring one object.
//!
//! # Example
//!
//! ```
//! use ringstitch::{label_layers, synthetic};
//! use ringstitch_measure::MeasureBuilder;
//!
//! let tube = synthetic::cylinder("tube", 2.0, 6.0, 7, 32);
//! let layers = label_layers(tube.rings, &tube.poles);
//!
//! let measurement = MeasureBuilder::new("tube", &layers, &tube.poles)
//!     .measure_every(2)
//!     .build()
//!     .unwrap();
//!
//! assert!((measurement.total_length() - 6.0).abs() < 1e-9);
//! ```

use nalgebra::{Point3, Vector3};
use ringstitch::tracing_ext::OperationTimer;
use ringstitch::{LabeledLayer, ObjectKind, Pole, PoleRole, chain_axis, pole_position};
use tracing::{debug, info};

use crate::anchors::{RingAnchor, stabilize_anchors};
use crate::config::{DistanceMode, MeasureConfig, Strategy};
use crate::error::{MeasureError, MeasureResult};
use crate::frame::{FacingFrame, measurable_midpoint};
use crate::segments::{MeasurementSegment, SegmentContext, build_segments, stride_anchors};
use crate::strategy::{resolve_strategy, strategy_impl};

/// Anchors and segments of one object.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub object_id: String,
    /// Strategy actually used, never [`Strategy::Auto`].
    pub strategy: Strategy,
    /// `None` when the object has no layers.
    pub frame: Option<FacingFrame>,
    /// One anchor per ring in visiting order, before striding.
    pub anchors: Vec<RingAnchor>,
    pub segments: Vec<MeasurementSegment>,
    pub distance_mode: DistanceMode,
}

impl Measurement {
    /// Sum of all segment values.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(|s| s.value).sum()
    }

    /// Anchor points that were found, in visiting order.
    pub fn anchor_points(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.anchors.iter().filter_map(|a| a.point)
    }

    /// Number of rings without an anchor.
    pub fn missing_anchors(&self) -> usize {
        self.anchors.iter().filter(|a| !a.is_found()).count()
    }
}

/// Fluent builder for anchor stabilization.
///
/// Layers are expected in start-to-end order as produced by
/// [`ringstitch::label_layers`], and poles should already carry roles
/// (see [`ringstitch::resolve_poles`]).
pub struct MeasureBuilder<'a> {
    object_id: String,
    layers: &'a [LabeledLayer],
    poles: &'a [Pole],
    config: MeasureConfig,
    kind: Option<ObjectKind>,
    up: Vector3<f64>,
}

impl<'a> MeasureBuilder<'a> {
    /// Create a builder with default settings and `+Z` as up.
    pub fn new(object_id: impl Into<String>, layers: &'a [LabeledLayer], poles: &'a [Pole]) -> Self {
        Self {
            object_id: object_id.into(),
            layers,
            poles,
            config: MeasureConfig::default(),
            kind: None,
            up: Vector3::z(),
        }
    }

    // =========================================================================
    // Anchor Configuration
    // =========================================================================

    /// Fix the cutting plane at an azimuth in degrees around the axis.
    pub fn azimuth_deg(mut self, degrees: f64) -> Self {
        self.config.azimuth_deg = Some(degrees);
        self
    }

    /// Force a strategy instead of choosing one from the object.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Override the object kind. Defaults to the kind of the first ring.
    pub fn kind(mut self, kind: ObjectKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Scene up direction, used to detect stacks lying sideways.
    pub fn up(mut self, up: Vector3<f64>) -> Self {
        self.up = up;
        self
    }

    // =========================================================================
    // Segment Configuration
    // =========================================================================

    /// Distance below which the last anchor counts as on the end pole.
    pub fn snap_epsilon(mut self, epsilon: f64) -> Self {
        self.config.snap_epsilon = epsilon;
        self
    }

    /// Keep every `every`-th anchor for segments. Must be at least 1.
    pub fn measure_every(mut self, every: usize) -> Self {
        self.config.measure_every = every;
        self
    }

    /// Leave out the segments to and from the poles.
    pub fn suppress_pole_segments(mut self, suppress: bool) -> Self {
        self.config.suppress_pole_segments = suppress;
        self
    }

    /// Measure segments straight or along the axis, whatever the strategy.
    pub fn distance_mode(mut self, mode: DistanceMode) -> Self {
        self.config.distance_mode = Some(mode);
        self
    }

    /// Replace all settings at once.
    pub fn config(mut self, config: MeasureConfig) -> Self {
        self.config = config;
        self
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Compute anchors and segments.
    ///
    /// # Errors
    ///
    /// Fails only on invalid settings: a zero stride, a bad snap epsilon,
    /// a non-finite azimuth or a zero or non-finite up vector. Missing
    /// anchors and missing poles shorten the result instead.
    pub fn build(self) -> MeasureResult<Measurement> {
        self.config.validate()?;
        if !self.up.iter().all(|c| c.is_finite()) || self.up.norm() <= f64::EPSILON {
            return Err(MeasureError::invalid_param(
                "up",
                format!("[{}, {}, {}]", self.up.x, self.up.y, self.up.z),
                "up must be a finite non-zero vector",
            ));
        }

        let _timer = OperationTimer::with_context("measure", &self.object_id, self.layers.len());
        let kind = self
            .kind
            .or_else(|| self.layers.first().map(|l| l.ring.kind))
            .unwrap_or_default();
        let axis = chain_axis(self.layers, self.poles);
        let strategy = resolve_strategy(self.config.strategy, kind, &axis, &self.up);
        let imp = strategy_impl(strategy);
        let distance_mode = self
            .config
            .distance_mode
            .unwrap_or_else(|| DistanceMode::for_kind(kind));

        if self.layers.is_empty() {
            debug!(
                target: "ringstitch::measure",
                object = %self.object_id,
                "No layers to measure"
            );
            return Ok(Measurement {
                object_id: self.object_id,
                strategy,
                frame: None,
                anchors: Vec::new(),
                segments: Vec::new(),
                distance_mode,
            });
        }

        let start_pole = pole_position(self.poles, PoleRole::Start);
        let end_pole = pole_position(self.poles, PoleRole::End);
        let first_mid = self.layers.iter().find_map(|l| measurable_midpoint(&l.ring));
        let frame = FacingFrame::build(axis, first_mid, start_pole, self.config.azimuth_deg);

        let anchors = stabilize_anchors(imp, self.layers, &frame, end_pole);
        let kept = stride_anchors(&anchors, self.config.measure_every);
        let ctx = SegmentContext {
            object_id: &self.object_id,
            axis: frame.axis,
            mode: distance_mode,
            start_pole,
            end_pole,
            include_poles: !self.config.suppress_pole_segments,
            snap_epsilon: self.config.snap_epsilon,
        };
        let segments = build_segments(&ctx, &kept);

        let measurement = Measurement {
            object_id: self.object_id,
            strategy,
            frame: Some(frame),
            anchors,
            segments,
            distance_mode,
        };
        info!(
            target: "ringstitch::measure",
            object = %measurement.object_id,
            strategy = strategy.as_str(),
            anchors = measurement.anchors.len(),
            missing = measurement.missing_anchors(),
            segments = measurement.segments.len(),
            total = format!("{:.3}", measurement.total_length()),
            "Measured"
        );
        Ok(measurement)
    }
}
