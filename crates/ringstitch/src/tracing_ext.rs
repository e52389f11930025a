//! Tracing helpers for planning operations.
//!
//! Nothing here installs a subscriber; applications do that. Useful
//! filters:
//!
//! - `RUST_LOG=ringstitch::timing=info` for per-operation timings
//! - `RUST_LOG=ringstitch::chain=debug` for per-step stitch counts
//! - `RUST_LOG=ringstitch=trace` for everything, including placement retries
//!
//! # Log Levels
//!
//! - **WARN**: Held steps and other recoverable degeneracies
//! - **INFO**: Operation timings and chain summaries
//! - **DEBUG**: Per-step and per-object progress
//! - **TRACE**: Placement and snapping internals

use std::time::Instant;

use tracing::{Span, debug, info, trace};

use crate::chain::ChainPlan;
use crate::types::Ring;

/// A timer that logs its elapsed time when dropped.
///
/// ```rust,ignore
/// let _timer = OperationTimer::new("plan_scene");
/// // ... work ...
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("stitch_operation", operation = name);
        debug!(target: "ringstitch::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer that records the object and its layer count.
    pub fn with_context(name: &'static str, object_id: &str, layer_count: usize) -> Self {
        let span = tracing::info_span!(
            "stitch_operation",
            operation = name,
            object = object_id,
            layers = layer_count
        );
        debug!(
            target: "ringstitch::timing",
            operation = name,
            object = object_id,
            layers = layer_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Span covering the operation.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        info!(
            target: "ringstitch::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", self.elapsed_ms()),
            "Operation completed"
        );
    }
}

/// Log the shape of an input ring stack at debug level.
pub fn log_stack_stats(rings: &[Ring], context: &str) {
    let points: usize = rings.iter().map(Ring::point_count).sum();
    let plannable = rings.iter().filter(|r| r.is_plannable()).count();
    let (min_key, max_key) = rings.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, r| {
        (acc.0.min(r.key), acc.1.max(r.key))
    });

    debug!(
        target: "ringstitch::stack",
        context,
        rings = rings.len(),
        plannable,
        points,
        key_range = format!("{:.3}..{:.3}", min_key, max_key),
        "Ring stack"
    );
}

/// Log a one-line summary of a planned chain.
pub fn log_chain_summary(plan: &ChainPlan) {
    let counts = plan.layer_counts();
    let held = plan.held_steps().count();
    info!(
        target: "ringstitch::chain",
        object = %plan.object_id,
        rounds = counts.len(),
        first = counts.first().copied().unwrap_or(0),
        peak = counts.iter().copied().max().unwrap_or(0),
        total_stitches = plan.total_stitches(),
        held,
        "Chain planned"
    );
}

/// Guard that logs a section's duration in microseconds at trace level.
#[must_use]
pub fn log_perf_section(name: &'static str) -> impl Drop {
    struct PerfGuard {
        name: &'static str,
        start: Instant,
    }
    impl Drop for PerfGuard {
        fn drop(&mut self) {
            trace!(
                target: "ringstitch::perf",
                section = self.name,
                elapsed_us = self.start.elapsed().as_micros() as u64,
                "Section completed"
            );
        }
    }
    PerfGuard {
        name,
        start: Instant::now(),
    }
}
