//! The magic ring: base case of the stitch-count recursion.
//!
//! The first round is sized exactly like every later round (circumference
//! over gauge width), with two guards: a non-positive sampled radius is
//! replaced by [`EPSILON_RADIUS`] and the count never drops below
//! [`MIN_MAGIC_RING_STITCHES`].

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::geometry::normalize_or;
use crate::types::LabeledLayer;

/// Radius substituted when the sampled radius is zero or negative.
pub const EPSILON_RADIUS: f64 = 1e-6;

/// A magic ring never has fewer stitches than this.
pub const MIN_MAGIC_RING_STITCHES: usize = 3;

/// Initial stitch count and the plane the first round sits on.
#[derive(Debug, Clone, PartialEq)]
pub struct MagicRing {
    /// Number of stitches worked into the magic ring.
    pub stitch_count: usize,

    /// Plane center (the start pole).
    pub center: Point3<f64>,

    /// Unit plane normal.
    pub normal: Vector3<f64>,

    /// Radius used for the count, after the epsilon guard.
    pub radius: f64,
}

/// Compute the magic ring at the first ring of a stack.
///
/// # Arguments
///
/// * `first_key` - Slicing key of the first ring
/// * `radius_at` - Radius sampler over slicing keys
/// * `pole_position` - Start pole position (plane center)
/// * `pole_normal` - Plane normal; +Z when degenerate
/// * `gauge_width` - Width of one stitch
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use ringstitch::resolve_magic_ring;
///
/// let ring = resolve_magic_ring(0.0, |_| 0.0, Point3::origin(), Vector3::z(), 1.0);
/// assert_eq!(ring.stitch_count, 3);
/// ```
pub fn resolve_magic_ring(
    first_key: f64,
    radius_at: impl Fn(f64) -> f64,
    pole_position: Point3<f64>,
    pole_normal: Vector3<f64>,
    gauge_width: f64,
) -> MagicRing {
    let sampled = radius_at(first_key);
    let radius = if sampled > 0.0 && sampled.is_finite() {
        sampled
    } else {
        EPSILON_RADIUS
    };

    let circumference = TAU * radius;
    let raw = (circumference / gauge_width).round();
    let stitch_count = if raw.is_finite() && raw > 0.0 {
        (raw as usize).max(MIN_MAGIC_RING_STITCHES)
    } else {
        MIN_MAGIC_RING_STITCHES
    };

    debug!(
        target: "ringstitch::chain",
        first_key,
        sampled_radius = sampled,
        radius,
        stitch_count,
        "Resolved magic ring"
    );

    MagicRing {
        stitch_count,
        center: pole_position,
        normal: normalize_or(pole_normal, Vector3::z()),
        radius,
    }
}

/// Piecewise-linear radius over slicing keys, sampled from a ring stack.
///
/// Outside the sampled range the nearest sample is returned; an empty
/// profile returns zero everywhere.
#[derive(Debug, Clone, Default)]
pub struct RadiusProfile {
    samples: Vec<(f64, f64)>,
}

impl RadiusProfile {
    /// Sample `(key, radius)` from plannable layers.
    pub fn from_layers(layers: &[LabeledLayer]) -> Self {
        let mut samples: Vec<(f64, f64)> = layers
            .iter()
            .filter(|l| l.ring.is_plannable())
            .map(|l| (l.ring.key, l.ring.radius()))
            .collect();
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { samples }
    }

    /// Build from explicit samples.
    pub fn from_samples(mut samples: Vec<(f64, f64)>) -> Self {
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { samples }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the profile has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interpolated radius at `key`.
    pub fn radius_at(&self, key: f64) -> f64 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return 0.0;
        };
        if key <= first.0 {
            return first.1;
        }
        if key >= last.0 {
            return last.1;
        }
        let upper = self.samples.partition_point(|s| s.0 <= key);
        let (k0, r0) = self.samples[upper - 1];
        let (k1, r1) = self.samples[upper];
        let span = k1 - k0;
        if span <= 0.0 {
            return r0;
        }
        r0 + (r1 - r0) * (key - k0) / span
    }
}
