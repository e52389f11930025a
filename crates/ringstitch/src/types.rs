//! Core data types: rings, poles, labeled layers, nodes, plans and segments.

use std::f64::consts::TAU;

use nalgebra::Point3;

use crate::error::{StitchError, StitchResult};

/// Shape family an object was sliced from.
///
/// Measurement strategies and reported distances depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ObjectKind {
    Sphere,
    Cone,
    #[default]
    Generic,
}

impl ObjectKind {
    /// Lowercase name used in labels and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Sphere => "sphere",
            ObjectKind::Cone => "cone",
            ObjectKind::Generic => "generic",
        }
    }
}

/// An ordered sequence of points forming one closed loop of a ring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    /// Loop points. The closing edge from last to first is implicit.
    pub points: Vec<Point3<f64>>,

    /// Marks the fragment that starts a chain. Such fragments are
    /// measured but never planned.
    pub chain_start: bool,
}

impl Polyline {
    /// Create a polyline from points.
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            chain_start: false,
        }
    }

    /// Create a polyline tagged as a chain-start fragment.
    pub fn chain_start(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            chain_start: true,
        }
    }

    /// A polyline needs at least two points to be usable.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Length of the closed loop.
    pub fn perimeter(&self) -> f64 {
        crate::geometry::closed_length(&self.points)
    }
}

/// One cross-section of an object: one or more closed polylines at a
/// slicing key.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Loops of this cross-section.
    pub polylines: Vec<Polyline>,

    /// Position along the slicing axis.
    pub key: f64,

    /// Owning object.
    pub object_id: String,

    /// Shape family of the owning object.
    pub kind: ObjectKind,

    /// Free-form provenance for debugging (slicer pass, source file).
    pub provenance: Option<String>,
}

impl Ring {
    /// Create a ring with a single polyline.
    pub fn new(object_id: impl Into<String>, key: f64, points: Vec<Point3<f64>>) -> Self {
        Self {
            polylines: vec![Polyline::new(points)],
            key,
            object_id: object_id.into(),
            kind: ObjectKind::Generic,
            provenance: None,
        }
    }

    /// Set the object kind.
    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    /// Polylines that take part in stitch planning.
    pub fn usable_polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.polylines
            .iter()
            .filter(|p| p.is_usable() && !p.chain_start)
    }

    /// Polylines with enough points to measure, chain-start fragments included.
    pub fn measurable_polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.polylines.iter().filter(|p| p.is_usable())
    }

    /// Whether any polyline can be planned.
    pub fn is_plannable(&self) -> bool {
        self.usable_polylines().next().is_some()
    }

    /// Mean of all usable points, or `None` when nothing is usable.
    pub fn midpoint(&self) -> Option<Point3<f64>> {
        crate::geometry::mean_point(self.usable_polylines().flat_map(|p| p.points.iter()))
    }

    /// Total closed length of the usable polylines.
    pub fn perimeter(&self) -> f64 {
        self.usable_polylines().map(Polyline::perimeter).sum()
    }

    /// Radius of the circle with the same circumference as this ring.
    pub fn radius(&self) -> f64 {
        self.perimeter() / TAU
    }

    /// Number of points across all polylines.
    pub fn point_count(&self) -> usize {
        self.polylines.iter().map(|p| p.points.len()).sum()
    }

    /// Reject NaN or infinite keys and coordinates.
    pub fn validate(&self) -> StitchResult<()> {
        if !self.key.is_finite() {
            return Err(StitchError::invalid_coordinate(
                format!("key of ring in `{}`", self.object_id),
                self.key,
            ));
        }
        for (pi, polyline) in self.polylines.iter().enumerate() {
            for (vi, p) in polyline.points.iter().enumerate() {
                if let Some(bad) = p.coords.iter().find(|c| !c.is_finite()) {
                    return Err(StitchError::invalid_coordinate(
                        format!(
                            "ring `{}` at key {} (polyline {}, point {})",
                            self.object_id, self.key, pi, vi
                        ),
                        *bad,
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Semantic role of a pole marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PoleRole {
    Start,
    End,
}

impl PoleRole {
    /// The other role.
    #[inline]
    pub fn complement(self) -> Self {
        match self {
            PoleRole::Start => PoleRole::End,
            PoleRole::End => PoleRole::Start,
        }
    }
}

/// An axis endpoint marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Pole {
    /// Marker position.
    pub position: Point3<f64>,

    /// Role, if known or resolved.
    pub role: Option<PoleRole>,

    /// Owning object, if the source tagged one.
    pub object_id: Option<String>,
}

impl Pole {
    /// Create a pole without role or object.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            role: None,
            object_id: None,
        }
    }

    /// Create a pole with a role.
    pub fn with_role(position: Point3<f64>, role: PoleRole) -> Self {
        Self {
            position,
            role: Some(role),
            object_id: None,
        }
    }

    /// Attach an object id.
    pub fn for_object(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }
}

/// Position of the pole with the given role, if any.
pub fn pole_position(poles: &[Pole], role: PoleRole) -> Option<Point3<f64>> {
    poles
        .iter()
        .find(|p| p.role == Some(role))
        .map(|p| p.position)
}

/// A ring annotated with its place in the ordered stack.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledLayer {
    /// The underlying ring.
    pub ring: Ring,

    /// Ordinal counted from the start pole (0-based).
    pub s_index: usize,

    /// Ordinal counted from the end pole (`count - 1 - s_index`).
    pub e_index: usize,

    /// Normalized position in `[0, 1]`.
    pub t01: f64,
}

/// A stitch placed on a ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// World position.
    pub position: Point3<f64>,

    /// Azimuth in radians the node was placed at.
    pub angle: f64,
}

/// What happens to one stitch of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StitchAction {
    /// One stitch into one stitch.
    Carry,
    /// Two stitches into one stitch.
    Increase,
    /// Merges into the stitch the next current stitch works into.
    Decrease,
}

impl StitchAction {
    /// Standard crochet abbreviation.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            StitchAction::Carry => "sc",
            StitchAction::Increase => "inc",
            StitchAction::Decrease => "dec",
        }
    }

    /// How far the scaffold pointer into the next round advances.
    #[inline]
    pub fn advance(&self) -> usize {
        match self {
            StitchAction::Carry => 1,
            StitchAction::Increase => 2,
            StitchAction::Decrease => 0,
        }
    }
}

/// One action per current stitch plus the resulting stitch count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchPlan {
    /// Action for each current stitch, in order.
    pub actions: Vec<StitchAction>,

    /// Number of stitches in the next round.
    pub next_count: usize,
}

impl StitchPlan {
    /// Plan that carries every stitch unchanged.
    pub fn carry_all(count: usize) -> Self {
        Self {
            actions: vec![StitchAction::Carry; count],
            next_count: count,
        }
    }

    /// Number of current stitches.
    #[inline]
    pub fn current_count(&self) -> usize {
        self.actions.len()
    }

    /// Current-stitch indices holding an increase.
    pub fn increase_positions(&self) -> Vec<usize> {
        self.positions_of(StitchAction::Increase)
    }

    /// Current-stitch indices holding a decrease.
    pub fn decrease_positions(&self) -> Vec<usize> {
        self.positions_of(StitchAction::Decrease)
    }

    fn positions_of(&self, action: StitchAction) -> Vec<usize> {
        self.actions
            .iter()
            .enumerate()
            .filter(|(_, a)| **a == action)
            .map(|(i, _)| i)
            .collect()
    }
}

/// An edge between a stitch on one round and a stitch on the next.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldSegment {
    /// Start point (current round).
    pub a: Point3<f64>,

    /// End point (next round).
    pub b: Point3<f64>,

    /// Human-readable step label such as `"3→4"`.
    pub label: Option<String>,

    /// Owning object.
    pub object_id: Option<String>,
}

impl ScaffoldSegment {
    /// Create an unlabeled segment.
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            a,
            b,
            label: None,
            object_id: None,
        }
    }

    /// Segment length.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }
}

/// Angular direction used when walking around a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Handedness {
    /// Clockwise when viewed down the axis.
    Left,
    /// Counter-clockwise when viewed down the axis.
    #[default]
    Right,
}

impl Handedness {
    /// Sign applied to placement angles.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            Handedness::Left => -1.0,
            Handedness::Right => 1.0,
        }
    }
}

/// How increases and decreases are spread around a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SpacingMode {
    /// Evenly spaced; stacks into visible seams over many rounds.
    #[default]
    Even,
    /// Seeded jitter around the even positions.
    Jagged,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: f64, half: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(-half, -half, z),
            Point3::new(half, -half, z),
            Point3::new(half, half, z),
            Point3::new(-half, half, z),
        ]
    }

    #[test]
    fn test_polyline_usable() {
        assert!(!Polyline::new(vec![Point3::origin()]).is_usable());
        assert!(Polyline::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]).is_usable());
    }

    #[test]
    fn test_ring_perimeter_and_midpoint() {
        let ring = Ring::new("cube", 2.0, square(2.0, 1.0));
        assert!((ring.perimeter() - 8.0).abs() < 1e-12);
        let mid = ring.midpoint().unwrap();
        assert!((mid - Point3::new(0.0, 0.0, 2.0)).norm() < 1e-12);
        assert!((ring.radius() - 8.0 / TAU).abs() < 1e-12);
    }

    #[test]
    fn test_chain_start_excluded_from_planning() {
        let mut ring = Ring::new("cube", 0.0, square(0.0, 1.0));
        ring.polylines[0].chain_start = true;
        assert!(!ring.is_plannable());
        assert!(ring.midpoint().is_none());
        assert_eq!(ring.perimeter(), 0.0);
        assert_eq!(ring.measurable_polylines().count(), 1);
    }

    #[test]
    fn test_ring_validate() {
        let ring = Ring::new("cube", 0.0, square(0.0, 1.0));
        assert!(ring.validate().is_ok());

        let mut bad = ring.clone();
        bad.polylines[0].points[2].x = f64::NAN;
        assert!(bad.validate().is_err());

        let mut bad_key = ring;
        bad_key.key = f64::INFINITY;
        assert!(bad_key.validate().is_err());
    }

    #[test]
    fn test_plan_positions() {
        let plan = StitchPlan {
            actions: vec![
                StitchAction::Increase,
                StitchAction::Carry,
                StitchAction::Decrease,
                StitchAction::Increase,
            ],
            next_count: 5,
        };
        assert_eq!(plan.increase_positions(), vec![0, 3]);
        assert_eq!(plan.decrease_positions(), vec![2]);
        assert_eq!(plan.current_count(), 4);
    }

    #[test]
    fn test_pole_role_complement() {
        assert_eq!(PoleRole::Start.complement(), PoleRole::End);
        assert_eq!(PoleRole::End.complement(), PoleRole::Start);
    }
}
