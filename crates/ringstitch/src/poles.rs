//! Pole role resolution.
//!
//! Slicers hand over pole markers with roles that may be missing, partial
//! or duplicated. [`resolve_poles`] fills in what can be inferred and
//! leaves the rest as `None`; downstream code treats a missing role as
//! "use the default axis and orientation".
//!
//! # Rules
//!
//! 1. A single pole is always the start.
//! 2. If any role is known, the first `Start` and first `End` are kept,
//!    later duplicates are cleared, and with exactly two poles the
//!    unlabeled one gets the complementary role.
//! 3. With no roles and two or more poles, the farthest pair is chosen and
//!    the member nearer to the first ring (by slicing key) becomes the
//!    start.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use ringstitch::{Pole, PoleRole, resolve_poles};
//!
//! let poles = vec![Pole::new(Point3::new(0.0, 0.0, 5.0))];
//! let resolved = resolve_poles(&poles, &[]);
//! assert_eq!(resolved[0].role, Some(PoleRole::Start));
//! ```

use nalgebra::Point3;
use tracing::{debug, trace};

use crate::types::{Pole, PoleRole, Ring};

/// Fill in pole roles.
///
/// `rings` are only used to orient the farthest pair when no role is
/// known; pass the rings of the same object.
pub fn resolve_poles(poles: &[Pole], rings: &[Ring]) -> Vec<Pole> {
    let mut out = poles.to_vec();

    match out.len() {
        0 => return out,
        1 => {
            out[0].role = Some(PoleRole::Start);
            return out;
        }
        _ => {}
    }

    if out.iter().any(|p| p.role.is_some()) {
        resolve_partial(&mut out);
    } else {
        resolve_unlabeled(&mut out, rings);
    }

    trace!(
        target: "ringstitch::poles",
        count = out.len(),
        resolved = out.iter().filter(|p| p.role.is_some()).count(),
        "Resolved pole roles"
    );
    out
}

/// Keep the first start and first end, clear duplicates, and complete a
/// half-labeled pair.
fn resolve_partial(poles: &mut [Pole]) {
    let mut seen_start = false;
    let mut seen_end = false;

    for pole in poles.iter_mut() {
        match pole.role {
            Some(PoleRole::Start) if seen_start => pole.role = None,
            Some(PoleRole::End) if seen_end => pole.role = None,
            Some(PoleRole::Start) => seen_start = true,
            Some(PoleRole::End) => seen_end = true,
            None => {}
        }
    }

    if poles.len() == 2 {
        let labeled = poles.iter().find_map(|p| p.role);
        if let Some(role) = labeled {
            for pole in poles.iter_mut() {
                if pole.role.is_none() {
                    pole.role = Some(role.complement());
                }
            }
        }
    }
}

/// Pick the farthest pair and orient it against the first ring.
fn resolve_unlabeled(poles: &mut [Pole], rings: &[Ring]) {
    let Some((i, j)) = farthest_pair(poles) else {
        return;
    };

    let first_mid = first_ring_midpoint(rings);
    let (start, end) = match first_mid {
        Some(mid) => {
            let di = (poles[i].position - mid).norm_squared();
            let dj = (poles[j].position - mid).norm_squared();
            if dj < di { (j, i) } else { (i, j) }
        }
        None => (i, j),
    };

    debug!(
        target: "ringstitch::poles",
        start,
        end,
        oriented = first_mid.is_some(),
        "Inferred pole roles from farthest pair"
    );

    poles[start].role = Some(PoleRole::Start);
    poles[end].role = Some(PoleRole::End);
}

/// Indices of the two poles farthest apart (first found on ties).
fn farthest_pair(poles: &[Pole]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut best_d = f64::NEG_INFINITY;
    for i in 0..poles.len() {
        for j in (i + 1)..poles.len() {
            let d = (poles[i].position - poles[j].position).norm_squared();
            if d > best_d {
                best_d = d;
                best = Some((i, j));
            }
        }
    }
    best
}

/// Midpoint of the ring with the smallest slicing key.
fn first_ring_midpoint(rings: &[Ring]) -> Option<Point3<f64>> {
    rings
        .iter()
        .filter(|r| r.key.is_finite())
        .min_by(|a, b| a.key.total_cmp(&b.key))
        .and_then(Ring::midpoint)
}

/// Poles belonging to one object.
///
/// Poles without an object id are used only when no pole names the object.
pub fn poles_for_object(poles: &[Pole], object_id: &str) -> Vec<Pole> {
    let tagged: Vec<Pole> = poles
        .iter()
        .filter(|p| p.object_id.as_deref() == Some(object_id))
        .cloned()
        .collect();
    if !tagged.is_empty() {
        return tagged;
    }
    poles
        .iter()
        .filter(|p| p.object_id.is_none())
        .cloned()
        .collect()
}
