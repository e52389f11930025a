//! Stitch-count planning between adjacent rounds.
//!
//! The next round's count follows the next ring's circumference divided by
//! the gauge width. The difference to the current count is realized as
//! increases or decreases, one action per current stitch.
//!
//! # Placement
//!
//! - [`SpacingMode::Even`]: action `k` of `m` goes to stitch `floor(k·n/m)`.
//! - [`SpacingMode::Jagged`]: the even positions are jittered by up to 40%
//!   of the even gap, keeping at least half a gap between any two actions.
//!   A blocked index is resolved by searching outward, then by the exact
//!   even index, and finally by the free index farthest from every placed
//!   action. The jitter comes from [`StdRng`] seeded with the caller's
//!   seed, so equal inputs always give equal plans.
//!
//! # Example
//!
//! ```
//! use ringstitch::{PlanConfig, plan_stitches};
//!
//! let config = PlanConfig::default().with_gauge_width(1.25);
//! let plan = plan_stitches(8, 10.0, 15.0, &config, 0).unwrap();
//!
//! assert_eq!(plan.next_count, 12);
//! assert_eq!(plan.increase_positions(), vec![0, 2, 4, 6]);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::config::PlanConfig;
use crate::geometry::circular_distance;
use crate::tracing_ext::log_perf_section;
use crate::types::{SpacingMode, StitchAction, StitchPlan};

/// Maximum jitter as a fraction of the even gap.
pub const JITTER_FRACTION: f64 = 0.4;

/// Minimum distance between two placed actions as a fraction of the even gap.
pub const MIN_GAP_FRACTION: f64 = 0.5;

/// Largest count [`target_count`] reports.
pub const MAX_TARGET_COUNT: usize = u32::MAX as usize;

/// Target stitch count for a ring of circumference `next_circ`.
///
/// Uses the increase factor when the ring grows (or stays equal) and the
/// decrease factor when it shrinks. Never returns less than 1 or more than
/// [`MAX_TARGET_COUNT`].
pub fn target_count(current_circ: f64, next_circ: f64, config: &PlanConfig) -> usize {
    let factor = if next_circ >= current_circ {
        config.increase_factor
    } else {
        config.decrease_factor
    };
    let desired = (next_circ / config.gauge_width * factor).round();
    if desired.is_nan() || desired < 1.0 {
        1
    } else {
        desired.min(MAX_TARGET_COUNT as f64) as usize
    }
}

/// Plan the actions that turn `current_count` stitches into the next round.
///
/// The raw delta is clamped to what one action per stitch can express: at
/// most `current_count` increases and at most `current_count - 1`
/// decreases. `next_count` always equals
/// `current_count + #increase - #decrease` and is at least 1.
///
/// Returns `None` when `current_count` is zero.
pub fn plan_stitches(
    current_count: usize,
    current_circ: f64,
    next_circ: f64,
    config: &PlanConfig,
    seed: u64,
) -> Option<StitchPlan> {
    if current_count == 0 {
        return None;
    }

    let desired = target_count(current_circ, next_circ, config);
    let current = i64::try_from(current_count).unwrap_or(i64::MAX);
    let raw_delta = i64::try_from(desired)
        .unwrap_or(i64::MAX)
        .saturating_sub(current);
    let delta = raw_delta.clamp(-(current - 1), current);
    if delta != raw_delta {
        trace!(
            target: "ringstitch::chain",
            current_count,
            desired,
            raw_delta,
            delta,
            "Clamped stitch delta"
        );
    }

    let (action, to_place) = match delta {
        d if d > 0 => (StitchAction::Increase, d as usize),
        d if d < 0 => (StitchAction::Decrease, d.unsigned_abs() as usize),
        _ => return Some(StitchPlan::carry_all(current_count)),
    };

    let mut actions = vec![StitchAction::Carry; current_count];
    for index in place_actions(current_count, to_place, config.spacing, seed) {
        actions[index] = action;
    }

    let next_count = (current + delta) as usize;
    Some(StitchPlan {
        actions,
        next_count,
    })
}

/// Choose `m` distinct indices out of `n` stitches.
///
/// Indices are returned in placement order (ascending for even spacing).
/// `m` must not exceed `n`.
pub fn place_actions(n: usize, m: usize, spacing: SpacingMode, seed: u64) -> Vec<usize> {
    let m = m.min(n);
    if m == 0 {
        return Vec::new();
    }
    match spacing {
        SpacingMode::Even => (0..m).map(|k| even_index(k, n, m)).collect(),
        SpacingMode::Jagged => {
            let _perf = log_perf_section("jagged_placement");
            JaggedPlacer::new(n, m, seed).place_all()
        }
    }
}

#[inline]
fn even_index(k: usize, n: usize, m: usize) -> usize {
    k * n / m
}

/// Gap-constrained jittered placement over a ring of `n` slots.
struct JaggedPlacer {
    n: usize,
    m: usize,
    gap: f64,
    min_gap: f64,
    occupied: Vec<bool>,
    placed: Vec<usize>,
    rng: StdRng,
}

impl JaggedPlacer {
    fn new(n: usize, m: usize, seed: u64) -> Self {
        let gap = n as f64 / m as f64;
        Self {
            n,
            m,
            gap,
            min_gap: gap * MIN_GAP_FRACTION,
            occupied: vec![false; n],
            placed: Vec::with_capacity(m),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn place_all(mut self) -> Vec<usize> {
        for k in 0..self.m {
            let index = self.place_one(k);
            self.occupied[index] = true;
            self.placed.push(index);
        }
        self.placed
    }

    fn place_one(&mut self, k: usize) -> usize {
        let base = k as f64 * self.gap;
        let jitter = self.rng.gen_range(-1.0_f64..=1.0) * JITTER_FRACTION * self.gap;
        let candidate = self.wrap((base + jitter).round() as i64);

        if self.is_admissible(candidate) {
            return candidate;
        }

        let reach = self.gap.ceil() as i64;
        for d in 1..=reach {
            for offset in [d, -d] {
                let index = self.wrap(candidate as i64 + offset);
                if self.is_admissible(index) {
                    return index;
                }
            }
        }

        let even = even_index(k, self.n, self.m);
        if self.is_admissible(even) {
            return even;
        }

        trace!(
            target: "ringstitch::chain",
            k,
            candidate,
            "No admissible index near candidate, using farthest free slot"
        );
        self.farthest_free()
    }

    fn wrap(&self, index: i64) -> usize {
        index.rem_euclid(self.n as i64) as usize
    }

    fn is_admissible(&self, index: usize) -> bool {
        !self.occupied[index]
            && self
                .placed
                .iter()
                .all(|&p| circular_distance(index, p, self.n) as f64 >= self.min_gap)
    }

    /// Free slot maximizing the minimum circular distance to placed actions.
    /// Ties go to the lowest index.
    fn farthest_free(&self) -> usize {
        let mut best = 0;
        let mut best_d = None;
        for index in (0..self.n).filter(|&i| !self.occupied[i]) {
            let d = self
                .placed
                .iter()
                .map(|&p| circular_distance(index, p, self.n))
                .min()
                .unwrap_or(self.n);
            if best_d.is_none_or(|b| d > b) {
                best = index;
                best_d = Some(d);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: f64) -> PlanConfig {
        PlanConfig::default().with_gauge_width(width)
    }

    fn count_of(plan: &StitchPlan, action: StitchAction) -> usize {
        plan.actions.iter().filter(|a| **a == action).count()
    }

    #[test]
    fn test_even_increase_positions() {
        let plan = plan_stitches(8, 10.0, 15.0, &config(1.25), 0).unwrap();
        assert_eq!(plan.next_count, 12);
        assert_eq!(plan.increase_positions(), vec![0, 2, 4, 6]);
        assert!(plan.decrease_positions().is_empty());
    }

    #[test]
    fn test_even_decrease_positions() {
        let plan = plan_stitches(12, 12.0, 8.0, &config(1.0), 0).unwrap();
        assert_eq!(plan.next_count, 8);
        assert_eq!(plan.decrease_positions(), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_huge_growth_is_a_full_increase() {
        let plan = plan_stitches(8, 10.0, 1e30, &PlanConfig::default(), 0).unwrap();
        assert_eq!(plan.next_count, 16);
        assert_eq!(count_of(&plan, StitchAction::Increase), 8);
        assert_eq!(count_of(&plan, StitchAction::Decrease), 0);

        assert_eq!(target_count(10.0, 1e30, &config(1.0)), MAX_TARGET_COUNT);
        assert_eq!(target_count(10.0, f64::INFINITY, &config(1.0)), MAX_TARGET_COUNT);
    }

    #[test]
    fn test_equal_count_carries_everything() {
        let plan = plan_stitches(6, 6.0, 6.0, &config(1.0), 0).unwrap();
        assert_eq!(plan, StitchPlan::carry_all(6));
    }

    #[test]
    fn test_zero_current_count() {
        assert!(plan_stitches(0, 1.0, 5.0, &config(1.0), 0).is_none());
    }

    #[test]
    fn test_delta_clamped_to_one_action_per_stitch() {
        // Wants 30 from 6: at most doubles
        let plan = plan_stitches(6, 6.0, 30.0, &config(1.0), 0).unwrap();
        assert_eq!(plan.next_count, 12);
        assert_eq!(count_of(&plan, StitchAction::Increase), 6);

        // Wants 1 from 10: shrinks to 1
        let plan = plan_stitches(10, 10.0, 0.0, &config(1.0), 0).unwrap();
        assert_eq!(plan.next_count, 1);
        assert_eq!(count_of(&plan, StitchAction::Decrease), 9);
    }

    #[test]
    fn test_factors_select_by_direction() {
        let config = PlanConfig {
            increase_factor: 2.0,
            decrease_factor: 0.5,
            ..Default::default()
        };
        assert_eq!(target_count(4.0, 5.0, &config), 10);
        assert_eq!(target_count(6.0, 5.0, &config), 3);
        assert_eq!(target_count(6.0, 0.1, &config), 1);
    }

    #[test]
    fn test_jagged_is_deterministic() {
        let config = config(1.0).with_spacing(SpacingMode::Jagged);
        let a = plan_stitches(40, 40.0, 52.0, &config, 99).unwrap();
        let b = plan_stitches(40, 40.0, 52.0, &config, 99).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.next_count, 52);
        assert_eq!(count_of(&a, StitchAction::Increase), 12);
    }

    #[test]
    fn test_jagged_indices_distinct() {
        for seed in 0..20 {
            for (n, m) in [(10, 10), (10, 3), (7, 6), (30, 4), (1, 1)] {
                let mut indices = place_actions(n, m, SpacingMode::Jagged, seed);
                assert_eq!(indices.len(), m);
                indices.sort_unstable();
                indices.dedup();
                assert_eq!(indices.len(), m, "duplicates for n={n} m={m} seed={seed}");
                assert!(indices.iter().all(|&i| i < n));
            }
        }
    }

    #[test]
    fn test_jagged_keeps_half_gap_when_sparse() {
        for seed in 0..20 {
            let indices = place_actions(48, 6, SpacingMode::Jagged, seed);
            for (i, &a) in indices.iter().enumerate() {
                for &b in &indices[i + 1..] {
                    assert!(circular_distance(a, b, 48) >= 4);
                }
            }
        }
    }

    #[test]
    fn test_place_actions_caps_at_n() {
        assert_eq!(place_actions(3, 5, SpacingMode::Even, 0), vec![0, 1, 2]);
        assert!(place_actions(3, 0, SpacingMode::Jagged, 0).is_empty());
    }
}
