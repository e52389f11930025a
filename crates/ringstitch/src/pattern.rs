//! Textual crochet pattern from a planned chain.
//!
//! Each planned step becomes one round. Actions are grouped into crochet
//! instructions (a decrease together with the stitch it merges into reads
//! as `dec`, longer merges as `sc3tog`), runs are counted, and a round that
//! repeats a shorter unit is written as `[unit] xN`:
//!
//! ```text
//! Rnd 1: 6 sc in magic ring (6)
//! Rnd 2: [inc] x6 (12)
//! Rnd 3: [inc, sc] x6 (18)
//! Rnd 4: 18 sc (18)
//! ```
//!
//! A decrease on the last stitch merges across the seam into the round's
//! first stitch. Such a round is written starting that many stitches
//! before the marker (`from 1 st before marker: dec, 5 sc`), so every
//! instruction uses stitches of the round exactly once.
//!
//! Held steps are listed as skipped and do not consume a round number.

use std::fmt;

use crate::chain::ChainPlan;
use crate::types::StitchAction;

/// One crochet instruction inside a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Instruction {
    Sc,
    Inc,
    /// `n` stitches worked together into one.
    Tog(usize),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Sc => f.write_str(StitchAction::Carry.abbreviation()),
            Instruction::Inc => f.write_str(StitchAction::Increase.abbreviation()),
            Instruction::Tog(2) => f.write_str(StitchAction::Decrease.abbreviation()),
            Instruction::Tog(n) => write!(f, "sc{}tog", n),
        }
    }
}

/// One line of the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize))]
pub struct PatternRound {
    /// Round number, `None` for skipped steps.
    pub number: Option<usize>,

    /// Step label, `"magic"` for the first round.
    pub label: String,

    /// Instructions such as `"[2 sc, inc] x6"`.
    pub instructions: String,

    /// Stitches at the end of the round.
    pub stitch_count: usize,
}

impl PatternRound {
    /// Whether the round was skipped.
    pub fn is_skipped(&self) -> bool {
        self.number.is_none()
    }
}

impl fmt::Display for PatternRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number {
            Some(n) => write!(f, "Rnd {}: {} ({})", n, self.instructions, self.stitch_count),
            None => write!(f, "-- {}: {}", self.label, self.instructions),
        }
    }
}

/// A full pattern for one object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize))]
pub struct StitchPattern {
    pub object_id: String,
    pub rounds: Vec<PatternRound>,
}

impl StitchPattern {
    /// Rounds that were actually worked.
    pub fn worked_rounds(&self) -> impl Iterator<Item = &PatternRound> {
        self.rounds.iter().filter(|r| !r.is_skipped())
    }
}

impl fmt::Display for StitchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.object_id)?;
        for round in &self.rounds {
            writeln!(f, "{}", round)?;
        }
        Ok(())
    }
}

/// Render a chain as a crochet pattern.
pub fn render_pattern(plan: &ChainPlan) -> StitchPattern {
    let mut rounds = Vec::with_capacity(plan.steps.len() + 1);
    let Some(magic) = &plan.magic_ring else {
        return StitchPattern {
            object_id: plan.object_id.clone(),
            rounds,
        };
    };

    rounds.push(PatternRound {
        number: Some(1),
        label: "magic".to_string(),
        instructions: format!("{} sc in magic ring", magic.stitch_count),
        stitch_count: magic.stitch_count,
    });

    let mut number = 1;
    for step in &plan.steps {
        match &step.plan {
            Some(stitch_plan) => {
                number += 1;
                rounds.push(PatternRound {
                    number: Some(number),
                    label: step.label.clone(),
                    instructions: describe_round(&stitch_plan.actions),
                    stitch_count: stitch_plan.next_count,
                });
            }
            None => rounds.push(PatternRound {
                number: None,
                label: step.label.clone(),
                instructions: "skipped, layer needs re-slicing".to_string(),
                stitch_count: step.stitch_count(),
            }),
        }
    }

    StitchPattern {
        object_id: plan.object_id.clone(),
        rounds,
    }
}

/// Instruction text for one round of actions.
pub fn describe_round(actions: &[StitchAction]) -> String {
    let seam = seam_decreases(actions);
    if seam == 0 {
        return describe_instructions(&group_instructions(actions));
    }
    let split = actions.len() - seam;
    let rotated: Vec<StitchAction> = actions[split..]
        .iter()
        .chain(&actions[..split])
        .copied()
        .collect();
    format!(
        "from {} st before marker: {}",
        seam,
        describe_instructions(&group_instructions(&rotated))
    )
}

/// Decreases at the end of the round that merge into its first stitch.
fn seam_decreases(actions: &[StitchAction]) -> usize {
    let run = actions
        .iter()
        .rev()
        .take_while(|a| **a == StitchAction::Decrease)
        .count();
    if run == actions.len() { 0 } else { run }
}

fn describe_instructions(instructions: &[Instruction]) -> String {
    if instructions.is_empty() {
        return String::new();
    }
    if instructions.iter().all(|i| *i == Instruction::Sc) {
        return format!("{} sc", instructions.len());
    }

    let period = smallest_period(instructions);
    let repeats = instructions.len() / period;
    let unit = describe_runs(&instructions[..period]);
    if repeats > 1 {
        format!("[{}] x{}", unit, repeats)
    } else {
        unit
    }
}

/// Fold decreases into the stitch they merge with.
fn group_instructions(actions: &[StitchAction]) -> Vec<Instruction> {
    let mut out = Vec::with_capacity(actions.len());
    let mut i = 0;
    while i < actions.len() {
        match actions[i] {
            StitchAction::Carry => {
                out.push(Instruction::Sc);
                i += 1;
            }
            StitchAction::Increase => {
                out.push(Instruction::Inc);
                i += 1;
            }
            StitchAction::Decrease => {
                let run = actions[i..]
                    .iter()
                    .take_while(|a| **a == StitchAction::Decrease)
                    .count();
                if actions.get(i + run) == Some(&StitchAction::Carry) {
                    out.push(Instruction::Tog(run + 1));
                    i += run + 1;
                } else {
                    // No stitch left to merge into
                    out.extend(std::iter::repeat_n(Instruction::Tog(2), run));
                    i += run;
                }
            }
        }
    }
    out
}

fn smallest_period<T: PartialEq>(items: &[T]) -> usize {
    let n = items.len();
    (1..=n)
        .filter(|p| n % p == 0)
        .find(|&p| (p..n).all(|i| items[i] == items[i - p]))
        .unwrap_or(n)
}

fn describe_runs(items: &[Instruction]) -> String {
    let mut parts = Vec::new();
    let mut i = 0;
    while i < items.len() {
        let run = items[i..].iter().take_while(|x| **x == items[i]).count();
        if run > 1 {
            parts.push(format!("{} {}", run, items[i]));
        } else {
            parts.push(items[i].to_string());
        }
        i += run;
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainPlanner;
    use crate::config::PlanConfig;
    use crate::layers::label_layers;
    use crate::synthetic;
    use StitchAction::*;

    #[test]
    fn test_all_increases() {
        assert_eq!(describe_round(&[Increase; 6]), "[inc] x6");
    }

    #[test]
    fn test_repeat_unit() {
        let actions: Vec<StitchAction> = (0..12)
            .map(|i| if i % 2 == 0 { Increase } else { Carry })
            .collect();
        assert_eq!(describe_round(&actions), "[inc, sc] x6");

        let actions: Vec<StitchAction> = (0..18)
            .map(|i| if i % 3 == 2 { Increase } else { Carry })
            .collect();
        assert_eq!(describe_round(&actions), "[2 sc, inc] x6");
    }

    #[test]
    fn test_plain_round() {
        assert_eq!(describe_round(&[Carry; 13]), "13 sc");
    }

    #[test]
    fn test_decreases_grouped() {
        assert_eq!(describe_round(&[Decrease, Carry, Decrease, Carry]), "[dec] x2");
        assert_eq!(describe_round(&[Decrease, Decrease, Carry, Carry]), "sc3tog, sc");
    }

    fn stitches_used(actions: &[StitchAction]) -> usize {
        group_instructions(actions)
            .iter()
            .map(|i| match i {
                Instruction::Sc | Instruction::Inc => 1,
                Instruction::Tog(n) => *n,
            })
            .sum()
    }

    #[test]
    fn test_decrease_on_last_stitch_crosses_seam() {
        let mut actions = vec![Carry; 12];
        for i in [2, 8, 11] {
            actions[i] = Decrease;
        }
        assert_eq!(
            describe_round(&actions),
            "from 1 st before marker: dec, sc, dec, 4 sc, dec, sc"
        );

        let mut rotated = actions.clone();
        rotated.rotate_right(seam_decreases(&actions));
        assert_eq!(stitches_used(&rotated), 12);
    }

    #[test]
    fn test_seam_run_joins_leading_decrease() {
        let actions = [Decrease, Carry, Carry, Carry, Decrease, Decrease];
        assert_eq!(describe_round(&actions), "from 2 st before marker: sc4tog, 2 sc");
    }

    #[test]
    fn test_jagged_rounds_use_every_stitch_once() {
        use crate::counts::place_actions;
        use crate::types::SpacingMode;

        for seed in 0..200 {
            let mut actions = vec![Carry; 12];
            for i in place_actions(12, 3, SpacingMode::Jagged, seed) {
                actions[i] = Decrease;
            }
            let mut rotated = actions.clone();
            rotated.rotate_right(seam_decreases(&actions));
            assert_eq!(stitches_used(&rotated), 12, "seed {seed}");
        }
    }

    #[test]
    fn test_irregular_round() {
        assert_eq!(describe_round(&[Increase, Carry, Carry, Carry, Increase]), "inc, 3 sc, inc");
    }

    #[test]
    fn test_render_sphere() {
        let stack = synthetic::sphere("ball", 3.0, 8, 48);
        let layers = label_layers(stack.rings, &stack.poles);
        let plan = ChainPlanner::new(PlanConfig::default())
            .plan("ball", &layers, &stack.poles)
            .unwrap();
        let pattern = render_pattern(&plan);

        assert_eq!(pattern.rounds.len(), plan.steps.len() + 1);
        assert!(pattern.rounds[0].to_string().starts_with("Rnd 1: "));
        assert!(pattern.rounds[0].instructions.ends_with("sc in magic ring"));
        let counts: Vec<usize> = pattern.worked_rounds().map(|r| r.stitch_count).collect();
        assert_eq!(counts, plan.layer_counts());
        assert!(pattern.to_string().starts_with("ball\n"));
    }

    #[test]
    fn test_render_empty_plan() {
        let plan = ChainPlanner::default().plan("none", &[], &[]).unwrap();
        assert!(render_pattern(&plan).rounds.is_empty());
    }
}
