//! ringstitch plan command - stitch counts per round.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use ringstitch::{ChainPlan, PlanConfig, SpacingMode, plan_scene};
use serde::Serialize;

use crate::input::load_scene;
use crate::settings::Settings;
use crate::{Cli, OutputFormat, Spacing, output};

/// Flag values that replace settings-file values.
pub struct Overrides {
    pub width: Option<f64>,
    pub spacing: Option<Spacing>,
    pub seed: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, mut config: PlanConfig) -> PlanConfig {
        if let Some(width) = self.width {
            config.gauge_width = width;
        }
        if let Some(spacing) = self.spacing {
            config.spacing = match spacing {
                Spacing::Even => SpacingMode::Even,
                Spacing::Jagged => SpacingMode::Jagged,
            };
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config
    }
}

#[derive(Serialize)]
struct ObjectPlan {
    object_id: String,
    magic_ring: Option<usize>,
    counts: Vec<usize>,
    total_stitches: usize,
    scaffold_segments: usize,
    held: Vec<String>,
    transitions: Vec<TransitionInfo>,
}

#[derive(Serialize)]
struct TransitionInfo {
    label: String,
    from: usize,
    to: usize,
    increases: usize,
    decreases: usize,
}

impl From<&ChainPlan> for ObjectPlan {
    fn from(plan: &ChainPlan) -> Self {
        ObjectPlan {
            object_id: plan.object_id.clone(),
            magic_ring: plan.magic_ring.as_ref().map(|m| m.stitch_count),
            counts: plan.layer_counts(),
            total_stitches: plan.total_stitches(),
            scaffold_segments: plan.segments().count(),
            held: plan.held_steps().map(|s| s.label.clone()).collect(),
            transitions: plan
                .transitions()
                .into_iter()
                .map(|t| TransitionInfo {
                    label: t.label,
                    from: t.from_count,
                    to: t.to_count,
                    increases: t.increases,
                    decreases: t.decreases,
                })
                .collect(),
        }
    }
}

pub fn run(
    input: &Path,
    config_path: Option<&Path>,
    overrides: Overrides,
    print_config: bool,
    cli: &Cli,
) -> Result<()> {
    let mut settings = Settings::load(config_path)?;
    settings.plan = overrides.apply(settings.plan);

    if print_config {
        if !cli.quiet {
            print!("{}", settings.to_toml()?);
        }
        return Ok(());
    }

    let (rings, poles) = load_scene(input)?;
    let plans = plan_scene(rings, &poles, &settings.plan)
        .with_context(|| format!("Failed to plan {:?}", input))?;
    let summaries: Vec<ObjectPlan> = plans.iter().map(ObjectPlan::from).collect();

    match cli.format {
        OutputFormat::Json => {
            output::print(&summaries, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                for summary in &summaries {
                    print_text(summary, cli);
                }
            }
        }
    }

    Ok(())
}

fn print_text(plan: &ObjectPlan, cli: &Cli) {
    println!("{}", plan.object_id.bold().underline());
    match plan.magic_ring {
        Some(count) => println!("  {}: {} sc", "Magic ring".cyan(), count),
        None => {
            output::warning(
                &format!("{} has no rings to plan", plan.object_id),
                cli.format,
                cli.quiet,
            );
            return;
        }
    }
    println!(
        "  {}: {}",
        "Rounds".cyan(),
        plan.counts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" → ")
    );
    println!("  {}: {}", "Total stitches".cyan(), plan.total_stitches);
    println!("  {}: {}", "Scaffold segments".cyan(), plan.scaffold_segments);

    for t in &plan.transitions {
        let change = match (t.increases, t.decreases) {
            (0, 0) => "even".to_string(),
            (inc, 0) => format!("+{} inc", inc),
            (0, dec) => format!("-{} dec", dec),
            (inc, dec) => format!("+{} inc, -{} dec", inc, dec),
        };
        println!("    {} {} → {} ({})", t.label, t.from, t.to, change);
    }

    if !plan.held.is_empty() {
        output::warning(
            &format!(
                "{} layer(s) need re-slicing: {}",
                plan.held.len(),
                plan.held.join(", ")
            ),
            cli.format,
            cli.quiet,
        );
    }
}
