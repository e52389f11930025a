//! ringstitch pattern command - readable crochet instructions.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use ringstitch::{StitchError, StitchPattern, plan_scene, render_pattern};

use crate::input::load_scene;
use crate::settings::Settings;
use crate::{Cli, OutputFormat, output};

pub fn run(
    input: &Path,
    object: Option<&str>,
    config_path: Option<&Path>,
    width: Option<f64>,
    cli: &Cli,
) -> Result<()> {
    let mut settings = Settings::load(config_path)?;
    if let Some(width) = width {
        settings.plan.gauge_width = width;
    }

    let (mut rings, poles) = load_scene(input)?;
    if let Some(id) = object {
        rings.retain(|r| r.object_id == id);
        if rings.is_empty() {
            return Err(StitchError::empty_stack(id).into());
        }
    }

    let plans = plan_scene(rings, &poles, &settings.plan)
        .with_context(|| format!("Failed to plan {:?}", input))?;
    let patterns: Vec<StitchPattern> = plans.iter().map(render_pattern).collect();

    match cli.format {
        OutputFormat::Json => {
            output::print(&patterns, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                for pattern in &patterns {
                    println!("{}", pattern.object_id.bold().underline());
                    for round in &pattern.rounds {
                        if round.is_skipped() {
                            println!("  {}", round.to_string().yellow());
                        } else {
                            println!("  {}", round);
                        }
                    }
                    println!();
                }
            }
        }
    }

    Ok(())
}
