//! ringstitch measure command - anchor lines and their lengths.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use nalgebra::Vector3;
use ringstitch_measure::{MeasureConfig, Measurement, SegmentKind, Strategy, measure_scene};
use serde::Serialize;

use crate::input::load_scene;
use crate::settings::Settings;
use crate::{AnchorStrategyArg, Cli, OutputFormat, output};

/// Flag values that replace settings-file values.
pub struct Overrides {
    pub azimuth: Option<f64>,
    pub every: Option<usize>,
    pub no_pole_segments: bool,
    pub strategy: Option<AnchorStrategyArg>,
}

impl Overrides {
    pub fn apply(&self, mut config: MeasureConfig) -> MeasureConfig {
        if self.azimuth.is_some() {
            config.azimuth_deg = self.azimuth;
        }
        if let Some(every) = self.every {
            config.measure_every = every;
        }
        if self.no_pole_segments {
            config.suppress_pole_segments = true;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = match strategy {
                AnchorStrategyArg::Auto => Strategy::Auto,
                AnchorStrategyArg::Generic => Strategy::Generic,
                AnchorStrategyArg::Sideways => Strategy::Sideways,
                AnchorStrategyArg::Sphere => Strategy::Sphere,
            };
        }
        config
    }
}

#[derive(Serialize)]
struct MeasurementInfo {
    object_id: String,
    strategy: &'static str,
    azimuth_deg: Option<f64>,
    anchors: Vec<AnchorInfo>,
    segments: Vec<SegmentInfo>,
    total_length: f64,
}

#[derive(Serialize)]
struct AnchorInfo {
    layer: usize,
    key: f64,
    point: Option<[f64; 3]>,
    source: Option<&'static str>,
}

#[derive(Serialize)]
struct SegmentInfo {
    label: String,
    kind: &'static str,
    value: f64,
    a: [f64; 3],
    b: [f64; 3],
}

impl From<&Measurement> for MeasurementInfo {
    fn from(m: &Measurement) -> Self {
        MeasurementInfo {
            object_id: m.object_id.clone(),
            strategy: m.strategy.as_str(),
            azimuth_deg: m.frame.as_ref().map(|f| f.azimuth_deg()),
            anchors: m
                .anchors
                .iter()
                .map(|a| AnchorInfo {
                    layer: a.s_index,
                    key: a.key,
                    point: a.point.map(|p| [p.x, p.y, p.z]),
                    source: a.source.map(|s| s.as_str()),
                })
                .collect(),
            segments: m
                .segments
                .iter()
                .map(|s| SegmentInfo {
                    label: s.label.clone(),
                    kind: match s.kind {
                        SegmentKind::PoleToAnchor => "pole_to_anchor",
                        SegmentKind::AnchorToAnchor => "anchor_to_anchor",
                        SegmentKind::AnchorToPole => "anchor_to_pole",
                    },
                    value: s.value,
                    a: [s.a.x, s.a.y, s.a.z],
                    b: [s.b.x, s.b.y, s.b.z],
                })
                .collect(),
            total_length: m.total_length(),
        }
    }
}

pub fn run(
    input: &Path,
    config_path: Option<&Path>,
    overrides: Overrides,
    cli: &Cli,
) -> Result<()> {
    let mut settings = Settings::load(config_path)?;
    settings.measure = overrides.apply(settings.measure);

    let (rings, poles) = load_scene(input)?;
    let measurements = measure_scene(rings, &poles, &settings.measure, Vector3::z())
        .with_context(|| format!("Failed to measure {:?}", input))?;
    let infos: Vec<MeasurementInfo> = measurements.iter().map(MeasurementInfo::from).collect();

    match cli.format {
        OutputFormat::Json => {
            output::print(&infos, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                for (info, m) in infos.iter().zip(&measurements) {
                    println!("{}", info.object_id.bold().underline());
                    println!("  {}: {}", "Strategy".cyan(), info.strategy);
                    if let Some(azimuth) = info.azimuth_deg {
                        println!("  {}: {:.1}°", "Azimuth".cyan(), azimuth);
                    }
                    println!(
                        "  {}: {} ({} missing)",
                        "Anchors".cyan(),
                        info.anchors.len(),
                        m.missing_anchors()
                    );
                    for s in &info.segments {
                        println!("    {:<12} {:>10.3}", s.label, s.value);
                    }
                    println!("  {}: {:.3}", "Total length".green(), info.total_length);
                }
            }
        }
    }

    Ok(())
}
