//! ringstitch sample command - synthetic scenes for trying things out.

use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;
use ringstitch::synthetic::{self, RingStack};
use serde::Serialize;

use crate::input::SceneFile;
use crate::{Cli, OutputFormat, SampleShape, output};

pub struct Dimensions {
    pub radius: f64,
    pub height: Option<f64>,
    pub layers: usize,
    pub segments: usize,
}

#[derive(Serialize)]
struct SampleResult {
    output: String,
    object_id: String,
    kind: &'static str,
    rings: usize,
    points: usize,
}

fn shape_name(shape: SampleShape) -> &'static str {
    match shape {
        SampleShape::Sphere => "sphere",
        SampleShape::Cone => "cone",
        SampleShape::Cylinder => "cylinder",
        SampleShape::LyingCylinder => "lying-cylinder",
    }
}

fn generate(shape: SampleShape, id: &str, dims: &Dimensions) -> RingStack {
    let height = dims.height.unwrap_or(2.0 * dims.radius);
    match shape {
        SampleShape::Sphere => synthetic::sphere(id, dims.radius, dims.layers, dims.segments),
        SampleShape::Cone => synthetic::cone(id, dims.radius, height, dims.layers, dims.segments),
        SampleShape::Cylinder => {
            synthetic::cylinder(id, dims.radius, height, dims.layers, dims.segments)
        }
        SampleShape::LyingCylinder => {
            synthetic::lying_cylinder(id, dims.radius, height, dims.layers, dims.segments)
        }
    }
}

pub fn run(
    shape: SampleShape,
    output_path: &Path,
    dims: Dimensions,
    id: Option<&str>,
    cli: &Cli,
) -> Result<()> {
    if !dims.radius.is_finite() || dims.radius <= 0.0 {
        bail!("radius must be positive, got {}", dims.radius);
    }
    if let Some(height) = dims.height {
        if !height.is_finite() || height <= 0.0 {
            bail!("height must be positive, got {}", height);
        }
    }
    if dims.layers == 0 {
        bail!("at least one layer is required");
    }

    let id = id.unwrap_or(shape_name(shape));
    let stack = generate(shape, id, &dims);
    SceneFile::from_stack(&stack).save(output_path)?;

    let result = SampleResult {
        output: output_path.display().to_string(),
        object_id: stack.object_id.clone(),
        kind: stack.kind.as_str(),
        rings: stack.rings.len(),
        points: stack.rings.iter().map(|r| r.point_count()).sum(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Wrote {} to {}", shape_name(shape), output_path.display()),
                    cli.format,
                    cli.quiet,
                );
                println!("  {}: {}", "Object".cyan(), result.object_id);
                println!("  {}: {}", "Rings".cyan(), result.rings);
                println!("  {}: {}", "Points".cyan(), result.points);
            }
        }
    }

    Ok(())
}
