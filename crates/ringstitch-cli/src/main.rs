//! ringstitch: crochet patterns from sliced cross-section rings.
//!
//! Reads a JSON scene of rings and pole markers (as written by a slicer or
//! by `ringstitch sample`) and prints stitch plans, textual patterns or
//! measurement overlays.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=ringstitch=info` - Chain summaries and timings
//! - `RUST_LOG=ringstitch::chain=debug` - Per-round stitch counts
//! - `RUST_LOG=ringstitch::measure=debug` - Anchor strategy decisions
//! - `RUST_LOG=debug` - All debug output
//!
//! # Example
//!
//! ```bash
//! ringstitch sample sphere -o ball.json --radius 4 --layers 14
//! ringstitch pattern ball.json
//! RUST_LOG=ringstitch=info ringstitch plan ball.json --spacing jagged --seed 7
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod input;
mod output;
mod settings;

use commands::{measure, pattern, plan, sample};

/// ringstitch - crochet stitch planning from ring stacks.
///
/// Turn slices of a 3D shape into round-by-round crochet instructions.
#[derive(Parser)]
#[command(name = "ringstitch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan stitch counts and increases/decreases for every object
    Plan {
        /// Input scene file (JSON)
        input: PathBuf,

        /// Settings file with [plan] and [measure] tables (TOML)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Stitch width in scene units
        #[arg(long)]
        width: Option<f64>,

        /// Placement of increases and decreases
        #[arg(long)]
        spacing: Option<Spacing>,

        /// Seed for jagged placement
        #[arg(long)]
        seed: Option<u64>,

        /// Print the effective settings as TOML and exit
        #[arg(long)]
        print_config: bool,
    },

    /// Print the round-by-round crochet pattern
    Pattern {
        /// Input scene file (JSON)
        input: PathBuf,

        /// Only print this object
        #[arg(long)]
        object: Option<String>,

        /// Settings file with [plan] and [measure] tables (TOML)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Stitch width in scene units
        #[arg(long)]
        width: Option<f64>,
    },

    /// Compute measurement anchors and segments
    Measure {
        /// Input scene file (JSON)
        input: PathBuf,

        /// Settings file with [plan] and [measure] tables (TOML)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Fix the cutting plane at this azimuth (degrees)
        #[arg(long, allow_hyphen_values = true)]
        azimuth: Option<f64>,

        /// Keep every N-th anchor
        #[arg(long)]
        every: Option<usize>,

        /// Do not synthesize segments to the poles
        #[arg(long)]
        no_pole_segments: bool,

        /// Anchor strategy
        #[arg(long)]
        strategy: Option<AnchorStrategyArg>,
    },

    /// Write a synthetic scene for a primitive shape
    Sample {
        /// Shape to generate
        shape: SampleShape,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Radius (base radius for cones)
        #[arg(long, default_value = "5.0")]
        radius: f64,

        /// Height or length; defaults to twice the radius
        #[arg(long)]
        height: Option<f64>,

        /// Number of rings
        #[arg(long, default_value = "12")]
        layers: usize,

        /// Points per ring
        #[arg(long, default_value = "48")]
        segments: usize,

        /// Object id; defaults to the shape name
        #[arg(long)]
        id: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Spacing {
    /// Increases and decreases spread evenly
    Even,
    /// Seeded jitter to hide the seams
    Jagged,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AnchorStrategyArg {
    /// Choose from object kind and axis
    Auto,
    /// Upright stacks
    Generic,
    /// Stacks lying on their side
    Sideways,
    /// Round objects
    Sphere,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SampleShape {
    Sphere,
    Cone,
    Cylinder,
    LyingCylinder,
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "ringstitch=info,ringstitch_measure=info",
            2 => "ringstitch=debug,ringstitch_measure=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Plan {
            input,
            config,
            width,
            spacing,
            seed,
            print_config,
        } => plan::run(
            input,
            config.as_deref(),
            plan::Overrides {
                width: *width,
                spacing: *spacing,
                seed: *seed,
            },
            *print_config,
            &cli,
        ),
        Commands::Pattern {
            input,
            object,
            config,
            width,
        } => pattern::run(input, object.as_deref(), config.as_deref(), *width, &cli),
        Commands::Measure {
            input,
            config,
            azimuth,
            every,
            no_pole_segments,
            strategy,
        } => measure::run(
            input,
            config.as_deref(),
            measure::Overrides {
                azimuth: *azimuth,
                every: *every,
                no_pole_segments: *no_pole_segments,
                strategy: *strategy,
            },
            &cli,
        ),
        Commands::Sample {
            shape,
            output,
            radius,
            height,
            layers,
            segments,
            id,
        } => sample::run(
            *shape,
            output,
            sample::Dimensions {
                radius: *radius,
                height: *height,
                layers: *layers,
                segments: *segments,
            },
            id.as_deref(),
            &cli,
        ),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(err) = e.downcast_ref::<ringstitch::StitchError>() {
                eprintln!("{}: {}", "Error".red().bold(), err);
                eprintln!("  {}: {}", "Code".cyan(), err.code());
                eprintln!("  {}: {}", "Suggestion".green(), err.recovery_suggestion());
            } else if let Some(err) = e.downcast_ref::<ringstitch_measure::MeasureError>() {
                eprintln!("{}: {}", "Error".red().bold(), err);
                eprintln!("  {}: {}", "Code".cyan(), err.code());
                eprintln!("  {}: {}", "Suggestion".green(), err.recovery_suggestion());
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
