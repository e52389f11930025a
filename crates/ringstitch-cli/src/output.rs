//! Shared output helpers for text and JSON modes.

use colored::Colorize;
use serde::Serialize;

use crate::OutputFormat;

/// Print a result as pretty JSON on stdout.
pub fn print<T: Serialize>(value: &T, _format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("{}: failed to serialize output: {}", "Error".red().bold(), e),
    }
}

/// Print a success line in text mode.
pub fn success(message: &str, format: OutputFormat, quiet: bool) {
    if quiet || matches!(format, OutputFormat::Json) {
        return;
    }
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning line to stderr in text mode.
pub fn warning(message: &str, format: OutputFormat, quiet: bool) {
    if quiet || matches!(format, OutputFormat::Json) {
        return;
    }
    eprintln!("{}: {}", "Warning".yellow().bold(), message);
}
