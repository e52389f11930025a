//! Subcommand implementations.

pub mod measure;
pub mod pattern;
pub mod plan;
pub mod sample;
