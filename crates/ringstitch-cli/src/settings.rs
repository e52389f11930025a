//! Settings file with `[plan]` and `[measure]` tables.
//!
//! ```toml
//! [plan]
//! gauge_width = 0.8
//! spacing = "jagged"
//! seed = 7
//!
//! [measure]
//! measure_every = 2
//! ```
//!
//! Either table may be missing; missing fields take their defaults.
//! Command-line flags are applied on top.

use std::path::Path;

use ringstitch::{PlanConfig, StitchError, StitchResult};
use ringstitch_measure::MeasureConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub plan: PlanConfig,
    pub measure: MeasureConfig,
}

impl Settings {
    /// Load from a file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> StitchResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| StitchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents)
            .map_err(|e| StitchError::config_parse(Some(path.to_path_buf()), e.to_string()))
    }

    pub fn to_toml(&self) -> StitchResult<String> {
        toml::to_string_pretty(self).map_err(|e| StitchError::ConfigSerialize {
            details: e.to_string(),
        })
    }
}
