//! Planning configuration.
//!
//! [`PlanConfig`] collects every knob the chain planner reads. With the
//! `config` feature it can be loaded from and saved to TOML or JSON.
//!
//! # Example
//!
//! ```
//! use ringstitch::{PlanConfig, SpacingMode};
//!
//! let config = PlanConfig {
//!     gauge_width: 0.8,
//!     spacing: SpacingMode::Jagged,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{StitchError, StitchResult};
use crate::types::{Handedness, SpacingMode};

/// Parameters for turning a ring stack into a stitch chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PlanConfig {
    /// Width of one stitch, in the units of the ring coordinates.
    ///
    /// Default: `1.0`
    pub gauge_width: f64,

    /// Scale applied to the target count when the next ring is at least as
    /// large as the current one.
    ///
    /// Default: `1.0`
    pub increase_factor: f64,

    /// Scale applied to the target count when the next ring is smaller.
    ///
    /// Default: `1.0`
    pub decrease_factor: f64,

    /// Placement of increases and decreases around a round.
    ///
    /// Default: [`SpacingMode::Even`]
    pub spacing: SpacingMode,

    /// Direction nodes are laid out around the axis.
    ///
    /// Default: [`Handedness::Right`]
    pub handedness: Handedness,

    /// Seed for jagged placement. Each step derives its own stream from it.
    ///
    /// Default: `0`
    pub seed: u64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            gauge_width: 1.0,
            increase_factor: 1.0,
            decrease_factor: 1.0,
            spacing: SpacingMode::Even,
            handedness: Handedness::Right,
            seed: 0,
        }
    }
}

impl PlanConfig {
    /// Settings for tight fabric: narrower stitches and slightly reduced
    /// shaping so the piece does not ruffle.
    pub fn tight() -> Self {
        Self {
            gauge_width: 0.6,
            increase_factor: 0.95,
            decrease_factor: 0.95,
            ..Default::default()
        }
    }

    /// Settings for loose fabric with jagged shaping to hide seams.
    pub fn loose() -> Self {
        Self {
            gauge_width: 1.4,
            increase_factor: 1.05,
            decrease_factor: 1.0,
            spacing: SpacingMode::Jagged,
            ..Default::default()
        }
    }

    /// Set the gauge width.
    pub fn with_gauge_width(mut self, width: f64) -> Self {
        self.gauge_width = width;
        self
    }

    /// Set the spacing mode.
    pub fn with_spacing(mut self, spacing: SpacingMode) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the placement seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that all numeric parameters are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidParams`] naming the first bad field.
    pub fn validate(&self) -> StitchResult<()> {
        for (name, value) in [
            ("gauge_width", self.gauge_width),
            ("increase_factor", self.increase_factor),
            ("decrease_factor", self.decrease_factor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(StitchError::invalid_param(
                    name,
                    value.to_string(),
                    "must be finite and greater than zero",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "config")]
impl PlanConfig {
    /// Load configuration from a TOML string.
    ///
    /// Missing fields take their default values.
    pub fn from_toml(toml_str: &str) -> StitchResult<Self> {
        toml::from_str(toml_str).map_err(|e| StitchError::config_parse(None, e.to_string()))
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> StitchResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| StitchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents)
            .map_err(|e| StitchError::config_parse(Some(path.to_path_buf()), e.to_string()))
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> StitchResult<String> {
        toml::to_string_pretty(self).map_err(|e| StitchError::ConfigSerialize {
            details: e.to_string(),
        })
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json_str: &str) -> StitchResult<Self> {
        serde_json::from_str(json_str).map_err(|e| StitchError::config_parse(None, e.to_string()))
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> StitchResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StitchError::ConfigSerialize {
            details: e.to_string(),
        })
    }
}


#[cfg(all(test, feature = "config"))]
mod config_tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = PlanConfig::from_toml("gauge_width = 0.5\nspacing = \"jagged\"\n").unwrap();
        assert_eq!(config.gauge_width, 0.5);
        assert_eq!(config.spacing, SpacingMode::Jagged);
        assert_eq!(config.increase_factor, 1.0);
        assert_eq!(config.handedness, Handedness::Right);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PlanConfig::loose().with_seed(42);
        let text = config.to_toml().unwrap();
        assert_eq!(PlanConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_json_round_trip() {
        let config = PlanConfig::tight();
        let text = config.to_json().unwrap();
        assert_eq!(PlanConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_toml_reports_parse_error() {
        let err = PlanConfig::from_toml("gauge_width = \"wide\"").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigParse);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.toml");
        std::fs::write(&path, "seed = 7\nhandedness = \"left\"\n").unwrap();

        let config = PlanConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.handedness, Handedness::Left);

        let missing = PlanConfig::from_toml_file(dir.path().join("missing.toml")).unwrap_err();
        assert_eq!(missing.code(), ErrorCode::ConfigRead);
    }
}
