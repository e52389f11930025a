//! Measurement configuration.

use ringstitch::ObjectKind;

use crate::error::{MeasureError, MeasureResult};

/// Default distance under which the last anchor counts as sitting on the
/// end pole.
pub const DEFAULT_SNAP_EPSILON: f64 = 1e-3;

/// How anchors are chosen along a ring stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Strategy {
    /// Pick from the object kind and axis orientation.
    #[default]
    Auto,
    /// Upright stacks: plane cut, forward-side candidate.
    Generic,
    /// Horizontal stacks: start at the smallest ring near the start pole.
    Sideways,
    /// Round objects: fixed azimuth plane, most-forward candidate.
    Sphere,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Auto => "auto",
            Strategy::Generic => "generic",
            Strategy::Sideways => "sideways",
            Strategy::Sphere => "sphere",
        }
    }
}

/// How a segment between two points is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum DistanceMode {
    /// Straight-line distance.
    Euclidean,
    /// Distance along the object axis only.
    AxisProjected,
}

impl DistanceMode {
    /// Reporting mode for an object kind: round objects measure along the
    /// surface, everything else along the axis.
    pub fn for_kind(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Sphere => DistanceMode::Euclidean,
            _ => DistanceMode::AxisProjected,
        }
    }
}

/// Parameters for anchor stabilization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MeasureConfig {
    /// Fixed azimuth of the cutting plane in degrees, measured around the
    /// axis from the in-plane reference direction. `None` derives the
    /// facing direction from the first ring.
    ///
    /// Default: `None`
    pub azimuth_deg: Option<f64>,

    /// Distance under which the last anchor is considered to be on the
    /// end pole.
    ///
    /// Default: [`DEFAULT_SNAP_EPSILON`]
    pub snap_epsilon: f64,

    /// Keep every N-th anchor. The last anchor is always kept.
    ///
    /// Default: `1`
    pub measure_every: usize,

    /// Skip the pole-to-anchor segments at both ends.
    ///
    /// Default: `false`
    pub suppress_pole_segments: bool,

    /// Default: [`Strategy::Auto`]
    pub strategy: Strategy,

    /// Override the distance mode picked from the object kind.
    ///
    /// Default: `None`
    pub distance_mode: Option<DistanceMode>,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            azimuth_deg: None,
            snap_epsilon: DEFAULT_SNAP_EPSILON,
            measure_every: 1,
            suppress_pole_segments: false,
            strategy: Strategy::Auto,
            distance_mode: None,
        }
    }
}

impl MeasureConfig {
    pub fn with_azimuth_deg(mut self, degrees: f64) -> Self {
        self.azimuth_deg = Some(degrees);
        self
    }

    pub fn with_measure_every(mut self, every: usize) -> Self {
        self.measure_every = every;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the numeric parameters.
    ///
    /// # Errors
    ///
    /// - [`MeasureError::InvalidAzimuth`] for a NaN or infinite azimuth
    /// - [`MeasureError::InvalidParams`] for a zero stride or a negative
    ///   or non-finite snap epsilon
    pub fn validate(&self) -> MeasureResult<()> {
        if let Some(azimuth) = self.azimuth_deg {
            if !azimuth.is_finite() {
                return Err(MeasureError::InvalidAzimuth { value: azimuth });
            }
        }
        if self.measure_every == 0 {
            return Err(MeasureError::invalid_param(
                "measure_every",
                "0",
                "stride must be at least 1",
            ));
        }
        if !self.snap_epsilon.is_finite() || self.snap_epsilon < 0.0 {
            return Err(MeasureError::invalid_param(
                "snap_epsilon",
                self.snap_epsilon.to_string(),
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(feature = "config")]
impl MeasureConfig {
    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> MeasureResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| ringstitch::StitchError::config_parse(None, e.to_string()).into())
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> MeasureResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| ringstitch::StitchError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        toml::from_str(&contents).map_err(|e| {
            ringstitch::StitchError::config_parse(Some(path.to_path_buf()), e.to_string()).into()
        })
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> MeasureResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ringstitch::StitchError::ConfigSerialize {
                details: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json_str: &str) -> MeasureResult<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| ringstitch::StitchError::config_parse(None, e.to_string()).into())
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> MeasureResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ringstitch::StitchError::ConfigSerialize {
                details: e.to_string(),
            }
            .into()
        })
    }
}


#[cfg(all(test, feature = "config"))]
mod config_tests {
    use super::*;
    use crate::error::MeasureErrorCode;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config =
            MeasureConfig::from_toml("azimuth_deg = 90.0\nstrategy = \"sideways\"\n").unwrap();
        assert_eq!(config.azimuth_deg, Some(90.0));
        assert_eq!(config.strategy, Strategy::Sideways);
        assert_eq!(config.measure_every, 1);
        assert_eq!(config.distance_mode, None);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MeasureConfig {
            distance_mode: Some(DistanceMode::Euclidean),
            measure_every: 3,
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(MeasureConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_json_round_trip() {
        let config = MeasureConfig::default().with_strategy(Strategy::Sphere);
        let text = config.to_json().unwrap();
        assert_eq!(MeasureConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_parse_error_is_wrapped() {
        let err = MeasureConfig::from_toml("measure_every = \"often\"").unwrap_err();
        assert_eq!(err.code(), MeasureErrorCode::Stitch);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("measure.toml");
        std::fs::write(&path, "measure_every = 2\nsuppress_pole_segments = true\n").unwrap();

        let config = MeasureConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.measure_every, 2);
        assert!(config.suppress_pole_segments);
    }
}
