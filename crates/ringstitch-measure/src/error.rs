// Fields used only in thiserror Display strings show up as never read.
#![allow(unused_assignments)]

//! Error types for measurement runs.
//!
//! Missing anchors and unresolved poles are not errors: they shorten the
//! measurement instead. Errors are limited to bad parameters and failures
//! passed up from the planning crate.

use miette::Diagnostic;
use ringstitch::StitchError;
use thiserror::Error;

/// Result type alias for measurement operations.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Machine-readable error codes.
///
/// Codes follow the pattern `MEASURE-XXXX` where:
/// - 1xxx = Parameter errors
/// - 2xxx = Errors from the planning crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureErrorCode {
    /// MEASURE-1001: Invalid parameters
    InvalidParams = 1001,
    /// MEASURE-1002: Azimuth is not a finite angle
    InvalidAzimuth = 1002,

    /// MEASURE-2001: Input or configuration error from ringstitch
    Stitch = 2001,
}

impl MeasureErrorCode {
    /// Returns the error code as a string in the format `MEASURE-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasureErrorCode::InvalidParams => "MEASURE-1001",
            MeasureErrorCode::InvalidAzimuth => "MEASURE-1002",
            MeasureErrorCode::Stitch => "MEASURE-2001",
        }
    }
}

impl std::fmt::Display for MeasureErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for measurement errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureRecoverySuggestion {
    /// Use a different parameter value.
    AdjustParameter { name: String, suggested: String },
    /// Fix the ring or pole input.
    CheckInput,
    /// No specific suggestion.
    None,
}

impl std::fmt::Display for MeasureRecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureRecoverySuggestion::AdjustParameter { name, suggested } => {
                write!(f, "Set `{}` to {}", name, suggested)
            }
            MeasureRecoverySuggestion::CheckInput => {
                write!(f, "Check the ring stack and pole markers for invalid values")
            }
            MeasureRecoverySuggestion::None => write!(f, "No specific suggestion available"),
        }
    }
}

/// Errors that can occur while measuring a ring stack.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// A parameter is out of range.
    #[error("invalid measurement parameter `{param_name}` = {param_value}: {details}")]
    InvalidParams {
        details: String,
        param_name: String,
        param_value: String,
    },

    /// Azimuth is NaN or infinite.
    #[error("azimuth must be a finite angle in degrees, got {value}")]
    InvalidAzimuth { value: f64 },

    /// Error from the planning crate.
    #[error(transparent)]
    Stitch(#[from] StitchError),
}

// Written by hand instead of derived: `#[diagnostic(transparent)]` on the
// `Stitch` variant would resolve to `StitchError`'s inherent `code()` method.
impl Diagnostic for MeasureError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self {
            MeasureError::InvalidParams { .. } => Some(Box::new("measure::params::invalid")),
            MeasureError::InvalidAzimuth { .. } => Some(Box::new("measure::params::azimuth")),
            MeasureError::Stitch(e) => Diagnostic::code(e),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self {
            MeasureError::InvalidParams { .. } => Some(Box::new(
                "measure_every must be at least 1 and snap_epsilon must be finite and non-negative.",
            )),
            MeasureError::InvalidAzimuth { .. } => {
                Some(Box::new("Pass an angle such as 0, 90 or -45."))
            }
            MeasureError::Stitch(e) => Diagnostic::help(e),
        }
    }

    fn url<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self {
            MeasureError::Stitch(e) => Diagnostic::url(e),
            _ => None,
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            MeasureError::Stitch(e) => Diagnostic::severity(e),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        match self {
            MeasureError::Stitch(e) => Diagnostic::labels(e),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            MeasureError::Stitch(e) => Diagnostic::source_code(e),
            _ => None,
        }
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        match self {
            MeasureError::Stitch(e) => Diagnostic::related(e),
            _ => None,
        }
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        match self {
            MeasureError::Stitch(e) => Diagnostic::diagnostic_source(e),
            _ => None,
        }
    }
}

impl MeasureError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> MeasureErrorCode {
        match self {
            MeasureError::InvalidParams { .. } => MeasureErrorCode::InvalidParams,
            MeasureError::InvalidAzimuth { .. } => MeasureErrorCode::InvalidAzimuth,
            MeasureError::Stitch(_) => MeasureErrorCode::Stitch,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> MeasureRecoverySuggestion {
        match self {
            MeasureError::InvalidParams { param_name, .. } => {
                let suggested = match param_name.as_str() {
                    "measure_every" => "1",
                    _ => "0.001",
                };
                MeasureRecoverySuggestion::AdjustParameter {
                    name: param_name.clone(),
                    suggested: suggested.to_string(),
                }
            }
            MeasureError::InvalidAzimuth { .. } => MeasureRecoverySuggestion::AdjustParameter {
                name: "azimuth_deg".to_string(),
                suggested: "0".to_string(),
            },
            MeasureError::Stitch(_) => MeasureRecoverySuggestion::CheckInput,
        }
    }

    // Constructor helpers

    /// Create an invalid parameter error.
    pub fn invalid_param(
        param_name: impl Into<String>,
        param_value: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        MeasureError::InvalidParams {
            details: details.into(),
            param_name: param_name.into(),
            param_value: param_value.into(),
        }
    }
}
