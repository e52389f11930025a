//! Error types for stitch planning with rich diagnostics.
//!
//! Degenerate geometry never produces an error: rings with too few points,
//! zero radii and unresolvable poles are handled locally with fallbacks
//! (see [`crate::chain`] and [`crate::poles`]). Errors are reserved for
//! things the caller has to fix: invalid parameters and unreadable
//! configuration.
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `STITCH-XXXX`:
//! - `STITCH-1xxx`: Parameter errors (gauge, factors)
//! - `STITCH-2xxx`: Input errors (rings, poles)
//! - `STITCH-3xxx`: Configuration I/O errors
//!
//! # Example
//!
//! ```
//! use ringstitch::{ErrorCode, StitchError};
//!
//! let err = StitchError::invalid_param("gauge_width", "0", "gauge width must be positive");
//! assert_eq!(err.code(), ErrorCode::InvalidParams);
//! assert_eq!(err.code().as_str(), "STITCH-1001");
//! ```

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for stitch planning operations.
pub type StitchResult<T> = Result<T, StitchError>;

/// Machine-readable error codes for stitch planning.
///
/// Codes follow the pattern `STITCH-XXXX` where:
/// - 1xxx = Parameter errors
/// - 2xxx = Input errors
/// - 3xxx = Configuration I/O errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Parameter errors (1xxx)
    /// STITCH-1001: A planning parameter is out of range
    InvalidParams = 1001,

    // Input errors (2xxx)
    /// STITCH-2001: A coordinate is NaN or infinite
    InvalidCoordinate = 2001,
    /// STITCH-2002: No rings were supplied for an object
    EmptyStack = 2002,

    // Configuration errors (3xxx)
    /// STITCH-3001: Configuration file could not be read
    ConfigRead = 3001,
    /// STITCH-3002: Configuration could not be parsed
    ConfigParse = 3002,
    /// STITCH-3003: Configuration could not be serialized
    ConfigSerialize = 3003,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `STITCH-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidParams => "STITCH-1001",
            ErrorCode::InvalidCoordinate => "STITCH-2001",
            ErrorCode::EmptyStack => "STITCH-2002",
            ErrorCode::ConfigRead => "STITCH-3001",
            ErrorCode::ConfigParse => "STITCH-3002",
            ErrorCode::ConfigSerialize => "STITCH-3003",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for stitch planning errors.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoverySuggestion {
    /// Change a parameter value.
    AdjustParameter {
        name: String,
        current: String,
        hint: String,
    },
    /// Check the geometry source for the listed problems.
    CheckInput { checks: Vec<String> },
    /// Fix the configuration file.
    FixConfig { path: Option<PathBuf> },
    /// No automatic recovery available.
    None,
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::AdjustParameter {
                name,
                current,
                hint,
            } => write!(f, "Adjust `{}` (currently {}): {}", name, current, hint),
            RecoverySuggestion::CheckInput { checks } => {
                write!(f, "Check the ring data for: {}", checks.join(", "))
            }
            RecoverySuggestion::FixConfig { path } => match path {
                Some(p) => write!(f, "Fix the configuration file {}", p.display()),
                None => write!(f, "Fix the configuration source"),
            },
            RecoverySuggestion::None => write!(f, "No automatic recovery available"),
        }
    }
}

/// Errors that can occur while planning stitches.
#[derive(Debug, Error, Diagnostic)]
pub enum StitchError {
    /// A planning parameter is out of range.
    #[error("invalid parameter `{name}` = {value}: {details}")]
    #[diagnostic(
        code(stitch::params::invalid),
        help("Gauge width and increase/decrease factors must be finite and positive.")
    )]
    InvalidParams {
        name: String,
        value: String,
        details: String,
    },

    /// A ring or pole coordinate is not finite.
    #[error("invalid coordinate in {context}: {value}")]
    #[diagnostic(
        code(stitch::input::coordinate),
        help("Check the slicer output for NaN or infinite values.")
    )]
    InvalidCoordinate { context: String, value: f64 },

    /// No rings were supplied for an object.
    #[error("no rings supplied for object `{object_id}`")]
    #[diagnostic(
        code(stitch::input::empty),
        help("The object needs at least one ring with two or more points.")
    )]
    EmptyStack { object_id: String },

    /// Configuration file could not be read.
    #[error("failed to read configuration from {path}")]
    #[diagnostic(
        code(stitch::config::read),
        help("Check that the file exists and is readable.")
    )]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed.
    #[error("failed to parse configuration: {details}")]
    #[diagnostic(
        code(stitch::config::parse),
        help("Compare the file against `ringstitch plan --print-config` output.")
    )]
    ConfigParse {
        path: Option<PathBuf>,
        details: String,
    },

    /// Configuration could not be serialized.
    #[error("failed to serialize configuration: {details}")]
    #[diagnostic(code(stitch::config::serialize))]
    ConfigSerialize { details: String },
}

impl StitchError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            StitchError::InvalidParams { .. } => ErrorCode::InvalidParams,
            StitchError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            StitchError::EmptyStack { .. } => ErrorCode::EmptyStack,
            StitchError::ConfigRead { .. } => ErrorCode::ConfigRead,
            StitchError::ConfigParse { .. } => ErrorCode::ConfigParse,
            StitchError::ConfigSerialize { .. } => ErrorCode::ConfigSerialize,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            StitchError::InvalidParams { name, value, .. } => {
                RecoverySuggestion::AdjustParameter {
                    name: name.clone(),
                    current: value.clone(),
                    hint: "use a finite value greater than zero".into(),
                }
            }
            StitchError::InvalidCoordinate { .. } => RecoverySuggestion::CheckInput {
                checks: vec!["NaN coordinates".into(), "infinite slicing keys".into()],
            },
            StitchError::EmptyStack { .. } => RecoverySuggestion::CheckInput {
                checks: vec!["object id spelling".into(), "slice count".into()],
            },
            StitchError::ConfigRead { path, .. } => RecoverySuggestion::FixConfig {
                path: Some(path.clone()),
            },
            StitchError::ConfigParse { path, .. } => {
                RecoverySuggestion::FixConfig { path: path.clone() }
            }
            StitchError::ConfigSerialize { .. } => RecoverySuggestion::None,
        }
    }

    // Constructor helpers

    /// Create an invalid parameter error.
    pub fn invalid_param(
        name: impl Into<String>,
        value: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        StitchError::InvalidParams {
            name: name.into(),
            value: value.into(),
            details: details.into(),
        }
    }

    /// Create an invalid coordinate error.
    pub fn invalid_coordinate(context: impl Into<String>, value: f64) -> Self {
        StitchError::InvalidCoordinate {
            context: context.into(),
            value,
        }
    }

    /// Create an empty stack error.
    pub fn empty_stack(object_id: impl Into<String>) -> Self {
        StitchError::EmptyStack {
            object_id: object_id.into(),
        }
    }

    /// Create a configuration parse error.
    pub fn config_parse(path: Option<PathBuf>, details: impl Into<String>) -> Self {
        StitchError::ConfigParse {
            path,
            details: details.into(),
        }
    }
}
