// Error types module

use std::fmt;

/// Run-abort errors surfaced before per-image processing starts.
///
/// Per-image failures are handled inside the batch loop and never abort the
/// run; these categories cover setup problems that do, plus an explicit
/// cancellation by the user.
#[derive(Debug)]
pub enum CapbandError {
    /// Configuration errors (bad flag values, unreadable config file)
    Config(String),

    /// Input scanning errors (missing or unreadable input folder, no images)
    Scan(String),

    /// Caption acquisition errors (missing or empty titles file)
    Captions(String),

    /// The user declined to continue at a confirmation prompt
    Cancelled,
}

impl fmt::Display for CapbandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapbandError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CapbandError::Scan(msg) => write!(f, "Input error: {}", msg),
            CapbandError::Captions(msg) => write!(f, "Caption error: {}", msg),
            CapbandError::Cancelled => write!(f, "Cancelled by user"),
        }
    }
}

impl std::error::Error for CapbandError {}

impl From<crate::config::ConfigError> for CapbandError {
    fn from(err: crate::config::ConfigError) -> Self {
        CapbandError::Config(err.to_string())
    }
}

impl From<crate::pipeline::ScanError> for CapbandError {
    fn from(err: crate::pipeline::ScanError) -> Self {
        CapbandError::Scan(err.to_string())
    }
}

impl From<crate::pipeline::CaptionError> for CapbandError {
    fn from(err: crate::pipeline::CaptionError) -> Self {
        match err {
            crate::pipeline::CaptionError::Declined => CapbandError::Cancelled,
            other => CapbandError::Captions(other.to_string()),
        }
    }
}
