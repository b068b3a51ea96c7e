//! Error types for copter-motion.
//!
//! The per-cycle trajectory generation path never fails: degenerate inputs
//! degrade to safe defaults inside the same control tick. The only fallible
//! surface is loading and validating the shaping limits, so all errors here
//! are configuration errors.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all copter-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// A limit that must be strictly positive is zero, negative or non-finite.
    ///
    /// Non-positive acceleration or jerk limits would make the braking-speed
    /// solver divide by zero, so they are rejected up front.
    NonPositiveLimit {
        /// Configuration field name
        name: &'static str,
        /// Offending value
        value: f32,
    },
    /// A threshold that must be non-negative is negative or non-finite.
    NegativeThreshold {
        /// Configuration field name
        name: &'static str,
        /// Offending value
        value: f32,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::NonPositiveLimit { name, value } => {
                write!(f, "Invalid {}: {}. Must be > 0", name, value)
            }
            ConfigError::NegativeThreshold { name, value } => {
                write!(f, "Invalid {}: {}. Must be >= 0", name, value)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
