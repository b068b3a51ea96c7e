//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::ShapingLimits;

/// Load shaping limits from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use copter_motion::load_limits;
///
/// let limits = load_limits("shaping.toml")?;
/// ```
pub fn load_limits<P: AsRef<Path>>(path: P) -> Result<ShapingLimits> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_limits(&content)
}

/// Parse shaping limits from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_limits(content: &str) -> Result<ShapingLimits> {
    let limits: ShapingLimits = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    // Validate before handing the limits to the numerics
    super::validation::validate_limits(&limits)?;

    Ok(limits)
}
