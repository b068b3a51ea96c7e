//! Configuration module for copter-motion.
//!
//! Provides the tunable limit set for the trajectory shaping core, loaded
//! from TOML files (with `std` feature) or built in code, plus validation.

mod limits;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use limits::{HeadingMode, ShapingLimits};
pub use validation::validate_limits;

#[cfg(feature = "std")]
pub use loader::{load_limits, parse_limits};
