//! Shaping limit validation.
//!
//! The trajectory numerics assume strictly positive acceleration, velocity
//! and jerk limits (the braking solver divides by the jerk limit), so the
//! limits are checked once at load time instead of per control cycle.

use crate::error::{ConfigError, Result};

use super::ShapingLimits;

/// Validate a set of shaping limits.
///
/// # Errors
///
/// Returns [`ConfigError::NonPositiveLimit`] for any acceleration, velocity,
/// jerk, slope or gain that is not strictly positive and finite, and
/// [`ConfigError::NegativeThreshold`] for a negative altitude acceptance
/// radius.
pub fn validate_limits(limits: &ShapingLimits) -> Result<()> {
    let positive = [
        ("max_accel_xy", limits.max_accel_xy),
        ("max_vel_xy", limits.max_vel_xy),
        ("max_jerk", limits.max_jerk),
        ("max_accel_up", limits.max_accel_up),
        ("max_accel_down", limits.max_accel_down),
        ("max_vel_up", limits.max_vel_up),
        ("max_vel_down", limits.max_vel_down),
        ("braking_slope_xy", limits.braking_slope_xy),
        ("vertical_gain", limits.vertical_gain),
    ];

    for (name, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::NonPositiveLimit { name, value }.into());
        }
    }

    if !(limits.alt_acceptance.is_finite() && limits.alt_acceptance >= 0.0) {
        return Err(ConfigError::NegativeThreshold {
            name: "alt_acceptance",
            value: limits.alt_acceptance,
        }
        .into());
    }

    Ok(())
}
