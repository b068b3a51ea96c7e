//! Trajectory shaping limits and heading policy.
//!
//! All limits are expressed in the vehicle's local NED frame (x north,
//! y east, z down): ascending flight has a *negative* vertical velocity.
//! Horizontal limits apply symmetrically to both lateral axes; vertical
//! limits are direction dependent because multicopters can usually climb
//! harder than they can safely descend.

use serde::Deserialize;

/// Heading generation policy for waypoint flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum HeadingMode {
    /// Turn towards the course while already translating.
    #[default]
    AlongCourse,
    /// Hold position until the heading is aligned with the next leg,
    /// then proceed.
    AlignFirst,
}

/// Tunable limits for the trajectory shaping core.
///
/// Passed into the generator as an explicit snapshot every control cycle so
/// the numerics stay testable in isolation; nothing here is read from
/// ambient global storage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShapingLimits {
    /// Maximum horizontal acceleration in m/s².
    pub max_accel_xy: f32,

    /// Maximum horizontal velocity in m/s.
    pub max_vel_xy: f32,

    /// Maximum jerk in m/s³, shared by all three axes.
    pub max_jerk: f32,

    /// Maximum ascending acceleration in m/s² (vertical velocity < 0).
    pub max_accel_up: f32,

    /// Maximum descending acceleration in m/s² (vertical velocity >= 0).
    pub max_accel_down: f32,

    /// Maximum ascending speed in m/s.
    pub max_vel_up: f32,

    /// Maximum descending speed in m/s.
    pub max_vel_down: f32,

    /// Linear cap on the braking-speed solver, in (m/s) per metre of
    /// remaining distance. Bounds the solver's gain near the target where
    /// the square-root term's slope diverges.
    pub braking_slope_xy: f32,

    /// Proportional gain (1/s) turning an altitude error into a vertical
    /// velocity target.
    pub vertical_gain: f32,

    /// Altitude tracking error (m) below which the cornering speed bound is
    /// applied. While still correcting altitude, waypoints are approached at
    /// cruise speed without cornering logic.
    pub alt_acceptance: f32,

    /// Heading generation policy.
    pub heading_mode: HeadingMode,
}

impl Default for ShapingLimits {
    fn default() -> Self {
        Self {
            max_accel_xy: 3.0,
            max_vel_xy: 12.0,
            max_jerk: 8.0,
            max_accel_up: 4.0,
            max_accel_down: 3.0,
            max_vel_up: 3.0,
            max_vel_down: 1.0,
            braking_slope_xy: 0.5,
            vertical_gain: 0.3,
            alt_acceptance: 0.8,
            heading_mode: HeadingMode::AlongCourse,
        }
    }
}
