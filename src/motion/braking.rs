//! Braking-speed solver.

use libm::sqrtf;

/// Maximum speed from which the vehicle can still stop within
/// `distance` metres under the given acceleration and jerk limits.
///
/// Models a constant-deceleration stop that only becomes available after a
/// jerk-imposed delay of `2·accel/jerk` (the time to swing the acceleration
/// from one extreme to the other), which gives the quadratic
/// `0 = v² − 2·accel·(distance − v·2·accel/jerk)` solved here for its
/// positive root. Near the target the square root's slope diverges, so the
/// result is additionally capped at `distance · slope` m/s.
///
/// `accel` and `jerk` must be strictly positive; this is a configuration
/// precondition enforced by [`validate_limits`](crate::validate_limits),
/// not a runtime error.
pub fn max_speed_from_distance(distance: f32, accel: f32, jerk: f32, slope: f32) -> f32 {
    let b = 4.0 * accel * accel / jerk;
    let c = -2.0 * accel * distance;
    let max_speed = 0.5 * (-b + sqrtf(b * b - 4.0 * c));

    max_speed.min(distance * slope).max(0.0)
}
