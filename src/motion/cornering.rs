//! Cornering-speed planner.
//!
//! Bounds the speed allowed while transiting a waypoint from the geometry of
//! the incoming and outgoing legs, approximating a tangent-circle blend
//! between the two straight lines without generating a curvature-continuous
//! path.

use libm::{acosf, sqrtf, tanf};
use nalgebra::{Vector2, Vector3};

use super::braking::max_speed_from_distance;

/// Legs shorter than this are treated as degenerate (no outgoing leg).
const MIN_LEG_LENGTH: f32 = 1e-3;

fn unit_or_zero(v: Vector2<f32>) -> Vector2<f32> {
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vector2::zeros)
}

/// Maximum horizontal speed allowed while transiting `target`.
///
/// Returns 0 (full stop at the waypoint) unless all of the following hold:
/// the outgoing leg to `next` is non-degenerate, `previous` lies outside the
/// acceptance radius of `target` (no waypoint overlap), and `yaw_gate` is
/// satisfied (heading already aligned, or no align-before-proceed mode).
///
/// When eligible, the result is the minimum of three bounds:
///
/// 1. the centripetal bound `sqrt(accel/2 · acceptance_radius/2 · tan(α))`,
///    where `α` is half the angle between the legs: half the acceleration
///    limit reserves headroom for the jerk-limited transition into the turn,
///    and half the acceptance radius accounts for the navigator switching
///    waypoints early (both constants are flight-tuned, keep them);
/// 2. the braking speed over the outgoing leg, so the vehicle can still stop
///    at `next`;
/// 3. the commanded cruise speed.
///
/// For a straight-through waypoint `α` approaches 90° and the centripetal
/// bound blows up; it is dropped from the minimum so the braking and cruise
/// bounds decide.
#[allow(clippy::too_many_arguments)]
pub fn speed_at_waypoint(
    previous: &Vector3<f32>,
    target: &Vector3<f32>,
    next: &Vector3<f32>,
    acceptance_radius: f32,
    cruise_speed: f32,
    yaw_gate: bool,
    accel: f32,
    jerk: f32,
    braking_slope: f32,
) -> f32 {
    let to_previous = (target - previous).xy();
    let to_next = (target - next).xy();

    let distance_next = to_next.norm();
    let waypoint_overlap = to_previous.norm() < acceptance_radius;

    if distance_next <= MIN_LEG_LENGTH || waypoint_overlap || !yaw_gate {
        return 0.0;
    }

    let braking_bound = max_speed_from_distance(distance_next, accel, jerk, braking_slope);

    let cos_angle = unit_or_zero(to_previous)
        .dot(&unit_or_zero(to_next))
        .clamp(-1.0, 1.0);
    let half_angle = acosf(cos_angle) / 2.0;
    let tan_half_angle = tanf(half_angle);

    // tan(α) is unusable at the straight-line singularity (f32 rounding can
    // even flip its sign there); the other two bounds take over
    let centripetal_bound = if tan_half_angle.is_finite() && tan_half_angle >= 0.0 {
        sqrtf(accel / 2.0 * acceptance_radius / 2.0 * tan_half_angle)
    } else {
        f32::INFINITY
    };

    centripetal_bound.min(braking_bound).min(cruise_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCEL: f32 = 3.0;
    const JERK: f32 = 8.0;
    const SLOPE: f32 = 0.5;

    fn v(x: f32, y: f32) -> Vector3<f32> {
        Vector3::new(x, y, 0.0)
    }

    #[test]
    fn test_right_angle_turn_is_finite_and_below_cruise() {
        let speed = speed_at_waypoint(
            &v(0.0, 0.0),
            &v(10.0, 0.0),
            &v(10.0, 10.0),
            2.0,
            12.0,
            true,
            ACCEL,
            JERK,
            SLOPE,
        );

        assert!(speed > 0.0);
        assert!(speed < 12.0);
        // 90° turn: α = 45°, tan = 1 -> sqrt(1.5 * 1.0) ≈ 1.22 dominates
        assert!((speed - sqrtf(1.5)).abs() < 1e-3);
    }

    #[test]
    fn test_waypoint_overlap_forces_stop() {
        // Previous waypoint inside the acceptance radius
        let speed = speed_at_waypoint(
            &v(9.0, 0.0),
            &v(10.0, 0.0),
            &v(20.0, 0.0),
            2.0,
            12.0,
            true,
            ACCEL,
            JERK,
            SLOPE,
        );
        assert_eq!(speed, 0.0);
    }

    #[test]
    fn test_degenerate_next_leg_forces_stop() {
        let speed = speed_at_waypoint(
            &v(0.0, 0.0),
            &v(10.0, 0.0),
            &v(10.0, 0.0),
            2.0,
            12.0,
            true,
            ACCEL,
            JERK,
            SLOPE,
        );
        assert_eq!(speed, 0.0);
    }

    #[test]
    fn test_yaw_gate_forces_stop() {
        let speed = speed_at_waypoint(
            &v(0.0, 0.0),
            &v(10.0, 0.0),
            &v(10.0, 10.0),
            2.0,
            12.0,
            false,
            ACCEL,
            JERK,
            SLOPE,
        );
        assert_eq!(speed, 0.0);
    }

    #[test]
    fn test_straight_line_bounded_by_braking_not_centripetal() {
        // Collinear legs: the centripetal bound is dropped and the braking
        // bound over the outgoing leg decides
        let speed = speed_at_waypoint(
            &v(0.0, 0.0),
            &v(10.0, 0.0),
            &v(20.0, 0.0),
            2.0,
            100.0,
            true,
            ACCEL,
            JERK,
            SLOPE,
        );

        let braking = max_speed_from_distance(10.0, ACCEL, JERK, SLOPE);
        assert!(speed.is_finite());
        assert!((speed - braking).abs() < 1e-4);
    }

    #[test]
    fn test_hairpin_forces_near_stop() {
        // Full reversal: α -> 0, tan -> 0, centripetal bound collapses
        let speed = speed_at_waypoint(
            &v(0.0, 0.0),
            &v(10.0, 0.0),
            &v(0.0, 0.001),
            2.0,
            12.0,
            true,
            ACCEL,
            JERK,
            SLOPE,
        );
        assert!(speed < 0.1);
    }

    #[test]
    fn test_cruise_cap_applies() {
        let speed = speed_at_waypoint(
            &v(0.0, 0.0),
            &v(100.0, 0.0),
            &v(200.0, 0.0),
            2.0,
            1.5,
            true,
            ACCEL,
            JERK,
            SLOPE,
        );
        assert!((speed - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_offsets_ignored() {
        // Geometry is horizontal only; altitude differences between the
        // waypoints must not change the bound
        let flat = speed_at_waypoint(
            &v(0.0, 0.0),
            &v(10.0, 0.0),
            &v(10.0, 10.0),
            2.0,
            12.0,
            true,
            ACCEL,
            JERK,
            SLOPE,
        );
        let tilted = speed_at_waypoint(
            &Vector3::new(0.0, 0.0, -5.0),
            &Vector3::new(10.0, 0.0, -8.0),
            &Vector3::new(10.0, 10.0, -2.0),
            2.0,
            12.0,
            true,
            ACCEL,
            JERK,
            SLOPE,
        );
        assert!((flat - tilted).abs() < 1e-6);
    }
}
