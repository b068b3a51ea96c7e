//! Integration tests for copter-motion.
//!
//! Closed-loop scenarios: the generator output is fed back as the vehicle
//! state of the next cycle, emulating an inner loop that tracks perfectly.

use copter_motion::{
    ResetCounters, Setpoint, ShapingLimits, TrajectoryGenerator, TrajectorySetpoint,
    VehicleSample, WaypointContext,
};
use nalgebra::Vector3;

const DT: f32 = 0.02;

struct ClosedLoop {
    generator: TrajectoryGenerator,
    limits: ShapingLimits,
    vehicle: VehicleSample,
}

impl ClosedLoop {
    fn new(limits: ShapingLimits) -> Self {
        let vehicle = VehicleSample {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            yaw: 0.0,
            reset_counters: ResetCounters::default(),
        };

        let mut generator = TrajectoryGenerator::new();
        generator.activate(&Setpoint::empty(), &vehicle, &limits);

        Self {
            generator,
            limits,
            vehicle,
        }
    }

    fn step(&mut self, setpoint: &Setpoint, waypoints: &WaypointContext) -> TrajectorySetpoint {
        let output = self
            .generator
            .update(DT, &self.limits, &self.vehicle, setpoint, waypoints);

        self.vehicle.position = output.position;
        self.vehicle.velocity = output.velocity;

        output
    }
}

fn waypoints(
    previous: Vector3<f32>,
    target: Vector3<f32>,
    next: Vector3<f32>,
    cruise_speed: f32,
) -> WaypointContext {
    WaypointContext {
        previous,
        target,
        next,
        acceptance_radius: 2.0,
        cruise_speed,
        yaw_aligned: true,
    }
}

// =============================================================================
// Straight 10 m leg: smooth ramp, bounded, no overshoot
// =============================================================================

#[test]
fn test_straight_leg_ramps_and_stops_without_overshoot() {
    let limits = ShapingLimits {
        max_accel_xy: 2.0,
        max_vel_xy: 5.0,
        max_jerk: 4.0,
        ..ShapingLimits::default()
    };
    let mut sim = ClosedLoop::new(limits);

    let target = Vector3::new(10.0, 0.0, 0.0);
    let setpoint = Setpoint::from_position(target);
    let wp = waypoints(Vector3::zeros(), target, target, 5.0);

    let mut peak_speed = 0.0f32;
    let mut prev_accel = 0.0f32;
    let mut last = TrajectorySetpoint::hold_at(Vector3::zeros(), 0.0);

    for _ in 0..900 {
        last = sim.step(&setpoint, &wp);

        let speed = last.velocity.xy().norm();
        peak_speed = peak_speed.max(speed);

        // Bounds hold every single step
        assert!(speed <= 5.0 + 1e-3, "speed {} exceeded limit", speed);
        assert!(last.acceleration.xy().norm() <= 2.0 + 1e-3);

        // Jerk-limited: the acceleration never jumps faster than max_jerk
        let accel_step = (last.acceleration.x - prev_accel).abs();
        assert!(accel_step <= 4.0 * DT + 1e-3);
        prev_accel = last.acceleration.x;

        // No overshoot past the target
        assert!(last.position.x <= 10.0 + 0.05);
    }

    assert!(peak_speed > 2.0, "trajectory never got moving");
    assert!((last.position.x - 10.0).abs() < 0.1);
    assert!(last.velocity.norm() < 0.05);
    assert!(last.position.y.abs() < 1e-3);
}

// =============================================================================
// Intermediate waypoint on a straight track: no spurious stop
// =============================================================================

#[test]
fn test_straight_through_waypoint_keeps_speed() {
    let mut sim = ClosedLoop::new(ShapingLimits::default());

    let target = Vector3::new(10.0, 0.0, 0.0);
    let next = Vector3::new(20.0, 0.0, 0.0);
    let setpoint = Setpoint::from_position(target);
    let wp = waypoints(Vector3::zeros(), target, next, 12.0);

    let mut speed_near_waypoint = f32::INFINITY;

    for _ in 0..600 {
        let output = sim.step(&setpoint, &wp);
        let distance = (target - output.position).xy().norm();

        if distance < 1.0 {
            speed_near_waypoint = speed_near_waypoint.min(output.velocity.xy().norm());
        }
    }

    // The cornering bound (braking distance to `next`) keeps the vehicle
    // moving through the waypoint instead of stopping at it
    assert!(
        speed_near_waypoint > 1.0,
        "decelerated to {} at a straight-through waypoint",
        speed_near_waypoint
    );
}

// =============================================================================
// Estimator reset mid-flight: setpoint follows the jump, velocity does not
// =============================================================================

#[test]
fn test_position_reset_moves_setpoint_without_velocity_kick() {
    let mut sim = ClosedLoop::new(ShapingLimits::default());

    let target = Vector3::new(10.0, 10.0, 0.0);
    let setpoint = Setpoint::from_position(target);
    let wp = waypoints(Vector3::zeros(), target, target, 12.0);

    let mut before = TrajectorySetpoint::hold_at(Vector3::zeros(), 0.0);
    for _ in 0..50 {
        before = sim.step(&setpoint, &wp);
    }

    // The estimator decides the vehicle is actually at (3, 4)
    sim.vehicle.position = Vector3::new(3.0, 4.0, 0.0);
    sim.vehicle.reset_counters.xy = 1;

    let after = sim.step(&setpoint, &wp);

    // Setpoint re-anchors on the measured position within one step
    assert!((after.position.xy() - sim.vehicle.position.xy()).norm() < 0.1);
    // No velocity discontinuity rides along with the jump
    assert!((after.velocity - before.velocity).norm() < 0.1);

    // The same counter value must not retrigger
    let repeat = sim.step(&setpoint, &wp);
    assert!((repeat.position - after.position).norm() < 0.5);
}

// =============================================================================
// Incomplete input: hold previous output
// =============================================================================

#[test]
fn test_unspecified_targets_hold_previous_output() {
    let mut sim = ClosedLoop::new(ShapingLimits::default());

    let target = Vector3::new(10.0, 0.0, 0.0);
    let wp = waypoints(Vector3::zeros(), target, target, 12.0);

    let mut valid = TrajectorySetpoint::hold_at(Vector3::zeros(), 0.0);
    for _ in 0..25 {
        valid = sim.step(&Setpoint::from_position(target), &wp);
    }

    let held = sim.step(&Setpoint::empty(), &wp);

    assert_eq!(held.position, valid.position);
    assert_eq!(held.velocity, valid.velocity);
    assert_eq!(held.acceleration, valid.acceleration);
    assert_eq!(held.jerk, valid.jerk);
    assert_eq!(held.yaw, valid.yaw);
    assert_eq!(held.want_takeoff, valid.want_takeoff);
}

// =============================================================================
// Asymmetric vertical limits
// =============================================================================

#[test]
fn test_climb_and_descent_use_directional_limits() {
    let limits = ShapingLimits::default();

    // Climb: NED up is negative, bounded by max_vel_up = 3
    let mut sim = ClosedLoop::new(limits.clone());
    let up = Vector3::new(0.0, 0.0, -50.0);
    let wp_up = waypoints(Vector3::zeros(), up, up, 12.0);
    let mut fastest_climb = 0.0f32;

    for _ in 0..500 {
        let output = sim.step(&Setpoint::from_position(up), &wp_up);
        assert!(output.velocity.z >= -3.0 - 1e-3);
        fastest_climb = fastest_climb.min(output.velocity.z);
    }
    assert!(fastest_climb < -2.9, "climb never reached its rate limit");

    // Descent: bounded by max_vel_down = 1
    let mut sim = ClosedLoop::new(limits);
    let down = Vector3::new(0.0, 0.0, 50.0);
    let wp_down = waypoints(Vector3::zeros(), down, down, 12.0);
    let mut fastest_descent = 0.0f32;

    for _ in 0..500 {
        let output = sim.step(&Setpoint::from_position(down), &wp_down);
        assert!(output.velocity.z <= 1.0 + 1e-3);
        fastest_descent = fastest_descent.max(output.velocity.z);
    }
    assert!(fastest_descent > 0.9, "descent never reached its rate limit");
}

// =============================================================================
// Configuration round trip into the generator
// =============================================================================

#[test]
fn test_limits_from_toml_drive_the_generator() {
    let limits = copter_motion::parse_limits(
        r#"
max_accel_xy = 2.0
max_vel_xy = 1.5
max_jerk = 4.0
"#,
    )
    .expect("Should parse limits");

    let mut sim = ClosedLoop::new(limits);
    let target = Vector3::new(30.0, 0.0, 0.0);
    let wp = waypoints(Vector3::zeros(), target, target, 12.0);

    for _ in 0..400 {
        let output = sim.step(&Setpoint::from_position(target), &wp);
        // The TOML velocity limit, not the cruise speed, caps the leg
        assert!(output.velocity.xy().norm() <= 1.5 + 1e-3);
    }
}

#[test]
fn test_invalid_limits_rejected_before_flight() {
    assert!(copter_motion::parse_limits("max_jerk = 0.0").is_err());
    assert!(copter_motion::parse_limits("vertical_gain = -0.3").is_err());
}
