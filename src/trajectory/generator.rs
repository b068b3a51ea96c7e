//! Per-cycle trajectory orchestration.
//!
//! [`TrajectoryGenerator`] owns the three per-axis shapers and drives one
//! control cycle end to end: reconcile estimator resets, turn position
//! targets into braking- and cornering-bounded velocity targets, integrate
//! the jerk-limited profiles with time-stretch damping, synchronize the
//! horizontal pair and emit a fully-specified setpoint.

use libm::atan2f;
use nalgebra::{Vector2, Vector3};

use crate::config::{HeadingMode, ShapingLimits};
use crate::motion::{max_speed_from_distance, speed_at_waypoint, synchronize, AxisShaper};

use super::reset::ResetReconciler;
use super::setpoint::{Setpoint, TrajectorySetpoint, VehicleSample, WaypointContext};

/// Minimum horizontal speed (m/s) before a heading is derived from the
/// velocity direction.
const MIN_HEADING_SPEED: f32 = 0.1;

/// Upward vertical speed (m/s) past which the cycle reports takeoff intent.
/// NED: climbing is negative vertical velocity.
const TAKEOFF_CLIMB_RATE: f32 = 0.3;

/// Relaxed horizontal jerk limit (m/s³) applied near a full stop so the
/// profiles converge to zero instead of ringing.
const STOP_JERK: f32 = 1.0;

fn unit_or_zero(v: Vector2<f32>) -> Vector2<f32> {
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vector2::zeros)
}

/// Clamp `value` to the interval `{min(0, bound), max(0, bound)}`.
///
/// Encodes the one-sided velocity limit semantics: an externally supplied
/// bound only constrains motion on the side matching its sign and forbids
/// motion in the opposite direction, it never commands a speed.
fn constrain_one_sided(value: f32, bound: f32) -> f32 {
    let min = if bound < 0.0 { bound } else { 0.0 };
    let max = if bound > 0.0 { bound } else { 0.0 };

    value.clamp(min, max)
}

/// Trajectory-shaping orchestrator for one vehicle.
///
/// All state is private to the instance; the caller invokes
/// [`update`](TrajectoryGenerator::update) once per fixed-rate control tick
/// with fresh vehicle state and the current target. There is no cancellation
/// at this layer: stop calling `update` on deactivation and re-seed with
/// [`activate`](TrajectoryGenerator::activate) later.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryGenerator {
    shapers: [AxisShaper; 3],
    reconciler: ResetReconciler,
    yaw_prev: f32,
    last: Option<TrajectorySetpoint>,
}

impl TrajectoryGenerator {
    /// Create an inactive generator; call [`activate`](Self::activate)
    /// before the first cycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the trajectory from the previous controller's last setpoint so
    /// the hand-off is continuous.
    ///
    /// Unspecified components of `last_setpoint` fall back to the current
    /// vehicle state (acceleration to zero, heading to the vehicle heading).
    /// The estimator reset counters are latched so pre-activation resets are
    /// not replayed.
    pub fn activate(
        &mut self,
        last_setpoint: &Setpoint,
        vehicle: &VehicleSample,
        limits: &ShapingLimits,
    ) {
        let mut position = last_setpoint.position;
        let mut velocity = last_setpoint.velocity;
        let mut acceleration = last_setpoint.acceleration;

        for i in 0..3 {
            if !position[i].is_finite() {
                position[i] = vehicle.position[i];
            }

            if !velocity[i].is_finite() {
                velocity[i] = vehicle.velocity[i];
            }

            if !acceleration[i].is_finite() {
                acceleration[i] = 0.0;
            }
        }

        for i in 0..3 {
            self.shapers[i].reset(acceleration[i], velocity[i], position[i]);
        }

        self.yaw_prev = if last_setpoint.yaw.is_finite() {
            last_setpoint.yaw
        } else {
            vehicle.yaw
        };

        self.update_constraints(limits, velocity.z);
        self.reconciler.latch(vehicle.reset_counters);

        self.last = Some(TrajectorySetpoint {
            position,
            velocity,
            acceleration,
            jerk: Vector3::zeros(),
            yaw: self.yaw_prev,
            yaw_rate: f32::NAN,
            want_takeoff: false,
        });
    }

    /// Re-seed while still on the ground.
    ///
    /// Horizontal motion is zeroed at the current position; the vertical
    /// axis is seeded with a small downward velocity so the first airborne
    /// cycles ramp the climb smoothly out of the ground instead of stepping.
    pub fn reactivate(&mut self, vehicle: &VehicleSample) {
        for i in 0..2 {
            self.shapers[i].reset(0.0, 0.0, vehicle.position[i]);
        }

        self.shapers[2].reset(0.0, 0.7, vehicle.position.z);
        self.reconciler.latch(vehicle.reset_counters);
    }

    /// Run one control cycle and return the new setpoint.
    ///
    /// If the inputs are too incomplete to derive a full velocity target,
    /// generation is skipped and the previous cycle's setpoint is returned
    /// unchanged rather than emitting a partially-computed one.
    pub fn update(
        &mut self,
        dt: f32,
        limits: &ShapingLimits,
        vehicle: &VehicleSample,
        setpoint: &Setpoint,
        waypoints: &WaypointContext,
    ) -> TrajectorySetpoint {
        // Resets mutate the state every derivation below reads; handle them
        // first
        self.reconciler.reconcile(vehicle, &mut self.shapers);

        let mut vel_target = setpoint.velocity;
        let mut want_takeoff = false;

        let align_hold =
            limits.heading_mode == HeadingMode::AlignFirst && !waypoints.yaw_aligned;

        if align_hold {
            // Hold position while yawing towards the next leg
            vel_target = Vector3::zeros();
        } else {
            if setpoint.position.x.is_finite() && setpoint.position.y.is_finite() {
                vel_target = self.horizontal_targets(limits, setpoint, waypoints, vel_target);
            }

            if setpoint.position.z.is_finite() {
                let vel_z = (setpoint.position.z - self.shapers[2].current_position())
                    * limits.vertical_gain;

                vel_target.z = if setpoint.velocity.z.is_finite() {
                    constrain_one_sided(vel_z, setpoint.velocity.z)
                } else {
                    vel_z
                };

                want_takeoff = vel_target.z < -TAKEOFF_CLIMB_RATE;
            }
        }

        self.update_constraints(limits, vel_target.z);

        if !vel_target.iter().all(|v| v.is_finite()) {
            // Inputs genuinely incomplete: hold the previous setpoint
            return self.held_setpoint(vehicle);
        }

        let smooth = self.generate(dt, limits, vehicle, vel_target, want_takeoff);
        let yaw = self.heading(setpoint, &smooth, vehicle, waypoints);

        let output = TrajectorySetpoint {
            yaw,
            yaw_rate: setpoint.yaw_rate,
            ..smooth
        };

        self.yaw_prev = yaw;
        self.last = Some(output);

        output
    }

    /// Position and velocity currently tracked by the internal trajectory.
    pub fn trajectory_position(&self) -> Vector3<f32> {
        Vector3::new(
            self.shapers[0].current_position(),
            self.shapers[1].current_position(),
            self.shapers[2].current_position(),
        )
    }

    /// Derive the horizontal velocity target from the position target:
    /// braking speed over the remaining distance, bounded by the cornering
    /// speed once altitude is tracked, directed at the target.
    fn horizontal_targets(
        &self,
        limits: &ShapingLimits,
        setpoint: &Setpoint,
        waypoints: &WaypointContext,
        mut vel_target: Vector3<f32>,
    ) -> Vector3<f32> {
        let pos_traj = self.trajectory_position();
        let to_target_xy = (setpoint.position - pos_traj).xy();
        let direction = unit_or_zero(to_target_xy);

        let cruise = waypoints.cruise_speed.max(0.0);
        let mut speed = max_speed_from_distance(
            to_target_xy.norm(),
            limits.max_accel_xy,
            limits.max_jerk,
            limits.braking_slope_xy,
        );

        // NaN altitude target compares false and keeps cornering off
        let reached_altitude =
            (setpoint.position.z - pos_traj.z).abs() < limits.alt_acceptance;

        speed = if reached_altitude {
            let corner = speed_at_waypoint(
                &waypoints.previous,
                &waypoints.target,
                &waypoints.next,
                waypoints.acceptance_radius,
                cruise,
                waypoints.yaw_aligned || limits.heading_mode != HeadingMode::AlignFirst,
                limits.max_accel_xy,
                limits.max_jerk,
                limits.braking_slope_xy,
            );
            speed.clamp(corner, cruise)
        } else {
            speed.clamp(0.0, cruise)
        };

        let vel_xy = direction * speed;

        for i in 0..2 {
            vel_target[i] = if setpoint.velocity[i].is_finite() {
                constrain_one_sided(vel_xy[i], setpoint.velocity[i])
            } else {
                vel_xy[i]
            };
        }

        vel_target
    }

    /// Integrate the three shapers for one tick and re-plan their remaining
    /// durations for the new velocity targets.
    fn generate(
        &mut self,
        dt: f32,
        limits: &ShapingLimits,
        vehicle: &VehicleSample,
        vel_target: Vector3<f32>,
        want_takeoff: bool,
    ) -> TrajectorySetpoint {
        // Slow the trajectory clock when the vehicle trails it, but never
        // when the vehicle is already ahead along the direction of travel
        let pos_traj_xy = self.trajectory_position().xy();
        let vel_traj_xy = Vector2::new(
            self.shapers[0].current_velocity(),
            self.shapers[1].current_velocity(),
        );
        let vehicle_to_traj = pos_traj_xy - vehicle.position.xy();

        let mut time_stretch = 1.0 - (vehicle_to_traj.norm() * 0.5).clamp(0.0, 1.0);

        if vehicle_to_traj.dot(&vel_traj_xy) < 0.0 {
            time_stretch = 1.0;
        }

        let mut acceleration = Vector3::zeros();
        let mut velocity = Vector3::zeros();
        let mut position = Vector3::zeros();
        let mut jerk = Vector3::zeros();

        for i in 0..3 {
            let (accel, vel, pos) = self.shapers[i].integrate(dt, time_stretch);
            acceleration[i] = accel;
            velocity[i] = vel;
            position[i] = pos;
            jerk[i] = self.shapers[i].current_jerk();
        }

        // The vertical target direction is now final; re-select the
        // asymmetric vertical limits before planning
        self.update_constraints(limits, vel_target.z);

        // Wanting to stop, nearly stopped: relax the horizontal jerk limit
        // so the profiles converge to zero instead of ringing around it
        if vel_target.xy().norm() < 0.01 * limits.braking_slope_xy
            && acceleration.xy().norm() < 0.2
            && velocity.xy().norm() < 0.1
        {
            self.shapers[0].set_max_jerk(STOP_JERK);
            self.shapers[1].set_max_jerk(STOP_JERK);
        }

        for i in 0..3 {
            self.shapers[i].update_durations(dt, vel_target[i]);
        }

        // Horizontal axes only; altitude keeps its own clock
        synchronize(&mut self.shapers[..2]);

        TrajectorySetpoint {
            position,
            velocity,
            acceleration,
            jerk,
            yaw: self.yaw_prev,
            yaw_rate: f32::NAN,
            want_takeoff,
        }
    }

    /// Heading for this cycle: the external command if one was supplied,
    /// otherwise along the generated velocity while translating, otherwise
    /// the previous heading.
    fn heading(
        &self,
        setpoint: &Setpoint,
        smooth: &TrajectorySetpoint,
        vehicle: &VehicleSample,
        waypoints: &WaypointContext,
    ) -> f32 {
        if setpoint.yaw.is_finite() {
            return setpoint.yaw;
        }

        if setpoint.yaw_rate.is_finite() {
            // Rate steering: the consumer tracks the rate, the heading value
            // just holds
            return self.yaw_prev;
        }

        let vel_xy = smooth.velocity.xy();
        let to_target_xy = (waypoints.target - vehicle.position).xy();

        if vel_xy.norm() > MIN_HEADING_SPEED
            && to_target_xy.norm() > waypoints.acceptance_radius
        {
            atan2f(vel_xy.y, vel_xy.x)
        } else {
            self.yaw_prev
        }
    }

    /// Previous setpoint, or a hold at the current trajectory state if no
    /// cycle has completed since activation.
    fn held_setpoint(&mut self, vehicle: &VehicleSample) -> TrajectorySetpoint {
        if let Some(last) = self.last {
            last
        } else {
            let hold = TrajectorySetpoint::hold_at(vehicle.position, vehicle.yaw);
            self.last = Some(hold);
            hold
        }
    }

    /// Apply the per-axis constraints: symmetric horizontal limits, vertical
    /// limits selected by the direction of the vertical velocity target.
    fn update_constraints(&mut self, limits: &ShapingLimits, vel_target_z: f32) {
        for shaper in &mut self.shapers[..2] {
            shaper.set_max_accel(limits.max_accel_xy);
            shaper.set_max_vel(limits.max_vel_xy);
            shaper.set_max_jerk(limits.max_jerk);
        }

        self.shapers[2].set_max_jerk(limits.max_jerk);

        if vel_target_z < 0.0 {
            // Ascending (NED: up is negative)
            self.shapers[2].set_max_accel(limits.max_accel_up);
            self.shapers[2].set_max_vel(limits.max_vel_up);
        } else {
            self.shapers[2].set_max_accel(limits.max_accel_down);
            self.shapers[2].set_max_vel(limits.max_vel_down);
        }
    }
}
