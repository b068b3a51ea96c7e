//! Setpoint and vehicle-state types exchanged with the outer control loop.
//!
//! All vectors are in the local NED frame (x north, y east, z down) in
//! metres and seconds. Incoming target components may be NaN, meaning
//! "unspecified": positions and velocities default to the current vehicle
//! state, accelerations to zero and heading to the previously emitted
//! heading. Emitted setpoints are always fully specified.

use nalgebra::Vector3;

/// Target setpoint consumed by the trajectory generator.
///
/// Any position, velocity or acceleration component may be NaN. A finite
/// velocity component alongside a finite position component is interpreted
/// as a one-sided speed limit, not as a velocity command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setpoint {
    /// Target position (m), components may be NaN.
    pub position: Vector3<f32>,
    /// Target velocity or one-sided velocity limit (m/s), components may be
    /// NaN.
    pub velocity: Vector3<f32>,
    /// Target acceleration (m/s²), components may be NaN.
    pub acceleration: Vector3<f32>,
    /// Heading (rad), NaN to let the generator derive it.
    pub yaw: f32,
    /// Heading rate (rad/s), NaN if unused.
    pub yaw_rate: f32,
}

impl Setpoint {
    /// A setpoint with every component unspecified.
    pub fn empty() -> Self {
        Self {
            position: Vector3::repeat(f32::NAN),
            velocity: Vector3::repeat(f32::NAN),
            acceleration: Vector3::repeat(f32::NAN),
            yaw: f32::NAN,
            yaw_rate: f32::NAN,
        }
    }

    /// A pure position target.
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::empty()
        }
    }
}

impl Default for Setpoint {
    fn default() -> Self {
        Self::empty()
    }
}

/// Estimator reset counters mirrored from the state estimator.
///
/// Each counter increments when the estimator discards accumulated drift
/// and jumps its estimate; only the change matters, never the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetCounters {
    /// Horizontal position reset counter.
    pub xy: u8,
    /// Horizontal velocity reset counter.
    pub vxy: u8,
    /// Vertical position reset counter.
    pub z: u8,
    /// Vertical velocity reset counter.
    pub vz: u8,
}

/// Estimated vehicle state sampled before each control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSample {
    /// Estimated position (m, NED).
    pub position: Vector3<f32>,
    /// Estimated velocity (m/s, NED).
    pub velocity: Vector3<f32>,
    /// Current heading (rad).
    pub yaw: f32,
    /// Estimator reset counters.
    pub reset_counters: ResetCounters,
}

/// Waypoint triple and per-leg parameters supplied by the navigation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointContext {
    /// Waypoint the vehicle is coming from.
    pub previous: Vector3<f32>,
    /// Waypoint currently being flown to; normally equals the position
    /// target in the [`Setpoint`].
    pub target: Vector3<f32>,
    /// Waypoint after the current one.
    pub next: Vector3<f32>,
    /// Distance (m) at which the target counts as reached.
    pub acceptance_radius: f32,
    /// Commanded cruise speed cap (m/s) for this leg.
    pub cruise_speed: f32,
    /// Whether the heading is aligned with the next leg; gates the cornering
    /// bound in align-before-proceed heading mode.
    pub yaw_aligned: bool,
}

/// Fully-specified setpoint emitted once per control cycle.
///
/// Continuous across cycles absent an estimator reset; consumable directly
/// by an inner-loop stabilizing controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySetpoint {
    /// Position setpoint (m).
    pub position: Vector3<f32>,
    /// Velocity setpoint (m/s).
    pub velocity: Vector3<f32>,
    /// Acceleration setpoint (m/s²).
    pub acceleration: Vector3<f32>,
    /// Jerk setpoint (m/s³).
    pub jerk: Vector3<f32>,
    /// Heading setpoint (rad).
    pub yaw: f32,
    /// Heading rate setpoint (rad/s), NaN if not commanded.
    pub yaw_rate: f32,
    /// True when the vertical velocity target commands upward motion,
    /// telling the outer framework that a takeoff is intended.
    pub want_takeoff: bool,
}

impl TrajectorySetpoint {
    /// A hold setpoint at the given position with zero derivatives.
    pub fn hold_at(position: Vector3<f32>, yaw: f32) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            jerk: Vector3::zeros(),
            yaw,
            yaw_rate: f32::NAN,
            want_takeoff: false,
        }
    }
}
