//! Per-axis jerk-limited trajectory shaping.
//!
//! Each spatial axis owns one [`AxisShaper`]: a bounded triple integrator
//! that drives the current (acceleration, velocity) state towards a velocity
//! target along a time-optimal S-curve. The profile is three segments with
//! closed-form durations, re-derived whenever the target or the limits
//! change:
//!
//! 1. ramp the acceleration at maximum jerk for `t1`,
//! 2. hold the acceleration for `t2`,
//! 3. ramp the acceleration back to zero for `t3`, arriving exactly at the
//!    velocity target.
//!
//! Integration advances one control tick at a time from the current segment;
//! the profile horizon is never integrated numerically.

use libm::sqrtf;

/// Tolerance below which velocities, accelerations and durations are
/// treated as zero when planning.
const EPSILON: f32 = f32::EPSILON;

/// Float-noise tolerance when snapping integrated state back onto a limit.
const SNAP_TOLERANCE: f32 = 1e-3;

fn sign(val: f32) -> f32 {
    if val > EPSILON {
        1.0
    } else if val < -EPSILON {
        -1.0
    } else {
        0.0
    }
}

/// Jerk-limited motion state for a single axis.
///
/// The shaper is seeded once with [`reset`](AxisShaper::reset) at activation
/// (or after a confirmed estimator reset) and then mutated exactly once per
/// control cycle: the orchestrator updates the limits, integrates one step
/// and re-plans the remaining durations for the (possibly changed) velocity
/// target. Limits shrinking below the currently realised state do not fault:
/// the next plan ramps back inside the bounds at maximum jerk.
#[derive(Debug, Clone, Default)]
pub struct AxisShaper {
    // Constraints, may change every cycle
    max_jerk: f32,
    max_accel: f32,
    max_vel: f32,

    // Current kinematic state
    jerk: f32,
    accel: f32,
    vel: f32,
    pos: f32,

    // Remaining profile
    vel_target: f32,
    ramp_jerk: f32,
    t1: f32,
    t2: f32,
    t3: f32,
}

impl AxisShaper {
    /// Create a shaper with the given constraints and zeroed state.
    pub fn new(max_jerk: f32, max_accel: f32, max_vel: f32) -> Self {
        Self {
            max_jerk,
            max_accel,
            max_vel,
            ..Self::default()
        }
    }

    /// Discard any in-progress profile and set the current state directly.
    ///
    /// Called at activation (continuity with the previous controller's last
    /// setpoint) and nowhere else during normal flight: a changed target is
    /// handled by re-planning, never by resetting, so the emitted setpoints
    /// stay continuous.
    pub fn reset(&mut self, accel: f32, vel: f32, pos: f32) {
        self.jerk = 0.0;
        self.accel = accel;
        self.vel = vel;
        self.pos = pos;
        self.vel_target = vel;
        self.ramp_jerk = 0.0;
        self.t1 = 0.0;
        self.t2 = 0.0;
        self.t3 = 0.0;
    }

    /// Set the jerk limit used by the next plan (m/s³, > 0).
    pub fn set_max_jerk(&mut self, max_jerk: f32) {
        self.max_jerk = max_jerk;
    }

    /// Set the acceleration limit used by the next plan (m/s², > 0).
    pub fn set_max_accel(&mut self, max_accel: f32) {
        self.max_accel = max_accel;
    }

    /// Set the velocity limit used by the next plan (m/s, > 0).
    pub fn set_max_vel(&mut self, max_vel: f32) {
        self.max_vel = max_vel;
    }

    /// Overwrite the current position, leaving velocity, acceleration and
    /// the in-progress profile untouched.
    ///
    /// Used by the reset reconciler to absorb estimator position jumps
    /// without re-seeding the whole axis.
    pub fn set_current_position(&mut self, pos: f32) {
        self.pos = pos;
    }

    /// Overwrite the current velocity, leaving the other state components
    /// and the in-progress profile untouched.
    pub fn set_current_velocity(&mut self, vel: f32) {
        self.vel = vel;
    }

    /// Jerk applied during the last integration step.
    ///
    /// Jerk is not integrated from the state; it is whatever the active
    /// profile segment commands.
    pub fn current_jerk(&self) -> f32 {
        self.jerk
    }

    /// Current acceleration (m/s²).
    pub fn current_acceleration(&self) -> f32 {
        self.accel
    }

    /// Current velocity (m/s).
    pub fn current_velocity(&self) -> f32 {
        self.vel
    }

    /// Current position (m).
    pub fn current_position(&self) -> f32 {
        self.pos
    }

    /// Velocity target of the current plan, after clamping to the velocity
    /// limit.
    pub fn velocity_target(&self) -> f32 {
        self.vel_target
    }

    /// Remaining duration of the planned profile (s).
    pub fn total_time(&self) -> f32 {
        self.t1 + self.t2 + self.t3
    }

    /// Advance the profile by `dt * time_stretch` seconds of profile time
    /// and return the new `(acceleration, velocity, position)`.
    ///
    /// `time_stretch` in `[0, 1]` slows the trajectory's internal clock
    /// relative to the control cycle so a lagging vehicle can catch up
    /// without a second integrator. The step is consumed segment by segment
    /// with closed-form constant-jerk kinematics, so crossing a segment
    /// boundary inside one tick loses no accuracy.
    pub fn integrate(&mut self, dt: f32, time_stretch: f32) -> (f32, f32, f32) {
        let mut remaining = dt * time_stretch.clamp(0.0, 1.0);

        while remaining > EPSILON {
            let (jerk, available) = if self.t1 > EPSILON {
                (self.ramp_jerk, self.t1)
            } else if self.t2 > EPSILON {
                (0.0, self.t2)
            } else if self.t3 > EPSILON {
                (-self.ramp_jerk, self.t3)
            } else {
                // Profile exhausted: cruise at the target velocity
                (0.0, remaining)
            };

            let step = remaining.min(available);
            self.pos += self.vel * step
                + 0.5 * self.accel * step * step
                + jerk * step * step * step / 6.0;
            self.vel += self.accel * step + 0.5 * jerk * step * step;
            self.accel += jerk * step;
            self.jerk = jerk;

            if self.t1 > EPSILON {
                self.t1 -= step;
            } else if self.t2 > EPSILON {
                self.t2 -= step;
            } else if self.t3 > EPSILON {
                self.t3 -= step;
            }

            remaining -= step;
        }

        // Absorb float noise accumulated at the segment boundaries. Bounds
        // that were shrunk below the realised state are left alone; the next
        // plan ramps back inside them.
        if self.vel.abs() > self.max_vel && self.vel.abs() - self.max_vel < SNAP_TOLERANCE {
            self.vel = self.vel.clamp(-self.max_vel, self.max_vel);
        }

        if self.accel.abs() > self.max_accel && self.accel.abs() - self.max_accel < SNAP_TOLERANCE {
            self.accel = self.accel.clamp(-self.max_accel, self.max_accel);
        }

        (self.accel, self.vel, self.pos)
    }

    /// Re-plan the remaining profile durations for a (possibly changed)
    /// velocity target without touching the current kinematic state.
    ///
    /// The target is clamped to the velocity limit first, so a limit that
    /// shrank below the current velocity yields a deceleration profile.
    pub fn update_durations(&mut self, dt: f32, vel_target: f32) {
        self.vel_target = vel_target.clamp(-self.max_vel, self.max_vel);
        self.t1 = 0.0;
        self.t2 = 0.0;
        self.t3 = 0.0;
        self.ramp_jerk = 0.0;

        if self.max_jerk < EPSILON {
            return;
        }

        let a0 = self.accel;
        let delta_v = self.vel_target - self.vel;

        // Velocity reached if the acceleration were ramped straight to zero;
        // decides whether the profile starts by accelerating or decelerating
        let vel_zero_accel = self.vel + 0.5 * a0 * a0.abs() / self.max_jerk;
        let direction = match sign(self.vel_target - vel_zero_accel) {
            0.0 => sign(a0),
            d => d,
        };

        if direction == 0.0 {
            // Already on target with zero acceleration
            return;
        }

        let ramp_jerk = direction * self.max_jerk;

        // Time-optimal first ramp: t1² + b·t1 + c = 0
        let b = 2.0 * a0 / ramp_jerk;
        let c = 0.5 * a0 * a0 / (ramp_jerk * ramp_jerk) - delta_v / ramp_jerk;
        let delta = b * b - 4.0 * c;

        let mut t1 = if delta >= 0.0 {
            let sqrt_delta = sqrtf(delta);
            let t1_plus = 0.5 * (-b + sqrt_delta);
            let t1_minus = 0.5 * (-b - sqrt_delta);

            if t1_plus >= 0.0 && a0 / ramp_jerk + t1_plus >= 0.0 {
                t1_plus
            } else if t1_minus >= 0.0 && a0 / ramp_jerk + t1_minus >= 0.0 {
                t1_minus
            } else {
                0.0
            }
        } else {
            0.0
        };

        t1 = self.saturate_ramp_for_accel(t1, a0, ramp_jerk);

        let peak_accel = a0 + ramp_jerk * t1;
        let t3 = (peak_accel / ramp_jerk).max(0.0);

        // Cruise segment at peak acceleration covers whatever velocity
        // change the two ramps cannot
        let ramp_delta_v = a0 * t1 + 0.5 * ramp_jerk * t1 * t1 + peak_accel * t3
            - 0.5 * ramp_jerk * t3 * t3;
        let t2 = if peak_accel.abs() > 1e-4 && a0.abs() <= self.max_accel + 1e-4 {
            ((delta_v - ramp_delta_v) / peak_accel).max(0.0)
        } else {
            // Over-limit acceleration is never held; ramp it down now and
            // let the next cycle's re-plan finish the job
            0.0
        };

        self.ramp_jerk = ramp_jerk;
        self.t1 = t1;
        self.t2 = t2;
        self.t3 = t3;

        // Converged: a residual plan shorter than one control step with no
        // acceleration left just chatters around the target
        if self.total_time() < dt && a0.abs() < EPSILON && delta_v.abs() < 1e-4 {
            self.t1 = 0.0;
            self.t2 = 0.0;
            self.t3 = 0.0;
            self.ramp_jerk = 0.0;
        }
    }

    /// Re-plan the current profile to take exactly `total_time` seconds,
    /// keeping the same start state and velocity target.
    ///
    /// Used by the cross-axis synchronizer to stretch the faster horizontal
    /// axis. Stretching only: a `total_time` shorter than the current plan,
    /// or one no valid profile can fill, leaves the plan unchanged.
    pub fn update_durations_given_time(&mut self, total_time: f32) {
        let current = self.total_time();

        if current < EPSILON || total_time <= current {
            return;
        }

        let a0 = self.accel;
        let ramp_jerk = self.ramp_jerk;

        if ramp_jerk.abs() < EPSILON {
            return;
        }

        let delta_v = self.vel_target - self.vel;

        // Fixed-total-time first ramp: a·t1² + b·t1 + c = 0
        let a = -ramp_jerk;
        let b = ramp_jerk * total_time - a0;
        let c = a0 * total_time - 0.5 * a0 * a0 / ramp_jerk - delta_v;
        let delta = b * b - 4.0 * a * c;

        if delta < 0.0 {
            return;
        }

        let sqrt_delta = sqrtf(delta);
        let denominator_inv = 1.0 / (2.0 * a);
        let roots = [
            (-b + sqrt_delta) * denominator_inv,
            (-b - sqrt_delta) * denominator_inv,
        ];

        // Smallest ramp time whose profile fits in the requested total
        let mut t1_new = f32::INFINITY;

        for root in roots {
            let t3 = a0 / ramp_jerk + root;

            if root >= 0.0 && t3 >= 0.0 && root + t3 <= total_time + EPSILON && root < t1_new {
                t1_new = root;
            }
        }

        if !t1_new.is_finite() {
            return;
        }

        let t1 = self.saturate_ramp_for_accel(t1_new, a0, ramp_jerk);
        let t3 = (a0 / ramp_jerk + t1).max(0.0);

        self.t1 = t1;
        self.t3 = t3;
        self.t2 = (total_time - t1 - t3).max(0.0);
    }

    /// Shorten the first ramp so the peak acceleration stays within the
    /// acceleration limit.
    fn saturate_ramp_for_accel(&self, t1: f32, a0: f32, ramp_jerk: f32) -> f32 {
        let peak = a0 + ramp_jerk * t1;

        if peak.abs() > self.max_accel {
            let limit = self.max_accel * sign(ramp_jerk);
            ((limit - a0) / ramp_jerk).max(0.0)
        } else {
            t1.max(0.0)
        }
    }
}
