//! Estimator reset reconciliation.
//!
//! When the state estimator discards accumulated drift it jumps its
//! position or velocity estimate and increments the matching reset counter.
//! Reproducing that jump in the emitted setpoint would be actuated by the
//! inner loop and felt as a kick, so on every counter edge the affected
//! state component of the trajectory is overwritten with the fresh estimate
//! instead. Only the named component moves: the in-progress profile shape
//! and the other components stay continuous.

use crate::motion::AxisShaper;

use super::setpoint::{ResetCounters, VehicleSample};

/// Detects estimator reset edges and re-seeds the affected axis components.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetReconciler {
    counters: ResetCounters,
}

impl ResetReconciler {
    /// Latch the current counter values without reconciling, so stale
    /// counters from before activation are not mistaken for fresh resets.
    pub fn latch(&mut self, counters: ResetCounters) {
        self.counters = counters;
    }

    /// Compare the sampled counters against the last observed values and
    /// absorb any reset into the axis shapers.
    ///
    /// Must run before any velocity-target derivation in the same cycle
    /// because it silently mutates the state those derivations read.
    /// `shapers` is `[x, y, z]`.
    pub fn reconcile(&mut self, vehicle: &VehicleSample, shapers: &mut [AxisShaper; 3]) {
        let sampled = vehicle.reset_counters;

        if sampled.xy != self.counters.xy {
            shapers[0].set_current_position(vehicle.position.x);
            shapers[1].set_current_position(vehicle.position.y);
            self.counters.xy = sampled.xy;
        }

        if sampled.vxy != self.counters.vxy {
            shapers[0].set_current_velocity(vehicle.velocity.x);
            shapers[1].set_current_velocity(vehicle.velocity.y);
            self.counters.vxy = sampled.vxy;
        }

        if sampled.z != self.counters.z {
            shapers[2].set_current_position(vehicle.position.z);
            self.counters.z = sampled.z;
        }

        if sampled.vz != self.counters.vz {
            shapers[2].set_current_velocity(vehicle.velocity.z);
            self.counters.vz = sampled.vz;
        }
    }
}
