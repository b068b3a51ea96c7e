//! Trajectory orchestration.
//!
//! Cycle-level types and the generator that ties the per-axis numerics
//! together: setpoint normalization, estimator reset reconciliation,
//! velocity-target derivation and the final generation step.

mod generator;
mod reset;
mod setpoint;

pub use generator::TrajectoryGenerator;
pub use reset::ResetReconciler;
pub use setpoint::{
    ResetCounters, Setpoint, TrajectorySetpoint, VehicleSample, WaypointContext,
};
