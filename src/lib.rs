//! # copter-motion
//!
//! Jerk-limited waypoint trajectory shaping for multicopter position
//! control.
//!
//! At a fixed control rate the [`TrajectoryGenerator`] converts sparse,
//! possibly-incomplete waypoint targets (position, velocity, acceleration,
//! heading, where any component may be unspecified) into a dense stream of
//! jerk-limited, dynamically-feasible position/velocity/acceleration/jerk
//! setpoints for an inner-loop stabilizing controller.
//!
//! ## Features
//!
//! - **Per-axis S-curves**: each axis integrates a bounded triple
//!   integrator with closed-form segment durations, re-planned every cycle
//! - **Cross-axis synchronization**: the horizontal axes finish their
//!   profiles together, so diagonal legs fly straight
//! - **Cornering and braking bounds**: waypoint transit speed sized from
//!   leg geometry and the distance still available to stop
//! - **Reset reconciliation**: estimator jumps move the trajectory state,
//!   never the emitted setpoint
//! - **no_std compatible**: core numerics work without the standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use copter_motion::{Setpoint, ShapingLimits, TrajectoryGenerator};
//!
//! // Load limits from TOML (or use ShapingLimits::default())
//! let limits = copter_motion::load_limits("shaping.toml")?;
//!
//! let mut generator = TrajectoryGenerator::new();
//! generator.activate(&Setpoint::empty(), &vehicle, &limits);
//!
//! // Once per control tick:
//! let setpoint = generator.update(dt, &limits, &vehicle, &target, &waypoints);
//! ```
//!
//! ## Coordinate convention
//!
//! All vectors are in the local NED frame (x north, y east, z down):
//! climbing flight has negative vertical velocity.
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod trajectory;

// Re-exports for ergonomic API
pub use config::{validate_limits, HeadingMode, ShapingLimits};
pub use error::{Error, Result};
pub use motion::{max_speed_from_distance, speed_at_waypoint, synchronize, AxisShaper};
pub use trajectory::{
    ResetCounters, Setpoint, TrajectoryGenerator, TrajectorySetpoint, VehicleSample,
    WaypointContext,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_limits, parse_limits};
