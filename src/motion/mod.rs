//! Trajectory shaping numerics.
//!
//! Per-axis jerk-limited profiles, the braking and cornering speed bounds
//! derived from them, and cross-axis time synchronization.

mod braking;
mod cornering;
mod shaper;
mod sync;

pub use braking::max_speed_from_distance;
pub use cornering::speed_at_waypoint;
pub use shaper::AxisShaper;
pub use sync::synchronize;
