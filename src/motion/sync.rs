//! Cross-axis profile time synchronization.

use super::shaper::AxisShaper;

/// Stretch the given shapers so they all finish their profiles at the same
/// time as the slowest one.
///
/// A commanded diagonal motion then traces a straight line in velocity
/// space instead of the curve produced by two independently time-optimal
/// axes. Only the horizontal pair is passed in this system: altitude
/// tracking is never slowed down by lateral motion.
///
/// The axis with the longest remaining duration is left untouched; shorter
/// axes are re-planned with the same start and end velocities over the
/// extended time. Calling this on already-synchronized shapers is a no-op.
pub fn synchronize(shapers: &mut [AxisShaper]) {
    let mut longest = 0.0f32;

    for shaper in shapers.iter() {
        longest = longest.max(shaper.total_time());
    }

    if longest <= f32::EPSILON {
        return;
    }

    for shaper in shapers.iter_mut() {
        if shaper.total_time() < longest - f32::EPSILON {
            shaper.update_durations_given_time(longest);
        }
    }
}
