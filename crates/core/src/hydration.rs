//! Thirst meter derived from today's hydration.

use crate::character::MAX_THIRST;

/// Thirst for `glasses` drunk against a goal of `goal_glasses`.
///
/// `0` means fully hydrated, [`MAX_THIRST`] means nothing was drunk. The
/// hydration ratio is capped at 1, so drinking past the goal never pushes
/// the meter below 0. A non-positive goal counts as already met.
pub fn thirst_meter(glasses: i32, goal_glasses: i32) -> i32 {
    if goal_glasses <= 0 {
        return 0;
    }
    let ratio = (f64::from(glasses.max(0)) / f64::from(goal_glasses)).min(1.0);
    ((1.0 - ratio) * f64::from(MAX_THIRST)).round() as i32
}
