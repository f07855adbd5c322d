use std::f64::consts::{PI, TAU};

use crate::foundation::core::FrameIndex;

/// Arm angles (radians) for one frame of the drumming cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmAngles {
    /// Left arm phase, `progress * 2π`.
    pub left: f64,
    /// Right arm phase, always `left + π`.
    pub right: f64,
}

/// Fraction of the full cycle covered at `index`, in `[0, 1)` for in-range indices.
///
/// `frame_count` must be non-zero; callers validate it before synthesis.
pub fn progress(index: FrameIndex, frame_count: u32) -> f64 {
    f64::from(index.0) / f64::from(frame_count)
}

/// Phase of both arms at `index` out of `frame_count` frames.
///
/// The arms stay half a cycle apart so one is always up while the other strikes.
pub fn arm_angles(index: FrameIndex, frame_count: u32) -> ArmAngles {
    let left = progress(index, frame_count) * TAU;
    ArmAngles {
        left,
        right: left + PI,
    }
}

/// Horizontal swing amplitude in pixels.
pub const SWING_X: f64 = 30.0;
/// Vertical swing amplitude in pixels.
pub const SWING_Y: f64 = 20.0;

/// Pixel offset from an arm's anchor for the given phase.
pub fn swing_offset(angle: f64) -> (f64, f64) {
    (angle.sin() * SWING_X, angle.cos() * SWING_Y)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
