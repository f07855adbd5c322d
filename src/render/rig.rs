//! Overlay geometry for the drumming rig.
//!
//! Everything here is derived from the source dimensions once; only the arm placement depends on
//! the frame index.

use crate::{
    animation::motion::{arm_angles, swing_offset},
    effects::composite::OverlayRect,
    foundation::core::{Canvas, FrameIndex, Rgba8},
};

const ARM_WIDTH_FRAC: f64 = 0.15;
const ARM_HEIGHT_FRAC: f64 = 0.30;
const ARM_MAX_WIDTH: f64 = 100.0;
const ARM_MAX_HEIGHT: f64 = 150.0;
const LEFT_ARM_X_FRAC: f64 = 0.10;
const RIGHT_ARM_X_FRAC: f64 = 0.80;
const ARM_Y_FRAC: f64 = 0.30;

const DRUM_SIZE_FRAC: f64 = 0.12;
const DRUM_X_FRAC: f64 = 0.45;
const DRUM_Y_FRAC: f64 = 0.65;

const STICK_WIDTH: u32 = 2;
const STICK_LENGTH_FRAC: f64 = 0.8;
const LEFT_STICK_X_FRAC: f64 = 0.3;
const RIGHT_STICK_X_FRAC: f64 = 1.1;
const STICK_Y_FRAC: f64 = 0.2;

/// Fill colors for each overlay role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Both arms.
    pub arm: Rgba8,
    /// Drum body.
    pub drum: Rgba8,
    /// Both drumsticks.
    pub stick: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            arm: Rgba8::from_u32(0xff6b_6bff),
            drum: Rgba8::from_u32(0x8b45_13ff),
            stick: Rgba8::from_u32(0xffff_ffff),
        }
    }
}

/// Precomputed overlay layout for one source size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrumKit {
    canvas: Canvas,
    arm_width: u32,
    arm_height: u32,
    arm_color: Rgba8,
    drum: OverlayRect,
    left_stick: OverlayRect,
    right_stick: OverlayRect,
}

impl DrumKit {
    pub fn new(canvas: Canvas, palette: Palette) -> Self {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);

        let arm_width = floor_u32((w * ARM_WIDTH_FRAC).min(ARM_MAX_WIDTH));
        let arm_height = floor_u32((h * ARM_HEIGHT_FRAC).min(ARM_MAX_HEIGHT));

        let drum_size = floor_u32(f64::from(canvas.min_side()) * DRUM_SIZE_FRAC);
        let ds = f64::from(drum_size);
        let drum = OverlayRect {
            x: floor_i64(w * DRUM_X_FRAC),
            y: floor_i64(h * DRUM_Y_FRAC),
            width: drum_size,
            height: drum_size,
            color: palette.drum,
        };

        let stick_length = floor_u32(ds * STICK_LENGTH_FRAC);
        let stick_y = drum.y - floor_i64(ds * STICK_Y_FRAC);
        let left_stick = OverlayRect {
            x: drum.x - floor_i64(ds * LEFT_STICK_X_FRAC),
            y: stick_y,
            width: STICK_WIDTH,
            height: stick_length,
            color: palette.stick,
        };
        let right_stick = OverlayRect {
            x: drum.x + floor_i64(ds * RIGHT_STICK_X_FRAC),
            ..left_stick
        };

        Self {
            canvas,
            arm_width,
            arm_height,
            arm_color: palette.arm,
            drum,
            left_stick,
            right_stick,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Arm width/height, constant across the sequence.
    pub fn arm_size(&self) -> (u32, u32) {
        (self.arm_width, self.arm_height)
    }

    /// Left and right arm rectangles at `index`, in draw order.
    pub fn arms(&self, index: FrameIndex, frame_count: u32) -> [OverlayRect; 2] {
        let angles = arm_angles(index, frame_count);
        let w = f64::from(self.canvas.width);
        let h = f64::from(self.canvas.height);
        let arm_at = |anchor_x: f64, angle: f64| {
            let (dx, dy) = swing_offset(angle);
            OverlayRect {
                x: floor_i64(w * anchor_x + dx),
                y: floor_i64(h * ARM_Y_FRAC + dy),
                width: self.arm_width,
                height: self.arm_height,
                color: self.arm_color,
            }
        };
        [
            arm_at(LEFT_ARM_X_FRAC, angles.left),
            arm_at(RIGHT_ARM_X_FRAC, angles.right),
        ]
    }

    /// Drum body, left stick, right stick. Identical for every frame.
    pub fn apparatus(&self) -> [OverlayRect; 3] {
        [self.drum, self.left_stick, self.right_stick]
    }

    /// All overlays for `index` in composite order: arms first, then the static apparatus.
    pub fn overlays(&self, index: FrameIndex, frame_count: u32) -> [OverlayRect; 5] {
        let [left_arm, right_arm] = self.arms(index, frame_count);
        let [drum, left_stick, right_stick] = self.apparatus();
        [left_arm, right_arm, drum, left_stick, right_stick]
    }
}

fn floor_i64(v: f64) -> i64 {
    v.floor() as i64
}

fn floor_u32(v: f64) -> u32 {
    v.floor().max(0.0) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/render/rig.rs"]
mod tests;
