//! Keyboard surface for calibration.
//!
//! Mode selection and overlay visibility react to key-press edges. Arrow keys
//! are sampled as "currently held" once per frame, so several held keys add
//! up within a frame.

use crate::calibration::{ActiveArea, CalibrationMode};
use crate::constants::{
    CALIBRATION_FAST_MULTIPLIER, CALIBRATION_STEP_PX, DIAMETER_STEP_PX, MIN_AREA_SIZE,
    MIN_DIAMETER_PX,
};
use glam::Vec2;

/// Discrete commands triggered on key-press edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    ToggleOverlay,
    SelectMode(CalibrationMode),
    ClearTrail,
}

#[inline]
pub fn command_for_key(key: &str) -> Option<KeyCommand> {
    match key {
        "c" | "C" => Some(KeyCommand::ToggleOverlay),
        "p" | "P" => Some(KeyCommand::SelectMode(CalibrationMode::Position)),
        "s" | "S" => Some(KeyCommand::SelectMode(CalibrationMode::Size)),
        "d" | "D" => Some(KeyCommand::SelectMode(CalibrationMode::Diameter)),
        "x" | "X" => Some(KeyCommand::ClearTrail),
        _ => None,
    }
}

/// Keys whose held state is polled every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeldKey {
    Left,
    Right,
    Up,
    Down,
    Fast,
}

#[inline]
pub fn held_key_for(key: &str) -> Option<HeldKey> {
    match key {
        "ArrowLeft" => Some(HeldKey::Left),
        "ArrowRight" => Some(HeldKey::Right),
        "ArrowUp" => Some(HeldKey::Up),
        "ArrowDown" => Some(HeldKey::Down),
        "Shift" => Some(HeldKey::Fast),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fast: bool,
}

impl HeldKeys {
    pub fn set(&mut self, key: HeldKey, down: bool) {
        match key {
            HeldKey::Left => self.left = down,
            HeldKey::Right => self.right = down,
            HeldKey::Up => self.up = down,
            HeldKey::Down => self.down = down,
            HeldKey::Fast => self.fast = down,
        }
    }

    /// -1, 0 or +1 per axis; screen convention (down is +y).
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }

    pub fn any_arrow(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// What a poll changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub area_changed: bool,
    pub diameter_changed: bool,
}

#[derive(Clone, Debug)]
pub struct CalibrationInputHandler {
    pub step_px: f32,
    pub fast_multiplier: f32,
    pub diameter_step_px: f32,
}

impl Default for CalibrationInputHandler {
    fn default() -> Self {
        Self {
            step_px: CALIBRATION_STEP_PX,
            fast_multiplier: CALIBRATION_FAST_MULTIPLIER,
            diameter_step_px: DIAMETER_STEP_PX,
        }
    }
}

impl CalibrationInputHandler {
    fn multiplier(&self, held: &HeldKeys) -> f32 {
        if held.fast {
            self.fast_multiplier
        } else {
            1.0
        }
    }

    /// Apply one frame of held arrows to the selected parameter.
    pub fn poll(
        &self,
        mode: CalibrationMode,
        held: &HeldKeys,
        area: &mut ActiveArea,
        diameter: &mut f32,
        sensor: Vec2,
        display: Vec2,
    ) -> PollOutcome {
        if !held.any_arrow() {
            return PollOutcome::default();
        }
        let dir = held.direction();
        match mode {
            CalibrationMode::Off => PollOutcome::default(),
            CalibrationMode::Position => {
                let step = dir * self.step_px * self.multiplier(held);
                let before = *area;
                area.x = (area.x + step.x).min(sensor.x - area.width).max(0.0);
                area.y = (area.y + step.y).min(sensor.y - area.height).max(0.0);
                PollOutcome {
                    area_changed: *area != before,
                    ..Default::default()
                }
            }
            CalibrationMode::Size => {
                let step = dir * self.step_px * self.multiplier(held);
                let before = *area;
                area.width = (area.width + step.x)
                    .min(sensor.x - area.x)
                    .max(MIN_AREA_SIZE);
                area.height = (area.height + step.y)
                    .min(sensor.y - area.y)
                    .max(MIN_AREA_SIZE);
                PollOutcome {
                    area_changed: *area != before,
                    ..Default::default()
                }
            }
            CalibrationMode::Diameter => {
                // Right and up grow the circle.
                let delta = (dir.x - dir.y) * self.diameter_step_px * self.multiplier(held);
                let before = *diameter;
                let ceiling = display.x.min(display.y).max(MIN_DIAMETER_PX);
                *diameter = (*diameter + delta).min(ceiling).max(MIN_DIAMETER_PX);
                PollOutcome {
                    diameter_changed: *diameter != before,
                    ..Default::default()
                }
            }
        }
    }
}
