use crate::calibration::{ActiveArea, CalibrationMode};
use crate::hands::Handedness;
use crate::trail::ImageRef;
use crate::zones::{Quadrant, Year, ZoneAddress, ZoneLayout};
use glam::Vec2;

/// One thing for the renderer to draw this frame, in display pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
    },
    /// Horizontal and vertical axes through the center, clipped to the circle.
    Axes {
        center: Vec2,
        radius: f32,
    },
    Ring {
        center: Vec2,
        radius: f32,
        year: Year,
        highlighted: bool,
    },
    QuadrantLabel {
        quadrant: Quadrant,
        position: Vec2,
        active: bool,
    },
    Symbol {
        position: Vec2,
        size: f32,
        alpha: f32,
        image: Option<ImageRef>,
    },
    Fingertip {
        position: Vec2,
        handedness: Handedness,
        zone: ZoneAddress,
    },
    /// Sensor frame with the active area inside it; the renderer picks the
    /// on-screen box.
    CalibrationArea {
        area: ActiveArea,
        sensor: Vec2,
    },
    ModeLabel {
        mode: CalibrationMode,
        text: String,
    },
}

/// Where a quadrant's label sits: halfway out along its diagonal.
pub fn quadrant_label_position(layout: &ZoneLayout, q: Quadrant) -> Vec2 {
    let (sx, sy) = match q {
        Quadrant::Q1 => (1.0, -1.0),
        Quadrant::Q2 => (-1.0, -1.0),
        Quadrant::Q3 => (-1.0, 1.0),
        Quadrant::Q4 => (1.0, 1.0),
    };
    let d = layout.radius * std::f32::consts::FRAC_1_SQRT_2 * 0.5;
    layout.center + Vec2::new(sx * d, sy * d)
}
