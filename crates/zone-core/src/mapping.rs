use crate::calibration::ActiveArea;
use glam::Vec2;

/// Scale a normalized landmark (0..1 per axis) into sensor pixels.
#[inline]
pub fn normalized_to_sensor(point: Vec2, sensor: Vec2) -> Vec2 {
    point * sensor
}

/// Remap a sensor-space point through the active area onto the display.
///
/// Each axis maps `[origin, origin + size]` onto `[0, dest]` linearly. The
/// result is not clamped: points outside the active area land outside the
/// display so fast gestures stay continuous across the rectangle edge.
#[inline]
pub fn map_to_display(point: Vec2, area: &ActiveArea, dest: Vec2) -> Vec2 {
    (point - area.origin()) / area.size() * dest
}

/// Normalized landmark straight to display space.
#[inline]
pub fn map_normalized(point: Vec2, area: &ActiveArea, sensor: Vec2, dest: Vec2) -> Vec2 {
    map_to_display(normalized_to_sensor(point, sensor), area, dest)
}
