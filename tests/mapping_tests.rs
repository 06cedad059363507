// Host-side tests for sensor-to-display mapping.

use glam::Vec2;
use zone_core::mapping::{map_normalized, map_to_display, normalized_to_sensor};
use zone_core::ActiveArea;

const EPS: f32 = 1e-3;

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).abs().max_element() < EPS
}

#[test]
fn corners_map_exactly() {
    let area = ActiveArea::new(100.0, 50.0, 200.0, 100.0);
    let dest = Vec2::new(800.0, 600.0);
    assert!(close(map_to_display(Vec2::new(100.0, 50.0), &area, dest), Vec2::ZERO));
    assert!(close(map_to_display(Vec2::new(300.0, 150.0), &area, dest), dest));
}

#[test]
fn mapping_is_affine_per_axis() {
    let area = ActiveArea::new(100.0, 50.0, 200.0, 100.0);
    let dest = Vec2::new(800.0, 600.0);
    let mid = map_to_display(Vec2::new(200.0, 100.0), &area, dest);
    assert!(close(mid, Vec2::new(400.0, 300.0)));
    let quarter = map_to_display(Vec2::new(150.0, 75.0), &area, dest);
    assert!(close(quarter, Vec2::new(200.0, 150.0)));
}

#[test]
fn identity_when_area_matches_sensor_and_display() {
    let area = ActiveArea::new(0.0, 0.0, 640.0, 480.0);
    let sensor = Vec2::new(640.0, 480.0);
    let p = normalized_to_sensor(Vec2::new(0.5, 0.5), sensor);
    assert!(close(p, Vec2::new(320.0, 240.0)));
    let mapped = map_normalized(Vec2::new(0.5, 0.5), &area, sensor, sensor);
    assert!(close(mapped, Vec2::new(320.0, 240.0)));
}

#[test]
fn points_outside_area_are_not_clamped() {
    let area = ActiveArea::new(100.0, 50.0, 200.0, 100.0);
    let dest = Vec2::new(800.0, 600.0);
    let p = map_to_display(Vec2::new(90.0, 160.0), &area, dest);
    assert!(p.x < 0.0);
    assert!(p.y > dest.y);
}
