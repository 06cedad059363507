// Host-side tests for quadrant and ring resolution.

use glam::Vec2;
use zone_core::zones::quadrant;
use zone_core::{Quadrant, RingSet, ZoneLayout};

const EPS: f32 = 1e-4;

#[test]
fn quadrant_numbering_follows_screen_up() {
    let c = Vec2::new(500.0, 500.0);
    assert_eq!(quadrant(Vec2::new(650.0, 350.0), c), Quadrant::Q1);
    assert_eq!(quadrant(Vec2::new(350.0, 350.0), c), Quadrant::Q2);
    assert_eq!(quadrant(Vec2::new(350.0, 650.0), c), Quadrant::Q3);
    assert_eq!(quadrant(Vec2::new(650.0, 650.0), c), Quadrant::Q4);
}

#[test]
fn points_on_axes_resolve_deterministically() {
    let c = Vec2::new(500.0, 500.0);
    assert_eq!(quadrant(c, c), Quadrant::Q1);
    assert_eq!(quadrant(Vec2::new(400.0, 500.0), c), Quadrant::Q2);
    assert_eq!(quadrant(Vec2::new(600.0, 500.0), c), Quadrant::Q1);
    assert_eq!(quadrant(Vec2::new(500.0, 400.0), c), Quadrant::Q1);
    assert_eq!(quadrant(Vec2::new(500.0, 600.0), c), Quadrant::Q4);
}

#[test]
fn quadrants_cover_the_plane() {
    let c = Vec2::new(0.0, 0.0);
    let mut seen = [0usize; 4];
    for i in -20..=20 {
        for j in -20..=20 {
            let q = quadrant(Vec2::new(i as f32 * 7.5, j as f32 * 7.5), c);
            seen[q.index()] += 1;
        }
    }
    assert_eq!(seen.iter().sum::<usize>(), 41 * 41);
    assert!(seen.iter().all(|&n| n > 0));
}

#[test]
fn rings_span_ten_to_ninety_percent() {
    let rings = RingSet::default();
    assert_eq!(rings.years.len(), 7);
    assert!((rings.ring_radius(0, 400.0) - 40.0).abs() < EPS);
    assert!((rings.ring_radius(6, 400.0) - 360.0).abs() < EPS);
    assert!((rings.ring_radius(3, 400.0) - 200.0).abs() < EPS);
}

#[test]
fn ring_snaps_within_threshold() {
    let rings = RingSet::default();
    let c = Vec2::new(500.0, 500.0);
    assert_eq!(rings.ring(Vec2::new(861.0, 500.0), c, 400.0), Some(1700));
    assert_eq!(rings.ring(Vec2::new(500.0, 541.0), c, 400.0), Some(1100));
    assert_eq!(rings.ring(Vec2::new(500.0, 700.0), c, 400.0), Some(1400));
}

#[test]
fn ring_is_none_at_or_beyond_threshold() {
    let rings = RingSet::default();
    let c = Vec2::new(500.0, 500.0);
    // exactly 30 px outside the outer ring
    assert_eq!(rings.ring(Vec2::new(890.0, 500.0), c, 400.0), None);
    assert_eq!(rings.ring(Vec2::new(1000.0, 500.0), c, 400.0), None);
    assert_eq!(rings.ring(c, c, 400.0), None);
}

#[test]
fn ring_tie_goes_to_lower_index() {
    let rings = RingSet {
        years: vec![1100, 1700],
        snap_px: 50.0,
    };
    // rings at 10 and 90; 50 is 40 px from both
    let c = Vec2::ZERO;
    assert_eq!(rings.ring_index(Vec2::new(50.0, 0.0), c, 100.0), Some(0));
    assert_eq!(rings.ring(Vec2::new(50.0, 0.0), c, 100.0), Some(1100));
}

#[test]
fn layout_resolves_quadrant_and_ring_together() {
    let layout = ZoneLayout {
        center: Vec2::new(500.0, 500.0),
        radius: 400.0,
    };
    let addr = layout.resolve(Vec2::new(650.0, 650.0), &RingSet::default());
    assert_eq!(addr.quadrant, Quadrant::Q4);
    // distance ~212 is nearest ring 200 (1400)
    assert_eq!(addr.ring, Some(1400));
}

#[test]
fn default_layout_is_centered_at_four_fifths_height() {
    let display = Vec2::new(1280.0, 720.0);
    let d = ZoneLayout::default_diameter(display);
    assert!((d - 576.0).abs() < EPS);
    let layout = ZoneLayout::centered(display, d);
    assert_eq!(layout.center, Vec2::new(640.0, 360.0));
    assert!((layout.radius - 288.0).abs() < EPS);
}

#[test]
fn suits_are_distinct_per_quadrant() {
    let names: Vec<&str> = Quadrant::ALL.iter().map(|q| q.suit().name()).collect();
    assert_eq!(names, vec!["diamonds", "spades", "clubs", "hearts"]);
    assert_eq!(Quadrant::Q3.number(), 3);
}
