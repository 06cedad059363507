// Host-side tests for the per-frame session driver and hand input.

mod common;

use common::{Call, RecordingAudio};
use glam::Vec2;
use instant::Instant;
use std::time::Duration;
use zone_core::constants::CALIBRATION_STORAGE_KEY;
use zone_core::{
    parse_hands, ActiveArea, CalibrationMode, DetectionSlot, DrawCommand, EngineConfig,
    FrameInput, HandSample, Handedness, HeldKeys, ImageCatalog, KeyCommand, MemoryStore,
    Quadrant, Session, ZonePhase,
};

const DISPLAY: Vec2 = Vec2::new(640.0, 480.0);

fn config() -> EngineConfig {
    EngineConfig {
        trail_seed: Some(7),
        ..EngineConfig::default()
    }
}

// Active area equal to the sensor so display = normalized * (640, 480).
fn identity_session() -> Session<MemoryStore> {
    let store = MemoryStore::with_entry(
        CALIBRATION_STORAGE_KEY,
        r#"{"x":0,"y":0,"width":640,"height":480}"#,
    );
    Session::new(config(), store, ImageCatalog::standard(), DISPLAY)
}

fn input<'a>(hands: &'a [HandSample], held: HeldKeys, now: Instant) -> FrameInput<'a> {
    FrameInput {
        hands,
        held,
        display: DISPLAY,
        now,
    }
}

// Display (480, 120): up-right of center (320, 240), 200 px out, on the 1700 ring.
fn hand_in_q1() -> HandSample {
    HandSample::at(Handedness::Right, Vec2::new(0.75, 0.25))
}

#[test]
fn hand_entering_a_quadrant_starts_and_stops_its_audio() {
    let mut session = identity_session();
    let mut audio = RecordingAudio::new();
    let t0 = Instant::now();

    let hands = [hand_in_q1()];
    let points = session.track(&hands);
    assert_eq!(points[0].position, Vec2::new(480.0, 120.0));
    assert_eq!(points[0].zone.quadrant, Quadrant::Q1);
    assert_eq!(points[0].zone.ring, Some(1700));

    session.frame(&input(&hands, HeldKeys::default(), t0), &mut audio);
    assert_eq!(session.zones().phase(Quadrant::Q1), ZonePhase::Active);
    let v = session.zones().state(Quadrant::Q1).voices()[0];
    assert!(audio.calls.contains(&Call::PlayNote(v, 440.0)));
    assert_eq!(session.trail().len(), 1);
    assert_eq!(audio.ticks, 1);

    session.frame(
        &input(&[], HeldKeys::default(), t0 + Duration::from_millis(16)),
        &mut audio,
    );
    assert_eq!(session.zones().phase(Quadrant::Q1), ZonePhase::Idle);
    assert!(audio.live_voices.is_empty());
}

#[test]
fn two_hands_in_one_quadrant_keep_it_active_until_both_leave() {
    let mut session = identity_session();
    let mut audio = RecordingAudio::new();
    let t0 = Instant::now();
    let a = hand_in_q1();
    let b = HandSample::at(Handedness::Left, Vec2::new(0.6, 0.4));
    session.frame(&input(&[a.clone(), b.clone()], HeldKeys::default(), t0), &mut audio);
    session.frame(&input(&[b], HeldKeys::default(), t0), &mut audio);
    assert_eq!(session.zones().phase(Quadrant::Q1), ZonePhase::Active);
    assert_eq!(audio.voices_created(), 1);
    session.frame(&input(&[], HeldKeys::default(), t0), &mut audio);
    assert_eq!(session.zones().phase(Quadrant::Q1), ZonePhase::Idle);
}

#[test]
fn still_hands_each_leave_one_symbol() {
    let mut session = identity_session();
    let mut audio = RecordingAudio::new();
    let t0 = Instant::now();
    // Mirror of `hand_in_q1` across the vertical axis: Q2, same ring.
    let hands = [hand_in_q1(), HandSample::at(Handedness::Left, Vec2::new(0.25, 0.25))];
    for i in 0..30u64 {
        let now = t0 + Duration::from_millis(16 * i);
        session.frame(&input(&hands, HeldKeys::default(), now), &mut audio);
    }
    assert_eq!(session.trail().len(), 2);
    let quadrants: Vec<Quadrant> = session.trail().symbols().map(|s| s.quadrant).collect();
    assert_eq!(quadrants, vec![Quadrant::Q1, Quadrant::Q2]);

    // Both symbols fade out while the hands stay put.
    session.frame(
        &input(&hands, HeldKeys::default(), t0 + Duration::from_millis(2000)),
        &mut audio,
    );
    assert!(session.trail().is_empty());
}

#[test]
fn held_arrows_edit_area_and_persist_once() {
    let mut session = Session::new(config(), MemoryStore::new(), ImageCatalog::new(), DISPLAY);
    let mut audio = RecordingAudio::new();
    let t0 = Instant::now();
    let right = HeldKeys {
        right: true,
        ..HeldKeys::default()
    };

    // Arrows do nothing until a mode is selected.
    session.frame(&input(&[], right, t0), &mut audio);
    assert_eq!(session.area(), ActiveArea::default());

    session.handle_key(KeyCommand::SelectMode(CalibrationMode::Position));
    let mut last = t0;
    for i in 0..10u64 {
        last = t0 + Duration::from_millis(16 * i);
        session.frame(&input(&[], right, last), &mut audio);
    }
    assert_eq!(session.area().x, 170.0);
    assert_eq!(session.store().storage().write_count(), 0);

    session.frame(
        &input(&[], HeldKeys::default(), last + Duration::from_millis(499)),
        &mut audio,
    );
    assert_eq!(session.store().storage().write_count(), 0);
    session.frame(
        &input(&[], HeldKeys::default(), last + Duration::from_millis(500)),
        &mut audio,
    );
    assert_eq!(session.store().storage().write_count(), 1);
    let raw = session.store().storage().raw(CALIBRATION_STORAGE_KEY).unwrap();
    let saved: ActiveArea = serde_json::from_str(raw).unwrap();
    assert_eq!(saved.x, 170.0);
}

#[test]
fn diameter_mode_resizes_circle_without_saving() {
    let mut session = Session::new(config(), MemoryStore::new(), ImageCatalog::new(), DISPLAY);
    let mut audio = RecordingAudio::new();
    let t0 = Instant::now();
    assert!((session.diameter() - 384.0).abs() < 1e-3);
    session.handle_key(KeyCommand::SelectMode(CalibrationMode::Diameter));
    let up = HeldKeys {
        up: true,
        fast: true,
        ..HeldKeys::default()
    };
    session.frame(&input(&[], up, t0), &mut audio);
    assert!((session.diameter() - 404.0).abs() < 1e-3);
    assert!((session.layout().radius - 202.0).abs() < 1e-3);
    session.frame(
        &input(&[], HeldKeys::default(), t0 + Duration::from_secs(1)),
        &mut audio,
    );
    assert_eq!(session.store().storage().write_count(), 0);

    // An adjusted diameter survives a resize but is clamped to fit.
    session.set_display(Vec2::new(400.0, 300.0));
    assert!((session.diameter() - 300.0).abs() < 1e-3);
}

#[test]
fn default_diameter_follows_display_until_adjusted() {
    let mut session = Session::new(config(), MemoryStore::new(), ImageCatalog::new(), DISPLAY);
    session.set_display(Vec2::new(1280.0, 720.0));
    assert!((session.diameter() - 576.0).abs() < 1e-3);
    assert_eq!(session.layout().center, Vec2::new(640.0, 360.0));
}

#[test]
fn mode_keys_are_mutually_exclusive_and_toggle() {
    let mut session = Session::new(config(), MemoryStore::new(), ImageCatalog::new(), DISPLAY);
    session.handle_key(KeyCommand::SelectMode(CalibrationMode::Position));
    session.handle_key(KeyCommand::SelectMode(CalibrationMode::Size));
    assert_eq!(session.mode(), CalibrationMode::Size);
    session.handle_key(KeyCommand::SelectMode(CalibrationMode::Size));
    assert_eq!(session.mode(), CalibrationMode::Off);
}

#[test]
fn draw_list_has_zone_overlay_and_calibration_only_when_visible() {
    let mut session = identity_session();
    let mut audio = RecordingAudio::new();
    let t0 = Instant::now();
    let hands = [hand_in_q1()];

    let cmds = session.frame(&input(&hands, HeldKeys::default(), t0), &mut audio);
    let rings = cmds
        .iter()
        .filter(|c| matches!(c, DrawCommand::Ring { .. }))
        .count();
    assert_eq!(rings, 7);
    assert!(cmds.iter().any(|c| matches!(
        c,
        DrawCommand::Ring {
            year: 1700,
            highlighted: true,
            ..
        }
    )));
    assert!(cmds.iter().any(|c| matches!(
        c,
        DrawCommand::QuadrantLabel {
            quadrant: Quadrant::Q1,
            active: true,
            ..
        }
    )));
    assert!(cmds.iter().any(|c| matches!(c, DrawCommand::Symbol { alpha, .. } if *alpha > 0.99)));
    assert!(cmds.iter().any(|c| matches!(c, DrawCommand::Fingertip { .. })));
    assert!(!cmds
        .iter()
        .any(|c| matches!(c, DrawCommand::CalibrationArea { .. })));

    session.handle_key(KeyCommand::ToggleOverlay);
    let cmds = session.frame(&input(&hands, HeldKeys::default(), t0), &mut audio);
    assert!(cmds
        .iter()
        .any(|c| matches!(c, DrawCommand::CalibrationArea { .. })));
    assert!(cmds
        .iter()
        .any(|c| matches!(c, DrawCommand::ModeLabel { mode: CalibrationMode::Off, .. })));
}

#[test]
fn clear_key_empties_the_trail() {
    let mut session = identity_session();
    let mut audio = RecordingAudio::new();
    let t0 = Instant::now();
    session.frame(&input(&[hand_in_q1()], HeldKeys::default(), t0), &mut audio);
    assert_eq!(session.trail().len(), 1);
    session.handle_key(KeyCommand::ClearTrail);
    assert!(session.trail().is_empty());
}

#[test]
fn shutdown_writes_pending_calibration_and_releases_audio() {
    let mut session = Session::new(config(), MemoryStore::new(), ImageCatalog::new(), DISPLAY);
    let mut audio = RecordingAudio::new();
    let t0 = Instant::now();
    session.handle_key(KeyCommand::SelectMode(CalibrationMode::Position));
    let hands = [hand_in_q1()];
    let down = HeldKeys {
        down: true,
        ..HeldKeys::default()
    };
    session.frame(&input(&hands, down, t0), &mut audio);
    session.shutdown(&mut audio, t0);
    assert_eq!(session.store().storage().write_count(), 1);
    assert!(audio.live_voices.is_empty());
}

fn landmarks_json(x: f32, y: f32, n: usize) -> String {
    let pts: Vec<String> = (0..n).map(|_| format!(r#"{{"x":{},"y":{}}}"#, x, y)).collect();
    format!("[{}]", pts.join(","))
}

#[test]
fn parses_hand_records() {
    let json = format!(
        r#"[{{"handedness":"Left","landmarks":{}}},{{"handedness":"Right","landmarks":{}}}]"#,
        landmarks_json(0.25, 0.5, 21),
        landmarks_json(0.75, 0.5, 21)
    );
    let hands = parse_hands(&json).unwrap();
    assert_eq!(hands.len(), 2);
    assert_eq!(hands[0].handedness, Handedness::Left);
    assert_eq!(hands[1].fingertip(), Vec2::new(0.75, 0.5));
}

#[test]
fn malformed_hands_are_dropped_and_bad_json_rejected() {
    let json = format!(
        r#"[{{"handedness":"Left","landmarks":{}}},{{"handedness":"Right","landmarks":{}}}]"#,
        landmarks_json(0.25, 0.5, 5),
        landmarks_json(0.75, 0.5, 21)
    );
    let hands = parse_hands(&json).unwrap();
    assert_eq!(hands.len(), 1);
    assert_eq!(hands[0].handedness, Handedness::Right);

    assert!(parse_hands("{").is_err());
    assert!(parse_hands(r#"[{"handedness":"Both","landmarks":[]}]"#).is_err());
    assert!(parse_hands("[]").unwrap().is_empty());
}

#[test]
fn detection_slot_keeps_only_the_latest_result() {
    let mut slot = DetectionSlot::default();
    assert!(slot.latest().is_empty());
    slot.publish(vec![hand_in_q1(), hand_in_q1()]);
    slot.publish(vec![hand_in_q1()]);
    assert_eq!(slot.latest().len(), 1);
    assert_eq!(slot.generation(), 2);
}
