use std::time::Duration;

// Shared tuning constants for calibration, zones, audio and trail behavior.

// Sensor frame (camera capture size in pixels)
pub const SENSOR_WIDTH: f32 = 640.0;
pub const SENSOR_HEIGHT: f32 = 480.0;

// Calibration
pub const DEFAULT_AREA: [f32; 4] = [160.0, 120.0, 320.0, 240.0]; // x, y, width, height
pub const MIN_AREA_SIZE: f32 = 50.0;
pub const CALIBRATION_STORAGE_KEY: &str = "quadrant.activeArea";
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);
pub const CALIBRATION_STEP_PX: f32 = 1.0; // per frame while an arrow is held
pub const CALIBRATION_FAST_MULTIPLIER: f32 = 10.0; // while the modifier is held

// Display circle
pub const DIAMETER_HEIGHT_RATIO: f32 = 0.8; // default diameter = height * 4/5
pub const MIN_DIAMETER_PX: f32 = 100.0;
pub const DIAMETER_STEP_PX: f32 = 2.0;

// Hand landmarks
pub const LANDMARK_COUNT: usize = 21;
pub const INDEX_FINGERTIP: usize = 8;

// Rings
pub const RING_YEARS: [u16; 7] = [1100, 1200, 1300, 1400, 1500, 1600, 1700];
pub const RING_INNER_RATIO: f32 = 0.10;
pub const RING_OUTER_RATIO: f32 = 0.90;
pub const RING_SNAP_PX: f32 = 30.0; // nearest ring must be strictly closer than this

// Trail
pub const TRAIL_CAPACITY: usize = 20;
pub const TRAIL_FADE: Duration = Duration::from_millis(2000);
pub const TRAIL_MIN_STEP_PX: f32 = 25.0;
pub const TRAIL_SYMBOL_SIZE_PX: f32 = 50.0;

// Sequencer timings are authored in samples at the synth's reference rate
pub const REFERENCE_SAMPLE_RATE: f32 = 44_100.0;

// Q1: sustained mono voice
pub const Q1_BASE_HZ: f32 = 110.0;
pub const Q1_GAIN: f32 = 0.8;
pub const Q1_YEAR_HZ: [f32; 7] = [55.0, 73.42, 110.0, 146.83, 220.0, 293.66, 440.0];

// Q2: soft melody sequence
pub const Q2_GAIN: f32 = 0.8;
pub const Q2_STEP_SAMPLES: f32 = 12_050.0;
pub const Q2_DEFAULT_PHRASE: [f32; 4] = [220.0, 264.0, 330.0, 392.0];
pub const Q2_YEAR_PHRASES: [[f32; 4]; 7] = [
    [110.0, 132.0, 165.0, 196.0], // innermost, lower register
    [147.0, 176.0, 220.0, 262.0],
    [165.0, 198.0, 247.0, 294.0],
    [220.0, 264.0, 330.0, 392.0],
    [262.0, 314.0, 392.0, 466.0],
    [330.0, 396.0, 495.0, 588.0],
    [440.0, 528.0, 660.0, 784.0], // outermost
];
pub const Q2_FADE: Duration = Duration::from_millis(600);

// Q3: kick pulse
pub const Q3_GAIN: f32 = 0.8;
pub const Q3_BASE_HZ: f32 = 120.0;
pub const Q3_STEP_SAMPLES: f32 = 22_050.0;

// Q4: sustained chord through chorus and reverb
pub const Q4_GAIN: f32 = 0.8;
pub const Q4_CHORD_HZ: [f32; 4] = [110.0, 220.0, 330.0, 440.0];
pub const Q4_REVERB_ROOM: f32 = 0.95;
pub const Q4_REVERB_DAMPING: f32 = 0.15;

#[inline]
pub fn samples_to_secs(samples: f32) -> f32 {
    samples / REFERENCE_SAMPLE_RATE
}
