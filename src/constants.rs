// Front-end tuning: audio graph voicing and Canvas2D styling. Engine behavior
// constants live in `zone_core::constants`.

// DOM ids
pub const CANVAS_ID: &str = "app-canvas";
pub const START_OVERLAY_ID: &str = "start-overlay";

// Master bus
pub const MASTER_GAIN: f32 = 0.5;

// Sequencer scheduling against the AudioContext clock (seconds)
pub const SCHEDULE_LEAD_SEC: f64 = 0.02;
pub const SCHEDULE_LOOKAHEAD_SEC: f64 = 0.1;
pub const STALL_RESYNC_SEC: f64 = 0.5;
pub const MIN_STEP_SEC: f64 = 0.02;
pub const GLIDE_TAU_SEC: f64 = 0.02;

// Kick voice
pub const KICK_SWEEP_START: f32 = 3.0; // start pitch as a multiple of the target
pub const KICK_SWEEP_SEC: f64 = 0.12;
pub const KICK_DECAY_SEC: f64 = 0.35;

// Chorus
pub const CHORUS_WET: f32 = 0.5;
pub const CHORUS_DELAY_SEC: f32 = 0.025;
pub const CHORUS_DEPTH_SEC: f32 = 0.004;
pub const CHORUS_RATE_HZ: f32 = 0.8;

// Reverb
pub const REVERB_WET: f32 = 0.6;
pub const REVERB_MIN_SEC: f32 = 1.0;
pub const REVERB_ROOM_SEC: f32 = 4.0; // added at room_size = 1
pub const REVERB_TONE_MIN_HZ: f32 = 800.0;
pub const REVERB_TONE_SPAN_HZ: f32 = 8000.0;

// Drawing
pub const BACKGROUND: &str = "#05070d";
pub const CIRCLE_STROKE: &str = "rgba(200, 220, 255, 0.85)";
pub const AXIS_STROKE: &str = "rgba(200, 220, 255, 0.35)";
pub const RING_STROKE: &str = "rgba(160, 190, 230, 0.35)";
pub const RING_HIGHLIGHT: &str = "rgba(255, 210, 120, 0.95)";
pub const LABEL_FILL: &str = "rgba(207, 231, 255, 0.6)";
pub const LABEL_ACTIVE_FILL: &str = "rgba(255, 230, 160, 1.0)";
pub const LEFT_HAND_FILL: &str = "rgba(120, 200, 255, 0.95)";
pub const RIGHT_HAND_FILL: &str = "rgba(255, 140, 180, 0.95)";
pub const FINGERTIP_RADIUS_PX: f64 = 8.0;
pub const CALIBRATION_BOX_WIDTH_PX: f64 = 240.0; // sensor preview width; height follows aspect
pub const CALIBRATION_BOX_MARGIN_PX: f64 = 16.0;
pub const CALIBRATION_FRAME_STROKE: &str = "rgba(255, 255, 255, 0.5)";
pub const CALIBRATION_AREA_STROKE: &str = "rgba(120, 255, 160, 0.95)";
pub const FONT: &str = "13px system-ui";
