//! Error types for the zone engine.
//!
//! None of these escape a frame: every component converts them into a log
//! line plus a fallback (default calibration, skipped write, idle quadrant).

use thiserror::Error;

/// Failures from the client-local key/value store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Failures while decoding or validating a persisted active area.
#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("no calibration stored under {0}")]
    Missing(String),

    #[error("calibration JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("active area {x},{y} {width}x{height} violates sensor bounds")]
    OutOfBounds {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures reported by an audio backend.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },

    #[error("unknown audio handle {0}")]
    UnknownHandle(u32),
}
