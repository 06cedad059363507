//! Active-area calibration and its debounced persistence.
//!
//! The active area is the sub-rectangle of the camera frame that is stretched
//! onto the display. Operators nudge it with the keyboard; every mutation
//! re-arms a single pending save so a held key results in one write.

use crate::constants::{
    CALIBRATION_STORAGE_KEY, DEFAULT_AREA, MIN_AREA_SIZE, SAVE_DEBOUNCE, SENSOR_HEIGHT,
    SENSOR_WIDTH,
};
use crate::error::{CalibrationError, StorageError};
use fnv::FnvHashMap;
use glam::Vec2;
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Calibrated rectangle in sensor pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ActiveArea {
    fn default() -> Self {
        Self {
            x: DEFAULT_AREA[0],
            y: DEFAULT_AREA[1],
            width: DEFAULT_AREA[2],
            height: DEFAULT_AREA[3],
        }
    }
}

impl ActiveArea {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// True when the rectangle lies inside the sensor frame and respects the
    /// minimum edge length.
    pub fn is_valid(&self, sensor: Vec2) -> bool {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        finite
            && self.x >= 0.0
            && self.y >= 0.0
            && self.width >= MIN_AREA_SIZE
            && self.height >= MIN_AREA_SIZE
            && self.x + self.width <= sensor.x
            && self.y + self.height <= sensor.y
    }

    pub fn validate(self, sensor: Vec2) -> Result<Self, CalibrationError> {
        if self.is_valid(sensor) {
            Ok(self)
        } else {
            Err(CalibrationError::OutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Edit mode for the calibration overlay. Only one editing mode is live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CalibrationMode {
    #[default]
    Off,
    Position,
    Size,
    Diameter,
}

impl CalibrationMode {
    /// Selecting the current mode again turns editing off; selecting another
    /// mode replaces it.
    pub fn toggled(self, requested: CalibrationMode) -> CalibrationMode {
        if self == requested {
            CalibrationMode::Off
        } else {
            requested
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CalibrationMode::Off => "off",
            CalibrationMode::Position => "position",
            CalibrationMode::Size => "size",
            CalibrationMode::Diameter => "diameter",
        }
    }
}

/// Client-local persistent string storage (browser `localStorage` on the web).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store; used when no persistent storage is available and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FnvHashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut s = Self::default();
        s.entries.insert(key.to_string(), value.to_string());
        s
    }

    /// Number of successful `set` calls since creation.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingSave {
    id: u64,
    due: Instant,
    area: ActiveArea,
}

/// Owns the persisted active area and the single debounced-save slot.
pub struct CalibrationStore<S: KeyValueStore> {
    storage: S,
    key: String,
    sensor: Vec2,
    delay: Duration,
    pending: Option<PendingSave>,
    next_id: u64,
}

impl<S: KeyValueStore> CalibrationStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CALIBRATION_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
            sensor: Vec2::new(SENSOR_WIDTH, SENSOR_HEIGHT),
            delay: SAVE_DEBOUNCE,
            pending: None,
            next_id: 1,
        }
    }

    pub fn with_sensor(mut self, sensor: Vec2) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the persisted area, falling back to the default rectangle.
    pub fn load(&self) -> ActiveArea {
        match self.try_load() {
            Ok(area) => {
                log::info!(
                    "[calibration] loaded area x={} y={} w={} h={}",
                    area.x,
                    area.y,
                    area.width,
                    area.height
                );
                area
            }
            Err(e) => {
                log::warn!("[calibration] using default area: {}", e);
                ActiveArea::default()
            }
        }
    }

    fn try_load(&self) -> Result<ActiveArea, CalibrationError> {
        let raw = self
            .storage
            .get(&self.key)?
            .ok_or_else(|| CalibrationError::Missing(self.key.clone()))?;
        let area: ActiveArea = serde_json::from_str(&raw)?;
        area.validate(self.sensor)
    }

    /// Write immediately. Failures are logged and dropped.
    pub fn save(&mut self, area: &ActiveArea) {
        let json = match serde_json::to_string(area) {
            Ok(j) => j,
            Err(e) => {
                log::warn!("[calibration] could not encode area: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &json) {
            log::warn!("[calibration] save failed: {}", e);
        }
    }

    /// Cancel any pending save and arm a new one `delay` after `now`.
    pub fn schedule_save(&mut self, area: ActiveArea, now: Instant) -> u64 {
        if let Some(prev) = self.pending.take() {
            log::debug!("[calibration] cancelled pending save #{}", prev.id);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.pending = Some(PendingSave {
            id,
            due: now + self.delay,
            area,
        });
        id
    }

    /// Id of the armed save, if any.
    pub fn pending_id(&self) -> Option<u64> {
        self.pending.map(|p| p.id)
    }

    /// Fire the pending save now, whatever its deadline.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(p) => {
                self.save(&p.area);
                true
            }
            None => false,
        }
    }

    /// Fire the pending save if its deadline has passed. Returns true when a
    /// write was attempted.
    pub fn flush_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(p) if now >= p.due => {
                self.pending = None;
                log::debug!("[calibration] firing save #{}", p.id);
                self.save(&p.area);
                true
            }
            _ => false,
        }
    }
}
