//! Per-frame driver that ties calibration, mapping, zones, audio and trail
//! together.
//!
//! The mutable state (active area, edit mode, overlay flag, per-quadrant
//! activity) lives on [`Session`], and each frame is one call to
//! [`Session::frame`].

use crate::audio::AudioBackend;
use crate::calibration::{ActiveArea, CalibrationMode, CalibrationStore, KeyValueStore};
use crate::constants::{
    CALIBRATION_STORAGE_KEY, MIN_DIAMETER_PX, SENSOR_HEIGHT, SENSOR_WIDTH, TRAIL_SYMBOL_SIZE_PX,
};
use crate::draw::{quadrant_label_position, DrawCommand};
use crate::hands::HandSample;
use crate::input::{CalibrationInputHandler, HeldKeys, KeyCommand};
use crate::mapping::map_normalized;
use crate::trail::{ImageCatalog, TrailConfig, TrailGenerator};
use crate::zone_audio::{Membership, ZoneAudio, ZonePhase};
use crate::zones::{Quadrant, RingSet, ZoneAddress, ZoneLayout};
use glam::Vec2;
use instant::Instant;
use smallvec::SmallVec;

/// Per-installation parameters.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub sensor: Vec2,
    pub rings: RingSet,
    pub trail: TrailConfig,
    pub storage_key: String,
    pub input: CalibrationInputHandler,
    /// Fixed seed for trail image choice; entropy when `None`.
    pub trail_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sensor: Vec2::new(SENSOR_WIDTH, SENSOR_HEIGHT),
            rings: RingSet::default(),
            trail: TrailConfig::default(),
            storage_key: CALIBRATION_STORAGE_KEY.to_string(),
            input: CalibrationInputHandler::default(),
            trail_seed: None,
        }
    }
}

/// Everything the frame needs from the outside world.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    pub hands: &'a [HandSample],
    pub held: HeldKeys,
    pub display: Vec2,
    pub now: Instant,
}

/// A hand after mapping and resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedPoint {
    pub position: Vec2,
    pub zone: ZoneAddress,
}

pub struct Session<S: KeyValueStore> {
    config: EngineConfig,
    store: CalibrationStore<S>,
    area: ActiveArea,
    mode: CalibrationMode,
    overlay_visible: bool,
    display: Vec2,
    diameter: f32,
    diameter_adjusted: bool,
    zones: ZoneAudio,
    trail: TrailGenerator,
}

impl<S: KeyValueStore> Session<S> {
    /// Load the persisted area and lay out the circle for `display`.
    pub fn new(config: EngineConfig, storage: S, catalog: ImageCatalog, display: Vec2) -> Self {
        let store = CalibrationStore::with_key(storage, &config.storage_key).with_sensor(config.sensor);
        let area = store.load();
        let trail = match config.trail_seed {
            Some(seed) => TrailGenerator::with_seed(config.trail.clone(), catalog, seed),
            None => TrailGenerator::new(config.trail.clone(), catalog),
        };
        let zones = ZoneAudio::new(config.rings.clone());
        Self {
            store,
            area,
            mode: CalibrationMode::Off,
            overlay_visible: false,
            display,
            diameter: ZoneLayout::default_diameter(display).max(MIN_DIAMETER_PX),
            diameter_adjusted: false,
            zones,
            trail,
            config,
        }
    }

    pub fn area(&self) -> ActiveArea {
        self.area
    }

    pub fn mode(&self) -> CalibrationMode {
        self.mode
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn diameter(&self) -> f32 {
        self.diameter
    }

    pub fn layout(&self) -> ZoneLayout {
        ZoneLayout::centered(self.display, self.diameter)
    }

    pub fn zones(&self) -> &ZoneAudio {
        &self.zones
    }

    pub fn trail(&self) -> &TrailGenerator {
        &self.trail
    }

    pub fn store(&self) -> &CalibrationStore<S> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// React to a key-press edge.
    pub fn handle_key(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::ToggleOverlay => {
                self.overlay_visible = !self.overlay_visible;
                log::info!(
                    "[keys] calibration overlay {}",
                    if self.overlay_visible { "shown" } else { "hidden" }
                );
            }
            KeyCommand::SelectMode(requested) => {
                self.mode = self.mode.toggled(requested);
                log::info!("[keys] calibration mode: {}", self.mode.label());
            }
            KeyCommand::ClearTrail => {
                self.trail.clear();
                log::info!("[trail] cleared");
            }
        }
    }

    /// Track the display size. The default diameter follows the display until
    /// the operator adjusts it; an adjusted one is only clamped.
    pub fn set_display(&mut self, display: Vec2) {
        if display == self.display {
            return;
        }
        self.display = display;
        let ceiling = display.x.min(display.y).max(MIN_DIAMETER_PX);
        self.diameter = if self.diameter_adjusted {
            self.diameter.min(ceiling).max(MIN_DIAMETER_PX)
        } else {
            ZoneLayout::default_diameter(display).max(MIN_DIAMETER_PX)
        };
        log::debug!(
            "[frame] display {}x{} diameter {:.0}",
            display.x,
            display.y,
            self.diameter
        );
    }

    /// Map and resolve every hand against the current calibration.
    pub fn track(&self, hands: &[HandSample]) -> SmallVec<[TrackedPoint; 2]> {
        let layout = self.layout();
        hands
            .iter()
            .map(|hand| {
                let position =
                    map_normalized(hand.fingertip(), &self.area, self.config.sensor, self.display);
                TrackedPoint {
                    position,
                    zone: layout.resolve(position, &self.config.rings),
                }
            })
            .collect()
    }

    /// Run one frame and return what to draw.
    pub fn frame<A: AudioBackend>(
        &mut self,
        input: &FrameInput<'_>,
        audio: &mut A,
    ) -> Vec<DrawCommand> {
        self.set_display(input.display);

        if self.mode != CalibrationMode::Off {
            let outcome = self.config.input.poll(
                self.mode,
                &input.held,
                &mut self.area,
                &mut self.diameter,
                self.config.sensor,
                self.display,
            );
            if outcome.area_changed {
                self.store.schedule_save(self.area, input.now);
            }
            if outcome.diameter_changed {
                self.diameter_adjusted = true;
            }
        }
        self.store.flush_due(input.now);

        let points = self.track(input.hands);
        let membership = membership_of(&points);
        self.zones.update(&membership, audio, input.now);
        audio.tick();

        let layout = self.layout();
        self.trail.update(input.now);
        for (hand, p) in input.hands.iter().zip(&points) {
            self.trail.try_spawn(
                hand.handedness,
                p.position,
                p.zone.quadrant,
                &layout,
                &self.config.rings,
                input.now,
            );
        }

        self.draw_list(&layout, input.hands, &points, input.now)
    }

    /// Release all zone audio, and write any pending calibration right away.
    pub fn shutdown<A: AudioBackend>(&mut self, audio: &mut A, now: Instant) {
        self.store.flush();
        self.zones.shutdown(audio, now);
    }

    fn draw_list(
        &self,
        layout: &ZoneLayout,
        hands: &[HandSample],
        points: &[TrackedPoint],
        now: Instant,
    ) -> Vec<DrawCommand> {
        let rings = &self.config.rings;
        let mut out = Vec::with_capacity(8 + rings.years.len() + self.trail.len() + points.len());
        out.push(DrawCommand::Circle {
            center: layout.center,
            radius: layout.radius,
        });
        out.push(DrawCommand::Axes {
            center: layout.center,
            radius: layout.radius,
        });
        for (i, &year) in rings.years.iter().enumerate() {
            out.push(DrawCommand::Ring {
                center: layout.center,
                radius: rings.ring_radius(i, layout.radius),
                year,
                highlighted: points.iter().any(|p| p.zone.ring == Some(year)),
            });
        }
        for q in Quadrant::ALL {
            out.push(DrawCommand::QuadrantLabel {
                quadrant: q,
                position: quadrant_label_position(layout, q),
                active: self.zones.phase(q) == ZonePhase::Active,
            });
        }
        for s in self.trail.symbols() {
            out.push(DrawCommand::Symbol {
                position: s.position,
                size: TRAIL_SYMBOL_SIZE_PX,
                alpha: s.alpha(now),
                image: s.image,
            });
        }
        for (hand, p) in hands.iter().zip(points) {
            out.push(DrawCommand::Fingertip {
                position: p.position,
                handedness: hand.handedness,
                zone: p.zone,
            });
        }
        if self.overlay_visible {
            out.push(DrawCommand::CalibrationArea {
                area: self.area,
                sensor: self.config.sensor,
            });
            out.push(DrawCommand::ModeLabel {
                mode: self.mode,
                text: format!(
                    "mode: {}  area {:.0},{:.0} {:.0}x{:.0}  diameter {:.0}",
                    self.mode.label(),
                    self.area.x,
                    self.area.y,
                    self.area.width,
                    self.area.height,
                    self.diameter
                ),
            });
        }
        out
    }
}

/// Hands per quadrant, with the ring year of the first hand on a ring.
pub fn membership_of(points: &[TrackedPoint]) -> [Membership; 4] {
    let mut membership = [Membership::default(); 4];
    for p in points {
        let m = &mut membership[p.zone.quadrant.index()];
        m.hands = m.hands.saturating_add(1);
        if m.year.is_none() {
            m.year = p.zone.ring;
        }
    }
    membership
}
