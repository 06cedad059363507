//! Movement-gated trail of fading symbols.
//!
//! A symbol is dropped whenever a fingertip has travelled far enough from
//! that hand's last drop and sits on a ring. The queue is bounded; the oldest symbol
//! goes first, and anything past its fade time is dropped on `update`.

use crate::clock::since;
use crate::constants::{TRAIL_CAPACITY, TRAIL_FADE, TRAIL_MIN_STEP_PX};
use crate::hands::Handedness;
use crate::zones::{Quadrant, RingSet, Suit, Year, ZoneLayout};
use fnv::FnvHashMap;
use glam::Vec2;
use instant::Instant;
use rand::prelude::*;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::time::Duration;

/// Opaque reference to a loaded image, resolved by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageRef(pub u32);

/// Candidate images per (suit, year).
#[derive(Clone, Debug, Default)]
pub struct ImageCatalog {
    paths: Vec<String>,
    by_zone: FnvHashMap<(Suit, Year), SmallVec<[ImageRef; 2]>>,
}

// One drawing per year; each suit has its own folder.
const YEAR_IMAGE_FILES: [(Year, &str); 7] = [
    (1100, "1100-china.png"),
    (1200, "1200-egypt.png"),
    (1300, "1300-spain.png"),
    (1400, "1400-ita.png"),
    (1500, "1500-portugal.png"),
    (1600, "1600-japan.png"),
    (1700, "1700-fr.png"),
];

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// `img/<suit>/<file>` for every suit and year.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for suit in Quadrant::ALL.map(Quadrant::suit) {
            for (year, file) in YEAR_IMAGE_FILES {
                catalog.register(suit, year, &format!("img/{}/{}", suit.name(), file));
            }
        }
        catalog
    }

    pub fn register(&mut self, suit: Suit, year: Year, path: &str) -> ImageRef {
        let r = ImageRef(self.paths.len() as u32);
        self.paths.push(path.to_string());
        self.by_zone.entry((suit, year)).or_default().push(r);
        r
    }

    pub fn candidates(&self, suit: Suit, year: Year) -> &[ImageRef] {
        self.by_zone
            .get(&(suit, year))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn path(&self, image: ImageRef) -> Option<&str> {
        self.paths.get(image.0 as usize).map(|s| s.as_str())
    }

    /// All registered images, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ImageRef, &str)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(i, p)| (ImageRef(i as u32), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSymbol {
    pub position: Vec2,
    pub spawned: Instant,
    pub fade: Duration,
    /// `None` when no image is registered; the symbol still ages out normally.
    pub image: Option<ImageRef>,
    pub quadrant: Quadrant,
    pub year: Year,
}

impl TrailSymbol {
    pub fn is_expired(&self, now: Instant) -> bool {
        since(now, self.spawned) >= self.fade
    }

    /// Opacity in \[0, 1\], fading linearly to zero over the symbol's life.
    pub fn alpha(&self, now: Instant) -> f32 {
        if self.fade.is_zero() {
            return 0.0;
        }
        let age = since(now, self.spawned).as_secs_f32();
        (1.0 - age / self.fade.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct TrailConfig {
    pub capacity: usize,
    pub fade: Duration,
    pub min_step_px: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: TRAIL_CAPACITY,
            fade: TRAIL_FADE,
            min_step_px: TRAIL_MIN_STEP_PX,
        }
    }
}

pub struct TrailGenerator {
    config: TrailConfig,
    catalog: ImageCatalog,
    queue: VecDeque<TrailSymbol>,
    // Movement gate, one position per hand.
    last_spawn: [Option<Vec2>; 2],
    rng: StdRng,
}

impl TrailGenerator {
    pub fn new(config: TrailConfig, catalog: ImageCatalog) -> Self {
        Self::with_rng(config, catalog, StdRng::from_entropy())
    }

    pub fn with_seed(config: TrailConfig, catalog: ImageCatalog, seed: u64) -> Self {
        Self::with_rng(config, catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: TrailConfig, catalog: ImageCatalog, rng: StdRng) -> Self {
        Self {
            queue: VecDeque::with_capacity(config.capacity + 1),
            config,
            catalog,
            last_spawn: [None; 2],
            rng,
        }
    }

    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    /// Drop a symbol at `position` if this hand's finger moved far enough
    /// since its last symbol and sits on a ring. Returns true when a symbol
    /// was enqueued.
    pub fn try_spawn(
        &mut self,
        hand: Handedness,
        position: Vec2,
        quadrant: Quadrant,
        layout: &ZoneLayout,
        rings: &RingSet,
        now: Instant,
    ) -> bool {
        if let Some(last) = self.last_spawn[hand.index()] {
            if position.distance(last) < self.config.min_step_px {
                return false;
            }
        }
        let Some(year) = rings.ring(position, layout.center, layout.radius) else {
            return false;
        };
        let suit = quadrant.suit();
        let image = self.catalog.candidates(suit, year).choose(&mut self.rng).copied();
        if image.is_none() {
            log::debug!("[trail] no image for {} {}", suit.name(), year);
        }
        self.queue.push_back(TrailSymbol {
            position,
            spawned: now,
            fade: self.config.fade,
            image,
            quadrant,
            year,
        });
        while self.queue.len() > self.config.capacity {
            self.queue.pop_front();
        }
        self.last_spawn[hand.index()] = Some(position);
        true
    }

    /// Drop every symbol whose fade has completed.
    pub fn update(&mut self, now: Instant) {
        self.queue.retain(|s| !s.is_expired(now));
    }

    pub fn symbols(&self) -> impl Iterator<Item = &TrailSymbol> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.last_spawn = [None; 2];
    }
}
