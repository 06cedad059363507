//! Quadrant and ring resolution in display space.
//!
//! The display circle is split by two axes through its center into four
//! quadrants, numbered counter-clockwise from the top-right with "up" as
//! positive y. Concentric rings, each labeled with a year, are spread evenly
//! between 10% and 90% of the radius.

use crate::constants::{
    DIAMETER_HEIGHT_RATIO, RING_INNER_RATIO, RING_OUTER_RATIO, RING_SNAP_PX, RING_YEARS,
};
use glam::Vec2;

pub type Year = u16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    /// 1-based number as shown on the display.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn index(self) -> usize {
        match self {
            Quadrant::Q1 => 0,
            Quadrant::Q2 => 1,
            Quadrant::Q3 => 2,
            Quadrant::Q4 => 3,
        }
    }

    pub fn suit(self) -> Suit {
        match self {
            Quadrant::Q1 => Suit::Diamonds,
            Quadrant::Q2 => Suit::Spades,
            Quadrant::Q3 => Suit::Clubs,
            Quadrant::Q4 => Suit::Hearts,
        }
    }
}

/// Card suit used to pick trail imagery; one per quadrant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Suit {
    Diamonds,
    Spades,
    Clubs,
    Hearts,
}

impl Suit {
    pub fn name(self) -> &'static str {
        match self {
            Suit::Diamonds => "diamonds",
            Suit::Spades => "spades",
            Suit::Clubs => "clubs",
            Suit::Hearts => "hearts",
        }
    }
}

/// Resolved zone for one tracked point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneAddress {
    pub quadrant: Quadrant,
    pub ring: Option<Year>,
}

/// Which quadrant `point` falls in relative to `center`. Points on an axis go
/// to the quadrant on the non-negative side.
pub fn quadrant(point: Vec2, center: Vec2) -> Quadrant {
    let dx = point.x - center.x;
    let dy = center.y - point.y;
    match (dx >= 0.0, dy >= 0.0) {
        (true, true) => Quadrant::Q1,
        (false, true) => Quadrant::Q2,
        (false, false) => Quadrant::Q3,
        (true, false) => Quadrant::Q4,
    }
}

/// Ring layout and snap threshold.
#[derive(Clone, Debug)]
pub struct RingSet {
    pub years: Vec<Year>,
    pub snap_px: f32,
}

impl Default for RingSet {
    fn default() -> Self {
        Self {
            years: RING_YEARS.to_vec(),
            snap_px: RING_SNAP_PX,
        }
    }
}

impl RingSet {
    /// Radius of ring `i` for a circle of `radius`.
    pub fn ring_radius(&self, i: usize, radius: f32) -> f32 {
        let inner = radius * RING_INNER_RATIO;
        let outer = radius * RING_OUTER_RATIO;
        if self.years.len() < 2 {
            return inner;
        }
        let t = i as f32 / (self.years.len() - 1) as f32;
        inner + (outer - inner) * t
    }

    /// Index of the nearest ring if it is closer than the snap threshold.
    /// Equal distances resolve to the lower index.
    pub fn ring_index(&self, point: Vec2, center: Vec2, radius: f32) -> Option<usize> {
        let d = point.distance(center);
        let mut best: Option<(usize, f32)> = None;
        for i in 0..self.years.len() {
            let diff = (d - self.ring_radius(i, radius)).abs();
            match best {
                Some((_, bd)) if diff >= bd => {}
                _ => best = Some((i, diff)),
            }
        }
        best.filter(|&(_, diff)| diff < self.snap_px).map(|(i, _)| i)
    }

    pub fn ring(&self, point: Vec2, center: Vec2, radius: f32) -> Option<Year> {
        self.ring_index(point, center, radius)
            .map(|i| self.years[i])
    }

    pub fn index_of(&self, year: Year) -> Option<usize> {
        self.years.iter().position(|&y| y == year)
    }
}

/// Center and radius of the display circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneLayout {
    pub center: Vec2,
    pub radius: f32,
}

impl ZoneLayout {
    /// Circle centered on the display with the given diameter.
    pub fn centered(display: Vec2, diameter: f32) -> Self {
        Self {
            center: display * 0.5,
            radius: diameter * 0.5,
        }
    }

    pub fn default_diameter(display: Vec2) -> f32 {
        display.y * DIAMETER_HEIGHT_RATIO
    }

    pub fn resolve(&self, point: Vec2, rings: &RingSet) -> ZoneAddress {
        ZoneAddress {
            quadrant: quadrant(point, self.center),
            ring: rings.ring(point, self.center, self.radius),
        }
    }
}
