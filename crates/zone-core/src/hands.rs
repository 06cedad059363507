//! Hand samples delivered by the pose-inference collaborator.
//!
//! The collaborator posts JSON records `{handedness, landmarks}` with 21
//! normalized landmarks per hand. Only the index fingertip is consumed.

use crate::constants::{INDEX_FINGERTIP, LANDMARK_COUNT};
use glam::Vec2;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Handedness::Left => 0,
            Handedness::Right => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HandSample {
    pub handedness: Handedness,
    pub landmarks: [Vec2; LANDMARK_COUNT],
}

impl HandSample {
    /// Index fingertip in normalized sensor coordinates.
    pub fn fingertip(&self) -> Vec2 {
        self.landmarks[INDEX_FINGERTIP]
    }

    /// Sample with every landmark at `tip`; handy for synthetic input.
    pub fn at(handedness: Handedness, tip: Vec2) -> Self {
        Self {
            handedness,
            landmarks: [tip; LANDMARK_COUNT],
        }
    }
}

#[derive(Deserialize)]
struct RawPoint {
    x: f32,
    y: f32,
}

#[derive(Deserialize)]
struct RawHand {
    handedness: Handedness,
    landmarks: Vec<RawPoint>,
}

impl RawHand {
    fn into_sample(self) -> Option<HandSample> {
        if self.landmarks.len() != LANDMARK_COUNT {
            return None;
        }
        let mut landmarks = [Vec2::ZERO; LANDMARK_COUNT];
        for (dst, p) in landmarks.iter_mut().zip(self.landmarks) {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return None;
            }
            *dst = Vec2::new(p.x, p.y);
        }
        Some(HandSample {
            handedness: self.handedness,
            landmarks,
        })
    }
}

/// Parse one detection result. Malformed hands are dropped with a warning;
/// malformed JSON is an error.
pub fn parse_hands(json: &str) -> Result<Vec<HandSample>, serde_json::Error> {
    let raw: Vec<RawHand> = serde_json::from_str(json)?;
    let total = raw.len();
    let hands: Vec<HandSample> = raw.into_iter().filter_map(RawHand::into_sample).collect();
    if hands.len() != total {
        log::warn!(
            "[hands] dropped {} malformed hand record(s)",
            total - hands.len()
        );
    }
    Ok(hands)
}

/// Single "latest detections" slot. The pose callback overwrites it; the
/// frame loop reads whatever is there without waiting.
#[derive(Clone, Debug, Default)]
pub struct DetectionSlot {
    latest: Vec<HandSample>,
    generation: u64,
}

impl DetectionSlot {
    pub fn publish(&mut self, hands: Vec<HandSample>) {
        self.latest = hands;
        self.generation += 1;
    }

    pub fn latest(&self) -> &[HandSample] {
        &self.latest
    }

    /// Number of results published so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
