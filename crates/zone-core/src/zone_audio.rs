//! Per-quadrant audio state machines.
//!
//! Each quadrant is `Idle` until at least one hand resolves into it, then
//! `Active` while it owns its voices. Leaving releases those voices right
//! away, except for Q2 which hands its voice to a fade tail (`FadingOut`)
//! that ramps the level down over a few frames. The quadrant's own slot is
//! empty as soon as exit returns, so re-entry allocates fresh voices even if
//! an old tail is still fading.
//!
//! | Quadrant | Enter | Ring change | Exit |
//! |---|---|---|---|
//! | Q1 | mono voice at 110 Hz | retune to the year pitch | hard stop |
//! | Q2 | FM voice + 4-step phrase | swap phrase for the year | stop sequence, fade 600 ms, release |
//! | Q3 | kick + fixed pulse | harmonic stack, faster pulse outward | hard stop |
//! | Q4 | poly FM chord via chorus + reverb | none | voice, chorus, reverb |

use crate::audio::{
    AudioBackend, EffectHandle, EffectKind, Route, Sequence, VoiceHandle, VoiceKind, VoiceSpec,
    Waveform,
};
use crate::clock::since;
use crate::constants::*;
use crate::error::AudioError;
use crate::zones::{Quadrant, RingSet, Year};
use instant::Instant;
use smallvec::SmallVec;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZonePhase {
    Idle,
    Active,
    FadingOut,
}

/// This frame's view of one quadrant: how many hands are in it and the ring
/// year of the first of them that sits on a ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Membership {
    pub hands: u8,
    pub year: Option<Year>,
}

impl Membership {
    pub fn is_present(&self) -> bool {
        self.hands > 0
    }
}

#[derive(Clone, Copy, Debug)]
struct FadeTail {
    voice: VoiceHandle,
    started: Instant,
    from_gain: f32,
    duration: Duration,
}

/// Runtime state owned by a single quadrant.
#[derive(Debug, Default)]
pub struct ZoneRuntimeState {
    pub active: bool,
    voices: SmallVec<[VoiceHandle; 1]>,
    /// Signal order: the first effect is fed by the voice.
    effects: SmallVec<[EffectHandle; 2]>,
    last_year: Option<Year>,
    fading: SmallVec<[FadeTail; 1]>,
}

impl ZoneRuntimeState {
    pub fn voices(&self) -> &[VoiceHandle] {
        &self.voices
    }

    pub fn effects(&self) -> &[EffectHandle] {
        &self.effects
    }

    pub fn last_year(&self) -> Option<Year> {
        self.last_year
    }

    pub fn fading_voices(&self) -> usize {
        self.fading.len()
    }
}

/// The four quadrant machines plus the ring table they key modulation on.
pub struct ZoneAudio {
    zones: [ZoneRuntimeState; 4],
    rings: RingSet,
}

impl ZoneAudio {
    pub fn new(rings: RingSet) -> Self {
        Self {
            zones: Default::default(),
            rings,
        }
    }

    pub fn state(&self, q: Quadrant) -> &ZoneRuntimeState {
        &self.zones[q.index()]
    }

    pub fn phase(&self, q: Quadrant) -> ZonePhase {
        let z = &self.zones[q.index()];
        if z.active {
            ZonePhase::Active
        } else if !z.fading.is_empty() {
            ZonePhase::FadingOut
        } else {
            ZonePhase::Idle
        }
    }

    /// Drive all four machines from this frame's membership.
    pub fn update<A: AudioBackend>(
        &mut self,
        membership: &[Membership; 4],
        audio: &mut A,
        now: Instant,
    ) {
        for q in Quadrant::ALL {
            let m = membership[q.index()];
            let active = self.zones[q.index()].active;
            match (active, m.is_present()) {
                (false, true) => {
                    if let Err(e) = self.enter(q, audio) {
                        log::warn!("[zones] Q{} enter failed: {}", q.number(), e);
                        continue;
                    }
                    if let Some(year) = m.year {
                        self.apply_year(q, year, audio);
                    }
                }
                (true, true) => {
                    if let Some(year) = m.year {
                        self.apply_year(q, year, audio);
                    }
                }
                (true, false) => self.exit(q, audio, now),
                (false, false) => {}
            }
        }
        self.advance_fades(audio, now);
    }

    /// Allocate and start the quadrant's voices. Returns `Ok(false)` when they
    /// are already allocated.
    pub fn enter<A: AudioBackend>(&mut self, q: Quadrant, audio: &mut A) -> Result<bool, AudioError> {
        let zone = &mut self.zones[q.index()];
        if !zone.voices.is_empty() {
            return Ok(false);
        }
        match q {
            Quadrant::Q1 => {
                let v = audio.create_voice(
                    &VoiceSpec {
                        kind: VoiceKind::Mono {
                            waveform: Waveform::Saw,
                        },
                        gain: Q1_GAIN,
                    },
                    Route::Master,
                )?;
                audio.play_note(v, Q1_BASE_HZ);
                zone.voices.push(v);
            }
            Quadrant::Q2 => {
                let v = audio.create_voice(
                    &VoiceSpec {
                        kind: VoiceKind::Fm {
                            carrier: Waveform::Sine,
                            modulator: Waveform::Triangle,
                            cm_ratio: 2.01,
                            index: 1.0,
                            voices: 1,
                        },
                        gain: Q2_GAIN,
                    },
                    Route::Master,
                )?;
                audio.start_sequence(
                    v,
                    &Sequence::new(&Q2_DEFAULT_PHRASE, samples_to_secs(Q2_STEP_SAMPLES)),
                );
                zone.voices.push(v);
            }
            Quadrant::Q3 => {
                let v = audio.create_voice(
                    &VoiceSpec {
                        kind: VoiceKind::Kick,
                        gain: Q3_GAIN,
                    },
                    Route::Master,
                )?;
                audio.start_sequence(
                    v,
                    &Sequence::new(&[Q3_BASE_HZ], samples_to_secs(Q3_STEP_SAMPLES)),
                );
                zone.voices.push(v);
            }
            Quadrant::Q4 => {
                let reverb = audio.create_effect(
                    &EffectKind::Reverb {
                        room_size: Q4_REVERB_ROOM,
                        damping: Q4_REVERB_DAMPING,
                    },
                    Route::Master,
                )?;
                let chorus = match audio.create_effect(&EffectKind::Chorus, Route::Effect(reverb)) {
                    Ok(c) => c,
                    Err(e) => {
                        audio.release_effect(reverb);
                        return Err(e);
                    }
                };
                let spec = VoiceSpec {
                    kind: VoiceKind::Fm {
                        carrier: Waveform::Triangle,
                        modulator: Waveform::Square,
                        cm_ratio: 1.01,
                        index: 1.2,
                        voices: Q4_CHORD_HZ.len() as u8,
                    },
                    gain: Q4_GAIN,
                };
                let v = match audio.create_voice(&spec, Route::Effect(chorus)) {
                    Ok(v) => v,
                    Err(e) => {
                        audio.release_effect(chorus);
                        audio.release_effect(reverb);
                        return Err(e);
                    }
                };
                audio.play_chord(v, &Q4_CHORD_HZ);
                zone.voices.push(v);
                zone.effects.push(chorus);
                zone.effects.push(reverb);
            }
        }
        zone.active = true;
        zone.last_year = None;
        log::info!("[zones] Q{} enter", q.number());
        Ok(true)
    }

    /// Apply ring modulation when `year` differs from the last applied year.
    pub fn apply_year<A: AudioBackend>(&mut self, q: Quadrant, year: Year, audio: &mut A) {
        let Some(idx) = self.rings.index_of(year) else {
            return;
        };
        let zone = &mut self.zones[q.index()];
        if !zone.active || zone.last_year == Some(year) {
            return;
        }
        let Some(&voice) = zone.voices.first() else {
            return;
        };
        match q {
            Quadrant::Q1 => {
                let Some(&hz) = Q1_YEAR_HZ.get(idx) else {
                    return;
                };
                audio.play_note(voice, hz);
                log::debug!("[zones] Q1 retune {} -> {:.2} Hz", year, hz);
            }
            Quadrant::Q2 => {
                let Some(phrase) = Q2_YEAR_PHRASES.get(idx) else {
                    return;
                };
                audio.set_sequence(
                    voice,
                    &Sequence::new(phrase, samples_to_secs(Q2_STEP_SAMPLES)),
                );
                log::debug!("[zones] Q2 phrase for {}", year);
            }
            Quadrant::Q3 => {
                let seq = q3_sequence(idx);
                log::debug!(
                    "[zones] Q3 {} harmonics every {:.3}s",
                    seq.values_hz.len(),
                    seq.step_sec
                );
                audio.set_sequence(voice, &seq);
            }
            // Q4 holds its chord regardless of ring.
            Quadrant::Q4 => return,
        }
        zone.last_year = Some(year);
    }

    /// Release the quadrant's resources according to its exit policy.
    pub fn exit<A: AudioBackend>(&mut self, q: Quadrant, audio: &mut A, now: Instant) {
        let zone = &mut self.zones[q.index()];
        if !zone.active && zone.voices.is_empty() {
            return;
        }
        match q {
            Quadrant::Q2 => {
                for v in zone.voices.drain(..) {
                    audio.stop_sequence(v);
                    zone.fading.push(FadeTail {
                        voice: v,
                        started: now,
                        from_gain: Q2_GAIN,
                        duration: Q2_FADE,
                    });
                }
            }
            Quadrant::Q3 => {
                for v in zone.voices.drain(..) {
                    audio.stop_sequence(v);
                    audio.release_voice(v);
                }
            }
            Quadrant::Q1 | Quadrant::Q4 => {
                for v in zone.voices.drain(..) {
                    audio.release_voice(v);
                }
            }
        }
        // Effects outlive the voice feeding them.
        for fx in zone.effects.drain(..) {
            audio.release_effect(fx);
        }
        zone.active = false;
        zone.last_year = None;
        log::info!("[zones] Q{} exit", q.number());
    }

    /// Step fade tails: linear gain ramp, release on completion.
    pub fn advance_fades<A: AudioBackend>(&mut self, audio: &mut A, now: Instant) {
        for zone in self.zones.iter_mut() {
            zone.fading.retain(|tail| {
                let elapsed = since(now, tail.started);
                let progress = if tail.duration.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f32() / tail.duration.as_secs_f32()).min(1.0)
                };
                audio.set_gain(tail.voice, tail.from_gain * (1.0 - progress));
                if progress >= 1.0 {
                    audio.release_voice(tail.voice);
                    false
                } else {
                    true
                }
            });
        }
    }

    /// Release everything immediately, including fade tails.
    pub fn shutdown<A: AudioBackend>(&mut self, audio: &mut A, now: Instant) {
        for q in Quadrant::ALL {
            self.exit(q, audio, now);
        }
        for zone in self.zones.iter_mut() {
            for tail in zone.fading.drain(..) {
                audio.release_voice(tail.voice);
            }
        }
    }
}

/// `(ring_index + 1)` harmonics of the base pitch, pulsing `ring_index + 1`
/// times faster than the base interval.
pub fn q3_sequence(ring_index: usize) -> Sequence {
    let n = ring_index + 1;
    let values: SmallVec<[f32; 8]> = (1..=n).map(|k| Q3_BASE_HZ * k as f32).collect();
    Sequence {
        values_hz: values,
        step_sec: samples_to_secs(Q3_STEP_SAMPLES) / n as f32,
    }
}
