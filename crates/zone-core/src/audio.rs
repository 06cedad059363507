//! Boundary to the synthesis engine.
//!
//! The engine hands out opaque handles for voices and effects. Everything the
//! zone state machines need is expressed through [`AudioBackend`]; the DSP
//! itself lives behind it (WebAudio on the web, a recorder in tests).

use crate::error::AudioError;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoiceHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VoiceKind {
    /// Single oscillator with a long sustain.
    Mono { waveform: Waveform },
    /// Two-operator FM; `voices > 1` makes it polyphonic.
    Fm {
        carrier: Waveform,
        modulator: Waveform,
        cm_ratio: f32,
        index: f32,
        voices: u8,
    },
    /// Pitched percussive hit, retriggered by a sequence.
    Kick,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceSpec {
    pub kind: VoiceKind,
    pub gain: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectKind {
    Chorus,
    Reverb { room_size: f32, damping: f32 },
}

/// Where a voice or effect sends its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Master,
    Effect(EffectHandle),
}

/// Repeating note sequence: one value per step, looped.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence {
    pub values_hz: SmallVec<[f32; 8]>,
    pub step_sec: f32,
}

impl Sequence {
    pub fn new(values_hz: &[f32], step_sec: f32) -> Self {
        Self {
            values_hz: SmallVec::from_slice(values_hz),
            step_sec,
        }
    }
}

pub trait AudioBackend {
    fn create_voice(&mut self, spec: &VoiceSpec, route: Route) -> Result<VoiceHandle, AudioError>;
    fn create_effect(&mut self, kind: &EffectKind, route: Route)
        -> Result<EffectHandle, AudioError>;

    /// Start (or retune) a sustained note.
    fn play_note(&mut self, voice: VoiceHandle, hz: f32);
    fn play_chord(&mut self, voice: VoiceHandle, hz: &[f32]);
    fn set_gain(&mut self, voice: VoiceHandle, gain: f32);

    fn start_sequence(&mut self, voice: VoiceHandle, seq: &Sequence);
    /// Replace the values/step of a running sequence without restarting it.
    fn set_sequence(&mut self, voice: VoiceHandle, seq: &Sequence);
    fn stop_sequence(&mut self, voice: VoiceHandle);

    /// Disconnect and free. The handle is invalid afterwards.
    fn release_voice(&mut self, voice: VoiceHandle);
    fn release_effect(&mut self, effect: EffectHandle);

    /// Advance any sequencers against the engine clock. Called once per frame.
    fn tick(&mut self) {}
}
