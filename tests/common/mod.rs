// Shared fakes for host-side tests.

#![allow(dead_code)]

use std::collections::HashSet;
use zone_core::audio::{
    AudioBackend, EffectHandle, EffectKind, Route, Sequence, VoiceHandle, VoiceSpec,
};
use zone_core::AudioError;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateVoice(VoiceSpec, Route, VoiceHandle),
    CreateEffect(EffectKind, Route, EffectHandle),
    PlayNote(VoiceHandle, f32),
    PlayChord(VoiceHandle, Vec<f32>),
    SetGain(VoiceHandle, f32),
    StartSequence(VoiceHandle, Sequence),
    SetSequence(VoiceHandle, Sequence),
    StopSequence(VoiceHandle),
    ReleaseVoice(VoiceHandle),
    ReleaseEffect(EffectHandle),
}

/// Records every call and tracks which handles are still alive.
#[derive(Default)]
pub struct RecordingAudio {
    pub calls: Vec<Call>,
    pub live_voices: HashSet<u32>,
    pub live_effects: HashSet<u32>,
    pub ticks: usize,
    /// Fail effect creation once this many effects have been created.
    pub fail_effects_after: Option<usize>,
    next_id: u32,
    effects_created: usize,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_effects_after(n: usize) -> Self {
        Self {
            fail_effects_after: Some(n),
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn voices_created(&self) -> usize {
        self.count(|c| matches!(c, Call::CreateVoice(..)))
    }

    pub fn last_gain(&self, voice: VoiceHandle) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::SetGain(v, g) if *v == voice => Some(*g),
            _ => None,
        })
    }

    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl AudioBackend for RecordingAudio {
    fn create_voice(&mut self, spec: &VoiceSpec, route: Route) -> Result<VoiceHandle, AudioError> {
        let h = VoiceHandle(self.alloc());
        self.live_voices.insert(h.0);
        self.calls.push(Call::CreateVoice(*spec, route, h));
        Ok(h)
    }

    fn create_effect(
        &mut self,
        kind: &EffectKind,
        route: Route,
    ) -> Result<EffectHandle, AudioError> {
        if let Some(limit) = self.fail_effects_after {
            if self.effects_created >= limit {
                return Err(AudioError::Allocation {
                    what: "effect",
                    reason: "test limit".into(),
                });
            }
        }
        self.effects_created += 1;
        let h = EffectHandle(self.alloc());
        self.live_effects.insert(h.0);
        self.calls.push(Call::CreateEffect(*kind, route, h));
        Ok(h)
    }

    fn play_note(&mut self, voice: VoiceHandle, hz: f32) {
        self.calls.push(Call::PlayNote(voice, hz));
    }

    fn play_chord(&mut self, voice: VoiceHandle, hz: &[f32]) {
        self.calls.push(Call::PlayChord(voice, hz.to_vec()));
    }

    fn set_gain(&mut self, voice: VoiceHandle, gain: f32) {
        self.calls.push(Call::SetGain(voice, gain));
    }

    fn start_sequence(&mut self, voice: VoiceHandle, seq: &Sequence) {
        self.calls.push(Call::StartSequence(voice, seq.clone()));
    }

    fn set_sequence(&mut self, voice: VoiceHandle, seq: &Sequence) {
        self.calls.push(Call::SetSequence(voice, seq.clone()));
    }

    fn stop_sequence(&mut self, voice: VoiceHandle) {
        self.calls.push(Call::StopSequence(voice));
    }

    fn release_voice(&mut self, voice: VoiceHandle) {
        self.live_voices.remove(&voice.0);
        self.calls.push(Call::ReleaseVoice(voice));
    }

    fn release_effect(&mut self, effect: EffectHandle) {
        self.live_effects.remove(&effect.0);
        self.calls.push(Call::ReleaseEffect(effect));
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }
}
