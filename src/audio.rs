use crate::constants::*;
use crate::voicing::{PitchMove, PitchState};
use fnv::FnvHashMap;
use smallvec::SmallVec;
use web_sys as web;
use zone_core::audio::{
    AudioBackend, EffectHandle, EffectKind, Route, Sequence, VoiceHandle, VoiceKind, VoiceSpec,
    Waveform,
};
use zone_core::AudioError;

fn alloc_err(what: &'static str) -> impl Fn(wasm_bindgen::JsValue) -> AudioError {
    move |e| {
        log::error!("[audio] {} error: {:?}", what, e);
        AudioError::Allocation {
            what,
            reason: format!("{:?}", e),
        }
    }
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &'static str,
) -> Result<web::GainNode, AudioError> {
    let g = web::GainNode::new(audio_ctx).map_err(alloc_err(label))?;
    g.gain().set_value(value);
    Ok(g)
}

fn create_oscillator(
    audio_ctx: &web::AudioContext,
    waveform: Waveform,
    hz: f32,
) -> Result<web::OscillatorNode, AudioError> {
    let osc = web::OscillatorNode::new(audio_ctx).map_err(alloc_err("OscillatorNode"))?;
    osc.set_type(match waveform {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Square => web::OscillatorType::Square,
        Waveform::Saw => web::OscillatorType::Sawtooth,
        Waveform::Triangle => web::OscillatorType::Triangle,
    });
    osc.frequency().set_value(hz);
    Ok(osc)
}

// Long stereo noise burst with exponential decay; `damping` darkens the tail.
fn build_impulse_response(
    audio_ctx: &web::AudioContext,
    room_size: f32,
    damping: f32,
) -> Result<web::AudioBuffer, AudioError> {
    let sr = audio_ctx.sample_rate();
    let seconds = REVERB_MIN_SEC + REVERB_ROOM_SEC * room_size.clamp(0.0, 1.0);
    let len = (sr * seconds) as u32;
    let ir = audio_ctx
        .create_buffer(2, len, sr)
        .map_err(alloc_err("AudioBuffer"))?;
    // xorshift32, fixed seeds so the room sounds the same every time
    let mut seeds: [u32; 2] = [0x1234ABCD, 0x7890FEDC];
    for (ch, seed) in seeds.iter_mut().enumerate() {
        let mut buf: Vec<f32> = vec![0.0; len as usize];
        let dt = 1.0_f32 / sr;
        for (i, v) in buf.iter_mut().enumerate() {
            let mut x = *seed;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            *seed = x;
            let n = (x as f32 / u32::MAX as f32) * 2.0 - 1.0;
            let t = i as f32 * dt;
            let decay = (-t / (seconds * 0.6)).exp();
            let dark = 1.0 - damping * (t / seconds);
            *v = n * decay * dark.max(0.0);
        }
        _ = ir.copy_to_channel(&mut buf, ch as i32);
    }
    Ok(ir)
}

struct FmOperator {
    carrier: web::OscillatorNode,
    modulator: web::OscillatorNode,
    depth: web::GainNode,
}

enum VoiceNodes {
    Mono(web::OscillatorNode),
    Fm {
        ops: SmallVec<[FmOperator; 4]>,
        cm_ratio: f32,
        index: f32,
    },
    /// Percussive voice: oscillators are created per hit.
    Kick,
}

struct SequencerState {
    seq: Sequence,
    step: usize,
    next_at: f64,
}

struct Voice {
    nodes: VoiceNodes,
    out: web::GainNode,
    level: f32,
    pitch: PitchState,
    seq: Option<SequencerState>,
}

struct Effect {
    input: web::GainNode,
    output: web::GainNode,
    // Kept so they can be disconnected and stopped on release.
    inner: Vec<web::AudioNode>,
    lfo: Option<web::OscillatorNode>,
}

/// WebAudio implementation of the synth boundary. Voices and effects are
/// plain node graphs; sequences are stepped from `tick` against the context
/// clock with a short lookahead.
pub struct WebAudioBackend {
    ctx: web::AudioContext,
    master: web::GainNode,
    voices: FnvHashMap<u32, Voice>,
    effects: FnvHashMap<u32, Effect>,
    next_id: u32,
}

impl WebAudioBackend {
    pub fn new(ctx: web::AudioContext) -> Result<Self, AudioError> {
        let master = create_gain(&ctx, MASTER_GAIN, "Master")?;
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(alloc_err("master connect"))?;
        Ok(Self {
            ctx,
            master,
            voices: FnvHashMap::default(),
            effects: FnvHashMap::default(),
            next_id: 1,
        })
    }

    /// Resume a suspended context (autoplay policy). Safe to call repeatedly.
    pub fn unlock(&self) {
        if self.ctx.state() != web::AudioContextState::Running {
            _ = self.ctx.resume();
            log::info!("[audio] context resumed");
        }
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    fn destination(&self, route: Route) -> Result<web::GainNode, AudioError> {
        match route {
            Route::Master => Ok(self.master.clone()),
            Route::Effect(h) => self
                .effects
                .get(&h.0)
                .map(|fx| fx.input.clone())
                .ok_or(AudioError::UnknownHandle(h.0)),
        }
    }

    fn build_chorus(&self) -> Result<Effect, AudioError> {
        let ctx = &self.ctx;
        let input = create_gain(ctx, 1.0, "Chorus in")?;
        let output = create_gain(ctx, 1.0, "Chorus out")?;
        let dry = create_gain(ctx, 1.0 - CHORUS_WET, "Chorus dry")?;
        let wet = create_gain(ctx, CHORUS_WET, "Chorus wet")?;
        let delay = ctx
            .create_delay_with_max_delay_time(0.1)
            .map_err(alloc_err("DelayNode"))?;
        delay.delay_time().set_value(CHORUS_DELAY_SEC);
        let lfo = create_oscillator(ctx, Waveform::Sine, CHORUS_RATE_HZ)?;
        let lfo_depth = create_gain(ctx, CHORUS_DEPTH_SEC, "Chorus depth")?;
        _ = lfo.connect_with_audio_node(&lfo_depth);
        _ = lfo_depth.connect_with_audio_param(&delay.delay_time());
        _ = lfo.start();

        _ = input.connect_with_audio_node(&dry);
        _ = dry.connect_with_audio_node(&output);
        _ = input.connect_with_audio_node(&delay);
        _ = delay.connect_with_audio_node(&wet);
        _ = wet.connect_with_audio_node(&output);
        Ok(Effect {
            input,
            output,
            inner: vec![dry.into(), wet.into(), delay.into(), lfo_depth.into()],
            lfo: Some(lfo),
        })
    }

    fn build_reverb(&self, room_size: f32, damping: f32) -> Result<Effect, AudioError> {
        let ctx = &self.ctx;
        let input = create_gain(ctx, 1.0, "Reverb in")?;
        let output = create_gain(ctx, 1.0, "Reverb out")?;
        let dry = create_gain(ctx, 1.0 - REVERB_WET, "Reverb dry")?;
        let wet = create_gain(ctx, REVERB_WET, "Reverb wet")?;
        let conv = web::ConvolverNode::new(ctx).map_err(alloc_err("ConvolverNode"))?;
        conv.set_normalize(true);
        let ir = build_impulse_response(ctx, room_size, damping)?;
        conv.set_buffer(Some(&ir));
        let tone = web::BiquadFilterNode::new(ctx).map_err(alloc_err("BiquadFilterNode"))?;
        tone.set_type(web::BiquadFilterType::Lowpass);
        tone.frequency()
            .set_value(REVERB_TONE_MIN_HZ + REVERB_TONE_SPAN_HZ * (1.0 - damping.clamp(0.0, 1.0)));

        _ = input.connect_with_audio_node(&dry);
        _ = dry.connect_with_audio_node(&output);
        _ = input.connect_with_audio_node(&conv);
        _ = conv.connect_with_audio_node(&tone);
        _ = tone.connect_with_audio_node(&wet);
        _ = wet.connect_with_audio_node(&output);
        Ok(Effect {
            input,
            output,
            inner: vec![dry.into(), wet.into(), conv.into(), tone.into()],
            lfo: None,
        })
    }

    fn fm_operator(
        &self,
        carrier: Waveform,
        modulator: Waveform,
        hz: f32,
        cm_ratio: f32,
        index: f32,
        out: &web::GainNode,
    ) -> Result<FmOperator, AudioError> {
        let c = create_oscillator(&self.ctx, carrier, hz)?;
        let m = create_oscillator(&self.ctx, modulator, hz * cm_ratio)?;
        let depth = create_gain(&self.ctx, index * hz, "FM depth")?;
        _ = m.connect_with_audio_node(&depth);
        _ = depth.connect_with_audio_param(&c.frequency());
        _ = c.connect_with_audio_node(out);
        _ = m.start();
        _ = c.start();
        Ok(FmOperator {
            carrier: c,
            modulator: m,
            depth,
        })
    }

    // A short pitched thump: fast downward pitch sweep under a percussive envelope.
    fn trigger_kick(&self, out: &web::GainNode, hz: f32, at: f64) {
        let Ok(osc) = create_oscillator(&self.ctx, Waveform::Sine, hz * KICK_SWEEP_START) else {
            return;
        };
        let Ok(env) = create_gain(&self.ctx, 0.0, "Kick env") else {
            return;
        };
        _ = osc
            .frequency()
            .set_value_at_time(hz * KICK_SWEEP_START, at);
        _ = osc
            .frequency()
            .exponential_ramp_to_value_at_time(hz.max(1.0), at + KICK_SWEEP_SEC);
        _ = env.gain().set_value_at_time(0.0, at);
        _ = env.gain().linear_ramp_to_value_at_time(1.0, at + 0.005);
        _ = env
            .gain()
            .exponential_ramp_to_value_at_time(0.001, at + KICK_DECAY_SEC);
        _ = osc.connect_with_audio_node(&env);
        _ = env.connect_with_audio_node(out);
        _ = osc.start_with_when(at);
        _ = osc.stop_with_when(at + KICK_DECAY_SEC + 0.05);
    }

    fn glide(param: &web::AudioParam, value: f32, now: f64) {
        _ = param.cancel_scheduled_values(now);
        _ = param.set_target_at_time(value, now, GLIDE_TAU_SEC);
    }
}

fn retune_operator(op: &FmOperator, hz: f32, cm_ratio: f32, index: f32, at: f64) {
    _ = op.carrier.frequency().set_value_at_time(hz, at);
    _ = op.modulator.frequency().set_value_at_time(hz * cm_ratio, at);
    _ = op.depth.gain().set_value_at_time(index * hz, at);
}

impl AudioBackend for WebAudioBackend {
    fn create_voice(&mut self, spec: &VoiceSpec, route: Route) -> Result<VoiceHandle, AudioError> {
        let dest = self.destination(route)?;
        let out = create_gain(&self.ctx, 0.0, "Voice out")?;
        let nodes = match spec.kind {
            VoiceKind::Mono { waveform } => {
                let osc = create_oscillator(&self.ctx, waveform, 0.0)?;
                _ = osc.connect_with_audio_node(&out);
                _ = osc.start();
                VoiceNodes::Mono(osc)
            }
            VoiceKind::Fm {
                carrier,
                modulator,
                cm_ratio,
                index,
                voices,
            } => {
                // Polyphonic operators share the output; scale so a full
                // chord sits at the requested level.
                let slots = voices.max(1);
                let mix = create_gain(&self.ctx, 1.0 / slots as f32, "FM mix")?;
                _ = mix.connect_with_audio_node(&out);
                let mut ops = SmallVec::new();
                for _ in 0..slots {
                    ops.push(self.fm_operator(carrier, modulator, 0.0, cm_ratio, index, &mix)?);
                }
                VoiceNodes::Fm {
                    ops,
                    cm_ratio,
                    index,
                }
            }
            VoiceKind::Kick => VoiceNodes::Kick,
        };
        out.connect_with_audio_node(&dest)
            .map_err(alloc_err("voice connect"))?;
        let id = self.alloc_id();
        self.voices.insert(
            id,
            Voice {
                nodes,
                out,
                level: spec.gain,
                pitch: PitchState::default(),
                seq: None,
            },
        );
        log::debug!("[audio] voice #{} created", id);
        Ok(VoiceHandle(id))
    }

    fn create_effect(
        &mut self,
        kind: &EffectKind,
        route: Route,
    ) -> Result<EffectHandle, AudioError> {
        let dest = self.destination(route)?;
        let fx = match *kind {
            EffectKind::Chorus => self.build_chorus()?,
            EffectKind::Reverb { room_size, damping } => self.build_reverb(room_size, damping)?,
        };
        fx.output
            .connect_with_audio_node(&dest)
            .map_err(alloc_err("effect connect"))?;
        let id = self.alloc_id();
        self.effects.insert(id, fx);
        log::debug!("[audio] effect #{} created", id);
        Ok(EffectHandle(id))
    }

    fn play_note(&mut self, voice: VoiceHandle, hz: f32) {
        let now = self.ctx.current_time();
        let Some(pitch_move) = self.voices.get_mut(&voice.0).map(|v| v.pitch.next_move()) else {
            log::warn!("[audio] play_note on unknown voice #{}", voice.0);
            return;
        };
        let Some(v) = self.voices.get(&voice.0) else {
            return;
        };
        match &v.nodes {
            VoiceNodes::Mono(osc) => match pitch_move {
                PitchMove::Jump => {
                    let freq = osc.frequency();
                    _ = freq.cancel_scheduled_values(now);
                    _ = freq.set_value_at_time(hz, now);
                }
                PitchMove::Glide => Self::glide(&osc.frequency(), hz, now),
            },
            VoiceNodes::Fm {
                ops,
                cm_ratio,
                index,
            } => {
                if let Some(op) = ops.first() {
                    retune_operator(op, hz, *cm_ratio, *index, now);
                }
            }
            VoiceNodes::Kick => self.trigger_kick(&v.out, hz, now),
        }
        Self::glide(&v.out.gain(), v.level, now);
    }

    fn play_chord(&mut self, voice: VoiceHandle, hz: &[f32]) {
        let now = self.ctx.current_time();
        let Some(v) = self.voices.get(&voice.0) else {
            return;
        };
        if let VoiceNodes::Fm {
            ops,
            cm_ratio,
            index,
        } = &v.nodes
        {
            for (op, &f) in ops.iter().zip(hz) {
                retune_operator(op, f, *cm_ratio, *index, now);
            }
        }
        Self::glide(&v.out.gain(), v.level, now);
    }

    fn set_gain(&mut self, voice: VoiceHandle, gain: f32) {
        let now = self.ctx.current_time();
        if let Some(v) = self.voices.get(&voice.0) {
            let param = v.out.gain();
            _ = param.cancel_scheduled_values(now);
            _ = param.set_value_at_time(gain, now);
        }
    }

    fn start_sequence(&mut self, voice: VoiceHandle, seq: &Sequence) {
        let now = self.ctx.current_time();
        let Some(v) = self.voices.get_mut(&voice.0) else {
            return;
        };
        v.seq = Some(SequencerState {
            seq: seq.clone(),
            step: 0,
            next_at: now + SCHEDULE_LEAD_SEC,
        });
        if !matches!(v.nodes, VoiceNodes::Kick) {
            Self::glide(&v.out.gain(), v.level, now);
        } else {
            v.out.gain().set_value(v.level);
        }
    }

    fn set_sequence(&mut self, voice: VoiceHandle, seq: &Sequence) {
        let now = self.ctx.current_time();
        let Some(v) = self.voices.get_mut(&voice.0) else {
            return;
        };
        match v.seq.as_mut() {
            Some(state) => {
                state.seq = seq.clone();
                if !state.seq.values_hz.is_empty() {
                    state.step %= state.seq.values_hz.len();
                }
            }
            None => {
                v.seq = Some(SequencerState {
                    seq: seq.clone(),
                    step: 0,
                    next_at: now + SCHEDULE_LEAD_SEC,
                });
            }
        }
    }

    fn stop_sequence(&mut self, voice: VoiceHandle) {
        if let Some(v) = self.voices.get_mut(&voice.0) {
            v.seq = None;
        }
    }

    fn release_voice(&mut self, voice: VoiceHandle) {
        let Some(v) = self.voices.remove(&voice.0) else {
            return;
        };
        match &v.nodes {
            VoiceNodes::Mono(osc) => {
                _ = osc.stop();
                _ = osc.disconnect();
            }
            VoiceNodes::Fm { ops, .. } => {
                for op in ops {
                    _ = op.carrier.stop();
                    _ = op.modulator.stop();
                    _ = op.carrier.disconnect();
                    _ = op.modulator.disconnect();
                    _ = op.depth.disconnect();
                }
            }
            VoiceNodes::Kick => {}
        }
        _ = v.out.disconnect();
        log::debug!("[audio] voice #{} released", voice.0);
    }

    fn release_effect(&mut self, effect: EffectHandle) {
        let Some(fx) = self.effects.remove(&effect.0) else {
            return;
        };
        if let Some(lfo) = &fx.lfo {
            _ = lfo.stop();
            _ = lfo.disconnect();
        }
        for n in &fx.inner {
            _ = n.disconnect();
        }
        _ = fx.input.disconnect();
        _ = fx.output.disconnect();
        log::debug!("[audio] effect #{} released", effect.0);
    }

    fn tick(&mut self) {
        let now = self.ctx.current_time();
        let horizon = now + SCHEDULE_LOOKAHEAD_SEC;
        let mut kicks: SmallVec<[(web::GainNode, f32, f64); 4]> = SmallVec::new();
        for v in self.voices.values_mut() {
            let Some(state) = v.seq.as_mut() else {
                continue;
            };
            if state.seq.values_hz.is_empty() {
                continue;
            }
            let step_sec = (state.seq.step_sec as f64).max(MIN_STEP_SEC);
            // After a stall (hidden tab) restart from now instead of bursting.
            if state.next_at < now - STALL_RESYNC_SEC {
                state.next_at = now + SCHEDULE_LEAD_SEC;
            }
            while state.next_at <= horizon {
                let hz = state.seq.values_hz[state.step % state.seq.values_hz.len()];
                let at = state.next_at;
                match &v.nodes {
                    VoiceNodes::Kick => kicks.push((v.out.clone(), hz, at)),
                    VoiceNodes::Mono(osc) => {
                        _ = osc.frequency().set_value_at_time(hz, at);
                    }
                    VoiceNodes::Fm {
                        ops,
                        cm_ratio,
                        index,
                    } => {
                        if let Some(op) = ops.first() {
                            retune_operator(op, hz, *cm_ratio, *index, at);
                        }
                    }
                }
                state.step = (state.step + 1) % state.seq.values_hz.len();
                state.next_at += step_sec;
            }
        }
        for (out, hz, at) in kicks {
            self.trigger_kick(&out, hz, at);
        }
    }
}
