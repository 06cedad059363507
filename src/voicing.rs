// Pure voicing decisions for the WebAudio backend; no web-sys here so the
// host tests can include this file directly.

/// How a pitch change reaches a sustained oscillator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PitchMove {
    Jump,
    Glide,
}

/// Per-voice pitch history. The first note jumps straight to pitch, later
/// notes glide from wherever the oscillator is.
#[derive(Clone, Copy, Debug, Default)]
pub struct PitchState {
    tuned: bool,
}

impl PitchState {
    pub fn next_move(&mut self) -> PitchMove {
        if std::mem::replace(&mut self.tuned, true) {
            PitchMove::Glide
        } else {
            PitchMove::Jump
        }
    }
}
