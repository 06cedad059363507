pub mod keyboard;
pub mod lifecycle;
pub mod pointer;

pub use keyboard::wire_keyboard;
pub use lifecycle::wire_pagehide;
pub use pointer::wire_audio_unlock;
