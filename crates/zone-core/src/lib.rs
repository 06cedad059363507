pub mod audio;
pub mod calibration;
pub mod clock;
pub mod constants;
pub mod draw;
pub mod error;
pub mod hands;
pub mod input;
pub mod mapping;
pub mod session;
pub mod trail;
pub mod zone_audio;
pub mod zones;

pub use audio::{AudioBackend, EffectHandle, VoiceHandle};
pub use calibration::{ActiveArea, CalibrationMode, CalibrationStore, KeyValueStore, MemoryStore};
pub use draw::DrawCommand;
pub use error::{AudioError, CalibrationError, StorageError};
pub use hands::{parse_hands, DetectionSlot, HandSample, Handedness};
pub use input::{CalibrationInputHandler, HeldKeys, KeyCommand};
pub use session::{EngineConfig, FrameInput, Session};
pub use trail::{ImageCatalog, ImageRef, TrailGenerator, TrailSymbol};
pub use zone_audio::{Membership, ZoneAudio, ZonePhase};
pub use zones::{Quadrant, RingSet, Suit, Year, ZoneAddress, ZoneLayout};
