//! Note handling: the table factory, the voice pool and the frame loop.

pub mod allocator;
pub mod factory;
pub mod message;
pub mod poly;

pub use allocator::{VoiceId, VoicePool};
pub use factory::{NoteBank, NoteEntry, WaveTableFactory};
pub use message::{MessageReceiver, SynthMessage};
pub use poly::PolySynth;
