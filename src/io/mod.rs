//! External interfaces: MIDI decoding, event translation and the audio
//! transport hand-off.

pub mod converter;
pub mod midi;
pub mod transport;

pub use converter::midi_to_synth;
pub use midi::MidiEvent;
pub use transport::{write_interleaved, FramePump};
