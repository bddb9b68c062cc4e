pub mod config;
pub mod dsp; // Integer sample packing, quarter-wave tables, oscillator automaton
pub mod error;
pub mod io;
pub mod synth; // Table factory, voice pool and the frame loop

pub use config::SynthConfig;
pub use dsp::sample::StereoSample;
pub use dsp::wavetable::WaveStyle;
pub use error::{Result, SynthError};
pub use synth::poly::PolySynth;

/// Output sample rate the tables are built for by default (Hz).
pub const SAMPLE_RATE: u32 = 192_000;
/// Number of oscillators in the voice pool by default.
pub const MAX_POLYPHONY: usize = 16;
/// Frames produced per `pull_frame` call by default.
pub const BUFFER_SIZE: usize = 256;

/// Lowest playable MIDI pitch (A0).
pub const MIN_PITCH: u8 = 21;
/// Highest playable MIDI pitch (G9).
pub const MAX_PITCH: u8 = 127;
pub const NOTES_PER_OCTAVE: usize = 12;
/// Number of `NoteEntry`s in a bank.
pub const PITCH_COUNT: usize = (MAX_PITCH - MIN_PITCH) as usize + 1;

/// Frequency of `MIN_PITCH` in Hz, the root of the equal-tempered tuning.
pub(crate) const BASE_FREQUENCY: f64 = 27.5;
