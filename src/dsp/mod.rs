//! Low-level integer DSP primitives used by the synth layer.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to drive directly from an audio callback. They stay
//! focused on the sample math so the synth layer can handle voices and notes.

/// Quarter-wave oscillator state machine.
pub mod oscillator;
/// Packed stereo sample frames.
pub mod sample;
/// Quarter-wave table construction.
pub mod wavetable;

pub use oscillator::{OscState, Oscillator};
pub use sample::StereoSample;
pub use wavetable::{WaveStyle, WaveTable};
