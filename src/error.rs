use std::collections::TryReserveError;

use thiserror::Error;

use crate::dsp::wavetable::WaveStyle;

/// Everything that can go wrong while bringing the synthesizer up.
///
/// Nothing on the realtime path returns an error: out-of-range pitches and
/// note-ons without a free voice are dropped silently, and headroom overflows
/// are only logged.
#[derive(Debug, Error)]
pub enum SynthError {
    /// A quarter-wave table could not be allocated. The synth cannot run with
    /// a partial table set, so callers should treat this as fatal.
    #[error("could not allocate {len} frames for the {style:?} table of pitch class {pitch_class}")]
    TableAllocation {
        style: WaveStyle,
        pitch_class: u8,
        len: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("invalid synth configuration: {reason}")]
    InvalidConfig { reason: &'static str },
}

pub type Result<T> = std::result::Result<T, SynthError>;
