//! Startup configuration.
//!
//! Everything here is fixed once a `PolySynth` is built: tables, voices and the
//! frame buffer are sized from it and never resized afterwards.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::wavetable::{peak_amplitude, WaveStyle},
    error::{Result, SynthError},
    synth::factory::{pitch_frequency, quarter_len},
    BUFFER_SIZE, MAX_POLYPHONY, MIN_PITCH, NOTES_PER_OCTAVE, SAMPLE_RATE,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Number of oscillators in the pool. Also scales the per-voice peak so
    /// the full pool summed at peak stays inside the i16 range.
    pub max_polyphony: usize,
    /// Frames per `pull_frame`.
    pub buffer_size: usize,
    /// Waveform styles to build tables for.
    pub styles: Vec<WaveStyle>,
    /// Style used by note-ons until the first `set_style`.
    pub default_style: WaveStyle,
    /// Scan every mixed frame for samples above the expected headroom and
    /// log a warning when one shows up.
    pub check_headroom: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            max_polyphony: MAX_POLYPHONY,
            buffer_size: BUFFER_SIZE,
            styles: WaveStyle::ALL.to_vec(),
            default_style: WaveStyle::Triangle,
            check_headroom: cfg!(debug_assertions),
        }
    }
}

impl SynthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn max_polyphony(mut self, voices: usize) -> Self {
        self.max_polyphony = voices;
        self
    }

    pub fn buffer_size(mut self, frames: usize) -> Self {
        self.buffer_size = frames;
        self
    }

    pub fn styles(mut self, styles: &[WaveStyle]) -> Self {
        self.styles = styles.to_vec();
        self
    }

    pub fn default_style(mut self, style: WaveStyle) -> Self {
        self.default_style = style;
        self
    }

    pub fn check_headroom(mut self, enabled: bool) -> Self {
        self.check_headroom = enabled;
        self
    }

    /// Reject settings the table factory or the voice pool cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_polyphony == 0 {
            return Err(invalid("max_polyphony must be at least 1"));
        }
        if i32::try_from(self.max_polyphony).is_err() {
            return Err(invalid("max_polyphony is out of range"));
        }
        if self.buffer_size == 0 {
            return Err(invalid("buffer_size must be at least 1"));
        }
        if self.styles.is_empty() {
            return Err(invalid("at least one waveform style is required"));
        }
        if !self.styles.contains(&self.default_style) {
            return Err(invalid("default_style is not in the style set"));
        }
        if peak_amplitude(self.max_polyphony) <= 0 {
            return Err(invalid("max_polyphony leaves no amplitude per voice"));
        }

        // The shortest base-octave table belongs to the top pitch class.
        let top = MIN_PITCH + (NOTES_PER_OCTAVE - 1) as u8;
        if quarter_len(self.sample_rate, pitch_frequency(top)) == 0 {
            return Err(invalid("sample_rate is too low for the lowest octave"));
        }

        Ok(())
    }

    /// Per-voice peak amplitude in i16 units.
    pub fn peak_amplitude(&self) -> i16 {
        peak_amplitude(self.max_polyphony)
    }

    /// Largest lane magnitude a mixed frame can reach when every voice sits
    /// at its peak.
    pub fn headroom(&self) -> u16 {
        let voices = i32::try_from(self.max_polyphony).unwrap_or(i32::MAX);
        let total = i32::from(self.peak_amplitude().max(0)).saturating_mul(voices);
        total.clamp(0, i32::from(i16::MAX)) as u16
    }
}

fn invalid(reason: &'static str) -> SynthError {
    SynthError::InvalidConfig { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SynthConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.peak_amplitude(), 2031);
        assert_eq!(config.headroom(), 2031 * 16);
    }

    #[test]
    fn rejects_empty_pool() {
        let config = SynthConfig::new().max_polyphony(0);
        assert!(matches!(
            config.validate(),
            Err(SynthError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_default_style_outside_style_set() {
        let config = SynthConfig::new()
            .styles(&[WaveStyle::Sine])
            .default_style(WaveStyle::Square);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_sample_rate_without_room_for_a_table() {
        let config = SynthConfig::new().sample_rate(50);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_polyphony_without_amplitude() {
        let config = SynthConfig::new().max_polyphony(4096);
        assert!(config.validate().is_err());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn rejects_polyphony_that_would_wrap() {
        let config = SynthConfig::new().max_polyphony((1 << 32) + 1);
        assert!(matches!(
            config.validate(),
            Err(SynthError::InvalidConfig { .. })
        ));
        assert_eq!(config.peak_amplitude(), 0);
    }
}
