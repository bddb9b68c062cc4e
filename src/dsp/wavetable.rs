/*
Quarter-Wave Tables
===================

Every waveform we play is symmetric in two ways:

  - the second quarter of a cycle is the first quarter played backwards
  - the second half of a cycle is the first half with its sign flipped

So one quarter-period is enough to rebuild a whole cycle. The oscillator walks
the quarter forwards, backwards, forwards negated and backwards negated:

     peak ┤   ╭──╮
          │  ╱    ╲
        0 ┼─╱──────╲──────╱─
          │  Q1  Q2 ╲    ╱
    -peak ┤          ╰──╯
                     Q3  Q4     Q3 = -Q1, Q4 = -Q2

Only Q1 is stored.


Shapes
------

  Sine      sin(angle) for angle in [0, π/2), L evenly spaced steps
  Triangle  linear ramp i/L from 0 towards the peak
  Square    constant 0.9 × peak (mirroring a constant gives a square wave)


Table Length
------------

For a note of frequency f at sample rate sr, one period is sr/f samples and
one quarter is

    L = round(sr / (4 f))

Only the twelve pitch classes of the lowest octave get a table. A note one
octave up has twice the frequency and so half the quarter length: it reuses
the same table and skips every second entry (stride 2), two octaves up skips
three of every four (stride 4), and so on. Table memory stays at one octave's
worth no matter how many octaves are playable.


Amplitude
---------

Samples are signed 16-bit. With P voices summed, each voice gets

    peak = 32767 / P - 16

so the pool at full peak cannot leave the i16 range. The 16 unit margin
leaves room for rounding when the shapes are quantised.
*/

use std::{f64::consts::FRAC_PI_2, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::sample::StereoSample,
    error::{Result, SynthError},
};

/// Margin subtracted from each voice's share of the i16 range.
pub const PEAK_MARGIN: i32 = 0x10;

/// Waveform shape a quarter table is filled with.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveStyle {
    Sine,
    Triangle,
    Square,
}

impl WaveStyle {
    pub const COUNT: usize = 3;
    pub const ALL: [WaveStyle; WaveStyle::COUNT] =
        [WaveStyle::Sine, WaveStyle::Triangle, WaveStyle::Square];

    /// Stable slot of this style in per-style arrays.
    pub const fn index(self) -> usize {
        match self {
            WaveStyle::Sine => 0,
            WaveStyle::Triangle => 1,
            WaveStyle::Square => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Value of the first quarter of this shape at table position `i` of `len`.
    fn quarter_value(self, i: usize, len: usize, peak: f64) -> f64 {
        match self {
            WaveStyle::Sine => (FRAC_PI_2 * i as f64 / len as f64).sin() * peak,
            WaveStyle::Triangle => i as f64 / len as f64 * peak,
            WaveStyle::Square => 0.9 * peak,
        }
    }
}

/// Per-voice peak amplitude for a pool of `max_polyphony` voices.
///
/// Zero or negative when the pool is empty or too large to leave each voice
/// any amplitude.
pub fn peak_amplitude(max_polyphony: usize) -> i16 {
    let Ok(voices) = i32::try_from(max_polyphony) else {
        return 0;
    };
    if voices == 0 {
        return 0;
    }
    let share = i32::from(i16::MAX) / voices - PEAK_MARGIN;
    share.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// An immutable quarter-period of one waveform for one pitch class.
///
/// Tables are published once behind an `Arc` and then only read: every
/// octave of the pitch class and every oscillator bound to one of them share
/// the same buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct WaveTable {
    style: WaveStyle,
    frames: Box<[StereoSample]>,
}

impl WaveTable {
    /// Fill a `len` frame quarter of `style` scaled to `peak`.
    ///
    /// `pitch_class` only labels the allocation error.
    pub fn build(style: WaveStyle, len: usize, peak: i16, pitch_class: u8) -> Result<Arc<Self>> {
        if len == 0 {
            return Err(SynthError::InvalidConfig {
                reason: "quarter-wave table would be empty",
            });
        }

        let mut frames = Vec::new();
        frames
            .try_reserve_exact(len)
            .map_err(|source| SynthError::TableAllocation {
                style,
                pitch_class,
                len,
                source,
            })?;

        let peak = f64::from(peak);
        frames.extend((0..len).map(|i| {
            // Truncate towards zero, like the integer DAC path expects.
            let mono = style.quarter_value(i, len, peak) as i16;
            StereoSample::from_mono(mono)
        }));

        Ok(Arc::new(Self {
            style,
            frames: frames.into_boxed_slice(),
        }))
    }

    pub fn style(&self) -> WaveStyle {
        self.style
    }

    /// Number of frames stored; never zero.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[StereoSample] {
        &self.frames
    }
}
