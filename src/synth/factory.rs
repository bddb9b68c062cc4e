//! Wavetable factory and the per-pitch note bank.
//!
//! The factory runs once at startup. It builds one quarter-wave table per
//! pitch class of the lowest octave and style, then describes every playable
//! pitch as a (table, stride, correction) triple over those shared tables.

use std::{fmt, sync::Arc};

use log::info;

use crate::{
    config::SynthConfig,
    dsp::{
        oscillator::CORRECTION_THRESHOLD,
        wavetable::{WaveStyle, WaveTable},
    },
    error::Result,
    synth::allocator::VoiceId,
    BASE_FREQUENCY, MAX_PITCH, MIN_PITCH, NOTES_PER_OCTAVE, PITCH_COUNT,
};

const NOTE_NAMES: [&str; NOTES_PER_OCTAVE] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Equal-tempered frequency of a MIDI pitch, tuned from A0 = 27.5 Hz.
pub fn pitch_frequency(pitch: u8) -> f64 {
    let ratio = 2.0_f64.powf(1.0 / NOTES_PER_OCTAVE as f64);
    BASE_FREQUENCY * ratio.powi(i32::from(pitch) - i32::from(MIN_PITCH))
}

/// Quarter-wave table length for a base-octave frequency.
pub fn quarter_len(sample_rate: u32, frequency: f64) -> usize {
    (f64::from(sample_rate) / (frequency * 4.0)).round() as usize
}

/// Correction unit for a note whose walk emits `quarter` samples per pass.
///
/// The walk emits `2 * quarter` samples per half-cycle while the real
/// half-period is `period / 2`. The fractional shortfall between the two is
/// what the oscillator makes up with extra samples, in units of
/// `1 / CORRECTION_THRESHOLD` samples. A walk already longer than the real
/// half-period gets no correction; the oscillator can only add samples.
pub fn correction_unit(period: f64, quarter: usize) -> u32 {
    let shortfall = period / 2.0 - (2 * quarter) as f64;
    let unit = (shortfall.clamp(0.0, 1.0) * f64::from(CORRECTION_THRESHOLD)).round() as u32;
    unit.min(CORRECTION_THRESHOLD - 1)
}

/// Display name of a MIDI pitch, e.g. `A4` for 69.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteName {
    letter: &'static str,
    octave: i8,
}

impl NoteName {
    pub fn of(pitch: u8) -> Self {
        Self {
            letter: NOTE_NAMES[usize::from(pitch) % NOTES_PER_OCTAVE],
            octave: (pitch / NOTES_PER_OCTAVE as u8) as i8 - 1,
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.octave)
    }
}

/// How one pitch plays one style.
#[derive(Debug, Clone)]
pub struct NoteWave {
    pub table: Arc<WaveTable>,
    pub stride: usize,
    pub correction: u32,
}

impl NoteWave {
    /// Samples emitted per quarter pass at this stride.
    pub fn quarter_len(&self) -> usize {
        self.table.len().div_ceil(self.stride)
    }
}

/// One playable MIDI pitch.
#[derive(Debug, Clone)]
pub struct NoteEntry {
    pitch: u8,
    name: NoteName,
    frequency: f64,
    period: f64,
    stride: usize,
    waves: [Option<NoteWave>; WaveStyle::COUNT],
    voice: Option<VoiceId>,
}

impl NoteEntry {
    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    pub fn name(&self) -> NoteName {
        self.name
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Exact period in samples at the bank's sample rate.
    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The table binding for `style`, if the bank was built with it.
    pub fn wave(&self, style: WaveStyle) -> Option<&NoteWave> {
        self.waves[style.index()].as_ref()
    }

    /// Voice currently sounding this pitch.
    pub fn voice(&self) -> Option<VoiceId> {
        self.voice
    }

    pub(crate) fn bind_voice(&mut self, voice: VoiceId) -> Option<VoiceId> {
        self.voice.replace(voice)
    }

    pub(crate) fn take_voice(&mut self) -> Option<VoiceId> {
        self.voice.take()
    }
}

/// Every playable pitch, indexed by MIDI pitch.
#[derive(Debug, Clone)]
pub struct NoteBank {
    entries: Vec<NoteEntry>,
    tables: usize,
    stored_frames: usize,
}

impl NoteBank {
    pub fn get(&self, pitch: u8) -> Option<&NoteEntry> {
        Self::slot(pitch).map(|i| &self.entries[i])
    }

    pub fn get_mut(&mut self, pitch: u8) -> Option<&mut NoteEntry> {
        Self::slot(pitch).map(|i| &mut self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteEntry> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut NoteEntry> {
        self.entries.iter_mut()
    }

    /// Number of distinct tables backing the bank.
    pub fn table_count(&self) -> usize {
        self.tables
    }

    /// Frames stored across all distinct tables.
    pub fn stored_frames(&self) -> usize {
        self.stored_frames
    }

    fn slot(pitch: u8) -> Option<usize> {
        (MIN_PITCH..=MAX_PITCH)
            .contains(&pitch)
            .then(|| usize::from(pitch - MIN_PITCH))
    }
}

/// Builds the shared quarter-wave tables and the note bank over them.
pub struct WaveTableFactory {
    sample_rate: u32,
    peak: i16,
}

impl WaveTableFactory {
    pub fn new(sample_rate: u32, peak: i16) -> Self {
        Self { sample_rate, peak }
    }

    pub fn from_config(config: &SynthConfig) -> Self {
        Self::new(config.sample_rate, config.peak_amplitude())
    }

    /// Build tables for `styles` and the note bank for every playable pitch.
    ///
    /// Any allocation failure aborts the whole build.
    pub fn build(&self, styles: &[WaveStyle]) -> Result<NoteBank> {
        let mut base: Vec<[Option<Arc<WaveTable>>; WaveStyle::COUNT]> =
            Vec::with_capacity(NOTES_PER_OCTAVE);
        let mut tables = 0;
        let mut stored_frames = 0;

        for class in 0..NOTES_PER_OCTAVE as u8 {
            let frequency = pitch_frequency(MIN_PITCH + class);
            let len = quarter_len(self.sample_rate, frequency);

            let mut by_style: [Option<Arc<WaveTable>>; WaveStyle::COUNT] = Default::default();
            for &style in styles {
                if by_style[style.index()].is_some() {
                    continue;
                }
                by_style[style.index()] = Some(WaveTable::build(style, len, self.peak, class)?);
                tables += 1;
                stored_frames += len;
            }
            base.push(by_style);
        }

        let entries = (MIN_PITCH..=MAX_PITCH)
            .map(|pitch| {
                let offset = usize::from(pitch - MIN_PITCH);
                let octave = offset / NOTES_PER_OCTAVE;
                let stride = 1usize << octave;
                let frequency = pitch_frequency(pitch);
                let period = f64::from(self.sample_rate) / frequency;

                let waves = base[offset % NOTES_PER_OCTAVE].clone().map(|table| {
                    table.map(|table| {
                        let quarter = table.len().div_ceil(stride);
                        NoteWave {
                            table,
                            stride,
                            correction: correction_unit(period, quarter),
                        }
                    })
                });

                NoteEntry {
                    pitch,
                    name: NoteName::of(pitch),
                    frequency,
                    period,
                    stride,
                    waves,
                    voice: None,
                }
            })
            .collect::<Vec<_>>();
        debug_assert_eq!(entries.len(), PITCH_COUNT);

        info!(
            "built {} quarter-wave tables at {} Hz: {} frames ({} bytes) for {} pitches",
            tables,
            self.sample_rate,
            stored_frames,
            stored_frames * std::mem::size_of::<u32>(),
            entries.len()
        );

        Ok(NoteBank {
            entries,
            tables,
            stored_frames,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SAMPLE_RATE;

    fn bank() -> NoteBank {
        WaveTableFactory::new(SAMPLE_RATE, 2031)
            .build(&WaveStyle::ALL)
            .unwrap()
    }

    #[test]
    fn tuning_hits_reference_pitches() {
        assert!((pitch_frequency(21) - 27.5).abs() < 1e-9);
        assert!((pitch_frequency(69) - 440.0).abs() < 1e-6);
        assert!((pitch_frequency(81) - 880.0).abs() < 1e-6);
    }

    #[test]
    fn names_follow_midi_octaves() {
        assert_eq!(NoteName::of(21).to_string(), "A0");
        assert_eq!(NoteName::of(24).to_string(), "C1");
        assert_eq!(NoteName::of(69).to_string(), "A4");
        assert_eq!(NoteName::of(127).to_string(), "G9");
    }

    #[test]
    fn covers_every_playable_pitch_and_nothing_else() {
        let bank = bank();
        assert_eq!(bank.iter().count(), PITCH_COUNT);
        assert!(bank.get(20).is_none());
        assert!(bank.get(21).is_some());
        assert!(bank.get(127).is_some());
        assert!(bank.get(128).is_none());
        assert!(bank.iter().all(|e| e.voice().is_none()));
    }

    #[test]
    fn only_one_octave_of_tables_is_stored() {
        let bank = bank();
        assert_eq!(bank.table_count(), NOTES_PER_OCTAVE * WaveStyle::COUNT);

        let a0 = bank.get(21).unwrap().wave(WaveStyle::Sine).unwrap();
        let a4 = bank.get(69).unwrap().wave(WaveStyle::Sine).unwrap();
        assert!(Arc::ptr_eq(&a0.table, &a4.table));
        assert_eq!(a0.stride, 1);
        assert_eq!(a4.stride, 16);
    }

    #[test]
    fn stride_doubles_each_octave() {
        let bank = bank();
        for entry in bank.iter() {
            let octave = (entry.pitch() - MIN_PITCH) as usize / NOTES_PER_OCTAVE;
            assert_eq!(entry.stride(), 1 << octave);
        }
    }

    #[test]
    fn quarter_walk_matches_real_period() {
        let bank = bank();
        for entry in bank.iter() {
            for style in WaveStyle::ALL {
                let wave = entry.wave(style).unwrap();
                let ideal = entry.period() / 4.0;
                let walked = wave.quarter_len() as f64;
                assert!(
                    (walked - ideal).abs() <= 1.0,
                    "{} {:?}: {} vs {}",
                    entry.name(),
                    style,
                    walked,
                    ideal
                );
                if entry.stride() == 1 {
                    assert!((walked - ideal).abs() <= 0.5);
                }
            }
        }
    }

    #[test]
    fn correction_stays_below_threshold() {
        let bank = bank();
        for entry in bank.iter() {
            for style in WaveStyle::ALL {
                assert!(entry.wave(style).unwrap().correction < CORRECTION_THRESHOLD);
            }
        }
    }

    #[test]
    fn correction_is_the_half_cycle_shortfall() {
        assert_eq!(correction_unit(401.0, 100), CORRECTION_THRESHOLD / 2);
        assert_eq!(correction_unit(400.0, 100), 0);
        assert_eq!(correction_unit(398.0, 100), 0);
        assert_eq!(correction_unit(401.999_999, 100), CORRECTION_THRESHOLD - 1);
    }

    #[test]
    fn missing_styles_are_not_built() {
        let bank = WaveTableFactory::new(SAMPLE_RATE, 2031)
            .build(&[WaveStyle::Square])
            .unwrap();
        assert_eq!(bank.table_count(), NOTES_PER_OCTAVE);
        let entry = bank.get(60).unwrap();
        assert!(entry.wave(WaveStyle::Square).is_some());
        assert!(entry.wave(WaveStyle::Sine).is_none());
    }
}
