//! Shared state types for UI communication
//!
//! Everything the audio callback sends is `Copy` and fixed-size so pushing it
//! never allocates.

use quarterwave::{dsp::oscillator::OscState, PolySynth, WaveStyle, MAX_POLYPHONY};

/// Settings fixed when the stream opens
#[derive(Clone, Debug)]
pub struct UiStateInit {
    pub device: String,
    pub sample_rate: u32,
    pub channels: usize,
    pub polyphony: usize,
    pub frame_len: usize,
    pub tables: usize,
    pub table_bytes: usize,
}

/// One pool slot as seen by the audio thread
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoiceView {
    pub state: OscState,
    /// Pitch the slot is bound to; `None` while it rings out or sits idle
    pub pitch: Option<u8>,
    pub stride: usize,
    pub stopping: bool,
}

impl Default for VoiceView {
    fn default() -> Self {
        Self {
            state: OscState::Idle,
            pitch: None,
            stride: 1,
            stopping: false,
        }
    }
}

/// Synth state after one audio callback
#[derive(Clone, Copy, Debug)]
pub struct UiStateUpdate {
    pub style: WaveStyle,
    pub frames_rendered: u64,
    pub busy: usize,
    pub voices: [VoiceView; MAX_POLYPHONY],
    pub num_voices: usize,
}

impl UiStateUpdate {
    pub fn new(style: WaveStyle) -> Self {
        Self {
            style,
            frames_rendered: 0,
            busy: 0,
            voices: [VoiceView::default(); MAX_POLYPHONY],
            num_voices: 0,
        }
    }

    /// Capture `synth` without allocating.
    pub fn capture(synth: &PolySynth) -> Self {
        let mut update = Self::new(synth.style());
        update.frames_rendered = synth.frames_rendered();
        update.busy = synth.pool().busy_count();

        for (id, voice) in synth.pool().iter().take(MAX_POLYPHONY) {
            update.voices[id.index()] = VoiceView {
                state: voice.state(),
                pitch: None,
                stride: voice.stride(),
                stopping: voice.is_stopping(),
            };
            update.num_voices += 1;
        }
        for entry in synth.notes().iter() {
            if let Some(slot) = entry.voice().and_then(|id| update.voices.get_mut(id.index())) {
                slot.pitch = Some(entry.pitch());
            }
        }
        update
    }

    pub fn voices(&self) -> &[VoiceView] {
        &self.voices[..self.num_voices]
    }
}
