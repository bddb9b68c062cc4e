use log::{debug, warn};

use crate::{
    config::SynthConfig,
    dsp::{
        sample::{count_over_headroom, StereoSample},
        wavetable::WaveStyle,
    },
    error::Result,
    synth::{
        allocator::{VoiceId, VoicePool},
        factory::{NoteBank, WaveTableFactory},
        message::{MessageReceiver, SynthMessage},
    },
};

/// The voice pool, the note bank and the frame loop that mixes them.
///
/// Everything is sized in `new`. After that no method allocates, so the whole
/// type is safe to drive from an audio callback.
pub struct PolySynth {
    config: SynthConfig,
    notes: NoteBank,
    pool: VoicePool,
    style: WaveStyle,
    buffer: Vec<StereoSample>,
    headroom: u16,
    frame_counter: u64,
}

impl PolySynth {
    /// Validate `config`, build every table and size the pool.
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;
        let notes = WaveTableFactory::from_config(&config).build(&config.styles)?;

        Ok(Self {
            pool: VoicePool::new(config.max_polyphony),
            style: config.default_style,
            buffer: vec![StereoSample::SILENCE; config.buffer_size],
            headroom: config.headroom(),
            frame_counter: 0,
            notes,
            config,
        })
    }

    /// Start a voice on `pitch` with the current style.
    ///
    /// Out-of-range pitches and a full pool are silently dropped, leaving any
    /// voice already on `pitch` untouched. Otherwise that voice is stopped as
    /// by `note_off`. Velocity is accepted and ignored.
    pub fn note_on(&mut self, pitch: u8, _velocity: u8) {
        let Some(entry) = self.notes.get_mut(pitch) else {
            return;
        };
        let Some(wave) = entry.wave(self.style) else {
            return;
        };
        let Some(id) = self.pool.allocate() else {
            debug!("no free voice for {}", entry.name());
            return;
        };

        self.pool
            .get_mut(id)
            .bind(wave.table.clone(), wave.stride, wave.correction);
        if let Some(previous) = entry.bind_voice(id) {
            self.pool.get_mut(previous).request_stop();
        }

        debug!(
            "+ {} pitch {} {:.2} Hz voice {}",
            entry.name(),
            pitch,
            entry.frequency(),
            id.index()
        );
    }

    /// Ask the voice on `pitch` to stop at its next zero crossing.
    ///
    /// The pitch is free for a new `note_on` straight away; the old voice
    /// rings out on its own and is released by `pull_frame`.
    pub fn note_off(&mut self, pitch: u8, _velocity: u8) {
        let Some(entry) = self.notes.get_mut(pitch) else {
            return;
        };
        let Some(id) = entry.take_voice() else {
            return;
        };

        self.pool.get_mut(id).request_stop();
        debug!(
            "- {} pitch {} {:.2} Hz voice {}",
            entry.name(),
            pitch,
            entry.frequency(),
            id.index()
        );
    }

    /// Switch the style used by later notes. Sounding voices keep theirs.
    pub fn set_style(&mut self, style: WaveStyle) {
        if !self.config.styles.contains(&style) {
            debug!("style {:?} was not built, keeping {:?}", style, self.style);
            return;
        }
        self.style = style;
    }

    pub fn all_notes_off(&mut self) {
        let mut stopped = 0;
        for entry in self.notes.iter_mut() {
            if let Some(id) = entry.take_voice() {
                self.pool.get_mut(id).request_stop();
                stopped += 1;
            }
        }
        debug!("all notes off: {} voices stopping", stopped);
    }

    pub fn handle_message(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            SynthMessage::NoteOff { note, velocity } => self.note_off(note, velocity),
            SynthMessage::SetStyle(style) => self.set_style(style),
            SynthMessage::AllNotesOff => self.all_notes_off(),
        }
    }

    /// Apply every pending message from `rx`.
    pub fn drain<R: MessageReceiver>(&mut self, rx: &mut R) {
        while let Some(message) = rx.pop() {
            self.handle_message(message);
        }
    }

    /// Fill and return the next frame.
    ///
    /// The first sounding voice in slot order overwrites the buffer and the
    /// rest add onto it. Voices that finished their stop during this frame go
    /// back to the pool afterwards.
    pub fn pull_frame(&mut self) -> &[StereoSample] {
        let mut filled = false;
        for id in self.pool.ids() {
            let voice = self.pool.get_mut(id);
            if voice.is_idle() {
                continue;
            }
            if filled {
                voice.accumulate_frame(&mut self.buffer);
            } else {
                voice.write_frame(&mut self.buffer);
                filled = true;
            }
        }
        if !filled {
            self.buffer.fill(StereoSample::SILENCE);
        }

        for id in self.pool.ids() {
            if self.pool.get_mut(id).poll_stopped() {
                self.pool.release(id);
            }
        }

        if self.config.check_headroom {
            let over = count_over_headroom(&self.buffer, self.headroom);
            if over > 0 {
                warn!(
                    "frame {}: {} samples above headroom {}",
                    self.frame_counter, over, self.headroom
                );
            }
        }

        self.frame_counter += 1;
        &self.buffer
    }

    /// Drain `rx`, then fill the next frame.
    pub fn pull_frame_from<R: MessageReceiver>(&mut self, rx: &mut R) -> &[StereoSample] {
        self.drain(rx);
        self.pull_frame()
    }

    pub fn style(&self) -> WaveStyle {
        self.style
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn notes(&self) -> &NoteBank {
        &self.notes
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    /// Voice currently bound to `pitch`, if any.
    pub fn voice_for(&self, pitch: u8) -> Option<VoiceId> {
        self.notes.get(pitch).and_then(|entry| entry.voice())
    }

    /// Voices producing sound, including ones ringing out after a note-off.
    pub fn active_voices(&self) -> usize {
        self.pool.iter().filter(|(_, voice)| !voice.is_idle()).count()
    }

    /// Frames pulled since construction.
    pub fn frames_rendered(&self) -> u64 {
        self.frame_counter
    }

    pub fn frame_len(&self) -> usize {
        self.buffer.len()
    }
}
