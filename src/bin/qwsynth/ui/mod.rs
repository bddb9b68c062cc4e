//! TUI module for qwsynth
//!
//! Reads keys, sends note messages to the audio thread and shows what the
//! voice pool is doing.

pub mod state;
mod spectrum;
mod transport;
mod voices;
mod waveform;

use std::{collections::BTreeSet, time::Duration};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use quarterwave::{synth::message::SynthMessage, WaveStyle};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};

pub use state::{UiStateInit, UiStateUpdate, VoiceView};

use crate::keyboard::Keyboard;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, AudioStats};
use voices::render_voices;
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 2048;

pub struct UiApp {
    init: UiStateInit,
    /// Note and style messages for the audio thread
    synth_tx: Producer<SynthMessage>,
    audio_rx: Consumer<f32>,
    state_rx: Consumer<UiStateUpdate>,
    current_state: UiStateUpdate,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    keyboard: Keyboard,
    /// Pitches toggled on from the keyboard
    held: BTreeSet<u8>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        init: UiStateInit,
        synth_tx: Producer<SynthMessage>,
        audio_rx: Consumer<f32>,
        state_rx: Consumer<UiStateUpdate>,
        style: WaveStyle,
    ) -> Self {
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, init.sample_rate);
        Self {
            init,
            synth_tx,
            audio_rx,
            state_rx,
            current_state: UiStateUpdate::new(style),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            keyboard: Keyboard::default(),
            held: BTreeSet::new(),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_state();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        // Let the stream ring out cleanly if it outlives the UI for a moment.
        self.send(SynthMessage::AllNotesOff);
        Ok(())
    }

    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }
        if !received {
            return;
        }

        // Keep only the newest VIS_BUFFER_SIZE samples
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
        self.spectrum.update(&self.audio_buffer);
    }

    /// Keep only the latest state
    fn poll_state(&mut self) {
        while let Ok(state) = self.state_rx.pop() {
            self.current_state = state;
        }
    }

    fn send(&mut self, message: SynthMessage) {
        if self.synth_tx.push(message).is_err() {
            log::warn!("control queue full, dropped {:?}", message);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                self.held.clear();
                self.send(SynthMessage::AllNotesOff);
            }
            KeyCode::Char('z') => self.keyboard.octave_down(),
            KeyCode::Char('x') => self.keyboard.octave_up(),
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                if let Some(style) = WaveStyle::from_index(index) {
                    self.send(SynthMessage::SetStyle(style));
                }
            }
            KeyCode::Char(c) => {
                let Some(note) = self.keyboard.pitch(c) else {
                    return;
                };
                // Terminals rarely report key releases, so note keys toggle.
                if self.held.remove(&note) {
                    self.send(SynthMessage::NoteOff { note, velocity: 0 });
                } else {
                    self.held.insert(note);
                    self.send(SynthMessage::NoteOn {
                        note,
                        velocity: 100,
                    });
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(8),    // Voices + scope
                Constraint::Length(10), // Spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(area);
        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(20)])
            .split(rows[1]);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(
            frame,
            rows[0],
            &self.init,
            &self.current_state,
            self.keyboard.octave(),
            &stats,
        );
        render_voices(frame, middle[0], &self.init, self.current_state.voices());
        render_waveform(frame, middle[1], &self.audio_buffer);
        render_spectrum(frame, rows[2], self.spectrum.data());

        let help = Paragraph::new(
            " [A-K] Notes  [Z/X] Octave  [1/2/3] Sine/Triangle/Square  [Space] All off  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }
}
