//! QwSynth - audio setup and the run loop

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat,
};
use log::{error, info};
use quarterwave::{
    io::transport::FramePump, synth::message::SynthMessage, PolySynth, SynthConfig, WaveStyle,
    BUFFER_SIZE, MAX_POLYPHONY,
};
use rtrb::RingBuffer;

use super::ui::{UiApp, UiStateInit, UiStateUpdate, VIS_BUFFER_SIZE};

/// Control messages in flight between UI and audio thread
const CONTROL_QUEUE: usize = 256;

/// Main application builder
pub struct QwSynth {
    polyphony: usize,
    buffer_size: usize,
    style: WaveStyle,
}

impl QwSynth {
    pub fn new() -> Self {
        Self {
            polyphony: MAX_POLYPHONY,
            buffer_size: BUFFER_SIZE,
            style: WaveStyle::Triangle,
        }
    }

    /// Voices in the pool. The UI shows at most `MAX_POLYPHONY`.
    pub fn polyphony(mut self, voices: usize) -> Self {
        self.polyphony = voices.min(MAX_POLYPHONY);
        self
    }

    pub fn buffer_size(mut self, frames: usize) -> Self {
        self.buffer_size = frames;
        self
    }

    /// Style for the first notes, before any 1/2/3 key press
    pub fn style(mut self, style: WaveStyle) -> Self {
        self.style = style;
        self
    }

    /// Open the default output device, build the synth at its sample rate
    /// and run the UI until the user quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        if config.sample_format() != SampleFormat::F32 {
            return Err(eyre!(
                "unsupported output sample format {:?}",
                config.sample_format()
            ));
        }
        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        if channels == 0 {
            return Err(eyre!("output device reports no channels"));
        }

        let synth_config = SynthConfig::default()
            .sample_rate(sample_rate)
            .max_polyphony(self.polyphony)
            .buffer_size(self.buffer_size)
            .default_style(self.style);
        let mut synth = PolySynth::new(synth_config).wrap_err("failed to build the synth")?;

        let device_name = device.name().unwrap_or_else(|_| String::from("unknown"));
        info!(
            "output {} at {} Hz, {} channels, {} voices, {} frames per pull",
            device_name, sample_rate, channels, self.polyphony, self.buffer_size
        );

        let init = UiStateInit {
            device: device_name,
            sample_rate,
            channels,
            polyphony: self.polyphony,
            frame_len: synth.frame_len(),
            tables: synth.notes().table_count(),
            table_bytes: synth.notes().stored_frames() * std::mem::size_of::<u32>(),
        };

        let (synth_tx, mut synth_rx) = RingBuffer::<SynthMessage>::new(CONTROL_QUEUE);
        let (mut audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * 4);
        let (mut state_tx, state_rx) = RingBuffer::<UiStateUpdate>::new(16);

        let mut pump = FramePump::new(self.buffer_size);
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    pump.fill(&mut synth, &mut synth_rx, data, channels);

                    // Scope gets the first channel; drop samples the UI has not caught up on
                    for frame in data.chunks_exact(channels) {
                        if audio_tx.push(frame[0]).is_err() {
                            break;
                        }
                    }
                    let _ = state_tx.push(UiStateUpdate::capture(&synth));
                },
                |err| error!("audio stream error: {}", err),
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        let mut ui = UiApp::new(init, synth_tx, audio_rx, state_rx, self.style);
        let mut terminal = ratatui::init();
        let result = ui.run(&mut terminal);
        ratatui::restore();

        drop(stream);
        info!("stream closed");
        result
    }
}

impl Default for QwSynth {
    fn default() -> Self {
        Self::new()
    }
}
