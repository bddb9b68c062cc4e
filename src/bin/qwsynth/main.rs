//! qwsynth - play the quarter-wave synth from the computer keyboard
//!
//! Run with: cargo run --release
//! Logs go to `qwsynth.log`; set RUST_LOG=debug to see every note.

mod app;
mod keyboard;
mod ui;

use std::fs::File;

use app::QwSynth;
use color_eyre::eyre::WrapErr;
use quarterwave::WaveStyle;

const LOG_FILE: &str = "qwsynth.log";

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // The terminal belongs to the UI, so logging goes to a file.
    let log = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {}", LOG_FILE))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log)))
        .init();

    QwSynth::new()
        .polyphony(16)
        .buffer_size(256)
        .style(WaveStyle::Triangle)
        .run()
}
