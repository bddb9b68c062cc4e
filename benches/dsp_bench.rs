//! Benchmarks for the oscillator and the full frame loop.
//!
//! Run with: cargo bench
//!
//! Every frame has to be ready before the transport asks for the next one.
//! Reference deadlines at the 192kHz default sample rate:
//!   - 64 samples  = 0.33ms
//!   - 128 samples = 0.67ms
//!   - 256 samples = 1.33ms
//!   - 512 samples = 2.67ms
//!
//! Benchmark groups:
//!   - dsp/*        One oscillator per style
//!   - scenarios/*  `PolySynth::pull_frame` from one voice up to full polyphony

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Frame sizes a transport typically asks for.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_oscillator,
    dsp::bench_step,
    scenarios::bench_polyphony,
);
criterion_main!(benches);
