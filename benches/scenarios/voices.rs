//! Benchmarks for `PolySynth::pull_frame` under load.
//!
//! Full polyphony is the worst case the frame deadline has to cover.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use quarterwave::{PolySynth, SynthConfig, WaveStyle, MAX_POLYPHONY};

use crate::BLOCK_SIZES;

fn playing(size: usize, voices: usize, style: WaveStyle) -> PolySynth {
    let config = SynthConfig::default()
        .buffer_size(size)
        .default_style(style)
        .check_headroom(false);
    let mut synth = PolySynth::new(config).unwrap();
    // Spread across octaves so every stride is exercised.
    for pitch in (24..).step_by(5).take(voices) {
        synth.note_on(pitch, 100);
    }
    synth
}

pub fn bench_polyphony(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut idle = playing(size, 0, WaveStyle::Triangle);
        group.bench_with_input(BenchmarkId::new("silent", size), &size, |b, _| {
            b.iter(|| {
                black_box(idle.pull_frame());
            })
        });

        let mut single = playing(size, 1, WaveStyle::Sine);
        group.bench_with_input(BenchmarkId::new("single_voice", size), &size, |b, _| {
            b.iter(|| {
                black_box(single.pull_frame());
            })
        });

        for style in WaveStyle::ALL {
            let mut full = playing(size, MAX_POLYPHONY, style);
            let name = format!("full_{:?}", style).to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    black_box(full.pull_frame());
                })
            });
        }

        // Note churn: one retrigger per frame on top of a full chord
        let mut churn = playing(size, MAX_POLYPHONY - 1, WaveStyle::Square);
        group.bench_with_input(BenchmarkId::new("retrigger", size), &size, |b, _| {
            let mut pitch = 100u8;
            b.iter(|| {
                churn.note_off(pitch, 0);
                pitch = if pitch == 110 { 100 } else { pitch + 1 };
                churn.note_on(pitch, 100);
                black_box(churn.pull_frame());
            })
        });
    }

    group.finish();
}
