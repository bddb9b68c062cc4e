//! Benchmarks for quarter-wave playback.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use quarterwave::{
    dsp::oscillator::{step, Oscillator, Phase, Walk},
    synth::factory::WaveTableFactory,
    StereoSample, WaveStyle, SAMPLE_RATE,
};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let bank = WaveTableFactory::new(SAMPLE_RATE, 2031)
        .build(&WaveStyle::ALL)
        .unwrap();
    let a4 = bank.get(69).unwrap();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![StereoSample::SILENCE; size];

        for style in WaveStyle::ALL {
            let wave = a4.wave(style).unwrap();
            let mut osc = Oscillator::new();
            osc.bind(wave.table.clone(), wave.stride, wave.correction);

            let name = format!("{:?}", style).to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.write_frame(black_box(&mut buffer));
                })
            });
        }

        // Accumulate path used by every voice after the first
        let wave = a4.wave(WaveStyle::Triangle).unwrap();
        let mut osc = Oscillator::new();
        osc.bind(wave.table.clone(), wave.stride, wave.correction);
        group.bench_with_input(BenchmarkId::new("accumulate", size), &size, |b, _| {
            b.iter(|| {
                osc.accumulate_frame(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

pub fn bench_step(c: &mut Criterion) {
    let bank = WaveTableFactory::new(SAMPLE_RATE, 2031)
        .build(&[WaveStyle::Sine])
        .unwrap();
    let wave = bank.get(21).unwrap().wave(WaveStyle::Sine).unwrap();
    let walk = Walk {
        stride: wave.stride,
        correction: wave.correction,
        stopping: false,
    };
    let frames = wave.table.frames();

    c.bench_function("dsp/step", |b| {
        let mut phase = Phase::START;
        b.iter(|| {
            let (next, sample) = step(black_box(phase), walk, frames);
            phase = next;
            black_box(sample)
        })
    });
}
