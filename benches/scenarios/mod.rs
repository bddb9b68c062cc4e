//! Whole-synth benchmarks.

mod voices;

pub use voices::bench_polyphony;
