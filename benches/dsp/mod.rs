//! Benchmarks for the oscillator automaton.

mod oscillator;

pub use oscillator::{bench_oscillator, bench_step};
