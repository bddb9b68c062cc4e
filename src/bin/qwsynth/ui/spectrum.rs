//! Spectrum analyzer widget
//!
//! FFT over the scope buffer, read out at log-spaced frequencies from A0 up.
//! Bins fall back slowly after a peak so short transients stay readable.

use std::sync::Arc;

use quarterwave::synth::factory::pitch_frequency;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const SPECTRUM_BINS: usize = 48;
const FLOOR_DB: f64 = -100.0;
/// How far a bin may fall per update
const FALL_DB: f64 = 3.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// (FFT bin index, frequency in Hz) per displayed point
    bins: Vec<(usize, f64)>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log2 frequency, level in dB)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: u32) -> Self {
        let len = buffer_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(len);

        // Hann window
        let window = (0..len)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / (len - 1) as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect();

        let nyquist = f64::from(sample_rate) / 2.0;
        let low = pitch_frequency(quarterwave::MIN_PITCH);
        let high = nyquist.min(20_000.0).max(low * 2.0);
        let last_bin = len / 2 - 1;
        let bins: Vec<(usize, f64)> = (0..SPECTRUM_BINS)
            .map(|i| {
                let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
                let freq = low * (high / low).powf(t);
                let index = (freq * len as f64 / f64::from(sample_rate)).round() as usize;
                (index.min(last_bin), freq)
            })
            .collect();

        let spectrum = bins.iter().map(|&(_, f)| (f.log2(), FLOOR_DB)).collect();

        Self {
            window,
            bins,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); len],
            spectrum,
        }
    }

    /// Analyze the newest `window.len()` samples of `buffer`.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() < self.window.len() {
            return;
        }
        let recent = &buffer[buffer.len() - self.window.len()..];

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(recent).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = (self.window.len() as f32 / 2.0).powi(2);
        for ((_, level), &(index, _)) in self.spectrum.iter_mut().zip(&self.bins) {
            let power = (self.scratch[index].norm_sqr() / norm).max(1e-12);
            let db = (10.0 * f64::from(power).log10()).max(FLOOR_DB);
            *level = db.max(*level - FALL_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let (low, high) = match (spectrum.first(), spectrum.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => (0.0, 1.0),
    };

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([low, high])
                .labels(vec![
                    format!("{:.0}", low.exp2()),
                    format!("{:.0}", ((low + high) / 2.0).exp2()),
                    format!("{:.0}", high.exp2()),
                ])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
