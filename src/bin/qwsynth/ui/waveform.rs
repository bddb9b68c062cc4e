//! Waveform oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Start of the trace: the first rising zero crossing in the first half of
/// the buffer, so a steady note stands still on screen.
fn trigger(samples: &[f32]) -> usize {
    let half = samples.len() / 2;
    samples[..half]
        .windows(2)
        .position(|w| w[0] < 0.0 && w[1] >= 0.0)
        .map_or(0, |i| i + 1)
}

pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let block = Block::default().title(" Waveform ").borders(Borders::ALL);

    let start = trigger(audio_buffer);
    let shown = &audio_buffer[start..];
    let width = (audio_buffer.len() / 2).max(1);

    // One voice peaks at 1/16 of full scale; zoom so it is still visible.
    let peak = shown.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let range = f64::from(peak.max(1.0 / 64.0)) * 1.1;

    let data: Vec<(f64, f64)> = shown
        .iter()
        .take(width)
        .enumerate()
        .map(|(i, &sample)| (i as f64 / width as f64, f64::from(sample)))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-range, range])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
