//! Status bar widget - device, style, octave, voice count and levels

use quarterwave::WaveStyle;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{UiStateInit, UiStateUpdate};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

fn style_name(style: WaveStyle) -> &'static str {
    match style {
        WaveStyle::Sine => "sine",
        WaveStyle::Triangle => "triangle",
        WaveStyle::Square => "square",
    }
}

pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    init: &UiStateInit,
    update: &UiStateUpdate,
    octave: i8,
    stats: &AudioStats,
) {
    let block = Block::default()
        .title(format!(" qwsynth - {} ", init.device))
        .borders(Borders::ALL);

    // Time covered by the frames pulled so far
    let seconds =
        update.frames_rendered as f64 * init.frame_len as f64 / f64::from(init.sample_rate.max(1));

    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", style_name(update.style)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Octave {}  ", octave),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Voices {}/{}  ", update.busy, init.polyphony),
            Style::default().fg(if update.busy == init.polyphony {
                Color::Red
            } else {
                Color::Green
            }),
        ),
        Span::styled(
            format!("{:.1}kHz x{}  ", f64::from(init.sample_rate) / 1000.0, init.channels),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}s  ", seconds),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.3}  RMS: {:.3}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
