//! Voice pool widget - one row per slot

use quarterwave::{dsp::oscillator::OscState, synth::factory::NoteName};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use super::{UiStateInit, VoiceView};

fn state_label(voice: &VoiceView) -> (&'static str, Color) {
    match voice.state {
        OscState::Idle => ("idle", Color::DarkGray),
        _ if voice.stopping => ("stopping", Color::Yellow),
        OscState::Up | OscState::Down => ("+", Color::Green),
        OscState::UpInverted | OscState::DownInverted => ("-", Color::Green),
        OscState::ExtraAfterUp | OscState::ExtraAfterDown => ("extra", Color::Cyan),
    }
}

pub fn render_voices(frame: &mut Frame, area: Rect, init: &UiStateInit, voices: &[VoiceView]) {
    let block = Block::default()
        .title(format!(
            " Voices ({} tables, {} KiB) ",
            init.tables,
            init.table_bytes / 1024
        ))
        .borders(Borders::ALL);

    let rows = voices.iter().enumerate().map(|(slot, voice)| {
        let (label, color) = state_label(voice);
        let note = match voice.pitch {
            Some(pitch) => format!("{} ({})", NoteName::of(pitch), pitch),
            None => String::from("-"),
        };
        let stride = if voice.state == OscState::Idle {
            String::new()
        } else {
            format!("x{}", voice.stride)
        };
        Row::new(vec![
            Cell::from(format!("{:>2}", slot)),
            Cell::from(label).style(Style::default().fg(color)),
            Cell::from(note),
            Cell::from(stride),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(5),
        ],
    )
    .header(Row::new(vec!["#", "state", "note", "step"]).style(Style::default().fg(Color::DarkGray)))
    .block(block);

    frame.render_widget(table, area);
}
