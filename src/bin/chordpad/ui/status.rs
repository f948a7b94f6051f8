//! Status bar widget - output route, chord selection, and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use chordpad::{io::OutputMode, music::note_name};

use super::UiSnapshot;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Render the status bar
pub fn render_status(frame: &mut Frame, area: Rect, snapshot: &UiSnapshot, audio_stats: &AudioStats) {
    let block = Block::default().title(" chordpad ").borders(Borders::ALL);

    let route_color = match (&snapshot.mode, snapshot.synthesis_enabled) {
        (OutputMode::External(_), _) => Color::Green,
        (OutputMode::Internal, true) => Color::Cyan,
        (OutputMode::Internal, false) => Color::Red,
    };

    let chord = if snapshot.held.is_empty() {
        "-".to_string()
    } else {
        snapshot
            .held
            .iter()
            .map(|&n| note_name(n))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let line = Line::from(vec![
        Span::styled(format!(" {}  ", snapshot.status), Style::default().fg(route_color)),
        Span::styled(
            format!("{} | Oct {} | {}  ", snapshot.chord_type, snapshot.octave, snapshot.preset),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("♪ {chord}  "), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("voices {}  ", snapshot.voices),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}kHz  ", snapshot.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
