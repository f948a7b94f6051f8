//! Knob panel: one gauge per effect parameter

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use super::UiSnapshot;

pub fn render_knobs(frame: &mut Frame, area: Rect, snapshot: &UiSnapshot, selected: usize) {
    let block = Block::default().title(" Effects ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(snapshot.controllers.iter().map(|_| Constraint::Length(2)))
        .split(inner);

    for (i, (&(param, value), row)) in snapshot.controllers.iter().zip(rows.iter()).enumerate() {
        let color = if i == selected { Color::Yellow } else { Color::Blue };
        let mut style = Style::default().fg(color);
        if i == selected {
            style = style.add_modifier(Modifier::BOLD);
        }

        let mapped = param.map(value);
        let label = match param.unit() {
            "" => format!("{} {:.2}", param.label(), mapped),
            unit => format!("{} {:.0} {}", param.label(), mapped, unit),
        };

        let gauge = Gauge::default()
            .gauge_style(style)
            .ratio(f64::from(value.clamp(0.0, 1.0)))
            .label(label);
        frame.render_widget(gauge, *row);
    }
}
