//! Filter XY pad
//!
//! Drawn as a canvas with the current (cutoff, resonance) position marked.
//! Mouse coordinates are turned back into normalized pad coordinates with
//! `pad_position`, with y growing upwards like the drawing.

use ratatui::{
    layout::Rect,
    style::Color,
    symbols,
    widgets::{
        canvas::{Canvas, Line, Points},
        Block, Borders,
    },
    Frame,
};

use chordpad::graph::EffectParam;

use super::UiSnapshot;

/// Draw the pad and return the inner area that accepts pointer input.
pub fn render_pad(frame: &mut Frame, area: Rect, snapshot: &UiSnapshot) -> Rect {
    let block = Block::default()
        .title(" Filter pad (x: cutoff, y: resonance) ")
        .borders(Borders::ALL);
    let inner = block.inner(area);

    let x = f64::from(snapshot.controller(EffectParam::Cutoff));
    let y = f64::from(snapshot.controller(EffectParam::Resonance));

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, 1.0])
        .y_bounds([0.0, 1.0])
        .paint(move |ctx| {
            ctx.draw(&Line::new(x, 0.0, x, 1.0, Color::DarkGray));
            ctx.draw(&Line::new(0.0, y, 1.0, y, Color::DarkGray));
            ctx.draw(&Points {
                coords: &[(x, y)],
                color: Color::Yellow,
            });
        });

    frame.render_widget(canvas, area);
    inner
}

/// Normalized `(x, y)` for a terminal cell, or `None` outside the pad.
pub fn pad_position(area: Rect, column: u16, row: u16) -> Option<(f32, f32)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
        return None;
    }

    let span = |len: u16| f32::from(len.saturating_sub(1).max(1));
    let x = f32::from(column - area.x) / span(area.width);
    let y = 1.0 - f32::from(row - area.y) / span(area.height);
    Some((x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)))
}
