//! TUI module for chordpad
//!
//! Keys play chords, Tab/arrows turn knobs, the mouse drives the XY pad.
//! The instrument is locked briefly per gesture and once per frame for a
//! display snapshot.

mod keys;
mod knobs;
mod pad;
pub mod state;
mod status;
mod waveform;

use std::{
    io::stdout,
    sync::{Arc, Mutex},
    time::Duration,
};

use color_eyre::eyre::{eyre, Result as EyreResult};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use chordpad::{graph::EffectParam, music::Note, Instrument};

pub use state::UiSnapshot;

use keys::KeyAction;
use knobs::render_knobs;
use pad::{pad_position, render_pad};
use status::{render_status, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;
/// Knob change per Up/Down press.
const KNOB_STEP: f32 = 0.05;

/// Turn on mouse capture and, where the terminal supports it, key-release
/// reporting. Returns whether key releases will arrive.
pub fn enable_input() -> EyreResult<bool> {
    execute!(stdout(), EnableMouseCapture)?;
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    Ok(enhanced)
}

/// Undo `enable_input`. Best effort: we are shutting down anyway.
pub fn restore_input() {
    let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    let _ = execute!(stdout(), DisableMouseCapture);
}

/// UI application state
pub struct UiApp {
    instrument: Arc<Mutex<Instrument>>,
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    /// Audio sample buffer for visualization
    audio_buffer: Vec<f32>,
    /// Key releases are reported by the terminal
    key_release: bool,
    /// Root of the chord started from the keyboard, if still held
    active_root: Option<Note>,
    /// Knob that Up/Down adjust
    selected: usize,
    /// Where the pad was last drawn, for mouse hit-testing
    pad_area: Rect,
    should_quit: bool,
}

impl UiApp {
    pub fn new(instrument: Arc<Mutex<Instrument>>, audio_rx: Consumer<f32>, key_release: bool) -> Self {
        Self {
            instrument,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            key_release,
            active_root: None,
            selected: 0,
            pad_area: Rect::default(),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            let snapshot = self.snapshot()?;
            terminal.draw(|frame| self.render(frame, &snapshot))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key)?,
                    Event::Mouse(mouse) => self.handle_mouse(mouse)?,
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Poll for new audio samples from ring buffer
    fn poll_audio(&mut self) {
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn snapshot(&self) -> EyreResult<UiSnapshot> {
        self.with_instrument(|inst| UiSnapshot::capture(inst))
    }

    fn with_instrument<R>(&self, f: impl FnOnce(&mut Instrument) -> R) -> EyreResult<R> {
        let mut instrument = self
            .instrument
            .lock()
            .map_err(|_| eyre!("instrument lock poisoned"))?;
        Ok(f(&mut instrument))
    }

    fn handle_key(&mut self, key: KeyEvent) -> EyreResult<()> {
        match key.kind {
            KeyEventKind::Repeat => return Ok(()),
            KeyEventKind::Release => {
                if let KeyCode::Char(c) = key.code {
                    if self.active_root.is_some() && self.active_root == keys::root_for_key(c) {
                        self.active_root = None;
                        self.with_instrument(|inst| inst.stop_chord())?;
                    }
                }
                return Ok(());
            }
            KeyEventKind::Press => {}
        }

        let selected = EffectParam::ALL[self.selected];
        match keys::action_for(key.code) {
            Some(KeyAction::Quit) => self.should_quit = true,
            Some(KeyAction::PlayRoot(root)) => {
                self.active_root = Some(root);
                self.with_instrument(|inst| {
                    inst.play_chord(root);
                })?;
            }
            Some(KeyAction::Stop) => {
                self.active_root = None;
                self.with_instrument(|inst| inst.stop_chord())?;
            }
            Some(KeyAction::Panic) => {
                self.active_root = None;
                self.with_instrument(|inst| inst.all_notes_off())?;
            }
            Some(KeyAction::ChordType(chord_type)) => {
                self.with_instrument(|inst| inst.set_chord_type(chord_type))?
            }
            Some(KeyAction::OctaveDown) => {
                self.with_instrument(|inst| inst.octave_down())?;
            }
            Some(KeyAction::OctaveUp) => {
                self.with_instrument(|inst| inst.octave_up())?;
            }
            Some(KeyAction::CyclePreset) => {
                self.with_instrument(|inst| {
                    inst.cycle_preset();
                })?;
            }
            Some(KeyAction::NextKnob) => self.selected = (self.selected + 1) % EffectParam::ALL.len(),
            Some(KeyAction::KnobUp) => {
                self.with_instrument(|inst| inst.nudge_controller(selected, KNOB_STEP))?;
            }
            Some(KeyAction::KnobDown) => {
                self.with_instrument(|inst| inst.nudge_controller(selected, -KNOB_STEP))?;
            }
            None => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> EyreResult<()> {
        let pressed = matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
        );
        if !pressed {
            return Ok(());
        }
        if let Some((x, y)) = pad_position(self.pad_area, mouse.column, mouse.row) {
            self.with_instrument(|inst| inst.pad_move(x, y))?;
        }
        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame, snapshot: &UiSnapshot) {
        let area = frame.area();

        // Main layout: status, controls row, scope, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(10),   // Knobs + pad
                Constraint::Length(8), // Scope
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_status(frame, chunks[0], snapshot, &stats);

        let controls = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);
        render_knobs(frame, controls[0], snapshot, self.selected);
        self.pad_area = render_pad(frame, controls[1], snapshot);

        render_waveform(frame, chunks[2], &self.audio_buffer, snapshot);

        let release_hint = if self.key_release { "release" } else { "[Space]" };
        let help = Paragraph::new(format!(
            " [a-j] Play ({release_hint} stops)  [1-5] Chord  [z/x] Octave  [p] Preset  [Tab/↑↓] Knobs  [!] Panic  [Q] Quit"
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
