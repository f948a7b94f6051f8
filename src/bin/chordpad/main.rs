//! chordpad - Terminal chord instrument
//!
//! Run with: cargo run -- [--config chordpad.yaml] [--internal]

mod audio;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use clap::Parser;
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::RingBuffer;
use tracing_subscriber::EnvFilter;

use chordpad::{
    io::{list_outputs, probe_first_output, OutputRouter},
    Instrument, SynthConfig,
};

use ui::UiApp;

/// Used for the (silent) instrument when no audio device opens.
const FALLBACK_SAMPLE_RATE: f32 = 48_000.0;
/// Samples buffered between the audio callback and the oscilloscope.
const SCOPE_RING_SIZE: usize = 8192;

#[derive(Parser, Debug)]
#[command(name = "chordpad", version, about = "Play chords from the terminal")]
struct Args {
    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip MIDI discovery and always use the internal synthesizer.
    #[arg(long)]
    internal: bool,

    /// Starting preset (saw, sine, square, triangle, fm).
    #[arg(short, long)]
    preset: Option<String>,

    /// Starting octave (0-8).
    #[arg(short, long)]
    octave: Option<i32>,

    /// Print the available MIDI outputs and exit.
    #[arg(long)]
    list_midi: bool,

    /// Write logs here. Without it, logging is off so the TUI stays clean.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    init_tracing(args.log_file.as_deref())?;

    if args.list_midi {
        return print_midi_outputs();
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(preset) = args.preset {
        config.default_preset = preset;
    }
    if let Some(octave) = args.octave {
        config.default_octave = octave;
    }

    let router = if args.internal {
        OutputRouter::internal()
    } else {
        OutputRouter::from_probe(probe_first_output("chordpad"), config.velocity)
    };

    let output = audio::AudioOutput::open_default();
    let sample_rate = output
        .as_ref()
        .map(|out| out.sample_rate())
        .unwrap_or(FALLBACK_SAMPLE_RATE);

    let instrument = Arc::new(Mutex::new(Instrument::new(&config, sample_rate, router)));
    let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);

    // Keep the stream alive for the whole session; dropping it stops audio.
    let _stream = match output.and_then(|out| out.start(instrument.clone(), scope_tx)) {
        Ok(stream) => Some(stream),
        Err(err) => {
            instrument
                .lock()
                .map_err(|_| eyre!("instrument lock poisoned"))?
                .disable_synthesis(&err);
            None
        }
    };

    let mut terminal = ratatui::init();
    let result = ui::enable_input().and_then(|enhanced| {
        UiApp::new(instrument, scope_rx, enhanced).run(&mut terminal)
    });
    ui::restore_input();
    ratatui::restore();

    result
}

fn print_midi_outputs() -> EyreResult<()> {
    let outputs = list_outputs("chordpad").wrap_err("failed to query MIDI outputs")?;
    if outputs.is_empty() {
        println!("No MIDI outputs found; chordpad will use its internal synthesizer.");
    }
    for (i, name) in outputs.iter().enumerate() {
        let note = if i == 0 { "  (used by default)" } else { "" };
        println!("{i}: {name}{note}");
    }
    Ok(())
}

fn init_tracing(log_file: Option<&Path>) -> EyreResult<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("failed to install logger: {e}"))
}

fn load_config(path: Option<&Path>) -> EyreResult<SynthConfig> {
    let Some(path) = path else {
        return Ok(SynthConfig::default());
    };

    let source = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    SynthConfig::from_yaml_str(&source)
        .wrap_err_with(|| format!("failed to load config {}", path.display()))
}
