mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use tracing_subscriber::filter::EnvFilter;

use space_shooter::input::{InputState, UiEvent};
use space_shooter::interface::{TitleOption, VolumeButton};
use space_shooter::{Game, GameConfig};

use display::Viewport;

#[derive(Parser, Debug)]
#[command(name = "space_shooter")]
#[command(about = "Vertical arcade shooter in the terminal")]
struct Args {
    /// TOML config file; keys it leaves out keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed RNG seed, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<f32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<f32>,

    /// Write logs here (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈128 ms at
/// the default 16 ms frame) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

fn held_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    use KeyCode::{Char, Down, Left, Right, Up};
    InputState {
        moving_up: is_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        moving_down: is_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        moving_left: is_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        moving_right: is_held(key_frame, &[Right, Char('d'), Char('D')], frame),
        shooting: is_held(key_frame, &[Char(' '), Char('k'), Char('K')], frame),
    }
}

/// Menu keys.  Every press also counts as a skip for the intro text.
fn ui_event(code: KeyCode) -> Option<UiEvent> {
    match code {
        KeyCode::Char('1') => Some(UiEvent::Choose(TitleOption::Start)),
        KeyCode::Char('2') => Some(UiEvent::Choose(TitleOption::Options)),
        KeyCode::Char('3') => Some(UiEvent::Choose(TitleOption::HowTo)),
        KeyCode::Char('4') => Some(UiEvent::Choose(TitleOption::Credits)),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') | KeyCode::Char('B') => {
            Some(UiEvent::Back)
        }
        KeyCode::Char('+') | KeyCode::Char('=') => Some(UiEvent::Volume(VolumeButton::MusicUp)),
        KeyCode::Char('-') => Some(UiEvent::Volume(VolumeButton::MusicDown)),
        KeyCode::Char(']') => Some(UiEvent::Volume(VolumeButton::EffectsUp)),
        KeyCode::Char('[') => Some(UiEvent::Volume(VolumeButton::EffectsDown)),
        _ => None,
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    // Raw mode owns the terminal, so logs only go to a file.
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(width) = args.width {
        config.canvas_width = width;
    }
    if let Some(height) = args.height {
        config.canvas_height = height;
    }
    Ok(config)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame the keys that are still "fresh" (within
/// `HOLD_WINDOW` frames) become the `InputState` snapshot handed to the core,
/// so Space + a direction can be held at the same time.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames of
///   silence.
fn game_loop<W: Write>(out: &mut W, game: &mut Game, rx: &mpsc::Receiver<Event>) -> Result<()> {
    let frame_len = Duration::from_millis(game.config().frame_ms.max(1));
    let (canvas_width, canvas_height) = (game.config().canvas_width, game.config().canvas_height);
    let start = Instant::now();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut paused = false;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut events = Vec::new();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };

            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            paused = !paused;
                            if paused {
                                game.pause();
                                draw_paused(out)?;
                            }
                        }
                        _ => {
                            events.push(UiEvent::Skip);
                            events.extend(ui_event(code));
                        }
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if !paused {
            let input = held_input(&key_frame, frame);
            let timestamp = start.elapsed().as_secs_f64() * 1000.0;
            let output = game.update(timestamp, &input, &events);

            for command in &output.audio {
                tracing::debug!(?command, "audio");
            }

            let (cols, rows) = terminal::size()?;
            let view = Viewport::new(cols, rows, canvas_width, canvas_height);
            display::render(out, &output, &view, game.touch_controls())?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

fn draw_paused<W: Write>(out: &mut W) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let label = "PAUSED - P to resume";
    out.queue(cursor::MoveTo(
        (width / 2).saturating_sub(label.chars().count() as u16 / 2),
        height / 2,
    ))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(label))?;
    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let config = load_config(&args)?;
    tracing::info!(?config, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let mut game = Game::new(config);
    let result = game_loop(&mut out, &mut game, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        tracing::error!("{err:#}");
    }
    result
}
