use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "playback")]
use sky_siege::audio::RodioOutput;
use sky_siege::audio::{AudioOutput, AudioSystem, TerminalBell};
use sky_siege::config::{GameConfig, DEFAULT_CONFIG_PATH};
use sky_siege::display::{render, Canvas, TerminalCanvas};
use sky_siege::input::{Controls, KeyboardInput};
use sky_siege::{init_state, restart, tick, Entropy, GameStatus};

#[derive(Parser)]
#[command(name = "sky_siege")]
#[command(about = "Fixed-viewport arcade shooter for the terminal")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Fix the RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Disable all audio
    #[arg(long)]
    mute: bool,
    /// Write logs here instead of the configured file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so logs go to a file.
fn init_logging(config: &GameConfig) -> Result<()> {
    let file = File::create(&config.log.file)
        .with_context(|| format!("cannot create log file {}", config.log.file.display()))?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log.level.as_str()),
    )
    .target(env_logger::Target::Pipe(Box::new(file)))
    .init();
    Ok(())
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// The default device when it can be opened, otherwise the terminal bell.
#[cfg(feature = "playback")]
fn open_audio_output(config: &GameConfig) -> Box<dyn AudioOutput> {
    if config.audio.muted {
        return Box::new(TerminalBell::new(stdout()));
    }
    match RodioOutput::open() {
        Ok(output) => Box::new(output),
        Err(err) => {
            log::warn!("no audio device ({err}), falling back to the terminal bell");
            Box::new(TerminalBell::new(stdout()))
        }
    }
}

#[cfg(not(feature = "playback"))]
fn open_audio_output(_config: &GameConfig) -> Box<dyn AudioOutput> {
    log::info!("built without the `playback` feature, using the terminal bell");
    Box::new(TerminalBell::new(stdout()))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// One update-then-render pass per frame at a fixed timestep until the
/// player quits.
fn game_loop<W: Write, O: AudioOutput>(
    canvas: &mut TerminalCanvas<W>,
    input: &mut KeyboardInput,
    audio: &mut AudioSystem<O>,
    config: &GameConfig,
    seed: u64,
) -> Result<()> {
    let mut dice = Entropy(StdRng::seed_from_u64(seed));
    let dt = config.frame_dt();
    let frame = Duration::from_secs_f32(dt);

    let (width, height) = canvas.viewport();
    let mut state = init_state(width, height);
    audio.play_music();

    loop {
        let frame_start = Instant::now();

        input.poll();
        if input.should_close() {
            log::info!("quit requested at frame {}", state.frame);
            return Ok(());
        }

        match state.status {
            GameStatus::Playing => {
                audio.update(dt);
                state = tick(&state, &input.frame_input(), dt, &mut dice);
                for cue in &state.cues {
                    audio.play(*cue);
                }
            }
            GameStatus::GameOver => {
                if input.confirm_pressed() {
                    state = restart(&state);
                    audio.restart_music();
                }
            }
        }

        let (cols, rows) = terminal::size()?;
        canvas.resize(cols, rows);
        render(canvas, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = GameConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.mute {
        config.audio.muted = true;
    }
    if let Some(path) = args.log_file {
        config.log.file = path;
    }

    init_logging(&config)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!(
        "starting: viewport {}x{} at {} fps, seed {seed}",
        config.window.width,
        config.window.height,
        config.window.target_fps
    );

    let mut audio = AudioSystem::new(open_audio_output(&config), &config.audio);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (cols, rows) = terminal::size().unwrap_or((80, 24));
    let (width, height) = (config.window.width, config.window.height);
    let mut canvas = TerminalCanvas::new(out, width, height, cols, rows);
    let mut input = KeyboardInput::spawn();

    let result = game_loop(&mut canvas, &mut input, &mut audio, &config, seed);

    // Always restore the terminal
    let mut out = canvas.into_inner();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        log::error!("game loop failed: {err:#}");
    }
    result
}
