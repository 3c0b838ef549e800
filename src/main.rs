//! Terminal Tetris 2048 runner (default binary).
//!
//! It uses crossterm for input and a custom framebuffer-based renderer.
//! Configuration and logging are set up before the terminal switches to raw
//! mode, so their errors are printed normally.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use log::info;

use tui_tetris2048::config::{GameConfig, Overrides};
use tui_tetris2048::core::{GameSnapshot, GameState};
use tui_tetris2048::input::{handle_key_event, should_quit};
use tui_tetris2048::logging::init_log;
use tui_tetris2048::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

#[derive(Parser, Debug)]
#[command(version, about = "Tetris 2048 in the terminal")]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,
    /// RNG seed (same seed, same pieces and tiles)
    #[arg(long)]
    seed: Option<u32>,
    /// Grid width in cells
    #[arg(long)]
    width: Option<u8>,
    /// Grid height in cells
    #[arg(long)]
    height: Option<u8>,
    /// Log file path
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let overrides = Overrides {
        seed: args.seed,
        width: args.width,
        height: args.height,
        log_file: args.log_file,
        log_level: args.log_level,
    };
    let config = GameConfig::load(args.config.as_deref(), overrides)?;
    let _log = init_log(config.log_level()?, &config.log.file)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();

    let (score, pieces) = result?;
    println!("Final score: {score} ({pieces} pieces)");
    Ok(())
}

fn run(term: &mut TerminalRenderer, config: &GameConfig) -> Result<(u32, u32)> {
    let seed = config.seed_or_clock();
    info!("starting with seed {seed}, {:?}", config.settings());

    let mut game_state = GameState::with_settings(config.settings(), seed);
    game_state.start();

    let view = GameView::default();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_ms = config.timing.tick_ms;
    let tick_duration = Duration::from_millis(tick_ms as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game_state.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        break;
                    }
                    if let Some(action) = handle_key_event(key) {
                        game_state.apply_action(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game_state.tick(tick_ms);
        }

        if let Some(event) = game_state.take_last_event() {
            if event.report.stabilize.rows_cleared > 0 {
                info!(
                    "piece {} cleared {} row(s)",
                    event.pieces_locked, event.report.stabilize.rows_cleared
                );
            }
        }
    }

    info!(
        "quit at score {} after {} pieces",
        game_state.score(),
        game_state.pieces_locked()
    );
    Ok((game_state.score(), game_state.pieces_locked()))
}
