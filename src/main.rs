use std::fs::File;
use std::io::{self, stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{cursor, terminal, ExecutableCommand};
use log::info;

use terminal_shooter::compute::init_state;
use terminal_shooter::config::{Args, GameConfig};
use terminal_shooter::controller::{self, EventSource};
use terminal_shooter::{display, input};

// ── Logging ───────────────────────────────────────────────────────────────────

/// The game owns the terminal, so records only reach stderr at `warn` unless
/// `RUST_LOG` says otherwise. With a log file everything from `info` up goes
/// there instead.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_level = if log_file.is_some() { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("failed to initialise logger")?;
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.game_config();
    config.validate()?;
    init_logging(args.log_file.as_deref())?;

    info!(
        "starting {}x{} at {} fps with {} lives",
        config.width, config.height, config.fps, config.lives
    );

    let mut out = BufWriter::new(stdout());

    // No fallback renderer: a terminal that cannot go raw ends the run here.
    terminal::enable_raw_mode().context("failed to enable raw terminal mode")?;

    let result = enter_screen(&mut out).and_then(|()| run(&mut out, &config));

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn enter_screen<W: Write>(out: &mut W) -> Result<()> {
    out.execute(terminal::EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    out.execute(cursor::Hide).context("failed to hide cursor")?;
    Ok(())
}

fn run<W: Write>(out: &mut W, config: &GameConfig) -> Result<()> {
    // Dedicate a thread exclusively to blocking byte reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<u8>();
    input::spawn_capture(io::stdin(), tx);

    let mut state = init_state(config.width, config.height, config.lives);
    let mut events = EventSource::new(rx, config.tick_period());
    controller::run(out, &mut state, &mut events)?;

    info!(
        "final score {} on stage {} after {} ticks",
        state.score, state.stage, state.frame
    );
    display::render_summary(out, &state).context("failed to draw summary")?;
    thread::sleep(config.summary_hold);
    Ok(())
}
