//! Command-line options and the per-run game configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Result};
use clap::Parser;

/// Narrowest grid that still fits the boss, its patrol room and both walls.
pub const MIN_WIDTH: u16 = 16;
pub const MIN_HEIGHT: u16 = 12;
pub const MAX_FPS: u32 = 1000;

#[derive(Parser, Debug)]
#[command(name = "terminal_shooter")]
#[command(about = "Real-time arcade shooter in the terminal")]
pub struct Args {
    /// Playfield width in cells
    #[arg(long, default_value_t = 60)]
    pub width: u16,

    /// Playfield height in cells
    #[arg(long, default_value_t = 30)]
    pub height: u16,

    /// Simulation ticks per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Lives at the start of the game
    #[arg(long, default_value_t = 3)]
    pub lives: u32,

    /// Seconds the game-over summary stays on screen
    #[arg(long, default_value_t = 3)]
    pub summary_secs: u64,

    /// Write log records to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.width,
            height: self.height,
            fps: self.fps,
            lives: self.lives,
            summary_hold: Duration::from_secs(self.summary_secs),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub fps: u32,
    pub lives: u32,
    pub summary_hold: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 30,
            fps: 60,
            lives: 3,
            summary_hold: Duration::from_secs(3),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width >= MIN_WIDTH,
            "width {} is too narrow, need at least {MIN_WIDTH}",
            self.width
        );
        ensure!(
            self.height >= MIN_HEIGHT,
            "height {} is too short, need at least {MIN_HEIGHT}",
            self.height
        );
        ensure!(
            (1..=MAX_FPS).contains(&self.fps),
            "fps must be between 1 and {MAX_FPS}, got {}",
            self.fps
        );
        ensure!(self.lives > 0, "lives must be at least 1");
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}
