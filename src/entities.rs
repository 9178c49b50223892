//! All game entity types: pure data, no logic.
//!
//! Constructors only fill in fields from caller-supplied coordinates; every
//! state transition lives in `compute`.

pub const PLAYER_GLYPH: char = 'A';
pub const ENEMY_GLYPH: char = 'V';
pub const PLAYER_BULLET_GLYPH: char = '|';
pub const ENEMY_BULLET_GLYPH: char = '.';
pub const BOSS_BULLET_GLYPH: char = 'o';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub lives: u32,
    pub glyph: char,
}

impl Player {
    pub fn new(x: i32, y: i32, lives: u32) -> Self {
        Self {
            x,
            y,
            lives,
            glyph: PLAYER_GLYPH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
    pub glyph: char,
    /// Ticks since the enemy last dropped a row.
    pub move_timer: u32,
    pub hp: u32,
}

impl Enemy {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            glyph: ENEMY_GLYPH,
            move_timer: 0,
            hp: 1,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A projectile. Only one of `dx`/`dy` is ever non-zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub glyph: char,
}

impl Bullet {
    /// Player shot travelling one row up per tick.
    pub fn player(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            dx: 0,
            dy: -1,
            glyph: PLAYER_BULLET_GLYPH,
        }
    }

    /// Hostile shot travelling one row down per tick.
    pub fn hostile(x: i32, y: i32, glyph: char) -> Self {
        Self {
            x,
            y,
            dx: 0,
            dy: 1,
            glyph,
        }
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Boss {
    /// Top-left corner of the bounding rectangle.
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub hp: u32,
    pub max_hp: u32,
    /// Horizontal patrol direction, always +1 or -1.
    pub direction: i32,
    pub attack_timer: u32,
}

impl Boss {
    pub fn new(x: i32, y: i32, width: i32, height: i32, hp: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            hp,
            max_hp: hp,
            direction: 1,
            attack_timer: 0,
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state. Only the loop controller's thread ever holds a
/// mutable reference to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Bullets fired by the player.
    pub bullets: Vec<Bullet>,
    /// Bullets fired by enemies and the boss.
    pub enemy_bullets: Vec<Bullet>,
    pub boss: Option<Boss>,
    pub score: u32,
    pub stage: u32,
    pub status: GameStatus,
    /// Set once the stage's boss is down; cleared when the stage advances.
    pub stage_clear: bool,
    pub frame: u64,
    pub width: u16,
    pub height: u16,
}

impl Game {
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
