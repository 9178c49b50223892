//! Rendering layer. All terminal I/O lives here.
//!
//! A frame is first composed into a [`Grid`] of glyphs from an immutable view
//! of the game, then written out with crossterm commands. Nothing in this
//! module changes game state, so rendering the same snapshot twice produces
//! the same bytes.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::{Boss, Game};

pub const WALL_GLYPH: char = '|';
pub const BORDER_GLYPH: char = '=';

const CONTROLS_HINT: &str = "Controls: WASD=Move, Space=Shoot, Q=Quit";

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BOSS: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

// ── Grid ──────────────────────────────────────────────────────────────────────

/// What put a glyph into a cell. Only used to pick a colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Wall,
    Player,
    Enemy,
    Boss,
    PlayerBullet,
    EnemyBullet,
}

impl CellKind {
    fn color(self) -> Color {
        match self {
            CellKind::Empty => Color::Reset,
            CellKind::Wall => C_BORDER,
            CellKind::Player => C_PLAYER,
            CellKind::Enemy => C_ENEMY,
            CellKind::Boss => C_BOSS,
            CellKind::PlayerBullet => C_BULLET_PLAYER,
            CellKind::EnemyBullet => C_BULLET_ENEMY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub kind: CellKind,
}

/// A fixed-size character grid, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    /// An empty playfield: walls on the two vertical edges, blanks elsewhere.
    pub fn blank(width: u16, height: u16) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for _ in 0..height {
            for x in 0..width {
                let wall = x == 0 || x + 1 == width;
                cells.push(if wall {
                    Cell {
                        glyph: WALL_GLYPH,
                        kind: CellKind::Wall,
                    }
                } else {
                    Cell {
                        glyph: ' ',
                        kind: CellKind::Empty,
                    }
                });
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Stamp every entity of `state` onto a fresh grid. Later layers win:
    /// player, enemies, boss, player bullets, enemy bullets.
    pub fn compose(state: &Game) -> Self {
        let mut grid = Self::blank(state.width, state.height);

        let p = &state.player;
        grid.stamp(p.x, p.y, p.glyph, CellKind::Player);

        for e in &state.enemies {
            grid.stamp(e.x, e.y, e.glyph, CellKind::Enemy);
        }
        if let Some(boss) = &state.boss {
            grid.stamp_boss(boss);
        }
        for b in &state.bullets {
            grid.stamp(b.x, b.y, b.glyph, CellKind::PlayerBullet);
        }
        for b in &state.enemy_bullets {
            grid.stamp(b.x, b.y, b.glyph, CellKind::EnemyBullet);
        }

        grid
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn glyph(&self, x: i32, y: i32) -> Option<char> {
        self.get(x, y).map(|c| c.glyph)
    }

    /// One row as plain text.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|c| c.glyph).collect()
    }

    fn row(&self, y: u16) -> &[Cell] {
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let in_x = (0..self.width as i32).contains(&x);
        let in_y = (0..self.height as i32).contains(&y);
        (in_x && in_y).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Off-grid stamps are dropped silently.
    fn stamp(&mut self, x: i32, y: i32, glyph: char, kind: CellKind) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { glyph, kind };
        }
    }

    // Top row:    [=========]
    // Other rows: |#########|
    fn stamp_boss(&mut self, boss: &Boss) {
        let last = boss.width - 1;
        for dy in 0..boss.height {
            for dx in 0..boss.width {
                let glyph = match (dy, dx) {
                    (0, 0) => '[',
                    (0, x) if x == last => ']',
                    (0, _) => '=',
                    (_, 0) => '|',
                    (_, x) if x == last => '|',
                    _ => '#',
                };
                self.stamp(boss.x + dx, boss.y + dy, glyph, CellKind::Boss);
            }
        }
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

/// `Life: 3 | Score: 0 | Stage: 1`, plus boss HP and the stage-clear banner
/// when they apply.
pub fn status_line(state: &Game) -> String {
    let mut line = format!(
        "Life: {} | Score: {} | Stage: {}",
        state.player.lives, state.score, state.stage
    );
    if let Some(boss) = &state.boss {
        line.push_str(&format!(" | Boss HP: {}/{}", boss.hp, boss.max_hp));
    }
    if state.stage_clear {
        line.push_str(" | STAGE CLEAR!");
    }
    line
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &Game) -> std::io::Result<()> {
    let grid = Grid::compose(state);
    let border: String = std::iter::repeat(BORDER_GLYPH)
        .take(grid.width() as usize)
        .collect();

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(Print(&border))?;
    out.queue(Print("\r\n"))?;

    for y in 0..grid.height() {
        draw_row(out, grid.row(y))?;
        out.queue(Print("\r\n"))?;
    }

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(Print(&border))?;
    out.queue(Print("\r\n"))?;

    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(status_line(state)))?;
    out.queue(Print("\r\n"))?;

    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(CONTROLS_HINT))?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

/// Print a row, switching colour only where the cell kind changes.
fn draw_row<W: Write>(out: &mut W, row: &[Cell]) -> std::io::Result<()> {
    let mut current: Option<CellKind> = None;
    let mut run = String::new();
    for cell in row {
        if current != Some(cell.kind) {
            if let Some(kind) = current {
                out.queue(style::SetForegroundColor(kind.color()))?;
                out.queue(Print(&run))?;
                run.clear();
            }
            current = Some(cell.kind);
        }
        run.push(cell.glyph);
    }
    if let Some(kind) = current {
        out.queue(style::SetForegroundColor(kind.color()))?;
        out.queue(Print(&run))?;
    }
    Ok(())
}

// ── Game-over summary ─────────────────────────────────────────────────────────

/// Final screen shown after the loop ends.
pub fn render_summary<W: Write>(out: &mut W, state: &Game) -> std::io::Result<()> {
    let rule = "=====================================";
    let score_line = format!("        Final Score: {}", state.score);
    let stage_line = format!("        Stage: {}", state.stage);
    let lines: [(&str, Color); 6] = [
        (rule, Color::Red),
        ("            GAME OVER", Color::Red),
        (rule, Color::Red),
        (score_line.as_str(), Color::Yellow),
        (stage_line.as_str(), Color::Yellow),
        (rule, Color::Red),
    ];

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;
    for (text, color) in lines {
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(text))?;
        out.queue(Print("\r\n"))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
