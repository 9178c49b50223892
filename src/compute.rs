//! Game-logic functions.
//!
//! `tick` advances the whole world by one step and `apply_intent` applies a
//! single decoded key press. Both mutate the `Game` in place; the loop
//! controller is their only caller, so there is never a second writer.
//! Nothing here is random: given the same tick count and the same intents the
//! world evolves identically.

use log::{debug, info};

use crate::entities::{
    Boss, Bullet, Enemy, Game, GameStatus, Player, BOSS_BULLET_GLYPH, ENEMY_BULLET_GLYPH,
};
use crate::input::Intent;

// ── Tuning ───────────────────────────────────────────────────────────────────

/// Ticks between enemy spawns.
pub const SPAWN_INTERVAL: u64 = 60;
pub const MAX_ENEMIES: usize = 10;
/// An enemy drops a row once its timer exceeds this.
pub const ENEMY_DESCENT_DELAY: u32 = 30;
/// Descending enemies only shoot on ticks that are multiples of this.
pub const ENEMY_FIRE_INTERVAL: u64 = 120;
/// A latched stage clear only advances the stage on multiples of this.
pub const STAGE_ADVANCE_INTERVAL: u64 = 120;

pub const BOSS_WIDTH: i32 = 11;
pub const BOSS_HEIGHT: i32 = 3;
pub const BOSS_HP: u32 = 20;
pub const BOSS_TOP: i32 = 3;
/// The boss fires once its attack timer exceeds this.
pub const BOSS_ATTACK_DELAY: u32 = 45;
pub const BOSS_BULLET_SPACING: usize = 2;

pub const ENEMY_SCORE: u32 = 100;
pub const BOSS_SCORE: u32 = 1000;
/// Score needed per stage before the boss shows up.
pub const STAGE_SCORE_STEP: u32 = 1000;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for the given grid dimensions.
pub fn init_state(width: u16, height: u16, lives: u32) -> Game {
    Game {
        player: Player::new((width / 2) as i32, height as i32 - 3, lives),
        enemies: Vec::new(),
        bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        boss: None,
        score: 0,
        stage: 1,
        status: GameStatus::Playing,
        stage_clear: false,
        frame: 0,
        width,
        height,
    }
}

// ── Input-driven state transitions ──────────────────────────────────────────

/// Apply one intent to the player. Moves that would leave the playfield are
/// ignored, and nothing happens once the game is over.
pub fn apply_intent(state: &mut Game, intent: Intent) {
    if state.is_over() {
        return;
    }

    let max_x = state.width as i32 - 2;
    let max_y = state.height as i32 - 2;
    let player = &mut state.player;

    match intent {
        Intent::Quit => {
            info!("quit requested at tick {}", state.frame);
            state.status = GameStatus::GameOver;
        }
        Intent::MoveLeft if player.x > 1 => player.x -= 1,
        Intent::MoveRight if player.x < max_x => player.x += 1,
        Intent::MoveUp if player.y > 1 => player.y -= 1,
        Intent::MoveDown if player.y < max_y => player.y += 1,
        Intent::Fire => {
            let shot = Bullet::player(player.x, player.y - 1);
            state.bullets.push(shot);
        }
        Intent::MoveLeft | Intent::MoveRight | Intent::MoveUp | Intent::MoveDown => {}
    }
}

// ── Per-tick step ────────────────────────────────────────────────────────────

/// Advance the simulation by one tick.
///
/// Phases run in a fixed order and each sees the state left by the previous
/// one. Once the game is over (including part-way through this tick) no
/// further phase runs.
pub fn tick(state: &mut Game) {
    if state.is_over() {
        return;
    }
    state.frame += 1;

    let (width, height) = (state.width as i32, state.height as i32);

    // ── 1. Bullets ───────────────────────────────────────────────────────────
    advance_bullets(&mut state.bullets, width, height);
    advance_bullets(&mut state.enemy_bullets, width, height);

    // ── 2. Spawn ─────────────────────────────────────────────────────────────
    spawn_enemy(state);

    // ── 3. Enemies descend and shoot ─────────────────────────────────────────
    advance_enemies(state);

    // ── 4-6. Collisions ──────────────────────────────────────────────────────
    resolve_player_hits(state);
    if resolve_enemy_bullet_hits(state) || resolve_enemy_contacts(state) {
        return;
    }

    // ── 7. Boss ──────────────────────────────────────────────────────────────
    if state.boss.is_some() {
        update_boss(state);
    } else if !state.stage_clear && stage_target_met(state) {
        spawn_boss(state);
    }

    // ── 8. Stage clear ───────────────────────────────────────────────────────
    check_stage_clear(state);
}

fn in_bounds(x: i32, y: i32, width: i32, height: i32) -> bool {
    (0..width).contains(&x) && (0..height).contains(&y)
}

/// Move every bullet by its velocity and drop the ones that left the grid.
/// Survivors keep their relative order.
fn advance_bullets(bullets: &mut Vec<Bullet>, width: i32, height: i32) {
    bullets.retain_mut(|b| {
        b.x += b.dx;
        b.y += b.dy;
        in_bounds(b.x, b.y, width, height)
    });
}

/// Column for an enemy spawned on `frame`: `1 + (frame % 20) * 2 % (width - 2)`.
///
/// Spawns only happen on multiples of `SPAWN_INTERVAL`, which are also
/// multiples of 20, so in play every enemy enters in column 1.
pub fn spawn_column(frame: u64, width: u16) -> i32 {
    let span = (width as u64).saturating_sub(2).max(1);
    (1 + (frame % 20) * 2 % span) as i32
}

fn spawn_enemy(state: &mut Game) {
    if state.boss.is_some()
        || state.frame % SPAWN_INTERVAL != 0
        || state.enemies.len() >= MAX_ENEMIES
    {
        return;
    }
    let x = spawn_column(state.frame, state.width);
    state.enemies.push(Enemy::new(x, 1));
}

fn advance_enemies(state: &mut Game) {
    let height = state.height as i32;
    let bottom = height - 1;
    let volley = state.frame % ENEMY_FIRE_INTERVAL == 0;
    let shots = &mut state.enemy_bullets;

    state.enemies.retain_mut(|e| {
        e.move_timer += 1;
        if e.move_timer > ENEMY_DESCENT_DELAY {
            e.move_timer = 0;
            e.y += 1;
            // No shot from the last row; it would start below the grid.
            if volley && e.y + 1 < height {
                shots.push(Bullet::hostile(e.x, e.y + 1, ENEMY_BULLET_GLYPH));
            }
        }
        // Escaped enemies score nothing.
        e.y < bottom
    });
}

/// Each player bullet kills at most one enemy. Both lists are scanned from
/// the back, so removals never shift an index still to be visited.
fn resolve_player_hits(state: &mut Game) {
    let mut i = state.bullets.len();
    while i > 0 {
        i -= 1;
        let (bx, by) = (state.bullets[i].x, state.bullets[i].y);
        if let Some(j) = state.enemies.iter().rposition(|e| e.x == bx && e.y == by) {
            state.enemies.remove(j);
            state.bullets.remove(i);
            state.score += ENEMY_SCORE;
        }
    }
}

/// Returns `true` when the player just ran out of lives.
fn lose_life(state: &mut Game) -> bool {
    state.player.lives = state.player.lives.saturating_sub(1);
    debug!("player hit, {} lives left", state.player.lives);
    if state.player.lives == 0 {
        info!("game over at tick {} with score {}", state.frame, state.score);
        state.status = GameStatus::GameOver;
        return true;
    }
    false
}

/// Enemy bullets on the player's cell are consumed and cost a life each.
fn resolve_enemy_bullet_hits(state: &mut Game) -> bool {
    let (px, py) = (state.player.x, state.player.y);
    let mut i = state.enemy_bullets.len();
    while i > 0 {
        i -= 1;
        let b = &state.enemy_bullets[i];
        if b.x == px && b.y == py {
            state.enemy_bullets.remove(i);
            if lose_life(state) {
                return true;
            }
        }
    }
    false
}

/// Enemies on the player's cell cost a life each but stay on the board.
fn resolve_enemy_contacts(state: &mut Game) -> bool {
    let (px, py) = (state.player.x, state.player.y);
    let contacts = state
        .enemies
        .iter()
        .filter(|e| e.x == px && e.y == py)
        .count();
    for _ in 0..contacts {
        if lose_life(state) {
            return true;
        }
    }
    false
}

fn stage_target_met(state: &Game) -> bool {
    state.score >= STAGE_SCORE_STEP * state.stage && state.enemies.is_empty()
}

fn spawn_boss(state: &mut Game) {
    let x = state.width as i32 / 2 - BOSS_WIDTH / 2;
    state.boss = Some(Boss::new(x, BOSS_TOP, BOSS_WIDTH, BOSS_HEIGHT, BOSS_HP));
    info!("stage {} boss spawned at tick {}", state.stage, state.frame);
}

fn boss_covers(boss: &Boss, bullet: &Bullet) -> bool {
    (boss.x..boss.x + boss.width).contains(&bullet.x)
        && (boss.y..boss.y + boss.height).contains(&bullet.y)
}

fn update_boss(state: &mut Game) {
    let width = state.width as i32;
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    // Patrol.
    boss.x += boss.direction;
    if boss.x <= 1 || boss.x + boss.width >= width - 1 {
        boss.direction = -boss.direction;
    }

    // Spread attack.
    boss.attack_timer += 1;
    if boss.attack_timer > BOSS_ATTACK_DELAY {
        boss.attack_timer = 0;
        let row = boss.y + boss.height;
        for dx in (0..boss.width).step_by(BOSS_BULLET_SPACING) {
            state
                .enemy_bullets
                .push(Bullet::hostile(boss.x + dx, row, BOSS_BULLET_GLYPH));
        }
    }

    // Hits. Bullets left over after the killing blow stay in flight.
    let mut i = state.bullets.len();
    while i > 0 && boss.hp > 0 {
        i -= 1;
        if boss_covers(boss, &state.bullets[i]) {
            state.bullets.remove(i);
            boss.hp = boss.hp.saturating_sub(1);
        }
    }

    if boss.hp == 0 {
        state.boss = None;
        state.score += BOSS_SCORE;
        info!("stage {} boss defeated at tick {}", state.stage, state.frame);
    }
}

/// Latch the stage clear once the boss is gone and the score target holds,
/// then advance the stage on the next tick aligned to
/// `STAGE_ADVANCE_INTERVAL`.
fn check_stage_clear(state: &mut Game) {
    if !state.stage_clear && state.boss.is_none() && stage_target_met(state) {
        debug!("stage {} cleared at tick {}", state.stage, state.frame);
        state.stage_clear = true;
    }
    if state.stage_clear && state.frame % STAGE_ADVANCE_INTERVAL == 0 {
        state.stage += 1;
        state.stage_clear = false;
        info!("advancing to stage {} at tick {}", state.stage, state.frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_column_on_spawn_ticks_is_always_one() {
        for n in 0..25 {
            assert_eq!(spawn_column(n * SPAWN_INTERVAL, 60), 1);
            assert_eq!(spawn_column(n * SPAWN_INTERVAL, 16), 1);
        }
    }

    #[test]
    fn spawn_column_follows_the_raw_tick() {
        assert_eq!(spawn_column(1, 60), 3);
        assert_eq!(spawn_column(19, 60), 39);
        assert_eq!(spawn_column(21, 60), 3);
        // span = 14, (13 * 2) % 14 = 12
        assert_eq!(spawn_column(13, 16), 13);
        assert_eq!(spawn_column(7, 16), 1);
    }

    #[test]
    fn in_bounds_excludes_edges_past_grid() {
        assert!(in_bounds(0, 0, 10, 10));
        assert!(in_bounds(9, 9, 10, 10));
        assert!(!in_bounds(-1, 5, 10, 10));
        assert!(!in_bounds(5, 10, 10, 10));
    }

    #[test]
    fn boss_covers_is_half_open() {
        let boss = Boss::new(10, 3, 11, 3, 20);
        assert!(boss_covers(&boss, &Bullet::player(10, 3)));
        assert!(boss_covers(&boss, &Bullet::player(20, 5)));
        assert!(!boss_covers(&boss, &Bullet::player(21, 4)));
        assert!(!boss_covers(&boss, &Bullet::player(15, 6)));
    }
}
