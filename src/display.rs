//! Rendering layer.
//!
//! The scene is drawn in world units through the `Canvas` trait; no game
//! logic is performed here.  `TerminalCanvas` is the crossterm-backed
//! canvas that scales the world onto terminal cells.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;

use crate::compute::max_health;
use crate::entities::{
    Bullet, BulletOwner, Enemy, EnemyKind, GameState, GameStatus, Upgrade, UpgradeKind,
    BULLET_RADIUS, PLAYER_HEIGHT, PLAYER_WIDTH, UPGRADE_SIZE,
};
use crate::spawner::seconds_until_boss;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::Black;
const C_PLAYER: Color = Color::Rgb { r: 0, g: 121, b: 241 };
const C_ENEMY_SIMPLE: Color = Color::Red;
const C_ENEMY_MID: Color = Color::Green;
const C_ENEMY_HARD: Color = Color::Rgb { r: 200, g: 122, b: 255 };
const C_ENEMY_BOSS: Color = Color::Rgb { r: 255, g: 161, b: 0 };
const C_BOSS_BAR: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Yellow;
const C_BULLET_ENEMY: Color = Color::Red;
const C_UPGRADE_HEALTH: Color = Color::Green;
const C_UPGRADE_FIRE_RATE: Color = Color::Rgb { r: 0, g: 121, b: 241 };
const C_UPGRADE_RANGE: Color = Color::Yellow;
const C_UPGRADE_OUTLINE: Color = Color::White;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_TEXT: Color = Color::White;
const C_NOTIFICATION: Color = Color::Green;

// ── Render adapter ────────────────────────────────────────────────────────────

/// Drawing surface measured in world units.
pub trait Canvas {
    /// Width and height of the visible world.
    fn viewport(&self) -> (f32, f32);
    fn begin_frame(&mut self) -> io::Result<()>;
    fn clear(&mut self, color: Color) -> io::Result<()>;
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> io::Result<()>;
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> io::Result<()>;
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> io::Result<()>;
    fn text(&mut self, text: &str, x: f32, y: f32, size: u16, color: Color) -> io::Result<()>;
    /// Width `text` would occupy at `size`, in world units.
    fn measure_text(&self, text: &str, size: u16) -> f32;
    fn end_frame(&mut self) -> io::Result<()>;
}

/// Terminal canvas: each cell covers `world / grid` units, shapes snap to
/// whole cells and text size is ignored.
pub struct TerminalCanvas<W: Write> {
    out: W,
    world_w: f32,
    world_h: f32,
    cols: u16,
    rows: u16,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, world_w: f32, world_h: f32, cols: u16, rows: u16) -> Self {
        Self {
            out,
            world_w,
            world_h,
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn col(&self, x: f32) -> i32 {
        (x / self.world_w * self.cols as f32).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        (y / self.world_h * self.rows as f32).floor() as i32
    }

    /// Cell span `[start, end)` covered by `pos..pos+len`, at least one
    /// cell wide.
    fn span(start: i32, end_exact: f32) -> (i32, i32) {
        let end = (end_exact.ceil() as i32).max(start + 1);
        (start, end)
    }

    fn put(&mut self, col: i32, row: i32, s: &str) -> io::Result<()> {
        if row < 0 || row >= self.rows as i32 || col >= self.cols as i32 {
            return Ok(());
        }
        let skip = (-col).max(0) as usize;
        let room = (self.cols as i32 - col.max(0)) as usize;
        let visible: String = s.chars().skip(skip).take(room).collect();
        if visible.is_empty() {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(col.max(0) as u16, row as u16))?;
        self.out.queue(Print(visible))?;
        Ok(())
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn viewport(&self) -> (f32, f32) {
        (self.world_w, self.world_h)
    }

    fn begin_frame(&mut self) -> io::Result<()> {
        self.out.queue(cursor::Hide)?;
        Ok(())
    }

    fn clear(&mut self, color: Color) -> io::Result<()> {
        self.out.queue(style::SetBackgroundColor(color))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> io::Result<()> {
        let (c0, c1) = Self::span(self.col(x), (x + w) / self.world_w * self.cols as f32);
        let (r0, r1) = Self::span(self.row(y), (y + h) / self.world_h * self.rows as f32);
        let line = "█".repeat((c1 - c0) as usize);
        self.out.queue(style::SetForegroundColor(color))?;
        for row in r0..r1 {
            self.put(c0, row, &line)?;
        }
        Ok(())
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) -> io::Result<()> {
        let (c0, c1) = Self::span(self.col(x), (x + w) / self.world_w * self.cols as f32);
        let (r0, r1) = Self::span(self.row(y), (y + h) / self.world_h * self.rows as f32);
        let inner = (c1 - c0 - 2).max(0) as usize;
        self.out.queue(style::SetForegroundColor(color))?;
        if r1 - r0 == 1 {
            return self.put(c0, r0, &"─".repeat((c1 - c0) as usize));
        }
        self.put(c0, r0, &format!("┌{}┐", "─".repeat(inner)))?;
        for row in r0 + 1..r1 - 1 {
            self.put(c0, row, "│")?;
            self.put(c1 - 1, row, "│")?;
        }
        self.put(c0, r1 - 1, &format!("└{}┘", "─".repeat(inner)))
    }

    fn fill_circle(&mut self, center: Vec2, _radius: f32, color: Color) -> io::Result<()> {
        let (col, row) = (self.col(center.x), self.row(center.y));
        self.out.queue(style::SetForegroundColor(color))?;
        self.put(col, row, "●")
    }

    fn text(&mut self, text: &str, x: f32, y: f32, _size: u16, color: Color) -> io::Result<()> {
        let (col, row) = (self.col(x), self.row(y));
        self.out.queue(style::SetForegroundColor(color))?;
        self.put(col, row, text)
    }

    fn measure_text(&self, text: &str, _size: u16) -> f32 {
        text.chars().count() as f32 * self.world_w / self.cols as f32
    }

    fn end_frame(&mut self) -> io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render(canvas: &mut impl Canvas, state: &GameState) -> io::Result<()> {
    canvas.begin_frame()?;
    canvas.clear(C_BACKGROUND)?;

    match state.status {
        GameStatus::Playing => {
            for enemy in &state.enemies {
                draw_enemy(canvas, enemy)?;
            }
            for bullet in &state.bullets {
                draw_bullet(canvas, bullet)?;
            }
            for upgrade in state.upgrades.iter().filter(|u| u.active) {
                draw_upgrade(canvas, upgrade)?;
            }
            let p = &state.player;
            canvas.fill_rect(p.pos.x, p.pos.y, PLAYER_WIDTH, PLAYER_HEIGHT, C_PLAYER)?;

            draw_hud(canvas, state)?;
            draw_notifications(canvas, state)?;
        }
        GameStatus::GameOver => draw_game_over(canvas, state)?,
    }

    canvas.end_frame()
}

pub fn difficulty_label(bosses_defeated: u32) -> &'static str {
    match bosses_defeated {
        0 => "Easy",
        1 => "Medium",
        _ => "Hard",
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Simple => C_ENEMY_SIMPLE,
        EnemyKind::Mid => C_ENEMY_MID,
        EnemyKind::Hard => C_ENEMY_HARD,
        EnemyKind::Boss => C_ENEMY_BOSS,
    }
}

/// Bosses carry a bar above the sprite that shrinks with their health.
fn draw_enemy(canvas: &mut impl Canvas, enemy: &Enemy) -> io::Result<()> {
    let size = enemy.size();
    canvas.fill_rect(enemy.pos.x, enemy.pos.y, size, size, enemy_color(enemy.kind))?;
    if enemy.kind == EnemyKind::Boss {
        let fraction = enemy.health.max(0) as f32 / max_health(EnemyKind::Boss) as f32;
        canvas.fill_rect(enemy.pos.x, enemy.pos.y - 20.0, size * fraction, 10.0, C_BOSS_BAR)?;
    }
    Ok(())
}

fn draw_bullet(canvas: &mut impl Canvas, bullet: &Bullet) -> io::Result<()> {
    let color = match bullet.owner {
        BulletOwner::Player => C_BULLET_PLAYER,
        BulletOwner::Enemy => C_BULLET_ENEMY,
    };
    canvas.fill_circle(bullet.pos, BULLET_RADIUS, color)
}

fn draw_upgrade(canvas: &mut impl Canvas, upgrade: &Upgrade) -> io::Result<()> {
    let color = match upgrade.kind {
        UpgradeKind::Health => C_UPGRADE_HEALTH,
        UpgradeKind::FireRate => C_UPGRADE_FIRE_RATE,
        UpgradeKind::AttackRange => C_UPGRADE_RANGE,
    };
    let (x, y) = (upgrade.pos.x, upgrade.pos.y);
    canvas.fill_rect(x, y, UPGRADE_SIZE, UPGRADE_SIZE, color)?;
    canvas.stroke_rect(x, y, UPGRADE_SIZE, UPGRADE_SIZE, C_UPGRADE_OUTLINE)
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud(canvas: &mut impl Canvas, state: &GameState) -> io::Result<()> {
    for i in 0..state.player.health.max(0) {
        canvas.fill_rect(10.0 + i as f32 * 30.0, 10.0, 20.0, 20.0, C_HUD_HEALTH)?;
    }

    canvas.text(&format!("Score: {}", state.score), 10.0, 40.0, 20, C_HUD_TEXT)?;
    let difficulty = difficulty_label(state.bosses_defeated);
    canvas.text(&format!("Difficulty: {difficulty}"), 10.0, 70.0, 20, C_HUD_TEXT)?;

    if !state.boss_active {
        let left = seconds_until_boss(state);
        canvas.text(&format!("Next boss: {left}"), 10.0, 100.0, 20, C_HUD_TEXT)?;
    }
    Ok(())
}

fn draw_notifications(canvas: &mut impl Canvas, state: &GameState) -> io::Result<()> {
    let mut y = 130.0;
    for note in &state.notifications {
        canvas.text(&note.text, 10.0, y, 20, C_NOTIFICATION)?;
        y += 25.0;
    }
    Ok(())
}

// ── Game-over screen ──────────────────────────────────────────────────────────

fn centered(
    canvas: &mut impl Canvas,
    text: &str,
    y: f32,
    size: u16,
    color: Color,
) -> io::Result<()> {
    let (width, _) = canvas.viewport();
    let x = width / 2.0 - canvas.measure_text(text, size) / 2.0;
    canvas.text(text, x, y, size, color)
}

fn draw_game_over(canvas: &mut impl Canvas, state: &GameState) -> io::Result<()> {
    let (_, height) = canvas.viewport();
    let mid = height / 2.0;
    centered(canvas, "GAME OVER", mid - 100.0, 60, Color::Red)?;
    centered(canvas, &format!("YOUR SCORE: {}", state.score), mid, 30, Color::White)?;
    centered(canvas, "Press ENTER to restart", mid + 60.0, 20, Color::Green)
}
