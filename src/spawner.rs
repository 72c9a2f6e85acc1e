/// Timer-driven creation of enemy waves, bosses and upgrade drops.

use glam::Vec2;
use log::{debug, info};

use crate::compute::{new_enemy, new_upgrade, notify};
use crate::dice::Dice;
use crate::entities::{EnemyKind, GameState, UpgradeKind, BOSS_SIZE, ENEMY_SIZE};

pub const WAVE_INTERVAL: f32 = 2.0;
pub const MIN_WAVE_SIZE: i32 = 1;
pub const MAX_WAVE_SIZE: i32 = 4;
pub const BOSS_INTERVAL: f32 = 60.0;
/// Percent chance (rolled on `0..=100`) that a regular enemy drops an upgrade.
pub const DROP_CHANCE_PERCENT: i32 = 20;

/// Enemy kind for the next wave, keyed on bosses defeated so far.
pub fn difficulty_tier(bosses_defeated: u32) -> EnemyKind {
    match bosses_defeated {
        0 => EnemyKind::Simple,
        1 => EnemyKind::Mid,
        _ => EnemyKind::Hard,
    }
}

/// Every `WAVE_INTERVAL` seconds, drop 1–4 enemies of the current tier just
/// above the viewport at random columns.
pub fn spawn_enemies(state: &mut GameState, dt: f32, dice: &mut impl Dice) {
    state.enemy_spawn_timer += dt;
    if state.enemy_spawn_timer < WAVE_INTERVAL {
        return;
    }
    state.enemy_spawn_timer = 0.0;

    let count = dice.roll(MIN_WAVE_SIZE, MAX_WAVE_SIZE);
    let kind = difficulty_tier(state.bosses_defeated);
    let max_x = (state.width - ENEMY_SIZE).max(0.0) as i32;
    for _ in 0..count {
        let x = dice.roll(0, max_x) as f32;
        state.enemies.push(new_enemy(kind, Vec2::new(x, -ENEMY_SIZE)));
    }
    debug!("wave of {count} {kind:?} at frame {}", state.frame);
}

/// The boss clock only runs while no boss is on the field.
pub fn spawn_boss(state: &mut GameState, dt: f32) {
    if state.boss_active {
        return;
    }

    state.boss_spawn_timer += dt;
    if state.boss_spawn_timer >= BOSS_INTERVAL {
        state.boss_spawn_timer = 0.0;
        state.boss_active = true;
        let pos = Vec2::new(state.width / 2.0 - BOSS_SIZE / 2.0, -BOSS_SIZE);
        state.enemies.push(new_enemy(EnemyKind::Boss, pos));
        notify(state, "BOSS INCOMING!");
        info!("boss spawned at frame {}", state.frame);
    }
}

pub fn random_upgrade_kind(dice: &mut impl Dice) -> UpgradeKind {
    match dice.roll(0, 2) {
        0 => UpgradeKind::Health,
        1 => UpgradeKind::FireRate,
        _ => UpgradeKind::AttackRange,
    }
}

pub fn spawn_upgrade(state: &mut GameState, pos: Vec2, dice: &mut impl Dice) {
    let kind = random_upgrade_kind(dice);
    state.upgrades.push(new_upgrade(kind, pos));
}

/// Seconds until the next boss, rounded the way the HUD shows it.
pub fn seconds_until_boss(state: &GameState) -> i32 {
    BOSS_INTERVAL as i32 - state.boss_spawn_timer as i32
}
