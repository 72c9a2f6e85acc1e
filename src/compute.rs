/// Game-logic functions.
///
/// `tick` and `restart` take an immutable reference to the current
/// `GameState` and return a brand-new one.  The smaller steps they are built
/// from work in place on that working copy and are public so each stage can
/// be exercised on its own.  Randomness comes only through the injected
/// `Dice`.

use glam::Vec2;
use log::info;

use crate::collision::resolve_collisions;
use crate::dice::Dice;
use crate::entities::{
    Bullet, BulletOwner, Enemy, EnemyKind, GameState, GameStatus, Notification, Player,
    SoundCue, Upgrade, UpgradeKind, PLAYER_WIDTH,
};
use crate::spawner::{spawn_boss, spawn_enemies, spawn_upgrade, DROP_CHANCE_PERCENT};

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const PLAYER_SPEED: f32 = 300.0;
pub const PLAYER_MAX_HEALTH: i32 = 3;
pub const PLAYER_FIRE_RATE: f32 = 0.5;
pub const PLAYER_ATTACK_RANGE: f32 = 50.0;
/// Distance from the bottom of the viewport to the player's top edge.
pub const PLAYER_BOTTOM_OFFSET: f32 = 50.0;
pub const MIN_FIRE_RATE: f32 = 0.1;
pub const FIRE_RATE_STEP: f32 = 0.1;
pub const ATTACK_RANGE_STEP: f32 = 10.0;

pub const PLAYER_BULLET_SPEED: f32 = -500.0;
pub const ENEMY_BULLET_SPEED: f32 = 300.0;

pub const ENEMY_SHOOT_INTERVAL: f32 = 2.0;
pub const BOSS_SHOOT_INTERVAL: f32 = 0.5;
pub const BOSS_TURN_INTERVAL: f32 = 1.5;
pub const BOSS_SPREAD: usize = 3;
pub const BOSS_JITTER: i32 = 20;
pub const BOSS_BULLET_DAMAGE: i32 = 2;

pub const UPGRADE_FALL_SPEED: f32 = 100.0;
pub const UPGRADE_LIFETIME: f32 = 5.0;
pub const NOTIFICATION_TIME: f32 = 2.0;

// ── Stat tables ───────────────────────────────────────────────────────────────

pub fn max_health(kind: EnemyKind) -> i32 {
    match kind {
        EnemyKind::Simple => 1,
        EnemyKind::Mid => 1,
        EnemyKind::Hard => 2,
        EnemyKind::Boss => 7,
    }
}

pub fn speed_for(kind: EnemyKind) -> f32 {
    match kind {
        EnemyKind::Simple => 50.0,
        EnemyKind::Mid => 70.0,
        EnemyKind::Hard => 90.0,
        EnemyKind::Boss => 40.0,
    }
}

/// Score awarded per enemy destroyed.
pub fn score_for(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Simple => 10,
        EnemyKind::Mid => 25,
        EnemyKind::Hard => 50,
        EnemyKind::Boss => 500,
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

pub fn new_player(width: f32, height: f32) -> Player {
    Player {
        pos: Vec2::new(width / 2.0, height - PLAYER_BOTTOM_OFFSET),
        health: PLAYER_MAX_HEALTH,
        max_health: PLAYER_MAX_HEALTH,
        fire_cooldown: 0.0,
        fire_rate: PLAYER_FIRE_RATE,
        attack_range: PLAYER_ATTACK_RANGE,
    }
}

pub fn new_enemy(kind: EnemyKind, pos: Vec2) -> Enemy {
    Enemy {
        pos,
        kind,
        health: max_health(kind),
        speed: speed_for(kind),
        shoot_timer: 0.0,
        direction: Vec2::Y,
        direction_timer: 0.0,
    }
}

pub fn player_bullet(pos: Vec2) -> Bullet {
    Bullet {
        pos,
        velocity: PLAYER_BULLET_SPEED,
        damage: 1,
        owner: BulletOwner::Player,
    }
}

pub fn enemy_bullet(pos: Vec2, damage: i32) -> Bullet {
    Bullet {
        pos,
        velocity: ENEMY_BULLET_SPEED,
        damage,
        owner: BulletOwner::Enemy,
    }
}

pub fn new_upgrade(kind: UpgradeKind, pos: Vec2) -> Upgrade {
    Upgrade {
        pos,
        kind,
        timer: UPGRADE_LIFETIME,
        active: true,
    }
}

/// Build the initial game state for a viewport of the given size.
pub fn init_state(width: f32, height: f32) -> GameState {
    GameState {
        player: new_player(width, height),
        enemies: Vec::new(),
        bullets: Vec::new(),
        upgrades: Vec::new(),
        notifications: Vec::new(),
        cues: Vec::new(),
        score: 0,
        enemy_spawn_timer: 0.0,
        boss_spawn_timer: 0.0,
        bosses_defeated: 0,
        boss_active: false,
        status: GameStatus::Playing,
        frame: 0,
        width,
        height,
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Directional keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
}

/// Move the player under input, clamp to the viewport, and fire once the
/// cooldown runs out.
pub fn update_player(state: &mut GameState, input: &FrameInput, dt: f32) {
    let player = &mut state.player;
    if input.left {
        player.pos.x -= PLAYER_SPEED * dt;
    }
    if input.right {
        player.pos.x += PLAYER_SPEED * dt;
    }
    player.pos.x = player.pos.x.clamp(0.0, (state.width - PLAYER_WIDTH).max(0.0));

    player.fire_cooldown -= dt;
    if player.fire_cooldown <= 0.0 {
        player.fire_cooldown = player.fire_rate;
        let muzzle = Vec2::new(player.pos.x + PLAYER_WIDTH / 2.0, player.pos.y);
        state.bullets.push(player_bullet(muzzle));
        state.cues.push(SoundCue::Laser);
    }
}

pub fn apply_upgrade(player: &mut Player, kind: UpgradeKind) {
    match kind {
        UpgradeKind::Health => {
            player.max_health += 1;
            player.health += 1;
        }
        UpgradeKind::FireRate => {
            player.fire_rate = (player.fire_rate - FIRE_RATE_STEP).max(MIN_FIRE_RATE);
        }
        UpgradeKind::AttackRange => {
            player.attack_range += ATTACK_RANGE_STEP;
        }
    }
}

/// Back to the start position with full health and a ready gun.  Upgrades
/// collected so far (max health, fire rate, range) are kept.
pub fn reset_player(player: &mut Player, width: f32, height: f32) {
    let fresh = new_player(width, height);
    player.pos = fresh.pos;
    player.health = player.max_health;
    player.fire_cooldown = 0.0;
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Advance one enemy and let it shoot.  Returns `true` if it fired.
pub fn update_enemy(
    enemy: &mut Enemy,
    bullets: &mut Vec<Bullet>,
    width: f32,
    dt: f32,
    dice: &mut impl Dice,
) -> bool {
    let size = enemy.size();
    if enemy.kind == EnemyKind::Boss {
        enemy.direction_timer += dt;
        if enemy.direction_timer >= BOSS_TURN_INTERVAL {
            enemy.direction_timer = 0.0;
            enemy.direction = Vec2::new(
                dice.roll(-10, 10) as f32 / 10.0,
                dice.roll(5, 10) as f32 / 10.0,
            );
        }

        enemy.pos += enemy.direction * enemy.speed * dt;
        enemy.pos.x = enemy.pos.x.clamp(0.0, (width - size).max(0.0));

        enemy.shoot_timer += dt;
        if enemy.shoot_timer >= BOSS_SHOOT_INTERVAL {
            enemy.shoot_timer = 0.0;
            for _ in 0..BOSS_SPREAD {
                let jitter = dice.roll(-BOSS_JITTER, BOSS_JITTER) as f32;
                let muzzle = Vec2::new(enemy.pos.x + size / 2.0 + jitter, enemy.pos.y + size);
                bullets.push(enemy_bullet(muzzle, BOSS_BULLET_DAMAGE));
            }
            return true;
        }
    } else {
        enemy.pos.y += enemy.speed * dt;

        enemy.shoot_timer += dt;
        if enemy.shoot_timer >= ENEMY_SHOOT_INTERVAL {
            enemy.shoot_timer = 0.0;
            let muzzle = Vec2::new(enemy.pos.x + size / 2.0, enemy.pos.y + size);
            bullets.push(enemy_bullet(muzzle, 1));
            return true;
        }
    }
    false
}

/// Move every enemy, then settle the dead: score, drops and boss
/// bookkeeping happen here rather than in the collision passes.  Regular
/// enemies that have sunk below the viewport are dropped without reward.
pub fn update_enemies(state: &mut GameState, dt: f32, dice: &mut impl Dice) {
    for enemy in state.enemies.iter_mut() {
        update_enemy(enemy, &mut state.bullets, state.width, dt, dice);
    }

    let enemies = std::mem::take(&mut state.enemies);
    for enemy in enemies {
        if enemy.is_dead() {
            state.score += score_for(enemy.kind);
            if enemy.kind == EnemyKind::Boss {
                state.bosses_defeated += 1;
                state.boss_active = false;
                spawn_upgrade(state, enemy.pos, dice);
                notify(state, "BOSS DEFEATED!");
                info!(
                    "boss defeated (total {}), score {}",
                    state.bosses_defeated, state.score
                );
            } else if dice.roll(0, 100) < DROP_CHANCE_PERCENT {
                spawn_upgrade(state, enemy.pos, dice);
            }
            continue;
        }
        if enemy.kind != EnemyKind::Boss && enemy.pos.y > state.height {
            continue;
        }
        state.enemies.push(enemy);
    }
}

// ── Bullets, upgrades, notifications ──────────────────────────────────────────

/// Move bullets and discard those outside `[0, height]`.
pub fn update_bullets(state: &mut GameState, dt: f32) {
    let height = state.height;
    for bullet in state.bullets.iter_mut() {
        bullet.pos.y += bullet.velocity * dt;
    }
    state
        .bullets
        .retain(|b| b.pos.y >= 0.0 && b.pos.y <= height);
}

pub fn update_upgrades(state: &mut GameState, dt: f32) {
    for upgrade in state.upgrades.iter_mut().filter(|u| u.active) {
        upgrade.pos.y += UPGRADE_FALL_SPEED * dt;
        upgrade.timer -= dt;
    }
    state.upgrades.retain(Upgrade::is_live);
}

pub fn notify(state: &mut GameState, text: &str) {
    state.notifications.push(Notification {
        text: text.to_string(),
        remaining: NOTIFICATION_TIME,
    });
}

pub fn update_notifications(state: &mut GameState, dt: f32) {
    for note in state.notifications.iter_mut() {
        note.remaining -= dt;
    }
    state.notifications.retain(|n| n.remaining > 0.0);
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the simulation by `dt` seconds.  Outside `Playing` the state is
/// returned unchanged.
pub fn tick(state: &GameState, input: &FrameInput, dt: f32, dice: &mut impl Dice) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let mut next = state.clone();
    next.frame += 1;
    next.cues.clear();

    update_player(&mut next, input, dt);
    if next.player.is_dead() {
        next.status = GameStatus::GameOver;
        info!("game over at frame {} with score {}", next.frame, next.score);
        return next;
    }

    spawn_enemies(&mut next, dt, dice);
    spawn_boss(&mut next, dt);

    update_bullets(&mut next, dt);
    update_enemies(&mut next, dt, dice);
    update_upgrades(&mut next, dt);
    update_notifications(&mut next, dt);

    resolve_collisions(&mut next);
    next
}

/// Start a fresh run: empty collections, zero score and timers, player back
/// at the start.  The caller restarts the music.
pub fn restart(state: &GameState) -> GameState {
    let mut player = state.player.clone();
    reset_player(&mut player, state.width, state.height);
    info!("restarting after final score {}", state.score);
    GameState {
        player,
        ..init_state(state.width, state.height)
    }
}
