/// Collision resolution: four brute-force passes, run once per frame in a
/// fixed order.  Passes only apply damage and pickups; deaths are settled by
/// the enemy update on the following frame.

use glam::Vec2;
use log::debug;

use crate::compute::{apply_upgrade, notify};
use crate::entities::{
    BulletOwner, Enemy, EnemyKind, GameState, Player, SoundCue, Upgrade, UpgradeKind,
    BULLET_RADIUS, PLAYER_HEIGHT, PLAYER_WIDTH, UPGRADE_SIZE,
};

/// Axis-aligned rectangle, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Circle test against the closest point of the rectangle.
    pub fn touches_circle(&self, center: Vec2, radius: f32) -> bool {
        let min = Vec2::new(self.x, self.y);
        let max = Vec2::new(self.x + self.w, self.y + self.h);
        let closest = center.clamp(min, max);
        closest.distance_squared(center) <= radius * radius
    }
}

pub fn player_hitbox(player: &Player) -> Hitbox {
    Hitbox::new(player.pos.x, player.pos.y, PLAYER_WIDTH, PLAYER_HEIGHT)
}

pub fn enemy_hitbox(enemy: &Enemy) -> Hitbox {
    let size = enemy.size();
    Hitbox::new(enemy.pos.x, enemy.pos.y, size, size)
}

pub fn upgrade_hitbox(upgrade: &Upgrade) -> Hitbox {
    Hitbox::new(upgrade.pos.x, upgrade.pos.y, UPGRADE_SIZE, UPGRADE_SIZE)
}

/// Damage an enemy deals for each frame its body overlaps the player.
pub fn contact_damage(kind: EnemyKind) -> i32 {
    match kind {
        EnemyKind::Boss => 2,
        _ => 1,
    }
}

pub fn upgrade_message(kind: UpgradeKind) -> &'static str {
    match kind {
        UpgradeKind::Health => "MAX HEALTH +1",
        UpgradeKind::FireRate => "FIRE RATE UP!",
        UpgradeKind::AttackRange => "ATTACK RANGE +",
    }
}

pub fn resolve_collisions(state: &mut GameState) {
    player_bullets_vs_enemies(state);
    enemies_vs_player(state);
    enemy_bullets_vs_player(state);
    upgrades_vs_player(state);
}

/// Each player bullet damages the first enemy it touches, in collection
/// order, and is spent.
pub fn player_bullets_vs_enemies(state: &mut GameState) {
    let enemies = &mut state.enemies;
    let cues = &mut state.cues;
    state.bullets.retain(|bullet| {
        if bullet.owner != BulletOwner::Player {
            return true;
        }
        let target = enemies
            .iter_mut()
            .find(|e| enemy_hitbox(e).touches_circle(bullet.pos, BULLET_RADIUS));
        match target {
            Some(enemy) => {
                enemy.health -= bullet.damage;
                cues.push(SoundCue::Explosion);
                false
            }
            None => true,
        }
    });
}

/// Body contact hurts the player on every frame of overlap.
pub fn enemies_vs_player(state: &mut GameState) {
    let hitbox = player_hitbox(&state.player);
    for enemy in &state.enemies {
        if hitbox.overlaps(&enemy_hitbox(enemy)) {
            state.player.health -= contact_damage(enemy.kind);
            state.cues.push(SoundCue::Explosion);
        }
    }
}

pub fn enemy_bullets_vs_player(state: &mut GameState) {
    let hitbox = player_hitbox(&state.player);
    let player = &mut state.player;
    let cues = &mut state.cues;
    state.bullets.retain(|bullet| {
        if bullet.owner != BulletOwner::Enemy || !hitbox.touches_circle(bullet.pos, BULLET_RADIUS)
        {
            return true;
        }
        player.health -= bullet.damage;
        cues.push(SoundCue::Explosion);
        false
    });
}

pub fn upgrades_vs_player(state: &mut GameState) {
    let hitbox = player_hitbox(&state.player);
    let upgrades = std::mem::take(&mut state.upgrades);
    for upgrade in upgrades {
        if upgrade.is_live() && hitbox.overlaps(&upgrade_hitbox(&upgrade)) {
            apply_upgrade(&mut state.player, upgrade.kind);
            notify(state, upgrade_message(upgrade.kind));
            state.cues.push(SoundCue::Upgrade);
            debug!("picked up {:?}", upgrade.kind);
            continue;
        }
        state.upgrades.push(upgrade);
    }
}
