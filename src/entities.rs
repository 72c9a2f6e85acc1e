/// All game entity types — pure data, no logic.
///
/// Positions are in world units: the viewport spans `0..width` by
/// `0..height` with y growing downwards, and every position is the top-left
/// corner of the entity's hitbox except bullets, which are circle centres.

use glam::Vec2;

// ── Fixed sizes ───────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 20.0;
pub const ENEMY_SIZE: f32 = 40.0;
pub const BOSS_SIZE: f32 = 120.0;
pub const BULLET_RADIUS: f32 = 5.0;
pub const UPGRADE_SIZE: f32 = 30.0;

// ── Enumerations ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Simple,
    Mid,
    Hard,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    /// +1 max health and +1 current health.
    Health,
    /// Fire interval shortened by 0.1 s, never below 0.1 s.
    FireRate,
    /// +10 attack range. Stored only; nothing reads it yet.
    AttackRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// Sound requested by the simulation during a tick; the game loop hands
/// these to the audio system after the update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Laser,
    Explosion,
    Upgrade,
}

// ── Projectiles & pickups ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    /// Circle centre.
    pub pos: Vec2,
    /// Signed vertical speed: negative travels up.
    pub velocity: f32,
    pub damage: i32,
    pub owner: BulletOwner,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub pos: Vec2,
    pub kind: UpgradeKind,
    /// Seconds left before the upgrade vanishes.
    pub timer: f32,
    pub active: bool,
}

impl Upgrade {
    /// Still collectable: not picked up and not timed out.
    pub fn is_live(&self) -> bool {
        self.active && self.timer > 0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub text: String,
    pub remaining: f32,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Seconds until the next automatic shot.
    pub fire_cooldown: f32,
    /// Seconds between shots.
    pub fire_rate: f32,
    pub attack_range: f32,
}

impl Player {
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub health: i32,
    pub speed: f32,
    pub shoot_timer: f32,
    /// Boss heading, scaled by `speed` when moving. Unused by other kinds.
    pub direction: Vec2,
    pub direction_timer: f32,
}

impl Enemy {
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn size(&self) -> f32 {
        match self.kind {
            EnemyKind::Boss => BOSS_SIZE,
            _ => ENEMY_SIZE,
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so `tick` can return a new copy
/// without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Bullets from both sides share one collection.
    pub bullets: Vec<Bullet>,
    pub upgrades: Vec<Upgrade>,
    pub notifications: Vec<Notification>,
    /// Sounds raised during the most recent tick.
    pub cues: Vec<SoundCue>,
    pub score: u32,
    pub enemy_spawn_timer: f32,
    pub boss_spawn_timer: f32,
    pub bosses_defeated: u32,
    pub boss_active: bool,
    pub status: GameStatus,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
}
