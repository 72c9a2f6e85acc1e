#![allow(dead_code)]

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;

use sky_siege::compute::init_state;
use sky_siege::dice::{Dice, Entropy};
use sky_siege::entities::GameState;

/// One frame at 60 FPS.
pub const DT: f32 = 1.0 / 60.0;

/// Replays a fixed list of rolls, each clamped into the requested range.
/// Once the list runs out every roll returns `hi`, which means "no drop"
/// for the drop check.
pub struct ScriptedDice {
    rolls: VecDeque<i32>,
}

impl ScriptedDice {
    pub fn new(rolls: &[i32]) -> Self {
        Self {
            rolls: rolls.iter().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, lo: i32, hi: i32) -> i32 {
        self.rolls.pop_front().unwrap_or(hi).clamp(lo, hi)
    }
}

pub fn seeded_dice() -> Entropy<StdRng> {
    Entropy(StdRng::seed_from_u64(42))
}

/// 800×600 state as a fresh run starts.
pub fn make_state() -> GameState {
    init_state(800.0, 600.0)
}

/// Like `make_state`, but nothing spawns and the player never fires, so a
/// test only sees the entities it places itself.
pub fn quiet_state() -> GameState {
    let mut s = make_state();
    s.player.fire_cooldown = 1.0e6;
    s.enemy_spawn_timer = -1.0e6;
    s.boss_spawn_timer = -1.0e6;
    s
}
