//! Sky Siege — a fixed-viewport arcade shooter for the terminal.
//!
//! - `entities`: pure data (player, enemies, bullets, upgrades, game state)
//! - `compute`: per-frame update loop and the restart transition
//! - `spawner`: wave and boss timers, upgrade drops
//! - `collision`: the four ordered collision passes
//! - `display`: render adapter and scene drawing
//! - `audio`, `input`, `dice`: the remaining external adapters
//! - `config`: TOML settings

pub mod audio;
pub mod collision;
pub mod compute;
pub mod config;
pub mod dice;
pub mod display;
pub mod entities;
pub mod input;
pub mod spawner;

pub use compute::{init_state, restart, tick, FrameInput};
pub use dice::{Dice, Entropy};
pub use entities::{GameState, GameStatus};
