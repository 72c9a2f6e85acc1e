/// Integer randomness used by the simulation.
///
/// Everything random in a frame (wave size, spawn columns, boss heading and
/// jitter, upgrade kind, drop rolls) goes through `roll`, so a seeded
/// generator makes a whole run reproducible.

use rand::Rng;

pub trait Dice {
    /// Uniform integer in `[lo, hi]`, both ends inclusive.
    fn roll(&mut self, lo: i32, hi: i32) -> i32;
}

/// Adapts any `rand` generator.
#[derive(Clone, Debug)]
pub struct Entropy<R>(pub R);

impl<R: Rng> Dice for Entropy<R> {
    fn roll(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }
}
