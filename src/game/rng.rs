use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform randomness consumed by drops, offers and the spawner.
pub trait RandomSource {
    /// Uniform value in [0, 1).
    fn uniform(&mut self) -> f32;
    /// Uniform integer in [lo, hi). Returns `lo` when the range is empty.
    fn uniform_int(&mut self, lo: usize, hi: usize) -> usize;
}

/// Session RNG. Seeded from `Tuning::rng_seed` when present.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed_or_os(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self(StdRng::from_os_rng()),
        }
    }

    /// Random unit vector (uniform angle).
    pub fn unit_vector(&mut self) -> Vec2 {
        let angle = self.uniform() * std::f32::consts::TAU;
        Vec2::new(angle.cos(), angle.sin())
    }
}

impl RandomSource for GameRng {
    fn uniform(&mut self) -> f32 {
        self.0.random::<f32>()
    }

    fn uniform_int(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        self.0.random_range(lo..hi)
    }
}

/// Replays a fixed list of rolls, then repeats the last one. Test helper.
#[cfg(test)]
pub struct ScriptedRolls {
    pub rolls: Vec<f32>,
    pub cursor: usize,
}

#[cfg(test)]
impl ScriptedRolls {
    pub fn new(rolls: &[f32]) -> Self {
        Self {
            rolls: rolls.to_vec(),
            cursor: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRolls {
    fn uniform(&mut self) -> f32 {
        let idx = self.cursor.min(self.rolls.len().saturating_sub(1));
        self.cursor += 1;
        self.rolls.get(idx).copied().unwrap_or(0.0)
    }

    fn uniform_int(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        let span = hi - lo;
        lo + ((self.uniform() * span as f32) as usize).min(span - 1)
    }
}
