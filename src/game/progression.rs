use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::cooldown::TimedFlag;
use super::stats::types::HealthPool;

/// Shape of the level curve and the level-gated unlocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionCurve {
    pub base_xp: i32,
    pub multiplier: f32,
    pub health_per_level: i32,
    pub fireball_unlock_level: u32,
    pub magnet_unlock_level: u32,
}

impl Default for ProgressionCurve {
    fn default() -> Self {
        Self {
            base_xp: 30,
            multiplier: 1.35,
            health_per_level: 10,
            fireball_unlock_level: 4,
            magnet_unlock_level: 5,
        }
    }
}

impl ProgressionCurve {
    /// XP needed to leave `level`: `round(base * multiplier^(level-1))`.
    pub fn xp_required(&self, level: u32) -> i32 {
        if level <= 1 {
            return self.base_xp;
        }
        let exp = (level - 1) as i32;
        let required = self.base_xp as f64 * (self.multiplier as f64).powi(exp);
        required.round() as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlock {
    Fireball,
    Magnet,
}

/// One crossed level. A single XP grant may yield several, in level order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub xp_to_next_level: i32,
    pub unlocks: Vec<Unlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerHit {
    Ignored,
    Hurt,
    Killed,
}

/// XP, level and hit points of the player.
#[derive(Component, Debug, Clone)]
pub struct ProgressionLedger {
    pub curve: ProgressionCurve,
    pub current_xp: i32,
    pub current_level: u32,
    pub xp_to_next_level: i32,
    pub health: HealthPool,
    pub invincible: TimedFlag,
    pub dead: bool,
}

impl ProgressionLedger {
    pub fn new(curve: ProgressionCurve, max_health: i32) -> Self {
        let xp_to_next_level = curve.xp_required(1);
        Self {
            curve,
            current_xp: 0,
            current_level: 1,
            xp_to_next_level,
            health: HealthPool::full(max_health),
            invincible: TimedFlag::default(),
            dead: false,
        }
    }

    /// Add XP and run the level-up loop. Returns every crossed level.
    pub fn gain_xp(&mut self, amount: i32) -> Vec<LevelUp> {
        let mut crossed = Vec::new();
        if self.dead || amount <= 0 {
            return crossed;
        }

        self.current_xp += amount;
        while self.current_xp >= self.xp_to_next_level {
            self.current_xp -= self.xp_to_next_level;
            self.current_level += 1;
            self.health.raise_max(self.curve.health_per_level);
            self.xp_to_next_level = self.curve.xp_required(self.current_level).max(1);

            let mut unlocks = Vec::new();
            if self.current_level == self.curve.fireball_unlock_level {
                unlocks.push(Unlock::Fireball);
            }
            if self.current_level == self.curve.magnet_unlock_level {
                unlocks.push(Unlock::Magnet);
            }
            crossed.push(LevelUp {
                level: self.current_level,
                xp_to_next_level: self.xp_to_next_level,
                unlocks,
            });
        }
        crossed
    }

    /// Damage the player unless dead or inside the invincibility window.
    pub fn take_damage(&mut self, amount: i32, now: f32, invincibility: f32) -> PlayerHit {
        if self.dead || self.invincible.is_active(now) || amount <= 0 {
            return PlayerHit::Ignored;
        }
        self.invincible.start(now, invincibility);
        if self.health.take(amount) {
            self.dead = true;
            return PlayerHit::Killed;
        }
        PlayerHit::Hurt
    }

    pub fn heal(&mut self, amount: i32) {
        if self.dead {
            return;
        }
        self.health.heal(amount);
    }

    pub fn xp_fraction(&self) -> f32 {
        self.current_xp as f32 / self.xp_to_next_level.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> ProgressionLedger {
        ProgressionLedger::new(ProgressionCurve::default(), 100)
    }

    #[test]
    fn curve_matches_design_table() {
        let curve = ProgressionCurve::default();
        assert_eq!(curve.xp_required(1), 30);
        assert_eq!(curve.xp_required(2), 41);
        assert_eq!(curve.xp_required(3), 55);
    }

    #[test]
    fn curve_is_exponential_for_higher_levels() {
        let curve = ProgressionCurve::default();
        for level in 2..12 {
            let expected = (30.0_f64 * 1.35_f64.powi(level as i32 - 1)).round() as i32;
            assert_eq!(curve.xp_required(level), expected);
        }
    }

    #[test]
    fn grant_below_threshold_keeps_level() {
        let mut l = ledger();
        assert!(l.gain_xp(29).is_empty());
        assert_eq!(l.current_level, 1);
        assert_eq!(l.current_xp, 29);
    }

    #[test]
    fn one_grant_can_cross_two_levels() {
        let mut l = ledger();
        let ups = l.gain_xp(30 + 41 + 3);
        assert_eq!(ups.len(), 2);
        assert_eq!(ups[0].level, 2);
        assert_eq!(ups[0].xp_to_next_level, 41);
        assert_eq!(ups[1].level, 3);
        assert_eq!(ups[1].xp_to_next_level, 55);
        assert_eq!(l.current_level, 3);
        assert_eq!(l.current_xp, 3);
        assert!(l.current_xp < l.xp_to_next_level);
    }

    #[test]
    fn each_level_raises_max_health_without_healing() {
        let mut l = ledger();
        l.take_damage(40, 0.0, 1.0);
        l.gain_xp(30 + 41);
        assert_eq!(l.health.max, 120);
        assert_eq!(l.health.current, 60);
    }

    #[test]
    fn fireball_unlocks_exactly_at_level_four() {
        let mut l = ledger();
        l.gain_xp(30 + 41);
        assert_eq!(l.current_level, 3);
        let ups = l.gain_xp(55);
        assert_eq!(ups.len(), 1);
        assert_eq!(ups[0].level, 4);
        assert_eq!(ups[0].unlocks, vec![Unlock::Fireball]);

        let ups = l.gain_xp(l.xp_to_next_level);
        assert_eq!(ups[0].level, 5);
        assert_eq!(ups[0].unlocks, vec![Unlock::Magnet]);
    }

    #[test]
    fn invincibility_window_blocks_follow_up_hits() {
        let mut l = ledger();
        assert_eq!(l.take_damage(10, 0.0, 1.0), PlayerHit::Hurt);
        assert_eq!(l.take_damage(10, 0.5, 1.0), PlayerHit::Ignored);
        assert_eq!(l.take_damage(10, 1.0, 1.0), PlayerHit::Hurt);
        assert_eq!(l.health.current, 80);
    }

    #[test]
    fn death_is_final() {
        let mut l = ledger();
        assert_eq!(l.take_damage(500, 0.0, 0.0), PlayerHit::Killed);
        assert_eq!(l.health.current, 0);
        assert_eq!(l.take_damage(5, 10.0, 0.0), PlayerHit::Ignored);
        l.heal(50);
        assert_eq!(l.health.current, 0);
        assert!(l.gain_xp(1000).is_empty());
    }
}
