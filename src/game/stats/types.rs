use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

// ── Newtypes ────────────────────────────────────────────────────────

/// Integer hit points. `current` may reach 0 but never goes below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthPool {
    pub current: i32,
    pub max: i32,
}

impl HealthPool {
    pub fn full(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    /// Subtract `amount` (negative amounts are ignored). Returns true when this
    /// call took the pool from alive to depleted.
    pub fn take(&mut self, amount: i32) -> bool {
        if self.is_depleted() {
            return false;
        }
        self.current = (self.current - amount.max(0)).max(0);
        self.is_depleted()
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount.max(0)).min(self.max);
    }

    pub fn raise_max(&mut self, delta: i32) {
        self.max = (self.max + delta).max(1);
        self.current = self.current.min(self.max);
    }

    pub fn is_depleted(self) -> bool {
        self.current <= 0
    }

    pub fn fraction(self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

/// Speed multiplier. Clamped to [0, MAX].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Multiplier(pub f32);

impl Multiplier {
    pub const MAX: f32 = 10.0;

    pub fn new(v: f32) -> Self {
        debug_assert!(v.is_finite(), "Multiplier must be finite");
        Self(v.clamp(0.0, Self::MAX))
    }

    pub fn one() -> Self {
        Self(1.0)
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Angle in radians, normalized to [0, TAU).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct AngleRad(pub f32);

impl AngleRad {
    pub fn new(v: f32) -> Self {
        Self(v.rem_euclid(TAU))
    }

    pub fn advance(self, delta: f32) -> Self {
        Self::new(self.0 + delta)
    }
}

// ── Enums ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    Sword,
    Fireball,
    IceBolt,
    Contact,
    Strike,
    Explosion,
    Shield,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_reports_death_exactly_once() {
        let mut hp = HealthPool::full(10);
        assert!(!hp.take(4));
        assert!(hp.take(20));
        assert_eq!(hp.current, 0);
        assert!(!hp.take(5));
        assert_eq!(hp.current, 0);
    }

    #[test]
    fn negative_damage_never_heals() {
        let mut hp = HealthPool::full(10);
        hp.take(-5);
        assert_eq!(hp.current, 10);
    }

    #[test]
    fn heal_is_capped_at_max() {
        let mut hp = HealthPool { current: 5, max: 10 };
        hp.heal(20);
        assert_eq!(hp.current, 10);
    }

    #[test]
    fn angle_wraps() {
        let a = AngleRad::new(TAU - 0.1).advance(0.2);
        assert!((a.0 - 0.1).abs() < 1e-5);
    }
}
