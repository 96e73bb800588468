use serde::{Deserialize, Serialize};

use super::rng::RandomSource;

/// Loot table carried by every enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropProfile {
    pub item_chance: f32,
    pub item_value: i32,
    pub health_chance: f32,
    pub health_value: i32,
}

impl Default for DropProfile {
    fn default() -> Self {
        Self {
            item_chance: 0.3,
            item_value: 5,
            health_chance: 0.1,
            health_value: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Xp(i32),
    Health(i32),
    Nothing,
}

impl DropProfile {
    /// Resolve a single roll in [0, 1) against the two contiguous bands
    /// `[0, item]` and `(item, item + health]`.
    pub fn resolve(&self, roll: f32) -> DropOutcome {
        let xp_threshold = self.item_chance.clamp(0.0, 1.0);
        let health_threshold =
            (xp_threshold + self.health_chance.clamp(0.0, 1.0)).clamp(0.0, 1.0);

        if roll <= xp_threshold {
            DropOutcome::Xp(self.item_value)
        } else if roll <= health_threshold {
            DropOutcome::Health(self.health_value)
        } else {
            DropOutcome::Nothing
        }
    }

    pub fn roll(&self, rng: &mut impl RandomSource) -> DropOutcome {
        self.resolve(rng.uniform())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rng::ScriptedRolls;

    fn profile() -> DropProfile {
        DropProfile {
            item_chance: 0.3,
            item_value: 5,
            health_chance: 0.1,
            health_value: 20,
        }
    }

    #[test]
    fn lower_band_boundary_is_inclusive() {
        assert_eq!(profile().resolve(0.3), DropOutcome::Xp(5));
    }

    #[test]
    fn roll_inside_health_band() {
        assert_eq!(profile().resolve(0.35), DropOutcome::Health(20));
    }

    #[test]
    fn roll_above_both_bands_drops_nothing() {
        assert_eq!(profile().resolve(0.9), DropOutcome::Nothing);
    }

    #[test]
    fn chances_are_clamped_individually() {
        let p = DropProfile {
            item_chance: 1.4,
            health_chance: -0.5,
            ..profile()
        };
        assert_eq!(p.resolve(0.999), DropOutcome::Xp(5));

        let p = DropProfile {
            item_chance: -1.0,
            health_chance: 0.5,
            ..profile()
        };
        assert_eq!(p.resolve(0.0), DropOutcome::Xp(5));
        assert_eq!(p.resolve(0.25), DropOutcome::Health(20));
        assert_eq!(p.resolve(0.75), DropOutcome::Nothing);
    }

    #[test]
    fn roll_consumes_exactly_one_value() {
        let mut rng = ScriptedRolls::new(&[0.35, 0.0]);
        assert_eq!(profile().roll(&mut rng), DropOutcome::Health(20));
        assert_eq!(rng.cursor, 1);
    }
}
