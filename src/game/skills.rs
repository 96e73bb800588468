use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;

// ── Design constants ────────────────────────────────────────────────

const FIREBALL_BASE_DAMAGE: i32 = 15;
const FIREBALL_DAMAGE_STEP: i32 = 10;
const FIREBALL_BASE_COOLDOWN: f32 = 2.5;
const FIREBALL_COOLDOWN_STEP: f32 = 0.35;
const FIREBALL_MIN_COOLDOWN: f32 = 0.3;

const SWORD_BASE_DAMAGE: f32 = 10.0;
const SWORD_DAMAGE_STEP: f32 = 7.5;
const SWORD_BASE_COOLDOWN: f32 = 1.5;
const SWORD_COOLDOWN_STEP: f32 = 0.25;
const SWORD_MIN_COOLDOWN: f32 = 0.1;

const BASE_MOVE_SPEED: f32 = 5.0;

const FIREBALL_SKILL_LEVEL: u32 = 4;
const SHIELD_SKILL_LEVEL: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    FireballPower,
    FireballSpeed,
    FireballCount,
    SwordPower,
    SwordSpeed,
    MoveSpeed,
    CrowShield,
}

impl SkillKind {
    pub const ALL: [SkillKind; 7] = [
        SkillKind::FireballPower,
        SkillKind::FireballSpeed,
        SkillKind::FireballCount,
        SkillKind::SwordPower,
        SkillKind::SwordSpeed,
        SkillKind::MoveSpeed,
        SkillKind::CrowShield,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            SkillKind::FireballPower => "Fireball Power",
            SkillKind::FireballSpeed => "Fireball Speed",
            SkillKind::FireballCount => "Fireball Count",
            SkillKind::SwordPower => "Sword Power",
            SkillKind::SwordSpeed => "Sword Speed",
            SkillKind::MoveSpeed => "Move Speed",
            SkillKind::CrowShield => "Crow Shield",
        }
    }

    /// Minimum player level before the skill is offered.
    pub fn unlock_level(self) -> u32 {
        match self {
            SkillKind::FireballPower | SkillKind::FireballSpeed | SkillKind::FireballCount => {
                FIREBALL_SKILL_LEVEL
            }
            SkillKind::CrowShield => SHIELD_SKILL_LEVEL,
            _ => 1,
        }
    }

    /// `None` means the skill can be levelled forever.
    pub fn max_level(self) -> Option<u32> {
        match self {
            SkillKind::FireballSpeed | SkillKind::SwordSpeed => Some(3),
            SkillKind::FireballCount => Some(2),
            SkillKind::CrowShield => Some(5),
            _ => None,
        }
    }

    /// Absolute stat value granted at `level`. Level 0 yields the base value.
    pub fn effect_at(self, level: u32) -> SkillEffect {
        let l = level as f32;
        match self {
            SkillKind::FireballPower => SkillEffect::FireballDamage(
                FIREBALL_BASE_DAMAGE + FIREBALL_DAMAGE_STEP * (level as i32 - 1).max(0),
            ),
            SkillKind::FireballSpeed => SkillEffect::FireballCooldown(
                (FIREBALL_BASE_COOLDOWN - FIREBALL_COOLDOWN_STEP * l).max(FIREBALL_MIN_COOLDOWN),
            ),
            SkillKind::FireballCount => SkillEffect::FireballCount(match level {
                0 => 1,
                1 => 2,
                _ => 4,
            }),
            SkillKind::SwordPower => {
                SkillEffect::SwordDamage((SWORD_BASE_DAMAGE + SWORD_DAMAGE_STEP * l) as i32)
            }
            SkillKind::SwordSpeed => SkillEffect::SwordCooldown(
                (SWORD_BASE_COOLDOWN - SWORD_COOLDOWN_STEP * l).max(SWORD_MIN_COOLDOWN),
            ),
            // Each level k adds 0.5 + 0.2k.
            SkillKind::MoveSpeed => {
                SkillEffect::MoveSpeed(BASE_MOVE_SPEED + 0.5 * l + 0.1 * l * (l + 1.0))
            }
            SkillKind::CrowShield => SkillEffect::ShieldLevel(level),
        }
    }
}

/// Stat change produced by applying a skill, routed to the owning component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    FireballDamage(i32),
    FireballCooldown(f32),
    FireballCount(u32),
    SwordDamage(i32),
    SwordCooldown(f32),
    MoveSpeed(f32),
    ShieldLevel(u32),
}

/// Per-skill upgrade levels for the current run.
#[derive(Resource, Debug, Clone, Default)]
pub struct SkillLedger {
    levels: HashMap<SkillKind, u32>,
}

impl SkillLedger {
    pub fn level(&self, skill: SkillKind) -> u32 {
        self.levels.get(&skill).copied().unwrap_or(0)
    }

    /// Raise the skill by one level and return the new absolute effect.
    /// Eligibility is checked by the offer, not here.
    pub fn apply(&mut self, skill: SkillKind) -> SkillEffect {
        let level = self.levels.entry(skill).or_insert(0);
        *level += 1;
        skill.effect_at(*level)
    }

    pub fn is_eligible(&self, skill: SkillKind, player_level: u32) -> bool {
        if player_level < skill.unlock_level() {
            return false;
        }
        skill.max_level().is_none_or(|max| self.level(skill) < max)
    }

    pub fn eligible_skills(&self, player_level: u32) -> Vec<SkillKind> {
        SkillKind::ALL
            .into_iter()
            .filter(|s| self.is_eligible(*s, player_level))
            .collect()
    }

    /// "<name> Lv.<next level>"
    pub fn description(&self, skill: SkillKind) -> String {
        format!("{} Lv.{}", skill.display_name(), self.level(skill) + 1)
    }

    /// Draw up to `count` distinct eligible skills, uniformly without replacement.
    pub fn roll_offer(
        &self,
        player_level: u32,
        count: usize,
        rng: &mut impl RandomSource,
    ) -> Vec<SkillKind> {
        let mut pool = self.eligible_skills(player_level);
        let picks = count.min(pool.len());
        let mut offer = Vec::with_capacity(picks);
        for _ in 0..picks {
            let idx = rng.uniform_int(0, pool.len());
            offer.push(pool.remove(idx));
        }
        offer
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillKind, u32)> + '_ {
        SkillKind::ALL
            .into_iter()
            .map(|s| (s, self.level(s)))
            .filter(|(_, l)| *l > 0)
    }
}
