use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::cooldown::CooldownGate;
use super::skills::SkillEffect;

/// Offset of each fireball spawn point from the player, on both axes.
pub const VOLLEY_ANCHOR: f32 = 0.8;
/// Directions a single volley can cover.
pub const MAX_VOLLEY: u32 = 4;

/// Timing and damage of one weapon. `base_*` are the unmodified defaults;
/// `current_*` are set absolutely by skill upgrades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackProfile {
    pub base_cooldown: f32,
    pub current_cooldown: f32,
    pub min_cooldown: f32,
    pub base_damage: i32,
    pub current_damage: i32,
    pub range: f32,
    pub projectile_count: u32,
    pub projectile_speed: f32,
    /// Absolute lifetime of spawned projectiles (seconds).
    pub projectile_lifetime: f32,
}

impl AttackProfile {
    pub fn sword() -> Self {
        Self {
            base_cooldown: 1.5,
            current_cooldown: 1.5,
            min_cooldown: 0.1,
            base_damage: 10,
            current_damage: 10,
            range: 2.0,
            projectile_count: 0,
            projectile_speed: 0.0,
            projectile_lifetime: 0.0,
        }
    }

    pub fn fireball() -> Self {
        Self {
            base_cooldown: 2.5,
            current_cooldown: 2.5,
            min_cooldown: 0.3,
            base_damage: 15,
            current_damage: 15,
            range: 17.5,
            projectile_count: 1,
            projectile_speed: 10.0,
            projectile_lifetime: 10.0,
        }
    }

    pub fn set_cooldown(&mut self, seconds: f32) {
        self.current_cooldown = seconds.max(self.min_cooldown);
    }

    pub fn set_damage(&mut self, damage: i32) {
        self.current_damage = damage.max(0);
    }
}

/// Player weapons and their gates.
#[derive(Component, Debug, Clone)]
pub struct Arsenal {
    pub sword: AttackProfile,
    pub fireball: AttackProfile,
    pub sword_gate: CooldownGate,
    pub fireball_gate: CooldownGate,
    pub fireball_unlocked: bool,
}

impl Arsenal {
    pub fn new(sword: AttackProfile, fireball: AttackProfile) -> Self {
        Self {
            sword,
            fireball,
            sword_gate: CooldownGate::ready(),
            fireball_gate: CooldownGate::ready(),
            fireball_unlocked: false,
        }
    }

    pub fn unlock_fireball(&mut self) {
        self.fireball_unlocked = true;
    }

    /// Returns true when the sword may swing this tick, and re-arms it.
    pub fn try_swing(&mut self, now: f32) -> bool {
        self.sword_gate.try_fire(now, self.sword.current_cooldown)
    }

    /// Returns true when a volley may fire this tick, and re-arms it.
    /// Locked fireballs never touch the gate.
    pub fn try_volley(&mut self, now: f32) -> bool {
        if !self.fireball_unlocked {
            return false;
        }
        self.fireball_gate.try_fire(now, self.fireball.current_cooldown)
    }

    /// Route a weapon upgrade. Returns false for effects owned elsewhere.
    pub fn apply_skill(&mut self, effect: SkillEffect) -> bool {
        match effect {
            SkillEffect::FireballDamage(d) => self.fireball.set_damage(d),
            SkillEffect::FireballCooldown(c) => self.fireball.set_cooldown(c),
            SkillEffect::FireballCount(n) => self.fireball.projectile_count = n,
            SkillEffect::SwordDamage(d) => self.sword.set_damage(d),
            SkillEffect::SwordCooldown(c) => self.sword.set_cooldown(c),
            SkillEffect::MoveSpeed(_) | SkillEffect::ShieldLevel(_) => return false,
        }
        true
    }
}

/// Spawn parameters of one projectile in a volley.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolleySlot {
    pub offset: Vec2,
    pub direction: Vec2,
    pub flip_x: bool,
    pub flip_y: bool,
}

/// Fixed diagonal table indexed by slot and facing. The left-facing column
/// mirrors the right-facing one on the x axis.
pub fn volley_slot(index: usize, facing_left: bool, anchor: f32) -> VolleySlot {
    // (sign_x, sign_y) for facing right
    let (sx, sy) = match index % MAX_VOLLEY as usize {
        0 => (1.0, 1.0),
        1 => (-1.0, -1.0),
        2 => (-1.0, 1.0),
        _ => (1.0, -1.0),
    };
    let sx = if facing_left { -sx } else { sx };
    VolleySlot {
        offset: Vec2::new(sx * anchor, sy * anchor),
        direction: Vec2::new(sx, sy).normalize(),
        flip_x: sx < 0.0,
        flip_y: sy < 0.0,
    }
}

/// Slots fired by one volley: `min(count, 4)` entries.
pub fn volley(count: u32, facing_left: bool, anchor: f32) -> Vec<VolleySlot> {
    (0..count.min(MAX_VOLLEY) as usize)
        .map(|i| volley_slot(i, facing_left, anchor))
        .collect()
}
