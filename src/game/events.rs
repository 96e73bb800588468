use bevy::prelude::*;

use super::projectile::ProjectileSpec;
use super::pickups::PickupKind;
use super::stats::types::DamageKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactPhase {
    Enter,
    Stay,
    Exit,
}

/// Overlap transition between a player/shield body (`a`) and an enemy (`b`).
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactMessage {
    pub a: Entity,
    pub b: Entity,
    pub phase: ContactPhase,
}

/// All combat events processed through the event pipeline.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum CombatEvent {
    DamageEnemy {
        dst: Entity,
        amount: i32,
        kind: DamageKind,
    },
    DamagePlayer {
        amount: i32,
        kind: DamageKind,
    },
    SlowPlayer {
        multiplier: f32,
        duration: f32,
    },
    HealPlayer {
        amount: i32,
    },
    GrantXp {
        amount: i32,
    },
    SpawnProjectile(ProjectileSpec),
    SpawnPickup {
        position: Vec2,
        kind: PickupKind,
        value: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    Slash,
    Debris,
}

/// One-shot visual effect request. Presentation only.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct VisualCue {
    pub kind: CueKind,
    pub position: Vec2,
    pub flip_x: bool,
    pub flip_y: bool,
    pub lifetime: f32,
}

/// Index of the option picked on the level-up panel.
#[derive(Message, Debug, Clone, Copy)]
pub struct SkillChosen(pub usize);
