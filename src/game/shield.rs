//! Crow shield: a rotating ring around the player that damages every
//! enemy inside it in one batch, then waits out a shared hit gate.

use std::collections::HashSet;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use super::components::*;
use super::cooldown::CooldownGate;
use super::enemy::EnemyRecord;
use super::events::{CombatEvent, ContactMessage, ContactPhase};
use super::stats::types::{AngleRad, DamageKind};
use crate::config::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldTuning {
    pub damage: i32,
    pub knockback: f32,
    pub hit_interval: f32,
    pub rotation_deg_per_sec: f32,
    /// Hitbox radius at scale 1.0.
    pub radius_per_scale: f32,
}

impl Default for ShieldTuning {
    fn default() -> Self {
        Self {
            damage: 30,
            knockback: 6.0,
            hit_interval: 0.35,
            rotation_deg_per_sec: 360.0,
            radius_per_scale: 2.4,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct ShieldZone {
    pub active: bool,
    pub level: u32,
    pub rotation: AngleRad,
    pub damage: i32,
    pub knockback: f32,
    pub hit_interval: f32,
    pub rotation_speed: f32,
    pub gate: CooldownGate,
    pub overlap: HashSet<Entity>,
}

impl ShieldZone {
    pub fn new(tuning: &ShieldTuning) -> Self {
        Self {
            active: false,
            level: 0,
            rotation: AngleRad::default(),
            damage: tuning.damage,
            knockback: tuning.knockback,
            hit_interval: tuning.hit_interval,
            rotation_speed: tuning.rotation_deg_per_sec.to_radians(),
            gate: CooldownGate::ready(),
            overlap: HashSet::new(),
        }
    }

    /// Level 0 keeps the shield dormant; any higher level activates it.
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
        self.active = level >= 1;
        if !self.active {
            self.overlap.clear();
        }
    }

    /// Visual and hitbox scale. Damage does not scale.
    pub fn scale(&self) -> f32 {
        (0.75 + 0.1 * self.level as f32).min(1.25)
    }

    pub fn rotate(&mut self, delta: f32) {
        if self.active {
            self.rotation = self.rotation.advance(self.rotation_speed * delta);
        }
    }

    /// Track a new overlap. Damage waits for the tick's `resolve_batch`.
    pub fn on_enter(&mut self, enemy: Entity) {
        if self.active {
            self.overlap.insert(enemy);
        }
    }

    pub fn on_exit(&mut self, enemy: Entity) {
        self.overlap.remove(&enemy);
    }

    /// Prune dead members, then snapshot the set and re-arm the gate once.
    /// Returns the enemies to damage this tick.
    pub fn resolve_batch(&mut self, now: f32, is_alive: impl Fn(Entity) -> bool) -> Vec<Entity> {
        if !self.active || !self.gate.is_ready(now) {
            return Vec::new();
        }
        self.overlap.retain(|e| is_alive(*e));
        if self.overlap.is_empty() {
            return Vec::new();
        }
        let targets: Vec<Entity> = self.overlap.iter().copied().collect();
        self.gate.fire(now, self.hit_interval);
        targets
    }

    /// Opacity while cooling down; fully opaque when ready.
    pub fn flicker_alpha(&self, now: f32) -> f32 {
        if self.gate.is_ready(now) {
            1.0
        } else {
            0.35 + 0.65 * (now * 12.0).sin().abs()
        }
    }
}

// ── Systems ─────────────────────────────────────────────────────────

/// MotionSet: follow the player, spin, and size the hitbox from the level.
pub fn follow_player(
    clock: Res<CombatClock>,
    tuning: Res<Tuning>,
    player: Query<&Transform, With<Player>>,
    mut shields: Query<(&mut Transform, &mut ShieldZone, &mut Hitbox), Without<Player>>,
) {
    let Ok(player_tf) = player.single() else {
        return;
    };
    for (mut tf, mut shield, mut hitbox) in &mut shields {
        shield.rotate(clock.delta);
        let scale = shield.scale();
        hitbox.radius = scale * tuning.shield.radius_per_scale;
        tf.translation.x = player_tf.translation.x;
        tf.translation.y = player_tf.translation.y;
        tf.rotation = Quat::from_rotation_z(shield.rotation.0);
        tf.scale = Vec3::splat(scale);
    }
}

/// EventGenerateSet: track overlaps, push enemies out, and deal batched damage.
pub fn shield_damage(
    clock: Res<CombatClock>,
    mut contacts: MessageReader<ContactMessage>,
    mut shields: Query<(Entity, &Transform, &mut ShieldZone)>,
    mut enemies: Query<(&Transform, &EnemyRecord, &mut Knockback), (With<Enemy>, Without<ShieldZone>)>,
    mut events: MessageWriter<CombatEvent>,
) {
    let Ok((shield_entity, shield_tf, mut shield)) = shields.single_mut() else {
        contacts.clear();
        return;
    };
    let center = shield_tf.translation.truncate();

    for msg in contacts.read() {
        if msg.a != shield_entity {
            continue;
        }
        match msg.phase {
            ContactPhase::Enter | ContactPhase::Stay => {
                if let Ok((tf, _, mut knockback)) = enemies.get_mut(msg.b) {
                    let away = (tf.translation.truncate() - center).normalize_or_zero();
                    knockback.0 = away * shield.knockback;
                }
                if msg.phase == ContactPhase::Enter {
                    shield.on_enter(msg.b);
                }
            }
            ContactPhase::Exit => shield.on_exit(msg.b),
        }
    }

    // Membership is settled for the whole tick before anyone is hit.
    let alive = |e: Entity| enemies.get(e).is_ok_and(|(_, r, _)| !r.is_dead());
    let targets = shield.resolve_batch(clock.now, alive);

    for dst in targets {
        events.write(CombatEvent::DamageEnemy {
            dst,
            amount: shield.damage,
            kind: DamageKind::Shield,
        });
    }
}
