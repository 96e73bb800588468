use std::collections::HashSet;

use bevy::prelude::*;

use super::components::*;
use super::enemy::EnemyRecord;
use super::events::{ContactMessage, ContactPhase};
use super::shield::ShieldZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactLayer {
    Player,
    Enemy,
    Shield,
}

/// Circle body taking part in contact detection.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hitbox {
    pub radius: f32,
    pub layer: ContactLayer,
}

// ── Spatial index ───────────────────────────────────────────────────

/// Living enemies by position, rebuilt once per tick.
#[derive(Resource, Default)]
pub struct SpatialIndex {
    enemies: Vec<(Entity, Vec2, f32)>,
}

impl SpatialIndex {
    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    pub fn insert(&mut self, entity: Entity, position: Vec2, radius: f32) {
        self.enemies.push((entity, position, radius));
    }

    /// Enemies whose centre lies within `radius` of `center`.
    pub fn enemies_within(&self, center: Vec2, radius: f32) -> impl Iterator<Item = (Entity, Vec2)> + '_ {
        self.enemies
            .iter()
            .filter(move |(_, pos, _)| pos.distance(center) <= radius)
            .map(|(e, pos, _)| (*e, *pos))
    }

    /// First enemy body overlapping a circle at `center`.
    pub fn first_touching(&self, center: Vec2, radius: f32) -> Option<Entity> {
        self.enemies
            .iter()
            .find(|(_, pos, r)| pos.distance(center) < radius + r)
            .map(|(e, _, _)| *e)
    }
}

/// ContactSet: refresh the index from living enemies.
pub fn rebuild_spatial_index(
    mut index: ResMut<SpatialIndex>,
    enemies: Query<(Entity, &Transform, &EnemyRecord), With<Enemy>>,
) {
    index.clear();
    for (entity, tf, record) in &enemies {
        if record.is_dead() {
            continue;
        }
        index.insert(entity, tf.translation.truncate(), record.radius);
    }
}

// ── Contact detection ───────────────────────────────────────────────

/// Pairs overlapping at the end of the previous tick.
#[derive(Resource, Default)]
pub struct ContactPairs(pub HashSet<(Entity, Entity)>);

/// Compare overlap sets between two ticks.
pub fn diff_contacts(
    previous: &HashSet<(Entity, Entity)>,
    current: &HashSet<(Entity, Entity)>,
) -> Vec<ContactMessage> {
    let mut out = Vec::new();
    for &(a, b) in current {
        let phase = if previous.contains(&(a, b)) {
            ContactPhase::Stay
        } else {
            ContactPhase::Enter
        };
        out.push(ContactMessage { a, b, phase });
    }
    for &(a, b) in previous.difference(current) {
        out.push(ContactMessage {
            a,
            b,
            phase: ContactPhase::Exit,
        });
    }
    out
}

/// ContactSet: overlap transitions between player/shield bodies and living enemies.
/// Removed or dead enemies fall out of the set and produce an Exit.
pub fn detect_contacts(
    mut pairs: ResMut<ContactPairs>,
    bodies: Query<(Entity, &Transform, &Hitbox, Option<&ShieldZone>)>,
    enemies: Query<(Entity, &Transform, &Hitbox, &EnemyRecord), With<Enemy>>,
    mut writer: MessageWriter<ContactMessage>,
) {
    let mut current = HashSet::new();
    for (a, a_tf, a_box, shield) in &bodies {
        if a_box.layer == ContactLayer::Enemy {
            continue;
        }
        if shield.is_some_and(|s| !s.active) {
            continue;
        }
        let a_pos = a_tf.translation.truncate();
        for (b, b_tf, b_box, record) in &enemies {
            if record.is_dead() {
                continue;
            }
            let dist = a_pos.distance(b_tf.translation.truncate());
            if dist < a_box.radius + b_box.radius {
                current.insert((a, b));
            }
        }
    }

    for msg in diff_contacts(&pairs.0, &current) {
        writer.write(msg);
    }
    pairs.0 = current;
}
