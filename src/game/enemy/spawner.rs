use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{EnemyBrain, EnemyKind, EnemyRecord};
use crate::assets_map::AssetsMap;
use crate::config::tuning::Tuning;
use crate::game::collision::{ContactLayer, Hitbox};
use crate::game::components::*;
use crate::game::cooldown::CooldownGate;
use crate::game::rng::{GameRng, RandomSource};
use crate::game::stats::base::EnemyBaseStats;

/// One row of the spawn table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub kind: EnemyKind,
    pub weight: f32,
    /// Run time (seconds) before this type may appear.
    pub min_spawn_time: f32,
    pub max_concurrent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerTuning {
    pub interval: f32,
    pub max_enemies: u32,
    pub spawn_radius: f32,
    pub table: Vec<SpawnEntry>,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            interval: 1.0,
            max_enemies: 20,
            spawn_radius: 10.0,
            table: vec![
                SpawnEntry {
                    kind: EnemyKind::Skeleton,
                    weight: 0.5,
                    min_spawn_time: 0.0,
                    max_concurrent: 999,
                },
                SpawnEntry {
                    kind: EnemyKind::Draugr,
                    weight: 0.3,
                    min_spawn_time: 30.0,
                    max_concurrent: 999,
                },
                SpawnEntry {
                    kind: EnemyKind::IceGoblin,
                    weight: 0.2,
                    min_spawn_time: 60.0,
                    max_concurrent: 6,
                },
                SpawnEntry {
                    kind: EnemyKind::RockGolem,
                    weight: 0.1,
                    min_spawn_time: 120.0,
                    max_concurrent: 2,
                },
            ],
        }
    }
}

/// Live enemy counts per spawn tag, plus the spawn interval gate.
#[derive(Resource, Debug, Default)]
pub struct EnemyPopulation {
    counts: HashMap<EnemyKind, u32>,
    pub gate: CooldownGate,
}

impl EnemyPopulation {
    pub fn register(&mut self, kind: EnemyKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    /// Forget one enemy of `kind`. Unknown or already-zero tags are ignored.
    pub fn release(&mut self, kind: EnemyKind) {
        if let Some(count) = self.counts.get_mut(&kind) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn count(&self, kind: EnemyKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn reset(&mut self) {
        self.counts.clear();
        self.gate = CooldownGate::ready();
    }
}

/// Weighted draw among entries that are unlocked by run time and under their cap.
pub fn pick_spawn(
    table: &[SpawnEntry],
    population: &EnemyPopulation,
    elapsed: f32,
    rng: &mut impl RandomSource,
) -> Option<EnemyKind> {
    let eligible: Vec<&SpawnEntry> = table
        .iter()
        .filter(|e| e.weight > 0.0)
        .filter(|e| elapsed >= e.min_spawn_time)
        .filter(|e| population.count(e.kind) < e.max_concurrent)
        .collect();
    let total: f32 = eligible.iter().map(|e| e.weight).sum();
    if eligible.is_empty() || total <= 0.0 {
        return None;
    }

    let roll = rng.uniform() * total;
    let mut acc = 0.0;
    for entry in &eligible {
        acc += entry.weight;
        if roll < acc {
            return Some(entry.kind);
        }
    }
    eligible.last().map(|e| e.kind)
}

/// Spawn one enemy entity with its behaviour, record and body.
pub fn spawn_enemy(commands: &mut Commands, kind: EnemyKind, position: Vec2, palette: &AssetsMap) -> Entity {
    let base = EnemyBaseStats::for_kind(kind);
    let size = Vec2::splat(base.radius * 2.0);
    commands
        .spawn((
            InGame,
            Enemy,
            SpawnTag(kind),
            EnemyRecord::from_base(&base),
            EnemyBrain::for_kind(kind),
            Knockback::default(),
            Hitbox {
                radius: base.radius,
                layer: ContactLayer::Enemy,
            },
            Sprite::from_color(palette.enemy_color(kind), size),
            Transform::from_translation(position.extend(1.0)),
        ))
        .id()
}

/// EventGenerateSet: place a new enemy on the ring around the player.
pub fn spawn_enemies(
    mut commands: Commands,
    clock: Res<CombatClock>,
    tuning: Res<Tuning>,
    palette: Res<AssetsMap>,
    mut rng: ResMut<GameRng>,
    mut population: ResMut<EnemyPopulation>,
    player: Query<&Transform, With<Player>>,
) {
    let Ok(player_tf) = player.single() else {
        return;
    };
    let spawner = &tuning.spawner;
    if population.total() >= spawner.max_enemies {
        return;
    }
    if !population.gate.try_fire(clock.now, spawner.interval) {
        return;
    }
    let Some(kind) = pick_spawn(&spawner.table, &population, clock.now, &mut *rng) else {
        return;
    };

    let position = player_tf.translation.truncate() + rng.unit_vector() * spawner.spawn_radius;
    let entity = spawn_enemy(&mut commands, kind, position, &palette);
    population.register(kind);
    debug!("Spawned {kind:?} {entity:?} at {position:?} ({} alive)", population.total());
}
