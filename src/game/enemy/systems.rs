use bevy::prelude::*;

use super::spawner::EnemyPopulation;
use super::{EnemyAction, EnemyBrain, EnemyContext, EnemyRecord};
use crate::game::components::*;
use crate::game::drops::DropOutcome;
use crate::game::events::{CombatEvent, CueKind, VisualCue};
use crate::game::pickups::PickupKind;
use crate::game::projectile::ProjectileSpec;
use crate::game::rng::GameRng;
use crate::game::stats::types::DamageKind;

/// MotionSet: run every enemy's behaviour and move it.
pub fn tick_enemies(
    clock: Res<CombatClock>,
    player: Query<&Transform, With<Player>>,
    mut enemies: Query<(&mut Transform, &mut EnemyRecord, &mut EnemyBrain, &Knockback), (With<Enemy>, Without<Player>)>,
    mut events: MessageWriter<CombatEvent>,
) {
    let player_pos = player.single().ok().map(|tf| tf.translation.truncate());

    for (mut tf, mut record, mut brain, knockback) in &mut enemies {
        let ctx = EnemyContext {
            now: clock.now,
            position: tf.translation.truncate(),
            player: player_pos,
        };
        let out = brain.tick(&mut record, &ctx);

        let step = (out.velocity + knockback.0) * clock.delta;
        tf.translation.x += step.x;
        tf.translation.y += step.y;

        for action in out.actions {
            match action {
                EnemyAction::Strike { damage } => {
                    events.write(CombatEvent::DamagePlayer {
                        amount: damage,
                        kind: DamageKind::Strike,
                    });
                }
                EnemyAction::LaunchBolt {
                    origin,
                    target,
                    speed,
                    lifetime,
                } => {
                    events.write(CombatEvent::SpawnProjectile(ProjectileSpec::ice_bolt(
                        origin, target, speed, lifetime,
                    )));
                }
                // Only produced by on_death.
                EnemyAction::Explode { .. } => {}
            }
        }
    }
}

/// EventApplySet: resolve each new death exactly once. Rolls the drop and
/// runs the variant's death side effect. Damage from the side effect lands
/// on the next tick.
pub fn resolve_enemy_deaths(
    clock: Res<CombatClock>,
    mut rng: ResMut<GameRng>,
    player: Query<&Transform, With<Player>>,
    mut enemies: Query<(Entity, &Transform, &mut EnemyRecord, &mut EnemyBrain), (With<Enemy>, Without<Player>)>,
    mut events: MessageWriter<CombatEvent>,
    mut cues: MessageWriter<VisualCue>,
) {
    let player_pos = player.single().ok().map(|tf| tf.translation.truncate());
    let living: Vec<(Entity, Vec2)> = enemies
        .iter()
        .filter(|(_, _, record, _)| !record.is_dead())
        .map(|(e, tf, _, _)| (e, tf.translation.truncate()))
        .collect();

    for (entity, tf, mut record, mut brain) in &mut enemies {
        if !record.is_dead() || record.death_resolved() {
            continue;
        }
        record.died_at = Some(clock.now);
        let position = tf.translation.truncate();

        match record.drop.roll(&mut *rng) {
            DropOutcome::Xp(value) => {
                events.write(CombatEvent::SpawnPickup {
                    position,
                    kind: PickupKind::Xp,
                    value,
                });
            }
            DropOutcome::Health(value) => {
                events.write(CombatEvent::SpawnPickup {
                    position,
                    kind: PickupKind::Health,
                    value,
                });
            }
            DropOutcome::Nothing => {}
        }

        let name = brain.behavior().display_name();
        for action in brain.behavior_mut().on_death(&record, position) {
            let EnemyAction::Explode {
                center,
                radius,
                player_damage,
                enemy_damage,
            } = action
            else {
                continue;
            };
            info!("{name} {entity:?} burst at {center:?}");
            cues.write(VisualCue {
                kind: CueKind::Debris,
                position: center,
                flip_x: false,
                flip_y: false,
                lifetime: 0.6,
            });
            if player_pos.is_some_and(|p| p.distance(center) <= radius) {
                events.write(CombatEvent::DamagePlayer {
                    amount: player_damage,
                    kind: DamageKind::Explosion,
                });
            }
            for (other, pos) in &living {
                if *other != entity && pos.distance(center) <= radius {
                    events.write(CombatEvent::DamageEnemy {
                        dst: *other,
                        amount: enemy_damage,
                        kind: DamageKind::Explosion,
                    });
                }
            }
        }
    }
}

/// CleanupSet: remove dead enemies after the grace delay and free their spawn slot.
pub fn remove_dead_enemies(
    mut commands: Commands,
    clock: Res<CombatClock>,
    mut population: ResMut<EnemyPopulation>,
    enemies: Query<(Entity, &EnemyRecord, &SpawnTag), With<Enemy>>,
) {
    for (entity, record, tag) in &enemies {
        if record.ready_for_removal(clock.now) {
            population.release(tag.0);
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::enemy::{EnemyKind, StateTag};
    use crate::game::stats::base::EnemyBaseStats;

    fn death_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CombatEvent>();
        app.add_message::<VisualCue>();
        app.insert_resource(CombatClock { now: 3.0, delta: 0.0 });
        app.insert_resource(GameRng::seeded(1));
        app.add_systems(Update, resolve_enemy_deaths);
        app
    }

    fn spawn(app: &mut App, kind: EnemyKind, at: Vec2, dead: bool) -> Entity {
        let mut record = EnemyRecord::from_base(&EnemyBaseStats::for_kind(kind));
        if dead {
            record.take_damage(10_000, 0.0);
        }
        app.world_mut()
            .spawn((
                Enemy,
                record,
                EnemyBrain::for_kind(kind),
                Transform::from_translation(at.extend(0.0)),
            ))
            .id()
    }

    fn drain(app: &mut App) -> Vec<CombatEvent> {
        app.world_mut()
            .resource_mut::<Messages<CombatEvent>>()
            .drain()
            .collect()
    }

    #[test]
    fn golem_death_hits_player_and_neighbours_once() {
        let mut app = death_app();
        app.world_mut().spawn((Player, Transform::from_xyz(2.0, 0.0, 0.0)));
        let golem = spawn(&mut app, EnemyKind::RockGolem, Vec2::ZERO, true);
        let near = spawn(&mut app, EnemyKind::Skeleton, Vec2::new(0.0, 3.0), false);
        let _far = spawn(&mut app, EnemyKind::Skeleton, Vec2::new(0.0, 9.0), false);

        app.update();
        let events = drain(&mut app);
        assert!(events.contains(&CombatEvent::DamagePlayer {
            amount: 20,
            kind: DamageKind::Explosion
        }));
        let enemy_hits: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::DamageEnemy { .. }))
            .collect();
        assert_eq!(
            enemy_hits,
            vec![&CombatEvent::DamageEnemy {
                dst: near,
                amount: 50,
                kind: DamageKind::Explosion
            }]
        );
        assert_eq!(app.world().get::<EnemyRecord>(golem).and_then(|r| r.died_at), Some(3.0));

        app.update();
        assert!(drain(&mut app).is_empty());
    }

    #[test]
    fn drop_is_rolled_once_per_death() {
        let mut app = death_app();
        let mut record = EnemyRecord::from_base(&EnemyBaseStats::for_kind(EnemyKind::Skeleton));
        record.drop.item_chance = 1.0;
        record.take_damage(100, 0.0);
        app.world_mut().spawn((
            Enemy,
            record,
            EnemyBrain::for_kind(EnemyKind::Skeleton),
            Transform::from_xyz(4.0, 1.0, 0.0),
        ));

        app.update();
        app.update();
        let events = drain(&mut app);
        assert_eq!(
            events,
            vec![CombatEvent::SpawnPickup {
                position: Vec2::new(4.0, 1.0),
                kind: PickupKind::Xp,
                value: 5,
            }]
        );
    }

    #[test]
    fn enemies_walk_toward_player() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CombatEvent>();
        app.insert_resource(CombatClock { now: 0.0, delta: 0.5 });
        app.add_systems(Update, tick_enemies);
        app.world_mut().spawn((Player, Transform::from_xyz(10.0, 0.0, 0.0)));
        let e = app
            .world_mut()
            .spawn((
                Enemy,
                EnemyRecord::from_base(&EnemyBaseStats::for_kind(EnemyKind::Skeleton)),
                EnemyBrain::for_kind(EnemyKind::Skeleton),
                Knockback::default(),
                Transform::default(),
            ))
            .id();

        app.update();
        let tf = app.world().get::<Transform>(e).map(|t| t.translation);
        assert_eq!(tf, Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(
            app.world().get::<EnemyRecord>(e).map(|r| r.state),
            Some(StateTag::Seeking)
        );
    }
}
