use bevy::prelude::*;

use super::attack::{Arsenal, VOLLEY_ANCHOR, volley};
use super::collision::SpatialIndex;
use super::components::*;
use super::enemy::{EnemyBrain, EnemyRecord};
use super::events::{CombatEvent, ContactMessage, ContactPhase, CueKind, VisualCue};
use super::level_up::LevelUpQueue;
use super::pickups::MagnetField;
use super::progression::{PlayerHit, ProgressionLedger, Unlock};
use super::projectile::ProjectileSpec;
use super::stats::types::DamageKind;
use super::status::effect::{PlayerStatus, SlowEffect, frozen_duration};
use crate::config::tuning::Tuning;

/// EventGenerateSet: sword swings and fireball volleys on their gates.
pub fn player_attacks(
    clock: Res<CombatClock>,
    index: Res<SpatialIndex>,
    mut player: Query<(&Transform, &Facing, &mut Arsenal), With<Player>>,
    mut events: MessageWriter<CombatEvent>,
    mut cues: MessageWriter<VisualCue>,
) {
    let Ok((tf, facing, mut arsenal)) = player.single_mut() else {
        return;
    };
    let pos = tf.translation.truncate();

    if arsenal.try_swing(clock.now) {
        // No per-target cooldown: everything in reach takes the hit.
        for (enemy, _) in index.enemies_within(pos, arsenal.sword.range) {
            events.write(CombatEvent::DamageEnemy {
                dst: enemy,
                amount: arsenal.sword.current_damage,
                kind: DamageKind::Sword,
            });
        }
        cues.write(VisualCue {
            kind: CueKind::Slash,
            position: pos + Vec2::new(if facing.left { -0.6 } else { 0.6 }, 0.0),
            flip_x: facing.left,
            flip_y: false,
            lifetime: 0.2,
        });
    }

    if arsenal.try_volley(clock.now) {
        let fireball = &arsenal.fireball;
        for slot in volley(fireball.projectile_count, facing.left, VOLLEY_ANCHOR) {
            events.write(CombatEvent::SpawnProjectile(ProjectileSpec::fireball(
                pos + slot.offset,
                slot.direction,
                fireball.projectile_speed,
                fireball.current_damage,
                fireball.range,
                fireball.projectile_lifetime,
                slot.flip_x,
                slot.flip_y,
            )));
        }
    }
}

/// EventGenerateSet: body contact damage when an enemy first touches the player.
pub fn resolve_player_contacts(
    mut contacts: MessageReader<ContactMessage>,
    player: Query<Entity, With<Player>>,
    enemies: Query<(&EnemyRecord, &EnemyBrain), With<Enemy>>,
    mut events: MessageWriter<CombatEvent>,
) {
    let Ok(player) = player.single() else {
        contacts.clear();
        return;
    };
    for msg in contacts.read() {
        if msg.a != player || msg.phase != ContactPhase::Enter {
            continue;
        }
        let Ok((record, brain)) = enemies.get(msg.b) else {
            continue;
        };
        if record.is_dead() {
            continue;
        }
        events.write(CombatEvent::DamagePlayer {
            amount: brain.behavior().on_player_contact(record),
            kind: DamageKind::Contact,
        });
    }
}

/// EventApplySet: apply damage, heals, slows and XP. Level-ups are queued
/// for the choice panel and unlocks are applied immediately.
#[allow(clippy::type_complexity)]
pub fn apply_combat_events(
    clock: Res<CombatClock>,
    tuning: Res<Tuning>,
    mut events: MessageReader<CombatEvent>,
    mut queue: ResMut<LevelUpQueue>,
    mut player: Query<
        (
            &mut ProgressionLedger,
            &mut SlowEffect,
            &mut PlayerStatus,
            &mut Arsenal,
            &mut MagnetField,
        ),
        With<Player>,
    >,
    mut enemies: Query<&mut EnemyRecord, With<Enemy>>,
) {
    let now = clock.now;
    let mut player = player.single_mut().ok();

    for event in events.read() {
        match event {
            CombatEvent::DamageEnemy { dst, amount, kind } => {
                let Ok(mut record) = enemies.get_mut(*dst) else {
                    continue;
                };
                if record.take_damage(*amount, now) {
                    debug!("{:?} {dst:?} killed by {kind:?}", record.kind);
                }
            }
            CombatEvent::DamagePlayer { amount, kind } => {
                let Some((ledger, _, status, _, _)) = player.as_mut() else {
                    continue;
                };
                match ledger.take_damage(*amount, now, tuning.invincibility) {
                    PlayerHit::Ignored => {}
                    PlayerHit::Hurt => status.flash.start(now, tuning.hit_flash),
                    PlayerHit::Killed => {
                        status.flash.start(now, tuning.hit_flash);
                        info!("Player killed by {kind:?} at level {}", ledger.current_level);
                    }
                }
            }
            CombatEvent::SlowPlayer { multiplier, duration } => {
                let Some((_, slow, status, _, _)) = player.as_mut() else {
                    continue;
                };
                slow.apply(now, *multiplier, *duration);
                status.frozen.extend(now, frozen_duration(*duration));
            }
            CombatEvent::HealPlayer { amount } => {
                if let Some((ledger, _, _, _, _)) = player.as_mut() {
                    ledger.heal(*amount);
                }
            }
            CombatEvent::GrantXp { amount } => {
                let Some((ledger, _, _, arsenal, magnet)) = player.as_mut() else {
                    continue;
                };
                for level_up in ledger.gain_xp(*amount) {
                    info!("Level up: {}", level_up.level);
                    for unlock in &level_up.unlocks {
                        match unlock {
                            Unlock::Fireball => arsenal.unlock_fireball(),
                            Unlock::Magnet => magnet.active = true,
                        }
                        info!("Unlocked {unlock:?}");
                    }
                    queue.push(level_up.level);
                }
            }
            CombatEvent::SpawnProjectile(_) | CombatEvent::SpawnPickup { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::attack::AttackProfile;
    use crate::game::enemy::EnemyKind;
    use crate::game::pickups::MagnetTuning;
    use crate::game::progression::ProgressionCurve;
    use crate::game::stats::base::EnemyBaseStats;

    fn spawn_player(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                Transform::default(),
                Facing::default(),
                ProgressionLedger::new(ProgressionCurve::default(), 100),
                SlowEffect::default(),
                PlayerStatus::default(),
                Arsenal::new(AttackProfile::sword(), AttackProfile::fireball()),
                MagnetField::new(&MagnetTuning::default()),
            ))
            .id()
    }

    fn apply_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CombatEvent>();
        app.insert_resource(Tuning::default());
        app.insert_resource(CombatClock { now: 1.0, delta: 0.0 });
        app.init_resource::<LevelUpQueue>();
        app.add_systems(Update, apply_combat_events);
        app
    }

    #[test]
    fn xp_crossing_level_four_unlocks_fireball() {
        let mut app = apply_app();
        let player = spawn_player(&mut app);
        app.world_mut().write_message(CombatEvent::GrantXp { amount: 30 + 41 + 55 });
        app.update();

        let ledger = app.world().get::<ProgressionLedger>(player).map(|l| l.current_level);
        assert_eq!(ledger, Some(4));
        assert!(app.world().get::<Arsenal>(player).is_some_and(|a| a.fireball_unlocked));
        assert_eq!(app.world().resource::<LevelUpQueue>().pending_len(), 3);
    }

    #[test]
    fn first_volley_after_reaching_level_four_is_one_fireball() {
        let mut app = apply_app();
        app.add_message::<VisualCue>();
        app.init_resource::<SpatialIndex>();
        app.add_systems(Update, player_attacks.before(apply_combat_events));
        let player = spawn_player(&mut app);
        if let Some(mut ledger) = app.world_mut().get_mut::<ProgressionLedger>(player) {
            ledger.gain_xp(30 + 41);
            assert_eq!(ledger.current_level, 3);
        }

        app.world_mut().write_message(CombatEvent::GrantXp { amount: 55 });
        app.update();
        let before = app
            .world_mut()
            .resource_mut::<Messages<CombatEvent>>()
            .drain()
            .filter(|e| matches!(e, CombatEvent::SpawnProjectile(_)))
            .count();
        assert_eq!(before, 0);
        assert!(app.world().get::<Arsenal>(player).is_some_and(|a| a.fireball_unlocked));

        app.update();
        let volley: Vec<_> = app
            .world_mut()
            .resource_mut::<Messages<CombatEvent>>()
            .drain()
            .filter_map(|e| match e {
                CombatEvent::SpawnProjectile(spec) => Some(spec),
                _ => None,
            })
            .collect();
        assert_eq!(volley.len(), 1);
        assert_eq!(volley[0].damage, 15);
    }

    #[test]
    fn invincibility_swallows_second_hit_in_same_tick() {
        let mut app = apply_app();
        let player = spawn_player(&mut app);
        for _ in 0..2 {
            app.world_mut().write_message(CombatEvent::DamagePlayer {
                amount: 10,
                kind: DamageKind::Contact,
            });
        }
        app.update();
        let hp = app.world().get::<ProgressionLedger>(player).map(|l| l.health.current);
        assert_eq!(hp, Some(90));
        assert!(app.world().get::<PlayerStatus>(player).is_some_and(|s| s.flash.is_active(1.05)));
    }

    #[test]
    fn ice_slow_sets_frozen_tint() {
        let mut app = apply_app();
        let player = spawn_player(&mut app);
        app.world_mut().write_message(CombatEvent::SlowPlayer {
            multiplier: 0.75,
            duration: 3.0,
        });
        app.update();
        let status = app.world().get::<PlayerStatus>(player).cloned();
        assert!(status.is_some_and(|s| s.frozen.is_active(6.9) && !s.frozen.is_active(7.1)));
        let slow = app.world().get::<SlowEffect>(player).map(|s| s.multiplier.0);
        assert_eq!(slow, Some(0.75));
    }

    #[test]
    fn damage_to_missing_enemy_is_skipped() {
        let mut app = apply_app();
        spawn_player(&mut app);
        let gone = app.world_mut().spawn_empty().id();
        app.world_mut().despawn(gone);
        app.world_mut().write_message(CombatEvent::DamageEnemy {
            dst: gone,
            amount: 10,
            kind: DamageKind::Sword,
        });
        app.update();
    }

    #[test]
    fn sword_hits_every_enemy_in_reach() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CombatEvent>();
        app.add_message::<VisualCue>();
        app.insert_resource(CombatClock::default());
        app.init_resource::<SpatialIndex>();
        app.add_systems(Update, player_attacks);
        spawn_player(&mut app);

        let near: Vec<Entity> = (0..2).map(|_| app.world_mut().spawn_empty().id()).collect();
        let far = app.world_mut().spawn_empty().id();
        {
            let mut index = app.world_mut().resource_mut::<SpatialIndex>();
            index.insert(near[0], Vec2::new(1.0, 0.0), 0.45);
            index.insert(near[1], Vec2::new(0.0, -2.0), 0.45);
            index.insert(far, Vec2::new(4.0, 0.0), 0.45);
        }

        app.update();
        let hits: Vec<Entity> = app
            .world_mut()
            .resource_mut::<Messages<CombatEvent>>()
            .drain()
            .filter_map(|e| match e {
                CombatEvent::DamageEnemy { dst, amount: 10, kind: DamageKind::Sword } => Some(dst),
                _ => None,
            })
            .collect();
        assert_eq!(hits, near);
    }

    #[test]
    fn unlocked_volley_spawns_count_projectiles() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CombatEvent>();
        app.add_message::<VisualCue>();
        app.insert_resource(CombatClock::default());
        app.init_resource::<SpatialIndex>();
        app.add_systems(Update, player_attacks);
        let player = spawn_player(&mut app);
        if let Some(mut arsenal) = app.world_mut().get_mut::<Arsenal>(player) {
            arsenal.unlock_fireball();
            arsenal.fireball.projectile_count = 4;
        }

        app.update();
        let volleys = app
            .world_mut()
            .resource_mut::<Messages<CombatEvent>>()
            .drain()
            .filter(|e| matches!(e, CombatEvent::SpawnProjectile(_)))
            .count();
        assert_eq!(volleys, 4);
    }

    #[test]
    fn charging_draugr_contact_is_doubled() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<ContactMessage>();
        app.add_message::<CombatEvent>();
        app.add_systems(Update, resolve_player_contacts);
        let player = app.world_mut().spawn(Player).id();

        let mut record = EnemyRecord::from_base(&EnemyBaseStats::for_kind(EnemyKind::Draugr));
        record.state = crate::game::enemy::StateTag::Acting(crate::game::enemy::ActionTag::Charging);
        let draugr = app
            .world_mut()
            .spawn((Enemy, record, EnemyBrain::for_kind(EnemyKind::Draugr)))
            .id();

        app.world_mut().write_message(ContactMessage {
            a: player,
            b: draugr,
            phase: ContactPhase::Enter,
        });
        app.world_mut().write_message(ContactMessage {
            a: player,
            b: draugr,
            phase: ContactPhase::Stay,
        });
        app.update();
        let events: Vec<_> = app
            .world_mut()
            .resource_mut::<Messages<CombatEvent>>()
            .drain()
            .collect();
        assert_eq!(
            events,
            vec![CombatEvent::DamagePlayer {
                amount: 16,
                kind: DamageKind::Contact
            }]
        );
    }
}
