use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::components::*;
use super::events::CombatEvent;
use crate::assets_map::AssetsMap;
use crate::config::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Xp,
    Health,
}

/// Orb dropped by a defeated enemy.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pickup {
    pub kind: PickupKind,
    pub value: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagnetTuning {
    pub range: f32,
    pub speed: f32,
}

impl Default for MagnetTuning {
    fn default() -> Self {
        Self { range: 3.0, speed: 3.0 }
    }
}

/// Passive XP attraction around the player, switched on by a level unlock.
#[derive(Component, Debug, Clone)]
pub struct MagnetField {
    pub range: f32,
    pub speed: f32,
    pub active: bool,
}

impl MagnetField {
    pub fn new(tuning: &MagnetTuning) -> Self {
        Self {
            range: tuning.range,
            speed: tuning.speed,
            active: false,
        }
    }

    /// Displacement of an orb at `orb` toward `player` for one tick.
    pub fn pull(&self, orb: Vec2, player: Vec2, delta: f32) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        let to_player = player - orb;
        let dist = to_player.length();
        if dist > self.range || dist <= f32::EPSILON {
            return Vec2::ZERO;
        }
        let step = (self.speed * delta).min(dist);
        to_player / dist * step
    }
}

// ── Systems ─────────────────────────────────────────────────────────

/// EventApplySet: drop orbs where enemies died.
pub fn spawn_pickups(mut commands: Commands, palette: Res<AssetsMap>, mut events: MessageReader<CombatEvent>) {
    for event in events.read() {
        let CombatEvent::SpawnPickup { position, kind, value } = event else {
            continue;
        };
        commands.spawn((
            InGame,
            Pickup {
                kind: *kind,
                value: *value,
            },
            Sprite::from_color(palette.pickup_color(*kind), Vec2::splat(0.3)),
            Transform::from_translation(position.extend(0.5)),
        ));
    }
}

/// MotionSet: magnet pulls XP orbs in.
pub fn magnet_pull(
    clock: Res<CombatClock>,
    player: Query<(&Transform, &MagnetField), With<Player>>,
    mut orbs: Query<(&mut Transform, &Pickup), Without<Player>>,
) {
    let Ok((player_tf, magnet)) = player.single() else {
        return;
    };
    let target = player_tf.translation.truncate();
    for (mut tf, pickup) in &mut orbs {
        if pickup.kind != PickupKind::Xp {
            continue;
        }
        let step = magnet.pull(tf.translation.truncate(), target, clock.delta);
        tf.translation.x += step.x;
        tf.translation.y += step.y;
    }
}

/// EventGenerateSet: collect orbs touching the player.
pub fn collect_pickups(
    mut commands: Commands,
    tuning: Res<Tuning>,
    player: Query<&Transform, With<Player>>,
    orbs: Query<(Entity, &Transform, &Pickup), Without<Player>>,
    mut events: MessageWriter<CombatEvent>,
) {
    let Ok(player_tf) = player.single() else {
        return;
    };
    let player_pos = player_tf.translation.truncate();
    for (entity, tf, pickup) in &orbs {
        if tf.translation.truncate().distance(player_pos) > tuning.pickup_radius {
            continue;
        }
        match pickup.kind {
            PickupKind::Xp => events.write(CombatEvent::GrantXp { amount: pickup.value }),
            PickupKind::Health => events.write(CombatEvent::HealPlayer { amount: pickup.value }),
        };
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magnet(active: bool) -> MagnetField {
        MagnetField {
            active,
            ..MagnetField::new(&MagnetTuning::default())
        }
    }

    #[test]
    fn inactive_magnet_does_nothing() {
        assert_eq!(magnet(false).pull(Vec2::new(1.0, 0.0), Vec2::ZERO, 1.0), Vec2::ZERO);
    }

    #[test]
    fn pulls_only_inside_range() {
        let m = magnet(true);
        assert_eq!(m.pull(Vec2::new(2.0, 0.0), Vec2::ZERO, 0.1), Vec2::new(-0.3, 0.0));
        assert_eq!(m.pull(Vec2::new(3.5, 0.0), Vec2::ZERO, 0.1), Vec2::ZERO);
    }

    #[test]
    fn pull_never_overshoots() {
        let m = magnet(true);
        assert_eq!(m.pull(Vec2::new(0.0, 0.1), Vec2::ZERO, 1.0), Vec2::new(0.0, -0.1));
    }

    #[test]
    fn collecting_orbs_grants_xp_and_heals() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CombatEvent>();
        app.insert_resource(Tuning::default());
        app.add_systems(Update, collect_pickups);
        app.world_mut().spawn((Player, Transform::default()));
        let xp = app
            .world_mut()
            .spawn((Pickup { kind: PickupKind::Xp, value: 35 }, Transform::from_xyz(0.3, 0.0, 0.0)))
            .id();
        app.world_mut()
            .spawn((Pickup { kind: PickupKind::Health, value: 20 }, Transform::from_xyz(0.0, 0.4, 0.0)));
        let far = app
            .world_mut()
            .spawn((Pickup { kind: PickupKind::Xp, value: 5 }, Transform::from_xyz(2.0, 0.0, 0.0)))
            .id();

        app.update();
        let mut events: Vec<_> = app
            .world_mut()
            .resource_mut::<Messages<CombatEvent>>()
            .drain()
            .collect();
        events.sort_by_key(|e| matches!(e, CombatEvent::HealPlayer { .. }));
        assert_eq!(
            events,
            vec![
                CombatEvent::GrantXp { amount: 35 },
                CombatEvent::HealPlayer { amount: 20 }
            ]
        );
        assert!(app.world().get_entity(xp).is_err());
        assert!(app.world().get_entity(far).is_ok());
    }
}
