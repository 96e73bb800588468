//! Sprite tinting and one-shot effects. Reads combat state, never writes it.

use bevy::prelude::*;

use super::components::*;
use super::enemy::EnemyRecord;
use super::events::VisualCue;
use super::shield::ShieldZone;
use super::status::effect::PlayerStatus;
use crate::assets_map::AssetsMap;

const HIT_TINT: Color = Color::srgb(1.0, 0.3, 0.3);
const FROZEN_TINT: Color = Color::srgb(0.55, 0.8, 1.0);
const DEAD_TINT: Color = Color::srgba(0.3, 0.3, 0.3, 0.5);

/// EventApplySet: spawn slash and debris sprites with a lifetime.
pub fn spawn_visual_cues(
    mut commands: Commands,
    clock: Res<CombatClock>,
    palette: Res<AssetsMap>,
    mut cues: MessageReader<VisualCue>,
) {
    for cue in cues.read() {
        let mut sprite = Sprite::from_color(palette.cue_color(cue.kind), Vec2::new(1.0, 0.4));
        sprite.flip_x = cue.flip_x;
        sprite.flip_y = cue.flip_y;
        commands.spawn((
            InGame,
            sprite,
            Transform::from_translation(cue.position.extend(2.0)),
            ExpiresAt(clock.now + cue.lifetime),
        ));
    }
}

/// Update: enemies flash red when hit and grey out once dead.
pub fn tint_enemies(clock: Res<CombatClock>, palette: Res<AssetsMap>, mut query: Query<(&EnemyRecord, &mut Sprite)>) {
    for (record, mut sprite) in &mut query {
        sprite.color = if record.is_dead() {
            DEAD_TINT
        } else if record.hit_flash.is_active(clock.now) {
            HIT_TINT
        } else {
            palette.enemy_color(record.kind)
        };
    }
}

/// Update: frozen tint wins over the hit flash.
pub fn tint_player(
    clock: Res<CombatClock>,
    palette: Res<AssetsMap>,
    mut query: Query<(&PlayerStatus, &mut Sprite), With<Player>>,
) {
    for (status, mut sprite) in &mut query {
        sprite.color = if status.frozen.is_active(clock.now) {
            FROZEN_TINT
        } else if status.show_flash(clock.now) {
            HIT_TINT
        } else {
            palette.player
        };
    }
}

/// Update: the shield is hidden until unlocked and flickers while cooling down.
pub fn flicker_shield(
    clock: Res<CombatClock>,
    palette: Res<AssetsMap>,
    mut query: Query<(&ShieldZone, &mut Sprite, &mut Visibility)>,
) {
    for (shield, mut sprite, mut visibility) in &mut query {
        if !shield.active {
            *visibility = Visibility::Hidden;
            continue;
        }
        *visibility = Visibility::Inherited;
        let base = palette.shield.alpha();
        sprite.color = palette.shield.with_alpha(base * shield.flicker_alpha(clock.now));
    }
}

/// Update: camera tracks the player.
pub fn camera_follow(
    player: Query<&Transform, With<Player>>,
    mut camera: Query<&mut Transform, (With<MainCamera>, Without<Player>)>,
) {
    let Ok(player_tf) = player.single() else {
        return;
    };
    for mut tf in &mut camera {
        tf.translation.x = player_tf.translation.x;
        tf.translation.y = player_tf.translation.y;
    }
}

/// CleanupSet: despawn anything whose lifetime ran out.
pub fn expire_timed(mut commands: Commands, clock: Res<CombatClock>, query: Query<(Entity, &ExpiresAt)>) {
    for (entity, expires) in &query {
        if clock.now >= expires.0 {
            commands.entity(entity).despawn();
        }
    }
}
