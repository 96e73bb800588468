use bevy::prelude::*;

use super::components::*;
use super::intent::Intent;
use super::status::effect::SlowEffect;
use crate::config::tuning::Tuning;

/// ClockSet: advance combat time by the fixed step.
pub fn advance_clock(time: Res<Time>, mut clock: ResMut<CombatClock>) {
    clock.advance(time.delta_secs());
}

/// MotionSet: intent × speed × slow → position. Updates facing.
pub fn move_player(
    clock: Res<CombatClock>,
    mut query: Query<(&mut Transform, &Intent, &PlayerSpeed, &mut SlowEffect, &mut Facing), With<Player>>,
) {
    for (mut tf, intent, speed, mut slow, mut facing) in &mut query {
        let factor = slow.tick(clock.now);
        let step = intent.move_dir * speed.0 * factor * clock.delta;
        tf.translation.x += step.x;
        tf.translation.y += step.y;
        facing.update(intent.move_dir);
    }
}

/// Position that resolves a circle/obstacle overlap by pushing the circle out.
pub fn push_out(pos: Vec2, radius: f32, obstacle: Vec2, obstacle_radius: f32) -> Vec2 {
    let delta = pos - obstacle;
    let dist = delta.length();
    let min_dist = radius + obstacle_radius;
    if dist >= min_dist {
        return pos;
    }
    let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };
    obstacle + normal * min_dist
}

/// MotionSet: keep the player outside static obstacles.
pub fn block_player(
    mut player: Query<(&mut Transform, &CollisionRadius), With<Player>>,
    obstacles: Query<(&Transform, &CollisionRadius), (With<ObstacleMarker>, Without<Player>)>,
) {
    for (mut tf, radius) in &mut player {
        let mut pos = tf.translation.truncate();
        for (o_tf, o_r) in &obstacles {
            pos = push_out(pos, radius.0, o_tf.translation.truncate(), o_r.0);
        }
        tf.translation.x = pos.x;
        tf.translation.y = pos.y;
    }
}

/// MotionSet: exponential knockback decay.
pub fn decay_knockback(clock: Res<CombatClock>, tuning: Res<Tuning>, mut query: Query<&mut Knockback>) {
    let keep = (1.0 - tuning.knockback_decay * clock.delta).clamp(0.0, 1.0);
    for mut knockback in &mut query {
        knockback.0 *= keep;
        if knockback.0.length_squared() < 1e-4 {
            knockback.0 = Vec2::ZERO;
        }
    }
}
