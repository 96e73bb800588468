use bevy::prelude::*;

use super::collision::SpatialIndex;
use super::components::*;
use super::events::CombatEvent;
use super::stats::types::DamageKind;
use crate::assets_map::AssetsMap;

pub const ICE_BOLT_DAMAGE: i32 = 15;
pub const ICE_BOLT_SLOW: SlowPayload = SlowPayload {
    multiplier: 0.75,
    duration: 3.0,
};
pub const FIREBALL_RADIUS: f32 = 0.3;
pub const ICE_BOLT_RADIUS: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileTarget {
    Enemies,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowPayload {
    pub multiplier: f32,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileMotion {
    /// No direction yet. Does not move and never hits.
    Uninitialized,
    /// Fixed heading, consumed by distance travelled.
    Straight {
        velocity: Vec2,
        max_range: f32,
        traveled: f32,
    },
    /// Heading fixed once toward a target snapshot.
    Aimed { velocity: Vec2 },
}

impl ProjectileMotion {
    pub fn straight(direction: Vec2, speed: f32, max_range: f32) -> Self {
        let dir = direction.normalize_or_zero();
        if dir == Vec2::ZERO {
            return Self::Uninitialized;
        }
        Self::Straight {
            velocity: dir * speed,
            max_range,
            traveled: 0.0,
        }
    }

    pub fn aimed(origin: Vec2, target: Vec2, speed: f32) -> Self {
        let dir = (target - origin).normalize_or_zero();
        if dir == Vec2::ZERO {
            return Self::Uninitialized;
        }
        Self::Aimed { velocity: dir * speed }
    }
}

/// Everything needed to spawn a projectile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSpec {
    pub origin: Vec2,
    pub motion: ProjectileMotion,
    pub damage: i32,
    pub target: ProjectileTarget,
    pub kind: DamageKind,
    pub lifetime: f32,
    pub radius: f32,
    pub slow: Option<SlowPayload>,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl ProjectileSpec {
    #[allow(clippy::too_many_arguments)]
    pub fn fireball(
        origin: Vec2,
        direction: Vec2,
        speed: f32,
        damage: i32,
        range: f32,
        lifetime: f32,
        flip_x: bool,
        flip_y: bool,
    ) -> Self {
        Self {
            origin,
            motion: ProjectileMotion::straight(direction, speed, range),
            damage,
            target: ProjectileTarget::Enemies,
            kind: DamageKind::Fireball,
            lifetime,
            radius: FIREBALL_RADIUS,
            slow: None,
            flip_x,
            flip_y,
        }
    }

    pub fn ice_bolt(origin: Vec2, target: Vec2, speed: f32, lifetime: f32) -> Self {
        Self {
            origin,
            motion: ProjectileMotion::aimed(origin, target, speed),
            damage: ICE_BOLT_DAMAGE,
            target: ProjectileTarget::Player,
            kind: DamageKind::IceBolt,
            lifetime,
            radius: ICE_BOLT_RADIUS,
            slow: Some(ICE_BOLT_SLOW),
            flip_x: target.x < origin.x,
            flip_y: false,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub motion: ProjectileMotion,
    pub damage: i32,
    pub target: ProjectileTarget,
    pub kind: DamageKind,
    pub expires_at: f32,
    pub slow: Option<SlowPayload>,
}

impl Projectile {
    pub fn from_spec(spec: &ProjectileSpec, now: f32) -> Self {
        Self {
            motion: spec.motion,
            damage: spec.damage,
            target: spec.target,
            kind: spec.kind,
            expires_at: now + spec.lifetime,
            slow: spec.slow,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.motion == ProjectileMotion::Uninitialized
    }

    /// Advance one tick. Returns the displacement and whether the projectile is spent.
    pub fn step(&mut self, delta: f32, now: f32) -> (Vec2, bool) {
        let expired = now >= self.expires_at;
        match &mut self.motion {
            ProjectileMotion::Uninitialized => (Vec2::ZERO, expired),
            ProjectileMotion::Straight {
                velocity,
                max_range,
                traveled,
            } => {
                let step = *velocity * delta;
                *traveled += step.length();
                (step, expired || *traveled >= *max_range)
            }
            ProjectileMotion::Aimed { velocity } => (*velocity * delta, expired),
        }
    }
}

// ── Systems ─────────────────────────────────────────────────────────

/// EventApplySet: spawn requested projectiles.
pub fn spawn_projectiles(
    mut commands: Commands,
    clock: Res<CombatClock>,
    palette: Res<AssetsMap>,
    mut events: MessageReader<CombatEvent>,
) {
    for event in events.read() {
        let CombatEvent::SpawnProjectile(spec) = event else {
            continue;
        };
        let mut sprite = Sprite::from_color(palette.projectile_color(spec.kind), Vec2::splat(spec.radius * 2.0));
        sprite.flip_x = spec.flip_x;
        sprite.flip_y = spec.flip_y;
        commands.spawn((
            InGame,
            Projectile::from_spec(spec, clock.now),
            CollisionRadius(spec.radius),
            sprite,
            Transform::from_translation(spec.origin.extend(2.0)),
        ));
    }
}

/// MotionSet: integrate projectile movement and retire spent ones.
pub fn move_projectiles(
    mut commands: Commands,
    clock: Res<CombatClock>,
    mut query: Query<(Entity, &mut Transform, &mut Projectile)>,
) {
    for (entity, mut tf, mut projectile) in &mut query {
        let (step, spent) = projectile.step(clock.delta, clock.now);
        tf.translation.x += step.x;
        tf.translation.y += step.y;
        if spent {
            commands.entity(entity).despawn();
        }
    }
}

/// EventGenerateSet: obstacle, enemy and player hits. One hit per projectile.
pub fn projectile_hits(
    mut commands: Commands,
    index: Res<SpatialIndex>,
    player: Query<(&Transform, &CollisionRadius), With<Player>>,
    obstacles: Query<(&Transform, &CollisionRadius), (With<ObstacleMarker>, Without<Player>)>,
    projectiles: Query<(Entity, &Transform, &CollisionRadius, &Projectile)>,
    mut events: MessageWriter<CombatEvent>,
) {
    let player_body = player
        .single()
        .ok()
        .map(|(tf, r)| (tf.translation.truncate(), r.0));

    for (entity, tf, radius, projectile) in &projectiles {
        if projectile.is_inert() {
            continue;
        }
        let pos = tf.translation.truncate();

        let blocked = obstacles
            .iter()
            .any(|(o_tf, o_r)| o_tf.translation.truncate().distance(pos) < o_r.0 + radius.0);
        if blocked {
            commands.entity(entity).despawn();
            continue;
        }

        match projectile.target {
            ProjectileTarget::Enemies => {
                if let Some(enemy) = index.first_touching(pos, radius.0) {
                    events.write(CombatEvent::DamageEnemy {
                        dst: enemy,
                        amount: projectile.damage,
                        kind: projectile.kind,
                    });
                    commands.entity(entity).despawn();
                }
            }
            ProjectileTarget::Player => {
                let Some((p_pos, p_r)) = player_body else {
                    continue;
                };
                if p_pos.distance(pos) >= p_r + radius.0 {
                    continue;
                }
                events.write(CombatEvent::DamagePlayer {
                    amount: projectile.damage,
                    kind: projectile.kind,
                });
                if let Some(slow) = projectile.slow {
                    events.write(CombatEvent::SlowPlayer {
                        multiplier: slow.multiplier,
                        duration: slow.duration,
                    });
                }
                commands.entity(entity).despawn();
            }
        }
    }
}
