//! Enemy behaviour: shared record + state tag, one `EnemyBehavior`
//! implementation per variant, dispatched through `EnemyBrain`.

pub mod caster;
pub mod charger;
pub mod heavy;
pub mod spawner;
pub mod striker;
pub mod systems;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::cooldown::TimedFlag;
use super::drops::DropProfile;
use super::stats::base::EnemyBaseStats;
use super::stats::types::HealthPool;

pub use caster::Caster;
pub use charger::Charger;
pub use heavy::Heavy;
pub use striker::Striker;

/// Seconds a dead enemy stays in the world before removal.
pub const DEATH_GRACE: f32 = 0.5;
/// Hit flash length on enemies.
pub const HIT_FLASH: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Skeleton,
    Draugr,
    IceGoblin,
    RockGolem,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Skeleton,
        EnemyKind::Draugr,
        EnemyKind::IceGoblin,
        EnemyKind::RockGolem,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTag {
    Striking,
    Charging,
    Casting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTag {
    Spawned,
    Seeking,
    Acting(ActionTag),
    Stunned,
    Dead,
}

/// Health and tuning shared by every enemy variant.
#[derive(Component, Debug, Clone)]
pub struct EnemyRecord {
    pub kind: EnemyKind,
    pub health: HealthPool,
    pub move_speed: f32,
    pub contact_damage: i32,
    pub drop: DropProfile,
    pub radius: f32,
    pub state: StateTag,
    pub hit_flash: TimedFlag,
    /// Set once when the death is resolved (drop rolled, side effect run).
    pub died_at: Option<f32>,
}

impl EnemyRecord {
    pub fn from_base(base: &EnemyBaseStats) -> Self {
        Self {
            kind: base.kind,
            health: HealthPool::full(base.max_health),
            move_speed: base.move_speed,
            contact_damage: base.contact_damage,
            drop: base.drop,
            radius: base.radius,
            state: StateTag::Spawned,
            hit_flash: TimedFlag::default(),
            died_at: None,
        }
    }

    /// Apply damage. Returns true only on the hit that kills.
    pub fn take_damage(&mut self, amount: i32, now: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.hit_flash.start(now, HIT_FLASH);
        if self.health.take(amount) {
            self.state = StateTag::Dead;
            return true;
        }
        false
    }

    pub fn is_dead(&self) -> bool {
        self.state == StateTag::Dead
    }

    pub fn death_resolved(&self) -> bool {
        self.died_at.is_some()
    }

    /// Dead, resolved and past the removal grace.
    pub fn ready_for_removal(&self, now: f32) -> bool {
        self.died_at.is_some_and(|t| now >= t + DEATH_GRACE)
    }
}

/// World snapshot handed to a behaviour each tick.
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    pub now: f32,
    pub position: Vec2,
    pub player: Option<Vec2>,
}

impl EnemyContext {
    pub fn distance_to_player(&self) -> Option<f32> {
        self.player.map(|p| p.distance(self.position))
    }
}

/// Side effects requested by a behaviour, resolved by the systems.
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyAction {
    Strike {
        damage: i32,
    },
    LaunchBolt {
        origin: Vec2,
        target: Vec2,
        speed: f32,
        lifetime: f32,
    },
    Explode {
        center: Vec2,
        radius: f32,
        player_damage: i32,
        enemy_damage: i32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    pub velocity: Vec2,
    pub actions: Vec<EnemyAction>,
}

impl TickOutput {
    pub fn moving(velocity: Vec2) -> Self {
        Self {
            velocity,
            actions: Vec::new(),
        }
    }
}

/// Per-variant behaviour. Implementations hold only variant state;
/// the shared record is passed in.
pub trait EnemyBehavior {
    fn display_name(&self) -> &'static str;

    fn on_start(&mut self, record: &mut EnemyRecord, _now: f32) {
        record.state = StateTag::Seeking;
    }

    fn on_tick(&mut self, record: &mut EnemyRecord, ctx: &EnemyContext) -> TickOutput;

    /// Damage dealt when the player first touches this enemy.
    fn on_player_contact(&self, record: &EnemyRecord) -> i32 {
        record.contact_damage
    }

    fn on_death(&mut self, _record: &EnemyRecord, _position: Vec2) -> Vec<EnemyAction> {
        Vec::new()
    }
}

/// Closed set of enemy behaviours.
#[derive(Component, Debug, Clone)]
pub enum EnemyBrain {
    Striker(Striker),
    Charger(Charger),
    Caster(Caster),
    Heavy(Heavy),
}

impl EnemyBrain {
    pub fn for_kind(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Skeleton => EnemyBrain::Striker(Striker::default()),
            EnemyKind::Draugr => EnemyBrain::Charger(Charger::default()),
            EnemyKind::IceGoblin => EnemyBrain::Caster(Caster::default()),
            EnemyKind::RockGolem => EnemyBrain::Heavy(Heavy::default()),
        }
    }

    pub fn behavior(&self) -> &dyn EnemyBehavior {
        match self {
            EnemyBrain::Striker(b) => b,
            EnemyBrain::Charger(b) => b,
            EnemyBrain::Caster(b) => b,
            EnemyBrain::Heavy(b) => b,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn EnemyBehavior {
        match self {
            EnemyBrain::Striker(b) => b,
            EnemyBrain::Charger(b) => b,
            EnemyBrain::Caster(b) => b,
            EnemyBrain::Heavy(b) => b,
        }
    }

    /// Run one behaviour tick, starting the enemy first if needed.
    /// Dead enemies stand still and act no more.
    pub fn tick(&mut self, record: &mut EnemyRecord, ctx: &EnemyContext) -> TickOutput {
        if record.is_dead() {
            return TickOutput::default();
        }
        if record.state == StateTag::Spawned {
            self.behavior_mut().on_start(record, ctx.now);
        }
        self.behavior_mut().on_tick(record, ctx)
    }
}

/// Velocity toward `target` at `speed`; zero when already there.
pub fn seek(from: Vec2, target: Vec2, speed: f32) -> Vec2 {
    (target - from).normalize_or_zero() * speed
}

/// Default walk toward the player, used by every variant when not acting.
pub fn seek_player(record: &EnemyRecord, ctx: &EnemyContext) -> Vec2 {
    match ctx.player {
        Some(p) => seek(ctx.position, p, record.move_speed),
        None => Vec2::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: EnemyKind) -> EnemyRecord {
        EnemyRecord::from_base(&EnemyBaseStats::for_kind(kind))
    }

    #[test]
    fn death_transition_happens_once() {
        let mut r = record(EnemyKind::Skeleton);
        assert!(!r.take_damage(4, 0.0));
        assert!(r.take_damage(10, 0.1));
        assert!(r.is_dead());
        assert!(!r.take_damage(10, 0.2));
        assert_eq!(r.health.current, 0);
    }

    #[test]
    fn damage_starts_hit_flash() {
        let mut r = record(EnemyKind::RockGolem);
        r.take_damage(1, 2.0);
        assert!(r.hit_flash.is_active(2.05));
        assert!(!r.hit_flash.is_active(2.1));
    }

    #[test]
    fn removal_waits_for_grace() {
        let mut r = record(EnemyKind::Draugr);
        r.take_damage(100, 1.0);
        assert!(!r.ready_for_removal(5.0));
        r.died_at = Some(1.0);
        assert!(!r.ready_for_removal(1.4));
        assert!(r.ready_for_removal(1.5));
    }

    #[test]
    fn first_tick_leaves_spawned_state() {
        let mut r = record(EnemyKind::IceGoblin);
        let mut brain = EnemyBrain::for_kind(EnemyKind::IceGoblin);
        let ctx = EnemyContext {
            now: 0.0,
            position: Vec2::ZERO,
            player: Some(Vec2::new(50.0, 0.0)),
        };
        let out = brain.tick(&mut r, &ctx);
        assert_eq!(r.state, StateTag::Seeking);
        assert!((out.velocity.x - 2.2).abs() < 1e-5);
    }

    #[test]
    fn dead_brain_is_inert() {
        let mut r = record(EnemyKind::Skeleton);
        r.take_damage(100, 0.0);
        let mut brain = EnemyBrain::for_kind(EnemyKind::Skeleton);
        let ctx = EnemyContext {
            now: 0.0,
            position: Vec2::ZERO,
            player: Some(Vec2::new(1.0, 0.0)),
        };
        assert_eq!(brain.tick(&mut r, &ctx), TickOutput::default());
    }

    #[test]
    fn display_names_by_variant() {
        let names: Vec<_> = EnemyKind::ALL
            .into_iter()
            .map(|k| EnemyBrain::for_kind(k).behavior().display_name())
            .collect();
        assert_eq!(names, vec!["Skeleton", "Draugr", "Ice Goblin", "Rock Golem"]);
    }
}
