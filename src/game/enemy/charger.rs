use bevy::math::Vec2;

use super::{ActionTag, EnemyBehavior, EnemyContext, EnemyRecord, StateTag, TickOutput, seek, seek_player};
use crate::game::cooldown::{CooldownGate, TimedFlag};

/// Draugr: closes in, then charges at a locked-in point and stuns itself on arrival.
#[derive(Debug, Clone)]
pub struct Charger {
    pub charge_range: f32,
    pub charge_interval: f32,
    pub charge_speed: f32,
    pub arrive_distance: f32,
    pub stun_duration: f32,
    pub gate: CooldownGate,
    pub target: Option<Vec2>,
    pub stun: TimedFlag,
}

impl Default for Charger {
    fn default() -> Self {
        Self {
            charge_range: 3.0,
            charge_interval: 5.0,
            charge_speed: 4.0,
            arrive_distance: 0.5,
            stun_duration: 1.0,
            gate: CooldownGate::ready(),
            target: None,
            stun: TimedFlag::default(),
        }
    }
}

impl Charger {
    pub fn is_charging(&self, record: &EnemyRecord) -> bool {
        record.state == StateTag::Acting(ActionTag::Charging)
    }

    fn charge_toward(&mut self, record: &mut EnemyRecord, ctx: &EnemyContext, target: Vec2) -> Vec2 {
        if ctx.position.distance(target) <= self.arrive_distance {
            record.state = StateTag::Stunned;
            self.target = None;
            self.stun.start(ctx.now, self.stun_duration);
            return Vec2::ZERO;
        }
        seek(ctx.position, target, self.charge_speed)
    }
}

impl EnemyBehavior for Charger {
    fn display_name(&self) -> &'static str {
        "Draugr"
    }

    fn on_tick(&mut self, record: &mut EnemyRecord, ctx: &EnemyContext) -> TickOutput {
        match record.state {
            StateTag::Stunned => {
                if self.stun.is_active(ctx.now) {
                    return TickOutput::default();
                }
                self.stun.clear();
                record.state = StateTag::Seeking;
            }
            StateTag::Acting(ActionTag::Charging) => {
                if let Some(target) = self.target {
                    return TickOutput::moving(self.charge_toward(record, ctx, target));
                }
                record.state = StateTag::Seeking;
            }
            _ => {}
        }

        let close = ctx
            .distance_to_player()
            .is_some_and(|d| d <= self.charge_range);
        if let (true, Some(player)) = (close, ctx.player) {
            if self.gate.try_fire(ctx.now, self.charge_interval) {
                self.target = Some(player);
                record.state = StateTag::Acting(ActionTag::Charging);
                return TickOutput::moving(self.charge_toward(record, ctx, player));
            }
        }

        record.state = StateTag::Seeking;
        TickOutput::moving(seek_player(record, ctx))
    }

    fn on_player_contact(&self, record: &EnemyRecord) -> i32 {
        if self.is_charging(record) {
            record.contact_damage * 2
        } else {
            record.contact_damage
        }
    }
}
