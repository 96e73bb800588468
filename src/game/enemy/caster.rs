use super::{ActionTag, EnemyAction, EnemyBehavior, EnemyContext, EnemyRecord, StateTag, TickOutput, seek_player};
use crate::game::cooldown::CooldownGate;

/// Ice Goblin: walks at the player and lobs ice bolts from range.
#[derive(Debug, Clone)]
pub struct Caster {
    pub cast_range: f32,
    pub cast_interval: f32,
    pub bolt_speed: f32,
    pub bolt_lifetime: f32,
    pub gate: CooldownGate,
}

impl Default for Caster {
    fn default() -> Self {
        Self {
            cast_range: 10.0,
            cast_interval: 2.5,
            bolt_speed: 4.0,
            bolt_lifetime: 8.0,
            gate: CooldownGate::ready(),
        }
    }
}

impl EnemyBehavior for Caster {
    fn display_name(&self) -> &'static str {
        "Ice Goblin"
    }

    fn on_tick(&mut self, record: &mut EnemyRecord, ctx: &EnemyContext) -> TickOutput {
        let mut out = TickOutput::moving(seek_player(record, ctx));

        let Some(player) = ctx.player else {
            record.state = StateTag::Seeking;
            return out;
        };
        if ctx.position.distance(player) > self.cast_range {
            record.state = StateTag::Seeking;
            return out;
        }

        record.state = StateTag::Acting(ActionTag::Casting);
        if self.gate.try_fire(ctx.now, self.cast_interval) {
            out.actions.push(EnemyAction::LaunchBolt {
                origin: ctx.position,
                target: player,
                speed: self.bolt_speed,
                lifetime: self.bolt_lifetime,
            });
        }
        out
    }
}
