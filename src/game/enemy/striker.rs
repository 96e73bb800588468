use super::{ActionTag, EnemyAction, EnemyBehavior, EnemyContext, EnemyRecord, StateTag, TickOutput, seek_player};
use crate::game::cooldown::CooldownGate;

/// Skeleton: walks at the player and strikes on a fixed cadence when close.
#[derive(Debug, Clone)]
pub struct Striker {
    pub strike_range: f32,
    pub strike_interval: f32,
    pub gate: CooldownGate,
}

impl Default for Striker {
    fn default() -> Self {
        Self {
            strike_range: 1.5,
            strike_interval: 2.0,
            gate: CooldownGate::ready(),
        }
    }
}

impl EnemyBehavior for Striker {
    fn display_name(&self) -> &'static str {
        "Skeleton"
    }

    fn on_tick(&mut self, record: &mut EnemyRecord, ctx: &EnemyContext) -> TickOutput {
        let mut out = TickOutput::moving(seek_player(record, ctx));

        let in_range = ctx
            .distance_to_player()
            .is_some_and(|d| d <= self.strike_range);
        if !in_range {
            record.state = StateTag::Seeking;
            return out;
        }

        record.state = StateTag::Acting(ActionTag::Striking);
        if self.gate.try_fire(ctx.now, self.strike_interval) {
            out.actions.push(EnemyAction::Strike {
                damage: record.contact_damage,
            });
        }
        out
    }
}
