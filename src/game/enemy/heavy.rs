use bevy::math::Vec2;

use super::{EnemyAction, EnemyBehavior, EnemyContext, EnemyRecord, StateTag, TickOutput, seek_player};

/// Rock Golem: slow walker that bursts when it dies.
#[derive(Debug, Clone)]
pub struct Heavy {
    pub explosion_radius: f32,
    pub player_damage: i32,
    pub enemy_damage: i32,
    pub exploded: bool,
}

impl Default for Heavy {
    fn default() -> Self {
        Self {
            explosion_radius: 3.5,
            player_damage: 20,
            enemy_damage: 50,
            exploded: false,
        }
    }
}

impl EnemyBehavior for Heavy {
    fn display_name(&self) -> &'static str {
        "Rock Golem"
    }

    fn on_tick(&mut self, record: &mut EnemyRecord, ctx: &EnemyContext) -> TickOutput {
        record.state = StateTag::Seeking;
        TickOutput::moving(seek_player(record, ctx))
    }

    fn on_death(&mut self, _record: &EnemyRecord, position: Vec2) -> Vec<EnemyAction> {
        if self.exploded {
            return Vec::new();
        }
        self.exploded = true;
        vec![EnemyAction::Explode {
            center: position,
            radius: self.explosion_radius,
            player_damage: self.player_damage,
            enemy_damage: self.enemy_damage,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::enemy::EnemyKind;
    use crate::game::stats::base::EnemyBaseStats;

    #[test]
    fn explodes_only_once() {
        let record = EnemyRecord::from_base(&EnemyBaseStats::for_kind(EnemyKind::RockGolem));
        let mut h = Heavy::default();
        let first = h.on_death(&record, Vec2::new(2.0, 3.0));
        assert_eq!(
            first,
            vec![EnemyAction::Explode {
                center: Vec2::new(2.0, 3.0),
                radius: 3.5,
                player_damage: 20,
                enemy_damage: 50,
            }]
        );
        assert!(h.on_death(&record, Vec2::ZERO).is_empty());
    }

    #[test]
    fn walks_slowly() {
        let mut record = EnemyRecord::from_base(&EnemyBaseStats::for_kind(EnemyKind::RockGolem));
        let mut h = Heavy::default();
        let ctx = EnemyContext {
            now: 0.0,
            position: Vec2::ZERO,
            player: Some(Vec2::new(0.0, -3.0)),
        };
        assert_eq!(h.on_tick(&mut record, &ctx).velocity, Vec2::new(0.0, -0.8));
    }
}
