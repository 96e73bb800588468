use serde::{Deserialize, Serialize};

use crate::game::drops::DropProfile;
use crate::game::enemy::EnemyKind;

/// Immutable archetype parameters for an enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBaseStats {
    pub kind: EnemyKind,
    pub move_speed: f32,
    pub max_health: i32,
    pub contact_damage: i32,
    pub drop: DropProfile,
    /// Body radius in world units (contact checks).
    pub radius: f32,
}

impl Default for EnemyBaseStats {
    fn default() -> Self {
        Self {
            kind: EnemyKind::Skeleton,
            move_speed: 2.0,
            max_health: 10,
            contact_damage: 5,
            drop: DropProfile::default(),
            radius: 0.45,
        }
    }
}

impl EnemyBaseStats {
    pub fn for_kind(kind: EnemyKind) -> Self {
        let base = Self::default();
        match kind {
            EnemyKind::Skeleton => Self {
                kind,
                drop: DropProfile {
                    item_chance: 0.4,
                    item_value: 5,
                    ..base.drop
                },
                ..base
            },
            EnemyKind::Draugr => Self {
                kind,
                move_speed: 1.5,
                max_health: 20,
                contact_damage: 8,
                drop: DropProfile {
                    item_chance: 0.6,
                    item_value: 10,
                    ..base.drop
                },
                radius: 0.5,
            },
            EnemyKind::IceGoblin => Self {
                kind,
                move_speed: 2.2,
                max_health: 35,
                contact_damage: 12,
                drop: DropProfile {
                    item_chance: 0.7,
                    item_value: 35,
                    health_value: 30,
                    ..base.drop
                },
                radius: 0.45,
            },
            EnemyKind::RockGolem => Self {
                kind,
                move_speed: 0.8,
                max_health: 300,
                contact_damage: 10,
                radius: 0.9,
                ..base
            },
        }
    }
}
