use bevy::prelude::*;
use std::collections::HashMap;

use crate::game::enemy::EnemyKind;
use crate::game::events::CueKind;
use crate::game::pickups::PickupKind;
use crate::game::stats::types::DamageKind;

/// Placeholder colors for every sprite the game draws.
#[derive(Resource)]
pub struct AssetsMap {
    pub enemy_colors: HashMap<EnemyKind, Color>,
    pub player: Color,
    pub shield: Color,
    pub obstacle: Color,
    pub fallback: Color,
}

impl Default for AssetsMap {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AssetsMap {
    pub fn with_defaults() -> Self {
        let mut enemy_colors = HashMap::new();
        enemy_colors.insert(EnemyKind::Skeleton, Color::srgb(0.85, 0.85, 0.8));
        enemy_colors.insert(EnemyKind::Draugr, Color::srgb(0.35, 0.55, 0.4));
        enemy_colors.insert(EnemyKind::IceGoblin, Color::srgb(0.5, 0.8, 1.0));
        enemy_colors.insert(EnemyKind::RockGolem, Color::srgb(0.45, 0.4, 0.35));
        Self {
            enemy_colors,
            player: Color::srgb(0.2, 0.6, 1.0),
            shield: Color::srgba(0.15, 0.1, 0.2, 0.6),
            obstacle: Color::srgb(0.3, 0.3, 0.35),
            fallback: Color::srgb(0.5, 0.5, 0.5),
        }
    }

    pub fn enemy_color(&self, kind: EnemyKind) -> Color {
        self.enemy_colors.get(&kind).copied().unwrap_or(self.fallback)
    }

    pub fn projectile_color(&self, kind: DamageKind) -> Color {
        match kind {
            DamageKind::Fireball => Color::srgb(1.0, 0.45, 0.1),
            DamageKind::IceBolt => Color::srgb(0.6, 0.9, 1.0),
            _ => self.fallback,
        }
    }

    pub fn pickup_color(&self, kind: PickupKind) -> Color {
        match kind {
            PickupKind::Xp => Color::srgb(0.3, 1.0, 0.4),
            PickupKind::Health => Color::srgb(1.0, 0.25, 0.3),
        }
    }

    pub fn cue_color(&self, kind: CueKind) -> Color {
        match kind {
            CueKind::Slash => Color::srgba(1.0, 1.0, 1.0, 0.8),
            CueKind::Debris => Color::srgba(0.55, 0.45, 0.35, 0.9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_enemy_has_its_own_color() {
        let map = AssetsMap::with_defaults();
        for kind in EnemyKind::ALL {
            assert_ne!(map.enemy_color(kind), map.fallback);
        }
    }
}
