use bevy::prelude::*;

use super::enemy::EnemyKind;

// ── Marker components ───────────────────────────────────────────────

#[derive(Component)]
pub struct Player;

#[derive(Component)]
pub struct Enemy;

#[derive(Component)]
pub struct ObstacleMarker;

#[derive(Component)]
pub struct MainCamera;

/// Marker: tag all game-session entities for cleanup when returning to main menu.
#[derive(Component)]
pub struct InGame;

// ── Game phase state ────────────────────────────────────────────────

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Playing,
    /// Skill choice panel open; combat is frozen.
    LevelUp,
    GameOver,
}

// ── Clock ───────────────────────────────────────────────────────────

/// Combat time. Only advances while the run is in `Playing`, so every
/// gate and timer freezes while a level-up choice is open.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CombatClock {
    pub now: f32,
    pub delta: f32,
}

impl CombatClock {
    pub fn advance(&mut self, delta: f32) {
        self.delta = delta.max(0.0);
        self.now += self.delta;
    }
}

// ── Runtime state ───────────────────────────────────────────────────

/// Base movement speed of the player before slows (units per second).
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerSpeed(pub f32);

/// Horizontal facing, taken from the last non-zero horizontal input.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Facing {
    pub left: bool,
}

impl Facing {
    pub fn update(&mut self, move_dir: Vec2) {
        if move_dir.x < 0.0 {
            self.left = true;
        } else if move_dir.x > 0.0 {
            self.left = false;
        }
    }
}

/// Decaying push velocity added on top of an entity's own movement.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Knockback(pub Vec2);

/// Spawn name tag, counted against per-type population caps.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpawnTag(pub EnemyKind);

#[derive(Component, Debug, Clone, Copy)]
pub struct CollisionRadius(pub f32);

/// Despawn once `CombatClock::now` reaches this time.
#[derive(Component, Debug, Clone, Copy)]
pub struct ExpiresAt(pub f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_keeps_last_horizontal_direction() {
        let mut facing = Facing::default();
        facing.update(Vec2::new(-1.0, 0.0));
        assert!(facing.left);
        facing.update(Vec2::new(0.0, 1.0));
        assert!(facing.left);
        facing.update(Vec2::new(0.5, 0.5));
        assert!(!facing.left);
    }

    #[test]
    fn clock_ignores_negative_steps() {
        let mut clock = CombatClock::default();
        clock.advance(0.5);
        clock.advance(-1.0);
        assert_eq!(clock.now, 0.5);
        assert_eq!(clock.delta, 0.0);
    }
}
