use bevy::prelude::*;

use super::components::Player;

/// Input intent: written in Update, consumed in FixedUpdate.
#[derive(Component, Default)]
pub struct Intent {
    /// Desired movement direction (normalized or zero).
    pub move_dir: Vec2,
}

/// WASD / arrow keys into a normalized movement direction.
pub fn read_player_intent(keyboard: Res<ButtonInput<KeyCode>>, mut query: Query<&mut Intent, With<Player>>) {
    let mut dir = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    for mut intent in &mut query {
        intent.move_dir = dir.normalize_or_zero();
    }
}
