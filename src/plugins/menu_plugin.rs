use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use crate::game::components::{CombatClock, GamePhase, Player};
use crate::game::progression::ProgressionLedger;

// ── Marker components ────────────────────────────────────────────────

#[derive(Component)]
struct MainMenuRoot;

#[derive(Component)]
struct GameOverOverlay;

#[derive(Component)]
enum MenuButton {
    StartGame,
    Quit,
}

// ── Colors ───────────────────────────────────────────────────────────

pub(crate) const COLOR_BG: Color = Color::srgba(0.08, 0.08, 0.12, 1.0);
pub(crate) const COLOR_BTN: Color = Color::srgba(0.18, 0.20, 0.28, 1.0);
pub(crate) const COLOR_BTN_HOVER: Color = Color::srgba(0.28, 0.32, 0.42, 1.0);
pub(crate) const COLOR_BTN_PRESS: Color = Color::srgba(0.12, 0.14, 0.20, 1.0);
pub(crate) const COLOR_TEXT: Color = Color::WHITE;
pub(crate) const COLOR_TEXT_DIM: Color = Color::srgba(0.5, 0.5, 0.5, 1.0);
pub(crate) const COLOR_ACCENT: Color = Color::srgba(0.85, 0.65, 0.25, 1.0);

// ── Plugin ───────────────────────────────────────────────────────────

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        // Main menu
        app.add_systems(OnEnter(GamePhase::MainMenu), spawn_main_menu);
        app.add_systems(OnExit(GamePhase::MainMenu), despawn::<MainMenuRoot>);
        app.add_systems(Update, menu_button_system.run_if(in_state(GamePhase::MainMenu)));

        // Game over overlay
        app.add_systems(OnEnter(GamePhase::GameOver), spawn_game_over_overlay);
        app.add_systems(OnExit(GamePhase::GameOver), despawn::<GameOverOverlay>);
        app.add_systems(Update, game_over_input.run_if(in_state(GamePhase::GameOver)));
    }
}

// ── Generic despawn ──────────────────────────────────────────────────

pub(crate) fn despawn<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// MAIN MENU
// ═══════════════════════════════════════════════════════════════════════

fn spawn_main_menu(mut commands: Commands) {
    commands
        .spawn((
            MainMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(20.0),
                ..default()
            },
            BackgroundColor(COLOR_BG),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("NORSE SURVIVORS"),
                TextFont { font_size: 64.0, ..default() },
                TextColor(COLOR_ACCENT),
                Node { margin: UiRect::bottom(Val::Px(40.0)), ..default() },
            ));
            spawn_btn(parent, "Start Game", MenuButton::StartGame, COLOR_BTN, COLOR_TEXT, 360.0, 56.0);
            spawn_btn(parent, "Quit", MenuButton::Quit, COLOR_BTN, COLOR_TEXT, 360.0, 56.0);
            parent.spawn((
                Text::new("WASD to move. Attacks fire on their own. F5 reloads tuning."),
                TextFont { font_size: 18.0, ..default() },
                TextColor(COLOR_TEXT_DIM),
                Node { margin: UiRect::top(Val::Px(24.0)), ..default() },
            ));
        });
}

fn menu_button_system(
    mut q: Query<(&Interaction, &MenuButton, &mut BackgroundColor), Changed<Interaction>>,
    mut next_state: ResMut<NextState<GamePhase>>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, button, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                *bg = BackgroundColor(COLOR_BTN_PRESS);
                match button {
                    MenuButton::StartGame => next_state.set(GamePhase::Playing),
                    MenuButton::Quit => {
                        exit.write(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => *bg = BackgroundColor(COLOR_BTN_HOVER),
            Interaction::None => *bg = BackgroundColor(COLOR_BTN),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// GAME OVER
// ═══════════════════════════════════════════════════════════════════════

fn spawn_game_over_overlay(
    mut commands: Commands,
    clock: Res<CombatClock>,
    player: Query<&ProgressionLedger, With<Player>>,
) {
    let level = player.single().map(|l| l.current_level).unwrap_or(1);
    let survived = clock.now as u32;

    commands
        .spawn((
            GameOverOverlay,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            GlobalZIndex(10),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("You Have Fallen"),
                TextFont { font_size: 56.0, ..default() },
                TextColor(Color::srgb(0.9, 0.2, 0.2)),
            ));
            parent.spawn((
                Text::new(format!("Level {level}  Survived {}:{:02}", survived / 60, survived % 60)),
                TextFont { font_size: 28.0, ..default() },
                TextColor(COLOR_TEXT),
            ));
            parent.spawn((
                Text::new("Press ESCAPE to return to menu"),
                TextFont { font_size: 22.0, ..default() },
                TextColor(COLOR_TEXT_DIM),
            ));
        });
}

fn game_over_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) || keyboard.just_pressed(KeyCode::Enter) {
        next_state.set(GamePhase::MainMenu);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════

pub(crate) fn spawn_btn<C: Component>(
    parent: &mut ChildSpawnerCommands,
    label: &str,
    marker: C,
    bg_color: Color,
    text_color: Color,
    width: f32,
    height: f32,
) {
    parent.spawn((
        marker,
        Button,
        Node {
            width: Val::Px(width),
            height: Val::Px(height),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            border_radius: BorderRadius::all(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(bg_color),
    )).with_children(|btn| {
        btn.spawn((
            Text::new(label),
            TextFont { font_size: 24.0, ..default() },
            TextColor(text_color),
        ));
    });
}
