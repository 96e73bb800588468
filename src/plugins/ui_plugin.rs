use bevy::prelude::*;

use super::menu_plugin::{COLOR_BTN, COLOR_BTN_HOVER, COLOR_BTN_PRESS, COLOR_TEXT, COLOR_TEXT_DIM, despawn, spawn_btn};
use crate::game::components::*;
use crate::game::events::SkillChosen;
use crate::game::level_up::LevelUpQueue;
use crate::game::progression::ProgressionLedger;
use crate::game::skills::SkillLedger;

/// Health fraction below which the status line turns red.
const LOW_HEALTH: f32 = 0.25;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnExit(GamePhase::MainMenu), setup_ui);
        app.add_systems(
            Update,
            (update_status_display, update_skill_display)
                .run_if(in_state(GamePhase::Playing).or(in_state(GamePhase::LevelUp))),
        );

        app.add_systems(
            Update,
            (refresh_level_up_panel, skill_button_system, skill_key_input)
                .chain()
                .run_if(in_state(GamePhase::LevelUp)),
        );
        app.add_systems(OnExit(GamePhase::LevelUp), despawn::<LevelUpPanel>);
    }
}

#[derive(Component)]
struct StatusText;

#[derive(Component)]
struct SkillText;

#[derive(Component)]
struct LevelUpPanel;

/// Option index on the level-up panel.
#[derive(Component)]
struct SkillButton(usize);

fn setup_ui(mut commands: Commands) {
    commands
        .spawn((
            InGame,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                padding: UiRect::all(Val::Px(0.0)),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                StatusText,
                Text::new("HP: ---"),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            parent.spawn((
                SkillText,
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.2)),
            ));
        });
}

fn update_status_display(
    clock: Res<CombatClock>,
    player: Query<&ProgressionLedger, With<Player>>,
    mut text_query: Query<(&mut Text, &mut TextColor), With<StatusText>>,
) {
    let Ok(ledger) = player.single() else {
        return;
    };
    let secs = clock.now as u32;
    for (mut text, mut color) in &mut text_query {
        **text = format!(
            "HP {}/{}  Lv {}  XP {}/{} ({:.0}%)  {}:{:02}",
            ledger.health.current,
            ledger.health.max,
            ledger.current_level,
            ledger.current_xp,
            ledger.xp_to_next_level,
            ledger.xp_fraction() * 100.0,
            secs / 60,
            secs % 60,
        );
        color.0 = if ledger.health.fraction() < LOW_HEALTH {
            Color::srgb(1.0, 0.3, 0.3)
        } else {
            Color::WHITE
        };
    }
}

fn update_skill_display(skills: Res<SkillLedger>, mut text_query: Query<&mut Text, With<SkillText>>) {
    if !skills.is_changed() {
        return;
    }
    let mut owned: Vec<_> = skills.iter().filter(|(_, level)| *level > 0).collect();
    owned.sort_by_key(|(skill, _)| *skill as u8);
    let line = owned
        .iter()
        .map(|(skill, level)| format!("{} {}", skill.display_name(), level))
        .collect::<Vec<_>>()
        .join("  ");
    for mut text in &mut text_query {
        **text = line.clone();
    }
}

// ── Level-up panel ──────────────────────────────────────────────────

/// Rebuild the panel whenever the open offer changes.
fn refresh_level_up_panel(
    mut commands: Commands,
    queue: Res<LevelUpQueue>,
    skills: Res<SkillLedger>,
    panels: Query<Entity, With<LevelUpPanel>>,
) {
    if !queue.is_changed() {
        return;
    }
    for entity in &panels {
        commands.entity(entity).despawn();
    }
    let Some(offer) = queue.offer.as_ref() else {
        return;
    };

    commands
        .spawn((
            LevelUpPanel,
            InGame,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            GlobalZIndex(10),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(format!("Level {}! Choose a skill", offer.level)),
                TextFont { font_size: 40.0, ..default() },
                TextColor(COLOR_TEXT),
            ));
            for (i, skill) in offer.choices.iter().enumerate() {
                let label = format!("{}. {}", i + 1, skills.description(*skill));
                spawn_btn(parent, &label, SkillButton(i), COLOR_BTN, COLOR_TEXT, 420.0, 56.0);
            }
            parent.spawn((
                Text::new("Click or press 1-3"),
                TextFont { font_size: 18.0, ..default() },
                TextColor(COLOR_TEXT_DIM),
            ));
        });
}

fn skill_button_system(
    mut q: Query<(&Interaction, &SkillButton, &mut BackgroundColor), Changed<Interaction>>,
    mut chosen: MessageWriter<SkillChosen>,
) {
    for (interaction, button, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                *bg = BackgroundColor(COLOR_BTN_PRESS);
                chosen.write(SkillChosen(button.0));
            }
            Interaction::Hovered => *bg = BackgroundColor(COLOR_BTN_HOVER),
            Interaction::None => *bg = BackgroundColor(COLOR_BTN),
        }
    }
}

fn skill_key_input(keyboard: Res<ButtonInput<KeyCode>>, mut chosen: MessageWriter<SkillChosen>) {
    let keys = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];
    for (i, key) in keys.iter().enumerate() {
        if keyboard.just_pressed(*key) {
            chosen.write(SkillChosen(i));
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::progression::ProgressionCurve;

    #[test]
    fn status_line_shows_xp_share_and_turns_red_when_low() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(CombatClock { now: 75.0, delta: 0.0 });
        app.add_systems(Update, update_status_display);

        let mut ledger = ProgressionLedger::new(ProgressionCurve::default(), 100);
        ledger.gain_xp(15);
        ledger.take_damage(80, 0.0, 1.0);
        app.world_mut().spawn((Player, ledger));
        let text = app
            .world_mut()
            .spawn((StatusText, Text::new(""), TextColor(Color::WHITE)))
            .id();

        app.update();
        let line = app.world().get::<Text>(text).map(|t| t.0.clone());
        assert_eq!(line.as_deref(), Some("HP 20/100  Lv 1  XP 15/30 (50%)  1:15"));
        let color = app.world().get::<TextColor>(text).map(|c| c.0);
        assert_eq!(color, Some(Color::srgb(1.0, 0.3, 0.3)));
    }
}
