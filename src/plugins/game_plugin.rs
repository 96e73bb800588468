use bevy::prelude::*;
use bevy::camera::ScalingMode;

use crate::assets_map::AssetsMap;
use crate::config::tuning::Tuning;
use crate::game::{
    attack::Arsenal,
    collision::{self, ContactLayer, ContactPairs, Hitbox, SpatialIndex},
    combat,
    components::*,
    enemy::{spawner::{self, EnemyPopulation}, systems as enemy_systems},
    events::{CombatEvent, ContactMessage, SkillChosen, VisualCue},
    intent::{self, Intent},
    level_up::{self, LevelUpQueue},
    physics,
    pickups::{self, MagnetField},
    presentation,
    progression::ProgressionLedger,
    projectile,
    rng::GameRng,
    shield::{self, ShieldZone},
    skills::SkillLedger,
    status::effect::{PlayerStatus, SlowEffect},
};

// ── SystemSets (strict FixedUpdate ordering, Playing phase only) ────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FixedGameSet {
    ClockSet,
    MotionSet,
    ContactSet,
    EventGenerateSet,
    EventApplySet,
    CleanupSet,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<CombatEvent>();
        app.add_message::<ContactMessage>();
        app.add_message::<VisualCue>();
        app.add_message::<SkillChosen>();
        app.init_state::<GamePhase>();

        app.init_resource::<CombatClock>();
        app.init_resource::<SpatialIndex>();
        app.init_resource::<ContactPairs>();
        app.init_resource::<EnemyPopulation>();
        app.init_resource::<SkillLedger>();
        app.init_resource::<LevelUpQueue>();
        app.insert_resource(AssetsMap::with_defaults());

        let seed = app.world().get_resource::<Tuning>().and_then(|t| t.rng_seed);
        app.insert_resource(GameRng::from_seed_or_os(seed));

        // Configure FixedUpdate set ordering (each set gated on combat_running).
        // LevelUp and GameOver freeze the combat clock with everything else.
        app.configure_sets(
            FixedUpdate,
            (
                FixedGameSet::ClockSet
                    .run_if(combat_running),
                FixedGameSet::MotionSet
                    .run_if(combat_running),
                FixedGameSet::ContactSet
                    .run_if(combat_running),
                FixedGameSet::EventGenerateSet
                    .run_if(combat_running),
                FixedGameSet::EventApplySet
                    .run_if(combat_running),
                FixedGameSet::CleanupSet
                    .run_if(combat_running),
            )
                .chain(),
        );

        // ClockSet
        app.add_systems(
            FixedUpdate,
            physics::advance_clock.in_set(FixedGameSet::ClockSet),
        );

        // MotionSet: chained to fix B0002 (parallel Transform conflicts)
        app.add_systems(
            FixedUpdate,
            (
                physics::move_player,
                physics::block_player,
                enemy_systems::tick_enemies,
                physics::decay_knockback,
                projectile::move_projectiles,
                shield::follow_player,
                pickups::magnet_pull,
            )
                .chain()
                .in_set(FixedGameSet::MotionSet),
        );

        // ContactSet
        app.add_systems(
            FixedUpdate,
            (collision::rebuild_spatial_index, collision::detect_contacts)
                .chain()
                .in_set(FixedGameSet::ContactSet),
        );

        // EventGenerateSet: chained to fix B0002 (MessageWriter conflicts)
        app.add_systems(
            FixedUpdate,
            (
                combat::player_attacks,
                combat::resolve_player_contacts,
                shield::shield_damage,
                projectile::projectile_hits,
                pickups::collect_pickups,
                spawner::spawn_enemies,
            )
                .chain()
                .in_set(FixedGameSet::EventGenerateSet),
        );

        // EventApplySet: chained to fix B0002
        app.add_systems(
            FixedUpdate,
            (
                combat::apply_combat_events,
                enemy_systems::resolve_enemy_deaths,
                projectile::spawn_projectiles,
                pickups::spawn_pickups,
                presentation::spawn_visual_cues,
                level_up::open_level_up_offer,
            )
                .chain()
                .in_set(FixedGameSet::EventApplySet),
        );

        // CleanupSet
        app.add_systems(
            FixedUpdate,
            (enemy_systems::remove_dead_enemies, presentation::expire_timed)
                .chain()
                .in_set(FixedGameSet::CleanupSet),
        );

        // ── Startup ─────────────────────────────────────────────────────
        app.add_systems(Startup, spawn_camera);

        // ── Session lifecycle ───────────────────────────────────────────
        app.add_systems(OnExit(GamePhase::MainMenu), setup_session);
        app.add_systems(OnEnter(GamePhase::MainMenu), teardown_session);

        // ── Playing (Update) ────────────────────────────────────────────
        app.add_systems(
            Update,
            (intent::read_player_intent, check_player_death)
                .run_if(in_state(GamePhase::Playing)),
        );

        // ── LevelUp (Update) ────────────────────────────────────────────
        app.add_systems(
            Update,
            level_up::apply_skill_choice.run_if(in_state(GamePhase::LevelUp)),
        );

        // ── Always-on ───────────────────────────────────────────────────
        app.add_systems(
            Update,
            (
                presentation::tint_enemies,
                presentation::tint_player,
                presentation::flicker_shield,
                presentation::camera_follow,
                tuning_reload_input,
            ),
        );
    }
}

// ── Startup ─────────────────────────────────────────────────────────

fn spawn_camera(mut commands: Commands, tuning: Res<Tuning>) {
    let ppu = tuning.pixels_per_unit.max(1.0);

    // 1 world unit = ppu pixels
    commands.spawn((
        MainCamera,
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::WindowSize,
            scale: 1.0 / ppu,
            ..OrthographicProjection::default_2d()
        }),
    ));
}

// ── Session lifecycle ───────────────────────────────────────────────

/// Fresh run: reset shared state and spawn the player, shield and rocks.
#[allow(clippy::too_many_arguments)]
fn setup_session(
    mut commands: Commands,
    tuning: Res<Tuning>,
    palette: Res<AssetsMap>,
    mut clock: ResMut<CombatClock>,
    mut population: ResMut<EnemyPopulation>,
    mut skills: ResMut<SkillLedger>,
    mut queue: ResMut<LevelUpQueue>,
    mut pairs: ResMut<ContactPairs>,
    mut index: ResMut<SpatialIndex>,
    mut rng: ResMut<GameRng>,
) {
    *clock = CombatClock::default();
    population.reset();
    *skills = SkillLedger::default();
    queue.clear();
    pairs.0.clear();
    index.clear();
    *rng = GameRng::from_seed_or_os(tuning.rng_seed);

    let radius = tuning.player_radius;
    commands.spawn((
        Player,
        InGame,
        Intent::default(),
        PlayerSpeed(tuning.player_move_speed),
        Facing::default(),
        ProgressionLedger::new(tuning.progression.clone(), tuning.player_max_health),
        Arsenal::new(tuning.sword.clone(), tuning.fireball.clone()),
        SlowEffect::default(),
        PlayerStatus::default(),
        MagnetField::new(&tuning.magnet),
        Hitbox {
            radius,
            layer: ContactLayer::Player,
        },
        CollisionRadius(radius),
        Sprite::from_color(palette.player, Vec2::splat(radius * 2.0)),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1.5)),
    ));

    let shield_size = tuning.shield.radius_per_scale * 2.0;
    commands.spawn((
        InGame,
        ShieldZone::new(&tuning.shield),
        Hitbox {
            radius: 0.0,
            layer: ContactLayer::Shield,
        },
        Sprite::from_color(palette.shield, Vec2::splat(shield_size)),
        Transform::from_translation(Vec3::new(0.0, 0.0, 0.8)),
        Visibility::Hidden,
    ));

    for rock in &tuning.obstacles {
        commands.spawn((
            InGame,
            ObstacleMarker,
            CollisionRadius(rock.radius),
            Sprite::from_color(palette.obstacle, Vec2::splat(rock.radius * 2.0)),
            Transform::from_translation(Vec3::new(rock.x, rock.y, 0.2)),
        ));
    }

    info!("Run started ({} obstacles)", tuning.obstacles.len());
}

fn teardown_session(mut commands: Commands, query: Query<Entity, With<InGame>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

// ── Playing phase systems ───────────────────────────────────────────

/// Fixed steps run only while Playing with no skill offer open. The offer
/// check also covers extra fixed steps in the frame the offer opened, before
/// the LevelUp transition lands.
fn combat_running(state: Res<State<GamePhase>>, queue: Res<LevelUpQueue>) -> bool {
    *state.get() == GamePhase::Playing && queue.offer.is_none()
}

/// Transition to GameOver once the player's health is gone.
fn check_player_death(
    query: Query<&ProgressionLedger, With<Player>>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    if query.iter().any(|ledger| ledger.dead) {
        next_state.set(GamePhase::GameOver);
    }
}

// ── Always-on ───────────────────────────────────────────────────────

/// Reload tuning with F5.
fn tuning_reload_input(keyboard: Res<ButtonInput<KeyCode>>, mut tuning: ResMut<Tuning>) {
    if keyboard.just_pressed(KeyCode::F5) {
        tuning.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level_up::SkillOffer;
    use crate::game::skills::SkillKind;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::state::app::StatesPlugin;

    fn session_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GamePhase>();
        app.insert_resource(Tuning {
            rng_seed: Some(3),
            ..Tuning::default()
        });
        app.insert_resource(AssetsMap::with_defaults());
        app.init_resource::<CombatClock>();
        app.init_resource::<SpatialIndex>();
        app.init_resource::<ContactPairs>();
        app.init_resource::<EnemyPopulation>();
        app.init_resource::<SkillLedger>();
        app.init_resource::<LevelUpQueue>();
        app.insert_resource(GameRng::seeded(3));
        app.add_systems(OnExit(GamePhase::MainMenu), setup_session);
        app.add_systems(OnEnter(GamePhase::MainMenu), teardown_session);
        app.add_systems(Update, check_player_death.run_if(in_state(GamePhase::Playing)));
        app
    }

    fn set_phase(app: &mut App, phase: GamePhase) {
        app.world_mut().resource_mut::<NextState<GamePhase>>().set(phase);
        app.update();
    }

    #[test]
    fn open_offer_halts_combat_before_the_phase_changes() {
        let mut app = session_app();
        app.update();
        set_phase(&mut app, GamePhase::Playing);
        assert_eq!(app.world_mut().run_system_once(combat_running).ok(), Some(true));

        app.world_mut().resource_mut::<LevelUpQueue>().offer = Some(SkillOffer {
            level: 2,
            choices: vec![SkillKind::SwordPower],
        });
        assert_eq!(app.world().resource::<State<GamePhase>>().get(), &GamePhase::Playing);
        assert_eq!(app.world_mut().run_system_once(combat_running).ok(), Some(false));
    }

    #[test]
    fn starting_a_run_spawns_player_shield_and_rocks() {
        let mut app = session_app();
        app.update();
        set_phase(&mut app, GamePhase::Playing);

        let world = app.world_mut();
        assert_eq!(world.query::<&Player>().iter(world).count(), 1);
        assert_eq!(world.query::<&ShieldZone>().iter(world).count(), 1);
        assert_eq!(world.query::<&ObstacleMarker>().iter(world).count(), 3);
        let health = world
            .query_filtered::<&ProgressionLedger, With<Player>>()
            .iter(world)
            .map(|l| l.health.current)
            .next();
        assert_eq!(health, Some(100));
    }

    #[test]
    fn death_ends_the_run_and_menu_clears_it() {
        let mut app = session_app();
        app.update();
        set_phase(&mut app, GamePhase::Playing);

        {
            let world = app.world_mut();
            let mut ledgers = world.query_filtered::<&mut ProgressionLedger, With<Player>>();
            for mut ledger in ledgers.iter_mut(world) {
                ledger.take_damage(500, 0.0, 1.0);
            }
        }
        app.update();
        app.update();
        assert_eq!(app.world().resource::<State<GamePhase>>().get(), &GamePhase::GameOver);

        set_phase(&mut app, GamePhase::MainMenu);
        let world = app.world_mut();
        assert_eq!(world.query::<&InGame>().iter(world).count(), 0);
    }
}
