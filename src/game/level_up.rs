use std::collections::VecDeque;

use bevy::prelude::*;

use super::attack::Arsenal;
use super::components::*;
use super::events::SkillChosen;
use super::rng::{GameRng, RandomSource};
use super::shield::ShieldZone;
use super::skills::{SkillEffect, SkillKind, SkillLedger};
use crate::config::tuning::Tuning;

/// Skill choice currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillOffer {
    pub level: u32,
    pub choices: Vec<SkillKind>,
}

/// Crossed levels waiting for a skill choice, shown one at a time.
#[derive(Resource, Debug, Default)]
pub struct LevelUpQueue {
    pending: VecDeque<u32>,
    pub offer: Option<SkillOffer>,
}

impl LevelUpQueue {
    pub fn push(&mut self, level: u32) {
        self.pending.push_back(level);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Pop pending levels until one yields a non-empty offer. Levels with
    /// nothing eligible are skipped. Returns whether an offer is open.
    pub fn open_next(&mut self, skills: &SkillLedger, count: usize, rng: &mut impl RandomSource) -> bool {
        if self.offer.is_some() {
            return true;
        }
        while let Some(level) = self.pending.pop_front() {
            let choices = skills.roll_offer(level, count, rng);
            if choices.is_empty() {
                debug!("No skill eligible at level {level}, skipping offer");
                continue;
            }
            self.offer = Some(SkillOffer { level, choices });
            return true;
        }
        false
    }

    /// Take the chosen skill out of the open offer.
    pub fn choose(&mut self, index: usize) -> Option<SkillKind> {
        let offer = self.offer.as_ref()?;
        let skill = offer.choices.get(index).copied()?;
        self.offer = None;
        Some(skill)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.offer = None;
    }
}

/// Send a skill's effect to the component that owns the stat.
pub fn route_skill_effect(effect: SkillEffect, arsenal: &mut Arsenal, speed: &mut PlayerSpeed, shield: Option<&mut ShieldZone>) {
    if arsenal.apply_skill(effect) {
        return;
    }
    match effect {
        SkillEffect::MoveSpeed(s) => speed.0 = s,
        SkillEffect::ShieldLevel(level) => {
            if let Some(shield) = shield {
                shield.set_level(level);
            }
        }
        _ => {}
    }
}

/// EventApplySet (last): open the next pending offer and pause combat.
pub fn open_level_up_offer(
    tuning: Res<Tuning>,
    skills: Res<SkillLedger>,
    mut rng: ResMut<GameRng>,
    mut queue: ResMut<LevelUpQueue>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    if queue.offer.is_none() && queue.pending_len() == 0 {
        return;
    }
    if queue.open_next(&skills, tuning.level_up_choices, &mut *rng) {
        next_state.set(GamePhase::LevelUp);
    }
}

/// LevelUp phase: apply the picked skill, then show the next offer or resume.
#[allow(clippy::too_many_arguments)]
pub fn apply_skill_choice(
    tuning: Res<Tuning>,
    mut chosen: MessageReader<SkillChosen>,
    mut skills: ResMut<SkillLedger>,
    mut rng: ResMut<GameRng>,
    mut queue: ResMut<LevelUpQueue>,
    mut player: Query<(&mut Arsenal, &mut PlayerSpeed), With<Player>>,
    mut shield: Query<&mut ShieldZone>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    // One choice per frame: a second click must not land on the next offer.
    let Some(SkillChosen(index)) = chosen.read().next().copied() else {
        return;
    };
    chosen.clear();
    let Some(skill) = queue.choose(index) else {
        return;
    };
    let effect = skills.apply(skill);
    info!("Skill {} now level {}", skill.display_name(), skills.level(skill));

    if let Ok((mut arsenal, mut speed)) = player.single_mut() {
        let shield = shield.single_mut().ok();
        route_skill_effect(effect, &mut arsenal, &mut speed, shield.map(|s| s.into_inner()));
    }

    if !queue.open_next(&skills, tuning.level_up_choices, &mut *rng) {
        next_state.set(GamePhase::Playing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::attack::AttackProfile;
    use crate::game::rng::ScriptedRolls;
    use crate::game::shield::ShieldTuning;
    use bevy::state::app::StatesPlugin;

    #[test]
    fn offers_open_in_level_order() {
        let mut queue = LevelUpQueue::default();
        queue.push(2);
        queue.push(3);
        let skills = SkillLedger::default();
        let mut rng = ScriptedRolls::new(&[0.0]);

        assert!(queue.open_next(&skills, 3, &mut rng));
        assert_eq!(queue.offer.as_ref().map(|o| o.level), Some(2));
        assert_eq!(queue.choose(0), Some(SkillKind::SwordPower));
        assert!(queue.open_next(&skills, 3, &mut rng));
        assert_eq!(queue.offer.as_ref().map(|o| o.level), Some(3));
    }

    #[test]
    fn choosing_out_of_range_keeps_offer() {
        let mut queue = LevelUpQueue::default();
        queue.push(2);
        let mut rng = ScriptedRolls::new(&[0.0]);
        queue.open_next(&SkillLedger::default(), 3, &mut rng);
        assert_eq!(queue.choose(7), None);
        assert!(queue.offer.is_some());
    }

    #[test]
    fn routing_reaches_each_owner() {
        let mut arsenal = Arsenal::new(AttackProfile::sword(), AttackProfile::fireball());
        let mut speed = PlayerSpeed(5.0);
        let mut shield = ShieldZone::new(&ShieldTuning::default());

        route_skill_effect(SkillEffect::MoveSpeed(5.7), &mut arsenal, &mut speed, Some(&mut shield));
        route_skill_effect(SkillEffect::ShieldLevel(1), &mut arsenal, &mut speed, Some(&mut shield));
        route_skill_effect(SkillEffect::SwordDamage(17), &mut arsenal, &mut speed, Some(&mut shield));

        assert_eq!(speed.0, 5.7);
        assert!(shield.active);
        assert_eq!(arsenal.sword.current_damage, 17);
    }

    #[test]
    fn last_choice_resumes_play() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GamePhase>();
        app.add_message::<SkillChosen>();
        app.insert_resource(Tuning::default());
        app.insert_resource(GameRng::seeded(9));
        app.init_resource::<SkillLedger>();
        app.init_resource::<LevelUpQueue>();
        app.add_systems(Update, apply_skill_choice);
        let player = app
            .world_mut()
            .spawn((
                Player,
                Arsenal::new(AttackProfile::sword(), AttackProfile::fireball()),
                PlayerSpeed(5.0),
            ))
            .id();

        {
            let mut queue = app.world_mut().resource_mut::<LevelUpQueue>();
            queue.offer = Some(SkillOffer {
                level: 2,
                choices: vec![SkillKind::SwordSpeed],
            });
        }
        app.world_mut().write_message(SkillChosen(0));
        app.update();
        app.update();

        assert_eq!(app.world().resource::<SkillLedger>().level(SkillKind::SwordSpeed), 1);
        let cooldown = app.world().get::<Arsenal>(player).map(|a| a.sword.current_cooldown);
        assert_eq!(cooldown, Some(1.25));
        assert_eq!(app.world().resource::<State<GamePhase>>().get(), &GamePhase::Playing);
    }
}
