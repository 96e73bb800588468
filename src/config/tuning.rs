use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::game::attack::AttackProfile;
use crate::game::enemy::spawner::SpawnerTuning;
use crate::game::pickups::MagnetTuning;
use crate::game::progression::ProgressionCurve;
use crate::game::shield::ShieldTuning;

/// Static rock placed in the arena at session start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// All tunable game parameters, loaded from tuning.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub dt: f32,
    pub pixels_per_unit: f32,
    pub player_max_health: i32,
    pub player_move_speed: f32,
    pub player_radius: f32,
    /// Seconds of damage immunity after a hit.
    pub invincibility: f32,
    pub hit_flash: f32,
    pub pickup_radius: f32,
    /// Fraction of knockback velocity shed per second.
    pub knockback_decay: f32,
    pub sword: AttackProfile,
    pub fireball: AttackProfile,
    pub progression: ProgressionCurve,
    pub shield: ShieldTuning,
    pub magnet: MagnetTuning,
    pub spawner: SpawnerTuning,
    pub level_up_choices: usize,
    pub obstacles: Vec<ObstacleSpec>,
    /// Fixed seed for reproducible runs. None = seeded from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            pixels_per_unit: 40.0,
            player_max_health: 100,
            player_move_speed: 5.0,
            player_radius: 0.4,
            invincibility: 1.0,
            hit_flash: 0.1,
            pickup_radius: 0.5,
            knockback_decay: 8.0,
            sword: AttackProfile::sword(),
            fireball: AttackProfile::fireball(),
            progression: ProgressionCurve::default(),
            shield: ShieldTuning::default(),
            magnet: MagnetTuning::default(),
            spawner: SpawnerTuning::default(),
            level_up_choices: 3,
            obstacles: vec![
                ObstacleSpec { x: -4.0, y: 3.0, radius: 0.8 },
                ObstacleSpec { x: 5.0, y: -2.0, radius: 1.0 },
                ObstacleSpec { x: 1.5, y: 6.0, radius: 0.6 },
            ],
            rng_seed: None,
        }
    }
}

impl Tuning {
    /// Get the data directory for tuning files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("norse_survivors")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Parse a tuning document. Missing fields fall back to defaults.
    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::from_ron(&contents) {
                    Ok(tuning) => return tuning,
                    Err(e) => {
                        warn!("Failed to parse tuning.ron: {e}, using defaults");
                    }
                },
                Err(e) => {
                    warn!("Failed to read tuning.ron: {e}, using defaults");
                }
            }
        }
        let tuning = Self::default();
        tuning.save();
        tuning
    }

    /// Save current tuning to file.
    pub fn save(&self) {
        let path = Self::file_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    warn!("Failed to write tuning.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize tuning: {e}");
            }
        }
    }

    /// Reload from file (F5). Takes effect for stats read each tick; values
    /// copied into components at session start apply from the next run.
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }
}
