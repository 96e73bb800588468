use bevy::prelude::*;

use crate::game::cooldown::{CooldownGate, TimedFlag};
use crate::game::stats::types::Multiplier;

/// How often an active slow re-applies its factor to movement.
pub const SLOW_REFRESH_INTERVAL: f32 = 0.1;

/// Movement slow on an entity. At most one slow is live; a new one only
/// replaces it when stronger or when the current one has run out.
#[derive(Component, Debug, Clone, Default)]
pub struct SlowEffect {
    pub multiplier: Multiplier,
    pub timer: TimedFlag,
    refresh: CooldownGate,
    /// Factor currently applied to movement speed.
    applied: Multiplier,
}

impl SlowEffect {
    /// Returns true if the new slow took effect.
    pub fn apply(&mut self, now: f32, multiplier: f32, duration: f32) -> bool {
        let incoming = Multiplier::new(multiplier);
        let expired = !self.timer.is_active(now);
        if !expired && incoming >= self.multiplier {
            return false;
        }
        self.multiplier = incoming;
        self.timer.start(now, duration);
        self.refresh = CooldownGate::ready();
        true
    }

    /// Advance the slow and return the movement factor for this tick.
    pub fn tick(&mut self, now: f32) -> f32 {
        if self.timer.expire(now) {
            self.multiplier = Multiplier::one();
            self.applied = Multiplier::one();
            self.refresh = CooldownGate::ready();
        } else if self.timer.is_active(now) && self.refresh.try_fire(now, SLOW_REFRESH_INTERVAL) {
            self.applied = self.multiplier;
        }
        self.applied.0
    }
}

/// Cosmetic state on the player: hit flash and the ice "frozen" tint.
#[derive(Component, Debug, Clone, Default)]
pub struct PlayerStatus {
    pub flash: TimedFlag,
    pub frozen: TimedFlag,
}

impl PlayerStatus {
    /// Frozen suppresses the hit flash.
    pub fn show_flash(&self, now: f32) -> bool {
        self.flash.is_active(now) && !self.frozen.is_active(now)
    }
}

/// Frozen tint length for a slow of `slow_duration`: one 0.4 s blink per
/// full 0.2 s of slow.
pub fn frozen_duration(slow_duration: f32) -> f32 {
    (slow_duration / 0.2).floor() * 0.4
}
