//! Clock-compared timers. Nothing here sleeps or counts down on its own:
//! every query takes the current `now` from `CombatClock`.

use serde::{Deserialize, Serialize};

/// "Ready at or after T" permission check shared by every attack and effect.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CooldownGate {
    pub ready_at: f32,
}

impl CooldownGate {
    /// A gate that is ready immediately.
    pub fn ready() -> Self {
        Self { ready_at: 0.0 }
    }

    pub fn is_ready(&self, now: f32) -> bool {
        now >= self.ready_at
    }

    /// Arm the gate: the action is permitted again at `now + duration`.
    pub fn fire(&mut self, now: f32, duration: f32) {
        self.ready_at = now + duration.max(0.0);
    }

    /// `is_ready` + `fire` in one step. Returns whether the action may run.
    pub fn try_fire(&mut self, now: f32, duration: f32) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.fire(now, duration);
        true
    }
}

/// `{active, end_time}` record for flashes, stuns, invincibility windows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimedFlag {
    pub until: Option<f32>,
}

impl TimedFlag {
    /// Start (or restart) the flag for `duration` seconds from `now`.
    pub fn start(&mut self, now: f32, duration: f32) {
        self.until = Some(now + duration.max(0.0));
    }

    /// Keep whichever end time is later.
    pub fn extend(&mut self, now: f32, duration: f32) {
        let end = now + duration.max(0.0);
        self.until = Some(self.until.map_or(end, |cur| cur.max(end)));
    }

    pub fn is_active(&self, now: f32) -> bool {
        self.until.is_some_and(|end| now < end)
    }

    /// Clears an expired flag. Returns true on the tick it expires.
    pub fn expire(&mut self, now: f32) -> bool {
        match self.until {
            Some(end) if now >= end => {
                self.until = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_is_ready_at_exact_boundary() {
        let mut gate = CooldownGate::ready();
        gate.fire(1.0, 1.5);
        assert!(!gate.is_ready(2.49));
        assert!(gate.is_ready(2.5));
    }

    #[test]
    fn try_fire_only_rearms_when_ready() {
        let mut gate = CooldownGate::ready();
        assert!(gate.try_fire(0.0, 2.0));
        assert!(!gate.try_fire(1.0, 2.0));
        assert_eq!(gate.ready_at, 2.0);
        assert!(gate.try_fire(2.0, 2.0));
        assert_eq!(gate.ready_at, 4.0);
    }

    #[test]
    fn flag_expires_once() {
        let mut flag = TimedFlag::default();
        flag.start(0.0, 0.1);
        assert!(flag.is_active(0.05));
        assert!(!flag.expire(0.05));
        assert!(flag.expire(0.1));
        assert!(!flag.expire(0.2));
        assert!(!flag.is_active(0.2));
    }

    #[test]
    fn extend_never_shortens() {
        let mut flag = TimedFlag::default();
        flag.start(0.0, 5.0);
        flag.extend(1.0, 1.0);
        assert_eq!(flag.until, Some(5.0));
        flag.extend(4.5, 2.0);
        assert_eq!(flag.until, Some(6.5));
    }
}
