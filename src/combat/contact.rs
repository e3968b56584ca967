//! Per-target contact damage timers
//!
//! A contact attacker keeps one countdown per target it is touching so it
//! deals damage at most once per interval to each of them. Entries are swept
//! once their countdown has run out or their target is gone, so the map only
//! holds targets hit recently.

use std::collections::HashMap;

use crate::ActorId;

#[derive(Debug, Clone)]
pub struct ContactTimers {
    interval: f32,
    timers: HashMap<ActorId, f32>,
}

impl ContactTimers {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            timers: HashMap::new(),
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Count every timer down by `dt`.
    pub fn tick(&mut self, dt: f32) {
        for remaining in self.timers.values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
    }

    /// Returns true (and restarts the target's countdown) if the attacker may
    /// damage `target` now.
    pub fn try_trigger(&mut self, target: ActorId) -> bool {
        match self.timers.get(&target) {
            Some(remaining) if *remaining > 0.0 => false,
            _ => {
                self.timers.insert(target, self.interval);
                true
            }
        }
    }

    pub fn is_waiting_on(&self, target: ActorId) -> bool {
        self.timers.get(&target).is_some_and(|remaining| *remaining > 0.0)
    }

    /// Drop finished countdowns and countdowns for targets that no longer
    /// exist. Returns how many entries were removed.
    pub fn sweep(&mut self, target_exists: impl Fn(ActorId) -> bool) -> usize {
        let before = self.timers.len();
        self.timers
            .retain(|target, remaining| *remaining > 0.0 && target_exists(*target));
        before - self.timers.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
