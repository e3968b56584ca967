//! Mana pool with delayed regeneration

use serde::Serialize;

use crate::wand::cooldown::CooldownTimer;

#[derive(Debug, Clone, Serialize)]
pub struct Mana {
    max: f32,
    current: f32,
    /// Mana restored per second once regeneration is allowed
    regen_per_second: f32,
    /// Seconds after a spend before regeneration resumes
    regen_delay: f32,
    #[serde(skip)]
    delay: CooldownTimer,
}

impl Mana {
    pub fn new(max: f32, regen_per_second: f32, regen_delay: f32) -> Self {
        let max = max.max(0.0);
        Self {
            max,
            current: max,
            regen_per_second: regen_per_second.max(0.0),
            regen_delay: regen_delay.max(0.0),
            delay: CooldownTimer::default(),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn can_afford(&self, amount: f32) -> bool {
        self.current >= amount
    }

    /// Spend `amount` if affordable. A failed spend changes nothing.
    pub fn try_spend(&mut self, amount: f32) -> bool {
        if amount <= 0.0 {
            return true;
        }
        if !self.can_afford(amount) {
            return false;
        }
        self.current -= amount;
        self.delay.start(self.regen_delay);
        true
    }

    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    /// Advance the regen delay, then regenerate if it has elapsed.
    pub fn tick(&mut self, dt: f32) {
        self.delay.update(dt);
        if self.delay.is_ready() && self.current < self.max {
            self.restore(self.regen_per_second * dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_fails_without_side_effects() {
        let mut mana = Mana::new(10.0, 5.0, 0.5);
        assert!(mana.try_spend(8.0));
        assert!(!mana.try_spend(8.0));
        assert_eq!(mana.current(), 2.0);
    }

    #[test]
    fn test_regen_waits_for_delay() {
        let mut mana = Mana::new(100.0, 10.0, 0.5);
        mana.try_spend(50.0);

        mana.tick(0.25);
        assert_eq!(mana.current(), 50.0);

        // Delay finishes this tick, so regeneration applies in the same tick
        mana.tick(0.25);
        assert_eq!(mana.current(), 52.5);

        mana.tick(10.0);
        assert_eq!(mana.current(), 100.0);
    }
}
