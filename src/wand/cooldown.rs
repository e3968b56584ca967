//! Countdown timer used for cast gating, regen delays and effect lifetimes.
//!
//! The timer never stores negative time: ticking past zero clamps, so no
//! overshoot is carried into the next start.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CooldownTimer {
    duration: f32,
    remaining: f32,
}

impl CooldownTimer {
    /// A timer that is already counting down from `duration`.
    pub fn started(duration: f32) -> Self {
        let mut timer = Self::default();
        timer.start(duration);
        timer
    }

    /// Begin counting down from `duration` (negative durations count as 0).
    pub fn start(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
        self.remaining = self.duration;
    }

    pub fn update(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// 0 right after `start`, 1 once finished. A zero-length timer is 1.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining / self.duration).clamp(0.0, 1.0)
    }

    /// Inverse of [`Self::progress`]: 1 right after `start`, 0 once finished.
    pub fn normalized(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.duration).clamp(0.0, 1.0)
    }

    /// Restart from the last duration.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    /// Finish immediately.
    pub fn set_ready(&mut self) {
        self.remaining = 0.0;
    }
}
