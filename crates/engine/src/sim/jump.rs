use crate::tuning::Tuning;

/// Jump charges with a single all-at-once recharge timer.
///
/// The timer starts when the first charge is spent and, when it runs out,
/// restores every charge at once. Spending more charges while it runs does not
/// restart or extend it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpResource {
    charges: u32,
    cooldown_remaining: f32,
    max_charges: u32,
    cooldown_seconds: f32,
}

impl JumpResource {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            charges: tuning.max_jump_charges,
            cooldown_remaining: 0.0,
            max_charges: tuning.max_jump_charges,
            cooldown_seconds: tuning.jump_cooldown_seconds,
        }
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }

    pub fn max_charges(&self) -> u32 {
        self.max_charges
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    pub fn cooldown_active(&self) -> bool {
        self.cooldown_remaining > 0.0
    }

    pub fn reset(&mut self) {
        self.charges = self.max_charges;
        self.cooldown_remaining = 0.0;
    }

    pub fn request_jump(&mut self) -> bool {
        if self.charges == 0 {
            return false;
        }
        self.charges -= 1;
        if !self.cooldown_active() {
            self.cooldown_remaining = self.cooldown_seconds;
        }
        true
    }

    /// Returns true when this tick restored the charges.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.cooldown_active() || dt <= 0.0 {
            return false;
        }
        self.cooldown_remaining -= dt;
        if self.cooldown_remaining <= 0.0 {
            self.charges = self.max_charges;
            self.cooldown_remaining = 0.0;
            return true;
        }
        false
    }
}
