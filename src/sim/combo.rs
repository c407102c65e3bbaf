//! Combo tracking
//!
//! A combo is a run of conversions won by the same species. Every
//! conversion re-arms the timeout; the caller schedules the timeout with the
//! token returned by [`ComboTracker::record`] and hands it back to
//! [`ComboTracker::expire`] when it fires. Tokens from superseded arms are
//! ignored.

use super::species::Species;
use crate::consts::COMBO_PARTICLE_THRESHOLD;

/// Outcome of recording one conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboStep {
    /// Combo level after this conversion
    pub combo: u32,
    /// Token identifying the timeout armed by this conversion
    pub token: u64,
}

/// Per-battle combo state machine (idle when `current_combo == 0`)
#[derive(Debug, Clone, Default)]
pub struct ComboTracker {
    current_combo: u32,
    max_combo: u32,
    last_conversion: Option<Species>,
    arm_token: u64,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_combo(&self) -> u32 {
        self.current_combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn last_conversion(&self) -> Option<Species> {
        self.last_conversion
    }

    pub fn is_streaking(&self) -> bool {
        self.current_combo > 0
    }

    /// Record a conversion won by `winner` and re-arm the timeout
    pub fn record(&mut self, winner: Species) -> ComboStep {
        if self.last_conversion == Some(winner) {
            self.current_combo += 1;
        } else {
            self.current_combo = 1;
            self.last_conversion = Some(winner);
        }
        self.max_combo = self.max_combo.max(self.current_combo);
        self.arm_token += 1;

        ComboStep {
            combo: self.current_combo,
            token: self.arm_token,
        }
    }

    /// Handle a fired timeout. Returns true if it ended the streak.
    pub fn expire(&mut self, token: u64) -> bool {
        if token != self.arm_token || !self.is_streaking() {
            return false;
        }
        self.current_combo = 0;
        self.last_conversion = None;
        true
    }

    /// Back to a fresh battle
    pub fn reset(&mut self) {
        *self = Self {
            arm_token: self.arm_token,
            ..Self::default()
        };
    }
}

/// Cosmetic particles for a combo level, capped at `max_particles`
pub fn combo_particles(combo: u32, max_particles: u32) -> Option<u32> {
    if combo < COMBO_PARTICLE_THRESHOLD || max_particles == 0 {
        return None;
    }
    Some(combo.min(max_particles))
}
