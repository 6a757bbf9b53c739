//! Per-run progression: lives, letters, level, timed immortality and accruals

use thiserror::Error;

use super::state::{PlayerState, SessionStatus};
use crate::consts::*;

/// Gameplay events that could not be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("gameplay events are only accepted while playing (status is {status})")]
    NotPlaying { status: SessionStatus },
    #[error("letter index {index} is outside the target word")]
    InvalidLetter { index: u8 },
    #[error("immortality ability has not been unlocked")]
    AbilityLocked,
    #[error("timer from run {timer} ignored, current run is {current}")]
    StaleTimer { timer: u64, current: u64 },
}

/// What a damage event actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Lives were reduced (possibly to zero)
    Hit { lives_left: u32 },
    /// Immortality absorbed the hit
    Blocked,
}

/// Clamp an accrual delta to a non-negative amount
fn clamp_delta(delta: i64) -> u64 {
    u64::try_from(delta).unwrap_or(0)
}

impl PlayerState {
    pub(crate) fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_immortality_active() {
            return DamageOutcome::Blocked;
        }
        self.lives = self.lives.saturating_sub(amount);
        DamageOutcome::Hit {
            lives_left: self.lives,
        }
    }

    /// Insert a letter; returns true if it was new
    pub(crate) fn collect_letter(&mut self, index: u8) -> Result<bool, ProgressError> {
        if usize::from(index) >= TARGET_LETTERS.len() {
            return Err(ProgressError::InvalidLetter { index });
        }
        Ok(self.collected_letters.insert(index))
    }

    /// Move to the next level; returns true if the level changed
    pub(crate) fn advance_level(&mut self) -> bool {
        let next = (self.level + 1).min(MAX_LEVEL);
        let changed = next != self.level;
        self.level = next;
        changed
    }

    /// Open (or restart) the invincibility window from the current tick
    pub(crate) fn activate_immortality(&mut self) -> Result<(), ProgressError> {
        if !self.has_immortality_ability {
            return Err(ProgressError::AbilityLocked);
        }
        self.immortality_until = Some(self.time_ticks + IMMORTALITY_DURATION_TICKS);
        Ok(())
    }

    /// Close the invincibility window; returns true if it was open
    pub(crate) fn end_immortality(&mut self) -> bool {
        self.immortality_until.take().is_some()
    }

    /// Advance the run clock by one tick. Returns true if immortality just expired.
    pub(crate) fn advance_clock(&mut self) -> bool {
        self.time_ticks += 1;
        match self.immortality_until {
            Some(until) if self.time_ticks >= until => self.end_immortality(),
            _ => false,
        }
    }

    pub(crate) fn accrue_score(&mut self, delta: i64) {
        self.score = self.score.saturating_add(clamp_delta(delta));
    }

    pub(crate) fn accrue_gems(&mut self, delta: i64) {
        self.gems_collected = self.gems_collected.saturating_add(clamp_delta(delta));
    }

    pub(crate) fn accrue_distance(&mut self, delta: f64) {
        if delta.is_finite() && delta > 0.0 {
            self.distance += delta;
        }
    }

    pub(crate) fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    }
}
