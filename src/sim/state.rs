//! Session state and core player types
//!
//! Everything a run can change lives in [`PlayerState`]. A new run always gets a
//! brand-new value; nothing is reset field by field.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::shop::ShopItemKind;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Title screen, no run allocated yet
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Between-level shop; the run is frozen
    Shop,
    /// Lives ran out
    GameOver,
    /// Every letter collected on the last level
    Victory,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Menu => "MENU",
            SessionStatus::Playing => "PLAYING",
            SessionStatus::Shop => "SHOP",
            SessionStatus::GameOver => "GAME_OVER",
            SessionStatus::Victory => "VICTORY",
        }
    }

    /// True once the run has ended and only a restart is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::GameOver | SessionStatus::Victory)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lane and jump bookkeeping for the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Runner {
    /// Current lane, -1 (left) ..= 1 (right)
    pub lane: i8,
    /// Jumps used since the runner last touched the ground
    pub jumps_used: u8,
}

impl Runner {
    pub fn move_left(&mut self) {
        self.lane = (self.lane - 1).max(-LANE_LIMIT);
    }

    pub fn move_right(&mut self) {
        self.lane = (self.lane + 1).min(LANE_LIMIT);
    }

    pub fn land(&mut self) {
        self.jumps_used = 0;
    }

    /// Start a jump if one is available. A second mid-air jump needs double jump.
    pub fn try_jump(&mut self, has_double_jump: bool) -> bool {
        let allowed = if has_double_jump { 2 } else { 1 };
        if self.jumps_used < allowed {
            self.jumps_used += 1;
            true
        } else {
            false
        }
    }
}

/// Everything one run owns (fresh on every start/restart)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Score; doubles as shop credits
    pub(crate) score: u64,
    pub(crate) gems_collected: u64,
    pub(crate) distance: f64,
    pub(crate) lives: u32,
    pub(crate) max_lives: u32,
    /// Indices into [`TARGET_LETTERS`]
    pub(crate) collected_letters: BTreeSet<u8>,
    /// 1-based
    pub(crate) level: u32,
    pub(crate) has_double_jump: bool,
    pub(crate) has_immortality_ability: bool,
    /// Tick at which the current invincibility window closes
    pub(crate) immortality_until: Option<u64>,
    /// Externally driven movement rate
    pub(crate) speed: f32,
    pub(crate) runner: Runner,
    /// Simulation tick counter (only advances while playing)
    pub(crate) time_ticks: u64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            score: 0,
            gems_collected: 0,
            distance: 0.0,
            lives: BASE_MAX_LIVES,
            max_lives: BASE_MAX_LIVES,
            collected_letters: BTreeSet::new(),
            level: 1,
            has_double_jump: false,
            has_immortality_ability: false,
            immortality_until: None,
            speed: RUN_SPEED_BASE,
            runner: Runner::default(),
            time_ticks: 0,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn gems_collected(&self) -> u64 {
        self.gems_collected
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    pub fn collected_letters(&self) -> &BTreeSet<u8> {
        &self.collected_letters
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn has_double_jump(&self) -> bool {
        self.has_double_jump
    }

    pub fn has_immortality_ability(&self) -> bool {
        self.has_immortality_ability
    }

    pub fn is_immortality_active(&self) -> bool {
        self.immortality_until.is_some()
    }

    /// Ticks left in the invincibility window (0 when inactive)
    pub fn immortality_ticks_remaining(&self) -> u64 {
        self.immortality_until
            .map(|until| until.saturating_sub(self.time_ticks))
            .unwrap_or(0)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn runner(&self) -> Runner {
        self.runner
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// True when every target letter has been picked up
    pub fn has_all_letters(&self) -> bool {
        self.collected_letters.len() == TARGET_LETTERS.len()
    }

    /// Whether a one-time item is already owned (repeatable items never are)
    pub fn owns(&self, kind: ShopItemKind) -> bool {
        match kind {
            ShopItemKind::DoubleJump => self.has_double_jump,
            ShopItemKind::Immortal => self.has_immortality_ability,
            ShopItemKind::MaxLife | ShopItemKind::Heal => false,
        }
    }
}

/// Notable things that happened, drained by the audio/HUD layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    StatusChanged {
        from: SessionStatus,
        to: SessionStatus,
    },
    Damaged {
        lives_left: u32,
    },
    /// Damage absorbed by active immortality
    DamageBlocked,
    LetterCollected {
        index: u8,
    },
    LevelAdvanced {
        level: u32,
    },
    Jumped {
        double: bool,
    },
    ImmortalityStarted,
    ImmortalityEnded,
    Purchased {
        item: ShopItemKind,
    },
}
