//! Gemini Runner - session and progression engine for a lane runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic session state (phases, economy, shop, progression)
//! - `platform`: Browser bindings exposing the engine to the web front end
//! - `settings`: Player preferences (UI language)
//! - `summary`: End-of-run summary

pub mod platform;
pub mod settings;
pub mod sim;
pub mod summary;

pub use settings::{Language, Settings};
pub use sim::{Session, SessionSnapshot, SessionStatus, ShopItemKind, TickInput, tick};
pub use summary::{RunOutcome, RunSummary};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Simulation ticks per second
    pub const TICKS_PER_SECOND: u64 = 120;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Lives at the start of every run
    pub const BASE_MAX_LIVES: u32 = 3;
    /// Number of levels; collecting every letter on the last one wins the run
    pub const MAX_LEVEL: u32 = 3;

    /// Collectible letters, in display order
    pub const TARGET_LETTERS: [char; 6] = ['G', 'E', 'M', 'I', 'N', 'I'];

    /// Reference run speed; the HUD shows speed as a percentage of this
    pub const RUN_SPEED_BASE: f32 = 22.5;

    /// Invincibility window after activating the immortality ability
    pub const IMMORTALITY_DURATION_SECS: u64 = 5;
    pub const IMMORTALITY_DURATION_TICKS: u64 = IMMORTALITY_DURATION_SECS * TICKS_PER_SECOND;

    /// Maximum number of items offered per shop visit
    pub const MAX_SHOP_OFFERS: usize = 3;

    /// Runner lanes are -LANE_LIMIT..=LANE_LIMIT
    pub const LANE_LIMIT: i8 = 1;
}

/// Speed as a whole percentage of [`consts::RUN_SPEED_BASE`]
#[inline]
pub fn speed_percent(speed: f32) -> u32 {
    let pct = (speed / consts::RUN_SPEED_BASE * 100.0).round();
    if pct.is_finite() && pct > 0.0 { pct as u32 } else { 0 }
}
