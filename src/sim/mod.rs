//! Deterministic session simulation
//!
//! All authoritative game state lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (shop rolls)
//! - No rendering, audio or platform dependencies

pub mod progression;
pub mod session;
pub mod shop;
pub mod state;
pub mod tick;

pub use progression::{DamageOutcome, ProgressError};
pub use session::{Session, SessionAction, SessionSnapshot, TransitionError};
pub use shop::{CATALOG, PurchaseError, PurchaseReceipt, ShopItem, ShopItemKind, roll_offers};
pub use state::{GameEvent, PlayerState, Runner, SessionStatus};
pub use tick::{TickInput, tick};
