//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key names to player intents)
//! - The wasm-bindgen surface the web front end drives

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::Intent;
