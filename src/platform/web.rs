//! wasm-bindgen surface for the web front end
//!
//! The JS side forwards key presses and runner-simulation reports, steps the
//! session once per animation frame and renders whatever `snapshot_json` says.

use wasm_bindgen::prelude::*;

use crate::consts::*;
use crate::settings::{Language, Settings};
use crate::sim::{Session, ShopItemKind, TickInput, tick};

use super::input::Intent;

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
    settings: Settings,
    /// Input collected since the last simulation tick
    pending: TickInput,
    accumulator: f32,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WebSession {
        let settings = Settings::load();
        WebSession {
            session: Session::from_settings(seed, &settings),
            settings,
            pending: TickInput::default(),
            accumulator: 0.0,
        }
    }

    pub fn start_game(&mut self) -> bool {
        self.session.start_game().is_ok()
    }

    pub fn restart_game(&mut self) -> bool {
        self.accumulator = 0.0;
        self.pending = TickInput::default();
        self.session.restart_game().is_ok()
    }

    pub fn request_shop(&mut self) -> bool {
        self.session.request_shop().is_ok()
    }

    pub fn close_shop(&mut self) -> bool {
        self.session.close_shop().is_ok()
    }

    /// Buy an offered item by its catalog id (e.g. "HEAL")
    pub fn purchase(&mut self, id: &str, cost: u32) -> bool {
        match ShopItemKind::from_str(id) {
            Some(item) => self.session.purchase(item, u64::from(cost)).is_ok(),
            None => {
                log::warn!("Unknown shop item id: {id}");
                false
            }
        }
    }

    /// Keyboard or synthesized touch-button key
    pub fn key_down(&mut self, key: &str) {
        if let Some(intent) = Intent::from_key(key) {
            intent.apply(&mut self.pending);
        }
    }

    pub fn report_score(&mut self, delta: i32) {
        self.pending.score += i64::from(delta);
    }

    pub fn report_gems(&mut self, delta: i32) {
        self.pending.gems += i64::from(delta);
    }

    pub fn report_distance(&mut self, delta: f64) {
        self.pending.distance += delta;
    }

    pub fn report_letter(&mut self, index: u8) {
        self.pending.letters.push(index);
    }

    pub fn report_level_cleared(&mut self) {
        self.pending.level_cleared = true;
    }

    pub fn report_damage(&mut self, amount: u32) {
        self.pending.damage += amount;
    }

    pub fn report_grounded(&mut self, grounded: bool) {
        self.pending.grounded = grounded;
    }

    pub fn report_speed(&mut self, speed: f32) {
        self.pending.speed = Some(speed);
    }

    /// Run fixed simulation ticks for `frame_dt` seconds of wall time
    pub fn step(&mut self, frame_dt: f32) {
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = std::mem::take(&mut self.pending);
            tick(&mut self.session, &input);
            // Grounded is a level, not an event
            self.pending.grounded = input.grounded;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    pub fn toggle_language(&mut self) {
        self.apply_language(self.session.language().toggle());
    }

    /// Pick the UI language from a code such as `navigator.language`
    pub fn set_language(&mut self, code: &str) -> bool {
        match Language::from_str(code) {
            Some(language) => {
                self.apply_language(language);
                true
            }
            None => {
                log::debug!("Unsupported language code: {code}");
                false
            }
        }
    }

    pub fn language(&self) -> String {
        self.session.language().as_str().to_string()
    }

    /// Current session projection as JSON
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_default()
    }

    /// Events raised since the last call, as a JSON array
    pub fn events_json(&mut self) -> String {
        serde_json::to_string(&self.session.drain_events()).unwrap_or_default()
    }

    /// Summary of the last finished run as JSON (`null` if none yet)
    pub fn last_run_json(&self) -> String {
        serde_json::to_string(&self.session.last_run()).unwrap_or_default()
    }
}

impl WebSession {
    fn apply_language(&mut self, language: Language) {
        self.session.set_language(language);
        self.settings.language = language;
        self.settings.save();
    }
}
