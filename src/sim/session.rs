//! Session state machine
//!
//! Owns the single [`PlayerState`] of the current run and sequences
//! MENU -> PLAYING -> (SHOP <-> PLAYING) -> GAME_OVER | VICTORY.
//! Gameplay collaborators only ever go through the methods here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use super::progression::{DamageOutcome, ProgressError};
use super::shop::{CATALOG, PurchaseError, PurchaseReceipt, ShopItem, ShopItemKind, roll_offers};
use super::state::{GameEvent, PlayerState, SessionStatus};
use crate::consts::*;
use crate::settings::{Language, Settings};
use crate::summary::{RunOutcome, RunSummary};

/// Phase-change requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    StartGame,
    RequestShop,
    CloseShop,
    RestartGame,
}

impl std::fmt::Display for SessionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionAction::StartGame => "start_game",
            SessionAction::RequestShop => "request_shop",
            SessionAction::CloseShop => "close_shop",
            SessionAction::RestartGame => "restart_game",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{action} is not allowed while {from}")]
    IllegalTransition {
        action: SessionAction,
        from: SessionStatus,
    },
}

/// Read-only projection handed to the renderer/HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub score: u64,
    pub lives: u32,
    pub max_lives: u32,
    pub level: u32,
    pub max_level: u32,
    pub collected_letters: Vec<u8>,
    pub gems_collected: u64,
    pub distance: f64,
    pub speed: f32,
    pub speed_percent: u32,
    pub lane: i8,
    pub is_immortality_active: bool,
    pub has_double_jump: bool,
    pub has_immortality_ability: bool,
    pub language: Language,
    /// Empty unless status is SHOP
    pub offers: Vec<ShopItem>,
}

/// One game session: phase, current run, shop offers and the last run's summary
#[derive(Debug, Clone)]
pub struct Session {
    status: SessionStatus,
    player: PlayerState,
    offers: Vec<ShopItem>,
    /// Bumped every time a new run is allocated
    generation: u64,
    rng: Pcg32,
    language: Language,
    last_run: Option<RunSummary>,
    events: Vec<GameEvent>,
}

impl Session {
    /// New session on the menu screen; `seed` drives shop rolls
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed))
    }

    /// New session using the given random source for shop rolls
    pub fn with_rng(rng: Pcg32) -> Self {
        Self {
            status: SessionStatus::Menu,
            player: PlayerState::new(),
            offers: Vec::new(),
            generation: 0,
            rng,
            language: Language::default(),
            last_run: None,
            events: Vec::new(),
        }
    }

    /// New session picking up the player's saved preferences
    pub fn from_settings(seed: u64, settings: &Settings) -> Self {
        let mut session = Self::new(seed);
        session.language = settings.language;
        session
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Identity of the current run; deferred timers must carry it
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current offers (empty outside the shop)
    pub fn offers(&self) -> &[ShopItem] {
        &self.offers
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Summary of the most recently finished run
    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let p = &self.player;
        SessionSnapshot {
            status: self.status,
            score: p.score(),
            lives: p.lives(),
            max_lives: p.max_lives(),
            level: p.level(),
            max_level: MAX_LEVEL,
            collected_letters: p.collected_letters().iter().copied().collect(),
            gems_collected: p.gems_collected(),
            distance: p.distance(),
            speed: p.speed(),
            speed_percent: crate::speed_percent(p.speed()),
            lane: p.runner().lane,
            is_immortality_active: p.is_immortality_active(),
            has_double_jump: p.has_double_jump(),
            has_immortality_ability: p.has_immortality_ability(),
            language: self.language,
            offers: self.offers.clone(),
        }
    }

    // === Phase transitions ===

    pub fn start_game(&mut self) -> Result<(), TransitionError> {
        self.require(SessionAction::StartGame, &[SessionStatus::Menu])?;
        self.begin_run();
        Ok(())
    }

    pub fn restart_game(&mut self) -> Result<(), TransitionError> {
        self.require(
            SessionAction::RestartGame,
            &[SessionStatus::GameOver, SessionStatus::Victory],
        )?;
        self.begin_run();
        Ok(())
    }

    pub fn request_shop(&mut self) -> Result<(), TransitionError> {
        self.require(SessionAction::RequestShop, &[SessionStatus::Playing])?;
        self.offers = roll_offers(&CATALOG, &self.player, &mut self.rng);
        log::debug!(
            "Shop offers: {:?}",
            self.offers.iter().map(|o| o.kind).collect::<Vec<_>>()
        );
        self.set_status(SessionStatus::Shop);
        Ok(())
    }

    pub fn close_shop(&mut self) -> Result<(), TransitionError> {
        self.require(SessionAction::CloseShop, &[SessionStatus::Shop])?;
        self.offers.clear();
        self.set_status(SessionStatus::Playing);
        Ok(())
    }

    // === Economy ===

    /// Buy one of the current offers. Nothing changes unless this returns `Ok`.
    pub fn purchase(
        &mut self,
        item: ShopItemKind,
        expected_cost: u64,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        let result = self.player.purchase(item, expected_cost, &self.offers);
        match &result {
            Ok(receipt) => {
                log::info!(
                    "Purchased {} for {} ({} credits left)",
                    receipt.item,
                    receipt.cost,
                    receipt.score_after
                );
                if item.item().one_time {
                    self.offers.retain(|offer| offer.kind != item);
                }
                self.events.push(GameEvent::Purchased { item });
            }
            Err(err) => log::debug!("Purchase rejected: {err}"),
        }
        result
    }

    // === Gameplay events ===

    /// Take `amount` damage; ends the run when lives hit zero
    pub fn apply_damage(&mut self, amount: u32) -> Result<DamageOutcome, ProgressError> {
        self.require_playing()?;
        let outcome = self.player.apply_damage(amount);
        match outcome {
            DamageOutcome::Blocked => self.events.push(GameEvent::DamageBlocked),
            DamageOutcome::Hit { lives_left } => {
                self.events.push(GameEvent::Damaged { lives_left });
                if lives_left == 0 {
                    self.finish_run(RunOutcome::GameOver);
                }
            }
        }
        Ok(outcome)
    }

    /// Pick up the letter at `index` of the target word
    pub fn collect_letter(&mut self, index: u8) -> Result<(), ProgressError> {
        self.require_playing()?;
        if self.player.collect_letter(index)? {
            self.events.push(GameEvent::LetterCollected { index });
        }
        self.check_victory();
        Ok(())
    }

    pub fn advance_level(&mut self) -> Result<(), ProgressError> {
        self.require_playing()?;
        if self.player.advance_level() {
            let level = self.player.level();
            log::info!("Level {level} reached");
            self.events.push(GameEvent::LevelAdvanced { level });
        }
        self.check_victory();
        Ok(())
    }

    /// Start (or restart) the invincibility window
    pub fn activate_immortality(&mut self) -> Result<(), ProgressError> {
        self.require_playing()?;
        self.player.activate_immortality()?;
        self.events.push(GameEvent::ImmortalityStarted);
        Ok(())
    }

    /// Deferred-callback form of immortality expiry for hosts running their own
    /// timers. Callbacks from an earlier run are ignored.
    pub fn expire_immortality(&mut self, generation: u64) -> Result<(), ProgressError> {
        if generation != self.generation {
            return Err(ProgressError::StaleTimer {
                timer: generation,
                current: self.generation,
            });
        }
        if self.player.end_immortality() {
            self.events.push(GameEvent::ImmortalityEnded);
        }
        Ok(())
    }

    pub fn accrue_score(&mut self, delta: i64) -> Result<(), ProgressError> {
        self.require_playing()?;
        self.player.accrue_score(delta);
        Ok(())
    }

    pub fn accrue_gems(&mut self, delta: i64) -> Result<(), ProgressError> {
        self.require_playing()?;
        self.player.accrue_gems(delta);
        Ok(())
    }

    pub fn accrue_distance(&mut self, delta: f64) -> Result<(), ProgressError> {
        self.require_playing()?;
        self.player.accrue_distance(delta);
        Ok(())
    }

    /// Record the simulation's current run speed
    pub fn set_speed(&mut self, speed: f32) {
        self.player.set_speed(speed);
    }

    // === Internals ===

    pub(crate) fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn require(
        &self,
        action: SessionAction,
        allowed: &[SessionStatus],
    ) -> Result<(), TransitionError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            log::debug!("Ignoring {action} while {}", self.status);
            Err(TransitionError::IllegalTransition {
                action,
                from: self.status,
            })
        }
    }

    fn require_playing(&self) -> Result<(), ProgressError> {
        if self.status == SessionStatus::Playing {
            Ok(())
        } else {
            Err(ProgressError::NotPlaying {
                status: self.status,
            })
        }
    }

    fn begin_run(&mut self) {
        self.generation += 1;
        self.player = PlayerState::new();
        self.offers.clear();
        log::info!("Run {} starting", self.generation);
        self.set_status(SessionStatus::Playing);
    }

    fn check_victory(&mut self) {
        if self.status == SessionStatus::Playing
            && self.player.has_all_letters()
            && self.player.level() == MAX_LEVEL
        {
            self.finish_run(RunOutcome::Victory);
        }
    }

    fn finish_run(&mut self, outcome: RunOutcome) {
        // No ticks run after this point
        if self.player.end_immortality() {
            self.events.push(GameEvent::ImmortalityEnded);
        }
        let summary = RunSummary::from_player(&self.player, outcome, self.generation);
        log::info!(
            "Run {} ended ({outcome:?}) with {} credits",
            self.generation,
            summary.score
        );
        self.last_run = Some(summary);
        self.set_status(match outcome {
            RunOutcome::GameOver => SessionStatus::GameOver,
            RunOutcome::Victory => SessionStatus::Victory,
        });
    }

    fn set_status(&mut self, to: SessionStatus) {
        let from = self.status;
        if from != to {
            log::info!("Session {from} -> {to}");
            self.status = to;
            self.events.push(GameEvent::StatusChanged { from, to });
        }
    }
}
