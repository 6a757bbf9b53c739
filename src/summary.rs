//! End-of-run summary shown on the game over and victory screens

use serde::{Deserialize, Serialize};

use crate::sim::PlayerState;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    GameOver,
    Victory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Session generation the run belonged to
    pub run: u64,
    pub outcome: RunOutcome,
    pub score: u64,
    pub level: u32,
    pub gems_collected: u64,
    /// Whole distance units travelled
    pub distance: u64,
    pub letters_collected: usize,
}

impl RunSummary {
    pub fn from_player(player: &PlayerState, outcome: RunOutcome, run: u64) -> Self {
        Self {
            run,
            outcome,
            score: player.score(),
            level: player.level(),
            gems_collected: player.gems_collected(),
            distance: player.distance().floor() as u64,
            letters_collected: player.collected_letters().len(),
        }
    }
}
