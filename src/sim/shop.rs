//! Shop catalog, offer rolls and the purchase ledger

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::PlayerState;
use crate::consts::MAX_SHOP_OFFERS;

/// Everything the shop can sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShopItemKind {
    DoubleJump,
    MaxLife,
    Heal,
    Immortal,
}

impl ShopItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShopItemKind::DoubleJump => "DOUBLE_JUMP",
            ShopItemKind::MaxLife => "MAX_LIFE",
            ShopItemKind::Heal => "HEAL",
            ShopItemKind::Immortal => "IMMORTAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DOUBLE_JUMP" => Some(ShopItemKind::DoubleJump),
            "MAX_LIFE" => Some(ShopItemKind::MaxLife),
            "HEAL" => Some(ShopItemKind::Heal),
            "IMMORTAL" => Some(ShopItemKind::Immortal),
            _ => None,
        }
    }

    /// Catalog entry for this kind
    pub fn item(&self) -> ShopItem {
        match self {
            ShopItemKind::DoubleJump => CATALOG[0],
            ShopItemKind::MaxLife => CATALOG[1],
            ShopItemKind::Heal => CATALOG[2],
            ShopItemKind::Immortal => CATALOG[3],
        }
    }
}

impl std::fmt::Display for ShopItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    #[serde(rename = "id")]
    pub kind: ShopItemKind,
    /// Price in credits
    pub cost: u64,
    /// Can only be bought once per run
    #[serde(rename = "oneTime")]
    pub one_time: bool,
}

/// Fixed shop catalog, in display order
pub const CATALOG: [ShopItem; 4] = [
    ShopItem {
        kind: ShopItemKind::DoubleJump,
        cost: 1000,
        one_time: true,
    },
    ShopItem {
        kind: ShopItemKind::MaxLife,
        cost: 1500,
        one_time: false,
    },
    ShopItem {
        kind: ShopItemKind::Heal,
        cost: 1000,
        one_time: false,
    },
    ShopItem {
        kind: ShopItemKind::Immortal,
        cost: 3000,
        one_time: true,
    },
];

/// Why a purchase was turned down. No state changes on any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("{item} is not in the current offer set")]
    UnknownOffer { item: ShopItemKind },
    #[error("{item} is a one-time item that is already owned")]
    DuplicateOneTimePurchase { item: ShopItemKind },
    #[error("{item} costs {cost}, caller expected {expected}")]
    PriceMismatch {
        item: ShopItemKind,
        cost: u64,
        expected: u64,
    },
    #[error("need {cost} credits, have {available}")]
    InsufficientCredits { cost: u64, available: u64 },
}

/// Result of an applied purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub item: ShopItemKind,
    pub cost: u64,
    pub score_after: u64,
}

/// Roll a fresh offer set for one shop visit.
///
/// Owned one-time items are dropped, the remainder is shuffled and the first
/// [`MAX_SHOP_OFFERS`] are kept. A small pool simply yields fewer offers.
pub fn roll_offers<R: Rng + ?Sized>(
    catalog: &[ShopItem],
    player: &PlayerState,
    rng: &mut R,
) -> Vec<ShopItem> {
    let mut pool: Vec<ShopItem> = catalog
        .iter()
        .filter(|item| !item.one_time || !player.owns(item.kind))
        .copied()
        .collect();
    pool.shuffle(rng);
    pool.truncate(MAX_SHOP_OFFERS);
    pool
}

impl PlayerState {
    /// Buy `item` from `offers` for `expected_cost` credits.
    ///
    /// All checks run before anything is touched, so either the credits are
    /// deducted and the effect applied, or nothing changes.
    pub(crate) fn purchase(
        &mut self,
        item: ShopItemKind,
        expected_cost: u64,
        offers: &[ShopItem],
    ) -> Result<PurchaseReceipt, PurchaseError> {
        let offer = offers
            .iter()
            .find(|offer| offer.kind == item)
            .ok_or(PurchaseError::UnknownOffer { item })?;
        if offer.one_time && self.owns(item) {
            return Err(PurchaseError::DuplicateOneTimePurchase { item });
        }
        if offer.cost != expected_cost {
            return Err(PurchaseError::PriceMismatch {
                item,
                cost: offer.cost,
                expected: expected_cost,
            });
        }
        if self.score < expected_cost {
            return Err(PurchaseError::InsufficientCredits {
                cost: expected_cost,
                available: self.score,
            });
        }

        self.score -= expected_cost;
        match item {
            ShopItemKind::DoubleJump => self.has_double_jump = true,
            ShopItemKind::MaxLife => {
                self.max_lives += 1;
                self.lives = (self.lives + 1).min(self.max_lives);
            }
            ShopItemKind::Heal => self.lives = (self.lives + 1).min(self.max_lives),
            ShopItemKind::Immortal => self.has_immortality_ability = true,
        }

        Ok(PurchaseReceipt {
            item,
            cost: expected_cost,
            score_after: self.score,
        })
    }
}
