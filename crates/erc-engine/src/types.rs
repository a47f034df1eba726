use std::collections::BTreeMap;

use crate::catalog::Ladder;

/// Index of a rung in the conversion ladder (1..=K).
pub type Tier = u8;

/// Canonical per-tier quantity map (tier -> qty).
pub type TierMap = BTreeMap<Tier, i64>;

/// Snapshot of what the player owns.
///
/// A tier missing from `tiers` is owned in quantity 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Holdings {
    pub base_currency: i64,
    pub tiers: TierMap,
}

impl Holdings {
    pub fn new(base_currency: i64, tiers: TierMap) -> Self {
        debug_assert!(base_currency >= 0, "Holdings.base_currency must be >= 0");
        debug_assert!(tiers.values().all(|q| *q >= 0), "Holdings tiers must be >= 0");
        Self {
            base_currency,
            tiers,
        }
    }

    /// Quantity owned of `tier` (0 if absent).
    pub fn tier(&self, tier: Tier) -> i64 {
        self.tiers.get(&tier).copied().unwrap_or(0)
    }

    /// Zero base currency and zero of every ladder tier.
    pub fn empty(ladder: &Ladder) -> Self {
        let mut h = Holdings::default();
        for tier in ladder.tiers_descending() {
            h.tiers.insert(tier, 0);
        }
        h
    }

    pub fn set_tier(&mut self, tier: Tier, qty: i64) {
        self.tiers.insert(tier, qty);
    }
}

/// How to synthesize one unit of `tier`.
///
/// `lower_tier_cost` keys are strictly lower than `tier`; tier 1 has none and
/// is made from base currency only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionRule {
    pub tier: Tier,
    pub lower_tier_cost: TierMap,
    pub base_currency_cost: i64,
}

impl ConversionRule {
    pub fn new(tier: Tier, lower_tier_cost: TierMap, base_currency_cost: i64) -> Self {
        Self {
            tier,
            lower_tier_cost,
            base_currency_cost,
        }
    }

    /// Tier-1 style rule: base currency only.
    pub fn base_only(tier: Tier, base_currency_cost: i64) -> Self {
        Self::new(tier, TierMap::new(), base_currency_cost)
    }
}

/// A reward the player can acquire, priced per unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardDefinition {
    pub name: String,
    pub per_unit_tiers: TierMap,
    pub per_unit_base_currency: i64,
    /// Domain cap on units obtainable (not a holdings limit).
    pub acquisition_limit: i64,
}

impl RewardDefinition {
    pub fn new<S: Into<String>>(
        name: S,
        per_unit_tiers: TierMap,
        per_unit_base_currency: i64,
        acquisition_limit: i64,
    ) -> Self {
        Self {
            name: name.into(),
            per_unit_tiers,
            per_unit_base_currency,
            acquisition_limit,
        }
    }

    /// Per-unit requirement of `tier` (0 if the recipe does not use it).
    pub fn requirement(&self, tier: Tier) -> i64 {
        self.per_unit_tiers.get(&tier).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

/// Rejections for a user-requested quantity.
///
/// Engine operations never return these; they treat `quantity <= 0` as
/// "nothing to make". Callers collecting input use [`validate_quantity`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuantityError {
    InvalidQuantity { quantity: i64 },
    AboveLimit { quantity: i64, limit: i64 },
}

impl std::fmt::Display for QuantityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuantity { quantity } => {
                write!(f, "quantity must be >= 1, got {quantity}")
            }
            Self::AboveLimit { quantity, limit } => {
                write!(f, "quantity {quantity} exceeds acquisition limit {limit}")
            }
        }
    }
}

impl std::error::Error for QuantityError {}

/// Accepts `1..=reward.acquisition_limit`.
pub fn validate_quantity(reward: &RewardDefinition, quantity: i64) -> Result<(), QuantityError> {
    if quantity < 1 {
        return Err(QuantityError::InvalidQuantity { quantity });
    }
    if quantity > reward.acquisition_limit {
        return Err(QuantityError::AboveLimit {
            quantity,
            limit: reward.acquisition_limit,
        });
    }
    Ok(())
}
