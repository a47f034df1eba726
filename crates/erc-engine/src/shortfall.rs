use crate::types::{Holdings, RewardDefinition, Tier, TierMap};

/// Needed vs. owned for one recipe tier, no conversions considered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierShortfall {
    pub tier: Tier,
    pub needed: i64,
    pub owned: i64,
    pub missing: i64,
}

/// What is still missing for `count` units if nothing is converted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectShortfall {
    pub count: i64,
    /// Reward-relevant tiers, ascending.
    pub tiers: Vec<TierShortfall>,
    pub base_currency_needed: i64,
    pub base_currency_missing: i64,
}

impl DirectShortfall {
    /// Nothing is missing: every tier and the base currency are covered.
    pub fn is_complete(&self) -> bool {
        self.base_currency_missing == 0 && self.tiers.iter().all(|t| t.missing == 0)
    }

    pub fn missing_tiers(&self) -> impl Iterator<Item = &TierShortfall> {
        self.tiers.iter().filter(|t| t.missing > 0)
    }
}

/// Recipe multiplied out for `count` units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeTotals {
    pub count: i64,
    pub tiers: TierMap,
    pub base_currency: i64,
}

pub fn recipe_totals(reward: &RewardDefinition, count: i64) -> RecipeTotals {
    let count = count.max(0);
    let tiers = reward
        .per_unit_tiers
        .iter()
        .filter(|(_, qty)| **qty > 0)
        .map(|(tier, qty)| (*tier, qty.saturating_mul(count)))
        .collect();
    RecipeTotals {
        count,
        tiers,
        base_currency: reward.per_unit_base_currency.saturating_mul(count),
    }
}

/// `missing = max(0, recipe * count - owned)` per tier and for base currency.
pub fn direct_shortfall(holdings: &Holdings, reward: &RewardDefinition, count: i64) -> DirectShortfall {
    let totals = recipe_totals(reward, count);

    let tiers = totals
        .tiers
        .iter()
        .map(|(tier, needed)| {
            let owned = holdings.tier(*tier);
            TierShortfall {
                tier: *tier,
                needed: *needed,
                owned,
                missing: (*needed - owned).max(0),
            }
        })
        .collect();

    DirectShortfall {
        count: totals.count,
        tiers,
        base_currency_needed: totals.base_currency,
        base_currency_missing: (totals.base_currency - holdings.base_currency).max(0),
    }
}
