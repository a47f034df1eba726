use crate::{
    catalog::Ladder,
    types::{Holdings, RewardDefinition, Tier, TierMap},
};

/// Outcome of one feasibility evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feasibility {
    pub quantity: i64,
    /// Total base currency after converting every tier deficit.
    /// `None` if the arithmetic overflowed (treated as unaffordable).
    pub required_base_currency: Option<i64>,
    pub available_base_currency: i64,
    pub affordable: bool,
}

impl Feasibility {
    /// Base currency still missing (0 when affordable or on overflow).
    pub fn base_currency_missing(&self) -> i64 {
        match self.required_base_currency {
            Some(required) => (required - self.available_base_currency).max(0),
            None => 0,
        }
    }
}

/// True iff `quantity` units of `reward` are affordable after top-down conversion.
pub fn is_affordable(
    ladder: &Ladder,
    quantity: i64,
    holdings: &Holdings,
    reward: &RewardDefinition,
) -> bool {
    evaluate_feasibility(ladder, quantity, holdings, reward).affordable
}

/// Full evaluation: required vs. available base currency.
///
/// `quantity <= 0` means nothing to make and is trivially affordable.
pub fn evaluate_feasibility(
    ladder: &Ladder,
    quantity: i64,
    holdings: &Holdings,
    reward: &RewardDefinition,
) -> Feasibility {
    let available_base_currency = holdings.base_currency;

    if quantity <= 0 {
        return Feasibility {
            quantity,
            required_base_currency: Some(0),
            available_base_currency,
            affordable: true,
        };
    }

    let required_base_currency = required_base_currency(ladder, quantity, holdings, reward);
    let affordable = matches!(required_base_currency, Some(r) if r <= available_base_currency);

    Feasibility {
        quantity,
        required_base_currency,
        available_base_currency,
        affordable,
    }
}

/// Top-down greedy resolution on a private copy of `holdings`.
///
/// Tiers are visited from K down to 1. Each tier first draws on stock; the
/// remaining deficit is synthesized at once, pushing its lower-tier costs into
/// the needs of tiers not yet visited and its flat cost into the total. Tier 1
/// has no lower-tier cost, so its deficit goes straight to base currency.
/// Needs only ever flow downward, so no tier is revisited.
///
/// A recipe tier the ladder does not define can only come from stock; any
/// deficit there has no rule to synthesize it and yields `None`.
fn required_base_currency(
    ladder: &Ladder,
    quantity: i64,
    holdings: &Holdings,
    reward: &RewardDefinition,
) -> Option<i64> {
    let mut inv = holdings.clone();

    let mut need = TierMap::new();
    for tier in ladder.tiers_descending() {
        need.insert(tier, 0);
    }
    for (tier, per_unit) in &reward.per_unit_tiers {
        need.insert(*tier, per_unit.checked_mul(quantity)?);
    }

    let mut total = reward.per_unit_base_currency.checked_mul(quantity)?;

    let order: Vec<Tier> = need.keys().rev().copied().collect();
    for tier in order {
        let want = need.get(&tier).copied().unwrap_or(0);
        if want <= 0 {
            continue;
        }

        let held = inv.tier(tier).max(0);
        let used = want.min(held);
        inv.set_tier(tier, held - used);
        need.insert(tier, 0);

        let deficit = want - used;
        if deficit <= 0 {
            continue;
        }

        let rule = ladder.rule(tier)?;
        for (low, amt) in &rule.lower_tier_cost {
            let add = deficit.checked_mul(*amt)?;
            let slot = need.entry(*low).or_insert(0);
            *slot = slot.checked_add(add)?;
        }
        total = total.checked_add(deficit.checked_mul(rule.base_currency_cost)?)?;
    }

    Some(total)
}
