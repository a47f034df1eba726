//! Exchange plan generation.
//!
//! A plan explains, step by step, which conversions turn the current
//! holdings into `quantity` units of a reward. Steps form a tree (a tier
//! deficit expands into lower-tier deficits) flattened depth-first, parents
//! before children, top-level steps from the highest tier down.
//!
//! Stock is claimed through a [`ReservationLedger`] cloned once per call:
//! the reward's own tier needs are reserved first, then each expansion debits
//! what it takes. The ledger never replenishes, so a plan read top to bottom
//! never relies on stock an earlier step already used.
//!
//! The generator does not decide affordability; it describes the conversions
//! for any quantity and leaves feasibility to [`crate::evaluate_feasibility`].

use crate::{
    catalog::Ladder,
    types::{Holdings, RewardDefinition, Tier, TierMap},
};

/// What a step produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepTarget {
    /// Units of a ladder tier.
    Tier(Tier),
    /// The reward itself (always the final step).
    Reward(String),
}

/// Structured narration fragment attached to a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepNote {
    /// Input covered by reserved stock.
    FromStock { tier: Tier, quantity: i64 },
    /// Input that must be synthesized; explained by the following child step.
    Synthesize { tier: Tier, quantity: i64 },
    /// Flat base-currency cost of this step.
    BaseCurrency { amount: i64 },
    /// Tier units consumed by the final reward step.
    Consumes { tier: Tier, quantity: i64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeStep {
    pub target: StepTarget,
    pub quantity: i64,
    /// 0 for top-level steps, +1 per expansion level.
    pub depth: usize,
    pub notes: Vec<StepNote>,
}

impl ExchangeStep {
    pub fn is_final(&self) -> bool {
        matches!(self.target, StepTarget::Reward(_))
    }

    pub fn base_currency(&self) -> i64 {
        self.notes
            .iter()
            .map(|n| match n {
                StepNote::BaseCurrency { amount } => *amount,
                _ => 0,
            })
            .fold(0_i64, |acc, v| acc.saturating_add(v))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangePlan {
    pub reward: String,
    pub quantity: i64,
    pub steps: Vec<ExchangeStep>,
    /// Sum of every step's base-currency cost (saturating).
    pub total_base_currency: i64,
    /// Recipe tiers outside the ladder that stock does not cover.
    pub unresolved: TierMap,
}

impl ExchangePlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn final_step(&self) -> Option<&ExchangeStep> {
        self.steps.last().filter(|s| s.is_final())
    }

    /// Conversion steps only (everything but the final reward step).
    pub fn conversions(&self) -> impl Iterator<Item = &ExchangeStep> {
        self.steps.iter().filter(|s| !s.is_final())
    }

    /// True when the reward can be taken without any conversion.
    pub fn is_direct(&self) -> bool {
        self.unresolved.is_empty() && self.conversions().next().is_none()
    }

    /// Every recipe need is covered by stock or a conversion step.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reservation ledger
// ---------------------------------------------------------------------------

/// Scratch copy of tier stock. Local to one `generate_plan` call.
#[derive(Clone, Debug)]
struct ReservationLedger {
    stock: TierMap,
}

impl ReservationLedger {
    fn seed(holdings: &Holdings) -> Self {
        Self {
            stock: holdings.tiers.clone(),
        }
    }

    /// Debit up to `wanted` of `tier`; returns the amount actually taken.
    fn take(&mut self, tier: Tier, wanted: i64) -> i64 {
        if wanted <= 0 {
            return 0;
        }
        let slot = self.stock.entry(tier).or_insert(0);
        let taken = wanted.min((*slot).max(0));
        *slot -= taken;
        taken
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Ordered conversion steps for `quantity` units of `reward`.
///
/// `quantity <= 0` yields an empty plan. Otherwise the last step is always
/// the reward step with the requested quantity.
///
/// A tier-1 shortfall is bought as its own depth-0 step after the tier >= 2
/// expansions, even when higher tiers were short as well.
pub fn generate_plan(
    ladder: &Ladder,
    holdings: &Holdings,
    reward: &RewardDefinition,
    quantity: i64,
) -> ExchangePlan {
    let mut plan = ExchangePlan {
        reward: reward.name.clone(),
        quantity,
        steps: Vec::new(),
        total_base_currency: 0,
        unresolved: TierMap::new(),
    };
    if quantity <= 0 {
        return plan;
    }

    let mut ledger = ReservationLedger::seed(holdings);

    // Reserve the reward's direct needs before any expansion claims stock.
    let mut direct_need = TierMap::new();
    let mut shortfall = TierMap::new();
    for (tier, per_unit) in reward.per_unit_tiers.iter().rev() {
        let need = per_unit.saturating_mul(quantity);
        if need <= 0 {
            continue;
        }
        direct_need.insert(*tier, need);
        let missing = need - ledger.take(*tier, need);
        if missing <= 0 {
            continue;
        }
        if ladder.contains(*tier) {
            shortfall.insert(*tier, missing);
        } else {
            plan.unresolved.insert(*tier, missing);
        }
    }

    for tier in ladder.tiers_descending().filter(|t| *t >= 2) {
        if let Some(missing) = shortfall.get(&tier) {
            expand(ladder, tier, *missing, 0, &mut ledger, &mut plan.steps);
        }
    }

    // Tier 1 bought straight from base currency: a separate top-up after the
    // per-tier loop, never folded into it.
    if let Some(missing) = shortfall.get(&1) {
        expand(ladder, 1, *missing, 0, &mut ledger, &mut plan.steps);
    }

    let mut notes: Vec<StepNote> = direct_need
        .iter()
        .rev()
        .map(|(tier, qty)| StepNote::Consumes {
            tier: *tier,
            quantity: *qty,
        })
        .collect();
    notes.push(StepNote::BaseCurrency {
        amount: reward.per_unit_base_currency.saturating_mul(quantity),
    });
    plan.steps.push(ExchangeStep {
        target: StepTarget::Reward(reward.name.clone()),
        quantity,
        depth: 0,
        notes,
    });

    plan.total_base_currency = plan
        .steps
        .iter()
        .fold(0_i64, |acc, s| acc.saturating_add(s.base_currency()));
    plan
}

/// Emit a step producing `quantity` of `tier`, then its sub-steps.
///
/// Each lower-tier input is drawn from the ledger first; whatever the ledger
/// cannot cover becomes a deficit expanded one level deeper.
fn expand(
    ladder: &Ladder,
    tier: Tier,
    quantity: i64,
    depth: usize,
    ledger: &mut ReservationLedger,
    steps: &mut Vec<ExchangeStep>,
) {
    let idx = steps.len();
    steps.push(ExchangeStep {
        target: StepTarget::Tier(tier),
        quantity,
        depth,
        notes: Vec::new(),
    });

    let Some(rule) = ladder.rule(tier) else {
        return;
    };

    let mut notes = Vec::new();
    for (low, amt) in rule.lower_tier_cost.iter().rev() {
        let required = quantity.saturating_mul(*amt);
        if required <= 0 {
            continue;
        }

        let from_stock = ledger.take(*low, required);
        if from_stock > 0 {
            notes.push(StepNote::FromStock {
                tier: *low,
                quantity: from_stock,
            });
        }

        let deficit = required - from_stock;
        if deficit > 0 {
            notes.push(StepNote::Synthesize {
                tier: *low,
                quantity: deficit,
            });
            expand(ladder, *low, deficit, depth + 1, ledger, steps);
        }
    }
    notes.push(StepNote::BaseCurrency {
        amount: quantity.saturating_mul(rule.base_currency_cost),
    });

    steps[idx].notes = notes;
}
