//! erc-engine
//!
//! Exchange resolution for a tiered currency ladder:
//! - Ladder + reward catalog validation (strict descent, known tiers)
//! - Feasibility: top-down greedy conversion into base currency
//! - Max affordable quantity (binary search over the acquisition limit)
//! - Exchange plan generation with a reservation ledger
//! - Direct shortfall (no conversions) and recipe totals
//!
//! Deterministic, pure logic. No IO, no time, no logging.
//! Every operation takes shared references and mutates private copies only.

mod catalog;
mod feasibility;
mod plan;
mod resolver;
mod shortfall;
mod types;

pub use catalog::{Catalog, CatalogError, Ladder};
pub use feasibility::{evaluate_feasibility, is_affordable, Feasibility};
pub use plan::{generate_plan, ExchangePlan, ExchangeStep, StepNote, StepTarget};
pub use resolver::max_affordable;
pub use shortfall::{
    direct_shortfall, recipe_totals, DirectShortfall, RecipeTotals, TierShortfall,
};
pub use types::{
    validate_quantity, ConversionRule, Holdings, QuantityError, RewardDefinition, Tier, TierMap,
};

/// Helper to build a [`TierMap`] with minimal boilerplate.
pub fn tiers<I>(items: I) -> TierMap
where
    I: IntoIterator<Item = (Tier, i64)>,
{
    let mut m = TierMap::new();
    for (tier, qty) in items {
        m.insert(tier, qty);
    }
    m
}
