//! Ladder and reward catalog: the static configuration the engine reads.
//!
//! Both are validated once at construction and are read-only afterwards.
//! The invariants established here are what let the evaluator and the plan
//! generator walk the ladder strictly top-down without cycle checks:
//!
//! - tiers are contiguous `1..=K`, K >= 1, each defined once
//! - every lower-tier cost key is strictly below its own tier
//! - tier 1 has no lower-tier cost
//! - costs, requirements and limits are in range
//! - every recipe tier exists in the ladder

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{ConversionRule, RewardDefinition, Tier};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration errors. All are fatal at load time, never per-call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// The ladder has no tiers.
    EmptyLadder,
    /// Two rules were given for the same tier.
    DuplicateTier { tier: Tier },
    /// Tiers are not contiguous from 1: `tier` is absent but a higher one exists.
    MissingTier { tier: Tier },
    /// A rule or recipe references a tier outside `1..=top`.
    UnknownTier { context: String, tier: Tier, top: Tier },
    /// A rule references a tier that is not strictly lower than itself.
    CyclicLadder { tier: Tier, references: Tier },
    /// Tier 1 must be synthesized from base currency only.
    Tier1HasLowerCost,
    /// A conversion cost is negative.
    NegativeCost { tier: Tier, value: i64 },
    EmptyRewardName,
    DuplicateReward { name: String },
    NonPositiveLimit { name: String, limit: i64 },
    NegativeRequirement { name: String, value: i64 },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLadder => write!(f, "ladder invariant: at least one tier is required"),
            Self::DuplicateTier { tier } => {
                write!(f, "ladder invariant: tier {tier} is defined more than once")
            }
            Self::MissingTier { tier } => {
                write!(f, "ladder invariant: tier {tier} is missing (tiers must be 1..=K)")
            }
            Self::UnknownTier { context, tier, top } => write!(
                f,
                "unknown tier {tier} in {context} (ladder defines 1..={top})"
            ),
            Self::CyclicLadder { tier, references } => write!(
                f,
                "ladder invariant: tier {tier} references tier {references}, which is not strictly lower"
            ),
            Self::Tier1HasLowerCost => {
                write!(f, "ladder invariant: tier 1 converts from base currency only")
            }
            Self::NegativeCost { tier, value } => {
                write!(f, "ladder invariant: tier {tier} has negative cost {value}")
            }
            Self::EmptyRewardName => write!(f, "catalog invariant: reward name must not be empty"),
            Self::DuplicateReward { name } => {
                write!(f, "catalog invariant: reward '{name}' is defined more than once")
            }
            Self::NonPositiveLimit { name, limit } => write!(
                f,
                "catalog invariant: reward '{name}' limit must be > 0, got {limit}"
            ),
            Self::NegativeRequirement { name, value } => write!(
                f,
                "catalog invariant: reward '{name}' has negative requirement {value}"
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

// ---------------------------------------------------------------------------
// Ladder
// ---------------------------------------------------------------------------

/// Validated conversion ladder, tiers `1..=top_tier()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ladder {
    rules: BTreeMap<Tier, ConversionRule>,
}

impl Ladder {
    pub fn new(rules: impl IntoIterator<Item = ConversionRule>) -> Result<Self, CatalogError> {
        let mut by_tier: BTreeMap<Tier, ConversionRule> = BTreeMap::new();
        for rule in rules {
            let tier = rule.tier;
            if by_tier.insert(tier, rule).is_some() {
                return Err(CatalogError::DuplicateTier { tier });
            }
        }

        let top = match by_tier.keys().next_back() {
            Some(t) => *t,
            None => return Err(CatalogError::EmptyLadder),
        };
        if by_tier.contains_key(&0) {
            return Err(CatalogError::UnknownTier {
                context: "ladder".to_string(),
                tier: 0,
                top,
            });
        }
        for tier in 1..=top {
            if !by_tier.contains_key(&tier) {
                return Err(CatalogError::MissingTier { tier });
            }
        }

        for (tier, rule) in &by_tier {
            if rule.base_currency_cost < 0 {
                return Err(CatalogError::NegativeCost {
                    tier: *tier,
                    value: rule.base_currency_cost,
                });
            }
            if *tier == 1 && !rule.lower_tier_cost.is_empty() {
                return Err(CatalogError::Tier1HasLowerCost);
            }
            for (low, amt) in &rule.lower_tier_cost {
                if *low == 0 || *low > top {
                    return Err(CatalogError::UnknownTier {
                        context: format!("conversion rule for tier {tier}"),
                        tier: *low,
                        top,
                    });
                }
                if *low >= *tier {
                    return Err(CatalogError::CyclicLadder {
                        tier: *tier,
                        references: *low,
                    });
                }
                if *amt < 0 {
                    return Err(CatalogError::NegativeCost {
                        tier: *tier,
                        value: *amt,
                    });
                }
            }
        }

        Ok(Self { rules: by_tier })
    }

    /// Highest tier index (K).
    pub fn top_tier(&self) -> Tier {
        // Non-empty by construction.
        self.rules.keys().next_back().copied().unwrap_or(0)
    }

    pub fn rule(&self, tier: Tier) -> Option<&ConversionRule> {
        self.rules.get(&tier)
    }

    /// Tiers from K down to 1.
    pub fn tiers_descending(&self) -> impl Iterator<Item = Tier> + '_ {
        self.rules.keys().rev().copied()
    }

    pub fn rules(&self) -> impl Iterator<Item = &ConversionRule> {
        self.rules.values()
    }

    pub fn contains(&self, tier: Tier) -> bool {
        self.rules.contains_key(&tier)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A ladder plus the rewards priced against it, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    ladder: Ladder,
    rewards: Vec<RewardDefinition>,
}

impl Catalog {
    pub fn new(ladder: Ladder, rewards: Vec<RewardDefinition>) -> Result<Self, CatalogError> {
        let top = ladder.top_tier();
        let mut seen: BTreeSet<&str> = BTreeSet::new();

        for reward in &rewards {
            if reward.name.trim().is_empty() {
                return Err(CatalogError::EmptyRewardName);
            }
            if !seen.insert(reward.name.as_str()) {
                return Err(CatalogError::DuplicateReward {
                    name: reward.name.clone(),
                });
            }
            if reward.acquisition_limit <= 0 {
                return Err(CatalogError::NonPositiveLimit {
                    name: reward.name.clone(),
                    limit: reward.acquisition_limit,
                });
            }
            if reward.per_unit_base_currency < 0 {
                return Err(CatalogError::NegativeRequirement {
                    name: reward.name.clone(),
                    value: reward.per_unit_base_currency,
                });
            }
            for (tier, qty) in &reward.per_unit_tiers {
                if !ladder.contains(*tier) {
                    return Err(CatalogError::UnknownTier {
                        context: format!("reward '{}'", reward.name),
                        tier: *tier,
                        top,
                    });
                }
                if *qty < 0 {
                    return Err(CatalogError::NegativeRequirement {
                        name: reward.name.clone(),
                        value: *qty,
                    });
                }
            }
        }

        Ok(Self { ladder, rewards })
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    pub fn rewards(&self) -> &[RewardDefinition] {
        &self.rewards
    }

    /// Exact name match first, then case-insensitive.
    pub fn reward(&self, name: &str) -> Option<&RewardDefinition> {
        let name = name.trim();
        self.rewards
            .iter()
            .find(|r| r.name == name)
            .or_else(|| self.rewards.iter().find(|r| r.name.eq_ignore_ascii_case(name)))
    }
}
