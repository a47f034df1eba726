use anyhow::{anyhow, Context, Result};
use erc_engine::{Catalog, ConversionRule, Ladder, RewardDefinition, Tier, TierMap};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{load_default, LoadedConfig};

/// Used when the config has no `/store/holdings_path`.
pub const DEFAULT_HOLDINGS_PATH: &str = "inventory_state.json";

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// YAML integer keys arrive as JSON object keys (strings); they are parsed
/// into tiers explicitly so a bad key names itself in the error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleDoc {
    tier: Tier,
    #[serde(default)]
    lower_tier_cost: BTreeMap<String, i64>,
    #[serde(default)]
    base_currency_cost: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RewardDoc {
    name: String,
    limit: i64,
    #[serde(default)]
    tiers: BTreeMap<String, i64>,
    #[serde(default)]
    base_currency: i64,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode `/ladder` and `/rewards` into a validated catalog.
///
/// Shape errors and ladder/catalog invariant violations are reported as
/// `CONFIG_INVALID_CATALOG`.
pub fn decode_catalog(config_json: &Value) -> Result<Catalog> {
    let ladder_json = config_json
        .get("ladder")
        .ok_or_else(|| anyhow!("CONFIG_INVALID_CATALOG: missing /ladder"))?;
    let rule_docs: Vec<RuleDoc> = serde_json::from_value(ladder_json.clone())
        .context("CONFIG_INVALID_CATALOG: /ladder must be a list of conversion rules")?;

    let reward_docs: Vec<RewardDoc> = match config_json.get("rewards") {
        None | Some(Value::Null) => Vec::new(),
        Some(v) => serde_json::from_value(v.clone())
            .context("CONFIG_INVALID_CATALOG: /rewards must be a list of reward definitions")?,
    };

    let mut rules = Vec::with_capacity(rule_docs.len());
    for doc in rule_docs {
        let context = format!("/ladder tier {}", doc.tier);
        rules.push(ConversionRule::new(
            doc.tier,
            parse_tier_map(&doc.lower_tier_cost, &context)?,
            doc.base_currency_cost,
        ));
    }
    let ladder = Ladder::new(rules).map_err(|e| anyhow!("CONFIG_INVALID_CATALOG: {e}"))?;

    let mut rewards = Vec::with_capacity(reward_docs.len());
    for doc in reward_docs {
        let context = format!("/rewards '{}'", doc.name);
        let tiers = parse_tier_map(&doc.tiers, &context)?;
        rewards.push(RewardDefinition::new(
            doc.name,
            tiers,
            doc.base_currency,
            doc.limit,
        ));
    }

    Catalog::new(ladder, rewards).map_err(|e| anyhow!("CONFIG_INVALID_CATALOG: {e}"))
}

fn parse_tier_map(raw: &BTreeMap<String, i64>, context: &str) -> Result<TierMap> {
    raw.iter()
        .map(|(key, qty)| {
            let tier = key.trim().parse::<Tier>().map_err(|_| {
                anyhow!("CONFIG_INVALID_CATALOG: key '{key}' in {context} is not a tier index")
            })?;
            Ok((tier, *qty))
        })
        .collect()
}

/// The embedded default catalog, decoded.
pub fn load_default_catalog() -> Result<Catalog> {
    let loaded: LoadedConfig = load_default()?;
    decode_catalog(&loaded.config_json)
}

// ---------------------------------------------------------------------------
// Store settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub holdings_path: String,
}

impl StoreSettings {
    pub fn from_config_json(config_json: &Value) -> Self {
        let holdings_path = config_json
            .pointer("/store/holdings_path")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_HOLDINGS_PATH)
            .to_string();
        Self { holdings_path }
    }
}
