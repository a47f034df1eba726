//! Command handler modules for the `erc` binary.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod catalog;
pub mod holdings;
pub mod plan;

use anyhow::{anyhow, bail, Context, Result};
use erc_config::{StoreSettings, UnusedKeyPolicy};
use erc_engine::{Catalog, Holdings, RewardDefinition, Tier};
use erc_store::HoldingsStore;
use tracing::debug;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Global flags shared by every command.
pub struct SessionArgs {
    pub config_paths: Vec<String>,
    pub holdings_path: Option<String>,
    pub strict_config: bool,
}

/// Catalog + holdings store resolved from the global flags.
pub struct Session {
    pub catalog: Catalog,
    pub store: HoldingsStore,
    pub config_hash: String,
}

impl Session {
    pub fn open(args: &SessionArgs) -> Result<Self> {
        let loaded = if args.config_paths.is_empty() {
            erc_config::load_default()?
        } else {
            let path_refs: Vec<&str> = args.config_paths.iter().map(|s| s.as_str()).collect();
            erc_config::load_layered_yaml(&path_refs)?
        };

        let policy = if args.strict_config {
            UnusedKeyPolicy::Fail
        } else {
            UnusedKeyPolicy::Warn
        };
        erc_config::report_unused_keys(&loaded.config_json, policy)?;

        let catalog = erc_config::decode_catalog(&loaded.config_json)?;

        let holdings_path = match &args.holdings_path {
            Some(p) => p.clone(),
            None => StoreSettings::from_config_json(&loaded.config_json).holdings_path,
        };
        debug!(
            config_hash = %loaded.config_hash,
            holdings_path = %holdings_path,
            "session opened"
        );

        Ok(Self {
            catalog,
            store: HoldingsStore::new(holdings_path),
            config_hash: loaded.config_hash,
        })
    }

    /// Stored holdings; an unreadable file counts as empty.
    pub fn holdings(&self) -> Holdings {
        self.store.load_or_empty(self.catalog.ladder())
    }

    pub fn reward(&self, name: &str) -> Result<&RewardDefinition> {
        self.catalog.reward(name).ok_or_else(|| {
            let known: Vec<&str> = self
                .catalog
                .rewards()
                .iter()
                .map(|r| r.name.as_str())
                .collect();
            anyhow!(
                "unknown reward '{}'. expected one of: {}",
                name.trim(),
                known.join(" | ")
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// `--tier T=N` argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierAmount {
    pub tier: Tier,
    pub quantity: i64,
}

/// clap value parser for `T=N`.
pub fn parse_tier_amount(raw: &str) -> Result<TierAmount> {
    let (tier, qty) = raw
        .split_once('=')
        .with_context(|| format!("invalid --tier '{}'. expected TIER=QTY", raw))?;
    let tier: Tier = tier
        .trim()
        .parse()
        .with_context(|| format!("invalid tier '{}' in --tier '{}'", tier.trim(), raw))?;
    let quantity: i64 = qty
        .trim()
        .replace(' ', "")
        .parse()
        .with_context(|| format!("invalid quantity '{}' in --tier '{}'", qty.trim(), raw))?;
    if quantity < 0 {
        bail!("invalid --tier '{}': quantity must be >= 0", raw);
    }
    Ok(TierAmount { tier, quantity })
}

/// Group digits in threes with a space: `1234567` -> `1 234 567`.
pub fn fmt_amount(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
