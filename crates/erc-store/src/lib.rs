//! erc-store
//!
//! Holdings persistence: one JSON state file per player.
//!
//! Current format:
//! ```json
//! { "base_currency": 50000, "tiers": { "1": 600, "2": 0 } }
//! ```
//! The older `{ "ep": 50000, "items": [0, 600, 0, ...] }` layout (index 0
//! unused, index N = tier N) is still read; saves always write the current one.

use anyhow::{bail, Context, Result};
use erc_engine::{Holdings, Ladder, Tier, TierMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct HoldingsFile {
    base_currency: i64,
    #[serde(default)]
    tiers: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct LegacyHoldingsFile {
    #[serde(default)]
    ep: i64,
    #[serde(default)]
    items: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum AnyHoldingsFile {
    Current(HoldingsFile),
    Legacy(LegacyHoldingsFile),
}

#[derive(Debug, Clone)]
pub struct HoldingsStore {
    path: PathBuf,
}

impl HoldingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Missing file → empty holdings for `ladder`. Malformed file → error.
    ///
    /// Every ladder tier is present in the result; stored tiers the ladder
    /// does not define are dropped with a warning.
    pub fn load(&self, ladder: &Ladder) -> Result<Holdings> {
        if !self.path.exists() {
            return Ok(Holdings::empty(ladder));
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read holdings failed: {}", self.path.display()))?;
        let raw = raw.trim_start_matches('\u{feff}');
        let parsed: AnyHoldingsFile = serde_json::from_str(raw)
            .with_context(|| format!("holdings file is not valid JSON: {}", self.path.display()))?;

        let (base_currency, stored) = match parsed {
            AnyHoldingsFile::Current(f) => (f.base_currency, parse_tier_keys(&f.tiers)?),
            AnyHoldingsFile::Legacy(f) => (f.ep, legacy_items_to_tiers(&f.items)?),
        };

        if base_currency < 0 {
            bail!("HOLDINGS_NEGATIVE_VALUE: base_currency={base_currency}");
        }

        let mut holdings = Holdings::empty(ladder);
        holdings.base_currency = base_currency;
        for (tier, qty) in stored {
            if qty < 0 {
                bail!("HOLDINGS_NEGATIVE_VALUE: tier {tier}={qty}");
            }
            if !ladder.contains(tier) {
                warn!(tier, qty, path = %self.path.display(), "dropping holdings for unknown tier");
                continue;
            }
            holdings.set_tier(tier, qty);
        }
        Ok(holdings)
    }

    /// Like [`load`](Self::load), but an unreadable file degrades to empty
    /// holdings with a warning instead of failing.
    pub fn load_or_empty(&self, ladder: &Ladder) -> Holdings {
        match self.load(ladder) {
            Ok(h) => h,
            Err(e) => {
                warn!(path = %self.path.display(), error = %format!("{e:#}"), "holdings unreadable; starting empty");
                Holdings::empty(ladder)
            }
        }
    }

    /// Write pretty JSON (+ trailing newline), creating parent directories.
    pub fn save(&self, holdings: &Holdings) -> Result<()> {
        if holdings.base_currency < 0 {
            bail!("HOLDINGS_NEGATIVE_VALUE: base_currency={}", holdings.base_currency);
        }
        if let Some((tier, qty)) = holdings.tiers.iter().find(|(_, q)| **q < 0) {
            bail!("HOLDINGS_NEGATIVE_VALUE: tier {tier}={qty}");
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create holdings dir failed: {}", parent.display()))?;
        }

        let file = HoldingsFile {
            base_currency: holdings.base_currency,
            tiers: holdings
                .tiers
                .iter()
                .map(|(tier, qty)| (tier.to_string(), *qty))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&file).context("serialize holdings failed")?;
        fs::write(&self.path, format!("{json}\n"))
            .with_context(|| format!("write holdings failed: {}", self.path.display()))?;

        info!(path = %self.path.display(), base_currency = holdings.base_currency, "holdings saved");
        Ok(())
    }
}

fn parse_tier_keys(raw: &BTreeMap<String, i64>) -> Result<TierMap> {
    raw.iter()
        .map(|(key, qty)| {
            let tier = key
                .trim()
                .parse::<Tier>()
                .with_context(|| format!("holdings tier key '{key}' is not a tier index"))?;
            Ok((tier, *qty))
        })
        .collect()
}

fn legacy_items_to_tiers(items: &[i64]) -> Result<TierMap> {
    items
        .iter()
        .enumerate()
        .skip(1)
        .map(|(idx, qty)| {
            let tier = Tier::try_from(idx)
                .with_context(|| format!("legacy holdings item index {idx} is out of range"))?;
            Ok((tier, *qty))
        })
        .collect()
}
