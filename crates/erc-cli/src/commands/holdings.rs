//! `erc holdings show|set`.

use anyhow::{bail, Result};

use super::catalog::describe_tiers;
use super::{fmt_amount, Session, SessionArgs, TierAmount};

pub fn show(args: &SessionArgs) -> Result<()> {
    let session = Session::open(args)?;
    let holdings = session.holdings();

    println!("holdings_path={}", session.store.path().display());
    println!("EP={}", fmt_amount(holdings.base_currency));
    for t in 1..=session.catalog.ladder().top_tier() {
        println!("T{}={}", t, fmt_amount(holdings.tier(t)));
    }
    Ok(())
}

pub fn set(args: &SessionArgs, base_currency: Option<i64>, tiers: &[TierAmount]) -> Result<()> {
    let session = Session::open(args)?;
    let ladder = session.catalog.ladder();

    if base_currency.is_none() && tiers.is_empty() {
        bail!("nothing to set: pass --base-currency and/or --tier TIER=QTY");
    }
    if let Some(ep) = base_currency {
        if ep < 0 {
            bail!("invalid --base-currency {}: must be >= 0", ep);
        }
    }
    for t in tiers {
        if !ladder.contains(t.tier) {
            bail!(
                "invalid --tier {}={}: ladder defines tiers 1..={}",
                t.tier,
                t.quantity,
                ladder.top_tier()
            );
        }
    }

    let mut holdings = session.holdings();
    if let Some(ep) = base_currency {
        holdings.base_currency = ep;
    }
    for t in tiers {
        holdings.set_tier(t.tier, t.quantity);
    }

    session.store.save(&holdings)?;

    println!(
        "saved: EP={} {}",
        fmt_amount(holdings.base_currency),
        describe_tiers(ladder, &holdings)
    );
    Ok(())
}
