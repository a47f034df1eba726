//! `erc plan` and `erc missing`.

use anyhow::{Context, Result};
use erc_engine::{
    direct_shortfall, evaluate_feasibility, generate_plan, recipe_totals, validate_quantity,
    ExchangeStep, RewardDefinition, StepNote, StepTarget,
};

use super::{fmt_amount, Session, SessionArgs};

fn checked_quantity(reward: &RewardDefinition, qty: i64) -> Result<()> {
    validate_quantity(reward, qty).with_context(|| format!("invalid --qty for '{}'", reward.name))
}

pub fn print_plan(args: &SessionArgs, reward_name: &str, qty: i64) -> Result<()> {
    let session = Session::open(args)?;
    let reward = session.reward(reward_name)?;
    checked_quantity(reward, qty)?;

    let ladder = session.catalog.ladder();
    let holdings = session.holdings();
    let feasibility = evaluate_feasibility(ladder, qty, &holdings, reward);
    let plan = generate_plan(ladder, &holdings, reward, qty);

    println!("reward={} qty={}", reward.name, qty);
    let required = match feasibility.required_base_currency {
        Some(r) => fmt_amount(r),
        None => "overflow".to_string(),
    };
    println!(
        "affordable={} required_EP={} available_EP={} missing_EP={}",
        feasibility.affordable,
        required,
        fmt_amount(feasibility.available_base_currency),
        fmt_amount(feasibility.base_currency_missing())
    );

    println!("steps:");
    for (i, step) in plan.steps.iter().enumerate() {
        println!(
            "{}{}. {}",
            "  ".repeat(step.depth + 1),
            i + 1,
            describe_step(step)
        );
    }
    println!("total_EP={}", fmt_amount(plan.total_base_currency));
    for (tier, missing) in &plan.unresolved {
        println!(
            "cannot synthesize {} x T{}: tier is not on the ladder",
            fmt_amount(*missing),
            tier
        );
    }

    if plan.is_direct() && feasibility.affordable {
        println!("everything is on hand: no conversions needed");
    }
    if !feasibility.affordable {
        println!(
            "not affordable yet: {} EP short",
            fmt_amount(feasibility.base_currency_missing())
        );
    }

    Ok(())
}

pub fn print_missing(args: &SessionArgs, reward_name: &str, qty: i64) -> Result<()> {
    let session = Session::open(args)?;
    let reward = session.reward(reward_name)?;
    checked_quantity(reward, qty)?;

    let holdings = session.holdings();
    let totals = recipe_totals(reward, qty);
    let shortfall = direct_shortfall(&holdings, reward, qty);

    let mut recipe: Vec<String> = totals
        .tiers
        .iter()
        .map(|(t, q)| format!("{} x T{}", fmt_amount(*q), t))
        .collect();
    recipe.push(format!("{} EP", fmt_amount(totals.base_currency)));

    println!("reward={} qty={}", reward.name, qty);
    println!("recipe: {}", recipe.join(", "));

    if shortfall.is_complete() {
        println!("nothing missing: all items and EP are on hand");
        return Ok(());
    }

    println!("missing (without conversions):");
    for t in shortfall.missing_tiers() {
        println!(
            "  T{}: need {} have {} missing {}",
            t.tier,
            fmt_amount(t.needed),
            fmt_amount(t.owned),
            fmt_amount(t.missing)
        );
    }
    if shortfall.base_currency_missing > 0 {
        println!(
            "  EP: need {} have {} missing {}",
            fmt_amount(shortfall.base_currency_needed),
            fmt_amount(holdings.base_currency),
            fmt_amount(shortfall.base_currency_missing)
        );
    }

    Ok(())
}

fn describe_step(step: &ExchangeStep) -> String {
    let head = match &step.target {
        StepTarget::Tier(t) => format!("make {} x T{}", fmt_amount(step.quantity), t),
        StepTarget::Reward(name) => format!("exchange for {} x {}", fmt_amount(step.quantity), name),
    };
    let notes: Vec<String> = step.notes.iter().map(describe_note).collect();
    if notes.is_empty() {
        head
    } else {
        format!("{} [{}]", head, notes.join("; "))
    }
}

fn describe_note(note: &StepNote) -> String {
    match note {
        StepNote::FromStock { tier, quantity } => {
            format!("{} x T{} from stock", fmt_amount(*quantity), tier)
        }
        StepNote::Synthesize { tier, quantity } => {
            format!("synthesize {} x T{}", fmt_amount(*quantity), tier)
        }
        StepNote::BaseCurrency { amount } => format!("{} EP", fmt_amount(*amount)),
        StepNote::Consumes { tier, quantity } => {
            format!("spend {} x T{}", fmt_amount(*quantity), tier)
        }
    }
}
