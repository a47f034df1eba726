//! `erc rewards`: affordability table over the whole catalog.

use anyhow::Result;
use erc_engine::{is_affordable, max_affordable, Holdings, Ladder, RewardDefinition};

use super::{fmt_amount, Session, SessionArgs};

struct Row {
    name: String,
    limit: String,
    tiers: Vec<String>,
    base_currency: String,
    affordable: &'static str,
    max: String,
}

fn build_row(ladder: &Ladder, holdings: &Holdings, reward: &RewardDefinition) -> Row {
    let tiers = (1..=ladder.top_tier())
        .map(|t| match reward.requirement(t) {
            0 => "-".to_string(),
            q => fmt_amount(q),
        })
        .collect();
    Row {
        name: reward.name.clone(),
        limit: fmt_amount(reward.acquisition_limit),
        tiers,
        base_currency: fmt_amount(reward.per_unit_base_currency),
        affordable: if is_affordable(ladder, 1, holdings, reward) {
            "yes"
        } else {
            "no"
        },
        max: fmt_amount(max_affordable(ladder, holdings, reward)),
    }
}

pub fn rewards_table(args: &SessionArgs) -> Result<()> {
    let session = Session::open(args)?;
    let ladder = session.catalog.ladder();
    let holdings = session.holdings();

    let rows: Vec<Row> = session
        .catalog
        .rewards()
        .iter()
        .map(|r| build_row(ladder, &holdings, r))
        .collect();

    let mut header = vec!["reward".to_string(), "limit".to_string()];
    header.extend((1..=ladder.top_tier()).map(|t| format!("T{t}")));
    header.extend(["EP".to_string(), "can".to_string(), "max".to_string()]);

    let mut table: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    table.push(header);
    for row in rows {
        let mut cells = vec![row.name, row.limit];
        cells.extend(row.tiers);
        cells.extend([row.base_currency, row.affordable.to_string(), row.max]);
        table.push(cells);
    }

    let columns = table[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            table
                .iter()
                .map(|cells| cells[c].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!("config_hash={}", session.config_hash);
    println!(
        "holdings: EP={} {}",
        fmt_amount(holdings.base_currency),
        describe_tiers(ladder, &holdings)
    );
    for cells in &table {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                if c == 0 {
                    format!("{:<width$}", cell, width = widths[c])
                } else {
                    format!("{:>width$}", cell, width = widths[c])
                }
            })
            .collect();
        println!("{}", line.join("  ").trim_end());
    }

    Ok(())
}

/// `T1=.. T2=..` over every ladder tier.
pub fn describe_tiers(ladder: &Ladder, holdings: &Holdings) -> String {
    (1..=ladder.top_tier())
        .map(|t| format!("T{}={}", t, fmt_amount(holdings.tier(t))))
        .collect::<Vec<_>>()
        .join(" ")
}
