use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;

use commands::{SessionArgs, TierAmount};

#[derive(Parser)]
#[command(name = "erc")]
#[command(about = "Event rewards calculator: affordability and exchange plans", long_about = None)]
struct Cli {
    #[command(flatten)]
    session: GlobalArgs,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Config layers in merge order (default: embedded catalog)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    /// Holdings state file (default: store.holdings_path from config)
    #[arg(long, global = true, env = "ERC_HOLDINGS")]
    holdings: Option<String>,

    /// Fail instead of warn when the config carries unused keys
    #[arg(long, global = true, default_value_t = false)]
    strict_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Affordability table: max units per reward with conversions
    Rewards,

    /// Ordered exchange plan for N units of a reward
    Plan {
        /// Reward name (case-insensitive)
        #[arg(long)]
        reward: String,

        /// Units wanted (1..=limit)
        #[arg(long, default_value_t = 1)]
        qty: i64,
    },

    /// Recipe totals and what is missing without any conversion
    Missing {
        #[arg(long)]
        reward: String,

        #[arg(long, default_value_t = 1)]
        qty: i64,
    },

    /// Inspect or edit stored holdings
    Holdings {
        #[command(subcommand)]
        cmd: HoldingsCmd,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> overlays)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Subcommand)]
enum HoldingsCmd {
    /// Print stored holdings
    Show,

    /// Update stored holdings; unspecified values are kept
    Set {
        /// Base currency (EP)
        #[arg(long)]
        base_currency: Option<i64>,

        /// Tier amount as TIER=QTY (repeatable)
        #[arg(long = "tier", value_parser = commands::parse_tier_amount)]
        tiers: Vec<TierAmount>,
    },
}

fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    let session = SessionArgs {
        config_paths: cli.session.config_paths,
        holdings_path: cli.session.holdings,
        strict_config: cli.session.strict_config,
    };

    match cli.cmd {
        Commands::Rewards => commands::catalog::rewards_table(&session)?,

        Commands::Plan { reward, qty } => commands::plan::print_plan(&session, &reward, qty)?,

        Commands::Missing { reward, qty } => {
            commands::plan::print_missing(&session, &reward, qty)?
        }

        Commands::Holdings { cmd } => match cmd {
            HoldingsCmd::Show => commands::holdings::show(&session)?,
            HoldingsCmd::Set {
                base_currency,
                tiers,
            } => commands::holdings::set(&session, base_currency, &tiers)?,
        },

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = erc_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` overrides.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
