//! Manifold Markets client smoke test entry point.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use manifold_check::check::run_basic_check;
use manifold_check::config::Config;
use manifold_check::market::{Bet, ManifoldClient, Market, Position, SearchFilter};
use manifold_check::metrics;

/// Manifold Markets client smoke test.
#[derive(Parser, Debug)]
#[command(name = "manifold-check")]
#[command(about = "Connectivity check and read-only queries for the Manifold Markets API")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one market and report pass/fail (default).
    Check,

    /// Check configuration validity.
    CheckConfig,

    /// List recent markets.
    Markets {
        /// Number of markets to fetch (max 1000).
        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        /// Only markets created before this market ID.
        #[arg(long)]
        before: Option<String>,
    },

    /// Show one market as JSON.
    Market {
        /// Market ID.
        id: String,
    },

    /// Search markets by term.
    Search {
        /// Search term.
        term: String,

        /// Number of results (max 100).
        #[arg(short, long, default_value_t = 25)]
        limit: u32,

        /// Filter: all, open, closed or resolved.
        #[arg(short, long, default_value = "all")]
        filter: SearchFilter,
    },

    /// List recent bets.
    Bets {
        /// Only bets by this user.
        #[arg(long, conflicts_with = "market")]
        username: Option<String>,

        /// Only bets on this market ID.
        #[arg(long)]
        market: Option<String>,

        /// Number of bets to fetch (max 1000).
        #[arg(short, long, default_value_t = 100)]
        limit: u32,
    },

    /// Show one user as JSON.
    User {
        /// Username.
        username: String,
    },

    /// List a user's current positions.
    Positions {
        /// Username.
        username: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the check's status lines.
    let filter = if args.verbose {
        EnvFilter::new("manifold_check=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    metrics::init_metrics();

    let result = match args.command.unwrap_or(Command::Check) {
        Command::Check => return cmd_check().await,
        Command::CheckConfig => cmd_check_config(),
        Command::Markets { limit, before } => cmd_markets(limit, before.as_deref()).await,
        Command::Market { id } => cmd_market(&id).await,
        Command::Search {
            term,
            limit,
            filter,
        } => cmd_search(&term, limit, filter).await,
        Command::Bets {
            username,
            market,
            limit,
        } => cmd_bets(username.as_deref(), market.as_deref(), limit).await,
        Command::User { username } => cmd_user(&username).await,
        Command::Positions { username } => cmd_positions(&username).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the basic client check against the live API.
async fn cmd_check() -> ExitCode {
    let mut stdout = std::io::stdout().lock();
    let outcome = run_basic_check(|| Ok(ManifoldClient::from_env()?), &mut stdout).await;
    ExitCode::from(outcome.exit_status())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("MANIFOLD CHECK - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  API URL: {}", config.api_base());
    match config.manifold_http_timeout_ms {
        Some(ms) => println!("  Timeout: {}ms", ms),
        None => println!("  Timeout: none"),
    }
    println!("  Pool Size: {}", config.manifold_http_pool_size);
    println!("  User-Agent: {}", config.manifold_user_agent);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

async fn cmd_markets(limit: u32, before: Option<&str>) -> anyhow::Result<()> {
    let client = ManifoldClient::from_env()?;
    let markets = client.get_markets(limit, before).await?;
    print_markets(&markets);
    Ok(())
}

async fn cmd_market(id: &str) -> anyhow::Result<()> {
    let client = ManifoldClient::from_env()?;
    let market = client.get_market(id).await?;
    println!("{}", serde_json::to_string_pretty(&market)?);
    Ok(())
}

async fn cmd_search(term: &str, limit: u32, filter: SearchFilter) -> anyhow::Result<()> {
    let client = ManifoldClient::from_env()?;
    let markets = client.search_markets(term, limit, filter).await?;
    print_markets(&markets);
    Ok(())
}

async fn cmd_bets(
    username: Option<&str>,
    market: Option<&str>,
    limit: u32,
) -> anyhow::Result<()> {
    let client = ManifoldClient::from_env()?;
    let bets = match market {
        Some(market_id) => client.get_market_bets(market_id, limit).await?,
        None => client.get_user_bets(username, limit).await?,
    };
    print_bets(&bets);
    Ok(())
}

async fn cmd_user(username: &str) -> anyhow::Result<()> {
    let client = ManifoldClient::from_env()?;
    let user = client.get_user(username).await?;
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

async fn cmd_positions(username: &str) -> anyhow::Result<()> {
    let client = ManifoldClient::from_env()?;
    let positions = client.get_user_positions(username).await?;
    print_positions(&positions);
    Ok(())
}

fn print_markets(markets: &[Market]) {
    println!("{} market(s)", markets.len());
    for market in markets {
        let probability = market
            .probability
            .map(|p| format!("{:>5.1}%", p * 100.0))
            .unwrap_or_else(|| "     -".to_string());
        println!(
            "  {:<24} {} {}",
            market.id.as_deref().unwrap_or("-"),
            probability,
            market.question_or_unknown()
        );
    }
}

fn print_bets(bets: &[Bet]) {
    println!("{} bet(s)", bets.len());
    for bet in bets {
        println!(
            "  {:<24} {:>4} {:>10.2} on {}",
            bet.id.as_deref().unwrap_or("-"),
            bet.outcome.as_deref().unwrap_or("-"),
            bet.amount.unwrap_or_default(),
            bet.contract_id.as_deref().unwrap_or("-")
        );
    }
}

fn print_positions(positions: &[Position]) {
    println!("{} position(s)", positions.len());
    for position in positions {
        println!(
            "  {:<24} invested {:>10.2} payout {:>10.2} profit {:>10.2}",
            position.contract_id.as_deref().unwrap_or("-"),
            position.invested.unwrap_or_default(),
            position.payout.unwrap_or_default(),
            position.profit.unwrap_or_default()
        );
    }
}
