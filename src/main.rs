//! AdaLend CLI
//!
//! Command-line front end for the lending dashboard:
//! - Connect, inspect and disconnect a wallet
//! - Browse markets, statistics and recommendations
//! - Show positions and simulate supply/borrow
//!
//! Every invocation behaves like a page reload: the wallet connection is
//! restored from the persisted record in the data directory.

use adalend::config::{generate_default_config, Config};
use adalend::market::{
    format_apy, format_compact, format_health_factor, format_ratio, format_usd, Fetched,
    Market, SimulationAction,
};
use adalend::store::{FileStore, SessionStore};
use adalend::wallet::{
    known_wallet, wallet_display_name, DevRegistry, WalletAdapter, WalletConnection,
    SUPPORTED_WALLETS,
};
use adalend::LendingClient;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "adalend")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lending dashboard for Cardano")]
#[command(long_about = "AdaLend shows lending markets and your position, and connects a CIP-30 wallet.\nMarket data falls back to a static snapshot when the API is unreachable.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Lending API base URL (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the wallet connection
    Wallet {
        #[command(subcommand)]
        action: WalletCommand,
    },

    /// List all markets
    Markets,

    /// Show one market
    Market {
        /// Market id (e.g. ada, djed)
        id: String,
    },

    /// Aggregate market statistics
    Stats,

    /// Supply and borrow recommendations
    Recommendations,

    /// Show a user's position
    Position {
        /// Address (default: the connected wallet)
        address: Option<String>,
    },

    /// Simulate a supply or borrow
    Simulate {
        /// supply or borrow
        #[arg(value_enum)]
        action: SimulateAction,
        /// Asset id (e.g. lovelace)
        asset_id: String,
        /// Amount in whole tokens
        amount: String,
        /// Address (default: the connected wallet)
        #[arg(long)]
        address: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum WalletCommand {
    /// List wallets that are available to connect
    List,
    /// Authorize a wallet and remember it
    Connect {
        /// Provider id (e.g. nami, eternl)
        provider: String,
    },
    /// Show the current connection
    Status,
    /// Forget the current connection
    Disconnect,
}

#[derive(Clone, Copy, ValueEnum)]
enum SimulateAction {
    Supply,
    Borrow,
}

impl From<SimulateAction> for SimulationAction {
    fn from(action: SimulateAction) -> Self {
        match action {
            SimulateAction::Supply => SimulationAction::Supply,
            SimulateAction::Borrow => SimulationAction::Borrow,
        }
    }
}

type Connection = WalletConnection<DevRegistry, FileStore>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.url = url.clone();
    }

    init_logging(&config);

    match cli.command {
        Commands::Wallet { action } => run_wallet(action, &config, cli.format).await?,

        Commands::Markets => {
            let fetched = client(&config)?.markets_or_fallback().await;
            notice(&fetched);
            match cli.format {
                OutputFormat::Json => print_json(&fetched.data)?,
                OutputFormat::Table => print_markets(&fetched.data),
            }
        }

        Commands::Market { id } => {
            let fetched = client(&config)?.market_or_fallback(&id).await;
            notice(&fetched);
            let Some(market) = fetched.data else {
                bail!("Market {} not found", id);
            };
            match cli.format {
                OutputFormat::Json => print_json(&market)?,
                OutputFormat::Table => print_market(&market),
            }
        }

        Commands::Stats => {
            let fetched = client(&config)?.market_stats_or_fallback().await;
            notice(&fetched);
            let stats = fetched.data;
            match cli.format {
                OutputFormat::Json => print_json(&stats)?,
                OutputFormat::Table => {
                    println!("Total supply:     {}", format_usd(stats.total_supply));
                    println!("Total borrowed:   {}", format_usd(stats.total_borrow));
                    println!("Markets:          {}", stats.markets_count);
                    println!("Avg supply APY:   {}", format_apy(stats.avg_supply_rate));
                    println!("Avg borrow APY:   {}", format_apy(stats.avg_borrow_rate));
                    println!();
                    println!("Top markets by supply:");
                    for (i, m) in stats.top_markets.iter().enumerate() {
                        println!("  {}. {:<20} {}", i + 1, m.name, m.total_supply);
                    }
                }
            }
        }

        Commands::Recommendations => {
            let fetched = client(&config)?.recommendations_or_fallback().await;
            notice(&fetched);
            let recs = fetched.data;
            match cli.format {
                OutputFormat::Json => print_json(&recs)?,
                OutputFormat::Table => {
                    if let Some(overall) = &recs.overall_recommendation {
                        println!("{}", overall);
                        println!();
                    }
                    println!("Best to supply:");
                    for m in &recs.best_supply_opportunities {
                        println!("  {:<20} {} APY", m.name, format_apy(m.supply_apy));
                    }
                    println!("Best to borrow:");
                    for m in &recs.best_borrow_opportunities {
                        println!("  {:<20} {} APY", m.name, format_apy(m.borrow_apy));
                    }
                    println!("Safest collateral:");
                    for m in &recs.safest_supply_markets {
                        println!("  {:<20} {} CF", m.name, format_ratio(m.collateral_factor));
                    }
                }
            }
        }

        Commands::Position { address } => {
            let address = resolve_address(address, &config)?;
            let fetched = client(&config)?.user_position_or_fallback(&address).await;
            notice(&fetched);
            let response = fetched.data;
            match cli.format {
                OutputFormat::Json => print_json(&response)?,
                OutputFormat::Table => {
                    let position = &response.position;
                    println!("Address:        {}", position.user_address);
                    println!("Wallet balance: {} ADA", response.address_info.balance.ada);
                    println!("Supplied:       {}", format_usd(position.total_supplied_usd));
                    println!("Borrowed:       {}", format_usd(position.total_borrowed_usd));
                    println!("Borrow limit:   {}", format_usd(position.borrow_limit_usd));
                    println!("Health factor:  {}", format_health_factor(position.health_factor));

                    if !position.supplies.is_empty() {
                        println!();
                        println!("Supplies:");
                        for s in &position.supplies {
                            println!("  {:<12} {:>14} {:>10} {}", short_asset(&s.asset_id), s.amount, format_usd(s.amount_usd), format_apy(s.apy));
                        }
                    }
                    if !position.borrows.is_empty() {
                        println!();
                        println!("Borrows:");
                        for b in &position.borrows {
                            println!("  {:<12} {:>14} {:>10} {}", short_asset(&b.asset_id), b.amount, format_usd(b.amount_usd), format_apy(b.apy));
                        }
                    }
                }
            }
        }

        Commands::Simulate {
            action,
            asset_id,
            amount,
            address,
        } => {
            let address = resolve_address(address, &config)?;
            let response = client(&config)?
                .simulate(action.into(), &address, &asset_id, &amount)
                .await
                .context("Simulation failed")?;

            match cli.format {
                OutputFormat::Json => print_json(&response)?,
                OutputFormat::Table => {
                    let tx = &response.transaction;
                    let position = &response.simulated_position;
                    println!("Simulated {} of {} {}", tx.action.as_str(), tx.amount, short_asset(&tx.asset_id));
                    println!("Value:          {}", format_usd(tx.amount_usd));
                    println!(
                        "Health factor:  {} -> {}",
                        format_health_factor(tx.health_factor_before),
                        format_health_factor(tx.health_factor_after)
                    );
                    println!("Supplied:       {}", format_usd(position.total_supplied_usd));
                    println!("Borrowed:       {}", format_usd(position.total_borrowed_usd));
                    println!("Borrow limit:   {}", format_usd(position.borrow_limit_usd));
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(format!("adalend={}", config.logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn client(config: &Config) -> Result<LendingClient> {
    LendingClient::new(config.api.client_config()).context("Failed to create HTTP client")
}

fn connection(config: &Config) -> Connection {
    let adapter =
        WalletAdapter::with_allow_list(config.wallet.dev_registry(), config.wallet.allowed.clone());
    let store = SessionStore::new(FileStore::in_dir(config.storage.data_path()));
    WalletConnection::restore(adapter, store)
}

/// Explicit address, or the connected wallet's
fn resolve_address(address: Option<String>, config: &Config) -> Result<String> {
    if let Some(address) = address {
        return Ok(address);
    }

    match connection(config).projection().and_then(|p| p.address) {
        Some(address) => Ok(address),
        None => bail!("No address given and no wallet connected (try `adalend wallet connect <provider>`)"),
    }
}

async fn run_wallet(action: WalletCommand, config: &Config, format: OutputFormat) -> Result<()> {
    let connection = connection(config);

    match action {
        WalletCommand::List => {
            let available = connection.available_providers();
            match format {
                OutputFormat::Json => print_json(&available)?,
                OutputFormat::Table => {
                    if available.is_empty() {
                        println!("No wallet extensions found.");
                        println!();
                        println!("Supported wallets:");
                        for wallet in SUPPORTED_WALLETS {
                            println!("  {:<12} {}", wallet.name, wallet.website);
                        }
                    } else {
                        for id in &available {
                            let description = known_wallet(id).map(|w| w.description).unwrap_or("");
                            println!("{:<12} {:<12} {}", id, wallet_display_name(id), description);
                        }
                    }
                }
            }
        }

        WalletCommand::Connect { provider } => {
            let projection = connection.connect(&provider).await?;
            match format {
                OutputFormat::Json => print_json(&projection)?,
                OutputFormat::Table => {
                    println!("Connected to {}", wallet_display_name(&projection.name));
                    println!("  Address: {}", display_or_dash(&projection.display_address));
                    println!("  Balance: {} ADA", projection.display_balance);
                }
            }
        }

        WalletCommand::Status => {
            let state = connection.state();
            let projection = connection.projection();
            match format {
                OutputFormat::Json => print_json(&projection)?,
                OutputFormat::Table => {
                    println!("Status: {}", state);
                    if let Some(p) = projection {
                        println!("  Wallet:  {}", wallet_display_name(&p.name));
                        println!("  Address: {}", display_or_dash(&p.display_address));
                        println!("  Balance: {} ADA", p.display_balance);
                    }
                }
            }
        }

        WalletCommand::Disconnect => {
            connection.disconnect().await?;
            println!("Wallet disconnected");
        }
    }

    Ok(())
}

fn notice<T>(fetched: &Fetched<T>) {
    if let Some(notice) = fetched.notice() {
        eprintln!("Note: {}", notice);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_markets(markets: &[Market]) {
    if markets.is_empty() {
        println!("No markets");
        return;
    }

    println!(
        "{:<8} {:<20} {:>14} {:>10} {:>14} {:>10} {:>8}",
        "Symbol", "Name", "Total Supply", "Supply", "Total Borrow", "Borrow", "Util"
    );
    println!("{}", "-".repeat(90));

    let mut sorted: Vec<&Market> = markets.iter().collect();
    sorted.sort_by(|a, b| {
        b.total_supply_usd
            .partial_cmp(&a.total_supply_usd)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for m in sorted {
        println!(
            "{:<8} {:<20} {:>14} {:>10} {:>14} {:>10} {:>8}",
            m.symbol,
            m.name,
            format_usd(m.total_supply_usd),
            format_apy(m.supply_apy),
            format_usd(m.total_borrow_usd),
            format_apy(m.borrow_apy),
            format_ratio(m.utilization_rate)
        );
    }
}

fn print_market(m: &Market) {
    println!("{} ({})", m.name, m.symbol);
    println!("  Asset id:              {}", m.asset_id);
    println!("  Price:                 ${} ({})", m.price_usd, m.price_oracle);
    println!();
    println!("  Supply APY:            {}", format_apy(m.supply_apy));
    println!("  Borrow APY:            {}", format_apy(m.borrow_apy));
    println!("  Total supplied:        {} {} ({})", format_compact(m.total_supply_tokens()), m.symbol, format_usd(m.total_supply_usd));
    println!("  Total borrowed:        {} {} ({})", format_compact(m.total_borrow_tokens()), m.symbol, format_usd(m.total_borrow_usd));
    println!("  Available liquidity:   {} {} ({})", format_compact(m.liquidity_tokens()), m.symbol, format_usd(m.liquidity_usd));
    println!("  Utilization:           {}", format_ratio(m.utilization_rate));
    println!();
    println!("  Collateral factor:     {}", format_ratio(m.collateral_factor));
    println!("  Liquidation threshold: {}", format_ratio(m.liquidation_threshold));
    println!("  Liquidation penalty:   {}", format_ratio(m.liquidation_penalty));
    println!("  Reserve factor:        {}", format_ratio(m.reserve_factor));
    println!("  Usable as collateral:  {}", if m.can_use_as_collateral { "yes" } else { "no" });
}

/// Asset name part of `policy.asset`, or the whole id
fn short_asset(asset_id: &str) -> &str {
    asset_id.rsplit('.').next().unwrap_or(asset_id)
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
