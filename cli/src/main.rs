//! Maxi CLI - Quotes and referral resolution for the maxi farm program
//!
//! Reads live platform, market and referral state from a Solana cluster
//! (localnet, devnet, mainnet) and prints exact trade quotes and the
//! reward tiers a trade would pay.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod client;
mod config;
mod quote;
mod referral;
mod status;

use config::{FileConfig, NetworkConfig};

#[derive(Parser)]
#[command(name = "maxi")]
#[command(about = "Maxi Farm CLI - Bonding curve quotes and referral tiers", long_about = None)]
#[command(version)]
struct Cli {
    /// Network to connect to (localnet, devnet, mainnet-beta)
    #[arg(short, long, default_value = "localnet")]
    network: String,

    /// RPC URL (overrides network default)
    #[arg(short, long)]
    url: Option<String>,

    /// Path to keypair file (trader identity)
    #[arg(short, long)]
    keypair: Option<PathBuf>,

    /// Program ID (overrides the deployed program)
    #[arg(long)]
    program_id: Option<String>,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a trade against current market state
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },

    /// Referral chain operations
    Referral {
        #[command(subcommand)]
        command: ReferralCommands,
    },

    /// Show platform configuration
    Platform,

    /// Show market state
    Market {
        /// Market address (or base mint with --mint)
        market: String,

        /// Treat the argument as a base mint and derive the market
        #[arg(long)]
        mint: bool,
    },

    /// Print program-derived addresses
    Derive {
        /// Base mint to derive the market address for
        #[arg(long)]
        mint: Option<String>,

        /// Identity to derive the referral address for (defaults to keypair)
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Tokens received for a SOL input
    Buy {
        /// Market address (or base mint with --mint)
        market: String,

        /// Treat the argument as a base mint and derive the market
        #[arg(long)]
        mint: bool,

        /// SOL to spend
        #[arg(long)]
        sol: String,
    },

    /// SOL required to receive an exact token amount
    BuyExact {
        /// Market address (or base mint with --mint)
        market: String,

        /// Treat the argument as a base mint and derive the market
        #[arg(long)]
        mint: bool,

        /// Tokens to receive
        #[arg(long)]
        tokens: String,
    },

    /// SOL received for a token input
    Sell {
        /// Market address (or base mint with --mint)
        market: String,

        /// Treat the argument as a base mint and derive the market
        #[arg(long)]
        mint: bool,

        /// Tokens to sell
        #[arg(long)]
        tokens: String,
    },
}

#[derive(Subcommand)]
enum ReferralCommands {
    /// Resolve the three reward tiers above a trader
    Tiers {
        /// Trader identity (defaults to keypair)
        #[arg(long)]
        user: Option<String>,
    },

    /// Show how a trading fee would be split across the tiers
    Rewards {
        /// Trader identity (defaults to keypair)
        #[arg(long)]
        user: Option<String>,

        /// Trading fee in lamports
        #[arg(long)]
        fee: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    // Initialize network configuration
    let config = NetworkConfig::new(
        &cli.network,
        cli.url.clone(),
        cli.keypair.clone(),
        cli.program_id.clone(),
        file,
    )?;

    if cli.verbose {
        println!("{} {}", "Network:".bright_cyan(), config.network);
        println!("{} {}", "RPC URL:".bright_cyan(), config.rpc_url);
        println!("{} {}", "Program:".bright_cyan(), config.program_id);
        match &config.keypair_path {
            Some(path) => println!("{} {}", "Keypair:".bright_cyan(), path.display()),
            None => println!("{} {}", "Keypair:".bright_cyan(), "none".dimmed()),
        }
    }

    // Execute command
    match cli.command {
        Commands::Quote { command } => match command {
            QuoteCommands::Buy { market, mint, sol } => {
                quote::quote_buy(&config, market, mint, sol).await?;
            }
            QuoteCommands::BuyExact { market, mint, tokens } => {
                quote::quote_buy_exact(&config, market, mint, tokens).await?;
            }
            QuoteCommands::Sell { market, mint, tokens } => {
                quote::quote_sell(&config, market, mint, tokens).await?;
            }
        },
        Commands::Referral { command } => match command {
            ReferralCommands::Tiers { user } => {
                referral::show_tiers(&config, user).await?;
            }
            ReferralCommands::Rewards { user, fee } => {
                referral::show_rewards(&config, user, fee).await?;
            }
        },
        Commands::Platform => {
            status::show_platform(&config).await?;
        }
        Commands::Market { market, mint } => {
            status::show_market(&config, market, mint).await?;
        }
        Commands::Derive { mint, user } => {
            status::show_derived(&config, mint, user)?;
        }
    }

    Ok(())
}
