//! Platform and market inspection, address derivation

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use colored::Colorize;
use farm_client::{
    derive_market_address, derive_platform_address, derive_referral_address, LedgerReader,
    QuoteEngine,
};
use solana_sdk::pubkey::Pubkey;

use crate::client::{create_ledger, format_bps, format_fee_rate, format_progress, market_address};
use crate::config::NetworkConfig;
use crate::quote::spot_quote;

pub async fn show_platform(config: &NetworkConfig) -> Result<()> {
    let ledger = create_ledger(config);
    let (address, bump) = derive_platform_address(&config.program_id);

    println!("{}", "=== Platform ===".bright_green().bold());
    println!("{} {}", "Network:".bright_cyan(), config.network);
    println!("{} {}", "Program:".bright_cyan(), config.program_id);
    println!("{} {} (bump {})", "Address:".bright_cyan(), address, bump);

    let platform = ledger
        .fetch_platform_state()
        .await
        .context("Failed to read platform state")?
        .context("Platform state is not initialized")?;

    println!("{} {}", "Owner:".bright_cyan(), platform.owner);
    println!("{} {}", "Signer:".bright_cyan(), platform.signer);
    println!("{} {}", "Withdrawer:".bright_cyan(), platform.withdrawer);
    println!("{} {}", "Fee Recipient:".bright_cyan(), platform.fee_recipient);
    println!(
        "{} {} ({} units)",
        "Trading Fee:".bright_cyan(),
        format_fee_rate(platform.trading_fee),
        platform.trading_fee
    );

    println!("\n{}", "=== Tier Rewards ===".bright_yellow());
    println!("{} {}", "Tier 1:".bright_cyan(), format_bps(platform.tier_rewards.tier1));
    println!("{} {}", "Tier 2:".bright_cyan(), format_bps(platform.tier_rewards.tier2));
    println!("{} {}", "Tier 3:".bright_cyan(), format_bps(platform.tier_rewards.tier3));
    Ok(())
}

pub async fn show_market(config: &NetworkConfig, market: String, by_mint: bool) -> Result<()> {
    let address = market_address(config, &market, by_mint)?;
    let engine = QuoteEngine::with_decimals(create_ledger(config), config.decimals);

    println!("{}", "=== Market ===".bright_green().bold());
    println!("{} {}", "Address:".bright_cyan(), address);

    let snapshot = engine.snapshot(&address).await.context("Failed to read market")?;
    let m = &snapshot.market;

    println!("{} {}", "Base Mint:".bright_cyan(), m.base_mint);
    println!("{} {}", "Creator:".bright_cyan(), m.owner);
    println!("{} {}", "Tax:".bright_cyan(), format_bps(m.tax_rate_bps));

    println!("\n{}", "=== Reserves ===".bright_yellow());
    println!(
        "{} {} real + {} virtual",
        "Base:".bright_cyan(),
        m.base_reserve_real,
        m.base_reserve_virtual
    );
    println!(
        "{} {} real + {} virtual",
        "Quote:".bright_cyan(),
        m.quote_reserve_real,
        m.quote_reserve_virtual
    );
    println!(
        "{} {}",
        "Graduation:".bright_cyan(),
        format_progress(m, config.decimals.quote)?
    );

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    if m.complete {
        println!("{} {}", "Status:".bright_cyan(), "complete".bright_green());
    } else if m.in_private_sale(now) {
        println!(
            "{} private sale until {}",
            "Status:".bright_cyan(),
            m.private_sale_end()
        );
    } else {
        println!("{} {}", "Status:".bright_cyan(), "trading");
        spot_quote(&engine, &address).await?;
    }
    Ok(())
}

pub fn show_derived(config: &NetworkConfig, mint: Option<String>, user: Option<String>) -> Result<()> {
    println!("{}", "=== Derived Addresses ===".bright_green().bold());
    println!("{} {}", "Program:".bright_cyan(), config.program_id);

    let (platform, _) = derive_platform_address(&config.program_id);
    println!("{} {}", "Platform:".bright_cyan(), platform);

    if let Some(mint) = mint {
        let mint: Pubkey = farm_client::parse_address(&mint)?;
        let (market, _) = derive_market_address(&mint, &config.program_id);
        println!("{} {}", "Market:".bright_cyan(), market);
    }

    // without --user the keypair is optional here
    let identity = match user {
        Some(user) => Some(config.identity(Some(&user))?),
        None => config.pubkey(),
    };
    if let Some(identity) = identity {
        let (referral, _) = derive_referral_address(&identity, &config.program_id);
        println!("{} {}", "Referral:".bright_cyan(), referral);
    }
    Ok(())
}
