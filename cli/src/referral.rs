//! Referral commands

use anyhow::{Context, Result};
use colored::Colorize;
use farm_client::{from_base_units, LedgerReader, ReferralResolver, ReferralTiers, MAX_TIERS};
use solana_sdk::pubkey::Pubkey;

use crate::client::{create_ledger, format_amount, format_bps, format_pubkey};
use crate::config::NetworkConfig;

async fn resolve(config: &NetworkConfig, identity: &Pubkey) -> Result<ReferralTiers> {
    let resolver = ReferralResolver::new(create_ledger(config));
    resolver
        .resolve_referral_tiers(identity)
        .await
        .with_context(|| format!("Failed to resolve referral tiers for {}", identity))
}

pub async fn show_tiers(config: &NetworkConfig, user: Option<String>) -> Result<()> {
    let identity = config.identity(user.as_deref())?;

    println!("{}", "=== Referral Tiers ===".bright_green().bold());
    println!("{} {}", "Trader:".bright_cyan(), identity);

    let tiers = resolve(config, &identity).await?;
    for index in 0..MAX_TIERS {
        let label = format!("Tier {}:", index + 1);
        match tiers.get(index) {
            Some(tier) => println!(
                "{} {} (account {})",
                label.bright_cyan(),
                tier.identity,
                format_pubkey(&tier.account)
            ),
            None => println!("{} {}", label.bright_cyan(), "none".dimmed()),
        }
    }

    if tiers.is_empty() {
        println!("\n{}", "No referral chain: the whole fee goes to the platform".dimmed());
    }
    Ok(())
}

pub async fn show_rewards(config: &NetworkConfig, user: Option<String>, fee: u64) -> Result<()> {
    let identity = config.identity(user.as_deref())?;
    let ledger = create_ledger(config);

    println!("{}", "=== Referral Rewards ===".bright_green().bold());
    println!("{} {}", "Trader:".bright_cyan(), identity);
    println!("{} {} lamports", "Trading Fee:".bright_cyan(), fee);

    let platform = ledger
        .fetch_platform_state()
        .await
        .context("Failed to read platform state")?
        .context("Platform state is not initialized")?;
    let tiers = resolve(config, &identity).await?;
    let split = tiers.split_fee(fee, &platform)?;

    let rates = [
        platform.tier_rewards.tier1,
        platform.tier_rewards.tier2,
        platform.tier_rewards.tier3,
    ];
    for (index, amount) in split.tiers.iter().enumerate() {
        let label = format!("Tier {} ({}):", index + 1, format_bps(rates[index]));
        match tiers.get(index) {
            Some(tier) => println!(
                "{} {} -> {}",
                label.bright_cyan(),
                format_amount(from_base_units(*amount, config.decimals.quote)?, "SOL"),
                format_pubkey(&tier.identity)
            ),
            None => println!("{} {}", label.bright_cyan(), "none".dimmed()),
        }
    }
    println!(
        "{} {} -> {}",
        "Fee Recipient:".bright_cyan(),
        format_amount(from_base_units(split.fee_recipient, config.decimals.quote)?, "SOL"),
        format_pubkey(&platform.fee_recipient)
    );
    Ok(())
}
