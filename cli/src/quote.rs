//! Quote commands

use anyhow::{Context, Result};
use colored::Colorize;
use farm_client::{parse_amount, LedgerReader, Quote, QuoteEngine};

use crate::client::{create_ledger, format_amount, format_bps, format_pubkey, market_address};
use crate::config::NetworkConfig;

pub async fn quote_buy(config: &NetworkConfig, market: String, by_mint: bool, sol: String) -> Result<()> {
    let address = market_address(config, &market, by_mint)?;
    let engine = QuoteEngine::with_decimals(create_ledger(config), config.decimals);
    let input = parse_amount(&sol)?;

    println!("{}", "=== Buy Quote ===".bright_green().bold());
    println!("{} {}", "Market:".bright_cyan(), format_pubkey(&address));

    let quote = engine
        .quote_buy_from_input(&address, input)
        .await
        .context("Failed to quote buy")?;
    let b = &quote.breakdown;

    println!("{} {}", "Input:".bright_cyan(), format_amount(input, "SOL"));
    println!("{} {} lamports", "Trading Fee:".bright_cyan(), b.fee);
    if b.clamped {
        println!(
            "{} only {} of {} lamports reach the curve before graduation",
            "Clamped:".yellow(),
            b.effective_input,
            b.net_input
        );
    }
    println!("{} {} units", "Tax:".bright_cyan(), b.tax);
    println!("{} {}", "Output:".bright_cyan(), format_amount(quote.amount, "tokens"));
    print_min_output(config, &quote)?;
    print_tax_note(&quote);
    Ok(())
}

pub async fn quote_buy_exact(
    config: &NetworkConfig,
    market: String,
    by_mint: bool,
    tokens: String,
) -> Result<()> {
    let address = market_address(config, &market, by_mint)?;
    let engine = QuoteEngine::with_decimals(create_ledger(config), config.decimals);
    let desired = parse_amount(&tokens)?;

    println!("{}", "=== Exact Output Buy Quote ===".bright_green().bold());
    println!("{} {}", "Market:".bright_cyan(), format_pubkey(&address));

    let quote = engine
        .quote_buy_from_output(&address, desired)
        .await
        .context("Failed to quote exact output buy")?;
    let b = &quote.breakdown;

    println!("{} {}", "Desired:".bright_cyan(), format_amount(desired, "tokens"));
    println!("{} {} units", "Before Tax:".bright_cyan(), b.inflated_output);
    println!("{} {} lamports", "Curve Input:".bright_cyan(), b.raw_input);
    println!("{} {} lamports", "Trading Fee:".bright_cyan(), b.fee);
    println!("{} {}", "Required:".bright_cyan(), format_amount(quote.amount, "SOL"));
    println!(
        "{} {} lamports ({} slippage)",
        "Max Input:".bright_cyan(),
        quote.max_input_units(config.slippage_bps)?,
        format_bps(config.slippage_bps)
    );
    print_tax_note(&quote);
    Ok(())
}

pub async fn quote_sell(config: &NetworkConfig, market: String, by_mint: bool, tokens: String) -> Result<()> {
    let address = market_address(config, &market, by_mint)?;
    let engine = QuoteEngine::with_decimals(create_ledger(config), config.decimals);
    let input = parse_amount(&tokens)?;

    println!("{}", "=== Sell Quote ===".bright_green().bold());
    println!("{} {}", "Market:".bright_cyan(), format_pubkey(&address));

    let quote = engine
        .quote_sell_from_input(&address, input)
        .await
        .context("Failed to quote sell")?;
    let b = &quote.breakdown;

    println!("{} {}", "Input:".bright_cyan(), format_amount(input, "tokens"));
    println!("{} {} units", "Tax:".bright_cyan(), b.tax);
    println!("{} {} lamports", "Curve Output:".bright_cyan(), b.raw_output);
    println!("{} {} lamports", "Trading Fee:".bright_cyan(), b.fee);
    println!("{} {}", "Output:".bright_cyan(), format_amount(quote.amount, "SOL"));
    print_min_output(config, &quote)?;
    print_tax_note(&quote);
    Ok(())
}

fn print_min_output<B>(config: &NetworkConfig, quote: &Quote<B>) -> Result<()> {
    println!(
        "{} {} units ({} slippage)",
        "Min Output:".bright_cyan(),
        quote.min_output_units(config.slippage_bps)?,
        format_bps(config.slippage_bps)
    );
    Ok(())
}

fn print_tax_note<B>(quote: &Quote<B>) {
    if quote.tax_mismatch() {
        println!(
            "\n{} pool tax is {} but quotes apply the program's deployed {}",
            "Note:".yellow(),
            format_bps(quote.pool_tax_bps),
            format_bps(farm_client::curve_model::DEPLOYED_TAX_BPS)
        );
    }
}

/// Quote against an already constructed engine; used by `market` to show
/// the price of one SOL
pub async fn spot_quote<L: LedgerReader>(
    engine: &QuoteEngine<L>,
    address: &solana_sdk::pubkey::Pubkey,
) -> Result<()> {
    let one = rust_decimal::Decimal::ONE;
    let quote = engine.quote_buy_from_input(address, one).await?;
    println!(
        "{} {} per SOL",
        "Spot (1 SOL buy):".bright_cyan(),
        format_amount(quote.amount, "tokens")
    );
    Ok(())
}
