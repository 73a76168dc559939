//! Ledger construction and output formatting helpers

use colored::Colorize;
use farm_client::{from_base_units, MarketState, RpcLedger};
use log::debug;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;

use crate::config::NetworkConfig;

/// Create an RPC-backed ledger reader from the network configuration
pub fn create_ledger(config: &NetworkConfig) -> RpcLedger {
    debug!("ledger at {} for program {}", config.rpc_url, config.program_id);
    RpcLedger::new(config.rpc_url.clone(), config.program_id).with_retry_delay(config.retry_delay)
}

/// Resolve a market argument: a market address, or a base mint with `--mint`
pub fn market_address(config: &NetworkConfig, market: &str, by_mint: bool) -> anyhow::Result<Pubkey> {
    let key = farm_client::parse_address(market)?;
    if by_mint {
        Ok(farm_client::derive_market_address(&key, &config.program_id).0)
    } else {
        Ok(key)
    }
}

/// Rate in bps units (100 = 1%) as a percentage string
pub fn format_bps(bps: u64) -> String {
    format!("{}%", (Decimal::from(bps) / Decimal::ONE_HUNDRED).normalize())
}

/// Platform trading fee (1000 = 1%) as a percentage string
pub fn format_fee_rate(fee: u64) -> String {
    format!("{}%", (Decimal::from(fee) / Decimal::ONE_THOUSAND).normalize())
}

pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    format!("{} {}", amount, symbol).bright_white().to_string()
}

/// Graduation progress of a market, e.g. "41.5% (34.03 / 82 SOL)"
pub fn format_progress(market: &MarketState, quote_decimals: u32) -> anyhow::Result<String> {
    let real = from_base_units(market.quote_reserve_real, quote_decimals)?;
    let threshold = from_base_units(market.quote_reserve_threshold, quote_decimals)?;
    Ok(format!(
        "{} ({} / {} SOL)",
        format_bps(market.graduation_progress_bps()),
        real,
        threshold
    ))
}

/// Pretty print a pubkey as shortened address
pub fn format_pubkey(pubkey: &Pubkey) -> String {
    let addr = pubkey.to_string();
    format!("{}...{}", &addr[0..8], &addr[addr.len() - 8..]).bright_yellow().to_string()
}
