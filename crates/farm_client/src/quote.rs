//! Quote engine: reads state, runs the curve pipelines, converts amounts
//!
//! Reads are issued sequentially (platform, then market) and every quote
//! is computed from that one snapshot. Quotes are advisory: reserves can
//! move before the trade lands and the program re-validates on submission.

use curve_model::math::{max_input, min_output};
use curve_model::{BuyExactQuote, BuyQuote, SellQuote, DEPLOYED_TAX_BPS};
use log::{debug, warn};
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;

use crate::amount::{from_base_units, to_base_units, BASE_DECIMALS, QUOTE_DECIMALS};
use crate::error::QuoteError;
use crate::ledger::LedgerReader;
use crate::state::{MarketState, PlatformState};

/// Default slippage allowance in bps units (10%)
pub const DEFAULT_SLIPPAGE_BPS: u64 = 1_000;

/// Asset precision used at the decimal boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetDecimals {
    pub quote: u32,
    pub base: u32,
}

impl Default for AssetDecimals {
    fn default() -> Self {
        Self {
            quote: QUOTE_DECIMALS,
            base: BASE_DECIMALS,
        }
    }
}

/// Platform and market state read together for one quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSnapshot {
    pub platform: PlatformState,
    pub market: MarketState,
}

/// A computed quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote<B> {
    /// Result in display units
    pub amount: Decimal,
    /// Result in smallest units
    pub units: u64,
    /// Every intermediate step of the pipeline
    pub breakdown: B,
    /// Tax configured on the pool, bps units
    pub pool_tax_bps: u64,
}

impl<B> Quote<B> {
    /// The pool's own tax field differs from the tax the formulas apply
    pub fn tax_mismatch(&self) -> bool {
        self.pool_tax_bps != DEPLOYED_TAX_BPS
    }

    /// Smallest acceptable output for a trade built from this quote
    pub fn min_output_units(&self, slippage_bps: u64) -> Result<u64, QuoteError> {
        Ok(min_output(self.units, slippage_bps)?)
    }

    /// Largest input to authorize for a trade built from this quote
    pub fn max_input_units(&self, slippage_bps: u64) -> Result<u64, QuoteError> {
        Ok(max_input(self.units, slippage_bps)?)
    }
}

pub struct QuoteEngine<L> {
    ledger: L,
    decimals: AssetDecimals,
}

impl<L: LedgerReader> QuoteEngine<L> {
    pub fn new(ledger: L) -> Self {
        Self::with_decimals(ledger, AssetDecimals::default())
    }

    pub fn with_decimals(ledger: L, decimals: AssetDecimals) -> Self {
        Self { ledger, decimals }
    }

    /// Read platform state, then market state
    pub async fn snapshot(&self, market: &Pubkey) -> Result<MarketSnapshot, QuoteError> {
        let platform = self
            .ledger
            .fetch_platform_state()
            .await?
            .ok_or_else(|| QuoteError::DataUnavailable("platform state not initialized".to_string()))?;
        debug!(
            "platform: trading_fee={} fee_recipient={}",
            platform.trading_fee, platform.fee_recipient
        );

        let market_state = self
            .ledger
            .fetch_market_state(market)
            .await?
            .ok_or_else(|| QuoteError::NotFound(format!("market {}", market)))?;
        debug!(
            "market {}: base={}+{} quote={}+{} threshold={} tax={}",
            market,
            market_state.base_reserve_real,
            market_state.base_reserve_virtual,
            market_state.quote_reserve_real,
            market_state.quote_reserve_virtual,
            market_state.quote_reserve_threshold,
            market_state.tax_rate_bps
        );

        if market_state.tax_rate_bps != DEPLOYED_TAX_BPS {
            warn!(
                "market {} is configured with tax {} bps but quotes apply the deployed {} bps",
                market, market_state.tax_rate_bps, DEPLOYED_TAX_BPS
            );
        }

        Ok(MarketSnapshot {
            platform,
            market: market_state,
        })
    }

    /// Base output for a quote (SOL) input
    pub async fn quote_buy_from_input(
        &self,
        market: &Pubkey,
        quote_input: Decimal,
    ) -> Result<Quote<BuyQuote>, QuoteError> {
        let units = to_base_units(quote_input, self.decimals.quote)?;
        let snapshot = self.snapshot(market).await?;
        let breakdown = curve_model::buy_from_input(
            &snapshot.market.reserves(),
            snapshot.platform.trading_fee,
            units,
        )?;
        debug!("buy from input {:?}", breakdown);
        self.finish(breakdown.output, self.decimals.base, breakdown, &snapshot)
    }

    /// Quote (SOL) input required for a base output
    pub async fn quote_buy_from_output(
        &self,
        market: &Pubkey,
        base_output: Decimal,
    ) -> Result<Quote<BuyExactQuote>, QuoteError> {
        let units = to_base_units(base_output, self.decimals.base)?;
        let snapshot = self.snapshot(market).await?;
        let breakdown = curve_model::buy_from_output(
            &snapshot.market.reserves(),
            snapshot.platform.trading_fee,
            units,
        )?;
        debug!("buy from output {:?}", breakdown);
        self.finish(breakdown.total_input, self.decimals.quote, breakdown, &snapshot)
    }

    /// Quote (SOL) output for a base input
    pub async fn quote_sell_from_input(
        &self,
        market: &Pubkey,
        base_input: Decimal,
    ) -> Result<Quote<SellQuote>, QuoteError> {
        let units = to_base_units(base_input, self.decimals.base)?;
        let snapshot = self.snapshot(market).await?;
        let breakdown = curve_model::sell_from_input(
            &snapshot.market.reserves(),
            snapshot.platform.trading_fee,
            units,
        )?;
        debug!("sell from input {:?}", breakdown);
        self.finish(breakdown.output, self.decimals.quote, breakdown, &snapshot)
    }

    fn finish<B>(
        &self,
        units: u64,
        decimals: u32,
        breakdown: B,
        snapshot: &MarketSnapshot,
    ) -> Result<Quote<B>, QuoteError> {
        Ok(Quote {
            amount: from_base_units(units, decimals)?,
            units,
            breakdown,
            pool_tax_bps: snapshot.market.tax_rate_bps,
        })
    }
}
