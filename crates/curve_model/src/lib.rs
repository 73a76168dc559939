//! Curve Model - Pure integer math for the maxi farm bonding curve
//!
//! Every formula here mirrors the deployed program's integer arithmetic
//! exactly. Quotes that disagree with the program by a single smallest unit
//! fail the on-chain slippage checks, so nothing in this crate touches
//! floating point.

#![no_std]

pub mod math;
pub mod pipeline;
pub mod rewards;
pub mod swap;

pub use pipeline::{
    buy_from_input, buy_from_output, sell_from_input, BuyExactQuote, BuyQuote, CurveReserves,
    SellQuote,
};
pub use rewards::{split_rewards, RewardSplit, TierRewards};
pub use swap::{swap_in, swap_in_ceil, swap_out};

/// Fee units per 1% (trading fee 1000 = 1%)
pub const FEE_PRE_DIV: u64 = 1_000;

/// Denominator for every trading-fee formula (100% in fee units)
pub const FEE_DENOMINATOR: u64 = FEE_PRE_DIV * 100;

/// Reward/tax units per 1% (2000 = 20%)
pub const BPS: u64 = 100;

/// Denominator for tier rewards and pool tax (100% in bps units)
pub const BPS_DENOMINATOR: u64 = BPS * 100;

/// Upper bound the program accepts for the platform trading fee (5%)
pub const MAX_TRADING_FEE: u64 = 5 * FEE_PRE_DIV;

/// Tax percentage the quoting formulas apply.
///
/// The program's currently deployed tax is 20% for every pool, and the
/// quote formulas hardcode it (`x4/5` forward, `x5/4` inverse). Pools carry
/// their own `tax` field as well; the two are not reconciled here.
pub const DEPLOYED_TAX_PERCENT: u64 = 20;

/// `DEPLOYED_TAX_PERCENT` expressed in pool tax units
pub const DEPLOYED_TAX_BPS: u64 = DEPLOYED_TAX_PERCENT * BPS;

/// Default real quote threshold for new pools (82 SOL)
pub const NORMAL_REAL_QUOTE_THRESHOLD: u64 = 82_000_000_000;

/// Default tier rewards in bps units (25%, 3.5%, 3%)
pub const DEF_TIER1_REWARD: u64 = 25 * BPS;
pub const DEF_TIER2_REWARD: u64 = 7 * BPS / 2;
pub const DEF_TIER3_REWARD: u64 = 3 * BPS;

/// Error types for curve operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// Input reserve plus input amount is zero
    EmptyReserves,
    /// Requested output is not strictly below the output reserve
    InvalidRange,
    /// Result does not fit in u64
    Overflow,
}
