//! Farm Client - quoting and referral resolution for the maxi farm program
//!
//! Reads platform, market and referral state through a [`LedgerReader`],
//! computes quotes with the integer math of `curve_model`, and resolves the
//! three referral tiers a trade pays rewards to. Nothing here signs or
//! submits transactions.

pub mod amount;
pub mod error;
pub mod ledger;
pub mod pda;
pub mod quote;
pub mod referral;
pub mod state;

pub use amount::{from_base_units, parse_amount, to_base_units, BASE_DECIMALS, QUOTE_DECIMALS};
pub use error::{LedgerError, QuoteError};
pub use ledger::{LedgerReader, MemoryLedger, RpcLedger, DEFAULT_RETRY_DELAY};
pub use pda::{derive_market_address, derive_platform_address, derive_referral_address, parse_address};
pub use quote::{AssetDecimals, MarketSnapshot, Quote, QuoteEngine, DEFAULT_SLIPPAGE_BPS};
pub use referral::{ReferralResolver, ReferralTier, ReferralTiers, MAX_TIERS};
pub use state::{MarketState, PlatformState, ReferralLink};

pub use curve_model;
