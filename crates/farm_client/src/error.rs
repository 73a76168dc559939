//! Error taxonomy for quoting and referral resolution

use curve_model::CurveError;
use thiserror::Error;

/// Failure of a quote or a referral walk
///
/// Every failure reaches the caller; nothing here falls back to a default
/// or previously computed number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// Platform or market state could not be read
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// The requested market or referral identity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Requested output is not strictly below the output reserve, or a
    /// result does not fit in the asset's integer range
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Malformed address or amount supplied by the caller
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<CurveError> for QuoteError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::EmptyReserves => {
                QuoteError::InvalidInput("input reserve and input amount are both zero".to_string())
            }
            CurveError::InvalidRange => {
                QuoteError::InvalidRange("output must be below the output reserve".to_string())
            }
            CurveError::Overflow => {
                QuoteError::InvalidRange("amount exceeds the u64 range".to_string())
            }
        }
    }
}

/// Failure reported by a ledger reader
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("rpc request for {address} failed: {reason}")]
    Rpc { address: String, reason: String },

    #[error("failed to decode {account} account: {reason}")]
    Decode {
        account: &'static str,
        reason: String,
    },
}

impl From<LedgerError> for QuoteError {
    fn from(err: LedgerError) -> Self {
        QuoteError::DataUnavailable(err.to_string())
    }
}
