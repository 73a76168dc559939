//! Decimal amounts at the caller boundary
//!
//! Callers speak in display units ("1.5" SOL); the curve math speaks in
//! smallest units. Conversion happens once on the way in and once on the way
//! out. Inbound conversion truncates so a quote never asks for more than
//! the trader entered.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::QuoteError;

/// Decimals of the quote asset (SOL)
pub const QUOTE_DECIMALS: u32 = 9;

/// Decimals of the base asset (curve tokens)
pub const BASE_DECIMALS: u32 = 6;

/// Largest decimals value whose scale fits in u64
pub const MAX_DECIMALS: u32 = 19;

fn scale(decimals: u32) -> Result<u64, QuoteError> {
    10u64
        .checked_pow(decimals)
        .ok_or_else(|| QuoteError::InvalidInput(format!("unsupported decimals {}", decimals)))
}

/// Parse a user-entered amount
pub fn parse_amount(input: &str) -> Result<Decimal, QuoteError> {
    Decimal::from_str(input.trim())
        .map_err(|err| QuoteError::InvalidInput(format!("invalid amount '{}': {}", input, err)))
}

/// Display units to smallest units, truncating any excess precision
pub fn to_base_units(amount: Decimal, decimals: u32) -> Result<u64, QuoteError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(QuoteError::InvalidInput(format!("amount {} is negative", amount)));
    }
    amount
        .checked_mul(Decimal::from(scale(decimals)?))
        .map(|scaled| scaled.trunc())
        .and_then(|units| units.to_u64())
        .ok_or_else(|| QuoteError::InvalidInput(format!("amount {} is out of range", amount)))
}

/// Smallest units to display units, exact
pub fn from_base_units(units: u64, decimals: u32) -> Result<Decimal, QuoteError> {
    scale(decimals)?;
    Decimal::try_from_i128_with_scale(units as i128, decimals)
        .map(|amount| amount.normalize())
        .map_err(|err| QuoteError::InvalidInput(format!("cannot represent {} units: {}", units, err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_conversion() {
        // 0.29 * 1e9 is 289999999.99999997 in binary floating point
        assert_eq!(to_base_units(dec!(0.29), QUOTE_DECIMALS).unwrap(), 290_000_000);
        assert_eq!(to_base_units(dec!(1.5), BASE_DECIMALS).unwrap(), 1_500_000);
    }

    #[test]
    fn test_truncates_excess_precision() {
        assert_eq!(to_base_units(dec!(1.2345679), BASE_DECIMALS).unwrap(), 1_234_567);
        assert_eq!(to_base_units(dec!(0.0000000009), QUOTE_DECIMALS).unwrap(), 0);
    }

    #[test]
    fn test_rejects_negative_and_oversized() {
        assert!(matches!(
            to_base_units(dec!(-1), QUOTE_DECIMALS),
            Err(QuoteError::InvalidInput(_))
        ));
        assert!(to_base_units(dec!(100000000000), QUOTE_DECIMALS).is_err());
        assert_eq!(to_base_units(Decimal::ZERO, QUOTE_DECIMALS).unwrap(), 0);
    }

    #[test]
    fn test_from_base_units() {
        assert_eq!(from_base_units(1_500_000_000, QUOTE_DECIMALS).unwrap(), dec!(1.5));
        assert_eq!(from_base_units(1, BASE_DECIMALS).unwrap(), dec!(0.000001));
        assert_eq!(from_base_units(u64::MAX, QUOTE_DECIMALS).unwrap().to_string(), "18446744073.709551615");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 2.75 ").unwrap(), dec!(2.75));
        assert!(matches!(parse_amount("two"), Err(QuoteError::InvalidInput(_))));
    }

    #[test]
    fn test_unsupported_decimals() {
        assert!(to_base_units(dec!(1), MAX_DECIMALS + 1).is_err());
    }
}
