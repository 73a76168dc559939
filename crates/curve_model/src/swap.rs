//! Constant product formulas (input_reserve * output_reserve = k)
//!
//! Reserves passed here are effective reserves (real + virtual). All
//! intermediates are u128; results are truncated exactly like the program.

use crate::math::{mul_u64, to_u64};
use crate::CurveError;

/// Output received for `input_amount`
///
/// output = floor(output_reserve * input_amount / (input_reserve + input_amount))
///
/// A zero denominator (empty input reserve and zero input) is rejected
/// rather than divided.
pub fn swap_out(input_amount: u64, input_reserve: u64, output_reserve: u64) -> Result<u64, CurveError> {
    let denominator = input_reserve as u128 + input_amount as u128;
    if denominator == 0 {
        return Err(CurveError::EmptyReserves);
    }
    to_u64(mul_u64(output_reserve, input_amount) / denominator)
}

/// Input required to receive `output_amount`
///
/// input = floor(input_reserve * output_amount / (output_reserve - output_amount))
///
/// Undefined unless `output_amount < output_reserve`.
pub fn swap_in(output_amount: u64, input_reserve: u64, output_reserve: u64) -> Result<u64, CurveError> {
    if output_amount >= output_reserve {
        return Err(CurveError::InvalidRange);
    }
    let denominator = (output_reserve - output_amount) as u128;
    to_u64(mul_u64(input_reserve, output_amount) / denominator)
}

/// Same as [`swap_in`] but rounded up, so that
/// `swap_out(swap_in_ceil(y, ..), ..) >= y` always holds.
pub fn swap_in_ceil(output_amount: u64, input_reserve: u64, output_reserve: u64) -> Result<u64, CurveError> {
    if output_amount >= output_reserve {
        return Err(CurveError::InvalidRange);
    }
    let denominator = (output_reserve - output_amount) as u128;
    to_u64(mul_u64(input_reserve, output_amount).div_ceil(denominator))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOL: u64 = 1_000_000_000;
    const TOKEN: u64 = 1_000_000;

    #[test]
    fn test_swap_out_basic() {
        // 30 SOL virtual, 1B tokens: 1 SOL buys 1B * 1 / 31 tokens
        let out = swap_out(SOL, 30 * SOL, 1_000_000_000 * TOKEN).unwrap();
        assert_eq!(out, 32_258_064_516_129);
    }

    #[test]
    fn test_swap_out_truncates() {
        // 100 * 3 / (7 + 3) = 30 exactly, 100 * 4 / 11 = 36.36..
        assert_eq!(swap_out(3, 7, 100), Ok(30));
        assert_eq!(swap_out(4, 7, 100), Ok(36));
    }

    #[test]
    fn test_swap_out_zero_input() {
        assert_eq!(swap_out(0, 7, 100), Ok(0));
    }

    #[test]
    fn test_swap_out_empty_denominator() {
        assert_eq!(swap_out(0, 0, 100), Err(CurveError::EmptyReserves));
    }

    #[test]
    fn test_swap_out_never_drains_reserve() {
        let out = swap_out(u64::MAX, 1, 1_000).unwrap();
        assert!(out < 1_000);
    }

    #[test]
    fn test_swap_in_basic() {
        // 50 * 50 / (100 - 50) = 50
        assert_eq!(swap_in(50, 50, 100), Ok(50));
        // 7 * 36 / (100 - 36) = 3.9375
        assert_eq!(swap_in(36, 7, 100), Ok(3));
        assert_eq!(swap_in_ceil(36, 7, 100), Ok(4));
    }

    #[test]
    fn test_swap_in_rejects_full_reserve() {
        assert_eq!(swap_in(100, 50, 100), Err(CurveError::InvalidRange));
        assert_eq!(swap_in(101, 50, 100), Err(CurveError::InvalidRange));
        assert_eq!(swap_in_ceil(100, 50, 100), Err(CurveError::InvalidRange));
    }

    #[test]
    fn test_swap_in_overflow() {
        // Asking for all but one unit of a huge reserve needs more than u64
        let result = swap_in(u64::MAX - 1, u64::MAX, u64::MAX);
        assert_eq!(result, Err(CurveError::Overflow));
    }

    #[test]
    fn test_ceil_inverse_covers_output() {
        let (r_in, r_out) = (30 * SOL, 1_000_000_000 * TOKEN);
        for want in [1, 999, 123_456_789, 50_000_000 * TOKEN] {
            let input = swap_in_ceil(want, r_in, r_out).unwrap();
            assert!(swap_out(input, r_in, r_out).unwrap() >= want);
        }
    }
}
