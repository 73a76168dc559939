//! Widening integer helpers

use crate::CurveError;

/// Multiply two u64 values and return u128
#[inline]
pub fn mul_u64(a: u64, b: u64) -> u128 {
    (a as u128) * (b as u128)
}

/// Narrow a u128 back to u64
#[inline]
pub fn to_u64(value: u128) -> Result<u64, CurveError> {
    u64::try_from(value).map_err(|_| CurveError::Overflow)
}

/// floor(a * b / denominator)
#[inline]
pub fn mul_div_floor(a: u64, b: u64, denominator: u64) -> Result<u64, CurveError> {
    if denominator == 0 {
        return Err(CurveError::InvalidRange);
    }
    to_u64(mul_u64(a, b) / denominator as u128)
}

/// ceil(a * b / denominator)
#[inline]
pub fn mul_div_ceil(a: u64, b: u64, denominator: u64) -> Result<u64, CurveError> {
    if denominator == 0 {
        return Err(CurveError::InvalidRange);
    }
    to_u64(mul_u64(a, b).div_ceil(denominator as u128))
}

/// Lower bound on an output after `slippage_bps` (bps units, 10000 = 100%)
pub fn min_output(quote: u64, slippage_bps: u64) -> Result<u64, CurveError> {
    let keep = crate::BPS_DENOMINATOR.saturating_sub(slippage_bps);
    mul_div_floor(quote, keep, crate::BPS_DENOMINATOR)
}

/// Upper bound on an input after `slippage_bps` (bps units, 10000 = 100%)
pub fn max_input(quote: u64, slippage_bps: u64) -> Result<u64, CurveError> {
    let allow = crate::BPS_DENOMINATOR
        .checked_add(slippage_bps)
        .ok_or(CurveError::Overflow)?;
    mul_div_ceil(quote, allow, crate::BPS_DENOMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(mul_div_floor(7, 4, 5), Ok(5));
        assert_eq!(mul_div_ceil(7, 4, 5), Ok(6));
        assert_eq!(mul_div_ceil(10, 4, 5), Ok(8));
    }

    #[test]
    fn test_mul_div_no_intermediate_overflow() {
        // u64::MAX * 4 overflows u64 but not the u128 intermediate
        assert_eq!(mul_div_floor(u64::MAX, 4, 5), Ok(14_757_395_258_967_641_292));
        assert_eq!(mul_div_floor(u64::MAX, 5, 4), Err(CurveError::Overflow));
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(mul_div_floor(1, 1, 0), Err(CurveError::InvalidRange));
        assert_eq!(mul_div_ceil(1, 1, 0), Err(CurveError::InvalidRange));
    }

    #[test]
    fn test_slippage_bounds() {
        // 10% either way
        assert_eq!(min_output(1_000, 1_000), Ok(900));
        assert_eq!(max_input(1_000, 1_000), Ok(1_100));
        // ceil on the input side
        assert_eq!(max_input(7, 1_000), Ok(8));
        // slippage beyond 100% floors the minimum at zero
        assert_eq!(min_output(1_000, 20_000), Ok(0));
    }
}
