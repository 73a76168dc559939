//! Fee, threshold and tax steps, composed into the three quote pipelines
//!
//! Each pipeline is an ordered list of pure steps, applied in the order the
//! program applies them:
//!
//! - buy from input:  fee-deduct -> threshold-clamp -> swap -> tax
//! - buy from output: tax-compensate -> inverse swap -> fee gross-up
//! - sell from input: tax -> swap -> fee-deduct
//!
//! Every step is exposed on its own so it can be checked in isolation.

use crate::math::{mul_div_ceil, mul_div_floor};
use crate::swap::{swap_in_ceil, swap_out};
use crate::{CurveError, DEPLOYED_TAX_PERCENT, FEE_DENOMINATOR};

/// Reserve snapshot of one bonding curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurveReserves {
    pub base_real: u64,
    pub base_virtual: u64,
    pub quote_real: u64,
    pub quote_virtual: u64,
    /// Graduation cap on `quote_real`
    pub quote_threshold: u64,
}

impl CurveReserves {
    /// base_real + base_virtual
    pub fn effective_base(&self) -> Result<u64, CurveError> {
        self.base_real
            .checked_add(self.base_virtual)
            .ok_or(CurveError::Overflow)
    }

    /// quote_real + quote_virtual
    pub fn effective_quote(&self) -> Result<u64, CurveError> {
        self.quote_real
            .checked_add(self.quote_virtual)
            .ok_or(CurveError::Overflow)
    }

    /// Quote the curve can still absorb before reaching its threshold
    pub fn remaining_capacity(&self) -> u64 {
        self.quote_threshold.saturating_sub(self.quote_real)
    }
}

/// Result of [`buy_from_input`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyQuote {
    /// Quote amount offered by the trader
    pub gross_input: u64,
    /// Platform fee taken from `gross_input`
    pub fee: u64,
    /// Input after the fee, before the threshold clamp
    pub net_input: u64,
    /// Input the curve actually consumes
    pub effective_input: u64,
    /// True when the threshold clamp reduced the input
    pub clamped: bool,
    /// Base amount out of the curve before tax
    pub raw_output: u64,
    /// Base amount withheld as tax
    pub tax: u64,
    /// Base amount the trader receives
    pub output: u64,
}

/// Result of [`buy_from_output`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyExactQuote {
    /// Base amount the trader wants to receive
    pub desired_output: u64,
    /// Desired output grossed up for tax
    pub inflated_output: u64,
    /// Quote the curve needs for `inflated_output`
    pub raw_input: u64,
    /// Platform fee on top of `raw_input`
    pub fee: u64,
    /// Quote amount to submit
    pub total_input: u64,
}

/// Result of [`sell_from_input`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellQuote {
    /// Base amount offered by the trader
    pub gross_input: u64,
    /// Base amount withheld as tax
    pub tax: u64,
    /// Base amount entering the curve
    pub net_input: u64,
    /// Quote amount out of the curve before the fee
    pub raw_output: u64,
    /// Platform fee taken from `raw_output`
    pub fee: u64,
    /// Quote amount the trader receives
    pub output: u64,
}

/// fee = floor(amount * trading_fee / FEE_DENOMINATOR)
pub fn trading_fee(amount: u64, trading_fee: u64) -> Result<u64, CurveError> {
    mul_div_floor(amount, trading_fee, FEE_DENOMINATOR)
}

/// Fee to add on top of a net amount so that deducting the fee from the
/// gross leaves at least `net`.
///
/// fee = ceil(net * trading_fee / (FEE_DENOMINATOR - trading_fee))
pub fn trading_fee_gross_up(net: u64, trading_fee: u64) -> Result<u64, CurveError> {
    if trading_fee >= FEE_DENOMINATOR {
        return Err(CurveError::InvalidRange);
    }
    mul_div_ceil(net, trading_fee, FEE_DENOMINATOR - trading_fee)
}

/// Limit `net_input` to what the curve can absorb before graduating
pub fn clamp_to_threshold(net_input: u64, reserves: &CurveReserves) -> (u64, bool) {
    let capacity = reserves.remaining_capacity();
    if net_input > capacity {
        (capacity, true)
    } else {
        (net_input, false)
    }
}

/// floor(amount * (100 - tax) / 100)
pub fn apply_tax(amount: u64) -> Result<u64, CurveError> {
    mul_div_floor(amount, 100 - DEPLOYED_TAX_PERCENT, 100)
}

/// ceil(amount * 100 / (100 - tax)), the smallest pre-tax amount whose
/// [`apply_tax`] is at least `amount`
pub fn compensate_tax(amount: u64) -> Result<u64, CurveError> {
    mul_div_ceil(amount, 100, 100 - DEPLOYED_TAX_PERCENT)
}

/// Base output for a quote input
pub fn buy_from_input(
    reserves: &CurveReserves,
    fee_rate: u64,
    quote_input: u64,
) -> Result<BuyQuote, CurveError> {
    let fee = trading_fee(quote_input, fee_rate)?;
    let net_input = quote_input.checked_sub(fee).ok_or(CurveError::InvalidRange)?;
    let (effective_input, clamped) = clamp_to_threshold(net_input, reserves);
    let raw_output = swap_out(
        effective_input,
        reserves.effective_quote()?,
        reserves.effective_base()?,
    )?;
    let output = apply_tax(raw_output)?;

    Ok(BuyQuote {
        gross_input: quote_input,
        fee,
        net_input,
        effective_input,
        clamped,
        raw_output,
        tax: raw_output - output,
        output,
    })
}

/// Quote input required for a base output
pub fn buy_from_output(
    reserves: &CurveReserves,
    fee_rate: u64,
    base_output: u64,
) -> Result<BuyExactQuote, CurveError> {
    let inflated_output = compensate_tax(base_output)?;
    let raw_input = swap_in_ceil(
        inflated_output,
        reserves.effective_quote()?,
        reserves.effective_base()?,
    )?;
    let fee = trading_fee_gross_up(raw_input, fee_rate)?;
    let total_input = raw_input.checked_add(fee).ok_or(CurveError::Overflow)?;

    Ok(BuyExactQuote {
        desired_output: base_output,
        inflated_output,
        raw_input,
        fee,
        total_input,
    })
}

/// Quote output for a base input
pub fn sell_from_input(
    reserves: &CurveReserves,
    fee_rate: u64,
    base_input: u64,
) -> Result<SellQuote, CurveError> {
    let net_input = apply_tax(base_input)?;
    let raw_output = swap_out(
        net_input,
        reserves.effective_base()?,
        reserves.effective_quote()?,
    )?;
    let fee = trading_fee(raw_output, fee_rate)?;
    let output = raw_output.checked_sub(fee).ok_or(CurveError::InvalidRange)?;

    Ok(SellQuote {
        gross_input: base_input,
        tax: base_input - net_input,
        net_input,
        raw_output,
        fee,
        output,
    })
}
