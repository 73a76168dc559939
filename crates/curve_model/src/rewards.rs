//! Referral reward split of a trading fee
//!
//! The program pays tier rewards out of the fee it collects. Tier1's share
//! is the whole tier1 rate minus whatever deeper tiers take.

use crate::math::mul_div_floor;
use crate::{CurveError, BPS_DENOMINATOR};

/// Tier reward rates in bps units (2500 = 25%)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRewards {
    pub tier1: u64,
    pub tier2: u64,
    pub tier3: u64,
}

impl Default for TierRewards {
    fn default() -> Self {
        Self {
            tier1: crate::DEF_TIER1_REWARD,
            tier2: crate::DEF_TIER2_REWARD,
            tier3: crate::DEF_TIER3_REWARD,
        }
    }
}

/// How one fee is distributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardSplit {
    /// Paid to the platform fee recipient
    pub fee_recipient: u64,
    /// Credited to each tier's referral account (0 when the tier is absent)
    pub tiers: [u64; 3],
}

impl RewardSplit {
    /// Sum of all tier credits
    pub fn total_rewards(&self) -> u64 {
        self.tiers.iter().sum()
    }
}

fn share(fee: u64, rate: u64) -> Result<u64, CurveError> {
    mul_div_floor(fee, rate, BPS_DENOMINATOR)
}

/// Split `fee` across the platform and the tiers marked present
pub fn split_rewards(
    fee: u64,
    present: [bool; 3],
    rates: &TierRewards,
) -> Result<RewardSplit, CurveError> {
    let mut tiers = [0u64; 3];

    // tier1 keeps what deeper tiers do not take; the deepest present tier
    // decides which rates are carved out
    let carved = if present[2] {
        rates.tier2.checked_add(rates.tier3).ok_or(CurveError::Overflow)?
    } else if present[1] {
        rates.tier2
    } else {
        0
    };
    let tier1_rate = rates
        .tier1
        .checked_sub(carved)
        .ok_or(CurveError::InvalidRange)?;
    if present[2] {
        tiers[2] = share(fee, rates.tier3)?;
    }
    if present[1] {
        tiers[1] = share(fee, rates.tier2)?;
    }
    if present[0] {
        tiers[0] = share(fee, tier1_rate)?;
    }

    let fee_recipient = if present[0] {
        let pool = BPS_DENOMINATOR
            .checked_sub(rates.tier1)
            .ok_or(CurveError::InvalidRange)?;
        share(fee, pool)?
    } else {
        fee
    };

    Ok(RewardSplit { fee_recipient, tiers })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE: u64 = 10_000_000;

    #[test]
    fn test_no_referrer_pays_platform() {
        let split = split_rewards(FEE, [false; 3], &TierRewards::default()).unwrap();
        assert_eq!(split.fee_recipient, FEE);
        assert_eq!(split.total_rewards(), 0);
    }

    #[test]
    fn test_tier1_only() {
        let split = split_rewards(FEE, [true, false, false], &TierRewards::default()).unwrap();
        assert_eq!(split.tiers, [2_500_000, 0, 0]);
        assert_eq!(split.fee_recipient, 7_500_000);
    }

    #[test]
    fn test_two_tiers() {
        let split = split_rewards(FEE, [true, true, false], &TierRewards::default()).unwrap();
        // tier2 3.5%, tier1 25% - 3.5%
        assert_eq!(split.tiers, [2_150_000, 350_000, 0]);
        assert_eq!(split.fee_recipient, 7_500_000);
    }

    #[test]
    fn test_three_tiers() {
        let split = split_rewards(FEE, [true, true, true], &TierRewards::default()).unwrap();
        assert_eq!(split.tiers, [1_850_000, 350_000, 300_000]);
        // platform share is the same whatever the depth
        assert_eq!(split.fee_recipient + split.total_rewards(), FEE);
    }

    #[test]
    fn test_misconfigured_rates() {
        let rates = TierRewards { tier1: 100, tier2: 350, tier3: 300 };
        let result = split_rewards(FEE, [true, true, true], &rates);
        assert_eq!(result, Err(CurveError::InvalidRange));
    }
}
