//! Referral Resolver
//!
//! Walks trader -> referrer -> referrer's referrer for at most three hops.
//! A missing referrer or a referrer without a record ends the walk; every
//! remaining tier is then absent. That is an expected outcome, not an
//! error. Read failures propagate.

use curve_model::{split_rewards, RewardSplit};
use log::debug;
use solana_sdk::pubkey::Pubkey;

use crate::error::QuoteError;
use crate::ledger::LedgerReader;
use crate::state::{PlatformState, ReferralLink};

/// Number of reward tiers resolved for every trade
pub const MAX_TIERS: usize = 3;

/// One resolved reward recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferralTier {
    /// Identity that receives the reward
    pub identity: Pubkey,
    /// That identity's referral record, the account rewards are credited to
    pub account: Pubkey,
}

/// Result of a referral walk, tier 1 first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferralTiers {
    tiers: [Option<ReferralTier>; MAX_TIERS],
}

impl ReferralTiers {
    /// Tier by zero-based index; `None` past a broken link
    pub fn get(&self, index: usize) -> Option<&ReferralTier> {
        self.tiers.get(index).and_then(Option::as_ref)
    }

    /// Number of tiers that resolved to a recipient
    pub fn depth(&self) -> usize {
        self.tiers.iter().take_while(|tier| tier.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }

    /// Recipient identities in tier order, shorter than three only when
    /// the chain ended early
    pub fn recipients(&self) -> Vec<Pubkey> {
        self.tiers.iter().flatten().map(|tier| tier.identity).collect()
    }

    /// Referral record addresses of the recipients, or `None` per absent
    /// tier, in the fixed three-slot shape trade instructions take
    pub fn accounts(&self) -> [Option<Pubkey>; MAX_TIERS] {
        self.tiers.map(|tier| tier.map(|t| t.account))
    }

    pub fn present(&self) -> [bool; MAX_TIERS] {
        self.tiers.map(|tier| tier.is_some())
    }

    /// Expected distribution of `fee` under the platform's tier rates
    pub fn split_fee(&self, fee: u64, platform: &PlatformState) -> Result<RewardSplit, QuoteError> {
        Ok(split_rewards(fee, self.present(), &platform.tier_rewards)?)
    }
}

pub struct ReferralResolver<L> {
    ledger: L,
}

impl<L: LedgerReader> ReferralResolver<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Resolve the three reward tiers above `identity`
    ///
    /// An identity without a referral record has no tiers. Reads are
    /// sequential since each address depends on the previous record.
    pub async fn resolve_referral_tiers(&self, identity: &Pubkey) -> Result<ReferralTiers, QuoteError> {
        let mut resolved = ReferralTiers::default();

        let Some(mut current) = self.ledger.fetch_referral_link(identity).await? else {
            debug!("{} has no referral record", identity);
            return Ok(resolved);
        };

        for depth in 0..MAX_TIERS {
            match self.next_tier(&current).await? {
                Some((tier, link)) => {
                    debug!("tier {}: {}", depth + 1, tier.identity);
                    resolved.tiers[depth] = Some(tier);
                    current = link;
                }
                None => {
                    debug!("referral chain of {} ends at depth {}", identity, depth);
                    break;
                }
            }
        }

        Ok(resolved)
    }

    /// One hop: the referrer of `link` and their record, if both exist
    pub async fn next_tier(
        &self,
        link: &ReferralLink,
    ) -> Result<Option<(ReferralTier, ReferralLink)>, QuoteError> {
        let Some(referrer) = link.referrer else {
            return Ok(None);
        };
        let Some(next) = self.ledger.fetch_referral_link(&referrer).await? else {
            return Ok(None);
        };
        let tier = ReferralTier {
            identity: referrer,
            account: self.ledger.derive_referral_address(&referrer),
        };
        Ok(Some((tier, next)))
    }
}
