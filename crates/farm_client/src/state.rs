//! On-ledger account layouts of the farm program
//!
//! Accounts are Anchor accounts: an 8-byte discriminator
//! (`sha256("account:<Name>")[..8]`) followed by the fields in declaration
//! order, little-endian, with `bool` as one byte.

use curve_model::{CurveReserves, TierRewards, FEE_DENOMINATOR};
use solana_sdk::{hash::hash, pubkey::Pubkey};

use crate::error::LedgerError;

const DISCRIMINATOR_LEN: usize = 8;

/// Anchor discriminator for an account type name
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = hash(format!("account:{}", name).as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest.to_bytes()[..DISCRIMINATOR_LEN]);
    out
}

/// Sequential little-endian reader over account data
struct AccountReader<'a> {
    account: &'static str,
    data: &'a [u8],
    offset: usize,
}

impl<'a> AccountReader<'a> {
    fn new(account: &'static str, data: &'a [u8]) -> Result<Self, LedgerError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(decode_error(account, "missing discriminator"));
        }
        if data[..DISCRIMINATOR_LEN] != account_discriminator(account) {
            return Err(decode_error(account, "discriminator mismatch"));
        }
        Ok(Self {
            account,
            data,
            offset: DISCRIMINATOR_LEN,
        })
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], LedgerError> {
        let end = self.offset + len;
        if end > self.data.len() {
            return Err(decode_error(
                self.account,
                &format!("data too short: need {} bytes, have {}", end, self.data.len()),
            ));
        }
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn pubkey(&mut self) -> Result<Pubkey, LedgerError> {
        let bytes = self.take(32)?;
        let mut key = [0u8; 32];
        key.copy_from_slice(bytes);
        Ok(Pubkey::new_from_array(key))
    }

    fn u64(&mut self) -> Result<u64, LedgerError> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }

    fn bool(&mut self) -> Result<bool, LedgerError> {
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(decode_error(self.account, &format!("invalid bool byte {}", other))),
        }
    }
}

fn decode_error(account: &'static str, reason: &str) -> LedgerError {
    LedgerError::Decode {
        account,
        reason: reason.to_string(),
    }
}

/// Writer mirroring [`AccountReader`], used to build account images
struct AccountWriter {
    data: Vec<u8>,
}

impl AccountWriter {
    fn new(account: &str) -> Self {
        let mut data = Vec::with_capacity(256);
        data.extend_from_slice(&account_discriminator(account));
        Self { data }
    }

    fn pubkey(mut self, key: &Pubkey) -> Self {
        self.data.extend_from_slice(key.as_ref());
        self
    }

    fn u64(mut self, value: u64) -> Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn bool(mut self, value: bool) -> Self {
        self.data.push(value as u8);
        self
    }
}

/// Global platform configuration (singleton)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformState {
    pub owner: Pubkey,
    /// Key whose signature unlocks trading during a private sale
    pub signer: Pubkey,
    pub withdrawer: Pubkey,
    /// Trading fee in fee units (1000 = 1%)
    pub trading_fee: u64,
    pub fee_recipient: Pubkey,
    pub tier_rewards: TierRewards,
}

impl PlatformState {
    pub const ACCOUNT_NAME: &'static str = "MainState";

    pub fn decode(data: &[u8]) -> Result<Self, LedgerError> {
        let mut reader = AccountReader::new(Self::ACCOUNT_NAME, data)?;
        let state = Self {
            owner: reader.pubkey()?,
            signer: reader.pubkey()?,
            withdrawer: reader.pubkey()?,
            trading_fee: reader.u64()?,
            fee_recipient: reader.pubkey()?,
            tier_rewards: TierRewards {
                tier1: reader.u64()?,
                tier2: reader.u64()?,
                tier3: reader.u64()?,
            },
        };
        if state.trading_fee >= FEE_DENOMINATOR {
            return Err(decode_error(
                Self::ACCOUNT_NAME,
                &format!("trading fee {} out of range", state.trading_fee),
            ));
        }
        Ok(state)
    }

    pub fn encode(&self) -> Vec<u8> {
        AccountWriter::new(Self::ACCOUNT_NAME)
            .pubkey(&self.owner)
            .pubkey(&self.signer)
            .pubkey(&self.withdrawer)
            .u64(self.trading_fee)
            .pubkey(&self.fee_recipient)
            .u64(self.tier_rewards.tier1)
            .u64(self.tier_rewards.tier2)
            .u64(self.tier_rewards.tier3)
            .data
    }
}

/// Snapshot of one bonding-curve pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketState {
    pub owner: Pubkey,
    /// Pool tax in bps units (2000 = 20%)
    pub tax_rate_bps: u64,
    pub max_fee_tokens: u64,
    pub base_mint: Pubkey,
    pub base_reserve_virtual: u64,
    pub base_reserve_real: u64,
    pub quote_reserve_virtual: u64,
    pub quote_reserve_real: u64,
    pub quote_reserve_threshold: u64,
    pub created_time: u64,
    pub priv_sale_period: u64,
    /// Set once `quote_reserve_real` reaches the threshold
    pub complete: bool,
}

impl MarketState {
    pub const ACCOUNT_NAME: &'static str = "PoolState";

    pub fn decode(data: &[u8]) -> Result<Self, LedgerError> {
        let mut reader = AccountReader::new(Self::ACCOUNT_NAME, data)?;
        Ok(Self {
            owner: reader.pubkey()?,
            tax_rate_bps: reader.u64()?,
            max_fee_tokens: reader.u64()?,
            base_mint: reader.pubkey()?,
            base_reserve_virtual: reader.u64()?,
            base_reserve_real: reader.u64()?,
            quote_reserve_virtual: reader.u64()?,
            quote_reserve_real: reader.u64()?,
            quote_reserve_threshold: reader.u64()?,
            created_time: reader.u64()?,
            priv_sale_period: reader.u64()?,
            complete: reader.bool()?,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        AccountWriter::new(Self::ACCOUNT_NAME)
            .pubkey(&self.owner)
            .u64(self.tax_rate_bps)
            .u64(self.max_fee_tokens)
            .pubkey(&self.base_mint)
            .u64(self.base_reserve_virtual)
            .u64(self.base_reserve_real)
            .u64(self.quote_reserve_virtual)
            .u64(self.quote_reserve_real)
            .u64(self.quote_reserve_threshold)
            .u64(self.created_time)
            .u64(self.priv_sale_period)
            .bool(self.complete)
            .data
    }

    /// Reserves in the shape the curve math expects
    pub fn reserves(&self) -> CurveReserves {
        CurveReserves {
            base_real: self.base_reserve_real,
            base_virtual: self.base_reserve_virtual,
            quote_real: self.quote_reserve_real,
            quote_virtual: self.quote_reserve_virtual,
            quote_threshold: self.quote_reserve_threshold,
        }
    }

    /// Unix time at which the private sale window closes
    pub fn private_sale_end(&self) -> u64 {
        self.created_time.saturating_add(self.priv_sale_period)
    }

    /// Whether trading at `now` still requires the platform signature
    pub fn in_private_sale(&self, now: u64) -> bool {
        now < self.private_sale_end()
    }

    /// Progress toward graduation in bps units (10000 = complete)
    pub fn graduation_progress_bps(&self) -> u64 {
        if self.quote_reserve_threshold == 0 {
            return curve_model::BPS_DENOMINATOR;
        }
        let progress = self.quote_reserve_real as u128 * curve_model::BPS_DENOMINATOR as u128
            / self.quote_reserve_threshold as u128;
        progress.min(curve_model::BPS_DENOMINATOR as u128) as u64
    }
}

/// One link in the referral chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralLink {
    /// Identity this record belongs to
    pub owner: Pubkey,
    /// Accumulated, unclaimed rewards (lamports)
    pub earned_rewards: u64,
    /// Identity of the next link; `None` ends the chain
    pub referrer: Option<Pubkey>,
}

impl ReferralLink {
    pub const ACCOUNT_NAME: &'static str = "ReferralState";

    pub fn decode(data: &[u8]) -> Result<Self, LedgerError> {
        let mut reader = AccountReader::new(Self::ACCOUNT_NAME, data)?;
        let owner = reader.pubkey()?;
        let earned_rewards = reader.u64()?;
        // the program stores the default key when no referrer was registered
        let referrer = Some(reader.pubkey()?).filter(|key| *key != Pubkey::default());
        Ok(Self {
            owner,
            earned_rewards,
            referrer,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        AccountWriter::new(Self::ACCOUNT_NAME)
            .pubkey(&self.owner)
            .u64(self.earned_rewards)
            .pubkey(&self.referrer.unwrap_or_default())
            .data
    }

    pub fn has_referrer(&self) -> bool {
        self.referrer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_market() -> MarketState {
        MarketState {
            owner: Pubkey::new_unique(),
            tax_rate_bps: 2_000,
            max_fee_tokens: 0,
            base_mint: Pubkey::new_unique(),
            base_reserve_virtual: 273_000_000_000_000,
            base_reserve_real: 800_000_000_000_000,
            quote_reserve_virtual: 30_000_000_000,
            quote_reserve_real: 41_000_000_000,
            quote_reserve_threshold: 82_000_000_000,
            created_time: 1_700_000_000,
            priv_sale_period: 1_800,
            complete: false,
        }
    }

    #[test]
    fn test_discriminator_is_stable() {
        let a = account_discriminator("PoolState");
        assert_eq!(a, account_discriminator("PoolState"));
        assert_ne!(a, account_discriminator("MainState"));
    }

    #[test]
    fn test_market_layout_offsets() {
        let market = sample_market();
        let data = market.encode();
        // 8 + owner 32 + tax 8 + max_fee 8 + mint 32 + 7 * u64 + bool
        assert_eq!(data.len(), 8 + 32 + 8 + 8 + 32 + 7 * 8 + 1);
        let real_quote_offset = 8 + 32 + 8 + 8 + 32 + 3 * 8;
        assert_eq!(
            &data[real_quote_offset..real_quote_offset + 8],
            &41_000_000_000u64.to_le_bytes()
        );
        assert_eq!(MarketState::decode(&data).unwrap(), market);
    }

    #[test]
    fn test_decode_rejects_wrong_account() {
        let data = sample_market().encode();
        let err = PlatformState::decode(&data).unwrap_err();
        assert!(err.to_string().contains("discriminator mismatch"));
    }

    #[test]
    fn test_decode_rejects_short_data() {
        let data = sample_market().encode();
        let err = MarketState::decode(&data[..40]).unwrap_err();
        assert!(err.to_string().contains("too short"));
        assert!(MarketState::decode(&data[..4]).is_err());
    }

    #[test]
    fn test_decode_rejects_bad_bool() {
        let mut data = sample_market().encode();
        let last = data.len() - 1;
        data[last] = 7;
        assert!(MarketState::decode(&data).is_err());
    }

    #[test]
    fn test_referral_default_key_means_no_referrer() {
        let link = ReferralLink {
            owner: Pubkey::new_unique(),
            earned_rewards: 5,
            referrer: None,
        };
        let decoded = ReferralLink::decode(&link.encode()).unwrap();
        assert!(!decoded.has_referrer());

        let referrer = Pubkey::new_unique();
        let linked = ReferralLink { referrer: Some(referrer), ..link };
        assert_eq!(ReferralLink::decode(&linked.encode()).unwrap().referrer, Some(referrer));
    }

    #[test]
    fn test_platform_fee_out_of_range() {
        let platform = PlatformState {
            owner: Pubkey::new_unique(),
            signer: Pubkey::new_unique(),
            withdrawer: Pubkey::new_unique(),
            trading_fee: FEE_DENOMINATOR,
            fee_recipient: Pubkey::new_unique(),
            tier_rewards: TierRewards::default(),
        };
        assert!(PlatformState::decode(&platform.encode()).is_err());

        let valid = PlatformState {
            trading_fee: 1_000,
            ..platform
        };
        let decoded = PlatformState::decode(&valid.encode()).unwrap();
        assert_eq!(decoded, valid);
    }

    #[test]
    fn test_market_helpers() {
        let market = sample_market();
        assert_eq!(market.graduation_progress_bps(), 5_000);
        assert_eq!(market.private_sale_end(), 1_700_001_800);
        assert!(market.in_private_sale(1_700_000_100));
        assert!(!market.in_private_sale(1_700_001_800));
        assert_eq!(market.reserves().remaining_capacity(), 41_000_000_000);
    }
}
