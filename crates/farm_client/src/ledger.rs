//! Read side of the ledger
//!
//! The quote engine and the referral resolver only ever read through
//! [`LedgerReader`]. An account that does not exist is `Ok(None)`; a read
//! that could not be completed is an error.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::error::LedgerError;
use crate::pda;
use crate::state::{MarketState, PlatformState, ReferralLink};

/// Delay before the single retry of a failed RPC read
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2_000);

#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn fetch_platform_state(&self) -> Result<Option<PlatformState>, LedgerError>;

    async fn fetch_market_state(&self, market: &Pubkey) -> Result<Option<MarketState>, LedgerError>;

    /// Referral record owned by `identity`
    async fn fetch_referral_link(&self, identity: &Pubkey) -> Result<Option<ReferralLink>, LedgerError>;

    /// Address of the referral record owned by `identity`
    fn derive_referral_address(&self, identity: &Pubkey) -> Pubkey;
}

/// [`LedgerReader`] backed by a Solana JSON-RPC endpoint
pub struct RpcLedger {
    client: Arc<RpcClient>,
    program_id: Pubkey,
    retry_delay: Duration,
}

impl RpcLedger {
    pub fn new(rpc_url: String, program_id: Pubkey) -> Self {
        let client = RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed());
        Self::with_client(Arc::new(client), program_id)
    }

    pub fn with_client(client: Arc<RpcClient>, program_id: Pubkey) -> Self {
        Self {
            client,
            program_id,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Raw account data, retrying a failed request once
    async fn fetch_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError> {
        let commitment = self.client.commitment();
        let response = match self.client.get_account_with_commitment(address, commitment).await {
            Ok(response) => response,
            Err(first) => {
                warn!("account read for {} failed ({}), retrying", address, first);
                tokio::time::sleep(self.retry_delay).await;
                self.client
                    .get_account_with_commitment(address, commitment)
                    .await
                    .map_err(|err| LedgerError::Rpc {
                        address: address.to_string(),
                        reason: err.to_string(),
                    })?
            }
        };

        let account = response.value;
        debug!(
            "read {}: {}",
            address,
            account
                .as_ref()
                .map(|a| format!("{} bytes", a.data.len()))
                .unwrap_or_else(|| "absent".to_string())
        );
        Ok(account.map(|a| a.data))
    }
}

#[async_trait]
impl LedgerReader for RpcLedger {
    async fn fetch_platform_state(&self) -> Result<Option<PlatformState>, LedgerError> {
        let (address, _) = pda::derive_platform_address(&self.program_id);
        self.fetch_account_data(&address)
            .await?
            .map(|data| PlatformState::decode(&data))
            .transpose()
    }

    async fn fetch_market_state(&self, market: &Pubkey) -> Result<Option<MarketState>, LedgerError> {
        self.fetch_account_data(market)
            .await?
            .map(|data| MarketState::decode(&data))
            .transpose()
    }

    async fn fetch_referral_link(&self, identity: &Pubkey) -> Result<Option<ReferralLink>, LedgerError> {
        let address = self.derive_referral_address(identity);
        self.fetch_account_data(&address)
            .await?
            .map(|data| ReferralLink::decode(&data))
            .transpose()
    }

    fn derive_referral_address(&self, identity: &Pubkey) -> Pubkey {
        pda::derive_referral_address(identity, &self.program_id).0
    }
}

/// In-memory [`LedgerReader`] over fixed snapshots
///
/// Used for offline quoting and in tests. Individual addresses can be
/// marked as failing to simulate an unreachable RPC node.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    program_id: Pubkey,
    platform: Option<PlatformState>,
    markets: HashMap<Pubkey, MarketState>,
    referrals: HashMap<Pubkey, ReferralLink>,
    failing: Vec<Pubkey>,
}

impl MemoryLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            ..Self::default()
        }
    }

    pub fn with_platform(mut self, platform: PlatformState) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_market(mut self, address: Pubkey, market: MarketState) -> Self {
        self.markets.insert(address, market);
        self
    }

    /// Store `link` under its owner's identity
    pub fn with_referral(mut self, link: ReferralLink) -> Self {
        self.referrals.insert(link.owner, link);
        self
    }

    /// Make every read of `address` fail. For the platform state use the
    /// derived platform address; for referrals, the referral identity.
    pub fn with_failing(mut self, address: Pubkey) -> Self {
        self.failing.push(address);
        self
    }

    fn check(&self, address: &Pubkey) -> Result<(), LedgerError> {
        if self.failing.contains(address) {
            return Err(LedgerError::Rpc {
                address: address.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerReader for MemoryLedger {
    async fn fetch_platform_state(&self) -> Result<Option<PlatformState>, LedgerError> {
        self.check(&pda::derive_platform_address(&self.program_id).0)?;
        Ok(self.platform.clone())
    }

    async fn fetch_market_state(&self, market: &Pubkey) -> Result<Option<MarketState>, LedgerError> {
        self.check(market)?;
        Ok(self.markets.get(market).cloned())
    }

    async fn fetch_referral_link(&self, identity: &Pubkey) -> Result<Option<ReferralLink>, LedgerError> {
        self.check(identity)?;
        Ok(self.referrals.get(identity).cloned())
    }

    fn derive_referral_address(&self, identity: &Pubkey) -> Pubkey {
        pda::derive_referral_address(identity, &self.program_id).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_client::rpc_request::RpcRequest;
    use std::time::Instant;

    fn account_response(owner: &Pubkey, data: &[u8]) -> serde_json::Value {
        serde_json::json!({
            "context": { "slot": 1 },
            "value": {
                "lamports": 1_000_000,
                "data": [bs58::encode(data).into_string(), "base58"],
                "owner": owner.to_string(),
                "executable": false,
                "rentEpoch": 0,
                "space": data.len(),
            }
        })
    }

    fn mocked_ledger(program_id: Pubkey, response: serde_json::Value) -> RpcLedger {
        let mut mocks = HashMap::new();
        mocks.insert(RpcRequest::GetAccountInfo, response);
        let client = RpcClient::new_mock_with_mocks("succeeds".to_string(), mocks);
        RpcLedger::with_client(Arc::new(client), program_id)
    }

    fn sample_market() -> MarketState {
        MarketState {
            owner: Pubkey::new_unique(),
            tax_rate_bps: 2_000,
            max_fee_tokens: 0,
            base_mint: Pubkey::new_unique(),
            base_reserve_virtual: 279_900_000_000_000,
            base_reserve_real: 793_100_000_000_000,
            quote_reserve_virtual: 30_000_000_000,
            quote_reserve_real: 12_000_000_000,
            quote_reserve_threshold: 82_000_000_000,
            created_time: 1_700_000_000,
            priv_sale_period: 600,
            complete: false,
        }
    }

    #[tokio::test]
    async fn test_rpc_read_fails_after_one_retry() {
        let delay = Duration::from_millis(20);
        let client = RpcClient::new_mock("fails".to_string());
        let ledger = RpcLedger::with_client(Arc::new(client), Pubkey::new_unique()).with_retry_delay(delay);

        let started = Instant::now();
        let err = ledger.fetch_market_state(&Pubkey::new_unique()).await.unwrap_err();

        assert!(matches!(err, LedgerError::Rpc { .. }));
        assert!(started.elapsed() >= delay);
    }

    #[tokio::test]
    async fn test_rpc_decodes_market_account() {
        let program_id = Pubkey::new_unique();
        let market = sample_market();
        let ledger = mocked_ledger(program_id, account_response(&program_id, &market.encode()));

        let fetched = ledger.fetch_market_state(&Pubkey::new_unique()).await.unwrap();

        assert_eq!(fetched, Some(market));
    }

    #[tokio::test]
    async fn test_rpc_decodes_referral_account() {
        let program_id = Pubkey::new_unique();
        let link = ReferralLink {
            owner: Pubkey::new_unique(),
            earned_rewards: 42,
            referrer: Some(Pubkey::new_unique()),
        };
        let ledger = mocked_ledger(program_id, account_response(&program_id, &link.encode()));

        let fetched = ledger.fetch_referral_link(&link.owner).await.unwrap();

        assert_eq!(fetched, Some(link));
    }

    #[tokio::test]
    async fn test_rpc_absent_account_is_none() {
        let response = serde_json::json!({ "context": { "slot": 1 }, "value": null });
        let ledger = mocked_ledger(Pubkey::new_unique(), response);

        let fetched = ledger.fetch_referral_link(&Pubkey::new_unique()).await.unwrap();

        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_rpc_wrong_account_type_is_decode_error() {
        let program_id = Pubkey::new_unique();
        let market = sample_market();
        let ledger = mocked_ledger(program_id, account_response(&program_id, &market.encode()));

        let err = ledger.fetch_platform_state().await.unwrap_err();

        assert!(matches!(err, LedgerError::Decode { account: "MainState", .. }));
    }

    #[tokio::test]
    async fn test_memory_ledger_failing_address() {
        let program_id = Pubkey::new_unique();
        let market = Pubkey::new_unique();
        let ledger = MemoryLedger::new(program_id)
            .with_market(market, sample_market())
            .with_failing(market);

        assert!(ledger.fetch_market_state(&market).await.is_err());
        assert!(ledger.fetch_platform_state().await.unwrap().is_none());
    }
}
