//! Referral chain walks against in-memory ledger snapshots

use farm_client::*;
use solana_sdk::pubkey::Pubkey;

fn link(owner: Pubkey, referrer: Option<Pubkey>) -> ReferralLink {
    ReferralLink {
        owner,
        earned_rewards: 0,
        referrer,
    }
}

/// trader -> a -> b -> c -> d, every identity with a record
fn long_chain() -> (MemoryLedger, [Pubkey; 5]) {
    let ids = [
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        Pubkey::new_unique(),
    ];
    let mut ledger = MemoryLedger::new(Pubkey::new_unique());
    for pair in ids.windows(2) {
        ledger = ledger.with_referral(link(pair[0], Some(pair[1])));
    }
    ledger = ledger.with_referral(link(ids[4], None));
    (ledger, ids)
}

#[tokio::test]
async fn test_resolves_exactly_three_tiers() {
    let (ledger, ids) = long_chain();
    let resolver = ReferralResolver::new(ledger);

    let tiers = resolver.resolve_referral_tiers(&ids[0]).await.unwrap();

    assert_eq!(tiers.depth(), MAX_TIERS);
    assert_eq!(tiers.recipients(), vec![ids[1], ids[2], ids[3]]);
    let accounts = tiers.accounts();
    assert_eq!(
        accounts[0],
        Some(resolver.ledger().derive_referral_address(&ids[1]))
    );
}

#[tokio::test]
async fn test_chain_ends_at_root() {
    // trader -> a -> b, b has no referrer
    let trader = Pubkey::new_unique();
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    let ledger = MemoryLedger::new(Pubkey::new_unique())
        .with_referral(link(trader, Some(a)))
        .with_referral(link(a, Some(b)))
        .with_referral(link(b, None));
    let resolver = ReferralResolver::new(ledger);

    let tiers = resolver.resolve_referral_tiers(&trader).await.unwrap();

    assert_eq!(tiers.recipients(), vec![a, b]);
    assert_eq!(tiers.present(), [true, true, false]);
    assert!(tiers.get(2).is_none());
}

#[tokio::test]
async fn test_referrer_without_record_ends_chain() {
    // a is named as referrer but never registered
    let trader = Pubkey::new_unique();
    let a = Pubkey::new_unique();
    let ledger = MemoryLedger::new(Pubkey::new_unique()).with_referral(link(trader, Some(a)));
    let resolver = ReferralResolver::new(ledger);

    let tiers = resolver.resolve_referral_tiers(&trader).await.unwrap();

    assert!(tiers.is_empty());
    assert_eq!(tiers.accounts(), [None, None, None]);
}

#[tokio::test]
async fn test_trader_without_record_has_no_tiers() {
    let (ledger, _) = long_chain();
    let resolver = ReferralResolver::new(ledger);

    let tiers = resolver
        .resolve_referral_tiers(&Pubkey::new_unique())
        .await
        .unwrap();

    assert!(tiers.recipients().is_empty());
}

#[tokio::test]
async fn test_read_failure_propagates() {
    let (ledger, ids) = long_chain();
    let resolver = ReferralResolver::new(ledger.with_failing(ids[2]));

    let err = resolver.resolve_referral_tiers(&ids[0]).await.unwrap_err();

    assert!(matches!(err, QuoteError::DataUnavailable(_)));
}

#[tokio::test]
async fn test_next_tier_steps_one_hop() {
    let (ledger, ids) = long_chain();
    let resolver = ReferralResolver::new(ledger);

    let (tier, next) = resolver
        .next_tier(&link(ids[1], Some(ids[2])))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(tier.identity, ids[2]);
    assert_eq!(next.referrer, Some(ids[3]));
    assert!(resolver.next_tier(&link(ids[4], None)).await.unwrap().is_none());
}
