//! Program-derived addresses of the farm program

use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::error::QuoteError;

pub const MAIN_SEED: &[u8] = b"main";
pub const POOL_SEED: &[u8] = b"pool";
pub const REFERRAL_SEED: &[u8] = b"referral";

/// Platform state PDA
pub fn derive_platform_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[MAIN_SEED], program_id)
}

/// Market (pool) PDA for a base mint
pub fn derive_market_address(base_mint: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_SEED, base_mint.as_ref()], program_id)
}

/// Referral record PDA for an identity
pub fn derive_referral_address(identity: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REFERRAL_SEED, identity.as_ref()], program_id)
}

/// Parse a base58 address supplied by a caller
pub fn parse_address(input: &str) -> Result<Pubkey, QuoteError> {
    Pubkey::from_str(input.trim())
        .map_err(|err| QuoteError::InvalidInput(format!("invalid address '{}': {}", input, err)))
}
