//! Network configuration, settings file and keypair management

use anyhow::{Context, Result};
use farm_client::amount::MAX_DECIMALS;
use farm_client::{AssetDecimals, BASE_DECIMALS, DEFAULT_SLIPPAGE_BPS, QUOTE_DECIMALS};
use serde::Deserialize;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Deployed maxi farm program
pub const DEFAULT_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("maxi7YSyG2Fpuh9hNzjojuV7woB9PTV4fRwZZ523ayu");

/// Optional settings file (`--config`)
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub program_id: Option<String>,
    pub quote_decimals: Option<u32>,
    pub base_decimals: Option<u32>,
    pub slippage_bps: Option<u64>,
    pub retry_delay_ms: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&data).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

#[derive(Debug)]
pub struct NetworkConfig {
    pub network: String,
    pub rpc_url: String,
    /// Trader identity, when a keypair is available
    pub keypair: Option<Keypair>,
    pub keypair_path: Option<PathBuf>,
    pub program_id: Pubkey,
    pub decimals: AssetDecimals,
    pub slippage_bps: u64,
    pub retry_delay: Duration,
}

impl NetworkConfig {
    pub fn new(
        network: &str,
        rpc_url: Option<String>,
        keypair_path: Option<PathBuf>,
        program_id: Option<String>,
        file: FileConfig,
    ) -> Result<Self> {
        let default_rpc = match network {
            "localnet" | "local" => "http://127.0.0.1:8899".to_string(),
            "devnet" => "https://api.devnet.solana.com".to_string(),
            "mainnet-beta" | "mainnet" => "https://api.mainnet-beta.solana.com".to_string(),
            _ => anyhow::bail!("Unknown network: {}. Use localnet, devnet, or mainnet-beta", network),
        };

        let rpc_url = rpc_url.unwrap_or(default_rpc);

        // An explicit keypair must load; the Solana CLI default is optional
        let (keypair, keypair_path) = match keypair_path {
            Some(path) => (Some(load_keypair(&path)?), Some(path)),
            None => match default_keypair_path() {
                Some(path) if path.exists() => (Some(load_keypair(&path)?), Some(path)),
                _ => (None, None),
            },
        };

        // --program-id wins over the settings file
        let program_id = match program_id.or(file.program_id) {
            Some(id) => Pubkey::from_str(&id).with_context(|| format!("Invalid program ID: {}", id))?,
            None => DEFAULT_PROGRAM_ID,
        };

        let decimals = AssetDecimals {
            quote: file.quote_decimals.unwrap_or(QUOTE_DECIMALS),
            base: file.base_decimals.unwrap_or(BASE_DECIMALS),
        };
        if decimals.quote > MAX_DECIMALS || decimals.base > MAX_DECIMALS {
            anyhow::bail!(
                "Decimals must be at most {} (quote {}, base {})",
                MAX_DECIMALS,
                decimals.quote,
                decimals.base
            );
        }

        let slippage_bps = file.slippage_bps.unwrap_or(DEFAULT_SLIPPAGE_BPS);
        if slippage_bps > farm_client::curve_model::BPS_DENOMINATOR {
            anyhow::bail!("Slippage {} bps exceeds 100%", slippage_bps);
        }

        let retry_delay = file
            .retry_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(farm_client::DEFAULT_RETRY_DELAY);

        Ok(Self {
            network: network.to_string(),
            rpc_url,
            keypair,
            keypair_path,
            program_id,
            decimals,
            slippage_bps,
            retry_delay,
        })
    }

    pub fn pubkey(&self) -> Option<Pubkey> {
        self.keypair.as_ref().map(|keypair| keypair.pubkey())
    }

    /// Identity to act for: `--user` if given, otherwise the keypair
    pub fn identity(&self, user: Option<&str>) -> Result<Pubkey> {
        match user {
            Some(user) => Ok(farm_client::parse_address(user)?),
            None => self.pubkey().context(
                "No identity available: pass --user or --keypair (or create ~/.config/solana/id.json)",
            ),
        }
    }
}

fn default_keypair_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config/solana/id.json"))
}

/// Load a keypair from a JSON file
fn load_keypair(path: &Path) -> Result<Keypair> {
    if !path.exists() {
        anyhow::bail!(
            "Keypair file not found: {}\n\
             Create one with: solana-keygen new --outfile {}",
            path.display(),
            path.display()
        );
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read keypair file: {}", path.display()))?;

    let bytes: Vec<u8> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse keypair JSON: {}", path.display()))?;

    Keypair::from_bytes(&bytes)
        .with_context(|| format!("Invalid keypair data in: {}", path.display()))
}
