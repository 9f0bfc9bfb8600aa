//! Runtime settings: RPC endpoint, account, contract addresses and storage
//!
//! Defaults target the Sepolia deployment. The binary layers command-line
//! flags and `SIMPLESWAP_*` environment variables on top, and an optional
//! JSON settings file can replace the defaults wholesale.

use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use crate::contracts::addresses;
use crate::utils::{Result, SwapError};

pub const DEFAULT_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";

/// Minutes until a submitted transaction's deadline
pub const DEFAULT_DEADLINE_MINUTES: u64 = 10;

/// Faucet amount minted per request
pub const DEFAULT_MINT_AMOUNT: &str = "1000";

/// Blocks scanned when loading event history
pub const DEFAULT_EVENT_LOOKBACK_BLOCKS: u64 = 1000;

/// Addresses of the exchange and its two tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub simple_swap: Address,
    pub token_a: Address,
    pub token_b: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            simple_swap: addresses::simple_swap(),
            token_a: addresses::token_a(),
            token_b: addresses::token_b(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rpc_url: String,
    pub chain_id: u64,
    /// Never written back to disk
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
    pub contracts: ContractAddresses,
    pub data_dir: PathBuf,
    pub deadline_minutes: u64,
    pub mint_amount: String,
    pub event_lookback_blocks: u64,
}

impl Settings {
    /// Read a JSON settings file; missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = read_to_string(path).map_err(|e| {
            SwapError::StorageError(format!("Failed to read settings file {:?}: {}", path, e))
        })?;
        let settings: Settings = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn with_private_key(mut self, private_key: Option<String>) -> Self {
        self.private_key = private_key;
        self
    }

    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    /// Directory holding the per-wallet interaction files
    pub fn interactions_dir(&self) -> PathBuf {
        self.data_dir.join("interactions")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: addresses::SEPOLIA_CHAIN_ID,
            private_key: None,
            contracts: ContractAddresses::default(),
            data_dir: default_data_dir(),
            deadline_minutes: DEFAULT_DEADLINE_MINUTES,
            mint_amount: DEFAULT_MINT_AMOUNT.to_string(),
            event_lookback_blocks: DEFAULT_EVENT_LOOKBACK_BLOCKS,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("contracts", &self.contracts)
            .field("data_dir", &self.data_dir)
            .field("deadline_minutes", &self.deadline_minutes)
            .field("mint_amount", &self.mint_amount)
            .field("event_lookback_blocks", &self.event_lookback_blocks)
            .finish()
    }
}

fn default_data_dir() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        home.join(".simpleswap")
    } else {
        let fallback = std::env::temp_dir().join("simpleswap");
        tracing::warn!(
            "Home directory could not be determined; using temporary directory for data: {}",
            fallback.display()
        );
        fallback
    }
}
