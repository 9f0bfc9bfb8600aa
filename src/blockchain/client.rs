use ethers::prelude::*;
use std::sync::Arc;
use crate::utils::{Result, SwapError};

/// Blockchain RPC client
#[derive(Debug, Clone)]
pub struct BlockchainClient {
    provider: Arc<Provider<Http>>,
    chain_id: u64,
}

impl BlockchainClient {
    /// Create a new client
    pub async fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| SwapError::RpcError(
                ProviderError::CustomError(format!("Invalid RPC URL: {}", e))
            ))?;

        let provider = Arc::new(provider);

        // Get chain ID
        let chain_id = provider.get_chainid().await?;

        tracing::info!("Connected to chain ID: {}", chain_id);

        Ok(Self {
            provider,
            chain_id: chain_id.as_u64(),
        })
    }

    pub fn provider(&self) -> Arc<Provider<Http>> {
        self.provider.clone()
    }

    /// Get current block number
    pub async fn block_number(&self) -> Result<u64> {
        let block = self.provider.get_block_number().await?;
        Ok(block.as_u64())
    }

    /// Refuse to continue on a different network than configured
    pub fn ensure_chain(&self, expected: u64) -> Result<()> {
        if self.chain_id != expected {
            tracing::warn!("⚠️  Network mismatch: expected {}, got {}", expected, self.chain_id);
            return Err(SwapError::WrongChain {
                expected,
                actual: self.chain_id,
            });
        }
        Ok(())
    }

    /// Get chain ID
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get chain name
    pub fn chain_name(&self) -> &'static str {
        chain_name(self.chain_id)
    }
}

pub fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "Ethereum Mainnet",
        11155111 => "Sepolia",
        17000 => "Holesky",
        31337 => "Local Devnet",
        _ => "Unknown Chain",
    }
}
