//! Wallet connection: provider plus a local signer bound to the chain id

use ethers::prelude::*;
use std::sync::Arc;

use super::client::BlockchainClient;
use crate::config::Settings;
use crate::utils::{Result, SwapError};

/// Provider with the connected account's signer attached
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// A connected account. Lives from connect until disconnect or account change.
#[derive(Debug, Clone)]
pub struct WalletSession {
    address: Address,
    client: BlockchainClient,
    signer: Arc<SignerClient>,
}

impl WalletSession {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }

    pub fn signer(&self) -> Arc<SignerClient> {
        self.signer.clone()
    }

    pub fn chain_id(&self) -> u64 {
        self.client.chain_id()
    }
}

/// Opens wallet sessions against one RPC endpoint and network
#[derive(Debug, Clone)]
pub struct WalletConnector {
    rpc_url: String,
    chain_id: u64,
}

impl WalletConnector {
    pub fn new(rpc_url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain_id,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.rpc_url.clone(), settings.chain_id)
    }

    /// Connect the account behind `private_key`.
    ///
    /// A missing key is the "no wallet installed" case.
    pub async fn connect(&self, private_key: Option<&str>) -> Result<WalletSession> {
        tracing::info!("🔌 Initiating wallet connection...");

        let wallet = parse_wallet(private_key)?;

        let client = BlockchainClient::new(&self.rpc_url).await?;
        client.ensure_chain(self.chain_id)?;

        let wallet = wallet.with_chain_id(client.chain_id());
        let address = wallet.address();
        let signer = Arc::new(SignerMiddleware::new((*client.provider()).clone(), wallet));

        tracing::info!("✅ Connected address: {:?} on {}", address, client.chain_name());

        Ok(WalletSession {
            address,
            client,
            signer,
        })
    }
}

fn parse_wallet(private_key: Option<&str>) -> Result<LocalWallet> {
    let key = private_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            SwapError::WalletUnavailable(
                "no private key configured (set SIMPLESWAP_PRIVATE_KEY)".to_string(),
            )
        })?;

    let wallet = key.trim_start_matches("0x").parse::<LocalWallet>()?;
    Ok(wallet)
}

#[cfg(test)]
mod tests {
    use super::*;

    // anvil's first dev account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_missing_key_is_wallet_unavailable() {
        assert!(matches!(parse_wallet(None), Err(SwapError::WalletUnavailable(_))));
        assert!(matches!(parse_wallet(Some("  ")), Err(SwapError::WalletUnavailable(_))));
    }

    #[test]
    fn test_invalid_key() {
        assert!(matches!(parse_wallet(Some("0x1234")), Err(SwapError::WalletError(_))));
    }

    #[test]
    fn test_dev_key_address() {
        let wallet = parse_wallet(Some(DEV_KEY)).unwrap();
        assert_eq!(
            format!("{:?}", wallet.address()),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }
}
