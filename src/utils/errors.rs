use ethers::types::U256;
use thiserror::Error;

use super::format::format_ether;

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Connect your wallet first")]
    NotConnected,

    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Wrong network: expected chain {expected}, connected to {actual}")]
    WrongChain { expected: u64, actual: u64 },

    #[error("RPC error: {0}")]
    RpcError(#[from] ethers::providers::ProviderError),

    #[error("Wallet error: {0}")]
    WalletError(#[from] ethers::signers::WalletError),

    #[error("Contract call failed: {0}")]
    ContractCallError(String),

    #[error("Transaction {0} was dropped before it was mined")]
    TransactionDropped(String),

    #[error("Transaction {0} reverted")]
    TransactionReverted(String),

    #[error("Insufficient {token} balance. Need: {need}, Have: {have}")]
    InsufficientBalance { token: String, need: String, have: String },

    #[error("Insufficient {0} allowance. Please approve tokens first.")]
    InsufficientAllowance(String),

    #[error("Insufficient LP tokens")]
    InsufficientLiquidity,

    #[error("Math overflow in {0}")]
    MathOverflow(&'static str),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SwapError {
    /// Wrap any contract error (call or send) as a display string.
    pub fn contract(err: impl std::fmt::Display) -> Self {
        SwapError::ContractCallError(err.to_string())
    }

    pub fn insufficient_balance(token: &str, need: U256, have: U256) -> Self {
        SwapError::InsufficientBalance {
            token: token.to_string(),
            need: format_ether(need),
            have: format_ether(have),
        }
    }

    /// Message shown to the user for this failure.
    ///
    /// Node and wallet errors arrive as free text, so allowance failures are
    /// recognised by substring.
    pub fn friendly_message(&self) -> String {
        let raw = self.to_string();
        if raw.to_lowercase().contains("allowance") {
            "Please approve tokens first by clicking 'Approve All Tokens'.".to_string()
        } else {
            raw
        }
    }
}

pub type Result<T> = std::result::Result<T, SwapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowance_failures_get_friendly_text() {
        let err = SwapError::ContractCallError(
            "execution reverted: ERC20: insufficient allowance".to_string(),
        );
        assert_eq!(
            err.friendly_message(),
            "Please approve tokens first by clicking 'Approve All Tokens'."
        );

        let err = SwapError::InsufficientAllowance("Token A".to_string());
        assert!(err.friendly_message().starts_with("Please approve tokens first"));
    }

    #[test]
    fn test_other_failures_keep_their_message() {
        let err = SwapError::insufficient_balance("Token B", U256::exp10(18) * 3, U256::exp10(18));
        assert_eq!(
            err.friendly_message(),
            "Insufficient Token B balance. Need: 3.0, Have: 1.0"
        );
        assert_eq!(SwapError::InsufficientLiquidity.friendly_message(), "Insufficient LP tokens");
    }
}
