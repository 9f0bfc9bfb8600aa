pub mod client;
pub mod wallet;

pub use client::BlockchainClient;
pub use wallet::{SignerClient, WalletConnector, WalletSession};
