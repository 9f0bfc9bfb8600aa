//! SimpleSwap contract interfaces
//!
//! The exchange is a single-pool constant-product AMM. These bindings allow us to:
//! - Read pool reserves, LP supply and output quotes
//! - Submit swaps and liquidity changes
//! - Mint and approve the two test tokens
pub mod simple_swap;
pub mod test_token;

pub use simple_swap::{
    ISimpleSwap, ISimpleSwapEvents, LiquidityAddedFilter, LiquidityRemovedFilter, SwapFilter,
};
pub use test_token::ITestToken;

/// Deployed SimpleSwap addresses on Sepolia (Chain ID: 11155111)
pub mod addresses {
    use ethers::types::Address;
    use once_cell::sync::Lazy;
    use std::str::FromStr;

    /// SimpleSwap exchange (also the LP token)
    pub const SIMPLE_SWAP: &str = "0x957d727337297b649AE8df9Cad0b157cf04C3224";

    /// Token A (TACC)
    pub const TOKEN_A: &str = "0xCDBDDA06C8b9dF27a8502e57C8614d4EfAc5ED76";

    /// Token B (TBCC)
    pub const TOKEN_B: &str = "0x11d6A5B61eE830b97C88b4Fc26849274517DfF94";

    /// Sepolia chain id
    pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

    /// Block explorer transaction page prefix
    pub const EXPLORER_TX_URL: &str = "https://sepolia.etherscan.io/tx/";

    static SIMPLE_SWAP_ADDRESS: Lazy<Address> =
        Lazy::new(|| Address::from_str(SIMPLE_SWAP).unwrap_or_default());
    static TOKEN_A_ADDRESS: Lazy<Address> =
        Lazy::new(|| Address::from_str(TOKEN_A).unwrap_or_default());
    static TOKEN_B_ADDRESS: Lazy<Address> =
        Lazy::new(|| Address::from_str(TOKEN_B).unwrap_or_default());

    pub fn simple_swap() -> Address {
        *SIMPLE_SWAP_ADDRESS
    }

    pub fn token_a() -> Address {
        *TOKEN_A_ADDRESS
    }

    pub fn token_b() -> Address {
        *TOKEN_B_ADDRESS
    }

    /// Explorer link for a transaction hash
    pub fn explorer_tx_link(tx_hash: &str) -> String {
        format!("{}{}", EXPLORER_TX_URL, tx_hash)
    }
}
