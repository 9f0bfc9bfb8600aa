//! Contract façade over the exchange and its two tokens
//!
//! One `Exchange` is built per wallet session; every binding is tied to the
//! session's signer. Writes wait for the receipt and fail on revert.

use async_trait::async_trait;
use chrono::Utc;
use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::types::{Address, BlockNumber, TransactionReceipt, U256, U64};

use super::traits::PoolReader;
use crate::amm::{LiquidityPlan, RemovalPreview};
use crate::blockchain::{BlockchainClient, SignerClient, WalletSession};
use crate::config::ContractAddresses;
use crate::contracts::{ISimpleSwap, ITestToken};
use crate::models::{Balances, Reserves, SwapDirection, TokenSide};
use crate::utils::{Result, SwapError};

/// Unix-seconds deadline `minutes` from now
pub fn deadline_from_now(minutes: u64) -> U256 {
    let now = Utc::now().timestamp().max(0) as u64;
    U256::from(now.saturating_add(minutes.saturating_mul(60)))
}

#[derive(Debug, Clone)]
pub struct Exchange {
    owner: Address,
    addresses: ContractAddresses,
    client: BlockchainClient,
    simple_swap: ISimpleSwap<SignerClient>,
    token_a: ITestToken<SignerClient>,
    token_b: ITestToken<SignerClient>,
}

impl Exchange {
    pub fn new(session: &WalletSession, addresses: ContractAddresses) -> Self {
        let signer = session.signer();
        tracing::debug!(
            "Binding contracts: exchange {:?}, token A {:?}, token B {:?}",
            addresses.simple_swap,
            addresses.token_a,
            addresses.token_b
        );

        Self {
            owner: session.address(),
            addresses,
            client: session.client().clone(),
            simple_swap: ISimpleSwap::new(addresses.simple_swap, signer.clone()),
            token_a: ITestToken::new(addresses.token_a, signer.clone()),
            token_b: ITestToken::new(addresses.token_b, signer),
        }
    }

    /// The connected account
    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn addresses(&self) -> &ContractAddresses {
        &self.addresses
    }

    pub fn contract(&self) -> &ISimpleSwap<SignerClient> {
        &self.simple_swap
    }

    pub fn token_address(&self, side: TokenSide) -> Address {
        match side {
            TokenSide::A => self.addresses.token_a,
            TokenSide::B => self.addresses.token_b,
        }
    }

    fn token(&self, side: TokenSide) -> &ITestToken<SignerClient> {
        match side {
            TokenSide::A => &self.token_a,
            TokenSide::B => &self.token_b,
        }
    }

    pub async fn latest_block(&self) -> Result<u64> {
        self.client.block_number().await
    }

    pub async fn balance_of(&self, side: TokenSide) -> Result<U256> {
        self.token(side)
            .balance_of(self.owner)
            .call()
            .await
            .map_err(SwapError::contract)
    }

    /// LP tokens held by the connected account
    pub async fn lp_balance(&self) -> Result<U256> {
        self.simple_swap
            .balance_of(self.owner)
            .call()
            .await
            .map_err(SwapError::contract)
    }

    pub async fn balances(&self) -> Result<Balances> {
        tracing::debug!("Updating token balances...");
        let token_a = self.balance_of(TokenSide::A).await?;
        let token_b = self.balance_of(TokenSide::B).await?;
        let lp = self.lp_balance().await?;
        Ok(Balances { token_a, token_b, lp })
    }

    /// Allowance granted by the account to the exchange
    pub async fn allowance(&self, side: TokenSide) -> Result<U256> {
        self.token(side)
            .allowance(self.owner, self.addresses.simple_swap)
            .call()
            .await
            .map_err(SwapError::contract)
    }

    /// LP supply read at an explicit block so no cached value is returned
    pub async fn total_supply_at(&self, block: u64) -> Result<U256> {
        let supply = self
            .simple_swap
            .total_supply()
            .block(BlockNumber::Number(U64::from(block)))
            .call()
            .await
            .map_err(SwapError::contract)?;
        tracing::debug!("Raw totalSupply at block {}: {}", block, supply);
        Ok(supply)
    }

    pub async fn approve(&self, side: TokenSide, amount: U256) -> Result<TransactionReceipt> {
        tracing::info!("📝 Approving {}...", side);
        submit(self.token(side).approve(self.addresses.simple_swap, amount), "approve").await
    }

    pub async fn mint(&self, side: TokenSide, amount: U256) -> Result<TransactionReceipt> {
        tracing::info!("🪙 Minting {}...", side);
        submit(self.token(side).mint(self.owner, amount), "mint").await
    }

    pub async fn swap_exact_tokens_for_tokens(
        &self,
        direction: SwapDirection,
        amount_in: U256,
        min_out: U256,
        deadline: U256,
    ) -> Result<TransactionReceipt> {
        let path = vec![
            self.token_address(direction.token_in()),
            self.token_address(direction.token_out()),
        ];
        tracing::info!("🔄 Executing swap {} → {}...", direction.token_in(), direction.token_out());
        submit(
            self.simple_swap
                .swap_exact_tokens_for_tokens(amount_in, min_out, path, self.owner, deadline),
            "swap",
        )
        .await
    }

    pub async fn add_liquidity(&self, plan: &LiquidityPlan, deadline: U256) -> Result<TransactionReceipt> {
        tracing::info!("➕ Adding liquidity...");
        submit(
            self.simple_swap.add_liquidity(
                self.addresses.token_a,
                self.addresses.token_b,
                plan.amount_a,
                plan.amount_b,
                plan.min_a,
                plan.min_b,
                self.owner,
                deadline,
            ),
            "addLiquidity",
        )
        .await
    }

    pub async fn remove_liquidity(&self, preview: &RemovalPreview, deadline: U256) -> Result<TransactionReceipt> {
        tracing::info!("➖ Removing liquidity...");
        submit(
            self.simple_swap.remove_liquidity(
                self.addresses.token_a,
                self.addresses.token_b,
                preview.liquidity,
                preview.min_a,
                preview.min_b,
                self.owner,
                deadline,
            ),
            "removeLiquidity",
        )
        .await
    }
}

#[async_trait]
impl PoolReader for Exchange {
    async fn reserves(&self) -> Result<Reserves> {
        let (reserve_a, reserve_b) = self
            .simple_swap
            .get_reserves(self.addresses.token_a, self.addresses.token_b)
            .call()
            .await
            .map_err(SwapError::contract)?;
        Ok(Reserves::new(reserve_a, reserve_b))
    }

    async fn total_supply(&self) -> Result<U256> {
        let block = self.latest_block().await?;
        self.total_supply_at(block).await
    }

    async fn amount_out(&self, amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256> {
        self.simple_swap
            .get_amount_out(amount_in, reserve_in, reserve_out)
            .call()
            .await
            .map_err(SwapError::contract)
    }
}

/// Send a transaction and wait for it to be mined
async fn submit<D: Detokenize>(call: ContractCall<SignerClient, D>, action: &str) -> Result<TransactionReceipt> {
    let pending = call.send().await.map_err(SwapError::contract)?;
    let tx_hash = pending.tx_hash();
    tracing::info!("⏳ {} submitted: {:?}", action, tx_hash);

    let receipt = pending
        .await?
        .ok_or_else(|| SwapError::TransactionDropped(format!("{:?}", tx_hash)))?;

    if receipt.status == Some(U64::zero()) {
        return Err(SwapError::TransactionReverted(format!("{:?}", tx_hash)));
    }

    tracing::info!("✅ {} mined in block {:?}", action, receipt.block_number);
    Ok(receipt)
}
