use async_trait::async_trait;
use ethers::types::U256;
use crate::models::Reserves;
use crate::utils::Result;

/// Read-only view of the pool: anything that can answer reserve, supply
/// and output-quote queries
#[async_trait]
pub trait PoolReader: Send + Sync {
    /// Current `(reserveA, reserveB)`
    async fn reserves(&self) -> Result<Reserves>;

    /// Total LP token supply
    async fn total_supply(&self) -> Result<U256>;

    /// The exchange's own `getAmountOut`
    async fn amount_out(&self, amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256>;
}
