use async_trait::async_trait;
use ethers::types::U256;
use simpleswap_client::amm::get_amount_out;
use simpleswap_client::core::quotes::{autofill, fetch_prices, plan_liquidity, preview_removal, quote_swap};
use simpleswap_client::models::{PriceSource, Reserves, SwapDirection, TokenSide};
use simpleswap_client::{PoolReader, Result, SwapError};
use std::sync::atomic::{AtomicBool, Ordering};

fn ether(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

/// In-memory pool that answers like the deployed exchange
struct MockPool {
    reserves: Reserves,
    total_supply: U256,
    quote_fails: bool,
}

impl MockPool {
    fn new(reserve_a: u64, reserve_b: u64, total_supply: u64) -> Self {
        Self {
            reserves: Reserves::new(ether(reserve_a), ether(reserve_b)),
            total_supply: ether(total_supply),
            quote_fails: false,
        }
    }

    fn failing_quotes(mut self) -> Self {
        self.quote_fails = true;
        self
    }
}

#[async_trait]
impl PoolReader for MockPool {
    async fn reserves(&self) -> Result<Reserves> {
        Ok(self.reserves)
    }

    async fn total_supply(&self) -> Result<U256> {
        Ok(self.total_supply)
    }

    async fn amount_out(&self, amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256> {
        if self.quote_fails {
            return Err(SwapError::ContractCallError("execution reverted".to_string()));
        }
        get_amount_out(amount_in, reserve_in, reserve_out)
    }
}

#[tokio::test]
async fn test_quote_swap_uses_oriented_reserves() {
    let pool = MockPool::new(100, 200, 141);

    let quote = quote_swap(&pool, SwapDirection::AToB, ether(1)).await.unwrap();
    let expected = get_amount_out(ether(1), ether(100), ether(200)).unwrap();
    assert_eq!(quote.amount_out, expected);
    assert_eq!(quote.min_out, expected * 95 / 100);

    let reverse = quote_swap(&pool, SwapDirection::BToA, ether(1)).await.unwrap();
    assert!(reverse.amount_out < quote.amount_out);
    assert_eq!(reverse.direction.token_out(), TokenSide::A);
}

#[tokio::test]
async fn test_quote_swap_empty_pool_is_zero() {
    let pool = MockPool::new(0, 0, 0);
    let quote = quote_swap(&pool, SwapDirection::AToB, ether(5)).await.unwrap();
    assert!(quote.amount_out.is_zero());
    assert!(quote.min_out.is_zero());
}

#[tokio::test]
async fn test_prices_fall_back_to_reserve_ratio() {
    let pool = MockPool::new(100, 200, 141);
    let prices = fetch_prices(&pool, &pool.reserves).await.unwrap();
    assert_eq!(prices.source, PriceSource::Quoted);
    // fee and price impact keep the quote under the 2.0 ratio
    assert!(prices.price_a < ether(2));

    let pool = pool.failing_quotes();
    let prices = fetch_prices(&pool, &pool.reserves).await.unwrap();
    assert_eq!(prices.source, PriceSource::ReserveRatio);
    assert_eq!(prices.price_a, ether(2));
    assert_eq!(prices.price_b, ether(1) / 2);

    let empty = MockPool::new(0, 0, 0);
    assert!(fetch_prices(&empty, &empty.reserves).await.is_none());
}

#[tokio::test]
async fn test_plan_liquidity_never_exceeds_desired() {
    let pool = MockPool::new(100, 200, 141);

    let plan = plan_liquidity(&pool, ether(10), ether(50)).await.unwrap();
    assert_eq!(plan.amount_a, ether(10));
    assert_eq!(plan.amount_b, ether(20));
    assert!(plan.adjusted);

    let plan = plan_liquidity(&pool, ether(10), ether(4)).await.unwrap();
    assert_eq!(plan.amount_a, ether(2));
    assert_eq!(plan.amount_b, ether(4));
    assert_eq!(plan.min_a, ether(2) * 95 / 100);
}

#[tokio::test]
async fn test_autofill_skips_while_in_progress() {
    let pool = MockPool::new(100, 200, 141);
    let guard = AtomicBool::new(false);

    let filled = autofill(&pool, &guard, TokenSide::A, ether(3)).await.unwrap();
    assert_eq!(filled, Some(ether(6)));
    assert!(!guard.load(Ordering::SeqCst));

    guard.store(true, Ordering::SeqCst);
    let skipped = autofill(&pool, &guard, TokenSide::B, ether(6)).await.unwrap();
    assert_eq!(skipped, None);
    assert!(guard.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_preview_removal() {
    let pool = MockPool::new(100, 200, 50);
    let preview = preview_removal(&pool, ether(5)).await.unwrap().unwrap();
    assert_eq!(preview.amount_a, ether(10));
    assert_eq!(preview.amount_b, ether(20));
    assert_eq!(preview.min_b, ether(19));

    let empty = MockPool::new(0, 0, 0);
    assert!(preview_removal(&empty, ether(1)).await.unwrap().is_none());
}
