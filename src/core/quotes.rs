//! Previews built from fresh pool reads
//!
//! Every function re-reads reserves through the `PoolReader` before deriving
//! anything; nothing is cached between calls.

use std::sync::atomic::{AtomicBool, Ordering};

use ethers::types::U256;

use super::traits::PoolReader;
use crate::amm::{self, LiquidityPlan, RemovalPreview, SwapQuote};
use crate::models::{PriceSource, Prices, Reserves, SwapDirection, TokenSide};
use crate::utils::Result;

/// Unit prices from the exchange's `getAmountOut`, falling back to the
/// reserve ratio when the quote call fails. `None` for an empty pool.
pub async fn fetch_prices(reader: &dyn PoolReader, reserves: &Reserves) -> Option<Prices> {
    if reserves.is_empty() {
        return None;
    }

    let one_token = U256::exp10(18);
    let quoted = async {
        let price_a = reader
            .amount_out(one_token, reserves.reserve_a, reserves.reserve_b)
            .await?;
        let price_b = reader
            .amount_out(one_token, reserves.reserve_b, reserves.reserve_a)
            .await?;
        Result::Ok(Prices {
            price_a,
            price_b,
            source: PriceSource::Quoted,
        })
    };

    match quoted.await {
        Ok(prices) => Some(prices),
        Err(e) => {
            tracing::warn!("Error calculating real prices, using reserve ratio: {}", e);
            amm::spot_prices(reserves)
        }
    }
}

/// Expected output for swapping `amount_in` in `direction`
pub async fn quote_swap(reader: &dyn PoolReader, direction: SwapDirection, amount_in: U256) -> Result<SwapQuote> {
    let reserves = reader.reserves().await?;
    let (reserve_in, reserve_out) = reserves.oriented(direction);

    let amount_out = if reserve_in.is_zero() || reserve_out.is_zero() || amount_in.is_zero() {
        U256::zero()
    } else {
        reader.amount_out(amount_in, reserve_in, reserve_out).await?
    };

    Ok(SwapQuote {
        direction,
        amount_in,
        amount_out,
        min_out: amm::slippage_min(amount_out),
    })
}

/// Add-liquidity amounts fitted to the current pool ratio
pub async fn plan_liquidity(reader: &dyn PoolReader, desired_a: U256, desired_b: U256) -> Result<LiquidityPlan> {
    let reserves = reader.reserves().await?;
    if !reserves.is_empty() {
        tracing::info!("Existing liquidity detected, calculating optimal amounts...");
    }
    amm::plan_add(desired_a, desired_b, &reserves)
}

/// Counterpart amount for the liquidity form.
///
/// Returns `None` without reading the pool when another autofill is still
/// running; `guard` is the shared in-progress flag.
pub async fn autofill(
    reader: &dyn PoolReader,
    guard: &AtomicBool,
    changed: TokenSide,
    amount: U256,
) -> Result<Option<U256>> {
    if guard.swap(true, Ordering::SeqCst) {
        tracing::debug!("Autofill already in progress, skipping");
        return Ok(None);
    }

    let result = async {
        let reserves = reader.reserves().await?;
        amm::autofill_amount(changed, amount, &reserves)
    }
    .await;

    guard.store(false, Ordering::SeqCst);
    result
}

/// Tokens returned for burning `liquidity` LP tokens
pub async fn preview_removal(reader: &dyn PoolReader, liquidity: U256) -> Result<Option<RemovalPreview>> {
    let reserves = reader.reserves().await?;
    let total_supply = reader.total_supply().await?;
    amm::preview_remove(liquidity, &reserves, total_supply)
}
