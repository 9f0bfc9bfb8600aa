//! Swap output, slippage floor and reserve-ratio prices

use ethers::types::{U256, U512};

use super::{FEE_DENOMINATOR, FEE_NUMERATOR, PERCENT_FULL, SLIPPAGE_MULTIPLIER};
use crate::models::{PriceSource, Prices, Reserves};
use crate::utils::{Result, SwapError};

/// `a * b / c` with a 512-bit intermediate product.
pub fn mul_div(a: U256, b: U256, c: U256) -> Result<U256> {
    if c.is_zero() {
        return Err(SwapError::MathOverflow("division by zero"));
    }
    let wide = a.full_mul(b) / U512::from(c);
    U256::try_from(wide).map_err(|_| SwapError::MathOverflow("mul_div"))
}

/// Constant-product output for `amount_in`, after the 0.3% fee.
///
/// `out = in*997*reserveOut / (reserveIn*1000 + in*997)`. An empty pool or a
/// zero input quotes zero.
pub fn get_amount_out(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256> {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return Ok(U256::zero());
    }

    let amount_in_with_fee = amount_in
        .checked_mul(U256::from(FEE_NUMERATOR))
        .ok_or(SwapError::MathOverflow("get_amount_out"))?;

    let denominator = reserve_in
        .checked_mul(U256::from(FEE_DENOMINATOR))
        .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
        .ok_or(SwapError::MathOverflow("get_amount_out"))?;

    mul_div(amount_in_with_fee, reserve_out, denominator)
}

/// Minimum accepted amount: exactly `amount * 95 / 100`.
pub fn slippage_min(amount: U256) -> U256 {
    let wide = amount.full_mul(U256::from(SLIPPAGE_MULTIPLIER)) / U512::from(PERCENT_FULL);
    // never larger than `amount`
    U256::try_from(wide).unwrap_or(amount)
}

/// Reserve-ratio prices, used when the on-chain quote is unavailable.
pub fn spot_prices(reserves: &Reserves) -> Option<Prices> {
    if reserves.is_empty() {
        return None;
    }
    let one = U256::exp10(18);
    let price_a = mul_div(reserves.reserve_b, one, reserves.reserve_a).ok()?;
    let price_b = mul_div(reserves.reserve_a, one, reserves.reserve_b).ok()?;
    Some(Prices {
        price_a,
        price_b,
        source: PriceSource::ReserveRatio,
    })
}
