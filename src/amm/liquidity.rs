//! Proportional amounts for adding and removing liquidity

use ethers::types::U256;

use super::calculator::{mul_div, slippage_min};
use super::types::{LiquidityPlan, RemovalPreview};
use crate::models::{Reserves, TokenSide};
use crate::utils::Result;

/// `amount * reserve_other / reserve_this`
pub fn quote(amount: U256, reserve_this: U256, reserve_other: U256) -> Result<U256> {
    mul_div(amount, reserve_other, reserve_this)
}

/// Final add-liquidity amounts for the desired inputs.
///
/// An empty pool takes the desired amounts as-is. Otherwise the pair that
/// spends the full amount of one token without exceeding the other is used,
/// so neither final amount is above its desired value.
pub fn plan_add(desired_a: U256, desired_b: U256, reserves: &Reserves) -> Result<LiquidityPlan> {
    let (amount_a, amount_b) = if reserves.is_empty() {
        (desired_a, desired_b)
    } else {
        let optimal_b = quote(desired_a, reserves.reserve_a, reserves.reserve_b)?;
        if optimal_b <= desired_b {
            (desired_a, optimal_b)
        } else {
            let optimal_a = quote(desired_b, reserves.reserve_b, reserves.reserve_a)?;
            (optimal_a, desired_b)
        }
    };

    Ok(LiquidityPlan {
        amount_a,
        amount_b,
        min_a: slippage_min(amount_a),
        min_b: slippage_min(amount_b),
        adjusted: amount_a != desired_a || amount_b != desired_b,
    })
}

/// Counterpart amount for the liquidity form when `changed` was edited.
///
/// Nothing is suggested for an empty pool or a zero amount.
pub fn autofill_amount(changed: TokenSide, amount: U256, reserves: &Reserves) -> Result<Option<U256>> {
    if reserves.is_empty() || amount.is_zero() {
        return Ok(None);
    }
    let other = changed.other();
    quote(amount, reserves.of(changed), reserves.of(other)).map(Some)
}

/// Tokens returned for `liquidity` LP tokens at the current reserves.
pub fn preview_remove(liquidity: U256, reserves: &Reserves, total_supply: U256) -> Result<Option<RemovalPreview>> {
    if total_supply.is_zero() {
        return Ok(None);
    }
    let amount_a = mul_div(liquidity, reserves.reserve_a, total_supply)?;
    let amount_b = mul_div(liquidity, reserves.reserve_b, total_supply)?;

    Ok(Some(RemovalPreview {
        liquidity,
        amount_a,
        amount_b,
        min_a: slippage_min(amount_a),
        min_b: slippage_min(amount_b),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    #[test]
    fn test_plan_add_empty_pool_uses_desired() {
        let plan = plan_add(ether(10), ether(30), &Reserves::default()).unwrap();
        assert_eq!((plan.amount_a, plan.amount_b), (ether(10), ether(30)));
        assert!(!plan.adjusted);
        assert_eq!(plan.min_a, ether(10) * 95 / 100);
    }

    #[test]
    fn test_plan_add_limited_by_b() {
        // pool 1:2, want 10 A + 50 B -> 10 A + 20 B
        let reserves = Reserves::new(ether(100), ether(200));
        let plan = plan_add(ether(10), ether(50), &reserves).unwrap();
        assert_eq!((plan.amount_a, plan.amount_b), (ether(10), ether(20)));
        assert!(plan.adjusted);
    }

    #[test]
    fn test_plan_add_limited_by_a() {
        // pool 1:2, want 10 A + 10 B -> 5 A + 10 B
        let reserves = Reserves::new(ether(100), ether(200));
        let plan = plan_add(ether(10), ether(10), &reserves).unwrap();
        assert_eq!((plan.amount_a, plan.amount_b), (ether(5), ether(10)));
        assert_eq!(plan.min_a, slippage_min(ether(5)));
        assert_eq!(plan.min_b, slippage_min(ether(10)));
    }

    #[test]
    fn test_plan_add_never_exceeds_desired() {
        let pools = [
            Reserves::new(ether(3), ether(7)),
            Reserves::new(U256::from(1_000_003u64), ether(1)),
            Reserves::new(ether(1_000_000), U256::from(17u64)),
        ];
        let desires = [(ether(1), ether(1)), (U256::from(5u64), ether(9)), (ether(40), U256::one())];
        for reserves in &pools {
            for (a, b) in desires {
                let plan = plan_add(a, b, reserves).unwrap();
                assert!(plan.amount_a <= a);
                assert!(plan.amount_b <= b);
                assert_eq!(plan.min_a, plan.amount_a * 95 / 100);
                assert_eq!(plan.min_b, plan.amount_b * 95 / 100);
            }
        }
    }

    #[test]
    fn test_autofill_amount() {
        let reserves = Reserves::new(ether(100), ether(200));
        assert_eq!(autofill_amount(TokenSide::A, ether(3), &reserves).unwrap(), Some(ether(6)));
        assert_eq!(autofill_amount(TokenSide::B, ether(3), &reserves).unwrap(), Some(U256::exp10(17) * 15));
        assert_eq!(autofill_amount(TokenSide::A, U256::zero(), &reserves).unwrap(), None);
        assert_eq!(autofill_amount(TokenSide::A, ether(3), &Reserves::default()).unwrap(), None);
    }

    #[test]
    fn test_preview_remove() {
        let reserves = Reserves::new(ether(100), ether(400));
        let preview = preview_remove(ether(10), &reserves, ether(200)).unwrap().unwrap();
        assert_eq!(preview.amount_a, ether(5));
        assert_eq!(preview.amount_b, ether(20));
        assert_eq!(preview.min_a, ether(5) * 95 / 100);
        assert_eq!(preview.min_b, ether(19));

        assert!(preview_remove(ether(10), &reserves, U256::zero()).unwrap().is_none());
    }
}
