use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::utils::format::{format_amount, format_balance, BALANCE_DECIMALS, LP_DECIMALS};

/// One of the two pool tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenSide {
    A,
    B,
}

impl TokenSide {
    pub fn other(&self) -> Self {
        match self {
            TokenSide::A => TokenSide::B,
            TokenSide::B => TokenSide::A,
        }
    }

    /// Ticker of the deployed test token
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenSide::A => "TACC",
            TokenSide::B => "TBCC",
        }
    }

    /// Name used in interaction amounts
    pub fn label(&self) -> &'static str {
        match self {
            TokenSide::A => "Token A",
            TokenSide::B => "Token B",
        }
    }
}

impl std::fmt::Display for TokenSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of a swap through the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    AToB,
    BToA,
}

impl SwapDirection {
    pub fn from_side(from: TokenSide) -> Self {
        match from {
            TokenSide::A => SwapDirection::AToB,
            TokenSide::B => SwapDirection::BToA,
        }
    }

    pub fn token_in(&self) -> TokenSide {
        match self {
            SwapDirection::AToB => TokenSide::A,
            SwapDirection::BToA => TokenSide::B,
        }
    }

    pub fn token_out(&self) -> TokenSide {
        self.token_in().other()
    }

    /// Flip the from/to selection
    pub fn reversed(&self) -> Self {
        Self::from_side(self.token_out())
    }
}

/// Pool reserves as returned by `getReserves(tokenA, tokenB)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve_a: U256,
    pub reserve_b: U256,
}

impl Reserves {
    pub fn new(reserve_a: U256, reserve_b: U256) -> Self {
        Self { reserve_a, reserve_b }
    }

    /// True when either side is empty, i.e. the pool has no usable liquidity
    pub fn is_empty(&self) -> bool {
        self.reserve_a.is_zero() || self.reserve_b.is_zero()
    }

    pub fn of(&self, side: TokenSide) -> U256 {
        match side {
            TokenSide::A => self.reserve_a,
            TokenSide::B => self.reserve_b,
        }
    }

    /// `(reserve_in, reserve_out)` for a swap direction
    pub fn oriented(&self, direction: SwapDirection) -> (U256, U256) {
        (self.of(direction.token_in()), self.of(direction.token_out()))
    }
}

/// Where a displayed price came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    /// `getAmountOut` for one whole token, fee included
    Quoted,
    /// Plain reserve ratio, used when the quote call fails
    ReserveRatio,
}

/// Unit prices, 18-decimal fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prices {
    /// Token B received for one Token A
    pub price_a: U256,
    /// Token A received for one Token B
    pub price_b: U256,
    pub source: PriceSource,
}

/// Wallet balances for both tokens and the LP token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balances {
    pub token_a: U256,
    pub token_b: U256,
    pub lp: U256,
}

impl std::fmt::Display for Balances {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}: {}", TokenSide::A.symbol(), format_balance(self.token_a))?;
        writeln!(f, "{}: {}", TokenSide::B.symbol(), format_balance(self.token_b))?;
        write!(f, "LP:   {}", format_amount(self.lp, LP_DECIMALS))
    }
}

/// Reserves, prices and LP supply read in one refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub block: u64,
    pub reserves: Reserves,
    pub prices: Option<Prices>,
    pub lp_total_supply: U256,
}

impl PoolSnapshot {
    /// Navigation-bar style price line
    pub fn price_line(&self) -> String {
        match &self.prices {
            Some(prices) => format!(
                "1 Token A = {} Token B",
                format_amount(prices.price_a, BALANCE_DECIMALS)
            ),
            None => "Price: No liquidity".to_string(),
        }
    }
}

impl std::fmt::Display for PoolSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "═══════════════════════════════════════════════════════════")?;
        writeln!(f, "              SIMPLESWAP POOL (block {})", self.block)?;
        writeln!(f, "═══════════════════════════════════════════════════════════")?;
        writeln!(f)?;
        writeln!(f, "═══ RESERVES ═══")?;
        writeln!(f, "{}: {}", TokenSide::A.symbol(), format_balance(self.reserves.reserve_a))?;
        writeln!(f, "{}: {}", TokenSide::B.symbol(), format_balance(self.reserves.reserve_b))?;
        writeln!(f)?;
        writeln!(f, "═══ PRICES ═══")?;
        match &self.prices {
            Some(prices) => {
                writeln!(f, "Price A: {}", format_amount(prices.price_a, BALANCE_DECIMALS))?;
                writeln!(f, "Price B: {}", format_amount(prices.price_b, BALANCE_DECIMALS))?;
                if prices.source == PriceSource::ReserveRatio {
                    writeln!(f, "(reserve ratio, quote unavailable)")?;
                }
            }
            None => {
                writeln!(f, "Price A: -")?;
                writeln!(f, "Price B: -")?;
            }
        }
        writeln!(f, "{}", self.price_line())?;
        writeln!(f)?;
        writeln!(f, "Total LP supply: {}", format_balance(self.lp_total_supply))?;
        writeln!(f, "═══════════════════════════════════════════════════════════")?;
        Ok(())
    }
}

/// Whether a swap of a given size can go ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStatus {
    pub allowance: U256,
    pub balance: U256,
    pub needs_approval: bool,
    pub has_balance: bool,
}

impl ApprovalStatus {
    pub fn evaluate(amount: U256, allowance: U256, balance: U256) -> Self {
        Self {
            allowance,
            balance,
            needs_approval: allowance < amount,
            has_balance: balance >= amount,
        }
    }

    pub fn can_swap(&self) -> bool {
        !self.needs_approval && self.has_balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    #[test]
    fn test_direction_orientation() {
        let reserves = Reserves::new(ether(100), ether(200));
        assert_eq!(reserves.oriented(SwapDirection::AToB), (ether(100), ether(200)));
        assert_eq!(reserves.oriented(SwapDirection::BToA), (ether(200), ether(100)));
        assert_eq!(SwapDirection::AToB.reversed(), SwapDirection::BToA);
        assert_eq!(SwapDirection::BToA.token_out(), TokenSide::A);
    }

    #[test]
    fn test_empty_pool() {
        assert!(Reserves::default().is_empty());
        assert!(Reserves::new(ether(1), U256::zero()).is_empty());
        assert!(!Reserves::new(ether(1), ether(1)).is_empty());
    }

    #[test]
    fn test_approval_status() {
        let status = ApprovalStatus::evaluate(ether(10), ether(5), ether(20));
        assert!(status.needs_approval);
        assert!(!status.can_swap());

        let status = ApprovalStatus::evaluate(ether(10), ether(10), ether(10));
        assert!(!status.needs_approval);
        assert!(status.has_balance);
        assert!(status.can_swap());

        let status = ApprovalStatus::evaluate(ether(10), U256::MAX, ether(9));
        assert!(!status.can_swap());
    }

    #[test]
    fn test_price_line_without_liquidity() {
        let snapshot = PoolSnapshot {
            block: 1,
            reserves: Reserves::default(),
            prices: None,
            lp_total_supply: U256::zero(),
        };
        assert_eq!(snapshot.price_line(), "Price: No liquidity");
    }
}
