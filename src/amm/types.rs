//! Preview values produced by the pool math

use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::models::SwapDirection;
use crate::utils::format::{format_balance, rate};

/// Expected result of swapping `amount_in`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub direction: SwapDirection,
    pub amount_in: U256,
    /// Output at current reserves, fee included
    pub amount_out: U256,
    /// Slippage floor submitted as `amountOutMin`
    pub min_out: U256,
}

impl SwapQuote {
    /// Output per input unit, 18 decimals
    pub fn rate(&self) -> Option<U256> {
        rate(self.amount_in, self.amount_out)
    }

    /// `1 TACC = 1.96 TBCC`
    pub fn rate_line(&self) -> String {
        format!(
            "1 {} = {} {}",
            self.direction.token_in().symbol(),
            self.rate().map(format_balance).unwrap_or_else(|| "0.00".to_string()),
            self.direction.token_out().symbol()
        )
    }
}

impl std::fmt::Display for SwapQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "You pay:     {} {}", format_balance(self.amount_in), self.direction.token_in().symbol())?;
        writeln!(f, "You receive: {} {}", format_balance(self.amount_out), self.direction.token_out().symbol())?;
        writeln!(f, "Minimum:     {} {}", format_balance(self.min_out), self.direction.token_out().symbol())?;
        write!(f, "Rate:        {}", self.rate_line())
    }
}

/// Amounts actually submitted to `addLiquidity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPlan {
    pub amount_a: U256,
    pub amount_b: U256,
    pub min_a: U256,
    pub min_b: U256,
    /// True when the pool ratio changed the desired amounts
    pub adjusted: bool,
}

/// Tokens returned for burning `liquidity` LP tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalPreview {
    pub liquidity: U256,
    pub amount_a: U256,
    pub amount_b: U256,
    pub min_a: U256,
    pub min_b: U256,
}

impl std::fmt::Display for RemovalPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Burn:    {} LP", format_balance(self.liquidity))?;
        writeln!(f, "Receive: {} Token A", format_balance(self.amount_a))?;
        write!(f, "         {} Token B", format_balance(self.amount_b))
    }
}
