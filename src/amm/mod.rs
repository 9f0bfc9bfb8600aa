//! Client-side mirror of the exchange's constant-product math
//!
//! The chain is the source of truth; these values drive previews, autofill
//! and the slippage floors sent along with each transaction.

mod types;
pub mod calculator;
pub mod liquidity;

pub use types::{LiquidityPlan, RemovalPreview, SwapQuote};
pub use calculator::{get_amount_out, mul_div, slippage_min, spot_prices};
pub use liquidity::{autofill_amount, plan_add, preview_remove, quote};

/// Swap fee kept by the pool: `amount_in * 997 / 1000` is traded
pub const FEE_NUMERATOR: u64 = 997;
pub const FEE_DENOMINATOR: u64 = 1000;

/// 95% of the expected amount, i.e. a fixed 5% slippage tolerance
pub const SLIPPAGE_MULTIPLIER: u64 = 95;
pub const PERCENT_FULL: u64 = 100;
