//! Amount parsing and display helpers
//!
//! All token amounts are 18-decimal fixed point values.
use ethers::types::{Address, U256};
use ethers::utils::{parse_ether, to_checksum};

use super::errors::{Result, SwapError};

/// Fraction digits for balances, reserves and prices
pub const BALANCE_DECIMALS: usize = 2;

/// Fraction digits for the detailed LP balance
pub const LP_DECIMALS: usize = 16;

const TOKEN_DECIMALS: usize = 18;

/// Parse a decimal string such as `"1.5"` into wei.
pub fn parse_amount(input: &str) -> Result<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SwapError::InvalidAmount("amount is empty".to_string()));
    }
    parse_ether(trimmed).map_err(|e| SwapError::InvalidAmount(format!("{}: {}", trimmed, e)))
}

/// Parse an amount and reject zero.
pub fn parse_positive_amount(input: &str) -> Result<U256> {
    let amount = parse_amount(input)?;
    if amount.is_zero() {
        return Err(SwapError::InvalidAmount(format!("{} must be greater than zero", input.trim())));
    }
    Ok(amount)
}

/// Shortest exact decimal form, e.g. `1.5` or `3.0`.
pub fn format_ether(amount: U256) -> String {
    let full = ethers::utils::format_ether(amount);
    match full.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{}.0", int)
            } else {
                format!("{}.{}", int, frac)
            }
        }
        None => format!("{}.0", full),
    }
}

/// Fixed-precision display with thousands separators, rounded half up.
///
/// `format_amount(1_234_567 * 10^15, 2)` renders `1,234.57`.
pub fn format_amount(amount: U256, decimals: usize) -> String {
    let decimals = decimals.min(TOKEN_DECIMALS);
    let unit = U256::exp10(TOKEN_DECIMALS - decimals);
    let scaled = amount.saturating_add(unit / 2) / unit;

    let precision = U256::exp10(decimals);
    let int_part = group_thousands(&(scaled / precision).to_string());

    if decimals == 0 {
        return int_part;
    }
    let frac = (scaled % precision).to_string();
    format!("{}.{:0>width$}", int_part, frac, width = decimals)
}

/// Two-decimal display used by balances, reserves and interaction amounts.
pub fn format_balance(amount: U256) -> String {
    format_amount(amount, BALANCE_DECIMALS)
}

/// `amount_out` per one unit of `amount_in`, as an 18-decimal value.
pub fn rate(amount_in: U256, amount_out: U256) -> Option<U256> {
    if amount_in.is_zero() {
        return None;
    }
    amount_out.checked_mul(U256::exp10(TOKEN_DECIMALS)).map(|scaled| scaled / amount_in)
}

/// `0x1234...abcd` form of a checksummed address.
pub fn truncate_address(address: Address) -> String {
    let full = to_checksum(&address, None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.5").unwrap(), U256::exp10(17) * 15);
        assert_eq!(parse_amount(" 1000 ").unwrap(), ether(1000));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_positive_amount("0").is_err());
    }

    #[test]
    fn test_format_ether_trims_zeros() {
        assert_eq!(format_ether(ether(3)), "3.0");
        assert_eq!(format_ether(U256::exp10(17) * 15), "1.5");
        assert_eq!(format_ether(U256::zero()), "0.0");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(U256::from(1_234_567u64) * U256::exp10(15), 2), "1,234.57");
        assert_eq!(format_amount(ether(1_000_000), 2), "1,000,000.00");
        assert_eq!(format_amount(U256::exp10(15) * 5, 2), "0.01");
        assert_eq!(format_amount(U256::exp10(15) * 4, 2), "0.00");
        assert_eq!(format_amount(U256::one(), LP_DECIMALS), "0.0000000000000000");
        assert_eq!(format_amount(ether(12), 0), "12");
    }

    #[test]
    fn test_rate() {
        assert_eq!(rate(ether(2), ether(3)), Some(U256::exp10(17) * 15));
        assert_eq!(rate(U256::zero(), ether(3)), None);
    }

    #[test]
    fn test_truncate_address() {
        let addr: Address = "0x957d727337297b649AE8df9Cad0b157cf04C3224".parse().unwrap();
        assert_eq!(truncate_address(addr), "0x957d...3224");
    }
}
