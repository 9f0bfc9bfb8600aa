//! Text rendering of interaction records

use crate::models::{ActionType, InteractionRecord};
use crate::utils::format::truncate_address;

const EMPTY_MESSAGE: &str = "No interactions yet. Connect your wallet and start trading!";

fn token_name(part: &str) -> &'static str {
    if part.contains("Token A") {
        "Token A"
    } else if part.contains("Token B") {
        "Token B"
    } else {
        "Token"
    }
}

fn strip_token(part: &str, name: &str) -> String {
    part.replacen(name, "", 1).trim().to_string()
}

/// Column layout of a record's amount text.
///
/// Amounts that do not match the action's pattern are returned unchanged.
pub fn format_amount_columns(action: ActionType, amount: &str) -> String {
    match action {
        ActionType::Swap => {
            let parts: Vec<&str> = amount.split(" → ").collect();
            if let [from, to] = parts.as_slice() {
                let (from, to) = (from.trim(), to.trim());
                let from_token = token_name(from);
                let to_token = token_name(to);
                return format!(
                    "From:   {} {}\nTo:        {} {}",
                    strip_token(from, from_token),
                    from_token,
                    strip_token(to, to_token),
                    to_token
                );
            }
        }
        ActionType::AddLiquidity => {
            let parts: Vec<&str> = amount.split(" + ").collect();
            if let [a, b] = parts.as_slice() {
                return format!(
                    "From:   {} Token A\n            {} Token B\nTo:       LP",
                    strip_token(a.trim(), "Token A"),
                    strip_token(b.trim(), "Token B")
                );
            }
        }
        ActionType::RemoveLiquidity => {
            let parts: Vec<&str> = amount.split(" → ").collect();
            if let [lp, tokens] = parts.as_slice() {
                let tokens: Vec<&str> = tokens.split(" + ").collect();
                if let [a, b] = tokens.as_slice() {
                    return format!(
                        "From:   {} LP\nTo:       {} Token A\n            {} Token B",
                        strip_token(lp.trim(), "LP"),
                        strip_token(a, "Token A"),
                        strip_token(b, "Token B")
                    );
                }
            }
        }
        ActionType::Approve => {}
    }
    amount.to_string()
}

/// One record as a block of text
pub fn render_record(record: &InteractionRecord) -> String {
    let mut out = format!(
        "{} {:<18} {}\n   🕒 {}\n",
        record.action_type.emoji(),
        record.action_type.label(),
        truncate_address(record.wallet_address),
        record.timestamp
    );

    if !record.amount.is_empty() {
        for line in format_amount_columns(record.action_type, &record.amount).lines() {
            out.push_str("   ");
            out.push_str(line);
            out.push('\n');
        }
    }

    if let Some(link) = record.explorer_link() {
        out.push_str(&format!("   🔗 View on Etherscan: {}\n", link));
    }
    out
}

/// The whole log, newest first
pub fn render_interactions(records: &[InteractionRecord]) -> String {
    if records.is_empty() {
        return format!("ℹ️  {}\n", EMPTY_MESSAGE);
    }
    records
        .iter()
        .map(render_record)
        .collect::<Vec<_>>()
        .join("\n")
}
