use chrono::{Local, Utc};
use ethers::types::{Address, H256};
use serde::{Deserialize, Deserializer, Serialize};

use crate::contracts::addresses;

/// Kind of wallet action recorded in the interaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    Approve,
    Swap,
    AddLiquidity,
    RemoveLiquidity,
}

impl ActionType {
    /// Stored identifier, e.g. `add-liquidity`
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Approve => "approve",
            ActionType::Swap => "swap",
            ActionType::AddLiquidity => "add-liquidity",
            ActionType::RemoveLiquidity => "remove-liquidity",
        }
    }

    /// Badge text, e.g. `add liquidity`
    pub fn label(&self) -> String {
        self.as_str().replacen('-', " ", 1)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ActionType::Approve => "✔️",
            ActionType::Swap => "🔄",
            ActionType::AddLiquidity => "➕",
            ActionType::RemoveLiquidity => "➖",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the per-wallet interaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    /// Creation time in milliseconds
    pub id: i64,
    pub wallet_address: Address,
    pub action_type: ActionType,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub amount: String,
    /// An empty string in stored JSON reads as `None`
    #[serde(default, deserialize_with = "empty_hash_as_none", skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<H256>,
    /// Local time, `MM/DD/YYYY, HH:MM:SS`
    pub timestamp: String,
}

fn empty_hash_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<H256>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(hash) => hash
            .trim_start_matches("0x")
            .parse::<H256>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl InteractionRecord {
    pub fn new(wallet_address: Address, action_type: ActionType, amount: impl Into<String>) -> Self {
        Self {
            id: Utc::now().timestamp_millis(),
            wallet_address,
            action_type,
            details: String::new(),
            amount: amount.into(),
            tx_hash: None,
            timestamp: Local::now().format("%m/%d/%Y, %H:%M:%S").to_string(),
        }
    }

    pub fn with_tx_hash(mut self, tx_hash: H256) -> Self {
        self.tx_hash = Some(tx_hash);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn explorer_link(&self) -> Option<String> {
        self.tx_hash
            .map(|hash| addresses::explorer_tx_link(&format!("{:?}", hash)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_names() {
        assert_eq!(ActionType::AddLiquidity.as_str(), "add-liquidity");
        assert_eq!(ActionType::RemoveLiquidity.label(), "remove liquidity");
        assert_eq!(ActionType::Swap.label(), "swap");
        assert_eq!(
            serde_json::to_string(&ActionType::RemoveLiquidity).unwrap(),
            "\"remove-liquidity\""
        );
    }

    #[test]
    fn test_record_json_shape() {
        let record = InteractionRecord::new(Address::repeat_byte(0x11), ActionType::Swap, "1.00 Token A → 0.99 Token B")
            .with_tx_hash(H256::repeat_byte(0x22));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["actionType"], "swap");
        assert_eq!(json["walletAddress"], "0x1111111111111111111111111111111111111111");
        assert!(json["txHash"].as_str().unwrap().starts_with("0x2222"));
        assert_eq!(json["timestamp"].as_str().unwrap().len(), "01/02/2025, 13:04:05".len());

        let parsed: InteractionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_empty_tx_hash_reads_as_none() {
        let json = r#"{
            "id": 1700000000000,
            "walletAddress": "0x1111111111111111111111111111111111111111",
            "actionType": "approve",
            "details": "",
            "amount": "",
            "txHash": "",
            "timestamp": "01/02/2025, 13:04:05"
        }"#;
        let record: InteractionRecord = serde_json::from_str(json).unwrap();
        assert!(record.tx_hash.is_none());

        let missing = json.replace(r#""txHash": "","#, "");
        let record: InteractionRecord = serde_json::from_str(&missing).unwrap();
        assert!(record.tx_hash.is_none());

        let hash = format!("0x{}", "ab".repeat(32));
        let with_hash = json.replace(r#""txHash": """#, &format!(r#""txHash": "{}""#, hash));
        let record: InteractionRecord = serde_json::from_str(&with_hash).unwrap();
        assert_eq!(record.tx_hash, Some(H256::repeat_byte(0xab)));
    }

    #[test]
    fn test_explorer_link() {
        let record = InteractionRecord::new(Address::zero(), ActionType::Approve, "");
        assert!(record.explorer_link().is_none());

        let record = record.with_tx_hash(H256::repeat_byte(0xab));
        assert_eq!(
            record.explorer_link().unwrap(),
            format!("https://sepolia.etherscan.io/tx/0x{}", "ab".repeat(32))
        );
    }
}
