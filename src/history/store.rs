//! Persistence for interaction logs, one entry per wallet

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ethers::types::Address;

use crate::models::InteractionRecord;
use crate::utils::{Result, SwapError};

/// Storage key for a wallet: `wallet_interactions_<lowercased address>`
pub fn storage_key(address: Address) -> String {
    format!("wallet_interactions_{:?}", address)
}

/// Key-value backend holding each wallet's records
pub trait InteractionStore: Send + Sync {
    /// Stored records, or `None` when the key was never written
    fn load(&self, key: &str) -> Result<Option<Vec<InteractionRecord>>>;

    fn save(&self, key: &str, records: &[InteractionRecord]) -> Result<()>;
}

/// One pretty-printed JSON array per key, `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl InteractionStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Vec<InteractionRecord>>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            SwapError::StorageError(format!("Failed to read interactions file {:?}: {}", path, e))
        })?;
        let entries: Vec<serde_json::Value> = serde_json::from_str(&contents)?;
        let total = entries.len();
        let records: Vec<InteractionRecord> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping unreadable interaction in {:?}: {}", path, e);
                    None
                }
            })
            .collect();
        tracing::debug!("Loaded {} of {} interactions from {:?}", records.len(), total, path);
        Ok(Some(records))
    }

    fn save(&self, key: &str, records: &[InteractionRecord]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SwapError::StorageError(format!("Failed to create interactions directory {:?}: {}", self.dir, e))
        })?;

        let path = self.path_for(key);
        let data = serde_json::to_vec_pretty(records)?;
        fs::write(&path, data)?;
        tracing::debug!("Saved {} interactions to {:?}", records.len(), path);
        Ok(())
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<InteractionRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InteractionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<InteractionRecord>>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| SwapError::StorageError("memory store poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, records: &[InteractionRecord]) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| SwapError::StorageError("memory store poisoned".to_string()))?;
        entries.insert(key.to_string(), records.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActionType;
    use tempfile::TempDir;

    #[test]
    fn test_storage_key_is_lowercase() {
        let addr: Address = "0x957d727337297b649AE8df9Cad0b157cf04C3224".parse().unwrap();
        assert_eq!(
            storage_key(addr),
            "wallet_interactions_0x957d727337297b649ae8df9cad0b157cf04c3224"
        );
    }

    #[test]
    fn test_json_file_store() -> Result<()> {
        let temp = TempDir::new()?;
        let store = JsonFileStore::new(temp.path().join("nested"));
        assert!(store.load("wallet_interactions_0xabc")?.is_none());

        let records = vec![InteractionRecord::new(Address::zero(), ActionType::Approve, "1.00 Token A")];
        store.save("wallet_interactions_0xabc", &records)?;

        assert!(store.path_for("wallet_interactions_0xabc").exists());
        assert_eq!(store.load("wallet_interactions_0xabc")?, Some(records));
        Ok(())
    }

    #[test]
    fn test_json_file_store_skips_bad_entries() -> Result<()> {
        let temp = TempDir::new()?;
        let store = JsonFileStore::new(temp.path());
        let good = InteractionRecord::new(Address::zero(), ActionType::Swap, "1.00 Token A → 0.99 Token B");
        let contents = format!("[{}, {{\"actionType\": \"teleport\"}}]", serde_json::to_string(&good)?);
        fs::write(store.path_for("mixed"), contents)?;

        assert_eq!(store.load("mixed")?, Some(vec![good]));
        Ok(())
    }

    #[test]
    fn test_json_file_store_corrupt_file() -> Result<()> {
        let temp = TempDir::new()?;
        let store = JsonFileStore::new(temp.path());
        fs::write(store.path_for("broken"), "{ not json")?;
        assert!(matches!(store.load("broken"), Err(SwapError::JsonError(_))));
        Ok(())
    }

    #[test]
    fn test_memory_store() -> Result<()> {
        let store = MemoryStore::new();
        assert!(store.load("k")?.is_none());
        store.save("k", &[])?;
        assert_eq!(store.load("k")?, Some(Vec::new()));
        Ok(())
    }
}
