//! Per-wallet interaction history
//!
//! Newest first, capped at `MAX_INTERACTIONS`, deduplicated by transaction
//! hash and written through to an `InteractionStore` after every change.

mod render;
mod store;

pub use render::{format_amount_columns, render_interactions, render_record};
pub use store::{storage_key, InteractionStore, JsonFileStore, MemoryStore};

use std::collections::HashSet;

use ethers::types::Address;

use crate::models::InteractionRecord;

/// Maximum number of interactions kept per wallet
pub const MAX_INTERACTIONS: usize = 50;

pub struct InteractionLog {
    store: Box<dyn InteractionStore>,
    wallet: Option<Address>,
    records: Vec<InteractionRecord>,
}

impl InteractionLog {
    pub fn new(store: Box<dyn InteractionStore>) -> Self {
        Self {
            store,
            wallet: None,
            records: Vec::new(),
        }
    }

    /// Switch to `wallet` and load its stored records.
    ///
    /// Unreadable storage starts the wallet with an empty log.
    pub fn load(&mut self, wallet: Address) -> &[InteractionRecord] {
        self.records.clear();
        self.wallet = Some(wallet);

        match self.store.load(&storage_key(wallet)) {
            Ok(Some(records)) => {
                let mut seen = HashSet::new();
                self.records = records
                    .into_iter()
                    .filter(|r| r.tx_hash.map_or(true, |hash| seen.insert(hash)))
                    .take(MAX_INTERACTIONS)
                    .collect();
            }
            Ok(None) => {}
            Err(e) => tracing::error!("Error loading interactions for {:?}: {}", wallet, e),
        }

        tracing::debug!("Loaded {} interactions for {:?}", self.records.len(), wallet);
        &self.records
    }

    /// Forget the current wallet. Stored records are kept.
    pub fn clear(&mut self) {
        self.wallet = None;
        self.records.clear();
    }

    /// Add a record at the front.
    ///
    /// Returns `false` when no wallet is loaded or the transaction hash is
    /// already present.
    pub fn add(&mut self, record: InteractionRecord) -> bool {
        let Some(wallet) = self.wallet else {
            tracing::debug!("Skipping interaction - no wallet connected");
            return false;
        };

        if let Some(hash) = record.tx_hash {
            if self.contains_tx(hash) {
                tracing::debug!("Skipping duplicate interaction for txHash: {:?}", hash);
                return false;
            }
        }

        self.records.insert(0, record);
        self.records.truncate(MAX_INTERACTIONS);
        self.persist(wallet);
        true
    }

    /// Add several records in order, oldest first. Returns how many were new.
    pub fn extend(&mut self, records: impl IntoIterator<Item = InteractionRecord>) -> usize {
        let mut added = 0;
        for record in records {
            if self.add(record) {
                added += 1;
            }
        }
        added
    }

    pub fn contains_tx(&self, hash: ethers::types::H256) -> bool {
        self.records.iter().any(|r| r.tx_hash == Some(hash))
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn wallet(&self) -> Option<Address> {
        self.wallet
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist(&self, wallet: Address) {
        if let Err(e) = self.store.save(&storage_key(wallet), &self.records) {
            tracing::error!("Error saving interactions for {:?}: {}", wallet, e);
        }
    }
}

impl std::fmt::Debug for InteractionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionLog")
            .field("wallet", &self.wallet)
            .field("records", &self.records.len())
            .finish()
    }
}
