//! Exchange events turned into interaction records
//!
//! `Swap`, `LiquidityAdded` and `LiquidityRemoved` logs are read three ways:
//! from a mined receipt, from a block range (history), and by polling new
//! blocks while a session is connected.

use std::time::Duration;

use ethers::contract::{parse_log, LogMeta};
use ethers::types::{Address, TransactionReceipt, H256};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::JoinHandle;

use crate::contracts::{ISimpleSwapEvents, LiquidityAddedFilter, LiquidityRemovedFilter, SwapFilter};
use crate::core::Exchange;
use crate::models::{ActionType, InteractionRecord};
use crate::utils::format::format_balance;
use crate::utils::{Result, SwapError};

/// Default interval between polls for new events
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(12);

/// Builds interaction records from decoded exchange events
#[derive(Debug, Clone, Copy)]
pub struct EventDecoder {
    account: Address,
    token_a: Address,
}

impl EventDecoder {
    /// `account` owns liquidity records; `token_a` names tokens in swaps
    pub fn new(account: Address, token_a: Address) -> Self {
        Self { account, token_a }
    }

    fn token_label(&self, token: Address) -> &'static str {
        if token == self.token_a {
            "Token A"
        } else {
            "Token B"
        }
    }

    pub fn decode(&self, event: &ISimpleSwapEvents, tx_hash: H256) -> InteractionRecord {
        match event {
            ISimpleSwapEvents::SwapFilter(swap) => self.swap_record(swap),
            ISimpleSwapEvents::LiquidityAddedFilter(added) => self.added_record(added),
            ISimpleSwapEvents::LiquidityRemovedFilter(removed) => self.removed_record(removed),
        }
        .with_tx_hash(tx_hash)
    }

    /// Swaps are attributed to their recipient
    fn swap_record(&self, swap: &SwapFilter) -> InteractionRecord {
        let amount = format!(
            "{} {} → {} {}",
            format_balance(swap.amount_in),
            self.token_label(swap.token_in),
            format_balance(swap.amount_out),
            self.token_label(swap.token_out)
        );
        InteractionRecord::new(swap.to, ActionType::Swap, amount)
    }

    fn added_record(&self, added: &LiquidityAddedFilter) -> InteractionRecord {
        let amount = format!(
            "{} Token A + {} Token B",
            format_balance(added.amount_a),
            format_balance(added.amount_b)
        );
        InteractionRecord::new(self.account, ActionType::AddLiquidity, amount)
    }

    fn removed_record(&self, removed: &LiquidityRemovedFilter) -> InteractionRecord {
        let amount = format!(
            "{} LP → {} Token A + {} Token B",
            format_balance(removed.liquidity),
            format_balance(removed.amount_a),
            format_balance(removed.amount_b)
        );
        InteractionRecord::new(self.account, ActionType::RemoveLiquidity, amount)
    }

    /// Records for the exchange events emitted in a mined transaction.
    ///
    /// Logs from other contracts, and the exchange's own LP `Transfer`
    /// logs, are skipped.
    pub fn from_receipt(&self, receipt: &TransactionReceipt, exchange: Address) -> Vec<InteractionRecord> {
        receipt
            .logs
            .iter()
            .filter(|log| log.address == exchange)
            .filter_map(|log| parse_log::<ISimpleSwapEvents>(log.clone()).ok())
            .map(|event| self.decode(&event, receipt.transaction_hash))
            .collect()
    }
}

/// Exchange events between two blocks (inclusive), oldest first
pub async fn query_events(exchange: &Exchange, from_block: u64, to_block: u64) -> Result<Vec<(ISimpleSwapEvents, LogMeta)>> {
    let contract = exchange.contract();

    let swaps = contract.swap_filter().from_block(from_block).to_block(to_block);
    let added = contract.liquidity_added_filter().from_block(from_block).to_block(to_block);
    let removed = contract.liquidity_removed_filter().from_block(from_block).to_block(to_block);

    let (swaps, added, removed) = futures::try_join!(
        swaps.query_with_meta(),
        added.query_with_meta(),
        removed.query_with_meta()
    )
    .map_err(SwapError::contract)?;

    tracing::info!(
        "📊 Recent events found: {} swaps, {} liquidity added, {} liquidity removed",
        swaps.len(),
        added.len(),
        removed.len()
    );

    let mut events: Vec<(ISimpleSwapEvents, LogMeta)> = swaps
        .into_iter()
        .map(|(e, meta)| (ISimpleSwapEvents::SwapFilter(e), meta))
        .chain(added.into_iter().map(|(e, meta)| (ISimpleSwapEvents::LiquidityAddedFilter(e), meta)))
        .chain(removed.into_iter().map(|(e, meta)| (ISimpleSwapEvents::LiquidityRemovedFilter(e), meta)))
        .collect();

    events.sort_by_key(|(_, meta)| (meta.block_number, meta.log_index));
    Ok(events)
}

/// Interaction records for the events between two blocks, oldest first
pub async fn fetch_recent_events(
    exchange: &Exchange,
    decoder: &EventDecoder,
    from_block: u64,
    to_block: u64,
) -> Result<Vec<InteractionRecord>> {
    tracing::info!("🔍 Fetching contract events from block {} to {}", from_block, to_block);
    let events = query_events(exchange, from_block, to_block).await?;
    Ok(events
        .iter()
        .map(|(event, meta)| decoder.decode(event, meta.transaction_hash))
        .collect())
}

/// Background task polling new blocks for exchange events
#[derive(Debug)]
pub struct EventWatcher {
    handle: JoinHandle<()>,
}

impl EventWatcher {
    /// Start watching from the next block. Records arrive on the returned
    /// channel; the task ends when the receiver is dropped or on `stop`.
    pub fn start(
        exchange: Exchange,
        decoder: EventDecoder,
        poll_interval: Duration,
    ) -> (Self, UnboundedReceiver<InteractionRecord>) {
        let (tx, rx) = unbounded_channel();

        let handle = tokio::spawn(async move {
            tracing::info!("👂 Setting up contract event listeners...");

            let mut next_block = match exchange.latest_block().await {
                Ok(block) => block + 1,
                Err(e) => {
                    tracing::error!("Event watcher could not read the latest block: {}", e);
                    return;
                }
            };

            let mut ticker = tokio::time::interval(poll_interval);
            loop {
                ticker.tick().await;

                let latest = match exchange.latest_block().await {
                    Ok(block) => block,
                    Err(e) => {
                        tracing::warn!("Event poll failed: {}", e);
                        continue;
                    }
                };
                if latest < next_block {
                    continue;
                }

                match fetch_recent_events(&exchange, &decoder, next_block, latest).await {
                    Ok(records) => {
                        for record in records {
                            tracing::info!("{} {} event detected", record.action_type.emoji(), record.action_type);
                            if tx.send(record).is_err() {
                                return;
                            }
                        }
                        next_block = latest + 1;
                    }
                    Err(e) => tracing::warn!("Failed to query events {} to {}: {}", next_block, latest, e),
                }
            }
        });

        (Self { handle }, rx)
    }

    pub fn stop(&self) {
        tracing::info!("Cleaning up contract event listeners...");
        self.handle.abort();
    }
}

impl Drop for EventWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
