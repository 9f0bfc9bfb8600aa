//! Session orchestrator
//!
//! `SimpleSwapApp` owns the optional wallet session, the contract façade bound
//! to it and the interaction log, and exposes the user-facing actions. Each
//! action re-reads whatever chain state it depends on; failures are returned
//! to the caller, which turns them into error notices. Nothing is retried.

use std::sync::atomic::AtomicBool;

use ethers::types::{Address, TransactionReceipt, H256, U256};
use tokio::sync::mpsc::UnboundedReceiver;

use super::exchange::{deadline_from_now, Exchange};
use super::quotes;
use super::traits::PoolReader;
use crate::amm::{LiquidityPlan, RemovalPreview, SwapQuote};
use crate::blockchain::{WalletConnector, WalletSession};
use crate::config::Settings;
use crate::contracts::addresses::explorer_tx_link;
use crate::events::{fetch_recent_events, EventDecoder, EventWatcher, DEFAULT_POLL_INTERVAL};
use crate::history::{render_interactions, InteractionLog, InteractionStore, JsonFileStore};
use crate::models::{
    ActionType, ApprovalStatus, Balances, InteractionRecord, Notice, PoolSnapshot, SwapDirection, TokenSide,
};
use crate::utils::format::{format_balance, parse_amount, parse_positive_amount};
use crate::utils::{Result, SwapError};

/// Outcome of a write action: mined transaction hashes plus the banner text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReport {
    pub hashes: Vec<H256>,
    pub message: String,
}

impl TxReport {
    fn new(message: impl Into<String>) -> Self {
        Self {
            hashes: Vec::new(),
            message: message.into(),
        }
    }

    fn with_receipt(mut self, receipt: &TransactionReceipt) -> Self {
        self.hashes.push(receipt.transaction_hash);
        self
    }

    pub fn links(&self) -> Vec<String> {
        self.hashes
            .iter()
            .map(|hash| explorer_tx_link(&format!("{:?}", hash)))
            .collect()
    }

    pub fn notice(&self) -> Notice {
        Notice::success(self.message.clone())
    }
}

impl std::fmt::Display for TxReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notice())?;
        for link in self.links() {
            write!(f, "\n   🔗 {}", link)?;
        }
        Ok(())
    }
}

/// A connected wallet and the contracts bound to its signer
#[derive(Debug)]
struct ActiveSession {
    wallet: WalletSession,
    exchange: Exchange,
}

pub struct SimpleSwapApp {
    settings: Settings,
    connector: WalletConnector,
    session: Option<ActiveSession>,
    log: InteractionLog,
    watcher: Option<EventWatcher>,
    autofilling: AtomicBool,
}

impl SimpleSwapApp {
    pub fn new(settings: Settings, store: Box<dyn InteractionStore>) -> Self {
        Self {
            connector: WalletConnector::from_settings(&settings),
            settings,
            session: None,
            log: InteractionLog::new(store),
            watcher: None,
            autofilling: AtomicBool::new(false),
        }
    }

    /// App whose history lives in JSON files under the settings' data dir
    pub fn with_file_store(settings: Settings) -> Self {
        let store = JsonFileStore::new(settings.interactions_dir());
        Self::new(settings, Box::new(store))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn address(&self) -> Option<Address> {
        self.session.as_ref().map(|s| s.wallet.address())
    }

    fn exchange(&self) -> Result<&Exchange> {
        self.session
            .as_ref()
            .map(|s| &s.exchange)
            .ok_or(SwapError::NotConnected)
    }

    // ----- session -----

    /// Connect the configured account, bind the contracts and load its history
    pub async fn connect(&mut self) -> Result<Address> {
        let wallet = self.connector.connect(self.settings.private_key.as_deref()).await?;
        let exchange = Exchange::new(&wallet, self.settings.contracts);
        let address = wallet.address();

        self.stop_watching();
        self.session = Some(ActiveSession { wallet, exchange });

        let loaded = self.log.load(address).len();
        tracing::info!("📚 Loaded {} stored interactions for {:?}", loaded, address);
        Ok(address)
    }

    /// Drop the session, its bindings and the in-memory log
    pub fn disconnect(&mut self) {
        tracing::info!("🔌 Disconnecting wallet...");
        self.stop_watching();
        self.session = None;
        self.log.clear();
    }

    /// React to an account switch: `None` disconnects, a key reconnects as
    /// that account.
    pub async fn accounts_changed(&mut self, private_key: Option<String>) -> Result<Option<Address>> {
        self.disconnect();
        match private_key {
            None => Ok(None),
            Some(key) => {
                self.settings.private_key = Some(key);
                self.connect().await.map(Some)
            }
        }
    }

    // ----- reads -----

    pub async fn balances(&self) -> Result<Balances> {
        self.exchange()?.balances().await
    }

    /// Reserves, prices and LP supply at the latest block
    pub async fn pool_snapshot(&self) -> Result<PoolSnapshot> {
        let exchange = self.exchange()?;
        tracing::info!("🔄 Updating pool data...");

        let block = exchange.latest_block().await?;
        let reserves = exchange.reserves().await?;
        tracing::debug!("Reserves: {:?}", reserves);

        let prices = quotes::fetch_prices(exchange, &reserves).await;
        let lp_total_supply = exchange.total_supply_at(block).await?;

        Ok(PoolSnapshot {
            block,
            reserves,
            prices,
            lp_total_supply,
        })
    }

    /// Swap preview. `None` for an empty or zero amount.
    pub async fn calculate_swap(&self, direction: SwapDirection, amount: &str) -> Result<Option<SwapQuote>> {
        let exchange = self.exchange()?;
        if amount.trim().is_empty() {
            return Ok(None);
        }
        let amount_in = parse_amount(amount)?;
        if amount_in.is_zero() {
            return Ok(None);
        }
        quotes::quote_swap(exchange, direction, amount_in).await.map(Some)
    }

    pub async fn check_approval(&self, direction: SwapDirection, amount: &str) -> Result<ApprovalStatus> {
        let exchange = self.exchange()?;
        let amount = parse_amount(amount)?;
        let side = direction.token_in();

        let allowance = exchange.allowance(side).await?;
        let balance = exchange.balance_of(side).await?;
        let status = ApprovalStatus::evaluate(amount, allowance, balance);
        tracing::debug!("Approval status for {}: {:?}", side, status);
        Ok(status)
    }

    /// Counterpart amount for the liquidity form, `None` when nothing applies
    /// or another autofill is still running.
    pub async fn autofill(&self, changed: TokenSide, amount: &str) -> Result<Option<U256>> {
        let exchange = self.exchange()?;
        if amount.trim().is_empty() {
            return Ok(None);
        }
        let amount = parse_amount(amount)?;
        quotes::autofill(exchange, &self.autofilling, changed, amount).await
    }

    pub async fn plan_liquidity(&self, amount_a: &str, amount_b: &str) -> Result<LiquidityPlan> {
        let exchange = self.exchange()?;
        let desired_a = parse_positive_amount(amount_a)?;
        let desired_b = parse_positive_amount(amount_b)?;
        quotes::plan_liquidity(exchange, desired_a, desired_b).await
    }

    pub async fn preview_remove(&self, liquidity: &str) -> Result<Option<RemovalPreview>> {
        let exchange = self.exchange()?;
        if liquidity.trim().is_empty() {
            return Ok(None);
        }
        let liquidity = parse_amount(liquidity)?;
        if liquidity.is_zero() {
            return Ok(None);
        }
        quotes::preview_removal(exchange, liquidity).await
    }

    // ----- writes -----

    /// Unlimited approval of the token sold in `direction`
    pub async fn approve_for_swap(&mut self, direction: SwapDirection) -> Result<TxReport> {
        let side = direction.token_in();
        let exchange = self.exchange()?.clone();

        let receipt = exchange.approve(side, U256::MAX).await?;
        self.record_approval(&exchange, side, &receipt);
        Ok(TxReport::new(format!("{} approved successfully!", side)).with_receipt(&receipt))
    }

    /// Unlimited approval of both tokens, one after the other
    pub async fn approve_all(&mut self) -> Result<TxReport> {
        let exchange = self.exchange()?.clone();
        let mut report = TxReport::new("All tokens approved successfully!");

        for side in [TokenSide::A, TokenSide::B] {
            let receipt = exchange.approve(side, U256::MAX).await?;
            self.record_approval(&exchange, side, &receipt);
            report = report.with_receipt(&receipt);
        }
        Ok(report)
    }

    /// Mint the configured faucet amount of one test token to the wallet
    pub async fn mint(&mut self, side: TokenSide) -> Result<TxReport> {
        let exchange = self.exchange()?.clone();
        let amount = parse_positive_amount(&self.settings.mint_amount)?;

        let receipt = exchange.mint(side, amount).await?;
        Ok(TxReport::new(format!("Minted {} {}!", format_balance(amount), side.symbol())).with_receipt(&receipt))
    }

    /// Swap `amount` of the input token, accepting at least 95% of the quote
    pub async fn execute_swap(&mut self, direction: SwapDirection, amount: &str) -> Result<TxReport> {
        let exchange = self.exchange()?.clone();
        let amount_in = parse_positive_amount(amount)?;
        let side = direction.token_in();

        let balance = exchange.balance_of(side).await?;
        let allowance = exchange.allowance(side).await?;
        check_swap_funds(side, amount_in, &ApprovalStatus::evaluate(amount_in, allowance, balance))?;

        let quote = quotes::quote_swap(&exchange, direction, amount_in).await?;
        tracing::info!(
            "Swapping {} {} for at least {} {}",
            format_balance(quote.amount_in),
            side.symbol(),
            format_balance(quote.min_out),
            direction.token_out().symbol()
        );

        let deadline = deadline_from_now(self.settings.deadline_minutes);
        let receipt = exchange
            .swap_exact_tokens_for_tokens(direction, quote.amount_in, quote.min_out, deadline)
            .await?;

        let fallback = InteractionRecord::new(
            exchange.owner(),
            ActionType::Swap,
            format!(
                "{} {} → {} {}",
                format_balance(quote.amount_in),
                side.label(),
                format_balance(quote.amount_out),
                direction.token_out().label()
            ),
        );
        self.record_receipt(&exchange, &receipt, fallback);

        Ok(TxReport::new("Swap successful!").with_receipt(&receipt))
    }

    /// Add liquidity at the pool ratio after checking balances and allowances
    pub async fn add_liquidity(&mut self, amount_a: &str, amount_b: &str) -> Result<TxReport> {
        let exchange = self.exchange()?.clone();
        let desired_a = parse_positive_amount(amount_a)?;
        let desired_b = parse_positive_amount(amount_b)?;

        let plan = quotes::plan_liquidity(&exchange, desired_a, desired_b).await?;
        tracing::debug!("Liquidity plan: {:?}", plan);

        let balances = exchange.balances().await?;
        let allowances = (
            exchange.allowance(TokenSide::A).await?,
            exchange.allowance(TokenSide::B).await?,
        );
        check_liquidity_funds(&plan, &balances, allowances)?;

        let deadline = deadline_from_now(self.settings.deadline_minutes);
        let receipt = exchange.add_liquidity(&plan, deadline).await?;

        let fallback = InteractionRecord::new(
            exchange.owner(),
            ActionType::AddLiquidity,
            format!(
                "{} Token A + {} Token B",
                format_balance(plan.amount_a),
                format_balance(plan.amount_b)
            ),
        );
        self.record_receipt(&exchange, &receipt, fallback);

        let message = if plan.adjusted {
            format!(
                "Liquidity added successfully! Amounts adjusted to pool ratio: {} Token A + {} Token B",
                format_balance(plan.amount_a),
                format_balance(plan.amount_b)
            )
        } else {
            "Liquidity added successfully!".to_string()
        };
        Ok(TxReport::new(message).with_receipt(&receipt))
    }

    /// Burn `liquidity` LP tokens for their share of both reserves
    pub async fn remove_liquidity(&mut self, liquidity: &str) -> Result<TxReport> {
        let exchange = self.exchange()?.clone();
        let liquidity = parse_positive_amount(liquidity)?;

        check_lp_balance(liquidity, exchange.lp_balance().await?)?;

        let preview = quotes::preview_removal(&exchange, liquidity)
            .await?
            .ok_or(SwapError::InsufficientLiquidity)?;
        tracing::debug!("Removal preview: {:?}", preview);

        let deadline = deadline_from_now(self.settings.deadline_minutes);
        let receipt = exchange.remove_liquidity(&preview, deadline).await?;

        let fallback = InteractionRecord::new(
            exchange.owner(),
            ActionType::RemoveLiquidity,
            format!(
                "{} LP → {} Token A + {} Token B",
                format_balance(preview.liquidity),
                format_balance(preview.amount_a),
                format_balance(preview.amount_b)
            ),
        );
        self.record_receipt(&exchange, &receipt, fallback);

        Ok(TxReport::new("Liquidity removed successfully!").with_receipt(&receipt))
    }

    // ----- history -----

    pub fn history(&self) -> &[InteractionRecord] {
        self.log.records()
    }

    pub fn render_history(&self) -> String {
        render_interactions(self.log.records())
    }

    /// Add a record from outside (e.g. the event watcher). `false` when it
    /// was skipped.
    pub fn ingest(&mut self, record: InteractionRecord) -> bool {
        self.log.add(record)
    }

    /// Load exchange events from the last `lookback` blocks (the configured
    /// default when `None`) into the log. Returns how many records were new.
    pub async fn load_event_history(&mut self, lookback: Option<u64>) -> Result<usize> {
        let exchange = self.exchange()?.clone();
        let lookback = lookback.unwrap_or(self.settings.event_lookback_blocks);

        let latest = exchange.latest_block().await?;
        let from_block = latest.saturating_sub(lookback);

        let records = fetch_recent_events(&exchange, &decoder_for(&exchange), from_block, latest).await?;
        let added = self.log.extend(records);
        tracing::info!("📊 Added {} interactions from recent events", added);
        Ok(added)
    }

    /// Start polling for new exchange events. Replaces any running watcher.
    pub fn start_watching(&mut self) -> Result<UnboundedReceiver<InteractionRecord>> {
        let exchange = self.exchange()?.clone();
        self.stop_watching();

        let decoder = decoder_for(&exchange);
        let (watcher, rx) = EventWatcher::start(exchange, decoder, DEFAULT_POLL_INTERVAL);
        self.watcher = Some(watcher);
        Ok(rx)
    }

    pub fn stop_watching(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
    }

    fn record_approval(&mut self, exchange: &Exchange, side: TokenSide, receipt: &TransactionReceipt) {
        let record = InteractionRecord::new(exchange.owner(), ActionType::Approve, format!("unlimited {}", side.label()))
            .with_details(format!("{} approved for the exchange", side.symbol()))
            .with_tx_hash(receipt.transaction_hash);
        self.log.add(record);
    }

    /// Log the exchange events in `receipt`, or `fallback` when it has none
    fn record_receipt(&mut self, exchange: &Exchange, receipt: &TransactionReceipt, fallback: InteractionRecord) {
        let records = decoder_for(exchange).from_receipt(receipt, exchange.addresses().simple_swap);
        if records.is_empty() {
            tracing::debug!("No exchange events in receipt, recording from the preview");
            self.log.add(fallback.with_tx_hash(receipt.transaction_hash));
        } else {
            self.log.extend(records);
        }
    }
}

impl std::fmt::Debug for SimpleSwapApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleSwapApp")
            .field("settings", &self.settings)
            .field("address", &self.address())
            .field("log", &self.log)
            .field("watching", &self.watcher.is_some())
            .finish()
    }
}

/// Refuse a swap the wallet cannot fund or has not approved
fn check_swap_funds(side: TokenSide, amount_in: U256, status: &ApprovalStatus) -> Result<()> {
    if !status.has_balance {
        return Err(SwapError::insufficient_balance(side.label(), amount_in, status.balance));
    }
    if status.needs_approval {
        return Err(SwapError::InsufficientAllowance(side.label().to_string()));
    }
    Ok(())
}

/// Balances are checked before allowances, token A before token B.
/// `allowances` is `(token A, token B)`.
fn check_liquidity_funds(plan: &LiquidityPlan, balances: &Balances, allowances: (U256, U256)) -> Result<()> {
    let sides = [
        (TokenSide::A, plan.amount_a, balances.token_a, allowances.0),
        (TokenSide::B, plan.amount_b, balances.token_b, allowances.1),
    ];

    for (side, needed, balance, _) in sides {
        if balance < needed {
            return Err(SwapError::insufficient_balance(side.label(), needed, balance));
        }
    }
    for (side, needed, _, allowance) in sides {
        if allowance < needed {
            return Err(SwapError::InsufficientAllowance(side.label().to_string()));
        }
    }
    Ok(())
}

fn check_lp_balance(liquidity: U256, lp_balance: U256) -> Result<()> {
    if lp_balance < liquidity {
        return Err(SwapError::InsufficientLiquidity);
    }
    Ok(())
}

fn decoder_for(exchange: &Exchange) -> EventDecoder {
    EventDecoder::new(exchange.owner(), exchange.addresses().token_a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryStore;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    fn app() -> SimpleSwapApp {
        SimpleSwapApp::new(Settings::default(), Box::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_actions_require_connection() {
        let mut app = app();
        assert!(!app.is_connected());
        assert!(app.address().is_none());

        assert!(matches!(app.balances().await, Err(SwapError::NotConnected)));
        assert!(matches!(app.pool_snapshot().await, Err(SwapError::NotConnected)));
        assert!(matches!(
            app.calculate_swap(SwapDirection::AToB, "1").await,
            Err(SwapError::NotConnected)
        ));
        assert!(matches!(app.approve_all().await, Err(SwapError::NotConnected)));
        assert!(matches!(app.remove_liquidity("1").await, Err(SwapError::NotConnected)));
        assert!(matches!(app.start_watching(), Err(SwapError::NotConnected)));
    }

    #[tokio::test]
    async fn test_connect_without_key() {
        let mut app = app();
        let err = app.connect().await.unwrap_err();
        assert!(matches!(err, SwapError::WalletUnavailable(_)));
        assert!(!app.is_connected());
    }

    #[tokio::test]
    async fn test_account_removed_disconnects() {
        let mut app = app();
        assert_eq!(app.accounts_changed(None).await.unwrap(), None);
        assert!(!app.is_connected());
        assert!(app.history().is_empty());
    }

    #[test]
    fn test_ingest_without_wallet_is_skipped() {
        let mut app = app();
        let record = InteractionRecord::new(Address::repeat_byte(1), ActionType::Swap, "1.00 Token A → 0.99 Token B");
        assert!(!app.ingest(record));
        assert!(app.render_history().contains("No interactions yet"));
    }

    #[test]
    fn test_tx_report_display() {
        let report = TxReport::new("Swap successful!").with_receipt(&TransactionReceipt {
            transaction_hash: H256::repeat_byte(0xab),
            ..Default::default()
        });
        let text = report.to_string();
        assert!(text.starts_with("✅ Swap successful!"));
        assert!(text.contains(&format!("https://sepolia.etherscan.io/tx/0x{}", "ab".repeat(32))));
        assert!(!report.notice().is_error());
    }

    #[test]
    fn test_swap_refused_without_balance_or_approval() {
        let short = ApprovalStatus::evaluate(ether(10), U256::MAX, ether(4));
        match check_swap_funds(TokenSide::A, ether(10), &short) {
            Err(SwapError::InsufficientBalance { token, need, have }) => {
                assert_eq!(token, "Token A");
                assert_eq!(need, "10.0");
                assert_eq!(have, "4.0");
            }
            other => panic!("expected insufficient balance, got {:?}", other),
        }

        let unapproved = ApprovalStatus::evaluate(ether(10), ether(9), ether(20));
        let err = check_swap_funds(TokenSide::B, ether(10), &unapproved).unwrap_err();
        assert!(matches!(err, SwapError::InsufficientAllowance(ref token) if token == "Token B"));

        let ready = ApprovalStatus::evaluate(ether(10), ether(10), ether(10));
        assert!(check_swap_funds(TokenSide::A, ether(10), &ready).is_ok());
    }

    #[test]
    fn test_liquidity_checks_use_the_adjusted_plan() {
        // desired 10 A + 50 B against a 1:2 pool becomes 10 A + 20 B
        let plan = crate::amm::plan_add(ether(10), ether(50), &crate::models::Reserves::new(ether(100), ether(200)))
            .unwrap();
        let balances = Balances {
            token_a: ether(10),
            token_b: ether(25),
            lp: U256::zero(),
        };
        assert!(check_liquidity_funds(&plan, &balances, (ether(10), ether(20))).is_ok());

        let low_b = Balances { token_b: ether(19), ..balances };
        match check_liquidity_funds(&plan, &low_b, (U256::MAX, U256::MAX)) {
            Err(SwapError::InsufficientBalance { token, need, .. }) => {
                assert_eq!(token, "Token B");
                assert_eq!(need, "20.0");
            }
            other => panic!("expected insufficient balance, got {:?}", other),
        }

        let err = check_liquidity_funds(&plan, &balances, (ether(10), ether(19))).unwrap_err();
        assert!(matches!(err, SwapError::InsufficientAllowance(ref token) if token == "Token B"));

        // balance shortfalls are reported before missing approvals
        let err = check_liquidity_funds(&plan, &low_b, (U256::zero(), U256::zero())).unwrap_err();
        assert!(matches!(err, SwapError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_lp_balance_check() {
        assert!(check_lp_balance(ether(5), ether(5)).is_ok());
        assert!(matches!(check_lp_balance(ether(6), ether(5)), Err(SwapError::InsufficientLiquidity)));
    }
}
