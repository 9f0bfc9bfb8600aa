use clap::{Parser, Subcommand, ValueEnum};
use simpleswap_client::amm::SwapQuote;
use simpleswap_client::config::Settings;
use simpleswap_client::models::{Notice, SwapDirection, TokenSide};
use simpleswap_client::utils::format::{format_balance, truncate_address};
use simpleswap_client::{Result, SimpleSwapApp};
use std::path::PathBuf;

/// SimpleSwap client - swap and provide liquidity on the TACC/TBCC pool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-RPC endpoint
    #[arg(short, long, env = "SIMPLESWAP_RPC_URL")]
    rpc: Option<String>,

    /// Private key of the account to use
    #[arg(long, env = "SIMPLESWAP_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Directory for stored interaction history
    #[arg(long, env = "SIMPLESWAP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Expected chain id
    #[arg(long, env = "SIMPLESWAP_CHAIN_ID")]
    chain_id: Option<u64>,

    /// JSON settings file
    #[arg(short, long, env = "SIMPLESWAP_CONFIG")]
    config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect and show balances
    Status,
    /// Reserves, prices and LP supply
    Pool,
    /// Preview a swap
    Quote {
        #[arg(value_enum)]
        from: Token,
        amount: String,
    },
    /// Check whether a swap can go ahead, approving the input token if needed
    Approve {
        #[arg(value_enum)]
        from: Token,
        amount: String,
    },
    /// Approve both tokens for the exchange
    ApproveAll,
    /// Mint test tokens from the faucet
    Mint {
        #[arg(value_enum)]
        token: Token,
    },
    /// Swap an exact amount of one token for the other
    Swap {
        #[arg(value_enum)]
        from: Token,
        amount: String,
    },
    /// Add liquidity at the current pool ratio
    AddLiquidity { amount_a: String, amount_b: String },
    /// Counterpart amount for one side of a liquidity deposit
    Autofill {
        #[arg(value_enum)]
        token: Token,
        amount: String,
    },
    /// Preview the tokens returned for burning LP tokens
    PreviewRemove { liquidity: String },
    /// Burn LP tokens
    RemoveLiquidity { liquidity: String },
    /// Show stored interactions
    History,
    /// Import recent exchange events into the history
    LoadEvents {
        /// Number of blocks to scan back from the latest
        #[arg(long)]
        blocks: Option<u64>,
    },
    /// Follow new exchange events until interrupted
    Watch,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Token {
    A,
    B,
}

impl Command {
    /// Banner prefix when the command fails
    fn error_context(&self) -> &'static str {
        match self {
            Command::Status | Command::Pool => "Error loading data",
            Command::Quote { .. } => "Error calculating swap",
            Command::Approve { .. } => "Error approving token",
            Command::ApproveAll => "Error approving tokens",
            Command::Mint { .. } => "Error minting tokens",
            Command::Swap { .. } => "Error executing swap",
            Command::AddLiquidity { .. } | Command::Autofill { .. } => "Error adding liquidity",
            Command::PreviewRemove { .. } | Command::RemoveLiquidity { .. } => "Error removing liquidity",
            Command::History | Command::LoadEvents { .. } => "Error loading interactions",
            Command::Watch => "Error watching events",
        }
    }
}

impl From<Token> for TokenSide {
    fn from(token: Token) -> Self {
        match token {
            Token::A => TokenSide::A,
            Token::B => TokenSide::B,
        }
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    if let Some(rpc) = &args.rpc {
        settings.rpc_url = rpc.clone();
    }
    if let Some(chain_id) = args.chain_id {
        settings.chain_id = chain_id;
    }
    if let Some(dir) = &args.data_dir {
        settings = settings.with_data_dir(dir.clone());
    }
    Ok(settings.with_private_key(args.private_key.clone()))
}

fn print_quote(quote: &Option<SwapQuote>) {
    match quote {
        Some(quote) => println!("{}", quote),
        None => println!("{}", Notice::info("Enter an amount to see a quote")),
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = load_settings(&args)?;
    tracing::debug!("Settings: {:?}", settings);

    let mut app = SimpleSwapApp::with_file_store(settings);

    println!("\n🔁 SimpleSwap");
    println!("================================\n");

    let address = app.connect().await?;
    println!("✅ Connected: {}\n", truncate_address(address));

    match args.command {
        Command::Status => {
            println!("{}", app.balances().await?);
            println!("\n{}", app.pool_snapshot().await?.price_line());
        }
        Command::Pool => {
            println!("{}", app.pool_snapshot().await?);
        }
        Command::Quote { from, amount } => {
            let direction = SwapDirection::from_side(from.into());
            print_quote(&app.calculate_swap(direction, &amount).await?);
        }
        Command::Approve { from, amount } => {
            let direction = SwapDirection::from_side(from.into());
            let status = app.check_approval(direction, &amount).await?;
            if !status.has_balance {
                let message = format!("Insufficient balance: have {}", format_balance(status.balance));
                println!("{}", Notice::error(message));
            }
            if status.needs_approval {
                println!("{}", app.approve_for_swap(direction).await?);
            } else {
                println!("{}", Notice::info("Token already approved"));
            }
        }
        Command::ApproveAll => {
            println!("{}", app.approve_all().await?);
        }
        Command::Mint { token } => {
            println!("{}", app.mint(token.into()).await?);
            println!("\n{}", app.balances().await?);
        }
        Command::Swap { from, amount } => {
            let direction = SwapDirection::from_side(from.into());
            print_quote(&app.calculate_swap(direction, &amount).await?);
            println!();
            println!("{}", app.execute_swap(direction, &amount).await?);
            println!("\n{}", app.balances().await?);
        }
        Command::AddLiquidity { amount_a, amount_b } => {
            println!("{}", app.add_liquidity(&amount_a, &amount_b).await?);
            println!("\n{}", app.balances().await?);
        }
        Command::Autofill { token, amount } => {
            let side: TokenSide = token.into();
            match app.autofill(side, &amount).await? {
                Some(other) => println!("{}: {}", side.other(), format_balance(other)),
                None => println!("{}", Notice::info("No liquidity in pool, any ratio is accepted")),
            }
        }
        Command::PreviewRemove { liquidity } => match app.preview_remove(&liquidity).await? {
            Some(preview) => println!("{}", preview),
            None => println!("{}", Notice::info("Nothing to remove")),
        },
        Command::RemoveLiquidity { liquidity } => {
            println!("{}", app.remove_liquidity(&liquidity).await?);
            println!("\n{}", app.balances().await?);
        }
        Command::History => {
            println!("{}", app.render_history());
        }
        Command::LoadEvents { blocks } => {
            let added = app.load_event_history(blocks).await?;
            println!("{}", Notice::success(format!("Loaded {} new interactions", added)));
            println!("\n{}", app.render_history());
        }
        Command::Watch => {
            let mut events = app.start_watching()?;
            println!("👂 Watching for exchange events (Ctrl+C to stop)...\n");
            loop {
                tokio::select! {
                    record = events.recv() => match record {
                        Some(record) => {
                            if app.ingest(record) {
                                if let Some(latest) = app.history().first() {
                                    println!("{}", simpleswap_client::history::render_record(latest));
                                }
                                println!("{}", app.pool_snapshot().await?.price_line());
                            }
                        }
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            app.disconnect();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Setup logging
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("simpleswap_client=debug,simpleswap=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("simpleswap_client=info,simpleswap=info")
            .init();
    }

    let context = args.command.error_context();
    if let Err(e) = run(args).await {
        eprintln!("{}", Notice::from_error(context, &e));
        std::process::exit(1);
    }
}
