pub mod contracts;
pub mod config;
pub mod events;
pub mod history;

pub mod core;
pub mod models;
pub mod amm;
pub mod blockchain;
pub mod utils;

pub use crate::core::{Exchange, PoolReader, SimpleSwapApp, TxReport};
pub use crate::config::Settings;
pub use crate::history::{InteractionLog, InteractionStore, JsonFileStore, MemoryStore};
pub use crate::models::{ActionType, InteractionRecord, Notice, SwapDirection, TokenSide};
pub use crate::utils::{Result, SwapError};
