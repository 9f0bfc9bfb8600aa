pub mod traits;
pub mod exchange;
pub mod quotes;
pub mod app;

pub use traits::PoolReader;
pub use exchange::Exchange;
pub use app::{SimpleSwapApp, TxReport};
