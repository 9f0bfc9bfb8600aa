pub mod interaction;
pub mod notice;
pub mod pool;

pub use interaction::{ActionType, InteractionRecord};
pub use notice::{Notice, NoticeKind};
pub use pool::{ApprovalStatus, Balances, PoolSnapshot, PriceSource, Prices, Reserves, SwapDirection, TokenSide};
