pub mod errors;
pub mod format;

pub use errors::{SwapError, Result};
