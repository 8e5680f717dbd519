//! # kindling-history
//!
//! Append-only history of selected prompts (SQLite-backed), plus the
//! in-memory window each composer run reads cooldowns and novelty from.

pub mod record;
pub mod store;
pub mod window;

pub use record::{HistoryColumn, HistoryRecord};
pub use store::HistoryStore;
pub use window::HistoryWindow;
