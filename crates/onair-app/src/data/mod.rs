//! Data persistence
//!
//! JSON storage helpers and the play history log.

pub mod history;
pub mod storage;

pub use history::{HistoryEntry, HistoryLog, HistoryStore, RecordOutcome};
pub use storage::{config_dir, data_path, load_from, save_to};
