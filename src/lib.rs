//! BrandMeld - write and audit content in your brand voice
//!
//! This library provides functionality for:
//! - Generating content in a described brand voice through a hosted model
//! - Deriving a brand voice from a person, company, or URL
//! - Auditing drafts against a brand voice
//! - Keeping a bounded, persisted history of past generation sessions
//!
//! # Examples
//!
//! ```rust
//! use brandmeld::backend::MemoryStorage;
//! use brandmeld::HistoryStore;
//!
//! let mut history = HistoryStore::initialize(MemoryStorage::new())?;
//! history.record("Playful and witty", "A tweet about Mondays", "Mondays, am I right?")?;
//! assert_eq!(history.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::PathBuf;

pub mod backend;
pub mod browse_tui;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod file_store;
pub mod generation;
pub mod history;
pub mod identity;
pub mod prelude;
pub mod session;
pub mod templates;
pub mod types;

pub use backend::Storage;
pub use config::Config;
pub use error::{Error, Result};
pub use generation::{GeminiClient, Generator};
pub use history::{HistoryItem, HistoryStore, HISTORY_CAPACITY};
pub use session::{Session, Workspace};

/// Directory name for stored state under the platform data directory
pub const DATA_DIR_NAME: &str = "brandmeld";

/// Get the default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(home::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(DATA_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_dir() {
        let path = default_data_dir();
        assert!(path.ends_with(DATA_DIR_NAME));
    }
}
