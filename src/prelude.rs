//! Prelude module for BrandMeld
//!
//! This module re-exports commonly used types and traits to reduce
//! boilerplate imports throughout the codebase.
//!
//! # Usage
//!
//! ```rust
//! use brandmeld::prelude::*;
//! ```

pub use crate::backend::Storage;
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::generation::Generator;
pub use crate::history::{HistoryItem, HistoryStore};
pub use crate::types::HistoryId;

// Re-export commonly used external types
pub use chrono::{DateTime, Utc};
