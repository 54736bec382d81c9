//! Command handler implementations for BrandMeld CLI
//!
//! This module organizes command handlers into logical groups:
//! - `generate`: Calls to the generation service (generate, analyze, audit)
//! - `history`: Listing, loading, browsing, and clearing past sessions
//! - `config`: Configuration, templates, identity, and status

mod config;
mod generate;
mod history;

pub use config::*;
pub use generate::*;
pub use history::*;
