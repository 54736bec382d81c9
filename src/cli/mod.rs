//! Command-line interface module for BrandMeld
//!
//! This module is organized into submodules:
//! - `args`: Command-line argument structures
//! - `handlers`: Command handler implementations

mod args;
mod handlers;

pub use args::*;
use handlers::*;

use crate::backend::Storage;
use crate::config::{Config, StorageBackend};
use crate::database::SqliteStorage;
use crate::error::Result;
use crate::file_store::FileStorage;
use clap::{Parser, Subcommand};

use std::path::PathBuf;

/// BrandMeld - write and audit content in your brand voice
#[derive(Parser)]
#[command(name = "brandmeld")]
#[command(about = "Write and audit content in your brand voice")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Override the configured storage backend
    #[arg(long, global = true, value_enum)]
    pub backend: Option<StorageBackend>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate content in the brand voice
    Generate(GenerateArgs),
    /// Derive a brand voice from a person, company, or URL
    Analyze(AnalyzeArgs),
    /// Check content against a brand voice
    Audit(AuditArgs),
    /// Manage past sessions
    History(HistoryArgs),
    /// List quick-start templates
    Templates,
    /// Record who is using this workspace
    Login(LoginArgs),
    /// Forget the signed-in user
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show configuration
    Config(ConfigArgs),
    /// Show storage and service status
    Status,
}

/// Main CLI application
pub struct CliApp {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub backend: StorageBackend,
    pub verbose: bool,
    pub quiet: bool,
}

impl CliApp {
    /// Create a new CLI application
    pub fn new(cli: &Cli) -> Result<Self> {
        // Load configuration
        let config = if let Some(config_path) = &cli.config {
            Config::load_from_path(config_path)?
        } else {
            Config::load()?
        };

        let backend = cli.backend.unwrap_or(config.storage.backend);

        Ok(Self {
            config,
            config_path: cli.config.clone(),
            backend,
            verbose: cli.verbose,
            quiet: cli.quiet,
        })
    }

    /// Open the configured storage backend
    pub fn open_storage(&self) -> Result<Box<dyn Storage>> {
        let storage: Box<dyn Storage> = match self.backend {
            StorageBackend::File => Box::new(FileStorage::new(&self.config.data_dir)?),
            StorageBackend::Sqlite => Box::new(SqliteStorage::open(&self.config.database_path())?),
        };
        self.verbose_println(&format!("Using {} storage backend", storage.name()));
        Ok(storage)
    }

    /// Run the CLI application
    pub fn run(&mut self, command: &Commands) -> Result<()> {
        match command {
            Commands::Generate(args) => handle_generate(self, args),
            Commands::Analyze(args) => handle_analyze(self, args),
            Commands::Audit(args) => handle_audit(self, args),
            Commands::History(args) => handle_history(self, args),
            Commands::Templates => handle_templates(self),
            Commands::Login(args) => handle_login(self, args),
            Commands::Logout => handle_logout(self),
            Commands::Whoami => handle_whoami(self),
            Commands::Config(args) => handle_config(self, args),
            Commands::Status => handle_status(self),
        }
    }

    /// Log level used when RUST_LOG is not set
    pub fn log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.config.logging.level
        }
    }

    pub fn verbose_println(&self, message: &str) {
        if self.verbose && !self.quiet {
            eprintln!("[verbose] {}", message);
        }
    }
}
