//! BrandMeld - write and audit content in your brand voice
//!
//! This is the main entry point for the BrandMeld command-line application.
//! It loads configuration, initializes logging, and handles errors gracefully.

use brandmeld::cli::{Cli, CliApp};
use clap::Parser;
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    let mut app = match CliApp::new(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(app.log_level()));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Run the application and handle errors
    if let Err(e) = app.run(&cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
