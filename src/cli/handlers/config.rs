//! Configuration, identity, and status handlers for BrandMeld CLI

use crate::cli::args::*;
use crate::cli::CliApp;
use crate::config::Config;
use crate::error::Result;
use crate::history::HistoryStore;
use crate::identity::IdentityStore;
use crate::templates::TemplateKind;

pub fn handle_config(app: &mut CliApp, args: &ConfigArgs) -> Result<()> {
    let config_path = match &app.config_path {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };

    if args.show {
        let config_json = serde_json::to_string_pretty(&app.config)?;
        println!("{}", config_json);
    } else if args.init {
        let config = Config::default();
        config.save_to_path(&config_path)?;
        println!("Configuration initialized at {}", config_path.display());
    } else if args.validate {
        match app.config.validate() {
            Ok(_) => println!("Configuration is valid"),
            Err(e) => println!("Configuration validation failed: {}", e),
        }
    } else if args.path {
        println!("{}", config_path.display());
    } else {
        println!("Use --show, --init, --validate, or --path");
    }

    Ok(())
}

pub fn handle_templates(_app: &mut CliApp) -> Result<()> {
    for kind in TemplateKind::ALL {
        let name = clap::ValueEnum::to_possible_value(&kind)
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        println!("{:<10} {:<15} {}", name, kind.label(), kind.request());
    }
    Ok(())
}

pub fn handle_login(app: &mut CliApp, args: &LoginArgs) -> Result<()> {
    let mut storage = app.open_storage()?;
    let user = IdentityStore::sign_in(&mut storage, &args.email, args.name.as_deref())?;
    if !app.quiet {
        println!("Signed in as {} <{}>", user.name, user.email);
    }
    Ok(())
}

pub fn handle_logout(app: &mut CliApp) -> Result<()> {
    let mut storage = app.open_storage()?;
    IdentityStore::clear(&mut storage)?;
    if !app.quiet {
        println!("Signed out");
    }
    Ok(())
}

pub fn handle_whoami(app: &mut CliApp) -> Result<()> {
    let mut storage = app.open_storage()?;
    match IdentityStore::load(&mut storage)? {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not signed in"),
    }
    Ok(())
}

pub fn handle_status(app: &mut CliApp) -> Result<()> {
    println!("BrandMeld Status");
    println!("================\n");

    let store = HistoryStore::initialize(app.open_storage()?)?;
    println!("Backend: {}", store.storage().name());
    match app.backend {
        crate::config::StorageBackend::File => {
            println!("Storage: {}", app.config.data_dir.display())
        }
        crate::config::StorageBackend::Sqlite => {
            println!("Storage: {}", app.config.database_path().display())
        }
    }

    println!(
        "\nHistory: {} of {} sessions",
        store.len(),
        crate::history::HISTORY_CAPACITY
    );
    if let Some(latest) = store.latest() {
        println!("  Latest: {} ({})", latest.formatted_timestamp(), latest.id);
    }

    println!("\nGeneration:");
    println!("  Model: {}", app.config.generation.model);
    println!("  Endpoint: {}", app.config.generation.base_url);
    let key_set = std::env::var(&app.config.generation.api_key_env)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);
    println!(
        "  API key ({}): {}",
        app.config.generation.api_key_env,
        if key_set { "set" } else { "not set" }
    );

    let mut storage = store.into_storage();
    match IdentityStore::load(&mut storage)? {
        Some(user) => println!("\nSigned in as {} <{}>", user.name, user.email),
        None => println!("\nNot signed in"),
    }

    Ok(())
}
