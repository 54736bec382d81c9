//! History handlers for BrandMeld CLI

use crate::backend::Storage;
use crate::browse_tui::{self, BrowseOutcome};
use crate::cli::args::*;
use crate::cli::CliApp;
use crate::error::{Error, Result};
use crate::history::{preview_text, HistoryItem, HistoryStore};
use crate::session::Workspace;
use crate::types::HistoryId;
use std::io::{self, Write};

/// Characters of voice and request shown per list entry
const FIELD_PREVIEW_CHARS: usize = 60;

pub fn handle_history(app: &mut CliApp, args: &HistoryArgs) -> Result<()> {
    let mut store = HistoryStore::initialize(app.open_storage()?)?;

    match &args.action {
        HistoryCommand::List(list) => list_history(app, &store, list),
        HistoryCommand::Show(show) => {
            let item = find(&store, show.id)?;
            print_item(item);
            Ok(())
        }
        HistoryCommand::Load(load) => load_into_workspace(app, store, load.id),
        HistoryCommand::Clear(clear) => clear_history(app, &mut store, clear.force),
        HistoryCommand::Browse => browse(app, store),
        HistoryCommand::Export(export) => {
            let json = serde_json::to_string_pretty(store.items())?;
            if let Some(path) = &export.output {
                std::fs::write(path, json)?;
                if !app.quiet {
                    println!("Exported {} sessions to {}", store.len(), path.display());
                }
            } else {
                println!("{}", json);
            }
            Ok(())
        }
    }
}

fn find<S: Storage>(store: &HistoryStore<S>, id: HistoryId) -> Result<&HistoryItem> {
    store
        .load(id)
        .ok_or(Error::HistoryItemNotFound { id: id.as_i64() })
}

fn list_history<S: Storage>(
    app: &CliApp,
    store: &HistoryStore<S>,
    args: &HistoryListArgs,
) -> Result<()> {
    if store.is_empty() {
        if !app.quiet {
            println!("No history yet");
            println!("Your generated content will appear here.");
        }
        return Ok(());
    }

    let preview_chars = args.preview.unwrap_or(app.config.display.preview_chars);
    for item in store.items().iter().take(args.limit) {
        println!("{}  {}", item.id, item.formatted_timestamp());
        println!(
            "  Voice:   {}",
            preview_text(&item.brand_voice, FIELD_PREVIEW_CHARS)
        );
        println!(
            "  Request: {}",
            preview_text(&item.content_request, FIELD_PREVIEW_CHARS)
        );
        println!("  {}", item.preview(preview_chars));
        println!();
    }

    if !app.quiet {
        println!("{} of {} sessions", store.len().min(args.limit), store.len());
    }

    Ok(())
}

fn print_item(item: &HistoryItem) {
    println!("Id: {}", item.id);
    println!("Created: {}", item.formatted_timestamp());
    println!("\n## Brand voice\n\n{}", item.brand_voice);
    println!("\n## Request\n\n{}", item.content_request);
    println!("\n## Generated content\n\n{}", item.generated_content);
}

fn load_into_workspace<S: Storage>(
    app: &CliApp,
    store: HistoryStore<S>,
    id: HistoryId,
) -> Result<()> {
    let item = find(&store, id)?.clone();
    let mut storage = store.into_storage();

    let mut workspace = Workspace::load(&mut storage)?;
    workspace.restore(&item);
    workspace.save(&mut storage)?;

    if !app.quiet {
        println!("Loaded session {} into the workspace", item.id);
    }
    app.verbose_println(&format!("Request: {}", item.content_request));

    Ok(())
}

fn clear_history<S: Storage>(app: &CliApp, store: &mut HistoryStore<S>, force: bool) -> Result<()> {
    if !force {
        print!(
            "Are you sure you want to clear {} sessions? (y/N): ",
            store.len()
        );
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted");
            return Ok(());
        }
    }

    store.clear()?;

    if !app.quiet {
        println!("History cleared successfully");
    }

    Ok(())
}

fn browse<S: Storage>(app: &CliApp, mut store: HistoryStore<S>) -> Result<()> {
    if store.is_empty() {
        println!("No history yet");
        return Ok(());
    }

    let outcome =
        browse_tui::run_history_browser(store.items().to_vec(), app.config.display.preview_chars)?;

    match outcome {
        BrowseOutcome::Load(id) => load_into_workspace(app, store, id),
        BrowseOutcome::Clear => clear_history(app, &mut store, true),
        BrowseOutcome::Quit => Ok(()),
    }
}
