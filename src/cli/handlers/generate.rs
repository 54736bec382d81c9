//! Generation, analysis, and audit handlers for BrandMeld CLI

use crate::cli::args::*;
use crate::cli::CliApp;
use crate::backend::Storage;
use crate::error::Result;
use crate::generation::{GeminiClient, Generator};
use crate::session::Session;
use std::io;
use std::path::Path;

/// Resolve a field given inline or as a file path ("-" reads stdin)
pub(crate) fn read_text(inline: Option<&str>, path: Option<&Path>) -> Result<Option<String>> {
    if let Some(text) = inline {
        return Ok(Some(text.to_string()));
    }
    match path {
        Some(p) if p == Path::new("-") => Ok(Some(io::read_to_string(io::stdin())?)),
        Some(p) => Ok(Some(std::fs::read_to_string(p)?)),
        None => Ok(None),
    }
}

fn open_session(app: &CliApp) -> Result<Session<GeminiClient, Box<dyn Storage>>> {
    let generator = GeminiClient::from_config(&app.config.generation)?;
    Session::open(generator, app.open_storage()?)
}

pub fn handle_generate(app: &mut CliApp, args: &GenerateArgs) -> Result<()> {
    let mut session = open_session(app)?;

    let voice = read_text(args.voice.as_deref(), args.voice_file.as_deref())?;
    {
        let workspace = session.workspace_mut();
        if let Some(voice) = voice {
            workspace.brand_voice = voice;
        }
        match (args.template, &args.request) {
            (Some(kind), Some(topic)) => workspace.content_request = kind.with_topic(topic),
            (Some(kind), None) => workspace.apply_template(kind),
            (None, Some(request)) => workspace.content_request = request.clone(),
            (None, None) => {}
        }
    }

    app.verbose_println(&format!(
        "Generating with model {}",
        app.config.generation.model
    ));

    // The workspace is saved whether or not generation succeeds
    let outcome = session
        .generate()
        .map(|item| (item.id, item.generated_content.clone()));
    session.save_workspace()?;
    let (id, content) = outcome?;

    println!("{}", content);
    if !app.quiet {
        eprintln!("\nSaved to history as {}", id);
    }

    Ok(())
}

pub fn handle_analyze(app: &mut CliApp, args: &AnalyzeArgs) -> Result<()> {
    let mut session = open_session(app)?;

    app.verbose_println(&format!("Analyzing voice of {}", args.identifier));

    if !analyze_into_workspace(&mut session, &args.identifier, !args.no_save)? {
        if !app.quiet {
            println!("Nothing to analyze");
        }
        return Ok(());
    }

    println!("{}", session.workspace().brand_voice);
    if !args.no_save && !app.quiet {
        eprintln!("\nBrand voice saved to workspace");
    }

    Ok(())
}

/// Run a voice analysis and optionally persist the resulting voice field
///
/// A failed analysis is saved too, so the workspace shows the error text
/// in place of the voice.
fn analyze_into_workspace<G: Generator, S: Storage>(
    session: &mut Session<G, S>,
    identifier: &str,
    save: bool,
) -> Result<bool> {
    let analyzed = session.analyze_voice(identifier);
    if save && !matches!(analyzed, Ok(false)) {
        session.save_workspace()?;
    }
    analyzed
}

pub fn handle_audit(app: &mut CliApp, args: &AuditArgs) -> Result<()> {
    let mut session = open_session(app)?;

    let content = read_text(args.content.as_deref(), args.content_file.as_deref())?;
    {
        let workspace = session.workspace_mut();
        if let Some(voice) = &args.voice {
            workspace.audit_brand_voice = voice.clone();
        }
        if let Some(content) = content {
            workspace.content_to_audit = content;
        }
    }

    app.verbose_println("Auditing content");

    let outcome = session.audit().map(str::to_string);
    session.save_workspace()?;
    println!("{}", outcome?);

    Ok(())
}
