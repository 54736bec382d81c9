//! Command-line argument structures for BrandMeld

use crate::templates::TemplateKind;
use crate::types::HistoryId;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    /// Brand voice description (defaults to the saved workspace)
    #[arg(short = 'b', long, conflicts_with = "voice_file")]
    pub voice: Option<String>,

    /// Read the brand voice from a file ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub voice_file: Option<PathBuf>,

    /// Content request, or the topic when --template is given
    #[arg(short = 'r', long)]
    pub request: Option<String>,

    /// Start the request from a quick-start template
    #[arg(short = 't', long, value_enum)]
    pub template: Option<TemplateKind>,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Person, company, or URL whose voice to analyze
    #[arg(value_name = "IDENTIFIER")]
    pub identifier: String,

    /// Print the analysis without storing it as the workspace voice
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Args)]
pub struct AuditArgs {
    /// Target brand voice (defaults to the saved audit voice)
    #[arg(short = 'b', long)]
    pub voice: Option<String>,

    /// Content to audit
    #[arg(short = 'C', long, conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read the content to audit from a file ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub content_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryCommand,
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List past sessions, most recent first
    List(HistoryListArgs),
    /// Print one session in full
    Show(HistoryIdArgs),
    /// Copy a session back into the workspace
    Load(HistoryIdArgs),
    /// Delete all sessions
    Clear(ClearArgs),
    /// Browse sessions interactively
    Browse,
    /// Export sessions as JSON
    Export(ExportArgs),
}

#[derive(Args)]
pub struct HistoryListArgs {
    /// Maximum number of sessions to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Characters of content preview per session
    #[arg(long)]
    pub preview: Option<usize>,
}

#[derive(Args)]
pub struct HistoryIdArgs {
    /// Session id as shown by `history list`
    #[arg(value_name = "ID")]
    pub id: HistoryId,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm deletion without prompting
    #[arg(short = 'F', long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (stdout if not specified)
    #[arg(short = 'O', long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Email address
    #[arg(short = 'e', long)]
    pub email: String,

    /// Display name (defaults to the email's local part)
    #[arg(short = 'n', long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Initialize configuration file with defaults
    #[arg(long)]
    pub init: bool,

    /// Validate configuration file
    #[arg(long)]
    pub validate: bool,

    /// Print the configuration file path
    #[arg(long)]
    pub path: bool,
}
