//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Run and convert API request collections.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about, long_about = None)]
pub struct Cli {
    /// Settings file; defaults to the platform config directory.
    #[arg(long, global = true, env = "COURIER_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a Postman collection and print it.
    Import(ImportArgs),
    /// Send one request and print the result as JSON.
    Send(SendArgs),
}

/// Output of `import`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportFormat {
    /// `.http` text.
    Http,
    /// Nested map keyed by item name.
    Structured,
    /// The collection model with generated ids.
    #[default]
    Model,
}

/// Arguments of `import`.
#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Postman collection JSON file.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    pub format: ImportFormat,

    /// Fail when two siblings share a name (structured format only).
    #[arg(long)]
    pub reject_duplicates: bool,
}

/// Arguments of `send`.
#[derive(clap::Args, Debug)]
pub struct SendArgs {
    /// HTTP method (GET/POST/PUT/DELETE etc.)
    pub method: String,

    /// URL; may contain `{{variables}}`.
    pub url: String,

    /// Header as `Key: Value`; repeatable.
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Body text; sent as JSON when it parses as JSON.
    #[arg(short, long, conflicts_with = "save")]
    pub data: Option<String>,

    /// Postman environment file for `{{variable}}` substitution.
    #[arg(short, long)]
    pub env: Option<PathBuf>,

    /// Stream the response body to this file.
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Timeout in seconds; overrides the settings file.
    #[arg(short, long)]
    pub timeout: Option<u64>,
}
