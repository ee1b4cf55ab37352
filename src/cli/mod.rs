//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// vellum - send vault notes to a Kindle as PDF
#[derive(Parser, Debug)]
#[command(name = "vellum", version, about, long_about = None)]
pub struct Cli {
    /// Vault directory (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export a note to PDF and mail it to your Kindle
    Send(SendArgs),

    /// Assemble a note without sending it
    Preview(PreviewArgs),

    /// Inspect the configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `send` command
#[derive(Parser, Debug)]
pub struct SendArgs {
    /// Note path or name
    pub note: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// What `preview` produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PreviewFormat {
    /// Markdown with every embed inlined
    #[default]
    Markdown,
    /// The complete HTML document
    Html,
    /// The rendered PDF (requires --output)
    Pdf,
}

/// Arguments for the `preview` command
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Note path or name
    pub note: String,

    /// Stage to stop after
    #[arg(long = "as", value_enum, default_value_t = PreviewFormat::Markdown)]
    pub format: PreviewFormat,

    /// Write to a file instead of stdout
    #[arg(short, long, required_if_eq("format", "pdf"))]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show(ConfigShowArgs),

    /// Print the config file location
    Path,
}

/// Arguments for the `config show` command
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
