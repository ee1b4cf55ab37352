//! vellum - send notes from a markdown vault to a Kindle as PDF

pub mod cli;
pub mod domain;
pub mod embed;
pub mod export;
pub mod infra;
pub mod vault;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Command, ConfigCommand,
    config::Config,
    handlers::{
        handle_completions, handle_config_path, handle_config_show, handle_preview, handle_send,
    },
};

/// Main entry point for the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Completions(args) = &cli.command {
        return handle_completions(args);
    }

    let config = Config::load()?;
    let vault_dir = config.vault_dir(cli.dir.as_ref());

    match &cli.command {
        Command::Send(args) => handle_send(args, &vault_dir, &config).await,
        Command::Preview(args) => handle_preview(args, &vault_dir, &config).await,
        Command::Config(ConfigCommand::Show(args)) => handle_config_show(args.format, &config),
        Command::Config(ConfigCommand::Path) => handle_config_path(),
        Command::Completions(args) => handle_completions(args),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "vellum=warn",
        1 => "vellum=info",
        2 => "vellum=debug",
        _ => "vellum=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(0), "vellum=warn");
        assert_eq!(default_directive(1), "vellum=info");
        assert_eq!(default_directive(2), "vellum=debug");
        assert_eq!(default_directive(7), "vellum=trace");
    }
}
