//! Handler for the `send` command.

use std::path::Path;

use anyhow::Result;

use crate::cli::config::Config;
use crate::cli::output::{Output, OutputFormat};
use crate::cli::SendArgs;
use crate::export::{ExportReceipt, Exporter, NoopReporter, SmtpMailer};

use super::{ConsoleReporter, document_path, open_vault};

/// Handle the `send` command.
pub async fn handle_send(args: &SendArgs, vault_dir: &Path, config: &Config) -> Result<()> {
    let vault = open_vault(vault_dir)?;
    let path = document_path(&vault, &args.note);

    let exporter = Exporter::new(&vault, config.renderer(), SmtpMailer)
        .with_options(config.transform_options())
        .with_settings(config.delivery_settings());

    let receipt = match args.format {
        OutputFormat::Human => exporter.export(&path, &mut ConsoleReporter::stderr()).await?,
        OutputFormat::Json => exporter.export(&path, &mut NoopReporter).await?,
    };

    print_receipt(&receipt, args.format)
}

fn print_receipt(receipt: &ExportReceipt, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            println!(
                "Sent {} to {} ({} bytes)",
                receipt.filename, receipt.recipient, receipt.bytes
            );
        }
        OutputFormat::Json => {
            println!("{}", Output::new(receipt).to_json()?);
        }
    }
    Ok(())
}
