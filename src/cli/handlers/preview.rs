//! Handler for the `preview` command.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::cli::config::Config;
use crate::cli::{PreviewArgs, PreviewFormat};
use crate::export::{CmarkRenderer, Renderer, assemble, transform};
use crate::vault::DocumentStore;

use super::{document_path, open_vault};

/// Handle the `preview` command.
///
/// Runs the pipeline up to the requested stage and writes the result
/// instead of mailing it. Never takes the export lock.
pub async fn handle_preview(args: &PreviewArgs, vault_dir: &Path, config: &Config) -> Result<()> {
    let vault = open_vault(vault_dir)?;
    let path = document_path(&vault, &args.note);
    let Some(document) = vault.resolve_path(&path) else {
        bail!("Note not found: {}", args.note);
    };
    if !document.is_markdown() {
        bail!("Only markdown notes can be previewed: {}", document);
    }

    let assembled = assemble(&vault, &document)
        .with_context(|| format!("failed to resolve embeds in {}", document))?;

    let bytes = match args.format {
        PreviewFormat::Markdown => assembled.markdown.into_bytes(),
        PreviewFormat::Html | PreviewFormat::Pdf => {
            let html = transform(
                &assembled.markdown,
                &assembled.title,
                &config.transform_options(),
                &CmarkRenderer,
            )?;
            if args.format == PreviewFormat::Html {
                html.html.into_bytes()
            } else {
                config.renderer().render(&html).await?
            }
        }
    };

    match &args.output {
        Some(output) => {
            std::fs::write(output, &bytes)
                .with_context(|| format!("failed to write {}", output.display()))?;
            eprintln!("Wrote {} ({} bytes)", output.display(), bytes.len());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            if !bytes.ends_with(b"\n") {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}
