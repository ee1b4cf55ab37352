//! Command handlers for the CLI.

mod completions;
mod config;
mod preview;
mod send;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{PipelineState, Stage};
use crate::export::ProgressReporter;
use crate::vault::FsVault;

pub use completions::handle_completions;
pub use config::{handle_config_path, handle_config_show};
pub use preview::handle_preview;
pub use send::handle_send;

// ===========================================
// Shared Utilities
// ===========================================

/// Progress reporter that prints one line per stage.
pub(crate) struct ConsoleReporter<W: Write> {
    out: W,
    announced: Option<Stage>,
}

impl ConsoleReporter<io::Stderr> {
    pub(crate) fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            announced: None,
        }
    }

    fn line(&mut self, stage: Stage, suffix: &str) {
        // Progress output is best effort
        let _ = writeln!(
            self.out,
            "[{}/{}] {}{}",
            stage.index() + 1,
            Stage::ALL.len(),
            stage.label(),
            suffix
        );
    }
}

impl<W: Write> ProgressReporter for ConsoleReporter<W> {
    fn on_update(&mut self, state: &PipelineState) {
        if let Some(stage) = state.failed() {
            self.line(stage, " failed");
            return;
        }
        if let Some(stage) = state.active()
            && self.announced != Some(stage)
        {
            self.announced = Some(stage);
            self.line(stage, "...");
        }
        if state.is_complete() {
            let _ = writeln!(self.out, "Done");
        }
    }
}

/// Opens the vault, naming the directory on failure.
pub(crate) fn open_vault(dir: &Path) -> Result<FsVault> {
    FsVault::open(dir).with_context(|| format!("failed to open vault at {}", dir.display()))
}

/// Vault path for a CLI note argument; unknown names pass through unchanged.
pub(crate) fn document_path(vault: &FsVault, query: &str) -> String {
    vault
        .find(query)
        .map(|document| document.path().to_string())
        .unwrap_or_else(|| query.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StageEvent;
    use pretty_assertions::assert_eq;

    fn drive(events: &[StageEvent]) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new());
        let mut state = PipelineState::new();
        reporter.on_update(&state);
        for event in events {
            state = state.apply(*event);
            reporter.on_update(&state);
        }
        String::from_utf8(reporter.out).unwrap()
    }

    #[test]
    fn prints_each_stage_once() {
        use StageEvent::*;
        let out = drive(&[Advance, Advance, Advance, Advance, Finish]);
        assert_eq!(
            out,
            "[1/4] Resolving embeds...\n\
             [2/4] Converting to HTML...\n\
             [3/4] Generating PDF...\n\
             [4/4] Sending to Kindle...\n\
             Done\n"
        );
    }

    #[test]
    fn prints_failed_stage() {
        use StageEvent::*;
        let out = drive(&[Advance, Advance, Fail]);
        assert_eq!(
            out,
            "[1/4] Resolving embeds...\n\
             [2/4] Converting to HTML...\n\
             [2/4] Converting to HTML failed\n"
        );
    }

    #[test]
    fn document_path_resolves_names() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("sub/Reading List.md"), "x").unwrap();
        let vault = open_vault(tmp.path()).unwrap();

        assert_eq!(document_path(&vault, "Reading List"), "sub/Reading List.md");
        assert_eq!(document_path(&vault, "missing"), "missing");
    }
}
