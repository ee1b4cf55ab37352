//! Fluent wrapper around assert_cmd::Command.

// Test utility; not every binary uses every method
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `vellum` binary.
///
/// The command never sees the caller's config: it reads the config file
/// named with [`config`](Self::config), or a path that does not exist.
pub struct VellumCommand {
    args: Vec<String>,
    config: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl VellumCommand {
    /// Creates a new command for the `vellum` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            config: None,
            envs: Vec::new(),
        }
    }

    /// Sets the `--dir` option to specify the vault directory.
    pub fn dir(mut self, path: &Path) -> Self {
        self.args.push("--dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Points `VELLUM_CONFIG` at `path`.
    pub fn config(mut self, path: &Path) -> Self {
        self.config = Some(path.to_path_buf());
        self
    }

    /// Sets an extra environment variable.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("vellum").expect("Failed to find vellum binary");
        let config = self
            .config
            .unwrap_or_else(|| PathBuf::from("/nonexistent/vellum/config.toml"));
        cmd.env("VELLUM_CONFIG", config)
            .env_remove("VELLUM_SMTP_PASSWORD")
            .env_remove("RUST_LOG");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `send` command.
    pub fn send(self, note: &str) -> Self {
        self.args(["send", note])
    }

    /// Configures for the `preview` command.
    pub fn preview(self, note: &str) -> Self {
        self.args(["preview", note])
    }

    /// Adds `--as <format>` to a preview.
    pub fn preview_as(self, format: &str) -> Self {
        self.args(["--as", format])
    }

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for VellumCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        VellumCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_dir() {
        let temp = TempDir::new().unwrap();
        let cmd = VellumCommand::new().dir(temp.path());
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], temp.path().to_string_lossy());
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = VellumCommand::new().preview("Note").preview_as("html");
        assert_eq!(cmd.get_args(), ["preview", "Note", "--as", "html"]);
    }
}
