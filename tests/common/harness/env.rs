//! Isolated test environment with temp directory.

// Not every test binary uses every helper
#![allow(dead_code)]

use super::{TestNote, VellumCommand};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Config with every delivery setting filled in.
pub const COMPLETE_CONFIG: &str = r#"
author = "Test Author"
sender = "me@example.com"
device = "reader@kindle.com"

[smtp]
host = "127.0.0.1"
port = 2525
user = "me"
password = "file-secret"
"#;

/// Isolated test environment: a vault directory plus a config file path
/// outside it.
///
/// Everything is removed when the TestEnv is dropped.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    vault_dir: PathBuf,
    config_path: PathBuf,
}

impl TestEnv {
    /// Creates an environment with an empty vault and no config file.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let vault_dir = temp_dir.path().join("vault");
        std::fs::create_dir(&vault_dir).expect("Failed to create vault directory");
        let config_path = temp_dir.path().join("config.toml");
        Self {
            _temp_dir: temp_dir,
            vault_dir,
            config_path,
        }
    }

    /// Returns the path to the vault directory.
    pub fn vault_dir(&self) -> &Path {
        &self.vault_dir
    }

    /// Returns the path the config file is read from.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Writes the config file.
    pub fn write_config(&self, contents: &str) -> &Self {
        std::fs::write(&self.config_path, contents).expect("Failed to write config");
        self
    }

    /// Adds a note to the vault and returns its path.
    pub fn add_note(&self, note: &TestNote) -> PathBuf {
        self.write_bytes(note.path(), note.render().as_bytes())
    }

    /// Writes a file into the vault, creating parent directories.
    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.vault_dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&path, bytes).expect("Failed to write file");
        path
    }

    /// Creates a VellumCommand configured for this test environment.
    pub fn cmd(&self) -> VellumCommand {
        VellumCommand::new()
            .dir(&self.vault_dir)
            .config(&self.config_path)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.vault_dir().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_config_outside_vault() {
        let env = TestEnv::new();
        assert!(!env.config_path().starts_with(env.vault_dir()));
        assert!(!env.config_path().exists());
    }

    #[test]
    fn test_env_add_note_in_subdirectory() {
        let env = TestEnv::new();
        let path = env.add_note(&TestNote::new("sub/Deep").body("text"));
        assert!(path.ends_with("sub/Deep.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "text\n");
    }
}
