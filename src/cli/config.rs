//! Configuration file support.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::export::{ChromeRenderer, DeliverySettings, FontSize, TransformOptions};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "VELLUM_CONFIG";

/// Environment variable that overrides `smtp.password`.
pub const PASSWORD_ENV: &str = "VELLUM_SMTP_PASSWORD";

const MASK: &str = "********";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default vault directory
    pub dir: Option<PathBuf>,

    /// Author written to exported documents
    pub author: Option<String>,

    /// Address the documents are sent from
    pub sender: Option<String>,

    /// Kindle device address
    pub device: Option<String>,

    #[serde(default)]
    pub font_size: FontSize,

    /// Turn `---` rules into page breaks
    #[serde(default)]
    pub page_breaks: bool,

    /// Headless browser executable
    pub browser: Option<PathBuf>,

    /// Milliseconds the browser waits for resources before printing
    pub settle_ms: Option<u64>,

    #[serde(default)]
    pub smtp: SmtpConfig,
}

/// The `[smtp]` table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Config {
    /// Load configuration from the config file location.
    ///
    /// Returns default config if the file doesn't exist. Environment
    /// overrides are applied either way.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            Self::default()
        };
        config.apply_overrides(std::env::var(PASSWORD_ENV).ok());
        Ok(config)
    }

    /// Reads and parses a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        Self::load_from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    pub fn load_from_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies values taken from the environment.
    pub fn apply_overrides(&mut self, smtp_password: Option<String>) {
        if let Some(password) = smtp_password.filter(|p| !p.is_empty()) {
            self.smtp.password = Some(password);
        }
    }

    /// Returns the path to the config file.
    ///
    /// `$VELLUM_CONFIG` when set, else `~/.config/vellum/config.toml`.
    pub fn config_path() -> PathBuf {
        config_path_from(std::env::var_os(CONFIG_ENV))
    }

    /// Resolve the vault directory, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--dir` argument
    /// 2. Config file `dir` setting
    /// 3. Current working directory
    pub fn vault_dir(&self, cli_dir: Option<&PathBuf>) -> PathBuf {
        cli_dir
            .cloned()
            .or_else(|| self.dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            page_breaks: self.page_breaks,
            font_size: self.font_size,
            author: self.author.clone(),
        }
    }

    pub fn delivery_settings(&self) -> DeliverySettings {
        DeliverySettings {
            sender: self.sender.clone(),
            device: self.device.clone(),
            smtp_host: self.smtp.host.clone(),
            smtp_port: self.smtp.port,
            smtp_user: self.smtp.user.clone(),
            smtp_password: self.smtp.password.clone(),
        }
    }

    /// Renderer configured with the browser and settle delay.
    pub fn renderer(&self) -> ChromeRenderer {
        let mut renderer = ChromeRenderer::new();
        if let Some(browser) = &self.browser {
            renderer = renderer.with_browser(browser);
        }
        if let Some(ms) = self.settle_ms {
            renderer = renderer.with_settle(Duration::from_millis(ms));
        }
        renderer
    }

    /// Copy safe to print: the password is replaced by a mask.
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if masked.smtp.password.is_some() {
            masked.smtp.password = Some(MASK.to_string());
        }
        masked
    }
}

fn config_path_from(env_override: Option<OsString>) -> PathBuf {
    match env_override.filter(|p| !p.is_empty()) {
        Some(path) => PathBuf::from(path),
        None => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vellum")
            .join("config.toml"),
    }
}
