//! Handlers for the `config` commands.

use anyhow::Result;

use crate::cli::config::Config;
use crate::cli::output::{Output, OutputFormat};

/// Print the effective configuration with the password masked.
pub fn handle_config_show(format: OutputFormat, config: &Config) -> Result<()> {
    let masked = config.masked();
    match format {
        OutputFormat::Human => {
            let path = Config::config_path();
            println!("# {}", path.display());
            print!("{}", toml::to_string(&masked)?);
        }
        OutputFormat::Json => {
            println!("{}", Output::new(&masked).to_json()?);
        }
    }
    Ok(())
}

/// Print the config file location.
pub fn handle_config_path() -> Result<()> {
    println!("{}", Config::config_path().display());
    Ok(())
}
