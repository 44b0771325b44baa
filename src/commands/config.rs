//! Config subcommands handler

use anyhow::{Context, Result};
use std::path::Path;

use logsift::Config;

/// Show the effective configuration as TOML.
pub fn handle_show(path: Option<&Path>) -> Result<()> {
    let config = Config::resolve(path)?;
    let toml_str = config.to_toml().context("Failed to render config")?;
    print!("{toml_str}");
    Ok(())
}

/// Print where the default config file lives.
pub fn handle_path() -> Result<()> {
    let path = Config::config_path()?;
    println!("{}", path.display());
    Ok(())
}
