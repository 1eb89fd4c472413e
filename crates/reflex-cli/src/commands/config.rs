//! Config command: print the effective configuration.

use std::path::Path;

use anyhow::Result;

use super::load_config;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
