use super::load_config;
use crate::errors::AppResult;
use clap::Args;

/// Print the effective configuration
#[derive(Args)]
pub struct ConfigCommand {}

impl ConfigCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = load_config();
        print!("{}", config.to_toml_string()?);
        Ok(())
    }
}
