use anyhow::Result;

use crate::config::{delete_credential, AppConfig};

pub fn run(config: &AppConfig) -> Result<()> {
    delete_credential(&config.config_path)?;
    println!("Logged out, removed {}", config.config_path.display());
    Ok(())
}
