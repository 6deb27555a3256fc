use std::fs;
use std::path::Path;

use clap::Args;
use color_eyre::eyre::{bail, Context, Result};
use tracing::info;

use stakepick_config::Config;

#[derive(Args, Clone, Debug, Default, PartialEq)]
pub struct InitCmd {
    /// Overwrite an existing configuration file
    #[clap(long)]
    pub overwrite: bool,
}

impl InitCmd {
    /// Write the default configuration to `config_file`.
    pub fn run(&self, config_file: &Path) -> Result<()> {
        if config_file.exists() && !self.overwrite {
            bail!(
                "Configuration file already exists at {}, use --overwrite to replace it",
                config_file.display()
            );
        }

        if let Some(dir) = config_file.parent() {
            fs::create_dir_all(dir)
                .wrap_err_with(|| format!("Failed to create directory {}", dir.display()))?;
        }

        let contents = Config::default().to_toml()?;
        fs::write(config_file, contents)
            .wrap_err_with(|| format!("Failed to write {}", config_file.display()))?;

        info!(file = %config_file.display(), "Wrote default configuration");

        Ok(())
    }
}
