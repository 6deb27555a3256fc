//! Command-line interface arguments
//!
//! The CLI reads its configuration from the file given with `--config`, or
//! from `config/config.toml` under the home directory. Logging options can be
//! overridden on the command-line.
//!
//! `clap` parses the command-line parameters into the `Args` structure.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Context, Result};
use directories::BaseDirs;

use stakepick_config::{load_config, Config, LogFormat, LogLevel};

use crate::cmd::init::InitCmd;
use crate::cmd::run::RunCmd;

const APP_FOLDER: &str = ".stakepick";
const CONFIG_FILE: &str = "config.toml";

#[derive(Parser, Clone, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Home directory (default: `~/.stakepick`)
    #[arg(long, global = true, value_name = "HOME_DIR")]
    pub home: Option<PathBuf>,

    /// Config file path (default: `<HOME_DIR>/config/config.toml`)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configuration file
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log format, overrides the configuration file
    #[arg(long, global = true, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Commands {
    /// Write a default configuration file
    Init(InitCmd),

    /// Select validators and write the report
    Run(RunCmd),
}

impl Args {
    /// new returns a new instance of the arguments.
    pub fn new() -> Args {
        Args::parse()
    }

    /// get_home_dir returns the application home folder.
    /// Typically, `$HOME/.stakepick`, dependent on the operating system.
    pub fn get_home_dir(&self) -> Result<PathBuf> {
        match &self.home {
            Some(path) => Ok(path.clone()),
            None => Ok(BaseDirs::new()
                .ok_or_else(|| eyre!("could not determine home directory path"))?
                .home_dir()
                .join(APP_FOLDER)),
        }
    }

    /// get_config_dir returns the configuration folder based on the home folder.
    pub fn get_config_dir(&self) -> Result<PathBuf> {
        Ok(self.get_home_dir()?.join("config"))
    }

    /// get_config_file_path returns the configuration file path based on the command-line
    /// arguments and the configuration folder.
    pub fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(match &self.config {
            Some(path) => path.clone(),
            None => self.get_config_dir()?.join(CONFIG_FILE),
        })
    }

    /// load_config returns the configuration file contents, with environment and
    /// command-line overrides applied.
    pub fn load_config(&self) -> Result<Config> {
        let config_file = self.get_config_file_path()?;

        let mut config = load_config(&config_file, None)
            .wrap_err_with(|| format!("Failed to load configuration at {}", config_file.display()))?;

        if let Some(log_level) = self.log_level {
            config.logging.log_level = log_level;
        }
        if let Some(log_format) = self.log_format {
            config.logging.log_format = log_format;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn args_struct() {
        let args = Args::parse_from(["test", "--log-level", "debug", "init"]);
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert_eq!(args.command, Commands::Init(InitCmd { overwrite: false }));

        let args = Args::parse_from(["test", "run", "--no-console", "--output-dir", "out"]);
        assert_eq!(args.log_level, None);
        let Commands::Run(cmd) = args.command else {
            panic!("expected run command");
        };
        assert!(cmd.no_console);
        assert!(!cmd.no_file);
        assert_eq!(cmd.output_dir, Some(PathBuf::from("out")));

        let args = Args::parse_from(["test", "--home", "/tmp/sp", "init", "--overwrite"]);
        assert_eq!(args.get_home_dir().unwrap(), PathBuf::from("/tmp/sp"));
        assert_eq!(
            args.get_config_file_path().unwrap(),
            PathBuf::from("/tmp/sp/config/config.toml")
        );
    }

    #[test]
    fn invalid_log_level() {
        assert!(Args::try_parse_from(["test", "--log-level", "loud", "run"]).is_err());
    }

    #[test]
    fn args_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[relay]\nsnapshot = \"relay.json\"\nnetwork_prefix = 2\n").unwrap();

        let args = Args::parse_from([
            "test",
            "--config",
            path.to_str().unwrap(),
            "--log-format",
            "json",
            "run",
        ]);
        let config = args.load_config().unwrap();

        assert_eq!(config.relay.network_prefix, 2);
        assert_eq!(config.logging.log_format, LogFormat::Json);
        assert_eq!(config.logging.log_level, LogLevel::Info);
    }

    #[test]
    fn args_load_missing_config() {
        let args = Args::parse_from(["test", "--config", "/nonexistent/config.toml", "run"]);
        assert!(args.load_config().is_err());
    }
}
