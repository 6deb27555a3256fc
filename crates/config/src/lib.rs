//! Configuration of the stakepick tool.
//!
//! The configuration is read from a TOML file, then overridden by
//! `STAKEPICK__<SECTION>__<KEY>` environment variables.

use core::fmt;
use core::str::FromStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use stakepick_core_types::Criteria;

mod utils;
pub use utils::{bool_from_anything, u16_from_anything};

/// Prefix of environment variables overriding the configuration file.
pub const ENV_PREFIX: &str = "STAKEPICK";

/// Separator between sections and keys in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

/// Network prefix of the Polkadot relay chain.
pub const POLKADOT_NETWORK_PREFIX: u16 = 0;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// stakepick configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Chain holding the staking pallet
    #[serde(default)]
    pub relay: RelayConfig,

    /// Chain holding the identity pallet, when it is not the relay chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<SourceConfig>,

    /// Eligibility thresholds
    #[serde(default)]
    pub criteria: Criteria,

    /// Where and how to write the report
    #[serde(default)]
    pub output: OutputConfig,

    /// Log configuration options
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Source of the identity tables: the people chain when configured,
    /// the relay chain otherwise.
    pub fn identity_source(&self) -> &SourceConfig {
        self.people.as_ref().unwrap_or(&self.relay.source)
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load the configuration file at `path`, applying environment overrides.
pub fn load_config(path: impl AsRef<Path>, env_prefix: Option<&str>) -> Result<Config, Error> {
    let env = config::Environment::with_prefix(env_prefix.unwrap_or(ENV_PREFIX))
        .separator(ENV_SEPARATOR);

    let config = config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .add_source(env)
        .build()?
        .try_deserialize()?;

    Ok(config)
}

/// A chain state snapshot to read from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the decoded storage snapshot
    pub snapshot: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("snapshots/relay.json"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub source: SourceConfig,

    /// SS58 prefix used to render addresses
    #[serde(
        default = "default_network_prefix",
        deserialize_with = "u16_from_anything"
    )]
    pub network_prefix: u16,
}

fn default_network_prefix() -> u16 {
    POLKADOT_NETWORK_PREFIX
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            network_prefix: POLKADOT_NETWORK_PREFIX,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the JSON report is written to
    pub dir: PathBuf,

    /// Write the JSON report
    #[serde(deserialize_with = "bool_from_anything")]
    pub file: bool,

    /// Print the report to stdout
    #[serde(deserialize_with = "bool_from_anything")]
    pub console: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("result"),
            file: true,
            console: true,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            e => Err(format!("Invalid log level: {e}")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            e => Err(format!("Invalid log format: {e}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Plain => f.write_str("plain"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use stakepick_core_types::UNIT;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_full_config() {
        let file = write_config(
            r#"
            [relay]
            snapshot = "snapshots/polkadot.json"
            network_prefix = 0

            [people]
            snapshot = "snapshots/people.json"

            [criteria]
            max_commission = 30000000
            max_nominators = 200
            min_own_stake = "20000000000000"

            [output]
            dir = "out"
            console = false

            [logging]
            log_level = "debug"
            log_format = "json"
            "#,
        );

        let config = load_config(file.path(), Some("STAKEPICK_TEST_FULL")).unwrap();

        assert_eq!(
            config,
            Config {
                relay: RelayConfig {
                    source: SourceConfig {
                        snapshot: PathBuf::from("snapshots/polkadot.json"),
                    },
                    network_prefix: 0,
                },
                people: Some(SourceConfig {
                    snapshot: PathBuf::from("snapshots/people.json"),
                }),
                criteria: Criteria {
                    max_commission: 30_000_000,
                    max_nominators: 200,
                    min_own_stake: 20_000 * UNIT,
                },
                output: OutputConfig {
                    dir: PathBuf::from("out"),
                    file: true,
                    console: false,
                },
                logging: LoggingConfig {
                    log_level: LogLevel::Debug,
                    log_format: LogFormat::Json,
                },
            }
        );
        assert_eq!(config.identity_source().snapshot, PathBuf::from("snapshots/people.json"));
    }

    #[test]
    fn missing_sections_default() {
        let file = write_config(
            r#"
            [relay]
            snapshot = "relay.json"
            network_prefix = 2
            "#,
        );

        let config = load_config(file.path(), Some("STAKEPICK_TEST_DEFAULTS")).unwrap();

        assert_eq!(config.relay.network_prefix, 2);
        assert_eq!(config.people, None);
        assert_eq!(config.identity_source().snapshot, PathBuf::from("relay.json"));
        assert_eq!(config.criteria, Criteria::default());
        assert_eq!(config.output, OutputConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config(
            r#"
            [relay]
            snapshot = "relay.json"
            network_prefix = 0
            "#,
        );

        std::env::set_var("STAKEPICK_TEST_ENV__RELAY__NETWORK_PREFIX", "42");
        std::env::set_var("STAKEPICK_TEST_ENV__OUTPUT__CONSOLE", "false");
        let config = load_config(file.path(), Some("STAKEPICK_TEST_ENV")).unwrap();
        std::env::remove_var("STAKEPICK_TEST_ENV__RELAY__NETWORK_PREFIX");
        std::env::remove_var("STAKEPICK_TEST_ENV__OUTPUT__CONSOLE");

        assert_eq!(config.relay.network_prefix, 42);
        assert!(!config.output.console);
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let file = write_config(&Config::default().to_toml().unwrap());
        let config = load_config(file.path(), Some("STAKEPICK_TEST_ROUND_TRIP")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn log_level_parsing() {
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
    }
}
