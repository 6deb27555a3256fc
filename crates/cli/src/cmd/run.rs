use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{eyre, Context, Result};
use tracing::info;

use stakepick_config::Config;
use stakepick_metrics::{Metrics, SharedRegistry};

#[derive(Args, Clone, Debug, Default, PartialEq)]
pub struct RunCmd {
    /// Directory to write the JSON report to, overrides the configuration file
    #[clap(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Do not print the report
    #[clap(long)]
    pub no_console: bool,

    /// Do not write the JSON report
    #[clap(long)]
    pub no_file: bool,

    /// Write Prometheus metrics of the run to this file
    #[clap(long, value_name = "FILE")]
    pub metrics_file: Option<PathBuf>,
}

impl RunCmd {
    pub fn run(&self, mut config: Config) -> Result<()> {
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if self.no_console {
            config.output.console = false;
        }
        if self.no_file {
            config.output.file = false;
        }

        let registry = SharedRegistry::global();
        let metrics = Metrics::register(registry);

        let report = stakepick_app::run(&config).wrap_err("Validator selection failed")?;

        let stats = &report.stats;
        metrics.observe(stats.total, stats.active, stats.selected, |reason| {
            stats.exclusions.get(&reason).copied().unwrap_or(0)
        });

        if config.output.file {
            let path = report.write_json(&config.output.dir)?;
            info!(path = %path.display(), rows = report.rows.len(), "Report written");
        }

        if config.output.console {
            report.render(&mut io::stdout().lock())?;
        }

        if let Some(path) = &self.metrics_file {
            let mut buf = String::new();
            registry
                .export(&mut buf)
                .map_err(|_| eyre!("Failed to encode metrics"))?;
            fs::write(path, buf)
                .wrap_err_with(|| format!("Failed to write metrics to {}", path.display()))?;
        }

        Ok(())
    }
}
