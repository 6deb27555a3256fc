//! Selection runs: read chain state, select validators, build the report.

use std::path::PathBuf;

use time::OffsetDateTime;
use tracing::info;

use stakepick_accessor::{AccessError, ChainStateAccessor, SnapshotAccessor};
use stakepick_address::Ss58Encoder;
use stakepick_config::Config;
use stakepick_core_pipeline::{Pipeline, PipelineError, ShapeError};

mod fetch;
pub use fetch::{active_era, fetch_tables, SnapshotRefs};

mod report;
pub use report::Report;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("no active era at the snapshot block")]
    NoActiveEra,

    #[error("unexpected active era value: {0}")]
    InvalidActiveEra(serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Json(serde_json::Error),
}

/// Run a selection against the snapshots named in the configuration.
pub fn run(config: &Config) -> Result<Report, Error> {
    let relay = SnapshotAccessor::from_file(&config.relay.source.snapshot)?;

    let identity_source = config.identity_source();
    if identity_source == &config.relay.source {
        return run_with(config, &relay, &relay);
    }

    let identity = SnapshotAccessor::from_file(&identity_source.snapshot)?;
    run_with(config, &relay, &identity)
}

/// Run a selection with the given staking and identity sources.
pub fn run_with<R, I>(config: &Config, relay: &R, identity: &I) -> Result<Report, Error>
where
    R: ChainStateAccessor + ?Sized,
    I: ChainStateAccessor + ?Sized,
{
    let (refs, tables) = fetch_tables(relay, identity)?;

    let pipeline = Pipeline::new(config.criteria, Ss58Encoder, config.relay.network_prefix);
    let selection = pipeline.select(&tables)?;

    info!(
        selected = selection.stats.selected,
        total = selection.stats.total,
        "Selected validators"
    );

    Ok(Report {
        block: refs.block,
        era: refs.era,
        identity_block: refs.identity_block,
        generated_at: OffsetDateTime::now_utc(),
        rows: selection.rows,
        stats: selection.stats,
    })
}
