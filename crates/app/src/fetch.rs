use serde::Deserialize;
use tracing::info;

use stakepick_accessor::{ChainStateAccessor, StorageQuery};
use stakepick_core_pipeline::{shape, StorageTable, Tables};
use stakepick_core_types::serde_utils::u32_from_anything;
use stakepick_core_types::{BlockRef, StorageEntry};

use crate::Error;

#[derive(Deserialize)]
struct ActiveEraInfo {
    #[serde(deserialize_with = "u32_from_anything")]
    index: u32,
}

/// Block references and era the tables were read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotRefs {
    pub block: BlockRef,
    pub era: u32,
    pub identity_block: BlockRef,
}

fn query(table: StorageTable) -> StorageQuery {
    let (pallet, item) = table.storage_item();
    StorageQuery::new(pallet, item)
}

fn entries<A>(accessor: &A, query: &StorageQuery, at: &BlockRef) -> Result<Vec<StorageEntry>, Error>
where
    A: ChainStateAccessor + ?Sized,
{
    Ok(accessor.storage_entries(query, at)?)
}

/// Index of the active era at the given block.
pub fn active_era<A>(accessor: &A, at: &BlockRef) -> Result<u32, Error>
where
    A: ChainStateAccessor + ?Sized,
{
    let value = accessor
        .storage_value(&StorageQuery::new("staking", "active_era"), at)?
        .ok_or(Error::NoActiveEra)?;

    let info = ActiveEraInfo::deserialize(&value).map_err(Error::InvalidActiveEra)?;
    Ok(info.index)
}

/// Read and shape every table the pipeline needs.
///
/// Staking tables are read at the relay chain's finalized head. Identity
/// tables are read from `identity` at its own finalized head, which is the
/// same block when both are the relay chain.
pub fn fetch_tables<R, I>(relay: &R, identity: &I) -> Result<(SnapshotRefs, Tables), Error>
where
    R: ChainStateAccessor + ?Sized,
    I: ChainStateAccessor + ?Sized,
{
    let block = relay.finalized_head()?;
    info!(%block, "Finalized head");

    let era = active_era(relay, &block)?;
    info!(era, "Active era");

    let validators = shape::validators(&entries(relay, &query(StorageTable::Validators), &block)?)?;
    info!(count = validators.len(), "Total validators");

    let exposures_query = query(StorageTable::Exposures).with_key(era);
    let exposures = shape::exposures(&entries(relay, &exposures_query, &block)?)?;
    info!(count = exposures.len(), "Active validators");

    let slashes =
        shape::slash_flags(&entries(relay, &query(StorageTable::SlashingSpans), &block)?)?;
    info!(count = slashes.len(), "Slashed validators");

    let identity_block = identity.finalized_head()?;
    if identity_block != block {
        info!(block = %identity_block, "Reading identities from a separate chain");
    }

    let identities = shape::identities(&entries(
        identity,
        &query(StorageTable::Identities),
        &identity_block,
    )?)?;

    let super_of = shape::super_of(&entries(
        identity,
        &query(StorageTable::SuperOf),
        &identity_block,
    )?)?;

    info!(
        identities = identities.len(),
        sub_identities = super_of.len(),
        "Identities"
    );

    let refs = SnapshotRefs {
        block,
        era,
        identity_block,
    };

    let tables = Tables {
        validators,
        exposures,
        slashes,
        identities,
        super_of,
    };

    Ok((refs, tables))
}
