//! Access to decoded chain state.
//!
//! The pipeline never talks to a node itself: it asks a [`ChainStateAccessor`]
//! for the finalized head and for storage items already decoded against the
//! runtime metadata.

use core::fmt;
use std::path::PathBuf;

use stakepick_core_types::{BlockRef, StorageEntry};

mod snapshot;
pub use snapshot::{Snapshot, SnapshotAccessor, SnapshotItem};

/// A storage item, optionally restricted to the entries under a first key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageQuery {
    pub pallet: &'static str,
    pub item: &'static str,
    pub key: Option<String>,
}

impl StorageQuery {
    pub fn new(pallet: &'static str, item: &'static str) -> Self {
        Self {
            pallet,
            item,
            key: None,
        }
    }

    pub fn with_key(self, key: impl ToString) -> Self {
        Self {
            key: Some(key.to_string()),
            ..self
        }
    }
}

impl fmt::Display for StorageQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.pallet, self.item)?;
        if let Some(key) = &self.key {
            write!(f, "[{key}]")?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("state at block {requested} is not available, only {available}")]
    UnknownBlock {
        requested: BlockRef,
        available: BlockRef,
    },

    #[error("storage item {query} is a {actual}, not a {expected}")]
    WrongKind {
        query: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Read access to the decoded state of a chain.
pub trait ChainStateAccessor {
    /// The latest finalized block.
    fn finalized_head(&self) -> Result<BlockRef, AccessError>;

    /// A plain storage value, `None` when the item is not set.
    fn storage_value(
        &self,
        query: &StorageQuery,
        at: &BlockRef,
    ) -> Result<Option<serde_json::Value>, AccessError>;

    /// All entries of a storage map, empty when the map is empty.
    fn storage_entries(
        &self,
        query: &StorageQuery,
        at: &BlockRef,
    ) -> Result<Vec<StorageEntry>, AccessError>;
}

impl<A: ChainStateAccessor + ?Sized> ChainStateAccessor for &A {
    fn finalized_head(&self) -> Result<BlockRef, AccessError> {
        (**self).finalized_head()
    }

    fn storage_value(
        &self,
        query: &StorageQuery,
        at: &BlockRef,
    ) -> Result<Option<serde_json::Value>, AccessError> {
        (**self).storage_value(query, at)
    }

    fn storage_entries(
        &self,
        query: &StorageQuery,
        at: &BlockRef,
    ) -> Result<Vec<StorageEntry>, AccessError> {
        (**self).storage_entries(query, at)
    }
}
