//! Chain state read from a JSON snapshot file.
//!
//! A snapshot holds the decoded storage of one chain at one finalized block:
//!
//! ```json
//! {
//!   "block_hash": "0x…",
//!   "storage": [
//!     { "pallet": "staking", "item": "active_era", "value": { "index": 1234 } },
//!     { "pallet": "staking", "item": "eras_stakers", "key": "1234", "entries": [ … ] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use stakepick_core_types::{BlockRef, StorageEntry};

use crate::{AccessError, ChainStateAccessor, StorageQuery};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub block_hash: BlockRef,
    #[serde(default)]
    pub storage: Vec<SnapshotItem>,
}

/// One storage item: either a plain `value` or the `entries` of a map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub pallet: String,
    pub item: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "key_from_anything"
    )]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<StorageEntry>>,
}

impl SnapshotItem {
    fn kind(&self) -> &'static str {
        if self.entries.is_some() {
            "map"
        } else {
            "value"
        }
    }

    fn matches(&self, query: &StorageQuery) -> bool {
        same_name(&self.pallet, query.pallet)
            && same_name(&self.item, query.item)
            && self.key == query.key
    }
}

/// Era indices are commonly written as numbers; keys are compared as strings.
fn key_from_anything<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Str(String),
        Num(u64),
    }

    Ok(Option::<Key>::deserialize(deserializer)?.map(|key| match key {
        Key::Str(s) => s,
        Key::Num(n) => n.to_string(),
    }))
}

/// Pallet and item names match regardless of case and underscores, so that
/// `ErasStakers` and `eras_stakers` name the same item.
fn same_name(a: &str, b: &str) -> bool {
    let normalize = |s: &str| {
        s.chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect::<String>()
    };

    normalize(a) == normalize(b)
}

/// Serves chain state out of a [`Snapshot`].
#[derive(Clone, Debug)]
pub struct SnapshotAccessor {
    snapshot: Snapshot,
}

impl SnapshotAccessor {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AccessError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| AccessError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let snapshot: Snapshot =
            serde_json::from_str(&contents).map_err(|source| AccessError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            path = %path.display(),
            block = %snapshot.block_hash,
            items = snapshot.storage.len(),
            "Loaded snapshot"
        );

        Ok(Self::new(snapshot))
    }

    fn check_block(&self, at: &BlockRef) -> Result<(), AccessError> {
        if at != &self.snapshot.block_hash {
            return Err(AccessError::UnknownBlock {
                requested: at.clone(),
                available: self.snapshot.block_hash.clone(),
            });
        }
        Ok(())
    }

    fn find(&self, query: &StorageQuery) -> Option<&SnapshotItem> {
        self.snapshot.storage.iter().find(|item| item.matches(query))
    }
}

impl ChainStateAccessor for SnapshotAccessor {
    fn finalized_head(&self) -> Result<BlockRef, AccessError> {
        Ok(self.snapshot.block_hash.clone())
    }

    fn storage_value(
        &self,
        query: &StorageQuery,
        at: &BlockRef,
    ) -> Result<Option<serde_json::Value>, AccessError> {
        self.check_block(at)?;

        match self.find(query) {
            None => Ok(None),
            Some(item) if item.entries.is_some() => Err(AccessError::WrongKind {
                query: query.to_string(),
                expected: "value",
                actual: item.kind(),
            }),
            Some(item) => Ok(item.value.clone()),
        }
    }

    fn storage_entries(
        &self,
        query: &StorageQuery,
        at: &BlockRef,
    ) -> Result<Vec<StorageEntry>, AccessError> {
        self.check_block(at)?;

        let entries = match self.find(query) {
            None => Vec::new(),
            Some(item) => match &item.entries {
                Some(entries) => entries.clone(),
                None => {
                    return Err(AccessError::WrongKind {
                        query: query.to_string(),
                        expected: "map",
                        actual: item.kind(),
                    })
                }
            },
        };

        debug!(%query, count = entries.len(), "Fetched storage entries");

        Ok(entries)
    }
}
