use core::fmt;

use serde::{Deserialize, Serialize};

/// A decoded storage map entry, as handed over by a chain state accessor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub storage_key: String,

    #[serde(alias = "storage")]
    pub storage_value: serde_json::Value,
}

impl StorageEntry {
    pub fn new(storage_key: impl Into<String>, storage_value: serde_json::Value) -> Self {
        Self {
            storage_key: storage_key.into(),
            storage_value,
        }
    }
}

/// Opaque reference to the block a snapshot was taken at, usually its hash.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockRef(String);

impl BlockRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
