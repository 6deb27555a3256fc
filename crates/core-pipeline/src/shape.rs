//! Projection of decoded storage entries into typed records.
//!
//! Every per-account map is keyed the same way: the account id is the last
//! 64 hex characters of the storage key, whatever hasher precedes it.

use core::fmt;

use serde::de::{DeserializeOwned, Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use stakepick_core_types::serde_utils::{u128_from_anything, u32_from_anything};
use stakepick_core_types::{
    AccountId, AccountIdError, DisplayData, ExposureRecord, IdentityRecord, SlashFlags,
    StorageEntry, SuperOfRecord, Table, ValidatorRecord,
};

/// The storage maps consumed by the pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StorageTable {
    Validators,
    Exposures,
    SlashingSpans,
    Identities,
    SuperOf,
}

impl StorageTable {
    /// The `(pallet, item)` pair this table is read from.
    pub const fn storage_item(&self) -> (&'static str, &'static str) {
        match self {
            StorageTable::Validators => ("staking", "validators"),
            StorageTable::Exposures => ("staking", "eras_stakers"),
            StorageTable::SlashingSpans => ("staking", "slashing_spans"),
            StorageTable::Identities => ("identity", "identity_of"),
            StorageTable::SuperOf => ("identity", "super_of"),
        }
    }
}

impl fmt::Display for StorageTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (pallet, item) = self.storage_item();
        write!(f, "{pallet}.{item}")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("malformed storage key in {table}: {key:?}: {source}")]
    MalformedKey {
        table: StorageTable,
        key: String,
        source: AccountIdError,
    },

    #[error("unexpected value in {table} at key {key:?}: {source}")]
    InvalidValue {
        table: StorageTable,
        key: String,
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct ValidatorPrefs {
    #[serde(deserialize_with = "u32_from_anything")]
    commission: u32,
    #[serde(default)]
    blocked: bool,
}

/// Either the full `Exposure` with its list of nominators, or the paged
/// `PagedExposureMetadata` overview which only carries the count.
#[derive(Deserialize)]
struct Exposure {
    #[serde(deserialize_with = "u128_from_anything")]
    own: u128,
    #[serde(default)]
    others: Option<Vec<IgnoredAny>>,
    #[serde(default)]
    nominator_count: Option<u32>,
}

impl Exposure {
    fn into_record(self) -> Result<ExposureRecord, serde_json::Error> {
        let nominator_count = match (self.nominator_count, self.others) {
            (Some(count), _) => count,
            (None, Some(others)) => u32::try_from(others.len())
                .map_err(|_| serde_json::Error::custom("too many nominators"))?,
            (None, None) => {
                return Err(serde_json::Error::custom(
                    "exposure has neither `others` nor `nominator_count`",
                ))
            }
        };

        Ok(ExposureRecord {
            own: self.own,
            nominator_count,
        })
    }
}

#[derive(Deserialize)]
struct SlashingSpans {
    #[serde(deserialize_with = "u32_from_anything")]
    last_nonzero_slash: u32,
}

#[derive(Deserialize)]
struct IdentityInfo {
    #[serde(default)]
    display: DisplayData,
}

#[derive(Deserialize)]
struct Registration {
    info: IdentityInfo,
}

/// Older runtimes store the registration alone, newer ones pair it with an
/// optional username.
struct IdentityOf(Registration);

impl<'de> Deserialize<'de> for IdentityOf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;

        let registration = if value.is_array() {
            <(Registration, IgnoredAny)>::deserialize(value).map(|(registration, _)| registration)
        } else {
            Registration::deserialize(value)
        };

        registration.map(IdentityOf).map_err(D::Error::custom)
    }
}

impl IdentityOf {
    fn into_record(self) -> IdentityRecord {
        IdentityRecord::new(self.0.info.display)
    }
}

/// Extract the account id a storage key belongs to.
pub fn account_id(table: StorageTable, key: &str) -> Result<AccountId, ShapeError> {
    AccountId::from_storage_key(key).map_err(|source| ShapeError::MalformedKey {
        table,
        key: key.to_string(),
        source,
    })
}

fn decode<'a, T>(
    table: StorageTable,
    entries: &'a [StorageEntry],
) -> impl Iterator<Item = Result<(AccountId, T), ShapeError>> + 'a
where
    T: DeserializeOwned + 'a,
{
    entries.iter().map(move |entry| {
        let account_id = account_id(table, &entry.storage_key)?;
        let value = T::deserialize(&entry.storage_value).map_err(|source| {
            ShapeError::InvalidValue {
                table,
                key: entry.storage_key.clone(),
                source,
            }
        })?;

        Ok((account_id, value))
    })
}

fn invalid(table: StorageTable, account_id: &AccountId, source: serde_json::Error) -> ShapeError {
    ShapeError::InvalidValue {
        table,
        key: account_id.to_string(),
        source,
    }
}

/// Shape `staking.validators` entries, preserving their order.
pub fn validators(entries: &[StorageEntry]) -> Result<Vec<ValidatorRecord>, ShapeError> {
    decode::<ValidatorPrefs>(StorageTable::Validators, entries)
        .map(|entry| {
            let (account_id, prefs) = entry?;
            Ok(ValidatorRecord {
                account_id,
                commission: prefs.commission,
                blocked: prefs.blocked,
            })
        })
        .collect()
}

/// Shape `staking.eras_stakers` entries of a single era.
pub fn exposures(entries: &[StorageEntry]) -> Result<Table<ExposureRecord>, ShapeError> {
    let table = StorageTable::Exposures;

    decode::<Exposure>(table, entries)
        .map(|entry| {
            let (account_id, exposure) = entry?;
            let record = exposure
                .into_record()
                .map_err(|source| invalid(table, &account_id, source))?;
            Ok((account_id, record))
        })
        .collect()
}

/// Shape `staking.slashing_spans` entries, keeping only accounts with a nonzero slash.
pub fn slash_flags(entries: &[StorageEntry]) -> Result<SlashFlags, ShapeError> {
    let mut flags = SlashFlags::new();

    for entry in decode::<SlashingSpans>(StorageTable::SlashingSpans, entries) {
        let (account_id, spans) = entry?;
        if spans.last_nonzero_slash != 0 {
            flags.mark(account_id);
        }
    }

    Ok(flags)
}

/// Like [`decode`], but entries whose value does not decode are logged and
/// skipped. Malformed keys are still fatal.
fn decode_lenient<'a, T>(
    table: StorageTable,
    entries: &'a [StorageEntry],
) -> impl Iterator<Item = Result<(AccountId, T), ShapeError>> + 'a
where
    T: DeserializeOwned + 'a,
{
    decode::<T>(table, entries).filter_map(|entry| match entry {
        Err(ShapeError::InvalidValue { table, key, source }) => {
            warn!(%table, %key, error = %source, "Skipping undecodable entry");
            None
        }
        entry => Some(entry),
    })
}

/// Shape `identity.identity_of` entries.
///
/// The table covers every registered account, so an entry that does not
/// decode is skipped rather than failing the whole run.
pub fn identities(entries: &[StorageEntry]) -> Result<Table<IdentityRecord>, ShapeError> {
    decode_lenient::<IdentityOf>(StorageTable::Identities, entries)
        .map(|entry| entry.map(|(account_id, identity)| (account_id, identity.into_record())))
        .collect()
}

/// Shape `identity.super_of` entries, skipping entries that do not decode.
pub fn super_of(entries: &[StorageEntry]) -> Result<Table<SuperOfRecord>, ShapeError> {
    decode_lenient::<(AccountId, DisplayData)>(StorageTable::SuperOf, entries)
        .map(|entry| {
            entry.map(|(account_id, (parent, sub_name))| {
                (account_id, SuperOfRecord::new(parent, sub_name))
            })
        })
        .collect()
}
