use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of an account identifier, in bytes.
pub const ACCOUNT_ID_LEN: usize = 32;

/// Length of the hex encoding of an account identifier, without the `0x` prefix.
pub const ACCOUNT_ID_HEX_LEN: usize = ACCOUNT_ID_LEN * 2;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AccountIdError {
    #[error("storage key has {len} characters, expected at least {ACCOUNT_ID_HEX_LEN}")]
    KeyTooShort { len: usize },

    #[error("expected {ACCOUNT_ID_HEX_LEN} hex characters, got {len}")]
    InvalidLength { len: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A 32-byte account identifier.
///
/// Displayed and serialized as lowercase hex prefixed with `0x`, which is the
/// join key used by every per-account table.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    pub const fn new(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    /// Parse an account id from its hex form. The `0x` prefix is optional and
    /// both upper and lower case digits are accepted.
    pub fn from_hex(s: &str) -> Result<Self, AccountIdError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != ACCOUNT_ID_HEX_LEN {
            return Err(AccountIdError::InvalidLength { len: digits.len() });
        }

        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Extract the account id from the last 64 hex characters of a storage key.
    ///
    /// Every per-account map in the staking and identity pallets ends its key
    /// with the raw account id, whatever the hasher in front of it.
    pub fn from_storage_key(key: &str) -> Result<Self, AccountIdError> {
        let len = key.len();
        if len < ACCOUNT_ID_HEX_LEN {
            return Err(AccountIdError::KeyTooShort { len });
        }

        let start = len - ACCOUNT_ID_HEX_LEN;
        let suffix = key
            .get(start..)
            .ok_or(AccountIdError::InvalidHex(hex::FromHexError::InvalidStringLength))?;

        Self::from_hex(suffix)
    }
}

impl From<[u8; ACCOUNT_ID_LEN]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self::new(bytes)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
