use core::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::AccountId;

/// A validator as registered in the staking pallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    pub account_id: AccountId,

    /// Commission in parts per billion.
    pub commission: u32,

    /// Whether the validator refuses new nominations.
    pub blocked: bool,
}

/// Stake backing an active validator in a given era.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureRecord {
    /// Self-bonded stake, in base units.
    pub own: u128,
    pub nominator_count: u32,
}

/// A variable-length identity field, as stored by the identity pallet.
///
/// The pallet distinguishes raw bytes and a handful of hash variants; only the
/// payload matters here, so every non-empty variant collapses into `Bytes`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DisplayData {
    #[default]
    None,
    Bytes(Vec<u8>),
}

impl DisplayData {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::None => None,
            Self::Bytes(bytes) => Some(bytes),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<&str> for DisplayData {
    fn from(s: &str) -> Self {
        Self::Bytes(s.as_bytes().to_vec())
    }
}

/// Accepts `"None"`, `{"None": null}` or a single-entry map such as
/// `{"Raw5": "0x68656c6c6f"}` whose value is the hex payload.
impl<'de> Deserialize<'de> for DisplayData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DataVisitor;

        impl<'de> Visitor<'de> for DataVisitor {
            type Value = DisplayData;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "\"None\" or a single-entry map of variant to hex bytes")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match v {
                    "None" => Ok(DisplayData::None),
                    other => Err(E::custom(format!("unexpected data variant: {other}"))),
                }
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(DisplayData::None)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let Some(variant) = map.next_key::<String>()? else {
                    return Err(de::Error::custom("empty data map"));
                };

                let data = if variant == "None" {
                    map.next_value::<de::IgnoredAny>()?;
                    DisplayData::None
                } else {
                    let payload = map.next_value::<String>()?;
                    let digits = payload.strip_prefix("0x").unwrap_or(&payload);
                    let bytes = hex::decode(digits).map_err(de::Error::custom)?;
                    DisplayData::Bytes(bytes)
                };

                if map.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom("data map must have a single entry"));
                }

                Ok(data)
            }
        }

        deserializer.deserialize_any(DataVisitor)
    }
}

/// Self-declared identity of an account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityRecord {
    pub display: DisplayData,
}

impl IdentityRecord {
    pub fn new(display: DisplayData) -> Self {
        Self { display }
    }

    pub fn display_name_bytes(&self) -> Option<&[u8]> {
        self.display.as_bytes()
    }
}

/// A sub-identity delegating to the identity of `parent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuperOfRecord {
    pub parent: AccountId,
    pub sub_name: DisplayData,
}

impl SuperOfRecord {
    pub fn new(parent: AccountId, sub_name: DisplayData) -> Self {
        Self { parent, sub_name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_variants() {
        let cases = [
            (r#""None""#, DisplayData::None),
            (r#"{"None": null}"#, DisplayData::None),
            (r#"{"Raw9": "0x626572796c6c69756d"}"#, DisplayData::from("beryllium")),
            (r#"{"Raw5": "68656c6c6f"}"#, DisplayData::from("hello")),
        ];

        for (json, expected) in cases {
            let data: DisplayData = serde_json::from_str(json).unwrap();
            assert_eq!(data, expected, "input: {json}");
        }
    }

    #[test]
    fn data_rejects_garbage() {
        assert!(serde_json::from_str::<DisplayData>(r#""Raw""#).is_err());
        assert!(serde_json::from_str::<DisplayData>(r#"{}"#).is_err());
        assert!(serde_json::from_str::<DisplayData>(r#"{"Raw1": "0xzz"}"#).is_err());
        assert!(serde_json::from_str::<DisplayData>(r#"{"Raw1": "0x01", "Raw2": "0x0102"}"#).is_err());
    }
}
