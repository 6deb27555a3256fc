use serde::de;

/// Deserializes a u128 value from either a native integer or a decimal string.
///
/// Balances routinely exceed the range JSON tooling handles safely, so
/// snapshot producers and config files may quote them.
pub fn u128_from_anything<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct U128Visitor;

    impl<'de> de::Visitor<'de> for U128Visitor {
        type Value = u128;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(formatter, "a u128 or a string representing a u128")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(u128::from(v))
        }

        fn visit_u128<E>(self, v: u128) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u128::try_from(v)
                .map_err(|_| E::custom(format!("i64 value {v} out of range for u128")))
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.parse::<u128>()
                .map_err(|_| E::custom(format!("invalid u128 string: {v}")))
        }
    }

    deserializer.deserialize_any(U128Visitor)
}

/// Deserializes a u32 value from either a native integer or a decimal string.
pub fn u32_from_anything<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct U32Visitor;

    impl<'de> de::Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(formatter, "a u32 or a string representing a u32")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom(format!("u64 value {v} out of range for u32")))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom(format!("i64 value {v} out of range for u32")))
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.parse::<u32>()
                .map_err(|_| E::custom(format!("invalid u32 string: {v}")))
        }
    }

    deserializer.deserialize_any(U32Visitor)
}
