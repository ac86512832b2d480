use crate::SnowflakeDiscordId;
use core::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Discord transmits snowflakes as decimal strings so that JavaScript clients
/// keep all 64 bits. Serialization follows that convention; deserialization
/// accepts both the string and the bare integer form.
impl Serialize for SnowflakeDiscordId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SnowflakeDiscordId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SnowflakeVisitor;

        impl de::Visitor<'_> for SnowflakeVisitor {
            type Value = SnowflakeDiscordId;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a snowflake as a decimal string or unsigned integer")
            }

            #[inline]
            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(SnowflakeDiscordId::from_raw(v))
            }

            #[inline]
            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v)
                    .map(SnowflakeDiscordId::from_raw)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        d.deserialize_any(SnowflakeVisitor)
    }
}

pub mod as_native_snow {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::SnowflakeDiscordId;

    /// Serialize a snowflake ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeDiscordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a snowflake ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeDiscordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(d).map(SnowflakeDiscordId::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Guild {
        id: SnowflakeDiscordId,
    }

    #[test]
    fn string_snow_serializes_as_decimal_string() {
        let guild = Guild {
            id: SnowflakeDiscordId::from_raw(175_928_847_299_117_063),
        };
        let json = serde_json::to_string(&guild).expect("serialize");
        assert_eq!(json, r#"{"id":"175928847299117063"}"#);
        let back: Guild = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, guild);
    }

    #[test]
    fn string_snow_accepts_integer_form() {
        let guild: Guild = serde_json::from_value(json!({"id": 42})).expect("deserialize");
        assert_eq!(guild.id.to_raw(), 42);
    }

    #[test]
    fn string_snow_rejects_non_numeric() {
        let err = serde_json::from_value::<Guild>(json!({"id": "abc"})).expect_err("should fail");
        assert!(err.to_string().contains("invalid snowflake"));

        assert!(serde_json::from_value::<Guild>(json!({"id": -5})).is_err());
    }

    #[test]
    fn native_snow_roundtrip() {
        #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
        struct Row {
            #[serde(with = "as_native_snow")]
            event_id: SnowflakeDiscordId,
        }
        let row = Row {
            event_id: SnowflakeDiscordId::from_raw(42),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":42}"#);
        let back: Row = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }
}
