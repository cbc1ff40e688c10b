//! Discord snowflake identifiers.

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::DiscordError;

/// Milliseconds between the Unix epoch and the first second of 2015, Discord's epoch.
pub const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// A 64-bit Discord identifier.
///
/// The API sends snowflakes as JSON strings so they survive JavaScript's
/// number precision; some payloads still carry plain integers, so both are
/// accepted on input. Output is always a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Snowflake(pub u64);

impl Snowflake {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Creation time encoded in the upper 42 bits.
    #[must_use]
    pub fn timestamp(self) -> Option<DateTime<Utc>> {
        let ms = (self.0 >> 22) + DISCORD_EPOCH_MS;
        DateTime::from_timestamp_millis(i64::try_from(ms).ok()?)
    }
}

impl From<u64> for Snowflake {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = DiscordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| DiscordError::ParseError(format!("invalid snowflake '{s}': {e}")))
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct SnowflakeVisitor;

impl Visitor<'_> for SnowflakeVisitor {
    type Value = Snowflake;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake as a string or unsigned integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Snowflake(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(Snowflake)
            .map_err(|_| E::custom(format!("negative snowflake: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse::<u64>()
            .map(Snowflake)
            .map_err(|e| E::custom(format!("invalid snowflake '{v}': {e}")))
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_string_and_number() {
        let a: Snowflake = serde_json::from_str("\"175928847299117063\"").unwrap();
        let b: Snowflake = serde_json::from_str("175928847299117063").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(), 175_928_847_299_117_063);
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Snowflake(42)).unwrap();
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Snowflake>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Snowflake>("-5").is_err());
        assert!("12x".parse::<Snowflake>().is_err());
    }

    #[test]
    fn timestamp_matches_documented_example() {
        // Example from the Discord reference docs: 2016-04-30 11:18:25.796 UTC
        let ts = Snowflake(175_928_847_299_117_063).timestamp().unwrap();
        assert_eq!(ts.timestamp_millis(), 1_462_015_105_796);
    }
}
