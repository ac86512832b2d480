use crate::{Error, Result, decode_timestamp};
use chrono::{DateTime, Utc};
use core::{fmt, str::FromStr};

/// A 64-bit Snowflake ID using the Discord layout
///
/// - 42 bits timestamp (ms since [`DISCORD_EPOCH`])
/// - 5 bits internal worker ID
/// - 5 bits internal process ID
/// - 12 bits increment (per-process sequence)
///
/// ```text
///  Bit Index:  63             22 21         17 16          12 11              0
///              +----------------+-------------+--------------+----------------+
///  Field:      | timestamp (42) | worker (5)  | process (5)  | increment (12) |
///              +----------------+-------------+--------------+----------------+
///              |<----- MSB ------------- 64 bits ------------- LSB ---------->|
/// ```
/// [`DISCORD_EPOCH`]: crate::DISCORD_EPOCH
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeDiscordId {
    id: u64,
}

impl SnowflakeDiscordId {
    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 22
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for extracting the 5-bit worker ID field. Occupies bits 17
    /// through 21.
    pub const WORKER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for extracting the 5-bit process ID field. Occupies bits 12
    /// through 16.
    pub const PROCESS_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for extracting the 12-bit increment field. Occupies bits 0
    /// through 11.
    pub const INCREMENT_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the worker ID to its correct position (bit 17).
    pub const WORKER_ID_SHIFT: u64 = 17;

    /// Number of bits to shift the process ID to its correct position (bit 12).
    pub const PROCESS_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the increment field (bit 0).
    pub const INCREMENT_SHIFT: u64 = 0;

    /// Packs the four fields into an ID. Out-of-range values are masked.
    pub const fn from(timestamp: u64, worker_id: u64, process_id: u64, increment: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let process_id = (process_id & Self::PROCESS_ID_MASK) << Self::PROCESS_ID_SHIFT;
        let increment = (increment & Self::INCREMENT_MASK) << Self::INCREMENT_SHIFT;
        Self {
            id: timestamp | worker_id | process_id | increment,
        }
    }

    /// Wraps a raw 64-bit snowflake without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// The raw 64-bit value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp (ms since the Discord epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the internal worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the internal process ID from the packed ID.
    pub const fn process_id(&self) -> u64 {
        (self.id >> Self::PROCESS_ID_SHIFT) & Self::PROCESS_ID_MASK
    }

    /// The combined 10-bit worker and process pair.
    pub const fn machine_id(&self) -> u64 {
        (self.worker_id() << 5) | self.process_id()
    }

    /// Extracts the increment from the packed ID.
    pub const fn increment(&self) -> u64 {
        (self.id >> Self::INCREMENT_SHIFT) & Self::INCREMENT_MASK
    }

    /// Wall-clock time at which the ID was generated.
    pub fn created_at(&self) -> DateTime<Utc> {
        decode_timestamp(self.id)
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<u64> for SnowflakeDiscordId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<SnowflakeDiscordId> for u64 {
    fn from(id: SnowflakeDiscordId) -> Self {
        id.to_raw()
    }
}

impl FromStr for SnowflakeDiscordId {
    type Err = Error;

    /// Parses the decimal form Discord uses in JSON payloads.
    fn from_str(s: &str) -> Result<Self> {
        s.parse::<u64>()
            .map(Self::from_raw)
            .map_err(|_| Error::InvalidSnowflake {
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for SnowflakeDiscordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeDiscordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeDiscordId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("worker_id", &self.worker_id())
            .field("process_id", &self.process_id())
            .field("increment", &self.increment())
            .finish()
    }
}
