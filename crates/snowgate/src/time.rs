use crate::{Error, Result, SnowflakeDiscordId};
use chrono::{DateTime, Utc};
use core::time::Duration;

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// [`DISCORD_EPOCH`] as whole milliseconds since the Unix epoch.
const DISCORD_EPOCH_MILLIS: u64 = DISCORD_EPOCH.as_millis() as u64;

/// Decodes the creation time embedded in a Discord snowflake.
///
/// The top 42 bits hold milliseconds since [`DISCORD_EPOCH`]. The shift is
/// logical (`u64`), and the result is built from integer milliseconds, so no
/// precision is lost to floating point.
///
/// Every `u64` is accepted: the largest timestamp the layout can hold lands in
/// the year 2154, well inside `chrono`'s range.
///
/// # Example
///
/// ```
/// use snowgate::decode_timestamp;
///
/// let ts = decode_timestamp(0);
/// assert_eq!(ts.timestamp_millis(), 1_420_070_400_000);
/// ```
pub fn decode_timestamp(id: u64) -> DateTime<Utc> {
    let millis = (id >> SnowflakeDiscordId::TIMESTAMP_SHIFT) + DISCORD_EPOCH_MILLIS;
    // (2^42 - 1) + epoch is far below i64::MAX and chrono's upper bound.
    DateTime::from_timestamp_millis(millis as i64).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Returns the smallest snowflake that could have been created at `at`.
///
/// The worker, process and increment bits are zero, which makes the result a
/// lower bound for "created after" style pagination queries.
///
/// # Errors
///
/// Returns [`Error::TimestampOutOfRange`] if `at` precedes [`DISCORD_EPOCH`]
/// or does not fit in the 42-bit timestamp field.
pub fn snowflake_from_datetime(at: DateTime<Utc>) -> Result<SnowflakeDiscordId> {
    let millis = at.timestamp_millis();
    let out_of_range = || Error::TimestampOutOfRange { millis };

    let since_epoch = u64::try_from(millis)
        .ok()
        .and_then(|ms| ms.checked_sub(DISCORD_EPOCH_MILLIS))
        .ok_or_else(out_of_range)?;
    if since_epoch > SnowflakeDiscordId::TIMESTAMP_MASK {
        return Err(out_of_range());
    }
    Ok(SnowflakeDiscordId::from(since_epoch, 0, 0, 0))
}
