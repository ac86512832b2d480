use thiserror::Error;

/// A result type defaulting to the crate's [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that `snowgate` can produce.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The authorization oracle rejected the caller.
    ///
    /// Raised by [`crate::Gated`] before the protected operation runs. Hosts
    /// are expected to map it to a `401 Unauthorized` response.
    #[error("caller is not authorized")]
    Unauthorized,

    /// A string that is not a case-insensitive match for `"true"` or
    /// `"false"` was given to the boolean formatter.
    #[error("invalid boolean literal: {value:?}")]
    InvalidBooleanLiteral {
        /// The rejected input.
        value: String,
    },

    /// A string could not be parsed as a decimal snowflake.
    #[error("invalid snowflake: {value:?}")]
    InvalidSnowflake {
        /// The rejected input.
        value: String,
    },

    /// An instant cannot be represented in the 42-bit snowflake timestamp
    /// field (before the Discord epoch or too far in the future).
    #[error("timestamp {millis}ms is outside the snowflake range")]
    TimestampOutOfRange {
        /// Milliseconds since the Unix epoch.
        millis: i64,
    },

    /// The password hashing primitive failed. Passed through as-is.
    #[cfg(feature = "password")]
    #[error(transparent)]
    Password(#[from] bcrypt::BcryptError),

    /// A blocking hashing task panicked or was cancelled.
    #[cfg(feature = "async-tokio")]
    #[error("blocking task failed: {0}")]
    TaskJoin(String),
}

impl From<crate::Unauthorized> for Error {
    fn from(_: crate::Unauthorized) -> Self {
        Self::Unauthorized
    }
}

#[cfg(feature = "async-tokio")]
impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(err.to_string())
    }
}
