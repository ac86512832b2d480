//! Salted, one-way password hashing backed by bcrypt.
//!
//! The salt is embedded in the returned hash string, so only the hash needs to
//! be stored. Input that would overflow bcrypt's 72-byte key (which includes a
//! trailing NUL) is rejected rather than silently truncated. Errors from bcrypt are surfaced unchanged through
//! [`Error::Password`](crate::Error::Password).

use crate::Result;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Bcrypt cost factor used by [`hash_password`].
pub const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Longest password bcrypt hashes without truncation, in bytes. The 72-byte
/// key also holds a NUL terminator.
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Hashes a plaintext password with a fresh random salt.
///
/// # Errors
///
/// Returns [`Error::Password`](crate::Error::Password) if bcrypt fails.
pub fn hash_password(plain: impl AsRef<[u8]>) -> Result<String> {
    hash_password_with_cost(plain, BCRYPT_COST)
}

/// Same as [`hash_password`] with an explicit bcrypt cost (4..=31).
///
/// # Errors
///
/// Returns [`Error::Password`](crate::Error::Password) if bcrypt fails, e.g.
/// on an out-of-range cost or a password over [`MAX_PASSWORD_BYTES`].
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(plain)))]
pub fn hash_password_with_cost(plain: impl AsRef<[u8]>, cost: u32) -> Result<String> {
    Ok(bcrypt::non_truncating_hash(plain, cost)?)
}

/// Checks a plaintext password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns [`Error::Password`](crate::Error::Password) if `hashed` is not a
/// valid bcrypt hash or `plain` exceeds [`MAX_PASSWORD_BYTES`]. A
/// well-formed hash that does not match yields `Ok(false)`.
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
pub fn check_password(plain: impl AsRef<[u8]>, hashed: &str) -> Result<bool> {
    Ok(bcrypt::non_truncating_verify(plain, hashed)?)
}

/// Runs [`hash_password_with_cost`] on the blocking thread pool.
///
/// # Errors
///
/// Returns [`Error::Password`](crate::Error::Password) if bcrypt fails, or
/// [`Error::TaskJoin`](crate::Error::TaskJoin) if the blocking task panics.
#[cfg(feature = "async-tokio")]
pub async fn hash_password_async(plain: impl Into<Vec<u8>>, cost: Option<u32>) -> Result<String> {
    let plain = plain.into();
    let cost = cost.unwrap_or(BCRYPT_COST);
    tokio::task::spawn_blocking(move || hash_password_with_cost(plain, cost)).await?
}

/// Runs [`check_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns [`Error::Password`](crate::Error::Password) if `hashed` is
/// malformed, or [`Error::TaskJoin`](crate::Error::TaskJoin) if the blocking
/// task panics.
#[cfg(feature = "async-tokio")]
pub async fn check_password_async(plain: impl Into<Vec<u8>>, hashed: impl Into<String>) -> Result<bool> {
    let plain = plain.into();
    let hashed = hashed.into();
    tokio::task::spawn_blocking(move || check_password(plain, &hashed)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    // Minimum bcrypt cost keeps the tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_check_password() {
        let hash = hash_password_with_cost("SecurePassword123!", TEST_COST).expect("hash");
        assert!(hash.starts_with("$2b$04$"));

        assert!(check_password("SecurePassword123!", &hash).expect("verify"));
        assert!(!check_password("WrongPassword", &hash).expect("verify"));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password_with_cost(b"hunter2", TEST_COST).unwrap();
        let b = hash_password_with_cost(b"hunter2", TEST_COST).unwrap();
        assert_ne!(a, b);
        assert!(check_password(b"hunter2", &a).unwrap());
        assert!(check_password(b"hunter2", &b).unwrap());
    }

    #[test]
    fn test_invalid_cost_passes_bcrypt_error_through() {
        let err = hash_password_with_cost("pw", 3).unwrap_err();
        assert!(matches!(
            err,
            Error::Password(bcrypt::BcryptError::CostNotAllowed(3))
        ));
    }

    #[test]
    fn test_long_passwords_are_not_truncated() {
        let longest = "a".repeat(MAX_PASSWORD_BYTES);
        let hash = hash_password_with_cost(&longest, TEST_COST).expect("fits");
        assert!(check_password(&longest, &hash).unwrap());

        let base = "a".repeat(72);
        let err = hash_password_with_cost(format!("{base}X"), TEST_COST).unwrap_err();
        assert!(matches!(
            err,
            Error::Password(bcrypt::BcryptError::Truncation(74))
        ));

        // A truncating hasher would accept any suffix past 72 bytes.
        let truncated = bcrypt::hash(format!("{base}X"), TEST_COST).unwrap();
        let res = check_password(format!("{base}Y"), &truncated);
        assert!(matches!(
            res,
            Err(Error::Password(bcrypt::BcryptError::Truncation(_)))
        ));
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let err = check_password("pw", "not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, Error::Password(_)));
    }

    #[cfg(feature = "async-tokio")]
    #[tokio::test]
    async fn test_async_hash_and_check_password() {
        let hash = hash_password_async("SecurePassword123!", Some(TEST_COST))
            .await
            .expect("hash");
        assert!(
            check_password_async("SecurePassword123!", hash.clone())
                .await
                .expect("verify")
        );
        assert!(!check_password_async("nope", hash).await.expect("verify"));
    }
}
