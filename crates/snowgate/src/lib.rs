//! # snowgate
//!
//! Small building blocks for services that sit behind Discord OAuth2:
//!
//! - [`decode_timestamp`] / [`SnowflakeDiscordId`]: creation time and fields
//!   of a Discord snowflake.
//! - [`format_bool`] / [`JsonBool`]: canonical `"true"` / `"false"` literals.
//! - [`hash_password`] / [`check_password`]: bcrypt hashing (feature
//!   `password`, on by default).
//! - [`gate`] / [`Gated`]: run an async operation only when an async
//!   [`Authorizer`] says the caller is allowed, failing with
//!   [`Unauthorized`] otherwise.
//!
//! ## Features
//!
//! - `password` (default): bcrypt helpers.
//! - `async-tokio`: `spawn_blocking` variants of the password helpers.
//! - `serde`: `Serialize` / `Deserialize` for [`SnowflakeDiscordId`] and
//!   [`JsonBool`].
//! - `tracing`: spans and events for gated calls and hashing.
//! - `axum`: `IntoResponse` for [`Error`] and [`Unauthorized`].

mod error;
mod gate;
mod id;
mod json_bool;
#[cfg(feature = "password")]
mod password;
#[cfg(feature = "axum")]
mod response;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::gate::*;
pub use crate::id::*;
pub use crate::json_bool::*;
#[cfg(feature = "password")]
pub use crate::password::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
