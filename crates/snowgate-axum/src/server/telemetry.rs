//! Console logging for the server.
//!
//! Events and spans are printed through `tracing_subscriber::fmt`. The filter
//! comes from `RUST_LOG` and defaults to `info`; use e.g.
//! `RUST_LOG=snowgate=trace,info` to see every gated call.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber has already been set.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .pretty(),
        )
        .try_init()?;
    Ok(())
}
