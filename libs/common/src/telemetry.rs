//! Tracing subscriber setup shared by every service binary

use anyhow::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Filter applied when `RUST_LOG` is unset or unparsable
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the filter from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global tracing subscriber
///
/// Fails if a global subscriber has already been set.
pub fn init_tracing() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter())
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("setting default subscriber failed: {}", e))?;

    Ok(())
}
