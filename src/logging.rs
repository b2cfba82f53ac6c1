//! Log output for applications and tests that have no subscriber of their
//! own. Evaluation emits `trace` spans per task, exports emit `debug` events.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`, defaulting to
/// `kumiki=info`.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kumiki=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}
