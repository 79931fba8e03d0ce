//! Opt-in logging for the transform.
//!
//! ```bash
//! INNER_COMPONENTS_LOG=debug npx bundler build
//! INNER_COMPONENTS_LOG="inner_components_native::visitor=trace" npx bundler build
//! ```
//!
//! Nothing is installed unless `INNER_COMPONENTS_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "INNER_COMPONENTS_LOG";

/// Build an `EnvFilter` from `INNER_COMPONENTS_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_ENV) {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install a stderr subscriber when logging was requested.
///
/// Safe to call repeatedly: the host process may load the addon more than
/// once, and a subscriber installed by someone else wins.
pub fn init_tracing() {
    if std::env::var(LOG_ENV).is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
