//! Logging setup for the Besedka binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Events from `crate_name` (the library crate doing the work) and from the binary itself
/// are enabled at `default_log_level`. `RUST_LOG` takes precedence when it is set.
///
/// # Examples
///
/// ```no_run
/// use besedka_shared::logger::setup_logger;
///
/// setup_logger("besedka_server", "besedka-server", "info");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(crate_name, binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directives(crate_name: &str, binary_name: &str, level: &str) -> String {
    format!(
        "{}={},{}={}",
        crate_name.replace('-', "_"),
        level,
        binary_name.replace('-', "_"),
        level
    )
}
