//! Logging setup for the `pfor32` binary, using `tracing_subscriber`.
//!
//! Log output goes to stderr, so it never mixes with data written to stdout.
//! The filter defaults to [`DEFAULT_DIRECTIVES`] and can be overridden via `RUST_LOG`.
//!
//! The codec opens no spans and every run is a single command, so the JSON lines
//! carry only timestamp, level, message and fields: no span lists, no source locations.

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// filter used when `RUST_LOG` is not set
pub const DEFAULT_DIRECTIVES: &str = "warn,pfor32=info";

/// Sets up logging, either human readable (`pretty == true`) or as JSON lines
pub fn setup_logging(pretty: bool) {
    match pretty {
        true => setup_logging_pretty(),
        false => setup_logging_json(),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

fn setup_logging_json() {
    let main_layer = tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_target(false)
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(std::io::stderr)
        .with_timer(UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(env_filter())
        .with(main_layer)
        .init()
}

fn setup_logging_pretty() {
    let main_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_timer(UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(env_filter())
        .with(main_layer)
        .init()
}
