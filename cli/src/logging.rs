//! Logging setup for the command line host.
//!
//! Logs go to stderr so draw-call output on stdout stays clean. Set
//! `DEBUG_LOGGING=1` to enable debug output for dodger crates; `RUST_LOG`
//! overrides both.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init(verbose: bool) {
    let debug_logging = verbose || std::env::var("DEBUG_LOGGING").is_ok();

    let filter_directive = if debug_logging {
        "info,dodger_core=debug,dodger_cli=debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();

    tracing::debug!(debug_logging, "Logging initialized");
}
