use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging to stderr with environment-based filtering.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug
/// events with `--verbose`. Stdout is reserved for the HTML/JSON output.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
