use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber.
///
/// Call once at startup. Filtering follows `RUST_LOG` and defaults to `info`;
/// output goes to stderr so stdout stays free for data.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
