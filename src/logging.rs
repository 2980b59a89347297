use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` (default `info`), for example
/// `RUST_LOG=spool_tracekit=debug` to see skipped unroutable spools.
///
/// ```no_run
/// spool_tracekit::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Like [`init`] but at debug level, writing through the test harness.
///
/// Safe to call from several tests; only the first call installs a subscriber.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Initialise from the Python side; repeated calls are ignored.
#[cfg(feature = "python")]
pub(crate) fn try_init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
