use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// Debug mode logs the resolved run parameters and every processed file;
/// otherwise only warnings (such as skipped entries) are shown. Report output
/// goes to stdout and never passes through here.
pub fn init(debug_mode: bool) {
    let env_filter = if debug_mode {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
