use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Logs go to stderr; stdout is reserved for
/// the redirect URL.
pub fn setup_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
