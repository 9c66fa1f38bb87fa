use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "DISPENSARY_LOG";

/// Install the global fmt subscriber on stderr, so CLI JSON on stdout stays clean.
/// Filter comes from `DISPENSARY_LOG`, default `info`.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}
