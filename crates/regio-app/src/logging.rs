use regio_config::logging::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// RUST_LOG wins over the configured level. Logs go to stderr so stdout
/// carries only what the overlay shows.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
