use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is not set: warnings only, `-v` for request
/// summaries, `-vv` for request composition.
pub fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn default_filter(verbose: u8) -> EnvFilter {
    EnvFilter::new(format!("inventory_console={}", default_level(verbose)))
}

/// Installs the global subscriber, writing to stderr so stdout only carries
/// the output region. A second call is a no-op.
pub fn init(verbose: u8, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .try_init();
}
