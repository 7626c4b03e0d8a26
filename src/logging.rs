use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter; `RUST_LOG` is read when unset.
pub const ENV_LOG: &str = "IMG2SVG_LOG";

/// Install the stderr log subscriber. `verbose` raises the default level.
pub fn init(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(format!("img2svg={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
