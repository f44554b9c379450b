use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG` wins; otherwise everything at info and above is printed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}
