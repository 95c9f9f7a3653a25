//! Host side of the Karangos record manager.
//!
//! `karangos-core` components decide what should happen; this crate makes it
//! happen: it loads the configuration, performs HTTP round-trips, and keeps
//! the route, notification and prompt state a UI shell renders.

pub mod config;
pub mod session;
pub mod transport;

pub use config::{AppConfig, ConfigError, Theme, ThemeMode};
pub use session::Session;
pub use transport::{Transport, TransportError, UreqTransport};

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
