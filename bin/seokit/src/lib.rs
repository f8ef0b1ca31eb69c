//! seokit CLI Library
//!
//! Command implementations for the `seokit` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (generate, validate, inspect)

pub mod cmd;

pub use seokit_core::{Config, ContentRecord};
pub use seokit_generator::{MetaTagEngine, SitemapGenerator, SitemapRun, ValidationReport};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level(verbose).into()))
        .init();
}

/// Log level for a `-v` count.
pub fn level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}
