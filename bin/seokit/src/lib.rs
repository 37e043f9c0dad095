//! Seokit CLI Library
//!
//! Command implementations and the HTTP server behind the `seokit` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (serve, sitemap, robots, head, check)
//! - [`server`] - Sitemap and robots.txt routes
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use seokit::cmd;
//!
//! // Print the sitemap of a site
//! cmd::sitemap::run(Path::new("seokit.toml"), Path::new("data")).unwrap();
//! ```

pub mod cmd;
pub mod server;

// Re-export core types for convenience
pub use seokit_core::Config;
pub use seokit_generator::{RobotsGenerator, SeoManager, SitemapBuilder};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// seokit::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
