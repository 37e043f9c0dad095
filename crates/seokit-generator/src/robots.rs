//! Robots.txt generation.
//!
//! Generates the robots.txt document for search engine crawlers.

use seokit_core::Config;
use tracing::debug;

/// Robots.txt generator.
#[derive(Debug, Clone)]
pub struct RobotsGenerator {
    enabled: bool,
    route: String,
    allow: Vec<String>,
    disallow: Vec<String>,
    sitemap_url: Option<String>,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.robots.enabled,
            route: config.robots.route.clone(),
            allow: config.robots.allow.clone(),
            disallow: config.robots.disallow.clone(),
            sitemap_url: config.robots_sitemap_url(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Route the document is served under, relative to the site root.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Generate robots.txt.
    ///
    /// Allow lines come before disallow lines, followed by a blank line and
    /// the `Sitemap:` line when a sitemap URL is known.
    #[must_use]
    pub fn generate(&self) -> String {
        debug!(
            allow = self.allow.len(),
            disallow = self.disallow.len(),
            "generating robots.txt"
        );

        let mut lines = vec!["User-agent: *".to_string()];

        for path in &self.allow {
            lines.push(format!("Allow: {path}"));
        }

        for path in &self.disallow {
            lines.push(format!("Disallow: {path}"));
        }

        lines.push(String::new());
        if let Some(url) = &self.sitemap_url {
            lines.push(format!("Sitemap: {url}"));
        }

        lines.join("\n")
    }
}
