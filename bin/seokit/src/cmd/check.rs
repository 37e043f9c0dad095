//! Check command - validate configuration and sitemap sources

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use seokit_core::Config;

use super::sitemap_builder;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration and resolves every sitemap source.
pub fn run(config_path: &Path, data_dir: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref cfg) = config {
        println!("\nChecking configuration values...");
        check_config_values(cfg, &mut result);

        if cfg.sitemap.enabled {
            println!("\nChecking sitemap...");
            check_sitemap(cfg, data_dir, &mut result);
        }
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Check configuration values for common issues.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    if !config.app.url.starts_with("http://") && !config.app.url.starts_with("https://") {
        result.add_warning("app.url should start with http:// or https://");
    }

    if config.app.url.ends_with('/') {
        result.add_warning("app.url should not have a trailing slash");
    }

    if config.defaults.description.is_empty() {
        result.add_warning("defaults.description is empty");
    }

    if !(0.0..=1.0).contains(&config.sitemap.default_priority) {
        result.add_warning(format!(
            "sitemap.default_priority {} is outside 0.0..=1.0 and will be clamped",
            config.sitemap.default_priority
        ));
    }

    if config.robots.enabled && config.robots_sitemap_url().is_none() {
        result.add_warning("robots.txt will not advertise a sitemap");
    }

    println!("  ✓ Configuration values checked");
}

/// Resolve every sitemap source and report the URL count.
fn check_sitemap(config: &Config, data_dir: &Path, result: &mut ValidationResult) {
    let builder = match sitemap_builder(config, data_dir) {
        Ok(builder) => builder,
        Err(e) => {
            result.add_error(format!("{e:#}"));
            println!("  ✗ Sitemap configuration invalid");
            return;
        }
    };

    match builder.entries() {
        Ok(entries) => {
            println!(
                "  ✓ {} URL(s): {} manual, {} source(s)",
                entries.len(),
                builder.urls().len(),
                builder.sources().len()
            );
            if entries.len() == config.sitemap.max_urls {
                result.add_warning(format!(
                    "Sitemap reached sitemap.max_urls ({}); extra URLs are dropped",
                    config.sitemap.max_urls
                ));
            }
        }
        Err(e) => {
            result.add_error(format!("Sitemap generation error: {e}"));
            println!("  ✗ Sitemap sources failed to resolve");
        }
    }
}
