//! Command implementations

pub mod check;
pub mod head;
pub mod robots;
pub mod serve;
pub mod sitemap;

use std::{path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use seokit_core::Config;
use seokit_generator::{JsonDirResolver, SitemapBuilder};

/// Load and validate configuration. `SEOKIT__*` environment variables override
/// file values.
pub fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_with_env(config_path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_path.display()))
}

/// Build the sitemap declared in configuration, resolving collections from
/// `<data_dir>/<collection>.json`.
pub fn sitemap_builder(config: &Config, data_dir: &Path) -> Result<SitemapBuilder> {
    let builder = SitemapBuilder::from_config(config)
        .wrap_err("Invalid sitemap configuration")?
        .with_resolver(Arc::new(JsonDirResolver::new(data_dir)));
    Ok(builder)
}
