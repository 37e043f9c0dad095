//! Sitemap command - print sitemap.xml

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};

use super::{load_config, sitemap_builder};

/// Run the sitemap command.
///
/// Builds the sitemap without the cache and writes it to stdout.
pub fn run(config_path: &Path, data_dir: &Path) -> Result<()> {
    tracing::info!(?config_path, ?data_dir, "Generating sitemap");

    let config = load_config(config_path)?;
    let xml = sitemap_builder(&config, data_dir)?
        .build()
        .wrap_err("Failed to generate sitemap")?;

    println!("{xml}");
    Ok(())
}
