//! Robots command - print robots.txt

use std::path::Path;

use color_eyre::eyre::Result;
use seokit_generator::RobotsGenerator;

use super::load_config;

/// Run the robots command.
pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let robots = RobotsGenerator::new(&config);

    if !robots.is_enabled() {
        tracing::warn!("robots.txt is disabled in configuration");
    }

    println!("{}", robots.generate());
    Ok(())
}
