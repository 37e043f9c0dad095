//! Serve command - HTTP server for sitemap.xml and robots.txt

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use seokit_generator::RobotsGenerator;
use tokio::net::TcpListener;

use super::{load_config, sitemap_builder};
use crate::server::{AppState, create_router};

/// Run the serve command.
pub async fn run(config_path: &Path, data_dir: &Path, host: &str, port: u16) -> Result<()> {
    tracing::info!(?config_path, ?data_dir, port, "Starting server");

    let config = load_config(config_path)?;
    let sitemap = sitemap_builder(&config, data_dir)?;
    let robots = RobotsGenerator::new(&config);

    let app = create_router(&config, AppState::new(sitemap, robots));
    let addr = format!("{host}:{port}");

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Server running at http://{addr}");
    if config.sitemap.enabled {
        println!("  Sitemap: http://{addr}/{}", config.sitemap.route.trim_start_matches('/'));
    }
    if config.robots.enabled {
        println!("  Robots:  http://{addr}/{}", config.robots.route.trim_start_matches('/'));
    }
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}
