//! HTTP routes for sitemap.xml and robots.txt

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use seokit_core::Config;
use seokit_generator::{RobotsGenerator, SitemapBuilder, SitemapError};
use tower_http::trace::TraceLayer;

/// Shared state of the server.
#[derive(Clone)]
pub struct AppState {
    /// Sitemap builder; its cache is shared by all requests.
    pub sitemap: Arc<SitemapBuilder>,
    /// robots.txt generator.
    pub robots: Arc<RobotsGenerator>,
}

impl AppState {
    pub fn new(sitemap: SitemapBuilder, robots: RobotsGenerator) -> Self {
        Self {
            sitemap: Arc::new(sitemap),
            robots: Arc::new(robots),
        }
    }
}

/// Handler error.
#[derive(Debug)]
pub enum AppError {
    /// Sitemap generation failed.
    Sitemap(SitemapError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Sitemap(e) => {
                tracing::error!(error = %e, "sitemap generation failed");
                format!("sitemap generation failed: {e}")
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                msg
            }
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}

impl From<SitemapError> for AppError {
    fn from(err: SitemapError) -> Self {
        AppError::Sitemap(err)
    }
}

/// Create the router. Disabled routes are not mounted.
pub fn create_router(config: &Config, state: AppState) -> Router {
    let mut router = Router::new();

    if config.sitemap.enabled {
        router = router.route(&route_path(&config.sitemap.route), get(sitemap_handler));
    }

    if config.robots.enabled {
        router = router.route(&route_path(&config.robots.route), get(robots_handler));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn route_path(route: &str) -> String {
    format!("/{}", route.trim_start_matches('/'))
}

async fn sitemap_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let sitemap = Arc::clone(&state.sitemap);
    let xml = tokio::task::spawn_blocking(move || sitemap.generate())
        .await
        .map_err(|e| AppError::Internal(format!("sitemap task failed: {e}")))??;

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

async fn robots_handler(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.robots.generate(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::Request,
    };
    use seokit_generator::SitemapSource;
    use tower::ServiceExt;

    use super::*;

    fn test_config() -> Config {
        let mut config = Config::for_site("Acme", "https://example.com");
        config.robots.disallow = vec!["/admin".to_string()];
        config
    }

    fn app(config: &Config, sitemap: SitemapBuilder) -> Router {
        create_router(config, AppState::new(sitemap, RobotsGenerator::new(config)))
    }

    async fn get_path(router: Router, path: &str) -> (StatusCode, String, String) {
        let response = router
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_sitemap_route() {
        let config = test_config();
        let mut sitemap = SitemapBuilder::new(&config);
        sitemap.add("https://example.com/", None, None, Some(1.0));

        let (status, content_type, body) = get_path(app(&config, sitemap), "/sitemap.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/xml");
        assert!(body.contains("<loc>https://example.com/</loc>"));
        assert!(body.contains("<priority>1.0</priority>"));
    }

    #[tokio::test]
    async fn test_robots_route() {
        let config = test_config();

        let (status, content_type, body) =
            get_path(app(&config, SitemapBuilder::new(&config)), "/robots.txt").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(
            body,
            "User-agent: *\nAllow: /\nDisallow: /admin\n\nSitemap: https://example.com/sitemap.xml"
        );
    }

    #[tokio::test]
    async fn test_failed_sitemap_is_not_200() {
        let config = test_config();
        let mut sitemap = SitemapBuilder::new(&config);
        sitemap.add_source(SitemapSource::new("missing", "/{slug}"));

        let (status, content_type, body) = get_path(app(&config, sitemap), "/sitemap.xml").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(content_type.starts_with("text/plain"));
        assert!(!body.contains("<urlset"));
    }

    #[tokio::test]
    async fn test_custom_and_disabled_routes() {
        let mut config = test_config();
        config.sitemap.route = "/maps/site.xml".to_string();
        config.robots.enabled = false;

        let router = app(&config, SitemapBuilder::new(&config));
        let (status, _, _) = get_path(router.clone(), "/maps/site.xml").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) = get_path(router.clone(), "/sitemap.xml").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = get_path(router, "/robots.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
