//! SEO configuration management.

use std::{collections::BTreeMap, fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for Seokit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application identity used as a fallback for several defaults.
    #[serde(default)]
    pub app: AppConfig,

    /// Default meta tag values.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Open Graph defaults.
    #[serde(default)]
    pub open_graph: OpenGraphConfig,

    /// Twitter Card defaults.
    #[serde(default)]
    pub twitter: TwitterConfig,

    /// JSON-LD settings.
    #[serde(default)]
    pub json_ld: JsonLdConfig,

    /// Sitemap settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Robots.txt settings.
    #[serde(default)]
    pub robots: RobotsConfig,

    /// Per-entity override storage settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Trailing slash policy for canonical URLs.
    #[serde(default)]
    pub trailing_slash: TrailingSlash,
}

/// Application identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Absolute base URL (e.g., "https://example.com").
    #[serde(default = "default_app_url")]
    pub url: String,
}

/// Default meta tag values used when a page sets nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Page title. Falls back to `app.name`.
    #[serde(default)]
    pub title: Option<String>,

    /// Separator between title and suffix.
    #[serde(default = "default_title_separator")]
    pub title_separator: String,

    /// Title suffix. Falls back to `app.name`.
    #[serde(default)]
    pub title_suffix: Option<String>,

    /// Meta description.
    #[serde(default)]
    pub description: String,

    /// Meta keywords.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Robots directive.
    #[serde(default = "default_robots")]
    pub robots: String,

    /// Canonical URL. The current request URL is used when unset.
    #[serde(default)]
    pub canonical: Option<String>,

    /// Author name.
    #[serde(default)]
    pub author: String,
}

/// Open Graph defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenGraphConfig {
    /// Object type (`website`, `article`, ...).
    #[serde(rename = "type", default = "default_og_type")]
    pub og_type: String,

    /// Site name. Falls back to `app.name`.
    #[serde(default)]
    pub site_name: Option<String>,

    /// Locale.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Default share image.
    #[serde(default)]
    pub image: Option<String>,

    /// Default image width in pixels.
    #[serde(default = "default_image_width")]
    pub image_width: Option<u32>,

    /// Default image height in pixels.
    #[serde(default = "default_image_height")]
    pub image_height: Option<u32>,
}

/// Twitter Card defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Card type: summary, summary_large_image, app, player.
    #[serde(default = "default_twitter_card")]
    pub card: String,

    /// Site @username.
    #[serde(default)]
    pub site: Option<String>,

    /// Creator @username.
    #[serde(default)]
    pub creator: Option<String>,
}

/// JSON-LD settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonLdConfig {
    /// Whether JSON-LD blocks are rendered.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Organization info shared by several schema types.
    #[serde(default)]
    pub organization: OrganizationConfig,
}

/// Organization identity for JSON-LD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// Organization name. Falls back to `app.name`.
    #[serde(default)]
    pub name: Option<String>,

    /// Organization URL. Falls back to `app.url`.
    #[serde(default)]
    pub url: Option<String>,

    /// Logo URL.
    #[serde(default)]
    pub logo: Option<String>,
}

/// Sitemap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Whether the sitemap route is served.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Route path, relative to the site root.
    #[serde(default = "default_sitemap_route")]
    pub route: String,

    /// Whether generated XML is cached.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Cache lifetime in seconds.
    #[serde(default = "default_cache_duration")]
    pub cache_duration: u64,

    /// Change frequency used when an entry sets none.
    #[serde(default = "default_frequency")]
    pub default_frequency: ChangeFreq,

    /// Priority used when an entry sets none.
    #[serde(default = "default_priority")]
    pub default_priority: f64,

    /// Maximum number of URLs emitted.
    #[serde(default = "default_max_urls")]
    pub max_urls: usize,

    /// Static URL entries.
    #[serde(default)]
    pub urls: Vec<SitemapUrlConfig>,

    /// Collection-backed URL sources.
    #[serde(default)]
    pub sources: Vec<SitemapSourceConfig>,
}

/// A static sitemap entry declared in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapUrlConfig {
    /// Absolute or site-relative location.
    pub loc: String,

    /// Last modification timestamp.
    #[serde(default)]
    pub lastmod: Option<String>,

    /// Change frequency.
    #[serde(default)]
    pub changefreq: Option<ChangeFreq>,

    /// Priority (0.0 to 1.0).
    #[serde(default)]
    pub priority: Option<f64>,
}

/// A collection-backed sitemap source declared in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapSourceConfig {
    /// Collection identifier handed to the resolver.
    pub collection: String,

    /// Route template with one `{placeholder}`.
    pub route: String,

    /// Record field substituted into the route.
    #[serde(default = "default_route_key")]
    pub route_key: String,

    /// Record field holding the last modification time.
    #[serde(default = "default_lastmod_field")]
    pub lastmod_field: Option<String>,

    /// Change frequency for every entry of this source.
    #[serde(default)]
    pub changefreq: Option<ChangeFreq>,

    /// Priority for every entry of this source.
    #[serde(default)]
    pub priority: Option<f64>,

    /// Equality filter: a record is kept when every field matches.
    #[serde(rename = "where", default)]
    pub filter: BTreeMap<String, serde_json::Value>,
}

/// Robots.txt settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Whether the robots route is served.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Route path, relative to the site root.
    #[serde(default = "default_robots_route")]
    pub route: String,

    /// Allowed paths.
    #[serde(default = "default_allow")]
    pub allow: Vec<String>,

    /// Disallowed paths.
    #[serde(default)]
    pub disallow: Vec<String>,

    /// Explicit sitemap URL. Derived from the sitemap route when unset.
    #[serde(default)]
    pub sitemap_url: Option<String>,
}

/// Per-entity override storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Whether stored overrides are applied.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Table or collection name of the override store.
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

/// Sitemap change frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// The value as written in sitemap XML.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFreq {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(CoreError::InvalidChangeFreq(s.to_string())),
        }
    }
}

/// Trailing slash policy applied to canonical URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingSlash {
    /// Append a slash when missing.
    Add,
    /// Strip trailing slashes.
    Remove,
    /// Leave URLs untouched.
    #[default]
    Unset,
}

impl TrailingSlash {
    /// Normalize a URL according to the policy.
    #[must_use]
    pub fn apply(&self, url: &str) -> String {
        match self {
            Self::Add if !url.ends_with('/') => format!("{url}/"),
            Self::Remove => url.trim_end_matches('/').to_string(),
            _ => url.to_string(),
        }
    }
}

/// Join a base URL and a path with exactly one slash between them.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

// Default value functions
fn default_app_name() -> String {
    "Seokit".to_string()
}

fn default_app_url() -> String {
    "http://localhost".to_string()
}

fn default_title_separator() -> String {
    " | ".to_string()
}

fn default_robots() -> String {
    "index, follow".to_string()
}

fn default_og_type() -> String {
    "website".to_string()
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_image_width() -> Option<u32> {
    Some(1200)
}

fn default_image_height() -> Option<u32> {
    Some(630)
}

fn default_twitter_card() -> String {
    "summary_large_image".to_string()
}

fn default_true() -> bool {
    true
}

fn default_sitemap_route() -> String {
    "sitemap.xml".to_string()
}

fn default_cache_duration() -> u64 {
    3600
}

fn default_frequency() -> ChangeFreq {
    ChangeFreq::Weekly
}

fn default_priority() -> f64 {
    0.5
}

fn default_max_urls() -> usize {
    50_000
}

fn default_route_key() -> String {
    "slug".to_string()
}

fn default_lastmod_field() -> Option<String> {
    Some("updated_at".to_string())
}

fn default_robots_route() -> String {
    "robots.txt".to_string()
}

fn default_allow() -> Vec<String> {
    vec!["/".to_string()]
}

fn default_table_name() -> String {
    "seo_meta".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            url: default_app_url(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            title: None,
            title_separator: default_title_separator(),
            title_suffix: None,
            description: String::new(),
            keywords: Vec::new(),
            robots: default_robots(),
            canonical: None,
            author: String::new(),
        }
    }
}

impl Default for OpenGraphConfig {
    fn default() -> Self {
        Self {
            og_type: default_og_type(),
            site_name: None,
            locale: default_locale(),
            image: None,
            image_width: default_image_width(),
            image_height: default_image_height(),
        }
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            card: default_twitter_card(),
            site: None,
            creator: None,
        }
    }
}

impl Default for JsonLdConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            organization: OrganizationConfig::default(),
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            route: default_sitemap_route(),
            cache_enabled: true,
            cache_duration: default_cache_duration(),
            default_frequency: default_frequency(),
            default_priority: default_priority(),
            max_urls: default_max_urls(),
            urls: Vec::new(),
            sources: Vec::new(),
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            route: default_robots_route(),
            allow: default_allow(),
            disallow: Vec::new(),
            sitemap_url: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            table_name: default_table_name(),
        }
    }
}

impl Config {
    /// Create a configuration with defaults for the given site.
    #[must_use]
    pub fn for_site(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            app: AppConfig {
                name: name.into(),
                url: url.into(),
            },
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, with `SEOKIT__*` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("SEOKIT").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.app.url.is_empty() {
            return Err(CoreError::config("app.url cannot be empty"));
        }

        if self.sitemap.max_urls == 0 {
            return Err(CoreError::config("sitemap.max_urls must be greater than zero"));
        }

        if self.app.url.ends_with('/') {
            tracing::warn!("app.url should not have a trailing slash");
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.app.url, path)
    }

    /// Default page title.
    #[must_use]
    pub fn default_title(&self) -> String {
        self.defaults
            .title
            .clone()
            .unwrap_or_else(|| self.app.name.clone())
    }

    /// Title suffix appended after the separator.
    #[must_use]
    pub fn title_suffix(&self) -> String {
        self.defaults
            .title_suffix
            .clone()
            .unwrap_or_else(|| self.app.name.clone())
    }

    /// Open Graph site name.
    #[must_use]
    pub fn og_site_name(&self) -> String {
        self.open_graph
            .site_name
            .clone()
            .unwrap_or_else(|| self.app.name.clone())
    }

    /// Organization name for JSON-LD.
    #[must_use]
    pub fn organization_name(&self) -> String {
        self.json_ld
            .organization
            .name
            .clone()
            .unwrap_or_else(|| self.app.name.clone())
    }

    /// Organization URL for JSON-LD.
    #[must_use]
    pub fn organization_url(&self) -> String {
        self.json_ld
            .organization
            .url
            .clone()
            .unwrap_or_else(|| self.app.url.clone())
    }

    /// Sitemap URL advertised in robots.txt, if any.
    #[must_use]
    pub fn robots_sitemap_url(&self) -> Option<String> {
        match &self.robots.sitemap_url {
            Some(url) if !url.is_empty() => Some(url.clone()),
            _ if self.sitemap.enabled => Some(self.url_for(&self.sitemap.route)),
            _ => None,
        }
    }
}
