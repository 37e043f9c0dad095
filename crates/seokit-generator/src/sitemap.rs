//! Sitemap generation.
//!
//! Aggregates manually added entries and collection-backed sources into an XML
//! sitemap. Sources are resolved only while building; the result is capped at
//! `max_urls` and optionally cached.

use std::{fmt, sync::Arc, time::Duration};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use seokit_core::{
    ChangeFreq, Config, join_url,
    config::{SitemapSourceConfig, SitemapUrlConfig},
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cache::{MemoryCache, SitemapCache},
    source::{CollectionResolver, MemoryResolver, Record, SourceError},
};

/// Cache key under which generated XML is stored.
pub const CACHE_KEY: &str = "seokit:sitemap";

/// Sitemap protocol namespace.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Bytes escaped in a route value. The value fills one path segment, so `/` is
/// escaped as well.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// A source's collection could not be resolved.
    #[error("failed to resolve collection {collection:?}: {source}")]
    Collection {
        collection: String,
        #[source]
        source: SourceError,
    },

    /// A route template could not be expanded for a record.
    #[error("cannot expand route {route:?}: {message}")]
    RouteExpansion { route: String, message: String },

    /// A last-modified value is not a recognizable timestamp.
    #[error("invalid timestamp in {field}: {value}")]
    InvalidTimestamp { field: String, value: String },
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// URL location.
    pub loc: String,

    /// Last modification time.
    pub lastmod: Option<DateTime<FixedOffset>>,

    /// Change frequency.
    pub changefreq: Option<ChangeFreq>,

    /// Priority (0.0 to 1.0).
    pub priority: Option<f64>,
}

impl SitemapEntry {
    #[must_use]
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }

    #[must_use]
    pub fn with_lastmod(mut self, lastmod: impl Into<DateTime<FixedOffset>>) -> Self {
        self.lastmod = Some(lastmod.into());
        self
    }

    #[must_use]
    pub fn with_changefreq(mut self, changefreq: ChangeFreq) -> Self {
        self.changefreq = Some(changefreq);
        self
    }

    /// Set the priority, clamped into `[0.0, 1.0]`. NaN clears it.
    #[must_use]
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = normalize_priority(priority);
        self
    }
}

/// Clamp a priority into the sitemap protocol's range.
fn normalize_priority(priority: f64) -> Option<f64> {
    if priority.is_nan() {
        None
    } else {
        Some(priority.clamp(0.0, 1.0))
    }
}

/// Predicate narrowing the records of a source.
pub type RecordFilter = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Lazy descriptor of URLs derived from a collection.
///
/// Nothing is read until the sitemap is built.
#[derive(Clone)]
pub struct SitemapSource {
    collection: String,
    route: String,
    route_key: String,
    lastmod_field: Option<String>,
    changefreq: Option<ChangeFreq>,
    priority: Option<f64>,
    filter: Option<RecordFilter>,
}

impl SitemapSource {
    /// Describe a source over `collection` whose URLs follow `route`.
    ///
    /// `route` holds one `{placeholder}` replaced by the record's route key
    /// (`slug` unless changed). Relative routes are resolved against `app.url`.
    #[must_use]
    pub fn new(collection: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            route: route.into(),
            route_key: "slug".to_string(),
            lastmod_field: Some("updated_at".to_string()),
            changefreq: None,
            priority: None,
            filter: None,
        }
    }

    /// Build a source from its configuration block. The `where` map becomes an
    /// equality filter.
    #[must_use]
    pub fn from_config(config: &SitemapSourceConfig) -> Self {
        let mut source = Self::new(&config.collection, &config.route).route_key(&config.route_key);
        // TOML has no null: an empty field name disables `<lastmod>`.
        source.lastmod_field = config
            .lastmod_field
            .clone()
            .filter(|field| !field.trim().is_empty());
        source.changefreq = config.changefreq;
        source.priority = config.priority.and_then(normalize_priority);

        if !config.filter.is_empty() {
            let expected = config.filter.clone();
            source = source.filter(move |record| {
                expected
                    .iter()
                    .all(|(field, value)| record.get(field) == Some(value))
            });
        }

        source
    }

    #[must_use]
    pub fn route_key(mut self, field: impl Into<String>) -> Self {
        self.route_key = field.into();
        self
    }

    #[must_use]
    pub fn lastmod_field(mut self, field: impl Into<String>) -> Self {
        self.lastmod_field = Some(field.into());
        self
    }

    /// Emit entries without `<lastmod>`.
    #[must_use]
    pub fn without_lastmod(mut self) -> Self {
        self.lastmod_field = None;
        self
    }

    #[must_use]
    pub fn changefreq(mut self, changefreq: ChangeFreq) -> Self {
        self.changefreq = Some(changefreq);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: f64) -> Self {
        self.priority = normalize_priority(priority);
        self
    }

    /// Keep only records for which `predicate` returns true.
    #[must_use]
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(predicate));
        self
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    #[must_use]
    pub fn get_route_key(&self) -> &str {
        &self.route_key
    }

    #[must_use]
    pub fn get_lastmod_field(&self) -> Option<&str> {
        self.lastmod_field.as_deref()
    }

    #[must_use]
    pub fn get_changefreq(&self) -> Option<ChangeFreq> {
        self.changefreq
    }

    #[must_use]
    pub fn get_priority(&self) -> Option<f64> {
        self.priority
    }

    fn matches(&self, record: &Record) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(record))
    }

    fn expand_route(&self, record: &Record) -> Result<String> {
        let expansion_error = |message: String| SitemapError::RouteExpansion {
            route: self.route.clone(),
            message,
        };

        let value = match record.get(&self.route_key) {
            Some(Value::String(s)) if !s.is_empty() => {
                utf8_percent_encode(s, PATH_SEGMENT).to_string()
            }
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(expansion_error(format!(
                    "field {:?} is not a non-empty string or number: {other}",
                    self.route_key
                )));
            }
            None => {
                return Err(expansion_error(format!(
                    "record has no field {:?}",
                    self.route_key
                )));
            }
        };

        let start = self
            .route
            .find('{')
            .ok_or_else(|| expansion_error("no {placeholder} in route template".to_string()))?;
        let end = self.route[start..]
            .find('}')
            .map(|offset| start + offset)
            .ok_or_else(|| expansion_error("unclosed { in route template".to_string()))?;

        Ok(format!(
            "{}{}{}",
            &self.route[..start],
            value,
            &self.route[end + 1..]
        ))
    }
}

impl fmt::Debug for SitemapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SitemapSource")
            .field("collection", &self.collection)
            .field("route", &self.route)
            .field("route_key", &self.route_key)
            .field("lastmod_field", &self.lastmod_field)
            .field("changefreq", &self.changefreq)
            .field("priority", &self.priority)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// Parse a timestamp as RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or `YYYY-MM-DD`.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc().fixed_offset());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Read a record's last-modified field. Missing, null and empty values yield `None`.
fn record_lastmod(record: &Record, field: &str) -> Result<Option<DateTime<FixedOffset>>> {
    let invalid = |value: &Value| SitemapError::InvalidTimestamp {
        field: field.to_string(),
        value: value.to_string(),
    };

    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value @ Value::String(s)) => parse_timestamp(s).map(Some).ok_or_else(|| invalid(value)),
        Some(value @ Value::Number(n)) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .map(|dt| Some(dt.fixed_offset()))
            .ok_or_else(|| invalid(value)),
        Some(value) => Err(invalid(value)),
    }
}

/// Sitemap builder.
pub struct SitemapBuilder {
    urls: Vec<SitemapEntry>,
    sources: Vec<SitemapSource>,
    cache_enabled: bool,
    cache_duration: Duration,
    max_urls: usize,
    default_changefreq: ChangeFreq,
    default_priority: f64,
    base_url: String,
    cache: Arc<dyn SitemapCache>,
    resolver: Arc<dyn CollectionResolver>,
}

impl SitemapBuilder {
    /// Create an empty builder with an in-memory cache and no collections.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let sitemap = &config.sitemap;
        Self {
            urls: Vec::new(),
            sources: Vec::new(),
            cache_enabled: sitemap.cache_enabled,
            cache_duration: Duration::from_secs(sitemap.cache_duration),
            max_urls: sitemap.max_urls,
            default_changefreq: sitemap.default_frequency,
            default_priority: sitemap.default_priority,
            base_url: config.app.url.clone(),
            cache: Arc::new(MemoryCache::new()),
            resolver: Arc::new(MemoryResolver::new()),
        }
    }

    /// Create a builder holding the URLs and sources declared in configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Self::new(config);

        for url in &config.sitemap.urls {
            let entry = builder.entry_from_config(url)?;
            builder.add_entry(entry);
        }

        for source in &config.sitemap.sources {
            builder.add_source(SitemapSource::from_config(source));
        }

        Ok(builder)
    }

    /// Use a different cache backend.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn SitemapCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Use a different collection resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn CollectionResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn cache_enabled(&mut self, enabled: bool) -> &mut Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn cache_duration(&mut self, duration: Duration) -> &mut Self {
        self.cache_duration = duration;
        self
    }

    pub fn max_urls(&mut self, max_urls: usize) -> &mut Self {
        self.max_urls = max_urls;
        self
    }

    /// Append one URL. Unset frequency and priority take the configured defaults.
    pub fn add(
        &mut self,
        loc: impl Into<String>,
        lastmod: Option<DateTime<FixedOffset>>,
        changefreq: Option<ChangeFreq>,
        priority: Option<f64>,
    ) -> &mut Self {
        self.add_entry(SitemapEntry {
            loc: loc.into(),
            lastmod,
            changefreq,
            priority: priority.and_then(normalize_priority),
        })
    }

    /// Append a prepared entry, filling unset frequency and priority from defaults.
    pub fn add_entry(&mut self, mut entry: SitemapEntry) -> &mut Self {
        entry.changefreq.get_or_insert(self.default_changefreq);
        if entry.priority.is_none() {
            entry.priority = normalize_priority(self.default_priority);
        }
        self.urls.push(entry);
        self
    }

    /// Register a collection-backed source. Unset frequency and priority take the
    /// configured defaults now; the collection is read at build time.
    pub fn add_source(&mut self, mut source: SitemapSource) -> &mut Self {
        source.changefreq.get_or_insert(self.default_changefreq);
        if source.priority.is_none() {
            source.priority = normalize_priority(self.default_priority);
        }
        self.sources.push(source);
        self
    }

    /// Manually added entries, in insertion order.
    #[must_use]
    pub fn urls(&self) -> &[SitemapEntry] {
        &self.urls
    }

    /// Registered sources, in registration order.
    #[must_use]
    pub fn sources(&self) -> &[SitemapSource] {
        &self.sources
    }

    /// Generate sitemap XML, served from the cache when a fresh copy exists.
    ///
    /// Cache failures are logged and treated as misses.
    pub fn generate(&self) -> Result<String> {
        if !self.cache_enabled {
            return self.build();
        }

        match self.cache.get(CACHE_KEY) {
            Ok(Some(xml)) => {
                debug!("sitemap cache hit");
                return Ok(xml);
            }
            Ok(None) => debug!("sitemap cache miss"),
            Err(e) => warn!(error = %e, "sitemap cache read failed, rebuilding"),
        }

        let xml = self.build()?;

        if let Err(e) = self.cache.put(CACHE_KEY, &xml, self.cache_duration) {
            warn!(error = %e, "sitemap cache write failed");
        }

        Ok(xml)
    }

    /// Drop the cached sitemap. The next [`generate`](Self::generate) rebuilds.
    pub fn clear_cache(&self) {
        if let Err(e) = self.cache.forget(CACHE_KEY) {
            warn!(error = %e, "sitemap cache clear failed");
        }
    }

    /// Build sitemap XML, bypassing the cache.
    pub fn build(&self) -> Result<String> {
        let entries = self.entries()?;
        debug!(count = entries.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NAMESPACE}">"#));
        xml.push('\n');

        for entry in &entries {
            xml.push_str(&url_to_xml(entry));
        }

        xml.push_str("</urlset>");

        Ok(xml)
    }

    /// Aggregate manual entries then each source's entries, capped at `max_urls`.
    pub fn entries(&self) -> Result<Vec<SitemapEntry>> {
        let mut all = self.urls.clone();

        for source in &self.sources {
            let records =
                self.resolver
                    .resolve(&source.collection)
                    .map_err(|e| SitemapError::Collection {
                        collection: source.collection.clone(),
                        source: e,
                    })?;

            let before = all.len();
            for record in records.iter().filter(|record| source.matches(record)) {
                all.push(self.source_entry(source, record)?);
            }

            debug!(
                collection = %source.collection,
                count = all.len() - before,
                "expanded sitemap source"
            );
        }

        if all.len() > self.max_urls {
            debug!(
                dropped = all.len() - self.max_urls,
                max_urls = self.max_urls,
                "truncating sitemap"
            );
            all.truncate(self.max_urls);
        }

        Ok(all)
    }

    fn source_entry(&self, source: &SitemapSource, record: &Record) -> Result<SitemapEntry> {
        let loc = self.absolute(source.expand_route(record)?);

        let lastmod = match &source.lastmod_field {
            Some(field) => record_lastmod(record, field)?,
            None => None,
        };

        Ok(SitemapEntry {
            loc,
            lastmod,
            changefreq: source.changefreq,
            priority: source.priority,
        })
    }

    fn entry_from_config(&self, url: &SitemapUrlConfig) -> Result<SitemapEntry> {
        let lastmod = match url.lastmod.as_deref() {
            Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| {
                SitemapError::InvalidTimestamp {
                    field: format!("sitemap.urls[{}].lastmod", url.loc),
                    value: raw.to_string(),
                }
            })?),
            None => None,
        };

        Ok(SitemapEntry {
            loc: self.absolute(url.loc.clone()),
            lastmod,
            changefreq: url.changefreq,
            priority: url.priority.and_then(normalize_priority),
        })
    }

    fn absolute(&self, loc: String) -> String {
        if loc.contains("://") {
            loc
        } else {
            join_url(&self.base_url, &loc)
        }
    }
}

impl fmt::Debug for SitemapBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SitemapBuilder")
            .field("urls", &self.urls.len())
            .field("sources", &self.sources)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_duration", &self.cache_duration)
            .field("max_urls", &self.max_urls)
            .finish_non_exhaustive()
    }
}

/// Convert a URL entry to XML.
fn url_to_xml(entry: &SitemapEntry) -> String {
    let mut xml = String::from("  <url>\n");

    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));

    if let Some(lastmod) = &entry.lastmod {
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            lastmod.to_rfc3339_opts(SecondsFormat::Secs, false)
        ));
    }

    if let Some(changefreq) = &entry.changefreq {
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            changefreq.as_str()
        ));
    }

    if let Some(priority) = entry.priority {
        xml.push_str(&format!(
            "    <priority>{}</priority>\n",
            format_priority(priority)
        ));
    }

    xml.push_str("  </url>\n");
    xml
}

/// One decimal place, rounding halves away from zero (0.45 renders as 0.5).
fn format_priority(priority: f64) -> String {
    // Pre-round so representation error (0.35 * 10 = 3.4999...) cannot decide the tie.
    let scaled = (priority * 10.0 * 1e9).round() / 1e9;
    format!("{:.1}", scaled.round() / 10.0)
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
