//! SEO manager.
//!
//! Owns one builder of each kind and renders the complete head block.

use seokit_core::Config;
use serde_json::{Map, Value};

use crate::{
    html::TAG_SEPARATOR,
    json_ld::JsonLdBuilder,
    meta::{Keywords, MetaTagBuilder},
    open_graph::OpenGraphBuilder,
    overrides::SeoMeta,
    sitemap::SitemapBuilder,
    twitter::TwitterCardBuilder,
};

/// Composition root over the meta, Open Graph, Twitter, JSON-LD and sitemap
/// builders of one request.
#[derive(Debug)]
pub struct SeoManager {
    meta: MetaTagBuilder,
    open_graph: OpenGraphBuilder,
    twitter: TwitterCardBuilder,
    json_ld: JsonLdBuilder,
    sitemap: SitemapBuilder,
    overrides_enabled: bool,
}

impl SeoManager {
    /// Create a manager for the page at `current_url`.
    #[must_use]
    pub fn new(config: &Config, current_url: impl Into<String>) -> Self {
        let current_url = current_url.into();
        Self {
            meta: MetaTagBuilder::new(config, current_url.clone()),
            open_graph: OpenGraphBuilder::new(config, current_url.clone()),
            twitter: TwitterCardBuilder::new(config),
            json_ld: JsonLdBuilder::new(config, current_url),
            sitemap: SitemapBuilder::new(config),
            overrides_enabled: config.database.enabled,
        }
    }

    /// Replace the sitemap builder, e.g. one built with
    /// [`SitemapBuilder::from_config`] and a real resolver.
    #[must_use]
    pub fn with_sitemap(mut self, sitemap: SitemapBuilder) -> Self {
        self.sitemap = sitemap;
        self
    }

    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.meta.title(title);
        self
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.meta.description(description);
        self
    }

    pub fn keywords(&mut self, keywords: impl Into<Keywords>) -> &mut Self {
        self.meta.keywords(keywords);
        self
    }

    pub fn canonical(&mut self, url: impl Into<String>) -> &mut Self {
        self.meta.canonical(url);
        self
    }

    pub fn robots(&mut self, robots: impl Into<String>) -> &mut Self {
        self.meta.robots(robots);
        self
    }

    pub fn no_index(&mut self) -> &mut Self {
        self.meta.no_index();
        self
    }

    pub fn author(&mut self, author: impl Into<String>) -> &mut Self {
        self.meta.author(author);
        self
    }

    /// Set the share image on both Open Graph and the Twitter card.
    pub fn image(
        &mut self,
        url: impl Into<String>,
        width: Option<u32>,
        height: Option<u32>,
        alt: Option<&str>,
    ) -> &mut Self {
        let url = url.into();
        self.open_graph.image(url.clone(), width, height, alt);
        self.twitter.image(url, alt);
        self
    }

    pub fn meta(&mut self) -> &mut MetaTagBuilder {
        &mut self.meta
    }

    pub fn open_graph(&mut self) -> &mut OpenGraphBuilder {
        &mut self.open_graph
    }

    pub fn twitter(&mut self) -> &mut TwitterCardBuilder {
        &mut self.twitter
    }

    pub fn json_ld(&mut self) -> &mut JsonLdBuilder {
        &mut self.json_ld
    }

    pub fn sitemap(&mut self) -> &mut SitemapBuilder {
        &mut self.sitemap
    }

    /// Whether per-entity overrides are applied.
    #[must_use]
    pub fn overrides_enabled(&self) -> bool {
        self.overrides_enabled
    }

    /// Render all head tags: meta, Open Graph, Twitter, then JSON-LD.
    #[must_use]
    pub fn render_head(&self) -> String {
        let blocks = [
            self.meta.render(),
            self.open_graph.render(&self.meta),
            self.twitter.render(&self.meta, &self.open_graph),
            self.json_ld.render(),
        ];

        blocks
            .iter()
            .filter(|block| !block.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(TAG_SEPARATOR)
    }

    /// Render only the JSON-LD script blocks.
    #[must_use]
    pub fn render_json_ld(&self) -> String {
        self.json_ld.render()
    }

    /// Apply a flat map of known keys: `title`, `description`, `keywords`,
    /// `canonical`, `robots`, `author`, `image`, `og_type` and `twitter_card`.
    ///
    /// Unknown keys and values of the wrong type are ignored. `keywords` may be a
    /// comma-separated string or an array of strings.
    pub fn from_map(&mut self, data: &Map<String, Value>) -> &mut Self {
        let text = |key: &str| data.get(key).and_then(Value::as_str);

        if let Some(title) = text("title") {
            self.title(title);
        }
        if let Some(description) = text("description") {
            self.description(description);
        }
        match data.get("keywords") {
            Some(Value::String(s)) => {
                self.keywords(s.as_str());
            }
            Some(Value::Array(items)) => {
                let items: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                self.keywords(items);
            }
            _ => {}
        }
        if let Some(canonical) = text("canonical") {
            self.canonical(canonical);
        }
        if let Some(robots) = text("robots") {
            self.robots(robots);
        }
        if let Some(author) = text("author") {
            self.author(author);
        }
        if let Some(image) = text("image") {
            self.image(image, None, None, None);
        }
        if let Some(og_type) = text("og_type") {
            self.open_graph.og_type(og_type);
        }
        if let Some(card) = text("twitter_card") {
            self.twitter.card(card);
        }

        self
    }

    /// Apply a stored override record. Absent fields leave current values alone.
    pub fn apply_overrides(&mut self, record: &SeoMeta) -> &mut Self {
        let fields = &record.fields;

        if let Some(title) = &fields.title {
            self.meta.title(title.as_str());
        }
        if let Some(description) = &fields.description {
            self.meta.description(description.as_str());
        }
        if let Some(keywords) = &fields.keywords {
            self.meta.keywords(keywords.clone());
        }
        if let Some(canonical) = &fields.canonical {
            self.meta.canonical(canonical.as_str());
        }
        if let Some(robots) = &fields.robots {
            self.meta.robots(robots.as_str());
        }
        if let Some(author) = &fields.author {
            self.meta.author(author.as_str());
        }

        if let Some(title) = &fields.og_title {
            self.open_graph.title(title.as_str());
        }
        if let Some(description) = &fields.og_description {
            self.open_graph.description(description.as_str());
        }
        if let Some(og_type) = &fields.og_type {
            self.open_graph.og_type(og_type.as_str());
        }
        if let Some(image) = &fields.og_image {
            self.open_graph.image(image.as_str(), None, None, None);
        }

        if let Some(card) = &fields.twitter_card {
            self.twitter.card(card.as_str());
        }
        if let Some(title) = &fields.twitter_title {
            self.twitter.title(title.as_str());
        }
        if let Some(description) = &fields.twitter_description {
            self.twitter.description(description.as_str());
        }
        if let Some(image) = &fields.twitter_image {
            self.twitter.image(image.as_str(), None);
        }

        for schema in fields.json_ld.iter().flatten() {
            self.json_ld.add_schema(schema.clone());
        }

        for (name, value) in fields.custom_meta.iter().flatten() {
            let content = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            self.meta.meta(name.as_str(), content);
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::overrides::{EntityKey, SeoFields};

    fn test_config() -> Config {
        Config::for_site("Acme", "https://example.com")
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_quick_setters_delegate_to_meta() {
        let mut seo = SeoManager::new(&test_config(), "https://example.com/page");
        seo.title("Home")
            .description("Welcome")
            .keywords("a, b")
            .author("Jane")
            .no_index();

        let meta = seo.meta();
        assert_eq!(meta.get_full_title(), "Home | Acme");
        assert_eq!(meta.get_description(), "Welcome");
        assert_eq!(meta.get_keywords(), ["a", "b"]);
        assert_eq!(meta.get_author(), "Jane");
        assert_eq!(meta.get_robots(), "noindex, nofollow");
    }

    #[test]
    fn test_image_fans_out() {
        let mut seo = SeoManager::new(&test_config(), "https://example.com/page");
        seo.image("https://example.com/og.png", None, None, Some("Cover"));

        assert_eq!(seo.open_graph().get_image(), Some("https://example.com/og.png"));

        let head = seo.render_head();
        assert!(head.contains(r#"<meta property="og:image" content="https://example.com/og.png">"#));
        assert!(head.contains(r#"<meta name="twitter:image" content="https://example.com/og.png">"#));
        assert!(head.contains(r#"<meta name="twitter:image:alt" content="Cover">"#));
    }

    #[test]
    fn test_render_head_order() {
        let mut seo = SeoManager::new(&test_config(), "https://example.com/page");
        seo.title("Home");
        seo.json_ld().organization(None, None, None);

        let head = seo.render_head();
        let title = head.find("<title>").unwrap();
        let og = head.find("og:title").unwrap();
        let twitter = head.find("twitter:card").unwrap();
        let json_ld = head.find("application/ld+json").unwrap();

        assert!(title < og && og < twitter && twitter < json_ld);
        assert!(!head.contains("\n    \n"));
    }

    #[test]
    fn test_render_head_without_json_ld() {
        let seo = SeoManager::new(&test_config(), "https://example.com/page");

        let head = seo.render_head();
        assert!(!head.contains("application/ld+json"));
        assert!(seo.render_json_ld().is_empty());
    }

    #[test]
    fn test_from_map() {
        let mut seo = SeoManager::new(&test_config(), "https://example.com/page");
        seo.from_map(&object(json!({
            "title": "Mapped",
            "keywords": ["x", " y "],
            "robots": "noindex",
            "og_type": "article",
            "twitter_card": "summary",
            "image": "https://example.com/i.png",
            "unknown": "ignored",
            "author": 42
        })));

        assert_eq!(seo.meta().get_title(), "Mapped");
        assert_eq!(seo.meta().get_keywords(), ["x", "y"]);
        assert_eq!(seo.meta().get_robots(), "noindex");
        assert_eq!(seo.meta().get_author(), "");
        assert_eq!(seo.open_graph().get_type(), "article");
        assert_eq!(seo.open_graph().get_image(), Some("https://example.com/i.png"));
        assert_eq!(seo.twitter().get_card(), "summary");
    }

    #[test]
    fn test_from_map_replays_override_fields() {
        let fields = SeoFields {
            title: Some("Stored".to_string()),
            description: Some("From the store".to_string()),
            ..SeoFields::default()
        };

        let mut seo = SeoManager::new(&test_config(), "https://example.com/page");
        seo.from_map(&fields.to_map());

        assert_eq!(seo.meta().get_title(), "Stored");
        assert_eq!(seo.meta().get_description(), "From the store");
    }

    #[test]
    fn test_apply_overrides() {
        let record = SeoMeta::new(
            EntityKey::new("post", "1"),
            SeoFields {
                title: Some("Post".to_string()),
                keywords: Some(vec!["rust".to_string()]),
                og_title: Some("OG Post".to_string()),
                twitter_card: Some("summary".to_string()),
                json_ld: Some(vec![object(json!({
                    "@context": "https://schema.org",
                    "@type": "Thing",
                    "name": "Stored"
                }))]),
                custom_meta: Some(object(json!({"theme-color": "#000", "rating": 5}))),
                ..SeoFields::default()
            },
        );

        let mut seo = SeoManager::new(&test_config(), "https://example.com/post/1");
        seo.description("Kept");
        seo.apply_overrides(&record);

        assert_eq!(seo.meta().get_title(), "Post");
        assert_eq!(seo.meta().get_description(), "Kept");
        assert_eq!(seo.meta().get_keywords(), ["rust"]);
        assert_eq!(seo.open_graph().get_title(), Some("OG Post"));
        assert_eq!(seo.twitter().get_card(), "summary");
        assert_eq!(seo.json_ld().schemas().len(), 1);
        assert_eq!(
            seo.meta().get_custom_meta(),
            [
                ("theme-color".to_string(), "#000".to_string()),
                ("rating".to_string(), "5".to_string()),
            ]
        );

        let head = seo.render_head();
        assert!(head.contains(r#"<meta name="twitter:title" content="OG Post">"#));
        assert!(head.contains(r#""@type": "Thing""#));
    }
}
