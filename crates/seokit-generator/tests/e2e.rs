//! End-to-end tests for Seokit.
//!
//! These tests load a site configuration from disk and exercise the head,
//! sitemap and robots output together.

use std::{fs, path::Path, sync::Arc};

use seokit_core::Config;
use seokit_generator::{
    Breadcrumb, EntityKey, HasSeo, JsonDirResolver, MemoryOverrideStore, RobotsGenerator,
    SeoFields, SeoManager, SitemapBuilder, SitemapSource,
};

const CONFIG: &str = r#"
trailing_slash = "remove"

[app]
name = "Acme"
url = "https://acme.test"

[defaults]
description = "Tools for everyone"
keywords = ["tools", "acme"]

[twitter]
site = "@acme"

[sitemap]
cache_enabled = false
max_urls = 10

[[sitemap.urls]]
loc = "/"
priority = 1.0
changefreq = "daily"

[[sitemap.sources]]
collection = "posts"
route = "/blog/{slug}"
priority = 0.6

[sitemap.sources.where]
published = true

[robots]
disallow = ["/admin"]
"#;

fn write_site(dir: &Path) -> Config {
    let config_path = dir.join("seokit.toml");
    fs::write(&config_path, CONFIG).expect("write config");

    let data = dir.join("data");
    fs::create_dir_all(&data).expect("create data dir");
    fs::write(
        data.join("posts.json"),
        r#"[
            {"slug": "hello-world", "updated_at": "2024-05-01T10:00:00Z", "published": true},
            {"slug": "draft", "updated_at": "2024-05-02T10:00:00Z", "published": false},
            {"slug": "rust-&-seo", "updated_at": 1714557600, "published": true}
        ]"#,
    )
    .expect("write posts");

    Config::load(&config_path).expect("config should load")
}

struct Post {
    slug: &'static str,
}

impl HasSeo for Post {
    fn seo_key(&self) -> EntityKey {
        EntityKey::new("post", self.slug)
    }
}

#[test]
fn test_sitemap_from_config_and_json_collections() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = write_site(dir.path());

    let sitemap = SitemapBuilder::from_config(&config)
        .expect("sitemap builder")
        .with_resolver(Arc::new(JsonDirResolver::new(dir.path().join("data"))));
    let xml = sitemap.generate().expect("sitemap generates");

    assert_eq!(xml.matches("<url>").count(), 3);
    let home = xml.find("<loc>https://acme.test/</loc>").expect("home entry");
    let hello = xml
        .find("<loc>https://acme.test/blog/hello-world</loc>")
        .expect("post entry");
    let escaped = xml
        .find("<loc>https://acme.test/blog/rust-&amp;-seo</loc>")
        .expect("escaped entry");
    assert!(home < hello && hello < escaped);
    assert!(!xml.contains("draft"));
    assert!(xml.contains("<priority>1.0</priority>"));
    assert!(xml.contains("<priority>0.6</priority>"));
    assert!(xml.contains("<changefreq>daily</changefreq>"));
    assert!(xml.contains("<lastmod>2024-05-01T10:00:00+00:00</lastmod>"));
}

#[test]
fn test_sitemap_with_code_registered_source() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = write_site(dir.path());

    let mut sitemap = SitemapBuilder::new(&config)
        .with_resolver(Arc::new(JsonDirResolver::new(dir.path().join("data"))));
    sitemap.add_source(
        SitemapSource::new("posts", "/posts/{slug}")
            .without_lastmod()
            .filter(|record| record.get("slug").and_then(|v| v.as_str()) == Some("draft")),
    );

    let xml = sitemap.generate().expect("sitemap generates");
    assert!(xml.contains("<loc>https://acme.test/posts/draft</loc>"));
    assert!(!xml.contains("<lastmod>"));
}

#[test]
fn test_missing_collection_fails_generation() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = write_site(dir.path());

    let sitemap = SitemapBuilder::from_config(&config)
        .expect("sitemap builder")
        .with_resolver(Arc::new(JsonDirResolver::new(dir.path().join("missing"))));

    assert!(sitemap.generate().is_err());
}

#[test]
fn test_robots_for_site() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = write_site(dir.path());

    assert_eq!(
        RobotsGenerator::new(&config).generate(),
        "User-agent: *\nAllow: /\nDisallow: /admin\n\nSitemap: https://acme.test/sitemap.xml"
    );
}

#[test]
fn test_full_head_with_overrides() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = write_site(dir.path());

    let store = MemoryOverrideStore::new(&config.database);
    let post = Post {
        slug: "hello-world",
    };
    post.save_overrides(
        &store,
        SeoFields {
            title: Some("Hello, World".to_string()),
            og_type: Some("article".to_string()),
            ..SeoFields::default()
        },
    )
    .expect("save overrides");

    let mut seo = SeoManager::new(&config, "https://acme.test/blog/hello-world/");
    seo.image("https://acme.test/cover.png", None, None, Some("Cover"));
    seo.json_ld().breadcrumbs(&[
        Breadcrumb::new("Home", "https://acme.test/"),
        Breadcrumb::current("Hello"),
    ]);
    assert!(post.apply_seo(&store, &mut seo).expect("apply overrides"));

    let head = seo.render_head();

    assert!(head.starts_with("<title>Hello, World | Acme</title>"));
    assert!(head.contains(r#"<meta name="description" content="Tools for everyone">"#));
    assert!(head.contains(r#"<meta name="keywords" content="tools, acme">"#));
    assert!(head.contains(r#"<link rel="canonical" href="https://acme.test/blog/hello-world">"#));
    assert!(head.contains(r#"<meta property="og:type" content="article">"#));
    assert!(head.contains(r#"<meta property="og:image:width" content="1200">"#));
    assert!(head.contains(r#"<meta name="twitter:site" content="@acme">"#));
    assert!(head.contains(r#"<meta name="twitter:title" content="Hello, World">"#));
    assert!(head.contains(r#""@type": "BreadcrumbList""#));
    assert!(head.contains(r#""position": 2"#));
}
