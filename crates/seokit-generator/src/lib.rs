//! Seokit Generator Library
//!
//! Builders for the SEO surface of a site.
//!
//! # Modules
//!
//! - [`meta`] - Title, description, canonical and other primary meta tags
//! - [`open_graph`] - Open Graph tags with fallback to the primary meta
//! - [`twitter`] - Twitter Card tags with fallback to Open Graph and meta
//! - [`json_ld`] - JSON-LD structured data blocks
//! - [`sitemap`] - XML sitemap from manual entries and collection sources
//! - [`source`] - Collection resolution for sitemap sources
//! - [`cache`] - Sitemap output cache
//! - [`robots`] - robots.txt generation
//! - [`overrides`] - Per-entity override records and their store
//! - [`manager`] - Composition of all builders for one page
//! - [`html`] - Escaping and tag helpers

pub mod cache;
pub mod html;
pub mod json_ld;
pub mod manager;
pub mod meta;
pub mod open_graph;
pub mod overrides;
pub mod robots;
pub mod sitemap;
pub mod source;
pub mod twitter;

pub use cache::{MemoryCache, SitemapCache};
pub use json_ld::{Article, Breadcrumb, JsonLdBuilder, LocalBusiness, Product, Schema};
pub use manager::SeoManager;
pub use meta::{Keywords, MetaTagBuilder};
pub use open_graph::OpenGraphBuilder;
pub use overrides::{EntityKey, HasSeo, MemoryOverrideStore, OverrideStore, SeoFields, SeoMeta};
pub use robots::RobotsGenerator;
pub use sitemap::{SitemapBuilder, SitemapEntry, SitemapError, SitemapSource};
pub use source::{CollectionResolver, JsonDirResolver, MemoryResolver, Record};
pub use twitter::TwitterCardBuilder;
