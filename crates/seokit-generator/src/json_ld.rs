//! JSON-LD structured data.
//!
//! Each schema is an ordered JSON object rendered in its own
//! `<script type="application/ld+json">` block.

use seokit_core::Config;
use serde::Serialize;
use serde_json::{Map, Value, json, ser::PrettyFormatter};
use tracing::warn;

use crate::html::join_tags;

/// Schema.org context URL.
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// A JSON-LD schema object. Key order is render order.
pub type Schema = Map<String, Value>;

/// Input for [`JsonLdBuilder::article`].
#[derive(Debug, Clone, Default)]
pub struct Article {
    pub headline: String,
    pub author: String,
    pub date_published: Option<String>,
    pub date_modified: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Input for [`JsonLdBuilder::product`].
#[derive(Debug, Clone, Default)]
pub struct Product {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    /// Defaults to `USD` when a price is set.
    pub currency: Option<String>,
    /// Schema.org availability name, e.g. `InStock`.
    pub availability: Option<String>,
}

/// Input for [`JsonLdBuilder::local_business`].
#[derive(Debug, Clone, Default)]
pub struct LocalBusiness {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub opening_hours: Vec<String>,
}

/// One breadcrumb trail item.
#[derive(Debug, Clone)]
pub struct Breadcrumb {
    pub name: String,
    pub url: Option<String>,
}

impl Breadcrumb {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: Some(url.into()),
        }
    }

    /// A crumb without a link, usually the current page.
    pub fn current(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }
}

/// Builder for an ordered list of JSON-LD schemas.
#[derive(Debug, Clone)]
pub struct JsonLdBuilder {
    schemas: Vec<Schema>,
    enabled: bool,
    organization_name: String,
    organization_url: String,
    organization_logo: Option<String>,
    current_url: String,
}

fn base_schema(schema_type: &str) -> Schema {
    let mut schema = Map::new();
    schema.insert("@context".to_string(), Value::from(SCHEMA_CONTEXT));
    schema.insert("@type".to_string(), Value::from(schema_type));
    schema
}

fn insert_opt(schema: &mut Schema, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        schema.insert(key.to_string(), Value::from(value));
    }
}

impl JsonLdBuilder {
    #[must_use]
    pub fn new(config: &Config, current_url: impl Into<String>) -> Self {
        Self {
            schemas: Vec::new(),
            enabled: config.json_ld.enabled,
            organization_name: config.organization_name(),
            organization_url: config.organization_url(),
            organization_logo: config.json_ld.organization.logo.clone(),
            current_url: current_url.into(),
        }
    }

    pub fn enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// Append a caller-supplied schema verbatim.
    pub fn add_schema(&mut self, schema: Schema) -> &mut Self {
        self.schemas.push(schema);
        self
    }

    /// Append an `Organization`. Name and URL default to the configured organization
    /// and are always emitted.
    pub fn organization(
        &mut self,
        name: Option<&str>,
        url: Option<&str>,
        logo: Option<&str>,
    ) -> &mut Self {
        let mut schema = base_schema("Organization");
        schema.insert(
            "name".to_string(),
            Value::from(name.unwrap_or(&self.organization_name)),
        );
        schema.insert(
            "url".to_string(),
            Value::from(url.unwrap_or(&self.organization_url)),
        );
        insert_opt(&mut schema, "logo", logo.or(self.organization_logo.as_deref()));

        self.add_schema(schema)
    }

    /// Append a `WebSite`, with a `SearchAction` when `search_url` is given.
    ///
    /// `search_url` is the query URL prefix, e.g. `https://example.com/search?q=`.
    pub fn website(
        &mut self,
        name: Option<&str>,
        url: Option<&str>,
        search_url: Option<&str>,
    ) -> &mut Self {
        let mut schema = base_schema("WebSite");
        schema.insert(
            "name".to_string(),
            Value::from(name.unwrap_or(&self.organization_name)),
        );
        schema.insert(
            "url".to_string(),
            Value::from(url.unwrap_or(&self.organization_url)),
        );

        if let Some(search_url) = search_url.filter(|s| !s.is_empty()) {
            schema.insert(
                "potentialAction".to_string(),
                json!({
                    "@type": "SearchAction",
                    "target": format!("{search_url}{{search_term_string}}"),
                    "query-input": "required name=search_term_string",
                }),
            );
        }

        self.add_schema(schema)
    }

    /// Append a `WebPage`. The URL defaults to the current request URL.
    pub fn web_page(
        &mut self,
        title: &str,
        description: Option<&str>,
        url: Option<&str>,
    ) -> &mut Self {
        let mut schema = base_schema("WebPage");
        schema.insert("name".to_string(), Value::from(title));
        schema.insert(
            "url".to_string(),
            Value::from(url.unwrap_or(&self.current_url)),
        );
        insert_opt(&mut schema, "description", description);

        self.add_schema(schema)
    }

    pub fn article(&mut self, article: Article) -> &mut Self {
        let mut schema = base_schema("Article");
        schema.insert("headline".to_string(), Value::from(article.headline));
        schema.insert(
            "author".to_string(),
            json!({ "@type": "Person", "name": article.author }),
        );
        insert_opt(&mut schema, "datePublished", article.date_published.as_deref());
        insert_opt(&mut schema, "dateModified", article.date_modified.as_deref());
        insert_opt(&mut schema, "image", article.image.as_deref());
        insert_opt(&mut schema, "description", article.description.as_deref());

        self.add_schema(schema)
    }

    /// Append a `BreadcrumbList`. Positions start at 1 in list order.
    pub fn breadcrumbs(&mut self, items: &[Breadcrumb]) -> &mut Self {
        let list: Vec<Value> = items
            .iter()
            .enumerate()
            .map(|(index, crumb)| {
                let mut item = Map::new();
                item.insert("@type".to_string(), Value::from("ListItem"));
                item.insert("position".to_string(), Value::from(index + 1));
                item.insert("name".to_string(), Value::from(crumb.name.as_str()));
                insert_opt(&mut item, "item", crumb.url.as_deref());
                Value::Object(item)
            })
            .collect();

        let mut schema = base_schema("BreadcrumbList");
        schema.insert("itemListElement".to_string(), Value::Array(list));

        self.add_schema(schema)
    }

    /// Append a `FAQPage` from question/answer pairs.
    pub fn faq<Q, A>(&mut self, questions: impl IntoIterator<Item = (Q, A)>) -> &mut Self
    where
        Q: Into<String>,
        A: Into<String>,
    {
        let entries: Vec<Value> = questions
            .into_iter()
            .map(|(question, answer)| {
                json!({
                    "@type": "Question",
                    "name": question.into(),
                    "acceptedAnswer": {
                        "@type": "Answer",
                        "text": answer.into(),
                    },
                })
            })
            .collect();

        let mut schema = base_schema("FAQPage");
        schema.insert("mainEntity".to_string(), Value::Array(entries));

        self.add_schema(schema)
    }

    pub fn product(&mut self, product: Product) -> &mut Self {
        let mut schema = base_schema("Product");
        schema.insert("name".to_string(), Value::from(product.name));
        insert_opt(&mut schema, "description", product.description.as_deref());
        insert_opt(&mut schema, "image", product.image.as_deref());

        if let Some(brand) = product.brand.filter(|b| !b.is_empty()) {
            schema.insert(
                "brand".to_string(),
                json!({ "@type": "Brand", "name": brand }),
            );
        }

        insert_opt(&mut schema, "sku", product.sku.as_deref());

        if let Some(price) = product.price {
            let mut offer = Map::new();
            offer.insert("@type".to_string(), Value::from("Offer"));
            offer.insert("price".to_string(), Value::from(price));
            offer.insert(
                "priceCurrency".to_string(),
                Value::from(product.currency.unwrap_or_else(|| "USD".to_string())),
            );
            if let Some(availability) = product.availability.filter(|a| !a.is_empty()) {
                offer.insert(
                    "availability".to_string(),
                    Value::from(format!("{SCHEMA_CONTEXT}/{availability}")),
                );
            }
            schema.insert("offers".to_string(), Value::Object(offer));
        }

        self.add_schema(schema)
    }

    pub fn local_business(&mut self, business: LocalBusiness) -> &mut Self {
        let mut schema = base_schema("LocalBusiness");
        schema.insert("name".to_string(), Value::from(business.name));
        insert_opt(&mut schema, "address", business.address.as_deref());
        insert_opt(&mut schema, "telephone", business.phone.as_deref());
        insert_opt(&mut schema, "url", business.url.as_deref());
        insert_opt(&mut schema, "image", business.image.as_deref());

        if !business.opening_hours.is_empty() {
            schema.insert(
                "openingHours".to_string(),
                Value::from(business.opening_hours),
            );
        }

        self.add_schema(schema)
    }

    #[must_use]
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Render one script block per schema, or nothing when disabled or empty.
    #[must_use]
    pub fn render(&self) -> String {
        if !self.enabled || self.schemas.is_empty() {
            return String::new();
        }

        let blocks: Vec<String> = self
            .schemas
            .iter()
            .filter_map(|schema| match to_pretty_json(schema) {
                Ok(json) => Some(format!(
                    "<script type=\"application/ld+json\">\n{json}\n</script>"
                )),
                Err(e) => {
                    warn!(error = %e, "skipping unserializable JSON-LD schema");
                    None
                }
            })
            .collect();

        join_tags(&blocks)
    }
}

/// Pretty-print with four-space indentation. Slashes and non-ASCII text are left
/// unescaped.
fn to_pretty_json(schema: &Schema) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    schema.serialize(&mut serializer)?;
    let json = String::from_utf8(buf).map_err(|e| serde::ser::Error::custom(e.to_string()))?;
    // `<` only occurs inside strings, so `\u003c` keeps the JSON valid and the
    // text cannot close the script element.
    Ok(json.replace('<', "\\u003c"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> JsonLdBuilder {
        let mut config = Config::for_site("Acme", "https://acme.test");
        config.json_ld.organization.logo = Some("https://acme.test/logo.png".to_string());
        JsonLdBuilder::new(&config, "https://acme.test/current")
    }

    fn keys(schema: &Schema) -> Vec<&str> {
        schema.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_organization_defaults() {
        let mut ld = builder();
        ld.organization(None, None, None);

        let schema = &ld.schemas()[0];
        assert_eq!(keys(schema), vec!["@context", "@type", "name", "url", "logo"]);
        assert_eq!(schema["name"], "Acme");
        assert_eq!(schema["url"], "https://acme.test");
        assert_eq!(schema["logo"], "https://acme.test/logo.png");
    }

    #[test]
    fn test_organization_keeps_empty_name() {
        let mut ld = builder();
        ld.organization(Some(""), Some(""), None);

        let schema = &ld.schemas()[0];
        assert_eq!(schema["name"], "");
        assert_eq!(schema["url"], "");
    }

    #[test]
    fn test_website_search_action() {
        let mut ld = builder();
        ld.website(None, None, Some("https://acme.test/search?q="));

        let action = &ld.schemas()[0]["potentialAction"];
        assert_eq!(action["@type"], "SearchAction");
        assert_eq!(
            action["target"],
            "https://acme.test/search?q={search_term_string}"
        );
    }

    #[test]
    fn test_web_page_uses_current_url() {
        let mut ld = builder();
        ld.web_page("About", None, None);

        let schema = &ld.schemas()[0];
        assert_eq!(schema["url"], "https://acme.test/current");
        assert!(schema.get("description").is_none());
    }

    #[test]
    fn test_article_omits_missing_fields() {
        let mut ld = builder();
        ld.article(Article {
            headline: "Launch".to_string(),
            author: "Jane".to_string(),
            date_published: Some("2024-05-01".to_string()),
            ..Article::default()
        });

        let schema = &ld.schemas()[0];
        assert_eq!(
            keys(schema),
            vec!["@context", "@type", "headline", "author", "datePublished"]
        );
        assert_eq!(schema["author"]["name"], "Jane");
    }

    #[test]
    fn test_breadcrumb_positions() {
        let mut ld = builder();
        ld.breadcrumbs(&[
            Breadcrumb::new("Home", "https://acme.test/"),
            Breadcrumb::new("Blog", "https://acme.test/blog"),
            Breadcrumb::current("Post"),
        ]);

        let items = ld.schemas()[0]["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["position"], 1);
        assert_eq!(items[1]["position"], 2);
        assert_eq!(items[2]["position"], 3);
        assert_eq!(items[1]["item"], "https://acme.test/blog");
        assert!(items[2].get("item").is_none());
    }

    #[test]
    fn test_faq() {
        let mut ld = builder();
        ld.faq([("What?", "This."), ("Why?", "Because.")]);

        let entries = ld.schemas()[0]["mainEntity"].as_array().unwrap();
        assert_eq!(entries[1]["name"], "Why?");
        assert_eq!(entries[1]["acceptedAnswer"]["text"], "Because.");
    }

    #[test]
    fn test_product_offer() {
        let mut ld = builder();
        ld.product(Product {
            name: "Anvil".to_string(),
            brand: Some("Acme".to_string()),
            price: Some(19.99),
            availability: Some("InStock".to_string()),
            ..Product::default()
        });

        let schema = &ld.schemas()[0];
        assert_eq!(schema["brand"]["name"], "Acme");
        assert_eq!(schema["offers"]["price"], 19.99);
        assert_eq!(schema["offers"]["priceCurrency"], "USD");
        assert_eq!(schema["offers"]["availability"], "https://schema.org/InStock");
        assert!(schema.get("sku").is_none());
    }

    #[test]
    fn test_local_business() {
        let mut ld = builder();
        ld.local_business(LocalBusiness {
            name: "Acme Store".to_string(),
            phone: Some("+1 555 0100".to_string()),
            opening_hours: vec!["Mo-Fr 09:00-17:00".to_string()],
            ..LocalBusiness::default()
        });

        let schema = &ld.schemas()[0];
        assert_eq!(
            keys(schema),
            vec!["@context", "@type", "name", "telephone", "openingHours"]
        );
    }

    #[test]
    fn test_render_disabled_or_empty() {
        let mut ld = builder();
        assert_eq!(ld.render(), "");

        ld.organization(None, None, None).enabled(false);
        assert_eq!(ld.render(), "");
    }

    #[test]
    fn test_render_preserves_order_slashes_and_unicode() {
        let mut ld = builder();
        let mut custom = Schema::new();
        custom.insert("@context".to_string(), Value::from(SCHEMA_CONTEXT));
        custom.insert("@type".to_string(), Value::from("Event"));
        custom.insert("name".to_string(), Value::from("Café night"));
        ld.add_schema(custom).web_page("Home", Some("Start"), None);

        let html = ld.render();

        assert_eq!(html.matches("<script type=\"application/ld+json\">").count(), 2);
        assert!(html.contains("\"@context\": \"https://schema.org\""));
        assert!(html.contains("Café night"));
        assert!(!html.contains("\\/"));

        let context = html.find("@context").unwrap();
        let event = html.find("Event").unwrap();
        let name = html.find("Café").unwrap();
        assert!(context < event && event < name);
        assert!(html.contains("</script>\n    <script"));
    }

    #[test]
    fn test_render_escapes_script_close_in_values() {
        let mut ld = builder();
        ld.web_page("Tags </script><b>bold</b>", None, None);

        let html = ld.render();

        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.ends_with("\n</script>"));
        assert!(html.contains(r#"Tags \u003c/script>\u003cb>bold\u003c/b>"#));

        let start = html.find('{').unwrap();
        let end = html.rfind('}').unwrap();
        let parsed: Value = serde_json::from_str(&html[start..=end]).unwrap();
        assert_eq!(parsed["name"], "Tags </script><b>bold</b>");
    }
}
