//! Twitter Card tags.

use seokit_core::Config;

use crate::{
    html::{join_tags, meta_name},
    meta::MetaTagBuilder,
    open_graph::OpenGraphBuilder,
};

/// Builder for `twitter:*` meta tags.
///
/// Title and description resolve Twitter first, then Open Graph, then meta.
#[derive(Debug, Clone)]
pub struct TwitterCardBuilder {
    card: String,
    site: Option<String>,
    creator: Option<String>,
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
    image_alt: Option<String>,
}

impl TwitterCardBuilder {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let twitter = &config.twitter;
        Self {
            card: twitter.card.clone(),
            site: twitter.site.clone(),
            creator: twitter.creator.clone(),
            title: None,
            description: None,
            image: None,
            image_alt: None,
        }
    }

    pub fn card(&mut self, card: impl Into<String>) -> &mut Self {
        self.card = card.into();
        self
    }

    pub fn summary(&mut self) -> &mut Self {
        self.card("summary")
    }

    pub fn summary_large_image(&mut self) -> &mut Self {
        self.card("summary_large_image")
    }

    pub fn site(&mut self, username: impl Into<String>) -> &mut Self {
        self.site = Some(username.into());
        self
    }

    pub fn creator(&mut self, username: impl Into<String>) -> &mut Self {
        self.creator = Some(username.into());
        self
    }

    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Set the card image. The alt text is always replaced.
    pub fn image(&mut self, url: impl Into<String>, alt: Option<&str>) -> &mut Self {
        self.image = Some(url.into());
        self.image_alt = alt.map(str::to_string);
        self
    }

    #[must_use]
    pub fn get_card(&self) -> &str {
        &self.card
    }

    /// Render the tags in fixed order.
    #[must_use]
    pub fn render(&self, meta: &MetaTagBuilder, og: &OpenGraphBuilder) -> String {
        let mut html = Vec::new();

        html.push(meta_name("twitter:card", &self.card));

        if let Some(site) = self.site.as_deref().filter(|s| !s.is_empty()) {
            html.push(meta_name("twitter:site", site));
        }

        if let Some(creator) = self.creator.as_deref().filter(|s| !s.is_empty()) {
            html.push(meta_name("twitter:creator", creator));
        }

        let title = self
            .title
            .as_deref()
            .or(og.get_title())
            .unwrap_or(meta.get_title());
        if !title.is_empty() {
            html.push(meta_name("twitter:title", title));
        }

        let description = self
            .description
            .as_deref()
            .or(og.get_description())
            .unwrap_or(meta.get_description());
        if !description.is_empty() {
            html.push(meta_name("twitter:description", description));
        }

        if let Some(image) = self.image.as_deref().filter(|s| !s.is_empty()) {
            html.push(meta_name("twitter:image", image));

            if let Some(alt) = self.image_alt.as_deref().filter(|s| !s.is_empty()) {
                html.push(meta_name("twitter:image:alt", alt));
            }
        }

        join_tags(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (MetaTagBuilder, OpenGraphBuilder, TwitterCardBuilder) {
        let mut config = Config::for_site("Acme", "https://acme.test");
        config.twitter.site = Some("@acme".to_string());
        (
            MetaTagBuilder::new(&config, "https://acme.test/"),
            OpenGraphBuilder::new(&config, "https://acme.test/"),
            TwitterCardBuilder::new(&config),
        )
    }

    #[test]
    fn test_title_prefers_open_graph_over_meta() {
        let (mut meta, mut og, twitter) = setup();
        meta.title("Meta Title");
        og.title("OG Title");

        let html = twitter.render(&meta, &og);

        assert!(html.contains(r#"<meta name="twitter:title" content="OG Title">"#));
        assert!(!html.contains("Meta Title"));
    }

    #[test]
    fn test_own_values_win() {
        let (mut meta, mut og, mut twitter) = setup();
        meta.description("meta desc");
        og.description("og desc");
        twitter.title("Tweet").description("tweet desc");

        let html = twitter.render(&meta, &og);

        assert!(html.contains(r#"twitter:title" content="Tweet""#));
        assert!(html.contains(r#"twitter:description" content="tweet desc""#));
    }

    #[test]
    fn test_falls_back_to_meta() {
        let (mut meta, og, twitter) = setup();
        meta.title("Meta Title").description("meta desc");

        let html = twitter.render(&meta, &og);

        assert!(html.contains(r#"twitter:title" content="Meta Title""#));
        assert!(html.contains(r#"twitter:description" content="meta desc""#));
    }

    #[test]
    fn test_render_order() {
        let (mut meta, og, mut twitter) = setup();
        meta.title("Home").description("Welcome");
        twitter
            .summary()
            .creator("@jane")
            .image("https://acme.test/card.png", Some("Card"));

        let html = twitter.render(&meta, &og);
        let lines: Vec<&str> = html.split("\n    ").collect();

        assert_eq!(
            lines,
            vec![
                r#"<meta name="twitter:card" content="summary">"#,
                r#"<meta name="twitter:site" content="@acme">"#,
                r#"<meta name="twitter:creator" content="@jane">"#,
                r#"<meta name="twitter:title" content="Home">"#,
                r#"<meta name="twitter:description" content="Welcome">"#,
                r#"<meta name="twitter:image" content="https://acme.test/card.png">"#,
                r#"<meta name="twitter:image:alt" content="Card">"#,
            ]
        );
    }

    #[test]
    fn test_minimal_card() {
        let (mut meta, og, twitter) = setup();
        meta.title("").description("");

        let html = twitter.render(&meta, &og);

        assert_eq!(
            html,
            "<meta name=\"twitter:card\" content=\"summary_large_image\">\n    <meta name=\"twitter:site\" content=\"@acme\">"
        );
    }
}
