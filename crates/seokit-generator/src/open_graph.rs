//! Open Graph tags.
//!
//! Title and description fall back to the [`MetaTagBuilder`] values.

use seokit_core::Config;

use crate::{
    html::{join_tags, meta_property, upsert_pair},
    meta::MetaTagBuilder,
};

/// Builder for `og:*` meta properties.
#[derive(Debug, Clone)]
pub struct OpenGraphBuilder {
    title: Option<String>,
    description: Option<String>,
    og_type: String,
    url: Option<String>,
    site_name: Option<String>,
    locale: String,
    image: Option<String>,
    image_width: Option<u32>,
    image_height: Option<u32>,
    image_alt: Option<String>,
    custom: Vec<(String, String)>,
    current_url: String,
}

impl OpenGraphBuilder {
    /// Create a builder seeded from configuration defaults.
    #[must_use]
    pub fn new(config: &Config, current_url: impl Into<String>) -> Self {
        let og = &config.open_graph;
        Self {
            title: None,
            description: None,
            og_type: og.og_type.clone(),
            url: None,
            site_name: Some(config.og_site_name()),
            locale: og.locale.clone(),
            image: og.image.clone(),
            image_width: og.image_width,
            image_height: og.image_height,
            image_alt: None,
            custom: Vec::new(),
            current_url: current_url.into(),
        }
    }

    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Set `og:type`.
    pub fn og_type(&mut self, og_type: impl Into<String>) -> &mut Self {
        self.og_type = og_type.into();
        self
    }

    pub fn url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = Some(url.into());
        self
    }

    pub fn site_name(&mut self, site_name: impl Into<String>) -> &mut Self {
        self.site_name = Some(site_name.into());
        self
    }

    pub fn locale(&mut self, locale: impl Into<String>) -> &mut Self {
        self.locale = locale.into();
        self
    }

    /// Set the share image.
    ///
    /// Width and height keep their previous values when `None`. The alt text is
    /// always replaced, so `None` clears it.
    pub fn image(
        &mut self,
        url: impl Into<String>,
        width: Option<u32>,
        height: Option<u32>,
        alt: Option<&str>,
    ) -> &mut Self {
        self.image = Some(url.into());
        self.image_width = width.or(self.image_width);
        self.image_height = height.or(self.image_height);
        self.image_alt = alt.map(str::to_string);
        self
    }

    /// Add a custom property, rendered as `og:<property>`.
    pub fn property(&mut self, property: impl Into<String>, content: impl Into<String>) -> &mut Self {
        upsert_pair(&mut self.custom, property.into(), content.into());
        self
    }

    pub fn article(&mut self) -> &mut Self {
        self.og_type("article")
    }

    pub fn profile(&mut self) -> &mut Self {
        self.og_type("profile")
    }

    #[must_use]
    pub fn get_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn get_type(&self) -> &str {
        &self.og_type
    }

    #[must_use]
    pub fn get_image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Render the tags in fixed order.
    #[must_use]
    pub fn render(&self, meta: &MetaTagBuilder) -> String {
        let mut html = Vec::new();

        let title = self.title.as_deref().unwrap_or(meta.get_title());
        if !title.is_empty() {
            html.push(meta_property("og:title", title));
        }

        let description = self
            .description
            .as_deref()
            .unwrap_or(meta.get_description());
        if !description.is_empty() {
            html.push(meta_property("og:description", description));
        }

        html.push(meta_property("og:type", &self.og_type));

        let url = self.url.as_deref().unwrap_or(&self.current_url);
        html.push(meta_property("og:url", url));

        if let Some(site_name) = self.site_name.as_deref().filter(|s| !s.is_empty()) {
            html.push(meta_property("og:site_name", site_name));
        }

        html.push(meta_property("og:locale", &self.locale));

        if let Some(image) = self.image.as_deref().filter(|s| !s.is_empty()) {
            html.push(meta_property("og:image", image));

            if let Some(width) = self.image_width.filter(|w| *w > 0) {
                html.push(meta_property("og:image:width", &width.to_string()));
            }

            if let Some(height) = self.image_height.filter(|h| *h > 0) {
                html.push(meta_property("og:image:height", &height.to_string()));
            }

            if let Some(alt) = self.image_alt.as_deref().filter(|s| !s.is_empty()) {
                html.push(meta_property("og:image:alt", alt));
            }
        }

        for (property, content) in &self.custom {
            html.push(meta_property(&format!("og:{property}"), content));
        }

        join_tags(&html)
    }
}
