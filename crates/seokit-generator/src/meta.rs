//! Primary meta tags.
//!
//! Renders `<title>`, description, keywords, robots, canonical, author and
//! arbitrary name/content pairs.

use seokit_core::{Config, TrailingSlash};

use crate::html::{escape_html, join_tags, meta_name, upsert_pair};

/// Robots directive set by [`MetaTagBuilder::no_index`].
pub const NO_INDEX: &str = "noindex, nofollow";

/// Keyword list accepted by [`MetaTagBuilder::keywords`].
///
/// Built from a comma-separated string or an explicit list. Items are trimmed
/// and empty items dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords(Vec<String>);

impl Keywords {
    fn normalize<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            items
                .into_iter()
                .map(|item| item.as_ref().trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        )
    }

    /// The normalized items.
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for Keywords {
    fn from(s: &str) -> Self {
        Self::normalize(s.split(','))
    }
}

impl From<String> for Keywords {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Vec<String>> for Keywords {
    fn from(items: Vec<String>) -> Self {
        Self::normalize(items)
    }
}

impl From<Vec<&str>> for Keywords {
    fn from(items: Vec<&str>) -> Self {
        Self::normalize(items)
    }
}

impl From<&[&str]> for Keywords {
    fn from(items: &[&str]) -> Self {
        Self::normalize(items)
    }
}

impl<const N: usize> From<[&str; N]> for Keywords {
    fn from(items: [&str; N]) -> Self {
        Self::normalize(items)
    }
}

/// Builder for the primary meta tags of a page.
#[derive(Debug, Clone)]
pub struct MetaTagBuilder {
    title: String,
    title_suffix: String,
    title_separator: String,
    use_suffix: bool,
    description: String,
    keywords: Vec<String>,
    robots: String,
    canonical: Option<String>,
    author: String,
    custom: Vec<(String, String)>,
    current_url: String,
    trailing_slash: TrailingSlash,
}

impl MetaTagBuilder {
    /// Create a builder seeded from configuration defaults.
    ///
    /// `current_url` is the URL of the request being rendered; it backs the
    /// canonical link when none is set.
    #[must_use]
    pub fn new(config: &Config, current_url: impl Into<String>) -> Self {
        let defaults = &config.defaults;
        Self {
            title: config.default_title(),
            title_suffix: config.title_suffix(),
            title_separator: defaults.title_separator.clone(),
            use_suffix: true,
            description: defaults.description.clone(),
            keywords: Keywords::from(defaults.keywords.clone()).into_inner(),
            robots: defaults.robots.clone(),
            canonical: defaults.canonical.clone(),
            author: defaults.author.clone(),
            custom: Vec::new(),
            current_url: current_url.into(),
            trailing_slash: config.trailing_slash,
        }
    }

    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn title_suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.title_suffix = suffix.into();
        self
    }

    pub fn title_separator(&mut self, separator: impl Into<String>) -> &mut Self {
        self.title_separator = separator.into();
        self
    }

    /// Render the bare title without separator and suffix.
    pub fn without_title_suffix(&mut self) -> &mut Self {
        self.use_suffix = false;
        self
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Set keywords from a comma-separated string or a list.
    pub fn keywords(&mut self, keywords: impl Into<Keywords>) -> &mut Self {
        self.keywords = keywords.into().into_inner();
        self
    }

    pub fn robots(&mut self, robots: impl Into<String>) -> &mut Self {
        self.robots = robots.into();
        self
    }

    /// Shorthand for `robots("noindex, nofollow")`.
    pub fn no_index(&mut self) -> &mut Self {
        self.robots = NO_INDEX.to_string();
        self
    }

    pub fn canonical(&mut self, url: impl Into<String>) -> &mut Self {
        self.canonical = Some(url.into());
        self
    }

    /// Drop an explicit canonical URL so the current request URL is used.
    pub fn clear_canonical(&mut self) -> &mut Self {
        self.canonical = None;
        self
    }

    pub fn author(&mut self, author: impl Into<String>) -> &mut Self {
        self.author = author.into();
        self
    }

    /// Add a custom `<meta name content>` pair. Setting a name again replaces its value.
    pub fn meta(&mut self, name: impl Into<String>, content: impl Into<String>) -> &mut Self {
        upsert_pair(&mut self.custom, name.into(), content.into());
        self
    }

    #[must_use]
    pub fn get_title(&self) -> &str {
        &self.title
    }

    /// The title with separator and suffix applied.
    ///
    /// The suffix is skipped when disabled, empty, or equal to the title.
    #[must_use]
    pub fn get_full_title(&self) -> String {
        if self.use_suffix && !self.title_suffix.is_empty() && self.title != self.title_suffix {
            format!("{}{}{}", self.title, self.title_separator, self.title_suffix)
        } else {
            self.title.clone()
        }
    }

    #[must_use]
    pub fn get_description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn get_keywords(&self) -> &[String] {
        &self.keywords
    }

    #[must_use]
    pub fn get_robots(&self) -> &str {
        &self.robots
    }

    /// The canonical URL: the explicit one if set, else the current request URL.
    ///
    /// Both pass through the trailing slash policy. Returns `None` when neither
    /// is available.
    #[must_use]
    pub fn get_canonical(&self) -> Option<String> {
        let url = self
            .canonical
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.current_url);

        if url.is_empty() {
            None
        } else {
            Some(self.normalize_url(url))
        }
    }

    #[must_use]
    pub fn get_author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn get_custom_meta(&self) -> &[(String, String)] {
        &self.custom
    }

    /// The URL of the request being rendered.
    #[must_use]
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Apply the configured trailing slash policy.
    #[must_use]
    pub fn normalize_url(&self, url: &str) -> String {
        self.trailing_slash.apply(url)
    }

    /// Render the tags in fixed order.
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = Vec::new();

        html.push(format!("<title>{}</title>", escape_html(&self.get_full_title())));

        if !self.description.is_empty() {
            html.push(meta_name("description", &self.description));
        }

        if !self.keywords.is_empty() {
            html.push(meta_name("keywords", &self.keywords.join(", ")));
        }

        html.push(meta_name("robots", &self.robots));

        if let Some(canonical) = self.get_canonical() {
            html.push(format!(
                r#"<link rel="canonical" href="{}">"#,
                escape_html(&canonical)
            ));
        }

        if !self.author.is_empty() {
            html.push(meta_name("author", &self.author));
        }

        for (name, content) in &self.custom {
            html.push(meta_name(name, content));
        }

        join_tags(&html)
    }
}
