//! Head command - print the rendered head tags of a page

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use seokit_core::Config;
use seokit_generator::{EntityKey, HasSeo, MemoryOverrideStore, SeoManager};

use super::load_config;

/// Entity identified only by its key, for replaying stored overrides.
struct KeyedEntity(EntityKey);

impl HasSeo for KeyedEntity {
    fn seo_key(&self) -> EntityKey {
        self.0.clone()
    }
}

/// Run the head command.
///
/// `entity` is a `type:id` pair whose overrides are read from `overrides`,
/// a JSON array of override records.
pub fn run(
    config_path: &Path,
    url: &str,
    entity: Option<&str>,
    overrides: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let head = render(&config, url, entity, overrides)?;
    println!("{head}");
    Ok(())
}

/// Render the head block for `url`, applying entity overrides when given.
pub fn render(
    config: &Config,
    url: &str,
    entity: Option<&str>,
    overrides: Option<&Path>,
) -> Result<String> {
    let mut seo = SeoManager::new(config, url);

    if let Some(entity) = entity {
        let key = EntityKey::parse(entity)?;
        let store = match overrides {
            Some(path) => MemoryOverrideStore::load_json(path, &config.database)
                .wrap_err("Failed to load overrides")?,
            None => MemoryOverrideStore::new(&config.database),
        };

        let applied = KeyedEntity(key.clone()).apply_seo(&store, &mut seo)?;
        tracing::info!(%key, applied, "applied entity overrides");
    }

    Ok(seo.render_head())
}
