//! Per-entity SEO overrides.
//!
//! An entity owns at most one [`SeoMeta`] record, keyed by its
//! [`EntityKey`]. Records live in an [`OverrideStore`] supplied by the caller;
//! the [`SeoManager`](crate::SeoManager) only consumes them.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use parking_lot::RwLock;
use seokit_core::config::DatabaseConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::{json_ld::Schema, manager::SeoManager};

/// Override storage errors.
#[derive(Debug, Error)]
pub enum OverrideError {
    /// Entity key not in `type:id` form.
    #[error("invalid entity key {0:?}, expected type:id")]
    InvalidKey(String),

    /// IO error while reading a seed file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not valid JSON.
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Backend failure reported by a custom store.
    #[error("override store error: {0}")]
    Backend(String),
}

/// Result type for override operations.
pub type Result<T> = std::result::Result<T, OverrideError>;

/// Identity of the entity owning an override record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    pub entity_type: String,
    pub entity_id: String,
}

impl EntityKey {
    #[must_use]
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
        }
    }

    /// Parse a `type:id` pair. Both halves must be non-empty.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((entity_type, entity_id)) if !entity_type.is_empty() && !entity_id.is_empty() => {
                Ok(Self::new(entity_type, entity_id))
            }
            _ => Err(OverrideError::InvalidKey(s.to_string())),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.entity_id)
    }
}

/// Overridable fields. `None` means "leave the manager's value alone".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_ld: Option<Vec<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_meta: Option<Map<String, Value>>,
}

impl SeoFields {
    /// Overwrite every field that is present in `other`.
    pub fn merge(&mut self, other: SeoFields) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }

        take!(
            title,
            description,
            keywords,
            robots,
            canonical,
            author,
            og_title,
            og_description,
            og_type,
            og_image,
            twitter_card,
            twitter_title,
            twitter_description,
            twitter_image,
            json_ld,
            custom_meta,
        );
    }

    /// Present fields as a JSON object.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Stored override record of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoMeta {
    #[serde(flatten)]
    pub key: EntityKey,
    #[serde(flatten)]
    pub fields: SeoFields,
}

impl SeoMeta {
    #[must_use]
    pub fn new(key: EntityKey, fields: SeoFields) -> Self {
        Self { key, fields }
    }

    /// Present fields as a JSON object, without the entity key.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        self.fields.to_map()
    }
}

/// Keyed storage of override records.
pub trait OverrideStore: Send + Sync {
    /// Fetch the record of `key`.
    fn find(&self, key: &EntityKey) -> Result<Option<SeoMeta>>;

    /// Create the record of `key` or merge `fields` into the existing one.
    fn upsert(&self, key: &EntityKey, fields: SeoFields) -> Result<SeoMeta>;

    /// Remove the record of `key`. Returns whether one existed.
    fn delete(&self, key: &EntityKey) -> Result<bool>;
}

/// In-process override store.
#[derive(Debug)]
pub struct MemoryOverrideStore {
    table_name: String,
    records: RwLock<HashMap<EntityKey, SeoMeta>>,
}

impl MemoryOverrideStore {
    #[must_use]
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            table_name: config.table_name.clone(),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store seeded from a JSON array of records.
    pub fn load_json(path: &Path, config: &DatabaseConfig) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| OverrideError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<SeoMeta> =
            serde_json::from_str(&content).map_err(|source| OverrideError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let store = Self::new(config);
        {
            let mut map = store.records.write();
            for record in records {
                map.insert(record.key.clone(), record);
            }
            debug!(table = %store.table_name, count = map.len(), path = %path.display(), "loaded overrides");
        }

        Ok(store)
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl OverrideStore for MemoryOverrideStore {
    fn find(&self, key: &EntityKey) -> Result<Option<SeoMeta>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn upsert(&self, key: &EntityKey, fields: SeoFields) -> Result<SeoMeta> {
        let mut records = self.records.write();
        let record = records
            .entry(key.clone())
            .or_insert_with(|| SeoMeta::new(key.clone(), SeoFields::default()));
        record.fields.merge(fields);
        Ok(record.clone())
    }

    fn delete(&self, key: &EntityKey) -> Result<bool> {
        Ok(self.records.write().remove(key).is_some())
    }
}

/// Entity that can carry SEO overrides.
pub trait HasSeo {
    /// Key of this entity's override record.
    fn seo_key(&self) -> EntityKey;

    fn load_overrides(&self, store: &dyn OverrideStore) -> Result<Option<SeoMeta>> {
        store.find(&self.seo_key())
    }

    fn save_overrides(&self, store: &dyn OverrideStore, fields: SeoFields) -> Result<SeoMeta> {
        store.upsert(&self.seo_key(), fields)
    }

    fn delete_overrides(&self, store: &dyn OverrideStore) -> Result<bool> {
        store.delete(&self.seo_key())
    }

    /// Push this entity's overrides into `manager`.
    ///
    /// Returns whether a record was applied. Does nothing when the manager
    /// was built with overrides disabled.
    fn apply_seo(&self, store: &dyn OverrideStore, manager: &mut SeoManager) -> Result<bool> {
        if !manager.overrides_enabled() {
            return Ok(false);
        }

        match self.load_overrides(store)? {
            Some(record) => {
                manager.apply_overrides(&record);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
