//! Collection resolution for sitemap sources.
//!
//! A [`CollectionResolver`] turns a collection identifier into the records a
//! [`SitemapSource`](crate::sitemap::SitemapSource) expands into URLs. Resolution
//! only happens while a sitemap is being built.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// A record of a collection: field name to JSON value.
pub type Record = Map<String, Value>;

/// Collection resolution errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No collection with this identifier.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// Collection identifier that cannot name a file.
    #[error("invalid collection name: {0:?}")]
    InvalidName(String),

    /// IO error while reading a collection file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Collection file is not valid JSON.
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Backend failure reported by a custom resolver.
    #[error("collection backend error: {0}")]
    Backend(String),
}

/// Result type for collection resolution.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Resolves a collection identifier to its records, in natural iteration order.
pub trait CollectionResolver: Send + Sync {
    fn resolve(&self, collection: &str) -> Result<Vec<Record>>;
}

/// Resolver over collections registered in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    collections: HashMap<String, Vec<Record>>,
}

impl MemoryResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, records: Vec<Record>) {
        self.collections.insert(name.into(), records);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_collection(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.insert(name, records);
        self
    }
}

impl CollectionResolver for MemoryResolver {
    fn resolve(&self, collection: &str) -> Result<Vec<Record>> {
        self.collections
            .get(collection)
            .cloned()
            .ok_or_else(|| SourceError::UnknownCollection(collection.to_string()))
    }
}

/// Resolver reading `<dir>/<collection>.json`, each file a JSON array of objects.
#[derive(Debug, Clone)]
pub struct JsonDirResolver {
    dir: PathBuf,
}

impl JsonDirResolver {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !collection.starts_with('.');
        if !valid {
            return Err(SourceError::InvalidName(collection.to_string()));
        }
        Ok(self.dir.join(format!("{collection}.json")))
    }
}

impl CollectionResolver for JsonDirResolver {
    fn resolve(&self, collection: &str) -> Result<Vec<Record>> {
        let path = self.collection_path(collection)?;
        if !path.exists() {
            return Err(SourceError::UnknownCollection(collection.to_string()));
        }

        let content = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        let records: Vec<Record> =
            serde_json::from_str(&content).map_err(|source| SourceError::Json {
                path: path.clone(),
                source,
            })?;

        debug!(collection, count = records.len(), path = %path.display(), "resolved collection");
        Ok(records)
    }
}
