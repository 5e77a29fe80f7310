use crate::document::Document;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Named collections of documents. The in-process entity-store capability:
/// everything above it (query execution, resource handlers, the ratings
/// maintainer) goes through `Collection` operations.
pub struct Store {
    collections: RwLock<HashMap<String, Arc<Collection>>>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self { collections: RwLock::new(HashMap::new()) }
    }

    /// Create a collection if it doesn't exist, returning it either way.
    pub fn create_collection(&self, name: &str) -> Arc<Collection> {
        let mut cols = self.collections.write();
        cols.entry(name.to_string()).or_insert_with(|| Arc::new(Collection::new(name))).clone()
    }

    #[must_use]
    pub fn get_collection(&self, name: &str) -> Option<Arc<Collection>> {
        self.collections.read().get(name).cloned()
    }

    pub fn delete_collection(&self, name: &str) -> bool {
        self.collections.write().remove(name).is_some()
    }

    #[must_use]
    pub fn list_collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// A single collection. Documents are kept in insertion order; lookups by
/// id scan, which is fine at catalog scale.
pub struct Collection {
    name: String,
    pub(crate) docs: RwLock<Vec<Document>>,
}

impl Collection {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), docs: RwLock::new(Vec::new()) }
    }

    #[must_use]
    pub fn name_str(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}
