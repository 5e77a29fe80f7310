use super::core::Collection;
use crate::document::Document;
use crate::types::{CREATED_AT_FIELD, DocumentId, ID_FIELD, REVISION_FIELD, UPDATED_AT_FIELD};
use bson::Bson;

impl Collection {
    /// Insert a document, stamping `_id`, `createdAt` (when the payload
    /// carries none) and the initial `_rev`.
    pub fn insert_document(&self, mut document: Document) -> DocumentId {
        let doc_id = document.id.clone();
        document.data.insert(ID_FIELD, Bson::String(doc_id.to_string()));
        if !document.data.contains_key(CREATED_AT_FIELD) {
            let stamp = bson::DateTime::from_millis(document.metadata.created_at.timestamp_millis());
            document.data.insert(CREATED_AT_FIELD, Bson::DateTime(stamp));
        }
        document.data.insert(REVISION_FIELD, Bson::Int64(0));
        self.docs.write().push(document);
        log::debug!("insert collection={} id={}", self.name_str(), doc_id);
        doc_id
    }

    #[must_use]
    pub fn find_document(&self, id: &DocumentId) -> Option<Document> {
        self.docs.read().iter().find(|d| &d.id == id).cloned()
    }

    /// Replace a document's data in place. `_id` and `createdAt` are kept
    /// from the stored copy; `_rev` and `updatedAt` are bumped.
    pub fn update_document(&self, id: &DocumentId, mut new_data: bson::Document) -> bool {
        let mut docs = self.docs.write();
        let Some(doc) = docs.iter_mut().find(|d| &d.id == id) else {
            return false;
        };
        new_data.insert(ID_FIELD, Bson::String(id.to_string()));
        if let Some(created) = doc.data.get(CREATED_AT_FIELD) {
            new_data.insert(CREATED_AT_FIELD, created.clone());
        }
        let rev = match doc.data.get(REVISION_FIELD) {
            Some(Bson::Int64(r)) => *r,
            _ => 0,
        };
        new_data.insert(REVISION_FIELD, Bson::Int64(rev + 1));
        doc.touch(new_data);
        let stamp = bson::DateTime::from_millis(doc.metadata.updated_at.timestamp_millis());
        doc.data.insert(UPDATED_AT_FIELD, Bson::DateTime(stamp));
        log::debug!("update collection={} id={} rev={}", self.name_str(), id, rev + 1);
        true
    }

    pub fn delete_document(&self, id: &DocumentId) -> bool {
        let mut docs = self.docs.write();
        let before = docs.len();
        docs.retain(|d| &d.id != id);
        let removed = docs.len() < before;
        if removed {
            log::debug!("delete collection={} id={}", self.name_str(), id);
        }
        removed
    }

    /// Return only the IDs of all documents without cloning each document.
    #[must_use]
    pub fn list_ids(&self) -> Vec<DocumentId> {
        self.docs.read().iter().map(|d| d.id.clone()).collect()
    }

    #[must_use]
    pub fn get_all_documents(&self) -> Vec<Document> {
        self.docs.read().clone()
    }
}
