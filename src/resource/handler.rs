use super::schema::Schema;
use super::validate::{ValidationMode, apply_defaults, strip_unknown, validate};
use crate::document::Document;
use crate::errors::ApiError;
use crate::query::{self, CmpOp, Filter, QuerySpec, strip_internal};
use crate::store::{Collection, Store};
use crate::types::{DocumentId, ID_FIELD};
use bson::Bson;
use std::cmp::Ordering;
use std::sync::Arc;

/// Reference expansion for `get_one`: replace the id at `path` with the
/// referenced document restricted to `select`ed fields.
#[derive(Debug, Clone, Copy)]
pub struct Populate<'p> {
    pub path: &'p str,
    pub select: &'p [&'p str],
}

/// The parameterized CRUD operation set. One instance per (store, schema)
/// pair; identical logic serves every entity type. Anything type-specific
/// lives in the schema tables or the entity's service.
pub struct ResourceHandler<'a> {
    store: &'a Store,
    schema: &'static Schema,
}

impl<'a> ResourceHandler<'a> {
    #[must_use]
    pub const fn new(store: &'a Store, schema: &'static Schema) -> Self {
        Self { store, schema }
    }

    #[must_use]
    pub const fn schema(&self) -> &'static Schema {
        self.schema
    }

    fn collection(&self) -> Result<Arc<Collection>, ApiError> {
        self.store
            .get_collection(self.schema.collection)
            .ok_or_else(|| ApiError::NoSuchCollection(self.schema.collection.to_string()))
    }

    /// Build and execute a listing query. Returns the page of documents
    /// and the filtered total (not the page size). Empty results are not
    /// an error.
    pub fn list_all(
        &self,
        params: &[(String, String)],
    ) -> Result<(Vec<bson::Document>, usize), ApiError> {
        let mut spec = QuerySpec::from_params(params)?;
        if let Some((flag, hides)) = self.schema.hidden_when
            && !spec.filter.mentions(flag)
        {
            let visible = Filter::Not(Box::new(Filter::Cmp {
                path: flag.to_string(),
                op: CmpOp::Eq,
                value: Bson::Boolean(hides),
            }));
            spec.filter = match spec.filter {
                Filter::True => visible,
                f => Filter::And(vec![f, visible]),
            };
        }
        let col = self.collection()?;
        let total = query::count_docs(&col, &spec.filter);
        let docs = query::find_docs(&col, &spec).into_iter().map(|d| d.data).collect();
        Ok((docs, total))
    }

    /// Fetch by identifier, optionally expanding one referenced entity.
    pub fn get_one(
        &self,
        id: &str,
        populate: Option<&Populate<'_>>,
    ) -> Result<bson::Document, ApiError> {
        let col = self.collection()?;
        let doc = self.find_by_id(&col, id)?;
        let mut data = strip_internal(&doc.data);
        if let Some(p) = populate {
            self.expand_reference(&mut data, p)?;
        }
        Ok(data)
    }

    /// Validate (collecting every violation), enforce uniqueness, insert.
    pub fn create_one(&self, mut payload: bson::Document) -> Result<bson::Document, ApiError> {
        strip_unknown(self.schema, &mut payload);
        apply_defaults(self.schema, &mut payload);
        validate(self.schema, &payload, &payload, ValidationMode::Create)?;
        self.check_unique(&payload, None)?;
        let col = self.collection()?;
        let id = col.insert_document(Document::new(payload));
        let stored = col
            .find_document(&id)
            .ok_or_else(|| ApiError::NotFound(format!("{} {id}", self.schema.collection)))?;
        Ok(strip_internal(&stored.data))
    }

    /// Partial update: immutable fields rejected, touched fields
    /// re-validated, cross-field invariants re-checked on the merged
    /// document, uniqueness re-checked excluding this document.
    pub fn update_one(
        &self,
        id: &str,
        mut payload: bson::Document,
    ) -> Result<bson::Document, ApiError> {
        let col = self.collection()?;
        let existing = self.find_by_id(&col, id)?;
        strip_unknown(self.schema, &mut payload);
        let mut merged = existing.data.clone();
        for (k, v) in &payload {
            merged.insert(k.clone(), v.clone());
        }
        validate(self.schema, &payload, &merged, ValidationMode::Update)?;
        self.check_unique(&merged, Some(&existing.id))?;
        col.update_document(&existing.id, merged);
        let stored = col
            .find_document(&existing.id)
            .ok_or_else(|| ApiError::NotFound(format!("{} {id}", self.schema.collection)))?;
        Ok(strip_internal(&stored.data))
    }

    /// Remove by identifier; `NotFound` when absent, no content otherwise.
    pub fn delete_one(&self, id: &str) -> Result<(), ApiError> {
        let col = self.collection()?;
        let existing = self.find_by_id(&col, id)?;
        col.delete_document(&existing.id);
        Ok(())
    }

    fn find_by_id(&self, col: &Arc<Collection>, id: &str) -> Result<Document, ApiError> {
        let not_found = || ApiError::NotFound(format!("no {} with id {id}", self.schema.collection));
        let doc_id: DocumentId = id.parse().map_err(|_| not_found())?;
        col.find_document(&doc_id).ok_or_else(not_found)
    }

    /// Enforce each compound unique key set. Two documents collide when
    /// every field of a set compares equal; a key set with missing fields
    /// on the candidate is skipped.
    fn check_unique(
        &self,
        candidate: &bson::Document,
        exclude: Option<&DocumentId>,
    ) -> Result<(), ApiError> {
        let col = self.collection()?;
        for key_set in self.schema.unique {
            let values: Vec<(&str, &Bson)> = key_set
                .iter()
                .filter_map(|f| candidate.get(*f).map(|v| (*f, v)))
                .collect();
            if values.len() < key_set.len() {
                continue;
            }
            let clash = col.get_all_documents().into_iter().any(|d| {
                if exclude == Some(&d.id) {
                    return false;
                }
                values.iter().all(|(f, v)| {
                    d.data.get(*f).is_some_and(|dv| query::compare_bson(dv, v) == Ordering::Equal)
                })
            });
            if clash {
                return Err(ApiError::Conflict(format!(
                    "duplicate value for unique fields ({})",
                    key_set.join(", ")
                )));
            }
        }
        Ok(())
    }

    fn expand_reference(
        &self,
        data: &mut bson::Document,
        populate: &Populate<'_>,
    ) -> Result<(), ApiError> {
        let Some(rule) = self.schema.rule(populate.path) else {
            return Ok(());
        };
        let Some(ref_collection) = rule.references else {
            return Ok(());
        };
        let Ok(ref_id) = data.get_str(populate.path).map(str::to_string) else {
            return Ok(());
        };
        let Some(ref_col) = self.store.get_collection(ref_collection) else {
            return Ok(());
        };
        let Ok(doc_id) = ref_id.parse::<DocumentId>() else {
            return Ok(());
        };
        if let Some(referenced) = ref_col.find_document(&doc_id) {
            let mut sub = bson::Document::new();
            if let Some(id) = referenced.data.get(ID_FIELD) {
                sub.insert(ID_FIELD, id.clone());
            }
            for f in populate.select {
                if let Some(v) = referenced.data.get(*f) {
                    sub.insert((*f).to_string(), v.clone());
                }
            }
            data.insert(populate.path.to_string(), Bson::Document(sub));
        }
        Ok(())
    }
}
