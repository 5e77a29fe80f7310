use crate::auth::Identity;
use crate::errors::ApiError;
use crate::ratings::RatingsMaintainer;
use crate::resource::{FieldKind, FieldRule, Populate, ResourceHandler, Schema};
use crate::store::Store;
use bson::Bson;

pub const COLLECTION: &str = "reviews";
pub const TOUR_FIELD: &str = "tour";
pub const AUTHOR_FIELD: &str = "author";
pub const RATING_FIELD: &str = "rating";

static FIELDS: [FieldRule; 4] = [
    FieldRule {
        required: true,
        immutable: true,
        references: Some(super::tour::COLLECTION),
        ..FieldRule::new(TOUR_FIELD, FieldKind::Reference)
    },
    FieldRule {
        required: true,
        immutable: true,
        references: Some(super::user::COLLECTION),
        ..FieldRule::new(AUTHOR_FIELD, FieldKind::Reference)
    },
    FieldRule {
        required: true,
        min: Some(1.0),
        max: Some(5.0),
        ..FieldRule::new(RATING_FIELD, FieldKind::Number)
    },
    FieldRule { required: true, ..FieldRule::new("review", FieldKind::Str) },
];

static SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &FIELDS,
    // one review per (tour, author) pair
    unique: &[&[TOUR_FIELD, AUTHOR_FIELD]],
    defaults: &[],
    cross_checks: &[],
    hidden_when: None,
};

#[must_use]
pub fn schema() -> &'static Schema {
    &SCHEMA
}

/// Review operations on behalf of one acting user. Wraps the generic
/// handler with ownership checks and calls the ratings maintainer
/// explicitly after each committed mutation. A recompute failure is
/// logged and never rolls back the mutation it followed.
pub struct ReviewService<'a> {
    store: &'a Store,
    handler: ResourceHandler<'a>,
    ratings: &'a RatingsMaintainer,
    identity: Identity,
}

impl<'a> ReviewService<'a> {
    #[must_use]
    pub fn new(store: &'a Store, ratings: &'a RatingsMaintainer, identity: Identity) -> Self {
        Self { store, handler: ResourceHandler::new(store, schema()), ratings, identity }
    }

    pub fn list(&self, params: &[(String, String)]) -> Result<(Vec<bson::Document>, usize), ApiError> {
        self.handler.list_all(params)
    }

    pub fn get(&self, id: &str) -> Result<bson::Document, ApiError> {
        self.handler
            .get_one(id, Some(&Populate { path: AUTHOR_FIELD, select: &["name", "photo"] }))
    }

    /// Create a review. Non-admins always author their own reviews; an
    /// admin may create one on another user's behalf.
    pub fn create(&self, mut payload: bson::Document) -> Result<bson::Document, ApiError> {
        if !self.identity.is_admin() || !payload.contains_key(AUTHOR_FIELD) {
            payload.insert(AUTHOR_FIELD, Bson::String(self.identity.user_id.clone()));
        }
        let created = self.handler.create_one(payload)?;
        self.recompute_after("create", &created);
        Ok(created)
    }

    /// Partial update by the author or an administrator. The tour
    /// reference is immutable, but the recompute still uses the
    /// post-update document's reference.
    pub fn update(&self, id: &str, payload: bson::Document) -> Result<bson::Document, ApiError> {
        let existing = self.handler.get_one(id, None)?;
        self.check_ownership(&existing)?;
        let updated = self.handler.update_one(id, payload)?;
        self.recompute_after("update", &updated);
        Ok(updated)
    }

    /// Delete by the author or an administrator. The tour reference is
    /// captured before deletion; it is gone afterwards.
    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        let existing = self.handler.get_one(id, None)?;
        self.check_ownership(&existing)?;
        let tour = existing.get_str(TOUR_FIELD).map(str::to_string);
        self.handler.delete_one(id)?;
        if let Ok(tour) = tour {
            self.recompute("delete", &tour);
        }
        Ok(())
    }

    fn check_ownership(&self, review: &bson::Document) -> Result<(), ApiError> {
        if self.identity.is_admin() {
            return Ok(());
        }
        if review.get_str(AUTHOR_FIELD).is_ok_and(|a| a == self.identity.user_id) {
            return Ok(());
        }
        Err(ApiError::Forbidden("you may only modify your own reviews".to_string()))
    }

    fn recompute_after(&self, op: &str, review: &bson::Document) {
        if let Ok(tour) = review.get_str(TOUR_FIELD) {
            let tour = tour.to_string();
            self.recompute(op, &tour);
        }
    }

    fn recompute(&self, op: &str, tour: &str) {
        if let Err(e) = self.ratings.recompute(self.store, tour) {
            log::warn!("ratings recompute after review {op} failed for tour {tour}: {e}");
        }
    }
}
