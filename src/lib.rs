pub mod api;
pub mod auth;
pub mod document;
pub mod entities;
pub mod errors;
pub mod logger;
pub mod query;
pub mod ratings;
pub mod resource;
pub mod store;
pub mod types;

use crate::auth::Identity;
use crate::entities::{ReviewService, booking, review, tour, user};
use crate::errors::ApiError;
use crate::ratings::RatingsMaintainer;
use crate::resource::ResourceHandler;
use crate::store::Store;

/// The booking catalog: an in-memory document store with the four entity
/// collections registered, plus the ratings maintainer that keeps tour
/// statistics in sync with reviews.
pub struct Catalog {
    store: Store,
    ratings: RatingsMaintainer,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        let store = Store::new();
        for schema in [tour::schema(), review::schema(), user::schema(), booking::schema()] {
            store.create_collection(schema.collection);
        }
        Self { store, ratings: RatingsMaintainer::new() }
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn ratings(&self) -> &RatingsMaintainer {
        &self.ratings
    }

    #[must_use]
    pub fn tours(&self) -> ResourceHandler<'_> {
        ResourceHandler::new(&self.store, tour::schema())
    }

    #[must_use]
    pub fn users(&self) -> ResourceHandler<'_> {
        ResourceHandler::new(&self.store, user::schema())
    }

    #[must_use]
    pub fn bookings(&self) -> ResourceHandler<'_> {
        ResourceHandler::new(&self.store, booking::schema())
    }

    /// Review operations require the acting user for ownership checks.
    #[must_use]
    pub fn reviews(&self, identity: Identity) -> ReviewService<'_> {
        ReviewService::new(&self.store, &self.ratings, identity)
    }

    /// Execute a raw query spec against a named collection.
    ///
    /// # Errors
    /// `NoSuchCollection` when the name is unknown.
    pub fn find(
        &self,
        collection: &str,
        spec: &query::QuerySpec,
    ) -> Result<Vec<document::Document>, ApiError> {
        let col = self
            .store
            .get_collection(collection)
            .ok_or_else(|| ApiError::NoSuchCollection(collection.to_string()))?;
        Ok(query::find_docs(&col, spec))
    }

    /// Count documents matching a filter in a named collection.
    ///
    /// # Errors
    /// `NoSuchCollection` when the name is unknown.
    pub fn count(&self, collection: &str, filter: &query::Filter) -> Result<usize, ApiError> {
        let col = self
            .store
            .get_collection(collection)
            .ok_or_else(|| ApiError::NoSuchCollection(collection.to_string()))?;
        Ok(query::count_docs(&col, filter))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
