use crate::entities::{review, tour};
use crate::errors::ApiError;
use crate::store::Store;
use crate::types::DocumentId;
use bson::Bson;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Defaults persisted when a tour has no reviews left.
pub const DEFAULT_AVERAGE: f64 = 4.5;

/// Keeps a tour's denormalized rating statistics in sync with its
/// reviews. `recompute` re-aggregates from the full child set; callers
/// invoke it explicitly after each committed review mutation.
pub struct RatingsMaintainer {
    // One lock per tour so concurrent recomputes for the same parent
    // cannot interleave their read-aggregate-write sequences.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RatingsMaintainer {
    #[must_use]
    pub fn new() -> Self {
        Self { locks: Mutex::new(HashMap::new()) }
    }

    fn lock_for(&self, tour_id: &str) -> Arc<Mutex<()>> {
        self.locks.lock().entry(tour_id.to_string()).or_default().clone()
    }

    /// Recompute and persist one tour's `ratingsQuantity`/`ratingsAverage`
    /// from its current reviews. With no reviews the documented defaults
    /// are written back rather than leaving stale values. Idempotent.
    ///
    /// # Errors
    /// `AggregateRecomputeFailed` when the tour (or a collection) is
    /// missing. Callers treat this as non-fatal: the triggering review
    /// mutation has already committed.
    pub fn recompute(&self, store: &Store, tour_id: &str) -> Result<(), ApiError> {
        let guard = self.lock_for(tour_id);
        let _held = guard.lock();

        let reviews = store.get_collection(review::COLLECTION).ok_or_else(|| {
            ApiError::AggregateRecomputeFailed("reviews collection missing".to_string())
        })?;
        let mut count = 0u64;
        let mut sum = 0.0f64;
        for d in reviews.get_all_documents() {
            if d.data.get_str(review::TOUR_FIELD).ok() != Some(tour_id) {
                continue;
            }
            if let Some(rating) = d.data.get(review::RATING_FIELD).and_then(rating_as_f64) {
                count += 1;
                sum += rating;
            }
        }
        let (quantity, average) = if count > 0 {
            (count, round_one_decimal(sum / count as f64))
        } else {
            (0, DEFAULT_AVERAGE)
        };

        let tours = store.get_collection(tour::COLLECTION).ok_or_else(|| {
            ApiError::AggregateRecomputeFailed("tours collection missing".to_string())
        })?;
        let doc_id: DocumentId = tour_id.parse().map_err(|_| {
            ApiError::AggregateRecomputeFailed(format!("invalid tour id '{tour_id}'"))
        })?;
        let mut tour_doc = tours.find_document(&doc_id).ok_or_else(|| {
            ApiError::AggregateRecomputeFailed(format!("tour {tour_id} not found"))
        })?;
        tour_doc.data.insert(tour::RATINGS_QUANTITY_FIELD, Bson::Int64(quantity as i64));
        tour_doc.data.insert(tour::RATINGS_AVERAGE_FIELD, Bson::Double(average));
        tours.update_document(&doc_id, tour_doc.data);
        log::info!("ratings recomputed tour={tour_id} quantity={quantity} average={average}");
        Ok(())
    }
}

impl Default for RatingsMaintainer {
    fn default() -> Self {
        Self::new()
    }
}

fn rating_as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

/// Round half away from zero to one decimal.
fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
