//! Event-driven rating aggregation.
//!
//! Every review write (create, update, delete) triggers a full
//! recomputation of the owning entity's average rating and review count.
//! Full recomputation over an incremental update is deliberate: it is
//! idempotent with respect to read timing, safe under duplicate trigger
//! delivery, and O(n) in the entity's review count per write.
//!
//! Failure semantics are at-most-once and best-effort. Errors are logged
//! and swallowed so a permanently-failing document cannot put the trigger
//! into an infinite retry loop; a failed recomputation leaves the aggregate
//! stale until the entity's next review write.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::Review;
use crate::store::{EntityStore, ReviewStore, StoreError};

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pre- and post-write state of a review document, as seen by the trigger.
#[derive(Debug, Clone)]
pub struct ReviewWrite {
    /// State before the write (`None` for a create).
    pub before: Option<Review>,
    /// State after the write (`None` for a delete).
    pub after: Option<Review>,
}

impl ReviewWrite {
    pub fn created(after: Review) -> Self {
        Self { before: None, after: Some(after) }
    }

    pub fn updated(before: Review, after: Review) -> Self {
        Self { before: Some(before), after: Some(after) }
    }

    pub fn deleted(before: Review) -> Self {
        Self { before: Some(before), after: None }
    }

    /// The affected entity: post-write state if the document still exists,
    /// pre-write state for the delete case.
    fn entity_id(&self) -> Option<&str> {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .map(|r| r.entity_id.as_str())
    }
}

/// Recomputes entity aggregates in response to review writes.
pub struct RatingAggregator {
    entities: Arc<dyn EntityStore>,
    reviews: Arc<dyn ReviewStore>,
}

impl RatingAggregator {
    pub fn new(entities: Arc<dyn EntityStore>, reviews: Arc<dyn ReviewStore>) -> Self {
        Self { entities, reviews }
    }

    /// Trigger entry point. Never fails: errors are logged and swallowed.
    pub async fn on_review_write(&self, write: &ReviewWrite) {
        let entity_id = match write.entity_id() {
            Some(id) => id.to_string(),
            None => {
                warn!("could not determine entity ID from review write");
                return;
            }
        };

        if let Err(e) = self.recompute(&entity_id).await {
            // Deliberately not retried; the aggregate stays stale until the
            // next review write for this entity.
            error!(entity_id = %entity_id, error = %e, "rating recomputation failed");
        }
    }

    /// Recompute and persist the aggregate for one entity.
    pub async fn recompute(&self, entity_id: &str) -> Result<(), AggregationError> {
        let reviews = self.reviews.list_for_entity(entity_id).await?;

        let mut total: i64 = 0;
        let mut count: u64 = 0;
        for review in &reviews {
            // Reviews without a rating contribute to neither sum nor count.
            if let Some(rating) = review.rating {
                total += rating;
                count += 1;
            }
        }

        let avg_rating = if count > 0 {
            round2(total as f64 / count as f64)
        } else {
            0.0
        };

        self.entities
            .update_aggregate(entity_id, avg_rating, count)
            .await?;

        info!(
            entity_id = %entity_id,
            avg_rating,
            rating_count = count,
            "entity rating updated"
        );
        Ok(())
    }
}

/// Round to two decimal places. Ties round away from zero (2.125 ->
/// 2.13), not to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
