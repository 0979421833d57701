//! Review creation, deletion, and voting.
//!
//! Every store write to a review is followed by a call into the rating
//! aggregator, mirroring a document-write trigger: the aggregator sees the
//! pre- and post-write state and recomputes the owning entity's aggregate.
//! The aggregator never fails the operation that triggered it.

use std::sync::Arc;

use tracing::info;

use crate::aggregator::{RatingAggregator, ReviewWrite};
use crate::models::Review;
use crate::store::{EntityStore, ReviewStore, StoreError};
use crate::validation::{self, ReviewInput};

use super::ServiceError;

pub struct ReviewService {
    entities: Arc<dyn EntityStore>,
    reviews: Arc<dyn ReviewStore>,
    aggregator: RatingAggregator,
}

impl ReviewService {
    pub fn new(entities: Arc<dyn EntityStore>, reviews: Arc<dyn ReviewStore>) -> Self {
        let aggregator = RatingAggregator::new(entities.clone(), reviews.clone());
        Self { entities, reviews, aggregator }
    }

    /// Validate and persist a review, then recompute the entity aggregate.
    ///
    /// Validation order is fixed and the first failure wins: required
    /// fields, then the entity lookup, then the field rules.
    pub async fn create(&self, input: ReviewInput) -> Result<Review, ServiceError> {
        validation::check_required(&input)?;

        let entity_id = input.entity_id.clone().unwrap_or_default();
        let entity = self
            .entities
            .get(&entity_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("entity", entity_id))?;

        let review = validation::validate(&input, &entity)?.into_review();
        self.reviews.insert(&review).await?;
        info!(review_id = %review.id, entity_id = %review.entity_id, "review created");

        self.aggregator
            .on_review_write(&ReviewWrite::created(review.clone()))
            .await;
        Ok(review)
    }

    pub async fn get(&self, id: &str) -> Result<Review, ServiceError> {
        self.reviews
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("review", id))
    }

    pub async fn list_for_entity(&self, entity_id: &str) -> Result<Vec<Review>, ServiceError> {
        // Listing for a missing entity is a not-found, not an empty list.
        self.entities
            .get(entity_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("entity", entity_id))?;
        Ok(self.reviews.list_for_entity(entity_id).await?)
    }

    /// Delete a review and recompute the entity aggregate from the
    /// pre-write state.
    pub async fn delete(&self, id: &str) -> Result<Review, ServiceError> {
        let removed = match self.reviews.delete(id).await {
            Ok(review) => review,
            Err(StoreError::NotFound(_)) => return Err(ServiceError::not_found("review", id)),
            Err(e) => return Err(e.into()),
        };
        info!(review_id = %id, entity_id = %removed.entity_id, "review deleted");

        self.aggregator
            .on_review_write(&ReviewWrite::deleted(removed.clone()))
            .await;
        Ok(removed)
    }

    /// Increment a review's vote count.
    ///
    /// The increment is itself a review write, so it re-fires aggregation
    /// exactly like any other update (a no-op on the aggregate value).
    pub async fn vote(&self, id: &str) -> Result<Review, ServiceError> {
        let before = self
            .reviews
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("review", id))?;
        // The review can vanish between the read and the increment.
        let after = match self.reviews.increment_vote(id).await {
            Ok(review) => review,
            Err(StoreError::NotFound(_)) => return Err(ServiceError::not_found("review", id)),
            Err(e) => return Err(e.into()),
        };
        info!(review_id = %id, vote_count = after.vote_count, "vote added");

        self.aggregator
            .on_review_write(&ReviewWrite::updated(before, after.clone()))
            .await;
        Ok(after)
    }
}
