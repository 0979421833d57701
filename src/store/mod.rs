//! Store layer: the boundary to the document store.
//!
//! The backing store is collection-oriented and keyed by string document
//! ID. It offers single-document atomic updates but no multi-document
//! transactions; everything above this layer is written to tolerate that
//! (full-recompute aggregation, create-if-absent ID reservation).

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Entity, Review};

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("document already exists: {0}")]
    AlreadyExists(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Access to the entities collection.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Entity>, StoreError>;

    /// List entities in store order, optionally capped at `limit`.
    async fn list(&self, limit: Option<usize>) -> Result<Vec<Entity>, StoreError>;

    /// List every entity ID starting with `prefix`.
    async fn list_ids_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Create the entity only if no document with its ID exists.
    ///
    /// Returns [`StoreError::AlreadyExists`] on collision; this is the
    /// compare-and-swap primitive the ID allocator builds on.
    async fn insert_if_absent(&self, entity: &Entity) -> Result<(), StoreError>;

    /// Write the derived aggregate fields. Only the rating aggregator calls this.
    async fn update_aggregate(
        &self,
        id: &str,
        avg_rating: f64,
        rating_count: u64,
    ) -> Result<(), StoreError>;

    /// Write the derived review summary. Only the batch job calls this.
    async fn update_summary(&self, id: &str, summary: &str) -> Result<(), StoreError>;

    /// Delete an entity, returning the removed document.
    async fn delete(&self, id: &str) -> Result<Entity, StoreError>;
}

/// Access to the reviews collection.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Review>, StoreError>;

    async fn insert(&self, review: &Review) -> Result<(), StoreError>;

    /// Delete a review, returning the removed document (the pre-write state
    /// the aggregator needs for the delete case).
    async fn delete(&self, id: &str) -> Result<Review, StoreError>;

    /// All reviews referencing `entity_id`.
    async fn list_for_entity(&self, entity_id: &str) -> Result<Vec<Review>, StoreError>;

    /// Atomically increment the vote count, returning the updated review.
    async fn increment_vote(&self, id: &str) -> Result<Review, StoreError>;
}
