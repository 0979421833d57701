//! In-memory document store.
//!
//! Backs the server, CLI, and tests. Single-document operations take the
//! write lock for their full duration, so `insert_if_absent` is a true
//! compare-and-swap and `increment_vote` is atomic. There are no
//! multi-document transactions, matching the external store this models.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Entity, Review};

use super::{EntityStore, ReviewStore, StoreError};

/// Shared in-memory store over both collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entities: Arc<RwLock<HashMap<String, Entity>>>,
    reviews: Arc<RwLock<HashMap<String, Review>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        Ok(self.entities.read().await.get(id).cloned())
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<Entity>, StoreError> {
        let entities = self.entities.read().await;
        let mut all: Vec<Entity> = entities.values().cloned().collect();
        // Stable order for pagination and deterministic batch runs.
        all.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(n) = limit {
            all.truncate(n);
        }
        Ok(all)
    }

    async fn list_ids_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let entities = self.entities.read().await;
        Ok(entities
            .keys()
            .filter(|id| id.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn insert_if_absent(&self, entity: &Entity) -> Result<(), StoreError> {
        let mut entities = self.entities.write().await;
        if entities.contains_key(&entity.id) {
            return Err(StoreError::AlreadyExists(entity.id.clone()));
        }
        entities.insert(entity.id.clone(), entity.clone());
        Ok(())
    }

    async fn update_aggregate(
        &self,
        id: &str,
        avg_rating: f64,
        rating_count: u64,
    ) -> Result<(), StoreError> {
        let mut entities = self.entities.write().await;
        let entity = entities
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entity.avg_rating = avg_rating;
        entity.rating_count = rating_count;
        Ok(())
    }

    async fn update_summary(&self, id: &str, summary: &str) -> Result<(), StoreError> {
        let mut entities = self.entities.write().await;
        let entity = entities
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entity.review_summary = Some(summary.to_string());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<Entity, StoreError> {
        let mut entities = self.entities.write().await;
        entities
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Review>, StoreError> {
        Ok(self.reviews.read().await.get(id).cloned())
    }

    async fn insert(&self, review: &Review) -> Result<(), StoreError> {
        let mut reviews = self.reviews.write().await;
        if reviews.contains_key(&review.id) {
            return Err(StoreError::AlreadyExists(review.id.clone()));
        }
        reviews.insert(review.id.clone(), review.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<Review, StoreError> {
        let mut reviews = self.reviews.write().await;
        reviews
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_for_entity(&self, entity_id: &str) -> Result<Vec<Review>, StoreError> {
        let reviews = self.reviews.read().await;
        let mut matched: Vec<Review> = reviews
            .values()
            .filter(|r| r.entity_id == entity_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matched)
    }

    async fn increment_vote(&self, id: &str) -> Result<Review, StoreError> {
        let mut reviews = self.reviews.write().await;
        let review = reviews
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        review.vote_count += 1;
        Ok(review.clone())
    }
}
