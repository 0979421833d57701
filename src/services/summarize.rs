//! Summarization batch job.
//!
//! Iterates entities and writes a natural-language review summary for each
//! one, isolating per-entity failures so one bad entity cannot abort the
//! run. The summary write path never leaves `review_summary` unset when it
//! could at least persist a fallback:
//!
//! - zero reviews: the fixed no-reviews placeholder is written (a skip);
//! - provider failure of any kind: the fixed fallback string is written,
//!   and the entity still counts as a success once it is persisted;
//! - store failure while processing: counted as an error, entity skipped,
//!   batch continues.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::models::Entity;
use crate::store::{EntityStore, ReviewStore, StoreError};
use crate::summary::{SummaryClient, FALLBACK_SUMMARY, NO_REVIEWS_SUMMARY};

use super::ServiceError;

/// Outcome counters for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub success_count: usize,
    pub error_count: usize,
    pub skipped_count: usize,
}

enum Outcome {
    Summarized,
    Skipped,
}

pub struct SummarizeService {
    entities: Arc<dyn EntityStore>,
    reviews: Arc<dyn ReviewStore>,
    client: SummaryClient,
}

impl SummarizeService {
    pub fn new(
        entities: Arc<dyn EntityStore>,
        reviews: Arc<dyn ReviewStore>,
        client: SummaryClient,
    ) -> Self {
        Self { entities, reviews, client }
    }

    /// Run the batch over up to `limit` entities (all when `None`).
    ///
    /// Entities are processed sequentially within one invocation; only a
    /// failure to list the entities at all aborts the run.
    pub async fn run(&self, limit: Option<usize>) -> Result<BatchStats, ServiceError> {
        let entities = self.entities.list(limit).await?;

        let mut stats = BatchStats::default();
        for entity in &entities {
            match self.process_entity(entity).await {
                Ok(Outcome::Summarized) => stats.success_count += 1,
                Ok(Outcome::Skipped) => stats.skipped_count += 1,
                Err(e) => {
                    error!(entity_id = %entity.id, error = %e, "error processing entity");
                    stats.error_count += 1;
                }
            }
        }

        info!(
            success_count = stats.success_count,
            error_count = stats.error_count,
            skipped_count = stats.skipped_count,
            "summary generation completed"
        );
        Ok(stats)
    }

    async fn process_entity(&self, entity: &Entity) -> Result<Outcome, StoreError> {
        let reviews = self.reviews.list_for_entity(&entity.id).await?;

        if reviews.is_empty() {
            info!(entity_id = %entity.id, "no reviews found, skipping");
            self.entities
                .update_summary(&entity.id, NO_REVIEWS_SUMMARY)
                .await?;
            return Ok(Outcome::Skipped);
        }

        let summary = match self.client.summarize(entity, &reviews).await {
            Ok(summary) => summary,
            Err(e) => {
                // Provider failures are absorbed: the fallback is persisted
                // and the entity counts as processed.
                warn!(entity_id = %entity.id, error = %e, "summary provider failed, using fallback");
                FALLBACK_SUMMARY.to_string()
            }
        };

        self.entities.update_summary(&entity.id, &summary).await?;
        Ok(Outcome::Summarized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityType, Review};
    use crate::store::MemoryStore;
    use crate::summary::SummaryConfig;
    use async_trait::async_trait;

    /// Provider that always fails (no API key, unroutable endpoint).
    fn failing_client() -> SummaryClient {
        let mut config = SummaryConfig::base_default();
        config.enabled = true;
        config.api_key = None;
        SummaryClient::new(config).unwrap()
    }

    async fn put_entity(store: &MemoryStore, id: &str) {
        let entity = Entity::new(id.to_string(), id.to_string(), EntityType::Canteen);
        store.insert_if_absent(&entity).await.unwrap();
    }

    async fn put_review(store: &MemoryStore, entity_id: &str) {
        let review = Review::new(entity_id.into(), "Bob".into(), "good".into(), 4);
        store.insert(&review).await.unwrap();
    }

    async fn summary_of(store: &MemoryStore, id: &str) -> Option<String> {
        EntityStore::get(store, id).await.unwrap().unwrap().review_summary
    }

    #[tokio::test]
    async fn test_zero_reviews_writes_placeholder_and_skips() {
        let store = MemoryStore::new();
        put_entity(&store, "C01").await;

        let service = SummarizeService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            failing_client(),
        );
        let stats = service.run(None).await.unwrap();

        assert_eq!(stats, BatchStats { success_count: 0, error_count: 0, skipped_count: 1 });
        assert_eq!(summary_of(&store, "C01").await.as_deref(), Some(NO_REVIEWS_SUMMARY));
    }

    #[tokio::test]
    async fn test_provider_failure_persists_fallback_as_success() {
        let store = MemoryStore::new();
        put_entity(&store, "C01").await;
        put_review(&store, "C01").await;

        let service = SummarizeService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            failing_client(),
        );
        let stats = service.run(None).await.unwrap();

        assert_eq!(stats, BatchStats { success_count: 1, error_count: 0, skipped_count: 0 });
        assert_eq!(summary_of(&store, "C01").await.as_deref(), Some(FALLBACK_SUMMARY));
    }

    #[tokio::test]
    async fn test_limit_caps_the_pass() {
        let store = MemoryStore::new();
        for id in ["C01", "C02", "C03"] {
            put_entity(&store, id).await;
        }

        let service = SummarizeService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            failing_client(),
        );
        let stats = service.run(Some(2)).await.unwrap();
        assert_eq!(stats.skipped_count, 2);
        // Store order is by ID, so C03 is the one left untouched.
        assert_eq!(summary_of(&store, "C03").await, None);
    }

    /// Entity store whose summary writes fail for one poisoned ID.
    #[derive(Clone)]
    struct PoisonedStore {
        inner: MemoryStore,
        poisoned: String,
    }

    #[async_trait]
    impl EntityStore for PoisonedStore {
        async fn get(&self, id: &str) -> Result<Option<Entity>, StoreError> {
            EntityStore::get(&self.inner, id).await
        }
        async fn list(&self, limit: Option<usize>) -> Result<Vec<Entity>, StoreError> {
            self.inner.list(limit).await
        }
        async fn list_ids_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
            self.inner.list_ids_with_prefix(prefix).await
        }
        async fn insert_if_absent(&self, entity: &Entity) -> Result<(), StoreError> {
            self.inner.insert_if_absent(entity).await
        }
        async fn update_aggregate(
            &self,
            id: &str,
            avg_rating: f64,
            rating_count: u64,
        ) -> Result<(), StoreError> {
            self.inner.update_aggregate(id, avg_rating, rating_count).await
        }
        async fn update_summary(&self, id: &str, summary: &str) -> Result<(), StoreError> {
            if id == self.poisoned {
                return Err(StoreError::Backend("write refused".to_string()));
            }
            self.inner.update_summary(id, summary).await
        }
        async fn delete(&self, id: &str) -> Result<Entity, StoreError> {
            EntityStore::delete(&self.inner, id).await
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_counted_and_batch_continues() {
        let store = MemoryStore::new();
        put_entity(&store, "C01").await;
        put_entity(&store, "C02").await;
        put_review(&store, "C01").await;
        put_review(&store, "C02").await;

        let poisoned = PoisonedStore { inner: store.clone(), poisoned: "C01".to_string() };
        let service = SummarizeService::new(
            Arc::new(poisoned),
            Arc::new(store.clone()),
            failing_client(),
        );
        let stats = service.run(None).await.unwrap();

        // C01's write fails and is counted; C02 is still processed.
        assert_eq!(stats, BatchStats { success_count: 1, error_count: 1, skipped_count: 0 });
        assert_eq!(summary_of(&store, "C01").await, None);
        assert_eq!(summary_of(&store, "C02").await.as_deref(), Some(FALLBACK_SUMMARY));
    }
}
