//! Shared helper functions for CLI commands.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::models::{EntityType, Location};
use crate::server::AppState;
use crate::services::NewEntity;
use crate::validation::ReviewInput;

/// One entity in a seed file, with its reviews inlined.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEntity {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub location: Option<Location>,
    #[serde(default)]
    pub reviews: Vec<Value>,
}

#[derive(Debug, Default)]
pub struct SeedStats {
    pub entities: usize,
    pub reviews: usize,
    pub rejected_reviews: usize,
}

/// Load a JSON seed file into the running state.
///
/// Reviews go through the normal validation and aggregation path, so a
/// seeded dataset ends up with correct `avgRating`/`ratingCount` values.
/// Invalid reviews are counted and skipped; a bad entity aborts the load.
pub async fn load_seed(state: &AppState, path: &Path) -> anyhow::Result<SeedStats> {
    let raw = tokio::fs::read_to_string(path).await?;
    let entries: Vec<SeedEntity> = serde_json::from_str(&raw)?;

    let mut stats = SeedStats::default();
    for entry in entries {
        let name = entry.name.clone();
        let entity = state
            .entities
            .create(NewEntity {
                id: entry.id,
                name: entry.name,
                entity_type: entry.entity_type,
                description: entry.description,
                tags: entry.tags,
                location: entry.location,
            })
            .await
            .map_err(|e| anyhow::anyhow!("seeding '{}': {}", name, e))?;
        stats.entities += 1;

        for mut review in entry.reviews {
            if let Some(obj) = review.as_object_mut() {
                obj.insert("entityId".to_string(), Value::String(entity.id.clone()));
            }
            // Malformed field types are rejections, same as validation
            // failures; they do not abort the load.
            let input: ReviewInput = match serde_json::from_value(review) {
                Ok(input) => input,
                Err(e) => {
                    tracing::warn!(entity_id = %entity.id, error = %e, "seed review rejected");
                    stats.rejected_reviews += 1;
                    continue;
                }
            };
            match state.reviews.create(input).await {
                Ok(_) => stats.reviews += 1,
                Err(e) => {
                    tracing::warn!(entity_id = %entity.id, error = %e, "seed review rejected");
                    stats.rejected_reviews += 1;
                }
            }
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::SummaryConfig;

    #[tokio::test]
    async fn test_load_seed_builds_aggregates() {
        let dir = std::env::temp_dir().join(format!("campusrate-seed-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("seed.json");
        std::fs::write(
            &path,
            serde_json::json!([
                {
                    "name": "The Deck",
                    "type": "CANTEEN",
                    "reviews": [
                        { "authorName": "Bob", "description": "great food", "rating": 4 },
                        { "authorName": "Ann", "description": "long queues", "rating": 3 },
                        { "authorName": "Eve", "description": "bad", "rating": 99 },
                        { "authorName": 42, "description": "wrong type", "rating": 4 }
                    ]
                },
                { "id": "D01", "name": "PGP House", "type": "DORM" }
            ])
            .to_string(),
        )
        .unwrap();

        let state = AppState::new(SummaryConfig::base_default()).unwrap();
        let stats = load_seed(&state, &path).await.unwrap();
        assert_eq!(stats.entities, 2);
        assert_eq!(stats.reviews, 2);
        // One invalid rating, one field with the wrong JSON type.
        assert_eq!(stats.rejected_reviews, 2);

        let entity = state.entities.get("C01").await.unwrap();
        assert_eq!(entity.avg_rating, 3.5);
        assert_eq!(entity.rating_count, 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}
