//! Review model: a user submission rating an entity.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user review of an entity.
///
/// Reviews are immutable once written except for `vote_count`, which only
/// ever increases. Deleting or writing a review triggers recomputation of
/// the owning entity's aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Store-generated identifier.
    pub id: String,
    /// ID of the entity this review belongs to.
    pub entity_id: String,
    pub author_name: String,
    pub description: String,
    /// Rating in [0, 5]. Optional so that legacy documents without a rating
    /// are representable; the aggregator excludes them from sum and count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Category-specific 0-5 scores keyed by the entity type's key set.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subratings: BTreeMap<String, i64>,
    /// Required for PROFESSOR reviews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_code: Option<String>,
    /// Starts at 0, monotonically non-decreasing.
    pub vote_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Create a new review with a fresh UUID and zero votes.
    pub fn new(entity_id: String, author_name: String, description: String, rating: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            entity_id,
            author_name,
            description,
            rating: Some(rating),
            tags: Vec::new(),
            subratings: BTreeMap::new(),
            module_code: None,
            vote_count: 0,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_review_defaults() {
        let review = Review::new(
            "C01".to_string(),
            "Bob".to_string(),
            "Very nice and tasty!".to_string(),
            4,
        );
        assert_eq!(review.vote_count, 0);
        assert_eq!(review.rating, Some(4));
        assert!(review.tags.is_empty());
        assert!(!review.id.is_empty());
    }

    #[test]
    fn test_deserialize_without_rating() {
        // Legacy documents may lack a rating entirely.
        let review: Review = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "entityId": "C01",
            "authorName": "Bob",
            "description": "ok",
            "voteCount": 0,
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(review.rating, None);
        assert_eq!(review.entity_id, "C01");
    }
}
