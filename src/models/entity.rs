//! Entity model: a reviewable campus object.
//!
//! Entities carry two derived fields (`avg_rating`, `rating_count`) that
//! are caches over the review set. Only the rating aggregator writes them;
//! the summarization batch job owns `review_summary` the same way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a reviewable entity.
///
/// Each category has a fixed ID prefix, a fixed zero-padding width for the
/// numeric suffix, and a fixed set of five sub-rating keys. None of these
/// are user-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Canteen,
    Dorm,
    Classroom,
    Professor,
    Toilet,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canteen => "CANTEEN",
            Self::Dorm => "DORM",
            Self::Classroom => "CLASSROOM",
            Self::Professor => "PROFESSOR",
            Self::Toilet => "TOILET",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CANTEEN" => Some(Self::Canteen),
            "DORM" => Some(Self::Dorm),
            "CLASSROOM" => Some(Self::Classroom),
            "PROFESSOR" => Some(Self::Professor),
            "TOILET" => Some(Self::Toilet),
            _ => None,
        }
    }

    /// ID prefix for this category (e.g. "C" for canteens, "CR" for classrooms).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Canteen => "C",
            Self::Dorm => "D",
            Self::Classroom => "CR",
            Self::Professor => "P",
            Self::Toilet => "T",
        }
    }

    /// Zero-padding width of the numeric ID suffix.
    pub fn id_pad_width(&self) -> usize {
        match self {
            Self::Canteen | Self::Dorm => 2,
            Self::Classroom | Self::Professor | Self::Toilet => 3,
        }
    }

    /// Valid sub-rating keys for reviews of this category.
    pub fn subrating_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Canteen => &["taste", "valueForMoney", "portionSize", "hygiene", "waitingTime"],
            Self::Dorm => &[
                "roomCondition",
                "cleanliness",
                "facilities",
                "community",
                "valueForMoney",
            ],
            Self::Classroom => &[
                "comfort",
                "visibility",
                "audioClarity",
                "ventilation",
                "powerAndWifi",
            ],
            Self::Professor => &[
                "clarity",
                "engagement",
                "approachability",
                "fairness",
                "organisation",
            ],
            Self::Toilet => &["cleanliness", "smell", "maintenance", "privacy", "accessibility"],
        }
    }
}

/// Geographic coordinates. Stored as-is; no spatial indexing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A reviewable campus object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Category-prefixed identifier (e.g. "C01", "CR012"). Immutable.
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Derived: mean of review ratings, rounded to 2 decimal places.
    pub avg_rating: f64,
    /// Derived: number of reviews with a rating.
    pub rating_count: u64,
    /// Derived: batch-generated natural-language digest of the reviews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity {
    /// Create a new entity with zeroed aggregates.
    pub fn new(id: String, name: String, entity_type: EntityType) -> Self {
        Self {
            id,
            name,
            entity_type,
            description: None,
            tags: None,
            location: None,
            avg_rating: 0.0,
            rating_count: 0,
            review_summary: None,
            created_at: Utc::now(),
        }
    }
}
