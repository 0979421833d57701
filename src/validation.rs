//! Review input validation.
//!
//! Rules run in a fixed order and the first failure wins. Invalid input is
//! always rejected with a structured error naming the offending fields;
//! nothing is silently dropped or truncated.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Entity, EntityType, Review};

/// Raw review submission as it arrives over the wire.
///
/// Loosely typed on purpose: `rating`, `tags`, and `subratings` accept any
/// JSON shape so that validation, not deserialization, produces the error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub module_code: Option<String>,
    #[serde(default)]
    pub subratings: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },
    #[error("rating must be an integer between 0 and 5")]
    InvalidRating,
    #[error("tags must be an array of strings")]
    InvalidTags,
    #[error("moduleCode is required for professor reviews")]
    MissingModuleCode,
    #[error("subratings must be an object")]
    InvalidSubratings,
    #[error("invalid subrating keys for {entity_type}: {}", keys.join(", "))]
    InvalidSubratingKeys {
        entity_type: &'static str,
        keys: Vec<String>,
    },
    #[error("subrating '{key}' must be an integer between 0 and 5")]
    InvalidSubratingValue { key: String },
}

/// A review submission that passed every rule.
#[derive(Debug, Clone)]
pub struct ValidatedReview {
    pub author_name: String,
    pub description: String,
    pub entity_id: String,
    pub rating: i64,
    pub tags: Vec<String>,
    pub subratings: BTreeMap<String, i64>,
    pub module_code: Option<String>,
}

impl ValidatedReview {
    /// Materialize a store-ready review document.
    pub fn into_review(self) -> Review {
        let mut review = Review::new(self.entity_id, self.author_name, self.description, self.rating);
        review.tags = self.tags;
        review.subratings = self.subratings;
        review.module_code = self.module_code;
        review
    }
}

/// Check required fields are present and non-empty.
///
/// Runs before the entity lookup, so a submission missing `entityId` is
/// reported as a validation error rather than a not-found.
pub fn check_required(input: &ReviewInput) -> Result<(), ValidationError> {
    let mut missing = Vec::new();
    if input.author_name.as_deref().map_or(true, str::is_empty) {
        missing.push("authorName".to_string());
    }
    if input.description.as_deref().map_or(true, str::is_empty) {
        missing.push("description".to_string());
    }
    if input.entity_id.as_deref().map_or(true, str::is_empty) {
        missing.push("entityId".to_string());
    }
    // A rating of 0 is present; only absent or null counts as missing.
    if input.rating.as_ref().map_or(true, Value::is_null) {
        missing.push("rating".to_string());
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { fields: missing })
    }
}

/// Validate a submission against the referenced entity.
///
/// The caller has already run [`check_required`] and resolved `entity` from
/// `input.entity_id`.
pub fn validate(input: &ReviewInput, entity: &Entity) -> Result<ValidatedReview, ValidationError> {
    let rating = parse_score(input.rating.as_ref().unwrap_or(&Value::Null))
        .ok_or(ValidationError::InvalidRating)?;

    let tags = match &input.tags {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => parse_string_array(value).ok_or(ValidationError::InvalidTags)?,
    };

    let module_code = input.module_code.clone().filter(|m| !m.is_empty());
    if entity.entity_type == EntityType::Professor && module_code.is_none() {
        return Err(ValidationError::MissingModuleCode);
    }

    let subratings = match &input.subratings {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(value) => parse_subratings(value, entity.entity_type)?,
    };

    Ok(ValidatedReview {
        author_name: input.author_name.clone().unwrap_or_default(),
        description: input.description.clone().unwrap_or_default(),
        entity_id: entity.id.clone(),
        rating,
        tags,
        subratings,
        module_code,
    })
}

/// Parse a 0-5 integer score, coercing numeric strings.
fn parse_score(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                // Accept floats only when they carry an integer value.
                let f = n.as_f64()?;
                if f.fract() != 0.0 {
                    return None;
                }
                f as i64
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (0..=5).contains(&n).then_some(n)
}

fn parse_string_array(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn parse_subratings(
    value: &Value,
    entity_type: EntityType,
) -> Result<BTreeMap<String, i64>, ValidationError> {
    let map = value.as_object().ok_or(ValidationError::InvalidSubratings)?;

    let valid_keys = entity_type.subrating_keys();
    let invalid: Vec<String> = map
        .keys()
        .filter(|key| !valid_keys.contains(&key.as_str()))
        .cloned()
        .collect();
    if !invalid.is_empty() {
        return Err(ValidationError::InvalidSubratingKeys {
            entity_type: entity_type.as_str(),
            keys: invalid,
        });
    }

    let mut parsed = BTreeMap::new();
    for (key, raw) in map {
        let score = parse_score(raw).ok_or_else(|| ValidationError::InvalidSubratingValue {
            key: key.clone(),
        })?;
        parsed.insert(key.clone(), score);
    }
    Ok(parsed)
}
