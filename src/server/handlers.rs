//! HTTP handlers for the review API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::models::{EntityType, Location};
use crate::services::{NewEntity, ServiceError};
use crate::validation::ReviewInput;

use super::AppState;

/// Error wrapper mapping the service taxonomy onto status codes.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
        .into_response()
}

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct EntityListParams {
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
}

pub async fn list_entities(
    State(state): State<AppState>,
    Query(params): Query<EntityListParams>,
) -> Result<Response, ApiError> {
    let entity_type = match params.entity_type.as_deref() {
        None => None,
        Some(raw) => match EntityType::from_str(raw) {
            Some(t) => Some(t),
            None => return Ok(bad_request(format!("invalid entity type: {raw}"))),
        },
    };
    let entities = state.entities.list(entity_type).await?;
    Ok(Json(entities).into_response())
}

/// Entity creation body. Fields are optional so that missing required
/// fields produce a structured 400, not a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityBody {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub location: Option<Location>,
}

pub async fn create_entity(
    State(state): State<AppState>,
    Json(body): Json<CreateEntityBody>,
) -> Result<Response, ApiError> {
    let mut missing = Vec::new();
    if body.name.as_deref().map_or(true, str::is_empty) {
        missing.push("name");
    }
    if body.entity_type.as_deref().map_or(true, str::is_empty) {
        missing.push("type");
    }
    if !missing.is_empty() {
        return Ok(bad_request(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let raw_type = body.entity_type.unwrap_or_default();
    let entity_type = match EntityType::from_str(&raw_type) {
        Some(t) => t,
        None => {
            return Ok(bad_request(format!(
                "invalid entity type: {raw_type}. Must be one of: CANTEEN, DORM, CLASSROOM, PROFESSOR, TOILET"
            )))
        }
    };

    let entity = state
        .entities
        .create(NewEntity {
            id: body.id,
            name: body.name.unwrap_or_default(),
            entity_type,
            description: body.description,
            tags: body.tags,
            location: body.location,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(entity)).into_response())
}

pub async fn get_entity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let entity = state.entities.get(&id).await?;
    Ok(Json(entity).into_response())
}

pub async fn delete_entity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let entity = state.entities.delete(&id).await?;
    Ok(Json(json!({
        "message": "Entity deleted successfully",
        "id": entity.id,
        "name": entity.name,
        "type": entity.entity_type,
    }))
    .into_response())
}

pub async fn entity_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let reviews = state.reviews.list_for_entity(&id).await?;
    Ok(Json(reviews).into_response())
}

pub async fn create_review(
    State(state): State<AppState>,
    Json(input): Json<ReviewInput>,
) -> Result<Response, ApiError> {
    let review = state.reviews.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Review created successfully",
            "review": review,
        })),
    )
        .into_response())
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let review = state.reviews.get(&id).await?;
    Ok(Json(review).into_response())
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let removed = state.reviews.delete(&id).await?;
    Ok(Json(json!({
        "message": "Review deleted successfully",
        "id": removed.id,
    }))
    .into_response())
}

pub async fn vote_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let review = state.reviews.vote(&id).await?;
    Ok(Json(json!({
        "message": "Vote added successfully",
        "review": review,
    }))
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct SummariesParams {
    pub limit: Option<usize>,
}

/// Manually trigger summary generation across entities.
pub async fn run_summaries(
    State(state): State<AppState>,
    Query(params): Query<SummariesParams>,
) -> Result<Response, ApiError> {
    let stats = state.summarize.run(params.limit).await?;
    Ok(Json(json!({
        "message": "Summary generation completed",
        "stats": stats,
    }))
    .into_response())
}
