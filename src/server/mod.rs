//! Web server exposing the review API.
//!
//! Thin HTTP layer over the service structs: handlers translate requests
//! into service calls and service errors into status codes. All state is
//! shared through `AppState`.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::services::{EntityService, ReviewService, SummarizeService};
use crate::store::{EntityStore, MemoryStore, ReviewStore};
use crate::summary::{SummaryClient, SummaryConfig};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub entities: Arc<EntityService>,
    pub reviews: Arc<ReviewService>,
    pub summarize: Arc<SummarizeService>,
}

impl AppState {
    pub fn new(config: SummaryConfig) -> anyhow::Result<Self> {
        let store = MemoryStore::new();
        Self::with_store(store, config)
    }

    pub fn with_store(store: MemoryStore, config: SummaryConfig) -> anyhow::Result<Self> {
        let entities: Arc<dyn EntityStore> = Arc::new(store.clone());
        let reviews: Arc<dyn ReviewStore> = Arc::new(store);
        let client = SummaryClient::new(config)?;

        Ok(Self {
            entities: Arc::new(EntityService::new(entities.clone())),
            reviews: Arc::new(ReviewService::new(entities.clone(), reviews.clone())),
            summarize: Arc::new(SummarizeService::new(entities, reviews, client)),
        })
    }
}

/// Start the web server.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn test_config() -> SummaryConfig {
        // Provider is unreachable in tests so batch runs fall back.
        let mut config = SummaryConfig::base_default();
        config.enabled = true;
        config.api_key = None;
        config
    }

    fn test_app() -> axum::Router {
        create_router(AppState::new(test_config()).unwrap())
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_entity_allocates_id() {
        let app = test_app();

        let response = app
            .oneshot(post_json(
                "/api/entities",
                json!({ "name": "The Deck", "type": "CANTEEN" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let entity = body_json(response).await;
        assert_eq!(entity["id"], "C01");
        assert_eq!(entity["avgRating"], 0.0);
        assert_eq!(entity["ratingCount"], 0);
    }

    #[tokio::test]
    async fn test_create_entity_missing_fields() {
        let app = test_app();

        let response = app
            .oneshot(post_json("/api/entities", json!({ "name": "The Deck" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("type"));
    }

    #[tokio::test]
    async fn test_create_entity_duplicate_id_conflicts() {
        let app = test_app();
        let body = json!({ "id": "C01", "name": "The Deck", "type": "CANTEEN" });

        let response = app
            .clone()
            .oneshot(post_json("/api/entities", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(post_json("/api/entities", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_list_entities_filters_by_type() {
        let app = test_app();
        for (name, t) in [("The Deck", "CANTEEN"), ("PGP House", "DORM")] {
            let response = app
                .clone()
                .oneshot(post_json("/api/entities", json!({ "name": name, "type": t })))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(get("/api/entities?type=DORM"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let list = body_json(response).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["id"], "D01");
    }

    #[tokio::test]
    async fn test_review_flow_updates_aggregate() {
        let app = test_app();
        app.clone()
            .oneshot(post_json(
                "/api/entities",
                json!({ "id": "C01", "name": "The Deck", "type": "CANTEEN" }),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/reviews",
                json!({
                    "authorName": "Bob",
                    "description": "Very nice and tasty!",
                    "entityId": "C01",
                    "rating": 4
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let review_id = created["review"]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(get("/api/entities/C01"))
            .await
            .unwrap();
        let entity = body_json(response).await;
        assert_eq!(entity["avgRating"], 4.0);
        assert_eq!(entity["ratingCount"], 1);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/reviews/{review_id}/vote"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let voted = body_json(response).await;
        assert_eq!(voted["review"]["voteCount"], 1);
    }

    #[tokio::test]
    async fn test_get_review_by_id() {
        let app = test_app();
        app.clone()
            .oneshot(post_json(
                "/api/entities",
                json!({ "id": "C01", "name": "The Deck", "type": "CANTEEN" }),
            ))
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/reviews",
                json!({
                    "authorName": "Bob",
                    "description": "Very nice and tasty!",
                    "entityId": "C01",
                    "rating": 4
                }),
            ))
            .await
            .unwrap();
        let created = body_json(response).await;
        let review_id = created["review"]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(get(&format!("/api/reviews/{review_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let review = body_json(response).await;
        assert_eq!(review["authorName"], "Bob");
        assert_eq!(review["entityId"], "C01");

        let response = app.oneshot(get("/api/reviews/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_review_is_rejected() {
        let app = test_app();
        app.clone()
            .oneshot(post_json(
                "/api/entities",
                json!({ "id": "C01", "name": "The Deck", "type": "CANTEEN" }),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/api/reviews",
                json!({
                    "authorName": "Bob",
                    "description": "off the scale",
                    "entityId": "C01",
                    "rating": 11
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_review_for_unknown_entity_is_not_found() {
        let app = test_app();
        let response = app
            .oneshot(post_json(
                "/api/reviews",
                json!({
                    "authorName": "Bob",
                    "description": "where is this",
                    "entityId": "C99",
                    "rating": 4
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_summaries_reports_stats() {
        let app = test_app();
        app.clone()
            .oneshot(post_json(
                "/api/entities",
                json!({ "id": "C01", "name": "The Deck", "type": "CANTEEN" }),
            ))
            .await
            .unwrap();

        let response = app.oneshot(get("/api/summaries/run")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        // No reviews yet, so the single entity is skipped.
        assert_eq!(body["stats"]["skippedCount"], 1);
        assert_eq!(body["stats"]["errorCount"], 0);
    }
}
