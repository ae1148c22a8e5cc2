//! Read-only HTTP API over the match store.
//!
//! - `GET /matches` – every match in page order
//! - `GET /matches/{day}` – matches whose day equals `{day}`, ignoring case
//!
//! Empty results answer 404 with a `{"detail": ...}` body. Any origin may
//! read the API with `GET`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::app::Result;
use crate::domain::MatchRecord;
use crate::store::{MemoryStore, Store};

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<MemoryStore>,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": detail }))).into_response()
            }
        }
    }
}

pub fn router(store: Arc<MemoryStore>) -> Router {
    Router::new()
        .route("/matches", get(all_matches))
        .route("/matches/{day}", get(matches_by_day))
        .layer(cors())
        .with_state(ApiState { store })
}

/// Credentials are not allowed together with a wildcard origin.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

pub async fn all_matches(
    State(state): State<ApiState>,
) -> std::result::Result<Json<Vec<MatchRecord>>, ApiError> {
    let records = state.store.get_all();
    if records.is_empty() {
        return Err(ApiError::NotFound("No matches found".to_string()));
    }
    Ok(Json(records))
}

pub async fn matches_by_day(
    State(state): State<ApiState>,
    Path(day): Path<String>,
) -> std::result::Result<Json<Vec<MatchRecord>>, ApiError> {
    let records = state.store.get_by_day(&day);
    if records.is_empty() {
        return Err(ApiError::NotFound(format!("No matches found for day: {}", day)));
    }
    Ok(Json(records))
}

/// Serve the API until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, store: Arc<MemoryStore>, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{}", addr);
    }

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(records: Vec<MatchRecord>) -> ApiState {
        let store = Arc::new(MemoryStore::new());
        store.replace(records);
        ApiState { store }
    }

    fn sample() -> Vec<MatchRecord> {
        vec![
            MatchRecord::new("Sábado", "16h00", "Flamengo x Vasco"),
            MatchRecord::new("Domingo", "11h00", "Santos x Palmeiras"),
            MatchRecord::new("sábado", "18h30", "Grêmio x Inter"),
        ]
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_all_matches_empty_store_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let response = all_matches(State(ApiState { store })).await.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "detail": "No matches found" }));
    }

    #[tokio::test]
    async fn test_all_matches_after_empty_scrape_is_not_found() {
        let response = all_matches(State(state_with(Vec::new()))).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_all_matches() {
        let response = all_matches(State(state_with(sample()))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(
            body[0],
            json!({ "day": "Sábado", "time": "16h00", "match": "Flamengo x Vasco", "channels": "" })
        );
    }

    #[tokio::test]
    async fn test_matches_by_day_ignores_case() {
        let response = matches_by_day(State(state_with(sample())), Path("SÁBADO".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let fixtures: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["match"].as_str().unwrap())
            .collect();
        assert_eq!(fixtures, vec!["Flamengo x Vasco", "Grêmio x Inter"]);
    }

    #[tokio::test]
    async fn test_matches_by_unknown_day() {
        let response = matches_by_day(State(state_with(sample())), Path("Segunda".to_string()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "detail": "No matches found for day: Segunda" })
        );
    }

    #[tokio::test]
    async fn test_serve_routes_over_http() {
        let store = Arc::new(MemoryStore::new());
        store.replace(sample());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, store, async {
            let _ = rx.await;
        }));

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/matches/domingo", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: Vec<MatchRecord> = serde_json::from_str(&response.text().await.unwrap()).unwrap();
        assert_eq!(body, vec![MatchRecord::new("Domingo", "11h00", "Santos x Palmeiras")]);

        let response = client
            .get(format!("http://{}/matches/S%C3%A1bado", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_cross_origin_requests_are_allowed() {
        let store = Arc::new(MemoryStore::new());
        store.replace(sample());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, store, async {
            let _ = rx.await;
        }));

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/matches", addr))
            .header("Origin", "https://app.example.com")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(
            response.headers()["access-control-allow-origin"].to_str().unwrap(),
            "*"
        );

        let preflight = client
            .request(reqwest::Method::OPTIONS, format!("http://{}/matches/domingo", addr))
            .header("Origin", "https://app.example.com")
            .header("Access-Control-Request-Method", "GET")
            .send()
            .await
            .unwrap();
        assert!(preflight.status().is_success());
        let allowed = preflight.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .to_string();
        assert!(allowed.contains("GET"));

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
