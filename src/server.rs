//! HTTP data server.
//!
//! Serves the single stored dataset to dashboards and replaces it on POST.
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `GET /data` | Stored array as-is |
//! | `POST /data` | Replace the stored array |
//! | `GET /data/normalized` | Stored array as canonical records |
//! | `GET /healthz` | `ok` |

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chartboard_core::{
    ingest::{self, IngestError},
    normalize,
    store::{DatasetStore, StoreError},
    CanonicalRecord,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Shared router state. The mutex serializes every store access, so a read
/// never sees a write in progress.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<DatasetStore>>,
}

impl AppState {
    pub fn new(store: DatasetStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    async fn load(&self) -> Result<Vec<Value>, ApiError> {
        let store = self.store.lock().await;
        let worker = store.clone();
        let items = tokio::task::spawn_blocking(move || worker.load())
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;
        drop(store);
        Ok(items)
    }

    async fn save(&self, items: Vec<Value>) -> Result<usize, ApiError> {
        let store = self.store.lock().await;
        let worker = store.clone();
        let count = items.len();
        tokio::task::spawn_blocking(move || worker.save(&items))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;
        drop(store);
        Ok(count)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("stored dataset cannot be normalized: {0}")]
    Unprocessable(#[from] IngestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(store: DatasetStore) -> Router {
    Router::new()
        .route("/data", get(get_data).post(post_data))
        .route("/data/normalized", get(get_normalized))
        .route("/healthz", get(healthz))
        .with_state(AppState::new(store))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `bind` and serve until Ctrl-C.
pub async fn serve(bind: &str, store: DatasetStore) -> anyhow::Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address {bind:?}: {e}"))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        data_file = %store.path().display(),
        "data server listening"
    );

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("data server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_data(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    state.load().await.map(Json)
}

async fn post_data(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Value::Array(items) = body else {
        return Err(ApiError::BadRequest(
            "request body must be a JSON array".to_string(),
        ));
    };

    let count = state.save(items).await?;
    tracing::info!(count, "dataset replaced");
    Ok(Json(json!({ "status": "ok", "count": count })))
}

async fn get_normalized(
    State(state): State<AppState>,
) -> Result<Json<Vec<CanonicalRecord>>, ApiError> {
    let items = state.load().await?;
    let records = ingest::records_from_value(Value::Array(items))?;
    Ok(Json(normalize(&records)))
}

async fn healthz() -> &'static str {
    "ok"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(DatasetStore::new(dir.path().join("data.json")));
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn non_array_post_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(DatasetStore::new(dir.path().join("data.json")));
        let response = app
            .oneshot(
                Request::post("/data")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"category":"A"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("array"));
    }

    #[tokio::test]
    async fn normalizing_non_records_is_unprocessable() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("data.json"));
        store.save(&[json!(1), json!(2)]).unwrap();
        let response = router(store)
            .oneshot(Request::get("/data/normalized").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
