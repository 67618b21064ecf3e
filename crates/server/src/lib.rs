//! HTTP boundary for the dispatch engine.
//!
//! One endpoint does the work: `POST /` takes `{"query": ...}` plus an
//! optional `Authorization` header and always answers with a JSON array
//! (response items on success, `{"message": ...}` objects on error), so
//! clients process every reply the same way.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use stratus_backend::BackendError;
use stratus_dispatch::{DispatchError, Dispatcher};

#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
}

pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", post(handle_query))
        .route("/healthz", get(healthz))
        .with_state(AppState { dispatcher })
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn handle_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<serde_json::Value>>,
) -> Response {
    let query = body
        .as_ref()
        .and_then(|Json(value)| value.get("query"))
        .and_then(|q| q.as_str());
    let Some(query) = query else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "The 'query' field is required to get a response from the bot.",
        );
    };

    let token = caller_token(&headers);
    match state.dispatcher.respond(query, token.as_deref()).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(DispatchError::Backend(BackendError::InvalidToken))
        | Err(DispatchError::MissingToken) => error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid or missing API token. Please authenticate.",
        ),
        Err(err) => {
            log::error!("turn failed: {err}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong, sorry! Please try again.",
            )
        }
    }
}

/// Credential from the `Authorization` header; `Bearer`/`Token` prefixes
/// are accepted and stripped.
fn caller_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .unwrap_or(value)
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Errors keep the list envelope, with `message` objects instead of
/// response items.
fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!([{"message": message}]))).into_response()
}
