use crate::web::error::AppResult;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

/// Serves a stored object by key. Media URLs are public, like a public bucket.
pub async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> AppResult<Response> {
    let file_path = match state.storage.resolve(&key) {
        Ok(p) => p,
        Err(_) => return Ok(StatusCode::NOT_FOUND.into_response()),
    };

    // Ensure the resolved path is still within the bucket
    let canonical_root = state.storage.root().canonicalize().unwrap_or_default();
    let canonical_file = match file_path.canonicalize() {
        Ok(p) => p,
        Err(_) => return Ok(StatusCode::NOT_FOUND.into_response()),
    };
    if !canonical_file.starts_with(&canonical_root) {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let content = tokio::fs::read(&canonical_file).await?;
    let mime = mime_guess::from_path(&key).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        content,
    )
        .into_response())
}

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let db_ok = state
        .db
        .get()
        .and_then(|conn| Ok(conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?))
        .is_ok();

    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(serde_json::json!({
            "status": if db_ok { "ok" } else { "degraded" },
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
        .into_response()
}
