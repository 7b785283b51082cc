mod error;
mod extractors;
mod handlers;
mod routes;
pub mod security;
mod state;

pub use extractors::SESSION_COOKIE;
pub use state::AppState;

use crate::services::auth;
use crate::{Config, Database};
use anyhow::Result;
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

/// Files allowed in a single multipart upload request.
const MAX_FILES_PER_UPLOAD: usize = 20;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state
        .upload
        .max_bytes
        .saturating_mul(MAX_FILES_PER_UPLOAD);

    Router::new()
        .merge(routes::public_routes())
        .merge(routes::auth_routes())
        .merge(routes::gallery_routes(upload_limit))
        .merge(routes::admin_routes())
        .layer(middleware::from_fn(security::apply_security_headers))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config, db: Database, addr: &str) -> Result<()> {
    let state = Arc::new(AppState::new(config, db)?);

    let cleanup_state = state.clone();
    tokio::spawn(async move {
        run_cleanup_job(cleanup_state).await;
    });

    let app = router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Drops expired sessions and stale rate-limit entries every hour.
async fn run_cleanup_job(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
    loop {
        interval.tick().await;
        match auth::cleanup_expired_sessions(&state.db) {
            Ok(0) => {}
            Ok(n) => tracing::info!("Removed {} expired session(s)", n),
            Err(e) => tracing::error!("Session cleanup failed: {}", e),
        }
        state.login_limiter.cleanup();
        state.unlock_limiter.cleanup();
    }
}
