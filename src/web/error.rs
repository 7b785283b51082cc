use crate::services::error::ServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = self.0.downcast_ref::<ServiceError>() {
            let status = match err {
                ServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
                ServiceError::Forbidden => StatusCode::FORBIDDEN,
                ServiceError::Locked => StatusCode::LOCKED,
                ServiceError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            };
            tracing::debug!("Request rejected ({}): {}", status, err);
            return (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response();
        }

        tracing::error!("Application error: {:?}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Internal server error" })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
