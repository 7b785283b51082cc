use crate::models::User;
use crate::services::access::{self, Principal};
use crate::services::auth;
use crate::services::error::ServiceError;
use crate::web::error::AppError;
use crate::web::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "mediavault_session";

/// Signed-in user plus the raw session token that identified them.
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

impl CurrentUser {
    pub fn principal(&self) -> Principal<'_> {
        Principal::from(&self.user)
    }

    pub fn require_editor(&self) -> Result<(), ServiceError> {
        if access::can_edit(self.user.role) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if access::is_admin(self.user.role) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let state = state.clone();
        let headers = parts.headers.clone();
        Box::pin(async move {
            let cookies = CookieJar::from_headers(&headers);
            let token = cookies
                .get(SESSION_COOKIE)
                .map(|c| c.value().to_string())
                .ok_or(ServiceError::Unauthenticated)?;

            let user = auth::validate_session(&state.db, &token)?
                .ok_or(ServiceError::Unauthenticated)?;

            Ok(CurrentUser { user, token })
        })
    }
}

/// `User-Agent` header, empty when absent.
pub struct UserAgent(pub String);

impl<S> FromRequestParts<S> for UserAgent
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        Box::pin(async move { Ok(UserAgent(agent)) })
    }
}
