use crate::models::Role;
use crate::services::auth;
use crate::services::error::ServiceError;
use crate::web::error::AppResult;
use crate::web::extractors::{CurrentUser, SESSION_COOKIE};
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;
use time::Duration;

fn session_cookie(token: String, max_age_days: Option<i64>) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    if let Some(days) = max_age_days {
        cookie.set_max_age(Duration::days(days));
    }
    cookie
}

#[derive(Deserialize)]
pub struct SetupForm {
    username: String,
    password: String,
}

/// Creates the first administrator. Only available while no account exists.
pub async fn setup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<SetupForm>,
) -> AppResult<Response> {
    if auth::has_users(&state.db)? {
        return Err(ServiceError::Conflict("Setup has already been completed".to_string()).into());
    }

    auth::validate_password(&form.password)?;
    let user = auth::create_user(&state.db, &form.username, &form.password, Role::Admin)?;
    let token = auth::create_session(&state.db, user.id, state.session_days)?;
    tracing::info!("Created administrator '{}'", user.username);

    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(token, None)),
        Json(user),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
    #[serde(default)]
    remember: bool,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> AppResult<Response> {
    let limiter_key = format!("login:{}", form.username.trim().to_lowercase());
    if !state.login_limiter.check(&limiter_key) {
        return Err(ServiceError::RateLimited.into());
    }

    match auth::authenticate(&state.db, &form.username, &form.password)? {
        Some(user) => {
            state.login_limiter.clear(&limiter_key);
            let (days, max_age) = if form.remember {
                (state.remember_days, Some(state.remember_days))
            } else {
                (state.session_days, None)
            };
            let token = auth::create_session(&state.db, user.id, days)?;
            tracing::info!("User '{}' signed in", user.username);
            Ok((jar.add(session_cookie(token, max_age)), Json(user)).into_response())
        }
        None => {
            state.login_limiter.record_attempt(&limiter_key);
            tracing::warn!("Failed sign-in for '{}'", form.username.trim());
            Err(ServiceError::Unauthenticated.into())
        }
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let _ = auth::delete_session(&state.db, cookie.value());
        state.unlocks.forget(cookie.value());
    }

    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();

    Ok((jar.remove(cookie), StatusCode::NO_CONTENT).into_response())
}

pub async fn me(current: CurrentUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "user": current.user,
        "role_description": current.user.role.describe(),
    }))
}
