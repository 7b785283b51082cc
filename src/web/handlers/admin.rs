use crate::models::{CreateUser, Folder, FolderSecurityUpdate, User};
use crate::services::auth;
use crate::services::error::ServiceError;
use crate::services::folders;
use crate::web::error::AppResult;
use crate::web::extractors::CurrentUser;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    current.require_admin()?;
    Ok(Json(auth::list_users(&state.db)?))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(form): Json<CreateUser>,
) -> AppResult<Response> {
    current.require_admin()?;
    let user = auth::create_user(&state.db, &form.username, &form.password, form.role)?;
    tracing::info!(
        "User '{}' created account '{}' ({})",
        current.user.username,
        user.username,
        user.role
    );
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    current.require_admin()?;
    auth::delete_user(&state.db, &current.user, &username)?;
    folders::forget_user(&state.db, &username)?;
    tracing::info!("User '{}' deleted account '{}'", current.user.username, username);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct PasswordForm {
    password: String,
}

/// Admins may reset anyone's password; other users only their own.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(username): Path<String>,
    Json(form): Json<PasswordForm>,
) -> AppResult<StatusCode> {
    if current.user.username != username {
        current.require_admin()?;
    }
    auth::update_password(&state.db, &username, &form.password)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct AssignmentForm {
    folder_ids: Vec<i64>,
}

pub async fn assign_folders(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(username): Path<String>,
    Json(form): Json<AssignmentForm>,
) -> AppResult<Json<serde_json::Value>> {
    current.require_admin()?;
    if auth::get_user_by_username(&state.db, &username)?.is_none() {
        return Err(ServiceError::NotFound("User").into());
    }
    let changed = folders::assign_user_folders(&state.db, &username, &form.folder_ids)?;
    Ok(Json(serde_json::json!({ "changed": changed })))
}

pub async fn update_folder_security(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<FolderSecurityUpdate>,
) -> AppResult<Json<Folder>> {
    current.require_admin()?;
    let (folder, password_changed) = folders::update_folder_security(&state.db, id, update)?;
    if password_changed {
        state.unlocks.relock(id);
    }
    tracing::info!(
        "Updated security of folder #{} (protected: {})",
        id,
        folder.protected
    );
    Ok(Json(folder))
}

pub async fn toggle_allowed_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path((id, username)): Path<(i64, String)>,
) -> AppResult<Json<Folder>> {
    current.require_admin()?;
    let folder = folders::toggle_allowed_user(&state.db, id, &username)?;
    Ok(Json(folder))
}
