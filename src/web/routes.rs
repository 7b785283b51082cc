use super::handlers;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::sync::Arc;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::public::health))
        .route("/media/*key", get(handlers::public::serve_media))
}

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/setup", post(handlers::auth::setup))
        .route("/api/login", post(handlers::auth::login))
        .route("/api/logout", post(handlers::auth::logout))
        .route("/api/me", get(handlers::auth::me))
}

pub fn gallery_routes(upload_limit: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bootstrap", get(handlers::api::bootstrap))
        .route(
            "/api/folders",
            get(handlers::api::list_folders).post(handlers::api::create_folder),
        )
        .route("/api/folders/:id", patch(handlers::api::rename_folder))
        .route("/api/folders/:id/unlock", post(handlers::api::unlock_folder))
        .route(
            "/api/items",
            get(handlers::api::list_items)
                .post(handlers::api::upload_items)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/items/:id", patch(handlers::api::rename_item))
        .route("/api/items/:id/share", get(handlers::api::share_item))
        .route("/api/items/delete", post(handlers::api::delete_items))
        .route("/api/items/download", post(handlers::api::download_items))
        .route("/api/favorites", get(handlers::api::list_favorites))
        .route(
            "/api/favorites/:id/toggle",
            post(handlers::api::toggle_favorite),
        )
        .route(
            "/api/settings",
            get(handlers::api::get_settings).put(handlers::api::update_settings),
        )
}

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/users",
            get(handlers::admin::list_users).post(handlers::admin::create_user),
        )
        .route("/api/users/:username", delete(handlers::admin::delete_user))
        .route(
            "/api/users/:username/password",
            put(handlers::admin::change_password),
        )
        .route(
            "/api/users/:username/folders",
            put(handlers::admin::assign_folders),
        )
        .route(
            "/api/folders/:id/security",
            put(handlers::admin::update_folder_security),
        )
        .route(
            "/api/folders/:id/allowed-users/:username",
            post(handlers::admin::toggle_allowed_user),
        )
}
