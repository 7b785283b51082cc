use crate::models::{
    Category, CreateFolder, Folder, MediaItem, SettingsPatch, Tab, ACCENT_PRESETS,
};
use crate::services::access::{self, FolderAccess};
use crate::services::error::ServiceError;
use crate::services::gallery::{self, ItemQuery, SortOrder};
use crate::services::{favorites, folders, media, settings, share};
use crate::web::error::AppResult;
use crate::web::extractors::{CurrentUser, UserAgent};
use crate::web::state::AppState;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

async fn blocking<T, F>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Loads a folder the caller is allowed to open right now.
fn open_folder(state: &AppState, current: &CurrentUser, id: i64) -> anyhow::Result<Folder> {
    let folder = folders::get_folder(&state.db, id)?.ok_or(ServiceError::NotFound("Folder"))?;
    let unlocked = state.unlocks.is_unlocked(&current.token, id);
    match access::folder_access(current.principal(), &folder, unlocked) {
        FolderAccess::Granted => Ok(folder),
        FolderAccess::NeedsPassword => Err(ServiceError::Locked.into()),
        FolderAccess::Hidden => Err(ServiceError::NotFound("Folder").into()),
    }
}

fn accessible_items(
    state: &AppState,
    current: &CurrentUser,
    all_folders: &[Folder],
) -> anyhow::Result<Vec<MediaItem>> {
    let unlocked = state.unlocks.unlocked_folders(&current.token);
    Ok(gallery::accessible_items(
        current.principal(),
        media::list_items(&state.db)?,
        all_folders,
        &unlocked,
    ))
}

/// Loads an item whose folder, if any, the caller may open.
fn open_item(state: &AppState, current: &CurrentUser, id: i64) -> anyhow::Result<MediaItem> {
    let item = media::get_item(&state.db, id)?.ok_or(ServiceError::NotFound("Item"))?;
    if let Some(folder_id) = item.folder_id {
        if let Err(e) = open_folder(state, current, folder_id) {
            let hidden = matches!(
                e.downcast_ref::<ServiceError>(),
                Some(ServiceError::NotFound(_))
            );
            return Err(if hidden {
                ServiceError::NotFound("Item").into()
            } else {
                e
            });
        }
    }
    Ok(item)
}

#[derive(Serialize)]
pub struct FolderView<'a> {
    #[serde(flatten)]
    folder: &'a Folder,
    item_count: i64,
    locked: bool,
}

fn folder_views<'a>(
    state: &AppState,
    current: &CurrentUser,
    all_folders: &'a [Folder],
    counts: &HashMap<i64, i64>,
    category: Option<Category>,
) -> BTreeMap<Category, Vec<FolderView<'a>>> {
    let mut grouped: BTreeMap<Category, Vec<FolderView<'a>>> = BTreeMap::new();
    for folder in gallery::visible_folders(current.principal(), all_folders) {
        if category.is_some_and(|c| c != folder.category) {
            continue;
        }
        let unlocked = state.unlocks.is_unlocked(&current.token, folder.id);
        let locked = access::folder_access(current.principal(), folder, unlocked)
            == FolderAccess::NeedsPassword;
        grouped.entry(folder.category).or_default().push(FolderView {
            folder,
            item_count: counts.get(&folder.id).copied().unwrap_or(0),
            locked,
        });
    }
    grouped
}

fn sorted_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids
}

/// Everything the gallery needs on first load, fetched in parallel.
pub async fn bootstrap(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> AppResult<Json<serde_json::Value>> {
    let user_id = current.user.id;
    let (all_folders, counts, favorite_ids, user_settings) = tokio::try_join!(
        blocking({
            let db = state.db.clone();
            move || folders::list_folders(&db)
        }),
        blocking({
            let db = state.db.clone();
            move || media::item_counts_by_folder(&db)
        }),
        blocking({
            let db = state.db.clone();
            move || favorites::get_favorites(&db, user_id)
        }),
        blocking({
            let db = state.db.clone();
            move || settings::effective_settings(&db, user_id)
        }),
    )?;

    let items = accessible_items(&state, &current, &all_folders)?;
    let visible_ids: HashSet<i64> = items.iter().map(|i| i.id).collect();
    let favorites = sorted_ids(favorite_ids.into_iter().filter(|id| visible_ids.contains(id)));

    Ok(Json(serde_json::json!({
        "site_title": state.config.site.title,
        "user": current.user,
        "folders": folder_views(&state, &current, &all_folders, &counts, None),
        "items": items,
        "favorites": favorites,
        "settings": user_settings,
        "direction": user_settings.direction(),
        "accent_presets": ACCENT_PRESETS,
    })))
}

#[derive(Deserialize)]
pub struct FolderFilter {
    category: Option<Category>,
}

pub async fn list_folders(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(filter): Query<FolderFilter>,
) -> AppResult<Json<serde_json::Value>> {
    let all_folders = folders::list_folders(&state.db)?;
    let counts = media::item_counts_by_folder(&state.db)?;
    let grouped = folder_views(&state, &current, &all_folders, &counts, filter.category);
    Ok(Json(serde_json::json!(grouped)))
}

pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(form): Json<CreateFolder>,
) -> AppResult<Response> {
    current.require_editor()?;
    let folder = folders::create_folder(&state.db, &form.name, form.category)?;
    Ok((StatusCode::CREATED, Json(folder)).into_response())
}

#[derive(Deserialize)]
pub struct RenameForm {
    name: String,
}

pub async fn rename_folder(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(form): Json<RenameForm>,
) -> AppResult<Json<Folder>> {
    current.require_editor()?;
    open_folder(&state, &current, id)?;
    let folder = folders::rename_folder(&state.db, id, &form.name)?;
    Ok(Json(folder))
}

#[derive(Deserialize)]
pub struct UnlockForm {
    password: String,
}

pub async fn unlock_folder(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(form): Json<UnlockForm>,
) -> AppResult<Json<serde_json::Value>> {
    let folder = folders::get_folder(&state.db, id)?.ok_or(ServiceError::NotFound("Folder"))?;
    let who = current.principal();
    if !access::is_folder_visible(who, &folder) {
        return Err(ServiceError::NotFound("Folder").into());
    }
    if access::folder_access(who, &folder, false) == FolderAccess::Granted {
        return Ok(Json(serde_json::json!({ "unlocked": true })));
    }

    let limiter_key = format!("unlock:{}:{}", current.user.id, id);
    if !state.unlock_limiter.check(&limiter_key) {
        return Err(ServiceError::RateLimited.into());
    }

    if access::verify_folder_password(&folder, &form.password) {
        state.unlock_limiter.clear(&limiter_key);
        state.unlocks.unlock(&current.token, id);
        tracing::info!("User '{}' unlocked folder #{}", current.user.username, id);
        Ok(Json(serde_json::json!({ "unlocked": true })))
    } else {
        state.unlock_limiter.record_attempt(&limiter_key);
        Err(ServiceError::invalid("Incorrect password").into())
    }
}

#[derive(Deserialize)]
pub struct ItemsQuery {
    #[serde(default)]
    tab: Tab,
    folder: Option<i64>,
    #[serde(default)]
    q: String,
    #[serde(default)]
    sort: SortOrder,
}

pub async fn list_items(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<ItemsQuery>,
) -> AppResult<Json<Vec<MediaItem>>> {
    if let Some(id) = query.folder {
        open_folder(&state, &current, id)?;
    }

    let all_folders = folders::list_folders(&state.db)?;
    let items = accessible_items(&state, &current, &all_folders)?;
    let favorite_ids = favorites::get_favorites(&state.db, current.user.id)?;

    let item_query = ItemQuery {
        tab: query.tab,
        folder_id: query.folder,
        search: &query.q,
        sort: query.sort,
    };
    let shown = gallery::filter_items(&items, &item_query, &favorite_ids)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(shown))
}

#[derive(Deserialize)]
pub struct UploadQuery {
    tab: Tab,
    folder: Option<i64>,
}

#[derive(Serialize)]
pub struct UploadFailure {
    file_name: String,
    error: String,
}

/// Multipart upload of one or more files. Each file succeeds or fails on its
/// own; the response lists both.
pub async fn upload_items(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    current.require_editor()?;
    if let Some(id) = query.folder {
        open_folder(&state, &current, id)?;
    }

    let mut uploaded = Vec::new();
    let mut errors = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await?;

        let result = blocking({
            let state = state.clone();
            let file_name = file_name.clone();
            let (tab, folder) = (query.tab, query.folder);
            move || {
                media::upload_item(
                    &state.db,
                    &state.storage,
                    &state.upload,
                    tab,
                    folder,
                    &file_name,
                    &data,
                )
            }
        })
        .await;

        match result {
            Ok(item) => uploaded.push(item),
            Err(e) => {
                let error = match e.downcast_ref::<ServiceError>() {
                    Some(reason) => reason.to_string(),
                    None => {
                        tracing::error!("Upload of '{}' failed: {:?}", file_name, e);
                        "Upload failed".to_string()
                    }
                };
                errors.push(UploadFailure { file_name, error });
            }
        }
    }

    if uploaded.is_empty() && errors.is_empty() {
        return Err(ServiceError::invalid("No files were uploaded").into());
    }

    let status = if uploaded.is_empty() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(serde_json::json!({ "uploaded": uploaded, "errors": errors })),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct TitleForm {
    title: String,
}

pub async fn rename_item(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(form): Json<TitleForm>,
) -> AppResult<Json<MediaItem>> {
    current.require_editor()?;
    open_item(&state, &current, id)?;
    let item = media::rename_item(&state.db, id, &form.title)?;
    Ok(Json(item))
}

#[derive(Deserialize)]
pub struct IdsForm {
    ids: Vec<i64>,
}

/// Items among `ids` the caller may see. Unknown ids are dropped.
fn selected_items(
    state: &AppState,
    current: &CurrentUser,
    ids: &[i64],
) -> anyhow::Result<Vec<MediaItem>> {
    let wanted: HashSet<i64> = ids.iter().copied().collect();
    let all_folders = folders::list_folders(&state.db)?;
    Ok(accessible_items(state, current, &all_folders)?
        .into_iter()
        .filter(|item| wanted.contains(&item.id))
        .collect())
}

pub async fn delete_items(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(form): Json<IdsForm>,
) -> AppResult<Json<serde_json::Value>> {
    current.require_editor()?;
    let ids: Vec<i64> = selected_items(&state, &current, &form.ids)?
        .iter()
        .map(|item| item.id)
        .collect();
    let deleted = media::delete_items(&state.db, &state.storage, &ids)?;
    Ok(Json(serde_json::json!({ "deleted": deleted, "ids": ids })))
}

pub async fn download_items(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(form): Json<IdsForm>,
) -> AppResult<Response> {
    let items = selected_items(&state, &current, &form.ids)?;
    if items.is_empty() {
        return Err(ServiceError::invalid("No items selected").into());
    }

    let archive = blocking({
        let state = state.clone();
        move || media::download_archive(&state.storage, &items)
    })
    .await?;

    let file_name = format!(
        "mediavault-{}.zip",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        archive,
    )
        .into_response())
}

pub async fn share_item(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    UserAgent(agent): UserAgent,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let item = open_item(&state, &current, id)?;
    let links = share::share_links(&item);
    let open: Vec<serde_json::Value> = links
        .platforms
        .iter()
        .map(|p| serde_json::json!({ "name": p.name, "url": share::link_for_agent(p, &agent) }))
        .collect();
    Ok(Json(serde_json::json!({ "links": links, "open": open })))
}

pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> AppResult<Json<Vec<i64>>> {
    let all_folders = folders::list_folders(&state.db)?;
    let visible: HashSet<i64> = accessible_items(&state, &current, &all_folders)?
        .iter()
        .map(|i| i.id)
        .collect();
    let ids = favorites::get_favorites(&state.db, current.user.id)?;
    Ok(Json(sorted_ids(
        ids.into_iter().filter(|id| visible.contains(id)),
    )))
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    open_item(&state, &current, id)?;
    let favorite = favorites::toggle_favorite(&state.db, current.user.id, id)?;
    Ok(Json(serde_json::json!({ "item_id": id, "favorite": favorite })))
}

fn settings_body(user_settings: &crate::models::AppSettings) -> serde_json::Value {
    serde_json::json!({
        "settings": user_settings,
        "direction": user_settings.direction(),
        "accent_presets": ACCENT_PRESETS,
    })
}

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> AppResult<Json<serde_json::Value>> {
    let user_settings = settings::effective_settings(&state.db, current.user.id)?;
    Ok(Json(settings_body(&user_settings)))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(patch): Json<SettingsPatch>,
) -> AppResult<Json<serde_json::Value>> {
    let user_settings = settings::update_settings(&state.db, current.user.id, patch)?;
    Ok(Json(settings_body(&user_settings)))
}
