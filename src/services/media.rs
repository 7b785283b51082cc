use crate::models::{MediaItem, MediaType, NewMediaItem, Tab, UPLOAD_CATEGORY};
use crate::services::error::ServiceError;
use crate::services::storage::Storage;
use crate::services::{folders, image};
use crate::Database;
use anyhow::Result;
use rusqlite::OptionalExtension;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const ITEM_COLUMNS: &str =
    "id, type, folder_id, url, thumbnail_url, storage_key, thumbnail_key, title, category, created_at";

#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub max_bytes: usize,
    pub thumbnails: bool,
    pub thumbnail_size: u32,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            max_bytes: 50 * 1024 * 1024,
            thumbnails: true,
            thumbnail_size: image::THUMBNAIL_SIZE,
        }
    }
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<MediaItem> {
    Ok(MediaItem {
        id: row.get(0)?,
        media_type: row
            .get::<_, String>(1)?
            .parse()
            .unwrap_or(MediaType::Photo),
        folder_id: row.get(2)?,
        url: row.get(3)?,
        thumbnail_url: row.get(4)?,
        storage_key: row.get(5)?,
        thumbnail_key: row.get(6)?,
        title: row.get(7)?,
        category: row.get(8)?,
        created_at: row.get(9)?,
    })
}

pub fn list_items(db: &Database) -> Result<Vec<MediaItem>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM media_items ORDER BY created_at DESC, id DESC",
        ITEM_COLUMNS
    ))?;
    let items = stmt
        .query_map([], row_to_item)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn get_item(db: &Database, id: i64) -> Result<Option<MediaItem>> {
    let conn = db.get()?;
    let item = conn
        .query_row(
            &format!("SELECT {} FROM media_items WHERE id = ?", ITEM_COLUMNS),
            [id],
            row_to_item,
        )
        .optional()?;
    Ok(item)
}

pub fn get_items(db: &Database, ids: &[i64]) -> Result<Vec<MediaItem>> {
    let wanted: HashSet<i64> = ids.iter().copied().collect();
    Ok(list_items(db)?
        .into_iter()
        .filter(|item| wanted.contains(&item.id))
        .collect())
}

pub fn create_item(db: &Database, item: &NewMediaItem) -> Result<MediaItem> {
    let title = item.title.trim();
    if title.is_empty() {
        return Err(ServiceError::invalid("Title cannot be empty").into());
    }

    let conn = db.get()?;
    conn.execute(
        "INSERT INTO media_items (type, folder_id, url, thumbnail_url, storage_key, thumbnail_key, title, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            item.media_type.to_string(),
            item.folder_id,
            item.url,
            item.thumbnail_url,
            item.storage_key,
            item.thumbnail_key,
            title,
            item.category,
        ],
    )?;
    let id = conn.last_insert_rowid();
    let created = conn.query_row(
        &format!("SELECT {} FROM media_items WHERE id = ?", ITEM_COLUMNS),
        [id],
        row_to_item,
    )?;
    Ok(created)
}

/// Sniffs the content type from the bytes, falling back to the file name.
pub fn detect_mime(file_name: &str, data: &[u8]) -> String {
    match infer::get(data) {
        Some(kind) => kind.mime_type().to_string(),
        None => mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

/// Title shown for an uploaded file: its name up to the first dot.
pub fn title_from_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.split('.').next() {
        Some(stem) if !stem.trim().is_empty() => stem.trim().to_string(),
        _ => base.trim().to_string(),
    }
}

/// Stores one uploaded file and records it as an item of `tab`, optionally
/// inside `folder_id`.
pub fn upload_item(
    db: &Database,
    storage: &Storage,
    options: &UploadOptions,
    tab: Tab,
    folder_id: Option<i64>,
    file_name: &str,
    data: &[u8],
) -> Result<MediaItem> {
    let media_type = tab.media_type().ok_or_else(|| {
        ServiceError::invalid(format!("Cannot upload into the {} tab", tab))
    })?;
    let category = tab
        .category()
        .ok_or_else(|| ServiceError::invalid(format!("Cannot upload into the {} tab", tab)))?;

    if data.is_empty() {
        return Err(ServiceError::invalid("File is empty").into());
    }
    if data.len() > options.max_bytes {
        return Err(ServiceError::invalid(format!(
            "File too large: {} bytes (max {} bytes)",
            data.len(),
            options.max_bytes
        ))
        .into());
    }

    let mime = detect_mime(file_name, data);
    if !media_type.accepts_mime(&mime) {
        return Err(ServiceError::invalid(format!(
            "File type {} is not allowed in {}",
            mime, tab
        ))
        .into());
    }

    if let Some(id) = folder_id {
        let folder = folders::require_folder(db, id)?;
        if folder.category != category {
            return Err(ServiceError::invalid(format!(
                "Folder '{}' belongs to {}, not {}",
                folder.name, folder.category, tab
            ))
            .into());
        }
    }

    let title = title_from_file_name(file_name);
    if title.is_empty() {
        return Err(ServiceError::invalid("Title cannot be empty").into());
    }

    let stored = storage.put(&category.to_string(), file_name, data)?;

    let (thumbnail_key, thumbnail_url) =
        if options.thumbnails && media_type == MediaType::Photo && image::is_thumbnailable(&mime) {
            match image::generate_thumbnail(data, Some(options.thumbnail_size)) {
                Ok(thumb) => {
                    let thumb_name = format!("{}.jpg", title);
                    match storage.put("thumbnails", &thumb_name, &thumb) {
                        Ok(obj) => (Some(obj.key), Some(obj.url)),
                        Err(e) => {
                            discard_objects(storage, &[stored.key.as_str()]);
                            return Err(e);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Thumbnail generation failed for {}: {}", file_name, e);
                    (None, None)
                }
            }
        } else {
            (None, None)
        };

    let created = create_item(
        db,
        &NewMediaItem {
            media_type,
            folder_id,
            url: stored.url.clone(),
            storage_key: Some(stored.key.clone()),
            thumbnail_url,
            thumbnail_key: thumbnail_key.clone(),
            title,
            category: UPLOAD_CATEGORY.to_string(),
        },
    );
    let item = match created {
        Ok(item) => item,
        Err(e) => {
            let mut keys = vec![stored.key.as_str()];
            keys.extend(thumbnail_key.as_deref());
            discard_objects(storage, &keys);
            return Err(e);
        }
    };

    tracing::info!("Uploaded '{}' as {} #{}", file_name, media_type, item.id);
    Ok(item)
}

fn discard_objects(storage: &Storage, keys: &[&str]) {
    for key in keys {
        if let Err(e) = storage.remove(key) {
            tracing::warn!("Failed to discard stored object {}: {}", key, e);
        }
    }
}

pub fn rename_item(db: &Database, id: i64, title: &str) -> Result<MediaItem> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ServiceError::invalid("Title cannot be empty").into());
    }
    {
        let conn = db.get()?;
        let affected = conn.execute("UPDATE media_items SET title = ? WHERE id = ?", (title, id))?;
        if affected == 0 {
            return Err(ServiceError::NotFound("Item").into());
        }
    }
    get_item(db, id)?.ok_or_else(|| ServiceError::NotFound("Item").into())
}

/// Deletes items and their stored files. Returns how many rows were removed.
pub fn delete_items(db: &Database, storage: &Storage, ids: &[i64]) -> Result<usize> {
    if ids.is_empty() {
        return Ok(0);
    }

    let doomed = get_items(db, ids)?;
    let mut conn = db.get()?;
    let tx = conn.transaction()?;
    let mut removed = 0;
    for item in &doomed {
        removed += tx.execute("DELETE FROM media_items WHERE id = ?", [item.id])?;
    }
    tx.commit()?;
    drop(conn);

    for key in doomed
        .iter()
        .flat_map(|i| [i.storage_key.as_deref(), i.thumbnail_key.as_deref()])
        .flatten()
    {
        if let Err(e) = storage.remove(key) {
            tracing::warn!("Failed to remove stored object {}: {}", key, e);
        }
    }

    tracing::info!("Deleted {} item(s)", removed);
    Ok(removed)
}

pub fn item_counts_by_folder(db: &Database) -> Result<HashMap<i64, i64>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT folder_id, COUNT(*) FROM media_items WHERE folder_id IS NOT NULL GROUP BY folder_id",
    )?;
    let counts = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<HashMap<_, _>, _>>()?;
    Ok(counts)
}

/// Packs the stored files of `items` into a zip, naming entries by title.
/// Items without a readable stored file are skipped.
pub fn download_archive(storage: &Storage, items: &[MediaItem]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let mut used = HashSet::new();

    for item in items {
        let Some(key) = item.storage_key.as_deref() else {
            continue;
        };
        let data = match storage.read(key) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Skipping item {} in archive: {}", item.id, e);
                continue;
            }
        };

        let ext = std::path::Path::new(key)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_else(|| item.media_type.share_extension().to_string());
        let name = unique_entry_name(&mut used, &item.title, &ext);

        zip.start_file(name, options)?;
        zip.write_all(&data)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Keeps the title readable in any script. Only separators, control
/// characters and leading or trailing dots are dropped.
fn entry_stem(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if matches!(c, '/' | '\\') || c.is_control() { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.').trim();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

fn unique_entry_name(used: &mut HashSet<String>, title: &str, ext: &str) -> String {
    let stem = entry_stem(title);
    let mut name = format!("{}{}", stem, ext);
    let mut n = 1;
    while !used.insert(name.clone()) {
        n += 1;
        name = format!("{} ({}){}", stem, n, ext);
    }
    name
}
