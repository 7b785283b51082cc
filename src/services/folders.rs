use crate::models::{Category, Folder, FolderSecurityUpdate, Visibility};
use crate::services::auth;
use crate::services::error::ServiceError;
use crate::Database;
use anyhow::Result;
use rusqlite::OptionalExtension;
use std::collections::{BTreeMap, HashSet};

const FOLDER_COLUMNS: &str =
    "id, name, category, visible_to, allowed_users, password_hash, protected, created_at";

/// Visibility given to folders created from the gallery: staff plus anyone
/// explicitly allowed later.
pub const DEFAULT_VISIBILITY: Visibility = Visibility::Editor;

fn row_to_folder(row: &rusqlite::Row<'_>) -> rusqlite::Result<Folder> {
    let allowed: String = row.get(4)?;
    Ok(Folder {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row
            .get::<_, String>(2)?
            .parse()
            .unwrap_or(Category::Collections),
        visible_to: row
            .get::<_, Option<String>>(3)?
            .and_then(|v| v.parse().ok()),
        allowed_users: serde_json::from_str(&allowed).unwrap_or_default(),
        password_hash: row.get(5)?,
        protected: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn clean_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::invalid("Folder name cannot be empty").into());
    }
    Ok(name)
}

/// All folders, newest first.
pub fn list_folders(db: &Database) -> Result<Vec<Folder>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM folders ORDER BY created_at DESC, id DESC",
        FOLDER_COLUMNS
    ))?;
    let folders = stmt
        .query_map([], row_to_folder)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(folders)
}

pub fn group_by_category(folders: Vec<Folder>) -> BTreeMap<Category, Vec<Folder>> {
    let mut grouped: BTreeMap<Category, Vec<Folder>> = BTreeMap::new();
    for folder in folders {
        grouped.entry(folder.category).or_default().push(folder);
    }
    grouped
}

pub fn list_folders_grouped(db: &Database) -> Result<BTreeMap<Category, Vec<Folder>>> {
    Ok(group_by_category(list_folders(db)?))
}

pub fn get_folder(db: &Database, id: i64) -> Result<Option<Folder>> {
    let conn = db.get()?;
    let folder = conn
        .query_row(
            &format!("SELECT {} FROM folders WHERE id = ?", FOLDER_COLUMNS),
            [id],
            row_to_folder,
        )
        .optional()?;
    Ok(folder)
}

pub fn require_folder(db: &Database, id: i64) -> Result<Folder> {
    get_folder(db, id)?.ok_or_else(|| ServiceError::NotFound("Folder").into())
}

pub fn create_folder(db: &Database, name: &str, category: Category) -> Result<Folder> {
    let name = clean_name(name)?;
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO folders (name, category, visible_to) VALUES (?, ?, ?)",
        (name, category.to_string(), DEFAULT_VISIBILITY.to_string()),
    )?;
    let id = conn.last_insert_rowid();
    let folder = conn.query_row(
        &format!("SELECT {} FROM folders WHERE id = ?", FOLDER_COLUMNS),
        [id],
        row_to_folder,
    )?;
    tracing::info!("Created folder '{}' in {}", folder.name, category);
    Ok(folder)
}

pub fn rename_folder(db: &Database, id: i64, name: &str) -> Result<Folder> {
    let name = clean_name(name)?;
    {
        let conn = db.get()?;
        let affected = conn.execute("UPDATE folders SET name = ? WHERE id = ?", (name, id))?;
        if affected == 0 {
            return Err(ServiceError::NotFound("Folder").into());
        }
    }
    require_folder(db, id)
}

/// Applies a security update. Returns the updated folder and whether the
/// password changed, in which case existing unlocks should be dropped.
pub fn update_folder_security(
    db: &Database,
    id: i64,
    update: FolderSecurityUpdate,
) -> Result<(Folder, bool)> {
    let current = require_folder(db, id)?;

    let (password_hash, protected, password_changed) = match update.password.as_deref() {
        Some(p) if !p.trim().is_empty() => (Some(auth::hash_secret(p.trim())?), true, true),
        Some(_) => (None, false, current.protected),
        None => (current.password_hash.clone(), current.protected, false),
    };

    let visible_to = update.visible_to.or(current.visible_to);
    let allowed_users = match update.allowed_users {
        Some(users) => dedup_usernames(users),
        None => current.allowed_users.clone(),
    };

    {
        let conn = db.get()?;
        conn.execute(
            "UPDATE folders SET visible_to = ?, allowed_users = ?, password_hash = ?, protected = ? WHERE id = ?",
            rusqlite::params![
                visible_to.map(|v| v.to_string()),
                serde_json::to_string(&allowed_users)?,
                password_hash,
                protected,
                id
            ],
        )?;
    }

    Ok((require_folder(db, id)?, password_changed))
}

fn dedup_usernames(users: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    users
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty() && seen.insert(u.clone()))
        .collect()
}

fn set_allowed_users(db: &Database, id: i64, allowed: &[String]) -> Result<()> {
    let conn = db.get()?;
    conn.execute(
        "UPDATE folders SET allowed_users = ? WHERE id = ?",
        (serde_json::to_string(allowed)?, id),
    )?;
    Ok(())
}

/// Adds or removes one user from a folder's allow list.
pub fn toggle_allowed_user(db: &Database, id: i64, username: &str) -> Result<Folder> {
    let mut folder = require_folder(db, id)?;
    if folder.allows(username) {
        folder.allowed_users.retain(|u| u != username);
    } else {
        folder.allowed_users.push(username.to_string());
    }
    set_allowed_users(db, id, &folder.allowed_users)?;
    Ok(folder)
}

/// Computes the new allow list of `folder` when `username` should have access
/// exactly when `selected`. `None` means no change.
pub fn assignment_change(folder: &Folder, username: &str, selected: bool) -> Option<Vec<String>> {
    let present = folder.allows(username);
    if selected && !present {
        let mut allowed = folder.allowed_users.clone();
        allowed.push(username.to_string());
        Some(allowed)
    } else if !selected && present {
        Some(
            folder
                .allowed_users
                .iter()
                .filter(|u| *u != username)
                .cloned()
                .collect(),
        )
    } else {
        None
    }
}

/// Makes `selected` the exact set of folders listing `username`. Folders whose
/// membership already matches are not written. Returns the number changed.
pub fn assign_user_folders(db: &Database, username: &str, selected: &[i64]) -> Result<usize> {
    let selected: HashSet<i64> = selected.iter().copied().collect();
    let mut changed = 0;

    for folder in list_folders(db)? {
        if let Some(allowed) = assignment_change(&folder, username, selected.contains(&folder.id)) {
            set_allowed_users(db, folder.id, &allowed)?;
            changed += 1;
        }
    }

    tracing::info!("Updated folder assignments for '{}' ({} changed)", username, changed);
    Ok(changed)
}

/// Removes a deleted user from every allow list.
pub fn forget_user(db: &Database, username: &str) -> Result<usize> {
    assign_user_folders(db, username, &[])
}
