//! Authorization rules for folders.
//!
//! Everything here is a pure function of the user and folder records, except
//! [`UnlockRegistry`], which remembers per-session password unlocks.

use crate::models::{Folder, Role, User, Visibility};
use crate::services::auth;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// The parts of a user that folder rules look at.
#[derive(Debug, Clone, Copy)]
pub struct Principal<'a> {
    pub username: &'a str,
    pub role: Role,
}

impl<'a> From<&'a User> for Principal<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            username: &user.username,
            role: user.role,
        }
    }
}

pub fn can_edit(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Editor)
}

pub fn is_admin(role: Role) -> bool {
    role == Role::Admin
}

/// Whether `who` may see `folder` at all.
///
/// Rules apply in order: admins see everything, an explicit `allowed_users`
/// entry always grants, viewers see nothing else, editors see folders not
/// restricted to admins.
pub fn is_folder_visible(who: Principal<'_>, folder: &Folder) -> bool {
    if who.role == Role::Admin {
        return true;
    }

    if folder.allows(who.username) {
        return true;
    }

    match who.role {
        Role::Viewer => false,
        Role::Editor => matches!(
            folder.visible_to,
            None | Some(Visibility::All) | Some(Visibility::Editor)
        ),
        Role::Admin => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderAccess {
    Granted,
    NeedsPassword,
    Hidden,
}

/// Combines visibility with the password lock. `unlocked` says whether the
/// caller already entered the folder password in this session.
pub fn folder_access(who: Principal<'_>, folder: &Folder, unlocked: bool) -> FolderAccess {
    if !is_folder_visible(who, folder) {
        return FolderAccess::Hidden;
    }
    if folder.protected && !is_admin(who.role) && !unlocked {
        return FolderAccess::NeedsPassword;
    }
    FolderAccess::Granted
}

pub fn verify_folder_password(folder: &Folder, candidate: &str) -> bool {
    match folder.password_hash.as_deref() {
        Some(hash) => auth::verify_password(candidate, hash),
        None => !folder.protected,
    }
}

/// Folders unlocked by password, keyed by session token.
#[derive(Default)]
pub struct UnlockRegistry {
    unlocked: RwLock<HashMap<String, HashSet<i64>>>,
}

impl UnlockRegistry {
    pub fn unlock(&self, session: &str, folder_id: i64) {
        let mut unlocked = self.unlocked.write().unwrap_or_else(|e| e.into_inner());
        unlocked
            .entry(session.to_string())
            .or_default()
            .insert(folder_id);
    }

    pub fn is_unlocked(&self, session: &str, folder_id: i64) -> bool {
        let unlocked = self.unlocked.read().unwrap_or_else(|e| e.into_inner());
        unlocked
            .get(session)
            .map(|set| set.contains(&folder_id))
            .unwrap_or(false)
    }

    pub fn unlocked_folders(&self, session: &str) -> HashSet<i64> {
        let unlocked = self.unlocked.read().unwrap_or_else(|e| e.into_inner());
        unlocked.get(session).cloned().unwrap_or_default()
    }

    /// Re-locks a folder for every session, e.g. after its password changes.
    pub fn relock(&self, folder_id: i64) {
        let mut unlocked = self.unlocked.write().unwrap_or_else(|e| e.into_inner());
        for set in unlocked.values_mut() {
            set.remove(&folder_id);
        }
        unlocked.retain(|_, set| !set.is_empty());
    }

    pub fn forget(&self, session: &str) {
        let mut unlocked = self.unlocked.write().unwrap_or_else(|e| e.into_inner());
        unlocked.remove(session);
    }
}
