use crate::models::{Role, User};
use crate::services::error::ServiceError;
use crate::Database;
use anyhow::Result;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use rusqlite::OptionalExtension;
use sha2::{Digest, Sha256};

pub const MIN_PASSWORD_LENGTH: usize = 4;
const MAX_USERNAME_LENGTH: usize = 100;

/// Built-in account that can never be deleted.
pub const ROOT_USERNAME: &str = "admin";

const USER_COLUMNS: &str = "id, username, password_hash, role, permissions, created_at";

fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(ServiceError::invalid("Username cannot be empty").into());
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ServiceError::invalid(format!(
            "Username must be {} characters or less",
            MAX_USERNAME_LENGTH
        ))
        .into());
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(ServiceError::invalid(
            "Username can only contain letters, numbers, dots, underscores, and hyphens",
        )
        .into());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(ServiceError::invalid("Password cannot be empty").into());
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::invalid(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ))
        .into());
    }
    Ok(())
}

/// Hashes any secret with argon2. Callers validate the secret first.
pub fn hash_secret(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

pub fn hash_password(password: &str) -> Result<String> {
    validate_password(password)?;
    hash_secret(password)
}

const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dW5rbm93bg$0000000000000000000000000000000000000000000";

pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => {
            if let Ok(dummy) = PasswordHash::new(DUMMY_HASH) {
                let _ = Argon2::default().verify_password(password.as_bytes(), &dummy);
            }
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let permissions: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role: row.get::<_, String>(3)?.parse().unwrap_or(Role::Viewer),
        permissions: serde_json::from_str(&permissions).unwrap_or_default(),
        created_at: row.get(5)?,
    })
}

pub fn create_user(db: &Database, username: &str, password: &str, role: Role) -> Result<User> {
    let username = username.trim();
    let password = password.trim();
    validate_username(username)?;
    let password_hash = hash_password(password)?;

    if get_user_by_username(db, username)?.is_some() {
        return Err(ServiceError::Conflict("Username already exists".to_string()).into());
    }

    let permissions = serde_json::to_string(&role.default_permissions())?;
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO users (username, password_hash, role, permissions) VALUES (?, ?, ?, ?)",
        (username, &password_hash, role.to_string(), &permissions),
    )?;
    let id = conn.last_insert_rowid();
    let user = conn.query_row(
        &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
        [id],
        row_to_user,
    )?;
    Ok(user)
}

pub fn update_password(db: &Database, username: &str, password: &str) -> Result<()> {
    let password_hash = hash_password(password.trim())?;
    let conn = db.get()?;
    let affected = conn.execute(
        "UPDATE users SET password_hash = ? WHERE username = ?",
        (&password_hash, username),
    )?;
    if affected == 0 {
        return Err(ServiceError::NotFound("User").into());
    }
    Ok(())
}

pub fn authenticate(db: &Database, username: &str, password: &str) -> Result<Option<User>> {
    let user = get_user_by_username(db, username.trim())?;
    match user {
        Some(u) if verify_password(password.trim(), &u.password_hash) => Ok(Some(u)),
        Some(_) => Ok(None),
        None => {
            // Keep timing similar for unknown usernames.
            verify_password(password, DUMMY_HASH);
            Ok(None)
        }
    }
}

pub fn create_session(db: &Database, user_id: i64, duration_days: i64) -> Result<String> {
    let token = generate_session_token();
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO sessions (user_id, token_hash, expires_at) VALUES (?, ?, datetime('now', '+'||?||' days'))",
        (user_id, hash_token(&token), duration_days),
    )?;
    Ok(token)
}

pub fn validate_session(db: &Database, token: &str) -> Result<Option<User>> {
    let conn = db.get()?;
    let user = conn
        .query_row(
            r#"
            SELECT u.id, u.username, u.password_hash, u.role, u.permissions, u.created_at
            FROM users u
            JOIN sessions s ON s.user_id = u.id
            WHERE s.token_hash = ? AND s.expires_at > datetime('now')
            "#,
            [hash_token(token)],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

pub fn delete_session(db: &Database, token: &str) -> Result<()> {
    let conn = db.get()?;
    conn.execute(
        "DELETE FROM sessions WHERE token_hash = ?",
        [hash_token(token)],
    )?;
    Ok(())
}

pub fn cleanup_expired_sessions(db: &Database) -> Result<usize> {
    let conn = db.get()?;
    let removed = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= datetime('now')",
        [],
    )?;
    Ok(removed)
}

pub fn has_users(db: &Database) -> Result<bool> {
    let conn = db.get()?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn list_users(db: &Database) -> Result<Vec<User>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users ORDER BY created_at, id",
        USER_COLUMNS
    ))?;
    let users = stmt
        .query_map([], row_to_user)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

pub fn get_user_by_username(db: &Database, username: &str) -> Result<Option<User>> {
    let conn = db.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS),
            [username],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

/// Deletes `username` on behalf of `actor`. Accounts cannot delete themselves
/// and the root account is permanent.
pub fn delete_user(db: &Database, actor: &User, username: &str) -> Result<()> {
    if username == actor.username {
        return Err(ServiceError::invalid("You cannot delete your own account").into());
    }
    remove_user(db, username)
}

/// Deletes an account without an acting user, as the CLI does. The root
/// account is still protected.
pub fn remove_user(db: &Database, username: &str) -> Result<()> {
    if username == ROOT_USERNAME {
        return Err(ServiceError::invalid("The admin account cannot be deleted").into());
    }

    let conn = db.get()?;
    let affected = conn.execute("DELETE FROM users WHERE username = ?", [username])?;
    if affected == 0 {
        return Err(ServiceError::NotFound("User").into());
    }
    Ok(())
}
