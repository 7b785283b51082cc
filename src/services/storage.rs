//! Local storage bucket. Objects live under `<root>/<category>/<name>` and are
//! served publicly from `/media/<key>`.

use anyhow::{bail, Result};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/media/{}", self.base_url, key)
    }

    /// Writes `data` under `<prefix>/<millis>-<name>`, adding a random segment
    /// if that key is already taken.
    pub fn put(&self, prefix: &str, file_name: &str, data: &[u8]) -> Result<StoredObject> {
        let safe = sanitize_file_name(file_name);
        let millis = chrono::Utc::now().timestamp_millis();

        let mut key = format!("{}/{}-{}", prefix, millis, safe);
        if self.root.join(&key).exists() {
            key = format!("{}/{}-{}-{}", prefix, millis, uuid::Uuid::new_v4().simple(), safe);
        }

        let path = self.resolve(&key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, data)?;

        Ok(StoredObject {
            url: self.public_url(&key),
            key,
        })
    }

    pub fn read(&self, key: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.resolve(key)?)?)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Maps a key to a path inside the bucket, rejecting anything that could
    /// escape it.
    pub fn resolve(&self, key: &str) -> Result<PathBuf> {
        let rel = Path::new(key);
        if key.is_empty() || key.contains('\\') {
            bail!("Invalid storage key: {}", key);
        }
        if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            bail!("Invalid storage key: {}", key);
        }
        Ok(self.root.join(rel))
    }
}

/// Keeps letters, digits, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
