use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub title: String,
    /// Public base URL used to build media links, without a trailing slash.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub upload_dir: String,
    #[serde(default = "default_max_upload")]
    pub max_upload_size: String,
    #[serde(default = "default_true")]
    pub thumbnails: bool,
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
}

impl MediaConfig {
    pub fn max_upload_bytes(&self) -> Result<usize> {
        parse_size(&self.max_upload_size)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_lifetime")]
    pub session_lifetime: String,
    #[serde(default = "default_remember_lifetime")]
    pub remember_lifetime: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_lifetime: default_session_lifetime(),
            remember_lifetime: default_remember_lifetime(),
        }
    }
}

impl AuthConfig {
    pub fn session_days(&self) -> Result<i64> {
        parse_days(&self.session_lifetime)
    }

    pub fn remember_days(&self) -> Result<i64> {
        parse_days(&self.remember_lifetime)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_pool_size() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

fn default_max_upload() -> String {
    "50MB".to_string()
}

fn default_thumbnail_size() -> u32 {
    300
}

fn default_session_lifetime() -> String {
    "1d".to_string()
}

fn default_remember_lifetime() -> String {
    "30d".to_string()
}

const MAX_LIFETIME_DAYS: i64 = 3650;

/// Parses sizes like `"512KB"`, `"50MB"`, `"1GB"` or a bare byte count.
pub fn parse_size(value: &str) -> Result<usize> {
    let value = value.trim().to_ascii_uppercase();
    let (digits, multiplier) = if let Some(n) = value.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = value.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = value.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = value.strip_suffix('B') {
        (n, 1)
    } else {
        (value.as_str(), 1)
    };

    let n: usize = digits
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size '{}'", value))?;
    n.checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("Size '{}' is too large", value))
}

/// Parses lifetimes like `"7d"`, `"2w"` or a bare day count.
pub fn parse_days(value: &str) -> Result<i64> {
    let value = value.trim();
    let (digits, multiplier) = if let Some(n) = value.strip_suffix('w') {
        (n, 7)
    } else if let Some(n) = value.strip_suffix('d') {
        (n, 1)
    } else {
        (value, 1)
    };

    let n: i64 = digits
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid lifetime '{}'", value))?;
    n.checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("Lifetime '{}' is too large", value))
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!(
                "Could not read config file '{}': {}. Run 'mediavault init' first?",
                path.display(),
                e
            )
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.site.url.ends_with('/') {
            anyhow::bail!("site.url must not end with '/'");
        }
        if self.media.max_upload_bytes()? == 0 {
            anyhow::bail!("media.max_upload_size must be greater than 0");
        }
        if self.media.thumbnail_size == 0 || self.media.thumbnail_size > 2048 {
            anyhow::bail!("media.thumbnail_size must be between 1 and 2048");
        }
        for days in [self.auth.session_days()?, self.auth.remember_days()?] {
            if !(1..=MAX_LIFETIME_DAYS).contains(&days) {
                anyhow::bail!("auth lifetimes must be between 1 and {} days", MAX_LIFETIME_DAYS);
            }
        }
        if self.database.pool_size == 0 {
            anyhow::bail!("database.pool_size must be greater than 0");
        }
        Ok(())
    }
}
