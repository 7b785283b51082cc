use crate::services::access::UnlockRegistry;
use crate::services::media::UploadOptions;
use crate::services::storage::Storage;
use crate::web::security::RateLimiter;
use crate::{Config, Database};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub storage: Storage,
    pub upload: UploadOptions,
    pub unlocks: UnlockRegistry,
    pub login_limiter: Arc<RateLimiter>,
    pub unlock_limiter: Arc<RateLimiter>,
    pub session_days: i64,
    pub remember_days: i64,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let storage = Storage::new(&config.media.upload_dir, &config.site.url);
        let upload = UploadOptions {
            max_bytes: config.media.max_upload_bytes()?,
            thumbnails: config.media.thumbnails,
            thumbnail_size: config.media.thumbnail_size,
        };
        let session_days = config.auth.session_days()?;
        let remember_days = config.auth.remember_days()?;

        Ok(Self {
            config,
            db,
            storage,
            upload,
            unlocks: UnlockRegistry::default(),
            login_limiter: Arc::new(RateLimiter::default()),
            unlock_limiter: Arc::new(RateLimiter::new(
                5,
                Duration::from_secs(60),
                Duration::from_secs(300),
            )),
            session_days,
            remember_days,
        })
    }
}
