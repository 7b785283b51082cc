use super::MediaType;
use serde::Serialize;

pub const UPLOAD_CATEGORY: &str = "Uploads";

#[derive(Debug, Clone, Serialize)]
pub struct MediaItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub folder_id: Option<i64>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing)]
    pub storage_key: Option<String>,
    #[serde(skip_serializing)]
    pub thumbnail_key: Option<String>,
    pub title: String,
    pub category: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewMediaItem {
    pub media_type: MediaType,
    pub folder_id: Option<i64>,
    pub url: String,
    pub storage_key: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_key: Option<String>,
    pub title: String,
    pub category: String,
}
