use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Navigation tabs of the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Photos,
    Videos,
    Music,
    Collections,
    Favorites,
}

impl Tab {
    pub fn media_type(self) -> Option<MediaType> {
        match self {
            Self::Photos => Some(MediaType::Photo),
            Self::Videos => Some(MediaType::Video),
            Self::Music => Some(MediaType::Audio),
            Self::Collections => Some(MediaType::Collection),
            Self::Favorites => None,
        }
    }

    /// Folder category backing this tab. Favorites has no folders.
    pub fn category(self) -> Option<Category> {
        match self {
            Self::Photos => Some(Category::Photos),
            Self::Videos => Some(Category::Videos),
            Self::Music => Some(Category::Music),
            Self::Collections => Some(Category::Collections),
            Self::Favorites => None,
        }
    }
}

impl FromStr for Tab {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "photos" => Ok(Self::Photos),
            "videos" => Ok(Self::Videos),
            "music" => Ok(Self::Music),
            "collections" => Ok(Self::Collections),
            "favorites" => Ok(Self::Favorites),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Photos => write!(f, "photos"),
            Self::Videos => write!(f, "videos"),
            Self::Music => write!(f, "music"),
            Self::Collections => write!(f, "collections"),
            Self::Favorites => write!(f, "favorites"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Photos,
    Videos,
    Music,
    Collections,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Photos,
        Category::Videos,
        Category::Music,
        Category::Collections,
    ];

    pub fn tab(self) -> Tab {
        match self {
            Self::Photos => Tab::Photos,
            Self::Videos => Tab::Videos,
            Self::Music => Tab::Music,
            Self::Collections => Tab::Collections,
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Tab>()?.category().ok_or(())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.tab().fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
    Audio,
    Collection,
}

impl MediaType {
    /// Extension used when handing the file to a native share sheet.
    pub fn share_extension(self) -> &'static str {
        match self {
            Self::Video => ".mp4",
            Self::Audio => ".mp3",
            Self::Photo | Self::Collection => ".jpg",
        }
    }

    /// Whether an uploaded file with this MIME type belongs under this type.
    pub fn accepts_mime(self, mime: &str) -> bool {
        match self {
            Self::Photo => mime.starts_with("image/"),
            Self::Video => mime.starts_with("video/"),
            Self::Audio => mime.starts_with("audio/"),
            Self::Collection => {
                mime.starts_with("image/") || mime.starts_with("video/") || mime.starts_with("audio/")
            }
        }
    }
}

impl FromStr for MediaType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "photo" => Ok(Self::Photo),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "collection" => Ok(Self::Collection),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Photo => write!(f, "photo"),
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Collection => write!(f, "collection"),
        }
    }
}
