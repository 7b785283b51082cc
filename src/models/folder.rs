use super::Category;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which roles see a folder without being listed in `allowed_users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    All,
    Editor,
    Admin,
}

impl FromStr for Visibility {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Editor => write!(f, "editor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub category: Category,
    /// `None` behaves like [`Visibility::All`].
    pub visible_to: Option<Visibility>,
    pub allowed_users: Vec<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub protected: bool,
    pub created_at: String,
}

impl Folder {
    pub fn allows(&self, username: &str) -> bool {
        self.allowed_users.iter().any(|u| u == username)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFolder {
    pub name: String,
    pub category: Category,
}

/// Partial update of a folder's access settings. Absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct FolderSecurityUpdate {
    /// A non-empty password locks the folder, an empty one unlocks it.
    pub password: Option<String>,
    pub visible_to: Option<Visibility>,
    pub allowed_users: Option<Vec<String>>,
}
