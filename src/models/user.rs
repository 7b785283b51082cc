use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    /// Permission strings granted to a freshly created account of this role.
    pub fn default_permissions(self) -> Vec<String> {
        let perms: &[&str] = match self {
            Self::Admin => &["all"],
            Self::Editor => &["upload", "edit"],
            Self::Viewer => &["view"],
        };
        perms.iter().map(|p| p.to_string()).collect()
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Admin => "Full Access",
            Self::Editor => "Upload & Edit",
            Self::Viewer => "View Only",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "Admin"),
            Self::Editor => write!(f, "Editor"),
            Self::Viewer => write!(f, "Viewer"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub permissions: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Viewer
}
