use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
}

impl Language {
    pub fn is_rtl(self) -> bool {
        self == Self::Ar
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Ar => write!(f, "ar"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    pub accent_color: String,
    pub secondary_color: String,
    pub language: Language,
    pub hover_preview: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            accent_color: "#7c3aed".to_string(),
            secondary_color: "#db2777".to_string(),
            language: Language::En,
            hover_preview: true,
        }
    }
}

impl AppSettings {
    pub fn direction(&self) -> &'static str {
        if self.language.is_rtl() {
            "rtl"
        } else {
            "ltr"
        }
    }

    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(accent) = patch.accent_color {
            self.accent_color = accent;
        }
        if let Some(secondary) = patch.secondary_color {
            self.secondary_color = secondary;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(hover) = patch.hover_preview {
            self.hover_preview = hover;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub accent_color: Option<String>,
    pub secondary_color: Option<String>,
    pub language: Option<Language>,
    pub hover_preview: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AccentPreset {
    pub name: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
}

pub const ACCENT_PRESETS: [AccentPreset; 5] = [
    AccentPreset {
        name: "Purple (Default)",
        primary: "#7c3aed",
        secondary: "#db2777",
    },
    AccentPreset {
        name: "Blue (Ocean)",
        primary: "#2563eb",
        secondary: "#06b6d4",
    },
    AccentPreset {
        name: "Green (Forest)",
        primary: "#059669",
        secondary: "#10b981",
    },
    AccentPreset {
        name: "Orange (Sunset)",
        primary: "#ea580c",
        secondary: "#f59e0b",
    },
    AccentPreset {
        name: "Red (Crimson)",
        primary: "#dc2626",
        secondary: "#f43f5e",
    },
];
