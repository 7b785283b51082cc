use crate::models::{AppSettings, Language, SettingsPatch, Theme};
use crate::Database;
use anyhow::Result;
use rusqlite::OptionalExtension;

/// Stored settings for a user, or `None` if they never saved any.
pub fn get_settings(db: &Database, user_id: i64) -> Result<Option<AppSettings>> {
    let conn = db.get()?;
    let settings = conn
        .query_row(
            "SELECT theme, accent_color, secondary_color, language, hover_preview FROM app_settings WHERE user_id = ?",
            [user_id],
            |row| {
                Ok(AppSettings {
                    theme: row.get::<_, String>(0)?.parse().unwrap_or(Theme::Dark),
                    accent_color: row.get(1)?,
                    secondary_color: row.get(2)?,
                    language: row.get::<_, String>(3)?.parse().unwrap_or(Language::En),
                    hover_preview: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(settings)
}

/// Settings to apply for a user: stored ones or the defaults.
pub fn effective_settings(db: &Database, user_id: i64) -> Result<AppSettings> {
    Ok(get_settings(db, user_id)?.unwrap_or_default())
}

pub fn save_settings(db: &Database, user_id: i64, settings: &AppSettings) -> Result<()> {
    validate_color(&settings.accent_color)?;
    validate_color(&settings.secondary_color)?;

    let conn = db.get()?;
    conn.execute(
        "INSERT INTO app_settings (user_id, theme, accent_color, secondary_color, language, hover_preview, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, CURRENT_TIMESTAMP)
         ON CONFLICT(user_id) DO UPDATE SET
            theme = ?2, accent_color = ?3, secondary_color = ?4, language = ?5,
            hover_preview = ?6, updated_at = CURRENT_TIMESTAMP",
        rusqlite::params![
            user_id,
            settings.theme.to_string(),
            settings.accent_color,
            settings.secondary_color,
            settings.language.to_string(),
            settings.hover_preview,
        ],
    )?;
    Ok(())
}

/// Merges `patch` into the current settings and upserts the result.
pub fn update_settings(db: &Database, user_id: i64, patch: SettingsPatch) -> Result<AppSettings> {
    let mut settings = effective_settings(db, user_id)?;
    settings.apply(patch);
    save_settings(db, user_id, &settings)?;
    Ok(settings)
}

fn validate_color(value: &str) -> Result<()> {
    let hex = value.strip_prefix('#').unwrap_or("");
    if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(crate::services::error::ServiceError::invalid(format!(
            "Invalid color '{}', expected #rgb or #rrggbb",
            value
        ))
        .into());
    }
    Ok(())
}
