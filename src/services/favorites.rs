use crate::Database;
use anyhow::Result;
use std::collections::HashSet;

pub fn get_favorites(db: &Database, user_id: i64) -> Result<HashSet<i64>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare("SELECT item_id FROM favorites WHERE user_id = ?")?;
    let ids = stmt
        .query_map([user_id], |row| row.get(0))?
        .collect::<Result<HashSet<i64>, _>>()?;
    Ok(ids)
}

pub fn is_favorite(db: &Database, user_id: i64, item_id: i64) -> Result<bool> {
    let conn = db.get()?;
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM favorites WHERE user_id = ? AND item_id = ?",
        (user_id, item_id),
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Marks or unmarks an item. Setting the current state again is a no-op.
pub fn set_favorite(db: &Database, user_id: i64, item_id: i64, favorite: bool) -> Result<()> {
    let conn = db.get()?;
    if favorite {
        conn.execute(
            "INSERT OR IGNORE INTO favorites (user_id, item_id) VALUES (?, ?)",
            (user_id, item_id),
        )?;
    } else {
        conn.execute(
            "DELETE FROM favorites WHERE user_id = ? AND item_id = ?",
            (user_id, item_id),
        )?;
    }
    Ok(())
}

/// Flips the favorite flag and returns the new state.
pub fn toggle_favorite(db: &Database, user_id: i64, item_id: i64) -> Result<bool> {
    let now_favorite = !is_favorite(db, user_id, item_id)?;
    set_favorite(db, user_id, item_id, now_favorite)?;
    Ok(now_favorite)
}
