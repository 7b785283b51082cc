use anyhow::Result;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::Path;

pub type DbPool = Pool<SqliteConnectionManager>;

pub struct Database {
    pool: DbPool,
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self { pool: self.pool.clone() }
    }
}

impl Database {
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with_pool_size(path, 10)
    }

    pub fn open_with_pool_size(path: &str, pool_size: u32) -> Result<Self> {
        let path = Path::new(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path)
            .with_init(|c| c.execute_batch("PRAGMA foreign_keys=ON;"));
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let conn = pool.get()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        Ok(Self { pool })
    }

    /// Named shared-cache in-memory database. Lives as long as the pool keeps
    /// a connection open.
    pub fn open_memory(name: &str) -> Result<Self> {
        let uri = format!("file:{}?mode=memory&cache=shared", name);
        let manager = SqliteConnectionManager::file(uri)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(|c| c.execute_batch("PRAGMA foreign_keys=ON;"));
        let pool = Pool::builder().max_size(4).min_idle(Some(1)).build(manager)?;
        Ok(Self { pool })
    }

    pub fn get(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.get()?;
        run_migrations(&conn)?;
        Ok(())
    }

    /// Every known migration with the time it was applied, if it was.
    pub fn migration_status(&self) -> Result<Vec<(i32, &'static str, Option<String>)>> {
        let conn = self.get()?;
        conn.execute_batch(SCHEMA_MIGRATIONS_TABLE)?;
        let mut status = Vec::with_capacity(MIGRATIONS.len());
        for (version, description, _) in MIGRATIONS {
            let applied_at: Option<String> = conn
                .query_row(
                    "SELECT applied_at FROM schema_migrations WHERE version = ?",
                    [version],
                    |row| row.get(0),
                )
                .optional()?;
            status.push((*version, *description, applied_at));
        }
        Ok(status)
    }
}

const SCHEMA_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        version INTEGER PRIMARY KEY,
        applied_at TEXT DEFAULT CURRENT_TIMESTAMP
    );
"#;

const MIGRATIONS: &[(i32, &str, &str)] = &[
    (
        1,
        "Core tables (users, sessions, folders, media, favorites, settings)",
        include_str!("migrations/001_initial.sql"),
    ),
    (
        2,
        "Thumbnail columns",
        include_str!("migrations/002_thumbnails.sql"),
    ),
];

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_MIGRATIONS_TABLE)?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    for (version, description, sql) in MIGRATIONS {
        if *version > current_version {
            tracing::info!("Running migration {:03}: {}", version, description);
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                [version],
            )?;
        }
    }

    Ok(())
}
