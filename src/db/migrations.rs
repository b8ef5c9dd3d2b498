// src/db/migrations.rs
//
// Database schema initialization and upgrades
//
// PRINCIPLES:
// - Explicit schema versions
// - Upgrades are applied in order, each in its own transaction
// - Re-running on an up-to-date database is a no-op
// - Never drop user data

use rusqlite::Connection;

use crate::error::{AppError, AppResult};

/// Current schema version
/// Increment this when adding a migration to `MIGRATIONS`
pub const CURRENT_SCHEMA_VERSION: i32 = 3;

/// Ordered schema steps: (version, SQL)
const MIGRATIONS: &[(i32, &str)] = &[
    (
        1,
        "CREATE TABLE IF NOT EXISTS games (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            price REAL NOT NULL,
            description TEXT,
            category TEXT NOT NULL,
            image TEXT,
            release_date TEXT NOT NULL,
            rating TEXT NOT NULL DEFAULT 'medium' CHECK(rating IN ('low', 'medium', 'high')),
            sold INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_games_created_at ON games(created_at);",
    ),
    (
        2,
        "ALTER TABLE games ADD COLUMN is_wishlist INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE games ADD COLUMN is_new INTEGER NOT NULL DEFAULT 1;
        ALTER TABLE games ADD COLUMN original_price REAL;
        ALTER TABLE games ADD COLUMN discount_percent INTEGER;
        ALTER TABLE games ADD COLUMN sale_end_date TEXT;
        ALTER TABLE games ADD COLUMN notification_id TEXT;
        ALTER TABLE games ADD COLUMN sale_notification_id TEXT;
        ALTER TABLE games ADD COLUMN notify_on_release INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE games ADD COLUMN updated_at TEXT;
        UPDATE games SET updated_at = created_at WHERE updated_at IS NULL;",
    ),
    (
        3,
        "CREATE TABLE IF NOT EXISTS scheduled_reminders (
            handle TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            fire_at TEXT NOT NULL,
            repeat TEXT NOT NULL,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            payload TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_scheduled_reminders_fire_at
            ON scheduled_reminders(fire_at);",
    ),
];

/// Initialize the database schema
///
/// This function:
/// 1. Checks current schema version
/// 2. Applies every missing upgrade in order
/// 3. Records each applied version
///
/// Safe to call multiple times (idempotent).
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    ensure_version_table(conn)?;
    let current_version = get_schema_version(conn)?;

    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(AppError::Other(format!(
            "Schema version {} is newer than supported {}. Update the application.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    }

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current_version) {
        apply_migration(conn, *version, sql)?;
        log::info!("Applied schema migration v{}", version);
    }

    Ok(())
}

fn ensure_version_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;
    Ok(())
}

/// Get current schema version
/// Returns 0 for a fresh database
fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })?;

    Ok(version.unwrap_or(0))
}

fn apply_migration(conn: &Connection, version: i32, sql: &str) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)
        .map_err(|e| AppError::Other(format!("Failed to apply schema v{}: {}", version, e)))?;
    tx.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [version],
    )?;
    tx.commit()?;
    Ok(())
}

/// Verify database integrity
///
/// Runs SQLite's integrity check.
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    if result != "ok" {
        return Err(AppError::Other(format!(
            "Database integrity check failed: {}",
            result
        )));
    }

    Ok(())
}

/// Get database statistics
///
/// Returns useful info for debugging
pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
    let game_count: i64 = conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
    let scheduled_reminder_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM scheduled_reminders", [], |row| {
            row.get(0)
        })?;

    Ok(DatabaseStats {
        schema_version: get_schema_version(conn)?,
        size_bytes: page_count * page_size,
        game_count,
        scheduled_reminder_count,
    })
}

/// Database statistics
#[derive(Debug)]
pub struct DatabaseStats {
    pub schema_version: i32,
    pub size_bytes: i64,
    pub game_count: i64,
    pub scheduled_reminder_count: i64,
}
