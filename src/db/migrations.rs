//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Highest applied schema version, 0 for a fresh database
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILES
        -- Onboarding answers and the targets computed from them
        -- ============================================
        CREATE TABLE profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL UNIQUE,

            -- Onboarding answer snapshot
            sex_at_birth TEXT NOT NULL CHECK(sex_at_birth IN ('male', 'female')),
            height_value REAL NOT NULL,          -- cm, or total inches if imperial
            current_weight REAL NOT NULL,        -- kg or lb
            birth_year INTEGER NOT NULL,
            birth_month INTEGER NOT NULL,
            goal_type TEXT NOT NULL,
            pace TEXT NOT NULL,
            units_system TEXT NOT NULL CHECK(units_system IN ('metric', 'imperial')),
            goal_weight REAL NOT NULL DEFAULT 0,
            has_goal_weight INTEGER NOT NULL DEFAULT 0,
            activity_multiplier REAL NOT NULL DEFAULT 1.375,
            exercise_bump REAL NOT NULL DEFAULT 0,

            -- Persisted targets (NULL until computed)
            target_calories INTEGER,
            target_protein INTEGER,              -- grams
            target_carbs INTEGER,                -- grams
            target_fat INTEGER,                  -- grams
            goals_configured INTEGER NOT NULL DEFAULT 0,
            computed_targets_enabled INTEGER NOT NULL DEFAULT 0,
            targets_stale INTEGER NOT NULL DEFAULT 0,   -- answers changed since targets were saved
            targets_updated_at TEXT,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_profiles_user_id ON profiles(user_id);
        "#,
    )?;

    Ok(())
}
