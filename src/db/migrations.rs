//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
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
        -- PROFILE
        -- Single-row biometric profile (id = 1).
        -- Fields are nullable because they are collected
        -- progressively; daily_calorie_goal is derived and
        -- written only by the budget calculator.
        -- ============================================
        CREATE TABLE profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            weight_kg REAL,                      -- kilograms
            height_cm REAL,                      -- centimeters
            date_of_birth TEXT,                  -- ISO date: "1990-06-15"
            sex TEXT CHECK(sex IN ('male', 'female')),
            activity_level TEXT,                 -- sedentary/light/moderate/active/extra_active
            goal TEXT,                           -- lose_weight/maintain/gain_muscle
            daily_calorie_goal INTEGER,          -- kcal, derived (never user-edited)
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- MEALS
        -- Logged consumption, already portion-scaled.
        -- Rows are immutable once inserted.
        -- ============================================
        CREATE TABLE meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            food_name TEXT NOT NULL,
            calories INTEGER NOT NULL DEFAULT 0, -- kcal, rounded at scaling time
            protein REAL NOT NULL DEFAULT 0,     -- grams, full precision
            carbs REAL NOT NULL DEFAULT 0,       -- grams, full precision
            fat REAL NOT NULL DEFAULT 0,         -- grams, full precision
            quantity REAL NOT NULL,              -- portion amount
            unit TEXT NOT NULL CHECK(unit IN ('g', 'ml')),
            eaten_at TEXT NOT NULL DEFAULT (datetime('now')),
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meals_eaten_at ON meals(eaten_at);

        -- ============================================
        -- WATER
        -- Individual water intake entries, summed per day
        -- ============================================
        CREATE TABLE water (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ml REAL NOT NULL CHECK(ml > 0),
            logged_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_water_logged_at ON water(logged_at);

        -- ============================================
        -- FAVORITES
        -- Favorited products, keyed by barcode
        -- ============================================
        CREATE TABLE favorites (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_code TEXT NOT NULL UNIQUE,
            product_name TEXT,
            image_url TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- SCAN HISTORY
        -- Every successful barcode lookup
        -- ============================================
        CREATE TABLE scan_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_code TEXT NOT NULL,
            scanned_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_scan_history_scanned_at ON scan_history(scanned_at);
        "#,
    )?;
    Ok(())
}
