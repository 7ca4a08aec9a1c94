//! Utility to recompute and persist the cached daily calorie goal
//!
//! Useful after restoring a database or editing the profile by hand.

use std::path::PathBuf;

use chrono::Local;

fn get_database_path() -> PathBuf {
    std::env::var("CALTRACK_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("caltrack.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = caltrack::db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        caltrack::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    database.with_conn(|conn| {
        let profile = caltrack::models::Profile::ensure(conn)?;

        match caltrack::budget::compute_daily_calories(&profile, Local::now().date_naive()) {
            Ok(daily) => {
                caltrack::models::Profile::set_daily_calorie_goal(conn, Some(daily))?;
                println!("Daily calorie goal recalculated: {} kcal", daily);
            }
            Err(e) => {
                caltrack::models::Profile::set_daily_calorie_goal(conn, None)?;
                println!("Cleared daily calorie goal: {}", e);
            }
        }

        Ok(())
    })?;

    Ok(())
}
