//! Utility to set the biometric profile in the database
//!
//! Usage: set_profile <weight_kg> <height_cm> <date_of_birth> <sex> <activity_level> [goal]

use std::path::PathBuf;

use caltrack::models::{ActivityLevel, Goal, ProfileUpdate, Sex};

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
            std::fs::create_dir_all(&path).ok();
            path.push("caltrack.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 5 {
        eprintln!(
            "Usage: set_profile <weight_kg> <height_cm> <date_of_birth> <sex> <activity_level> [goal]"
        );
        eprintln!("Example: set_profile 80 180 1996-06-15 male moderate maintain");
        std::process::exit(1);
    }

    let sex = Sex::from_str(&args[3]).ok_or("sex must be 'male' or 'female'")?;

    let update = ProfileUpdate {
        weight_kg: Some(args[0].parse()?),
        height_cm: Some(args[1].parse()?),
        date_of_birth: Some(args[2].clone()),
        sex: Some(sex),
        activity_level: Some(ActivityLevel::from_str(&args[4])),
        goal: args.get(5).map(|g| Goal::from_str(g)),
    };

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = caltrack::db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        caltrack::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let response = caltrack::tools::profile::update_profile(&database, update)?;
    println!("Profile set:");
    println!("  Weight: {:?} kg", response.profile.weight_kg);
    println!("  Height: {:?} cm", response.profile.height_cm);
    println!("  DOB: {:?}", response.profile.date_of_birth);
    println!("  Goal: {}", response.profile.goal);
    println!(
        "  Daily calorie goal: {:?}",
        response.profile.daily_calorie_goal
    );

    Ok(())
}
