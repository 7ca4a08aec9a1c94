//! Profile MCP Tools
//!
//! Biometric profile management and the daily budget calculation.

use chrono::Local;
use serde::Serialize;

use crate::budget::{self, MacroTargets};
use crate::db::Database;
use crate::models::{Profile, ProfileUpdate};

/// Profile as reported to clients
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub date_of_birth: Option<String>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub goal: String,
    pub daily_calorie_goal: Option<i64>,
    pub updated_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            weight_kg: profile.weight_kg,
            height_cm: profile.height_cm,
            date_of_birth: profile
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string()),
            sex: profile.sex.map(|s| s.as_str().to_string()),
            activity_level: profile.activity_level.map(|a| a.as_str().to_string()),
            goal: profile.goal.as_str().to_string(),
            daily_calorie_goal: profile.daily_calorie_goal,
            updated_at: profile.updated_at,
        }
    }
}

/// Response for update_profile
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub recalculated: bool,
    pub profile: ProfileResponse,
}

/// Response for get_macro_targets
#[derive(Debug, Serialize)]
pub struct MacroTargetsResponse {
    pub goal: String,
    pub maintenance_calories: i64,
    pub targets: MacroTargets,
}

/// Get the biometric profile
pub fn get_profile(db: &Database) -> Result<ProfileResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::ensure(&conn)
        .map_err(|e| format!("Failed to load profile: {}", e))?;

    Ok(profile.into())
}

/// Update profile fields; recomputes the cached daily calorie goal
/// whenever a calculation input changed
pub fn update_profile(db: &Database, data: ProfileUpdate) -> Result<UpdateProfileResponse, String> {
    if let Some(weight) = data.weight_kg {
        if !weight.is_finite() || weight <= 0.0 {
            return Err("weight_kg must be greater than 0".to_string());
        }
    }
    if let Some(height) = data.height_cm {
        if !height.is_finite() || height <= 0.0 {
            return Err("height_cm must be greater than 0".to_string());
        }
    }
    if let Some(ref dob) = data.date_of_birth {
        chrono::NaiveDate::parse_from_str(dob, "%Y-%m-%d")
            .map_err(|_| "date_of_birth must be in YYYY-MM-DD format".to_string())?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recalculated = data.touches_budget_inputs();
    let mut profile = Profile::update(&conn, &data)
        .map_err(|e| format!("Failed to update profile: {}", e))?;

    if recalculated {
        // An incomplete profile has no defined goal; clear the stale value
        let daily = budget::compute_daily_calories(&profile, Local::now().date_naive()).ok();
        Profile::set_daily_calorie_goal(&conn, daily)
            .map_err(|e| format!("Failed to store daily calorie goal: {}", e))?;
        profile = Profile::ensure(&conn)
            .map_err(|e| format!("Failed to reload profile: {}", e))?;
    }

    Ok(UpdateProfileResponse {
        success: true,
        recalculated,
        profile: profile.into(),
    })
}

/// Get the goal-adjusted macro targets for the current profile
pub fn get_macro_targets(db: &Database) -> Result<MacroTargetsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::ensure(&conn)
        .map_err(|e| format!("Failed to load profile: {}", e))?;

    let base = budget::compute_daily_calories(&profile, Local::now().date_naive())
        .map_err(|e| e.to_string())?;

    Ok(MacroTargetsResponse {
        goal: profile.goal.as_str().to_string(),
        maintenance_calories: base,
        targets: budget::budget_for(base, profile.goal),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, Goal, Sex};

    fn complete_update() -> ProfileUpdate {
        ProfileUpdate {
            weight_kg: Some(80.0),
            height_cm: Some(180.0),
            date_of_birth: Some("1996-06-15".to_string()),
            sex: Some(Sex::Male),
            activity_level: Some(ActivityLevel::Moderate),
            goal: Some(Goal::Maintain),
        }
    }

    #[test]
    fn test_update_recomputes_daily_goal() {
        let db = Database::new_in_memory().unwrap();

        let response = update_profile(&db, complete_update()).unwrap();
        assert!(response.recalculated);
        assert!(response.profile.daily_calorie_goal.is_some());

        // Changing weight changes the cached goal
        let before = response.profile.daily_calorie_goal.unwrap();
        let response = update_profile(
            &db,
            ProfileUpdate {
                weight_kg: Some(90.0),
                ..Default::default()
            },
        )
        .unwrap();
        let after = response.profile.daily_calorie_goal.unwrap();
        assert!(after > before);
    }

    #[test]
    fn test_goal_change_does_not_recompute() {
        let db = Database::new_in_memory().unwrap();
        update_profile(&db, complete_update()).unwrap();

        let response = update_profile(
            &db,
            ProfileUpdate {
                goal: Some(Goal::LoseWeight),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!response.recalculated);
        assert!(response.profile.daily_calorie_goal.is_some());
    }

    #[test]
    fn test_incomplete_profile_has_no_goal() {
        let db = Database::new_in_memory().unwrap();

        let response = update_profile(
            &db,
            ProfileUpdate {
                weight_kg: Some(70.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(response.recalculated);
        assert!(response.profile.daily_calorie_goal.is_none());

        assert!(get_macro_targets(&db).is_err());
    }

    #[test]
    fn test_macro_targets_follow_goal() {
        let db = Database::new_in_memory().unwrap();
        update_profile(&db, complete_update()).unwrap();

        let maintain = get_macro_targets(&db).unwrap();
        assert_eq!(maintain.maintenance_calories, maintain.targets.calories);

        update_profile(
            &db,
            ProfileUpdate {
                goal: Some(Goal::GainMuscle),
                ..Default::default()
            },
        )
        .unwrap();
        let gain = get_macro_targets(&db).unwrap();
        assert_eq!(gain.targets.calories, gain.maintenance_calories + 300);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let db = Database::new_in_memory().unwrap();

        assert!(update_profile(
            &db,
            ProfileUpdate {
                weight_kg: Some(-5.0),
                ..Default::default()
            }
        )
        .is_err());

        assert!(update_profile(
            &db,
            ProfileUpdate {
                date_of_birth: Some("15.06.1996".to_string()),
                ..Default::default()
            }
        )
        .is_err());
    }
}
