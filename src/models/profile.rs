//! Profile model
//!
//! Single-row biometric profile used by the energy budget calculator.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Biological sex category, required for the BMR offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Parse a sex string; anything unrecognized is None (no safe default exists)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    ExtraActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }

    /// Unrecognized strings fall back to sedentary (multiplier 1.2)
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().trim() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "extra_active" => ActivityLevel::ExtraActive,
            _ => ActivityLevel::Sedentary,
        }
    }

    /// Scalar applied to BMR to estimate total daily energy expenditure
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

/// User goal, normalized from the free-text label collected at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    Maintain,
    GainMuscle,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::Maintain => "maintain",
            Goal::GainMuscle => "gain_muscle",
        }
    }

    /// Unrecognized labels behave like maintain (no calorie adjustment)
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().trim() {
            "lose_weight" | "lose weight" => Goal::LoseWeight,
            "gain_muscle" | "build_muscle" | "build muscle" => Goal::GainMuscle,
            _ => Goal::Maintain,
        }
    }
}

impl Default for Goal {
    fn default() -> Self {
        Goal::Maintain
    }
}

/// The biometric profile (single row, id = 1)
///
/// `daily_calorie_goal` is derived data: it is written only through
/// `set_daily_calorie_goal`, by the budget calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Goal,
    pub daily_calorie_goal: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Field-wise profile update; None means "leave unchanged"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub date_of_birth: Option<String>,
    pub sex: Option<Sex>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
}

impl ProfileUpdate {
    /// Whether this update changes any input of the calorie goal calculation
    /// (goal is excluded: the stored daily goal is pre-adjustment)
    pub fn touches_budget_inputs(&self) -> bool {
        self.weight_kg.is_some()
            || self.height_cm.is_some()
            || self.date_of_birth.is_some()
            || self.sex.is_some()
            || self.activity_level.is_some()
    }
}

impl Profile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let dob: Option<String> = row.get("date_of_birth")?;
        let sex: Option<String> = row.get("sex")?;
        let activity: Option<String> = row.get("activity_level")?;
        let goal: Option<String> = row.get("goal")?;

        Ok(Self {
            id: row.get("id")?,
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            // A malformed stored date is treated the same as a missing one
            date_of_birth: dob
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            sex: sex.and_then(|s| Sex::from_str(&s)),
            activity_level: activity.map(|a| ActivityLevel::from_str(&a)),
            goal: goal.map(|g| Goal::from_str(&g)).unwrap_or_default(),
            daily_calorie_goal: row.get("daily_calorie_goal")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the profile (single row table)
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profile WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the profile, creating an empty row if none exists yet
    pub fn ensure(conn: &Connection) -> DbResult<Self> {
        conn.execute("INSERT OR IGNORE INTO profile (id) VALUES (1)", [])?;
        Self::get(conn)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Apply a field-wise update
    pub fn update(conn: &Connection, data: &ProfileUpdate) -> DbResult<Self> {
        Self::ensure(conn)?;

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(weight) = data.weight_kg {
            updates.push(format!("weight_kg = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(weight));
        }
        if let Some(height) = data.height_cm {
            updates.push(format!("height_cm = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(height));
        }
        if let Some(ref dob) = data.date_of_birth {
            updates.push(format!("date_of_birth = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(dob.clone()));
        }
        if let Some(sex) = data.sex {
            updates.push(format!("sex = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(sex.as_str().to_string()));
        }
        if let Some(activity) = data.activity_level {
            updates.push(format!("activity_level = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(activity.as_str().to_string()));
        }
        if let Some(goal) = data.goal {
            updates.push(format!("goal = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(goal.as_str().to_string()));
        }

        if updates.is_empty() {
            return Self::ensure(conn);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!("UPDATE profile SET {} WHERE id = 1", updates.join(", "));
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::ensure(conn)
    }

    /// Persist a recomputed daily calorie goal (budget calculator only)
    pub fn set_daily_calorie_goal(conn: &Connection, goal: Option<i64>) -> DbResult<()> {
        conn.execute(
            "UPDATE profile SET daily_calorie_goal = ?1, updated_at = datetime('now') WHERE id = 1",
            params![goal],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_ensure_creates_empty_profile() {
        let db = Database::new_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        assert!(Profile::get(&conn).unwrap().is_none());

        let profile = Profile::ensure(&conn).unwrap();
        assert_eq!(profile.id, 1);
        assert!(profile.weight_kg.is_none());
        assert_eq!(profile.goal, Goal::Maintain);
        assert!(profile.daily_calorie_goal.is_none());
    }

    #[test]
    fn test_update_round_trip() {
        let db = Database::new_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let profile = Profile::update(
            &conn,
            &ProfileUpdate {
                weight_kg: Some(70.0),
                height_cm: Some(175.0),
                date_of_birth: Some("1996-03-20".to_string()),
                sex: Some(Sex::Male),
                activity_level: Some(ActivityLevel::Sedentary),
                goal: Some(Goal::LoseWeight),
            },
        )
        .unwrap();

        assert_eq!(profile.weight_kg, Some(70.0));
        assert_eq!(profile.height_cm, Some(175.0));
        assert_eq!(
            profile.date_of_birth,
            NaiveDate::from_ymd_opt(1996, 3, 20)
        );
        assert_eq!(profile.sex, Some(Sex::Male));
        assert_eq!(profile.activity_level, Some(ActivityLevel::Sedentary));
        assert_eq!(profile.goal, Goal::LoseWeight);
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let db = Database::new_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        Profile::update(
            &conn,
            &ProfileUpdate {
                weight_kg: Some(82.5),
                sex: Some(Sex::Female),
                ..Default::default()
            },
        )
        .unwrap();

        let profile = Profile::update(
            &conn,
            &ProfileUpdate {
                weight_kg: Some(81.0),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(profile.weight_kg, Some(81.0));
        assert_eq!(profile.sex, Some(Sex::Female));
    }

    #[test]
    fn test_set_daily_calorie_goal() {
        let db = Database::new_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        Profile::ensure(&conn).unwrap();
        Profile::set_daily_calorie_goal(&conn, Some(1979)).unwrap();

        let profile = Profile::get(&conn).unwrap().unwrap();
        assert_eq!(profile.daily_calorie_goal, Some(1979));
    }

    #[test]
    fn test_activity_level_fallback() {
        assert_eq!(ActivityLevel::from_str("mystery"), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_str("extra_active").multiplier(), 1.9);
    }

    #[test]
    fn test_goal_normalization() {
        assert_eq!(Goal::from_str("Lose Weight"), Goal::LoseWeight);
        assert_eq!(Goal::from_str("build muscle"), Goal::GainMuscle);
        assert_eq!(Goal::from_str("whatever"), Goal::Maintain);
    }
}
