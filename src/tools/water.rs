//! Water MCP Tools

use serde::Serialize;

use crate::db::Database;
use crate::models::WaterEntry;

/// Response for add_water
#[derive(Debug, Serialize)]
pub struct AddWaterResponse {
    pub id: i64,
    pub ml: f64,
    pub logged_at: String,
}

/// Response for get_water
#[derive(Debug, Serialize)]
pub struct GetWaterResponse {
    pub date: String,
    pub total_ml: f64,
    pub entries: Vec<WaterEntryResponse>,
}

#[derive(Debug, Serialize)]
pub struct WaterEntryResponse {
    pub ml: f64,
    pub logged_at: String,
}

/// Log a water intake entry
pub fn add_water(db: &Database, ml: f64, logged_at: Option<String>) -> Result<AddWaterResponse, String> {
    if !ml.is_finite() || ml <= 0.0 {
        return Err("ml must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entry = WaterEntry::insert(&conn, ml, logged_at.as_deref())
        .map_err(|e| format!("Failed to log water: {}", e))?;

    Ok(AddWaterResponse {
        id: entry.id,
        ml: entry.ml,
        logged_at: entry.logged_at,
    })
}

/// Get the water intake for a calendar day
pub fn get_water(db: &Database, date: &str) -> Result<GetWaterResponse, String> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| "date must be in YYYY-MM-DD format".to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let total_ml = WaterEntry::total_for_day(&conn, date)
        .map_err(|e| format!("Failed to total water: {}", e))?;
    let entries = WaterEntry::list_for_day(&conn, date)
        .map_err(|e| format!("Failed to list water entries: {}", e))?;

    Ok(GetWaterResponse {
        date: date.to_string(),
        total_ml,
        entries: entries
            .into_iter()
            .map(|e| WaterEntryResponse {
                ml: e.ml,
                logged_at: e.logged_at,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get_water() {
        let db = Database::new_in_memory().unwrap();

        add_water(&db, 250.0, Some("2026-08-20 09:00:00".to_string())).unwrap();
        add_water(&db, 500.0, Some("2026-08-20 14:00:00".to_string())).unwrap();

        let day = get_water(&db, "2026-08-20").unwrap();
        assert_eq!(day.total_ml, 750.0);
        assert_eq!(day.entries.len(), 2);
    }

    #[test]
    fn test_add_water_rejects_non_positive() {
        let db = Database::new_in_memory().unwrap();
        assert!(add_water(&db, 0.0, None).is_err());
        assert!(add_water(&db, -250.0, None).is_err());
        assert!(add_water(&db, f64::NAN, None).is_err());
    }

    #[test]
    fn test_get_water_rejects_bad_date() {
        let db = Database::new_in_memory().unwrap();
        assert!(get_water(&db, "20/08/2026").is_err());
    }
}
