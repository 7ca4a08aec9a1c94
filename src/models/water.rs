//! Water model
//!
//! Individual water intake entries, summed per calendar day.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A single water intake entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterEntry {
    pub id: i64,
    pub ml: f64,
    pub logged_at: String,
}

impl WaterEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            ml: row.get("ml")?,
            logged_at: row.get("logged_at")?,
        })
    }

    /// Insert a water entry; logged_at defaults to now
    pub fn insert(conn: &Connection, ml: f64, logged_at: Option<&str>) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO water (ml, logged_at) VALUES (?1, COALESCE(?2, datetime('now')))",
            params![ml, logged_at],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM water WHERE id = ?1")?;
        Ok(stmt.query_row([id], Self::from_row)?)
    }

    /// List entries for a calendar day, newest first
    pub fn list_for_day(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM water
             WHERE logged_at >= ?1 || ' 00:00:00' AND logged_at <= ?1 || ' 23:59:59.999'
             ORDER BY logged_at DESC, id DESC",
        )?;

        let entries = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Total millilitres logged on a calendar day
    pub fn total_for_day(conn: &Connection, date: &str) -> DbResult<f64> {
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(ml), 0) FROM water
             WHERE logged_at >= ?1 || ' 00:00:00' AND logged_at <= ?1 || ' 23:59:59.999'",
            [date],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_total_for_day() {
        let db = Database::new_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        WaterEntry::insert(&conn, 250.0, Some("2026-08-20 08:00:00")).unwrap();
        WaterEntry::insert(&conn, 500.0, Some("2026-08-20 13:00:00")).unwrap();
        WaterEntry::insert(&conn, 330.0, Some("2026-08-21 09:00:00")).unwrap();

        assert_eq!(WaterEntry::total_for_day(&conn, "2026-08-20").unwrap(), 750.0);
        assert_eq!(WaterEntry::total_for_day(&conn, "2026-08-21").unwrap(), 330.0);
        assert_eq!(WaterEntry::total_for_day(&conn, "2026-08-22").unwrap(), 0.0);
    }

    #[test]
    fn test_non_positive_ml_rejected_by_schema() {
        let db = Database::new_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        assert!(WaterEntry::insert(&conn, 0.0, None).is_err());
        assert!(WaterEntry::insert(&conn, -100.0, None).is_err());
    }
}
