//! Scan history model
//!
//! Records every successful barcode lookup.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A barcode scan record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: i64,
    pub product_code: String,
    pub scanned_at: String,
}

impl ScanRecord {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            product_code: row.get("product_code")?,
            scanned_at: row.get("scanned_at")?,
        })
    }

    /// Record a scan
    pub fn record(conn: &Connection, product_code: &str) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO scan_history (product_code) VALUES (?1)",
            [product_code],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM scan_history WHERE id = ?1")?;
        Ok(stmt.query_row([id], Self::from_row)?)
    }

    /// List the most recent scans
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM scan_history ORDER BY scanned_at DESC, id DESC LIMIT ?1",
        )?;

        let records = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_record_and_list_recent() {
        let db = Database::new_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        ScanRecord::record(&conn, "111").unwrap();
        ScanRecord::record(&conn, "222").unwrap();
        ScanRecord::record(&conn, "333").unwrap();

        let records = ScanRecord::list_recent(&conn, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product_code, "333");
        assert_eq!(records[1].product_code, "222");
    }
}
