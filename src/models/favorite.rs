//! Favorite model
//!
//! Favorited products, keyed by barcode.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A favorited product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub product_code: String,
    pub product_name: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl Favorite {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            product_code: row.get("product_code")?,
            product_name: row.get("product_name")?,
            image_url: row.get("image_url")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Add or refresh a favorite (upsert on product_code)
    pub fn upsert(
        conn: &Connection,
        product_code: &str,
        product_name: Option<&str>,
        image_url: Option<&str>,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO favorites (product_code, product_name, image_url)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(product_code) DO UPDATE SET
                product_name = COALESCE(excluded.product_name, product_name),
                image_url = COALESCE(excluded.image_url, image_url)
            "#,
            params![product_code, product_name, image_url],
        )?;

        Self::get_by_code(conn, product_code)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a favorite by barcode
    pub fn get_by_code(conn: &Connection, product_code: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM favorites WHERE product_code = ?1")?;

        let result = stmt.query_row([product_code], Self::from_row);
        match result {
            Ok(fav) => Ok(Some(fav)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all favorites, newest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM favorites ORDER BY created_at DESC, id DESC")?;

        let favorites = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(favorites)
    }

    /// Remove a favorite by barcode
    pub fn remove(conn: &Connection, product_code: &str) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM favorites WHERE product_code = ?1",
            [product_code],
        )?;
        Ok(rows > 0)
    }
}
