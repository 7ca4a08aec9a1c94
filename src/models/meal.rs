//! Meal model
//!
//! Logged meal entries with absolute, portion-scaled nutrient values.
//! Entries are immutable once created.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Portion unit for logged quantities
///
/// No density conversion is performed between the two; the "per 100"
/// basis of the source data is assumed to match the reported unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortionUnit {
    G,
    Ml,
}

impl PortionUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortionUnit::G => "g",
            PortionUnit::Ml => "ml",
        }
    }

    /// Anything that is not millilitres is treated as grams
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().trim() {
            "ml" | "milliliter" | "milliliters" => PortionUnit::Ml,
            _ => PortionUnit::G,
        }
    }
}

/// A logged meal entry representing consumed food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub food_name: String,
    /// kcal, rounded to an integer at scaling time
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub quantity: f64,
    pub unit: PortionUnit,
    /// "YYYY-MM-DD HH:MM:SS", used to bucket entries into calendar days
    pub eaten_at: String,
    pub created_at: String,
}

/// Data for creating a meal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealCreate {
    pub food_name: String,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub quantity: f64,
    pub unit: PortionUnit,
    /// Defaults to now when None
    pub eaten_at: Option<String>,
}

impl Meal {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit: String = row.get("unit")?;
        Ok(Self {
            id: row.get("id")?,
            food_name: row.get("food_name")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            quantity: row.get("quantity")?,
            unit: PortionUnit::from_str(&unit),
            eaten_at: row.get("eaten_at")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new meal entry
    pub fn insert(conn: &Connection, data: &MealCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO meals (food_name, calories, protein, carbs, fat, quantity, unit, eaten_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, COALESCE(?8, datetime('now')))
            "#,
            params![
                data.food_name,
                data.calories,
                data.protein,
                data.carbs,
                data.fat,
                data.quantity,
                data.unit.as_str(),
                data.eaten_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a meal entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all entries whose eaten_at falls within the given calendar day
    ///
    /// The day boundary is the inclusive window
    /// [date 00:00:00.000, date 23:59:59.999], newest first.
    pub fn list_for_day(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meals
             WHERE eaten_at >= ?1 || ' 00:00:00' AND eaten_at <= ?1 || ' 23:59:59.999'
             ORDER BY eaten_at DESC, id DESC",
        )?;

        let meals = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }
}
