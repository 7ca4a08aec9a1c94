//! Meal MCP Tools
//!
//! Barcode lookups, meal logging, and day progress.

use chrono::Local;
use serde::Serialize;

use crate::budget::{self, NutrientsPer100, Progress, ScaledNutrients};
use crate::db::Database;
use crate::lookup::FoodLookup;
use crate::models::{Meal, MealCreate, PortionUnit, Profile, ScanRecord, WaterEntry};

/// Response for lookup_food
#[derive(Debug, Serialize)]
pub struct FoodInfoResponse {
    pub code: String,
    pub product_name: Option<String>,
    pub image_url: Option<String>,
    pub unit: PortionUnit,
    pub per_100: NutrientsPer100,
    /// Scaled preview, present when a quantity was supplied
    pub portion: Option<ScaledNutrients>,
}

/// A logged meal entry as reported to clients
#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub id: i64,
    pub food_name: String,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub quantity: f64,
    pub unit: PortionUnit,
    pub eaten_at: String,
}

impl From<Meal> for MealResponse {
    fn from(meal: Meal) -> Self {
        Self {
            id: meal.id,
            food_name: meal.food_name,
            calories: meal.calories,
            protein: meal.protein,
            carbs: meal.carbs,
            fat: meal.fat,
            quantity: meal.quantity,
            unit: meal.unit,
            eaten_at: meal.eaten_at,
        }
    }
}

/// Response for list_meals
#[derive(Debug, Serialize)]
pub struct ListMealsResponse {
    pub date: String,
    pub meals: Vec<MealResponse>,
    pub total: usize,
}

/// Response for day_progress
#[derive(Debug, Serialize)]
pub struct DayProgressResponse {
    pub date: String,
    pub meals_logged: usize,
    pub water_ml: f64,
    #[serde(flatten)]
    pub progress: Progress,
}

/// Scan history response
#[derive(Debug, Serialize)]
pub struct ScanHistoryResponse {
    pub scans: Vec<ScanRecordResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ScanRecordResponse {
    pub product_code: String,
    pub scanned_at: String,
}

fn validate_date(date: &str) -> Result<(), String> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| "date must be in YYYY-MM-DD format".to_string())
}

fn product_unit(serving_quantity_unit: Option<&str>) -> PortionUnit {
    PortionUnit::from_str(serving_quantity_unit.unwrap_or("g"))
}

/// Look up a product by barcode and record the scan; optionally scale a
/// portion preview
pub fn lookup_food(
    db: &Database,
    lookup: &dyn FoodLookup,
    barcode: &str,
    quantity: Option<f64>,
) -> Result<FoodInfoResponse, String> {
    let product = lookup.lookup(barcode).map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    ScanRecord::record(&conn, &product.code)
        .map_err(|e| format!("Failed to record scan: {}", e))?;

    let per_100 = budget::normalize(&product.nutriments);
    let unit = product_unit(product.serving_quantity_unit.as_deref());
    let portion = match quantity {
        Some(q) => Some(budget::scale(&per_100, q, unit).map_err(|e| e.to_string())?),
        None => None,
    };

    Ok(FoodInfoResponse {
        unit,
        per_100,
        portion,
        code: product.code,
        product_name: product.product_name,
        image_url: product.image_url,
    })
}

/// Look up a product and log a portion of it as a meal entry
pub fn log_scanned_food(
    db: &Database,
    lookup: &dyn FoodLookup,
    barcode: &str,
    quantity: f64,
    eaten_at: Option<String>,
) -> Result<MealResponse, String> {
    let product = lookup.lookup(barcode).map_err(|e| e.to_string())?;

    let per_100 = budget::normalize(&product.nutriments);
    let unit = product_unit(product.serving_quantity_unit.as_deref());
    let scaled = budget::scale(&per_100, quantity, unit).map_err(|e| e.to_string())?;

    let food_name = product
        .product_name
        .unwrap_or_else(|| format!("Product {}", product.code));

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    ScanRecord::record(&conn, &product.code)
        .map_err(|e| format!("Failed to record scan: {}", e))?;

    let meal = Meal::insert(
        &conn,
        &MealCreate {
            food_name,
            calories: scaled.calories,
            protein: scaled.protein,
            carbs: scaled.carbs,
            fat: scaled.fat,
            quantity,
            unit,
            eaten_at,
        },
    )
    .map_err(|e| format!("Failed to log meal: {}", e))?;

    Ok(meal.into())
}

/// Log a meal entry from values the user supplies directly
pub fn log_meal(db: &Database, data: MealCreate) -> Result<MealResponse, String> {
    let name = data.food_name.trim();
    if name.is_empty() {
        return Err("food_name cannot be empty".to_string());
    }
    if data.calories < 0 {
        return Err("calories cannot be negative".to_string());
    }
    if !data.quantity.is_finite() || data.quantity <= 0.0 {
        return Err("quantity must be greater than 0".to_string());
    }
    for (label, value) in [
        ("protein", data.protein),
        ("carbs", data.carbs),
        ("fat", data.fat),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{} cannot be negative", label));
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meal = Meal::insert(
        &conn,
        &MealCreate {
            food_name: name.to_string(),
            ..data
        },
    )
    .map_err(|e| format!("Failed to log meal: {}", e))?;

    Ok(meal.into())
}

/// List meal entries for a calendar day
pub fn list_meals(db: &Database, date: &str) -> Result<ListMealsResponse, String> {
    validate_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meals = Meal::list_for_day(&conn, date)
        .map_err(|e| format!("Failed to list meals: {}", e))?;

    let meals: Vec<MealResponse> = meals.into_iter().map(MealResponse::from).collect();
    let total = meals.len();

    Ok(ListMealsResponse {
        date: date.to_string(),
        meals,
        total,
    })
}

/// Reconcile a day's consumption against the current macro targets
pub fn day_progress(db: &Database, date: &str) -> Result<DayProgressResponse, String> {
    validate_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::ensure(&conn)
        .map_err(|e| format!("Failed to load profile: {}", e))?;
    let targets = budget::compute_budget(&profile, Local::now().date_naive())
        .map_err(|e| e.to_string())?;

    let meals = Meal::list_for_day(&conn, date)
        .map_err(|e| format!("Failed to list meals: {}", e))?;
    let water_ml = WaterEntry::total_for_day(&conn, date)
        .map_err(|e| format!("Failed to total water: {}", e))?;

    Ok(DayProgressResponse {
        date: date.to_string(),
        meals_logged: meals.len(),
        water_ml,
        progress: budget::reconcile(&meals, targets),
    })
}

/// List recent barcode scans
pub fn list_scan_history(db: &Database, limit: i64) -> Result<ScanHistoryResponse, String> {
    let limit = limit.clamp(1, 200);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let scans = ScanRecord::list_recent(&conn, limit)
        .map_err(|e| format!("Failed to list scans: {}", e))?;

    let scans: Vec<ScanRecordResponse> = scans
        .into_iter()
        .map(|s| ScanRecordResponse {
            product_code: s.product_code,
            scanned_at: s.scanned_at,
        })
        .collect();
    let total = scans.len();

    Ok(ScanHistoryResponse { scans, total })
}
