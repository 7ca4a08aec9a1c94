//! Caltrack MCP Server Implementation
//!
//! Implements the MCP server with all caltrack tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::lookup::FoodLookup;
use crate::models::{ActivityLevel, Goal, MealCreate, PortionUnit, ProfileUpdate, Sex};
use crate::tools::status::StatusTracker;
use crate::tools::{favorites, meals, profile, water};

/// Caltrack MCP Service
#[derive(Clone)]
pub struct CaltrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    lookup: Arc<dyn FoodLookup>,
    tool_router: ToolRouter<CaltrackService>,
}

impl CaltrackService {
    pub fn new(database_path: PathBuf, database: Database, lookup: Arc<dyn FoodLookup>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            lookup,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Date of birth (ISO format: YYYY-MM-DD)
    pub date_of_birth: Option<String>,
    /// Biological sex: male or female
    pub sex: Option<String>,
    /// Activity level: sedentary, light, moderate, active, extra_active
    pub activity_level: Option<String>,
    /// Goal: lose_weight, maintain, gain_muscle
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupFoodParams {
    /// Product barcode (EAN/UPC digits)
    pub barcode: String,
    /// Optional portion in grams or millilitres for a scaled preview
    pub quantity: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogScannedFoodParams {
    /// Product barcode (EAN/UPC digits)
    pub barcode: String,
    /// Portion consumed, in grams or millilitres
    pub quantity: f64,
    /// When it was eaten (defaults to now)
    pub eaten_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    /// Name of the food
    pub food_name: String,
    /// Calories for the portion actually eaten (not per 100)
    pub calories: i64,
    /// Protein in grams for the portion
    #[serde(default)]
    pub protein: f64,
    /// Carbohydrates in grams for the portion
    #[serde(default)]
    pub carbs: f64,
    /// Fat in grams for the portion
    #[serde(default)]
    pub fat: f64,
    /// Portion size in grams or millilitres
    pub quantity: f64,
    /// Portion unit: g or ml (default g)
    pub unit: Option<String>,
    /// When it was eaten (defaults to now)
    pub eaten_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealsParams {
    /// Calendar day (ISO format: YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DayProgressParams {
    /// Calendar day (ISO format: YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddWaterParams {
    /// Amount in millilitres
    pub ml: f64,
    /// When it was drunk (defaults to now)
    pub logged_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetWaterParams {
    /// Calendar day (ISO format: YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFavoriteParams {
    /// Product barcode
    pub product_code: String,
    /// Product name
    pub product_name: Option<String>,
    /// Product image URL
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveFavoriteParams {
    /// Product barcode
    pub product_code: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListScanHistoryParams {
    /// Maximum results (default 20)
    #[serde(default = "default_scan_limit")]
    pub limit: i64,
}

fn default_scan_limit() -> i64 {
    20
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl CaltrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the caltrack service including build info, database status, and process information")]
    async fn caltrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        to_json(&status)
    }

    #[tool(description = "Get step-by-step instructions for tracking calories and macros. Call this when starting a new tracking session or when unsure how to use the tools.")]
    fn tracking_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::TRACKING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(
            TRACKING_INSTRUCTIONS,
        )]))
    }

    // --- Profile ---

    #[tool(description = "Get the biometric profile including the cached daily calorie goal")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update profile fields (weight, height, date of birth, sex, activity level, goal). Recomputes the daily calorie goal when a biometric input changes.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let sex = match p.sex.as_deref() {
            Some(s) => Some(Sex::from_str(s).ok_or_else(|| {
                McpError::invalid_params(format!("Unknown sex: {}", s), None)
            })?),
            None => None,
        };

        let data = ProfileUpdate {
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            date_of_birth: p.date_of_birth,
            sex,
            activity_level: p.activity_level.as_deref().map(ActivityLevel::from_str),
            goal: p.goal.as_deref().map(Goal::from_str),
        };

        let result = profile::update_profile(&self.database, data)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the goal-adjusted daily calorie and macro gram targets for the current profile")]
    fn get_macro_targets(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_macro_targets(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Food & Meals ---

    #[tool(description = "Look up a product by barcode and return its per-100g/ml nutrition facts, with an optional scaled portion preview. Records the scan in history.")]
    async fn lookup_food(&self, Parameters(p): Parameters<LookupFoodParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        let lookup = self.lookup.clone();
        let result = tokio::task::spawn_blocking(move || {
            meals::lookup_food(&db, lookup.as_ref(), &p.barcode, p.quantity)
        })
        .await
        .map_err(|e| McpError::internal_error(format!("Task error: {}", e), None))?
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Look up a product by barcode and log a portion of it as a meal. Nutrition is scaled by quantity/100.")]
    async fn log_scanned_food(&self, Parameters(p): Parameters<LogScannedFoodParams>) -> Result<CallToolResult, McpError> {
        let db = self.database.clone();
        let lookup = self.lookup.clone();
        let result = tokio::task::spawn_blocking(move || {
            meals::log_scanned_food(&db, lookup.as_ref(), &p.barcode, p.quantity, p.eaten_at)
        })
        .await
        .map_err(|e| McpError::internal_error(format!("Task error: {}", e), None))?
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Log a meal with nutrition values supplied directly (for the portion actually eaten, not per 100)")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let data = MealCreate {
            food_name: p.food_name,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
            quantity: p.quantity,
            unit: PortionUnit::from_str(p.unit.as_deref().unwrap_or("g")),
            eaten_at: p.eaten_at,
        };

        let result = meals::log_meal(&self.database, data)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List all meal entries logged on a calendar day")]
    fn list_meals(&self, Parameters(p): Parameters<ListMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meals(&self.database, &p.date)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a day's progress: macro targets, consumed totals, remaining amounts, and water. Remaining values are negative when over budget.")]
    fn day_progress(&self, Parameters(p): Parameters<DayProgressParams>) -> Result<CallToolResult, McpError> {
        let result = meals::day_progress(&self.database, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List recent barcode scans")]
    fn list_scan_history(&self, Parameters(p): Parameters<ListScanHistoryParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_scan_history(&self.database, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Water ---

    #[tool(description = "Log a water intake entry in millilitres")]
    fn add_water(&self, Parameters(p): Parameters<AddWaterParams>) -> Result<CallToolResult, McpError> {
        let result = water::add_water(&self.database, p.ml, p.logged_at)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the water intake total and entries for a calendar day")]
    fn get_water(&self, Parameters(p): Parameters<GetWaterParams>) -> Result<CallToolResult, McpError> {
        let result = water::get_water(&self.database, &p.date)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Favorites ---

    #[tool(description = "Add a product to favorites by barcode (idempotent)")]
    fn add_favorite(&self, Parameters(p): Parameters<AddFavoriteParams>) -> Result<CallToolResult, McpError> {
        let result = favorites::add_favorite(
            &self.database,
            &p.product_code,
            p.product_name.as_deref(),
            p.image_url.as_deref(),
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List favorited products")]
    fn list_favorites(&self) -> Result<CallToolResult, McpError> {
        let result = favorites::list_favorites(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove a product from favorites by barcode")]
    fn remove_favorite(&self, Parameters(p): Parameters<RemoveFavoriteParams>) -> Result<CallToolResult, McpError> {
        let result = favorites::remove_favorite(&self.database, &p.product_code)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for CaltrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "caltrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Calorie & Macro Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Caltrack - Calorie and macro budget tracking. \
                 IMPORTANT: Call tracking_instructions when starting a session. \
                 Profile: get_profile/update_profile/get_macro_targets. The daily calorie \
                 goal is derived from the profile; update the profile, never the goal. \
                 Food: lookup_food (preview by barcode), log_scanned_food (log a portion \
                 by barcode), log_meal (manual entry), list_meals, day_progress, \
                 list_scan_history. \
                 Water: add_water/get_water. \
                 Favorites: add/list/remove_favorite."
                    .into(),
            ),
        }
    }
}
