//! Favorites MCP Tools

use serde::Serialize;

use crate::db::Database;
use crate::models::Favorite;

/// Response for add_favorite
#[derive(Debug, Serialize)]
pub struct AddFavoriteResponse {
    pub product_code: String,
    pub product_name: Option<String>,
    pub created_at: String,
}

/// Response for list_favorites
#[derive(Debug, Serialize)]
pub struct ListFavoritesResponse {
    pub favorites: Vec<FavoriteSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct FavoriteSummary {
    pub product_code: String,
    pub product_name: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
}

/// Response for remove_favorite
#[derive(Debug, Serialize)]
pub struct RemoveFavoriteResponse {
    pub success: bool,
    pub product_code: String,
}

/// Add a product to favorites (idempotent per barcode)
pub fn add_favorite(
    db: &Database,
    product_code: &str,
    product_name: Option<&str>,
    image_url: Option<&str>,
) -> Result<AddFavoriteResponse, String> {
    let code = product_code.trim();
    if code.is_empty() {
        return Err("product_code cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let favorite = Favorite::upsert(&conn, code, product_name, image_url)
        .map_err(|e| format!("Failed to add favorite: {}", e))?;

    Ok(AddFavoriteResponse {
        product_code: favorite.product_code,
        product_name: favorite.product_name,
        created_at: favorite.created_at,
    })
}

/// List favorited products
pub fn list_favorites(db: &Database) -> Result<ListFavoritesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let favorites = Favorite::list(&conn)
        .map_err(|e| format!("Failed to list favorites: {}", e))?;

    let favorites: Vec<FavoriteSummary> = favorites
        .into_iter()
        .map(|f| FavoriteSummary {
            product_code: f.product_code,
            product_name: f.product_name,
            image_url: f.image_url,
            created_at: f.created_at,
        })
        .collect();
    let total = favorites.len();

    Ok(ListFavoritesResponse { favorites, total })
}

/// Remove a product from favorites
pub fn remove_favorite(db: &Database, product_code: &str) -> Result<RemoveFavoriteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let removed = Favorite::remove(&conn, product_code)
        .map_err(|e| format!("Failed to remove favorite: {}", e))?;

    if !removed {
        return Err(format!("Favorite not found: {}", product_code));
    }

    Ok(RemoveFavoriteResponse {
        success: true,
        product_code: product_code.to_string(),
    })
}
