//! Food database lookup
//!
//! Barcode lookups against the Open Food Facts product API. The
//! `FoodLookup` trait is the seam: tools depend on it, and tests swap
//! in a canned implementation instead of the network.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::budget::RawNutrients;

const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("product {0} not found")]
    NotFound(String),
    #[error("food database request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected food database response: {0}")]
    Decode(String),
}

/// A product as returned by the food database
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// "g" or "ml", when the database knows the serving basis
    #[serde(default)]
    pub serving_quantity_unit: Option<String>,
    #[serde(default)]
    pub nutriments: RawNutrients,
}

/// Response envelope: status 1 means found, 0 means unknown barcode
#[derive(Debug, Deserialize)]
struct LookupEnvelope {
    #[serde(default)]
    status: i64,
    product: Option<Product>,
}

/// Barcode to product resolution
pub trait FoodLookup: Send + Sync {
    fn lookup(&self, barcode: &str) -> Result<Product, LookupError>;
}

/// Open Food Facts HTTP client
pub struct OpenFoodFacts {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl OpenFoodFacts {
    /// Build a client against the public API, or against the URL in
    /// `CALTRACK_FOOD_API_URL` when set.
    pub fn new() -> Result<Self, LookupError> {
        let base_url = std::env::var("CALTRACK_FOOD_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl FoodLookup for OpenFoodFacts {
    fn lookup(&self, barcode: &str) -> Result<Product, LookupError> {
        let url = format!("{}/api/v0/product/{}.json", self.base_url, barcode);
        debug!("Looking up product {}", barcode);

        let envelope: LookupEnvelope = self.client.get(&url).send()?.json()?;

        if envelope.status != 1 {
            return Err(LookupError::NotFound(barcode.to_string()));
        }

        let mut product = envelope
            .product
            .ok_or_else(|| LookupError::Decode("status 1 without a product body".to_string()))?;

        if product.code.is_empty() {
            product.code = barcode.to_string();
        }

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::normalize;

    #[test]
    fn test_envelope_deserialization() {
        let body = r#"{
            "status": 1,
            "code": "8690504020104",
            "product": {
                "code": "8690504020104",
                "product_name": "Etimek Tam Buğday",
                "image_url": "https://images.example/etimek.jpg",
                "serving_quantity_unit": "g",
                "nutriments": {
                    "energy-kcal_100g": 380,
                    "proteins_100g": 12.0,
                    "carbohydrates_100g": 72.0,
                    "fat_100g": 4.5,
                    "fiber_100g": "5.1"
                }
            }
        }"#;

        let envelope: LookupEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.status, 1);

        let product = envelope.product.unwrap();
        assert_eq!(product.product_name.as_deref(), Some("Etimek Tam Buğday"));

        let n = normalize(&product.nutriments);
        assert_eq!(n.energy_kcal, 380.0);
        assert_eq!(n.fiber, 5.1);
        assert_eq!(n.sodium, 0.0);
    }

    #[test]
    fn test_not_found_envelope() {
        let body = r#"{"status": 0, "status_verbose": "product not found"}"#;
        let envelope: LookupEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.status, 0);
        assert!(envelope.product.is_none());
    }
}
