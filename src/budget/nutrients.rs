//! Nutrient normalization
//!
//! Upstream food databases report nutrients under irregular keys with
//! holes: fields may be absent, null, or numeric strings. `RawNutrients`
//! absorbs that shape at the deserialization boundary and `normalize`
//! turns it into a total `NutrientsPer100` where every field is a
//! finite number.

use serde::{Deserialize, Deserializer, Serialize};

/// Per-100 nutrient facts as reported by the food database, before
/// normalization. Missing or malformed values read as 0.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNutrients {
    #[serde(rename = "energy-kcal_100g", default, deserialize_with = "lenient_f64")]
    pub energy_kcal: f64,
    #[serde(rename = "proteins_100g", default, deserialize_with = "lenient_f64")]
    pub proteins: f64,
    #[serde(rename = "carbohydrates_100g", default, deserialize_with = "lenient_f64")]
    pub carbohydrates: f64,
    #[serde(rename = "fat_100g", default, deserialize_with = "lenient_f64")]
    pub fat: f64,
    #[serde(rename = "fiber_100g", default, deserialize_with = "lenient_f64")]
    pub fiber: f64,
    #[serde(rename = "sugars_100g", default, deserialize_with = "lenient_f64")]
    pub sugars: f64,
    #[serde(rename = "sodium_100g", default, deserialize_with = "lenient_f64")]
    pub sodium: f64,
    #[serde(rename = "saturated-fat_100g", default, deserialize_with = "lenient_f64")]
    pub saturated_fat: f64,
}

/// Accept a number, a numeric string, or anything else (as 0)
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Normalized nutrient facts per 100 g or 100 ml of product.
///
/// Every field is present and finite. This is the only nutrient shape
/// the rest of the crate works with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientsPer100 {
    pub energy_kcal: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugars: f64,
    pub sodium: f64,
    pub saturated_fat: f64,
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Normalize raw upstream nutrient facts into a total record
pub fn normalize(raw: &RawNutrients) -> NutrientsPer100 {
    NutrientsPer100 {
        energy_kcal: finite_or_zero(raw.energy_kcal),
        protein: finite_or_zero(raw.proteins),
        carbohydrates: finite_or_zero(raw.carbohydrates),
        fat: finite_or_zero(raw.fat),
        fiber: finite_or_zero(raw.fiber),
        sugars: finite_or_zero(raw.sugars),
        sodium: finite_or_zero(raw.sodium),
        saturated_fat: finite_or_zero(raw.saturated_fat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let raw: RawNutrients = serde_json::from_str(r#"{"proteins_100g": 12.5}"#).unwrap();
        let n = normalize(&raw);
        assert_eq!(n.protein, 12.5);
        assert_eq!(n.energy_kcal, 0.0);
        assert_eq!(n.sodium, 0.0);
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let raw: RawNutrients = serde_json::from_str(
            r#"{"energy-kcal_100g": "389", "fat_100g": "6.9", "sugars_100g": "n/a"}"#,
        )
        .unwrap();
        let n = normalize(&raw);
        assert_eq!(n.energy_kcal, 389.0);
        assert_eq!(n.fat, 6.9);
        assert_eq!(n.sugars, 0.0);
    }

    #[test]
    fn test_null_reads_as_zero() {
        let raw: RawNutrients =
            serde_json::from_str(r#"{"carbohydrates_100g": null}"#).unwrap();
        assert_eq!(normalize(&raw).carbohydrates, 0.0);
    }

    #[test]
    fn test_non_finite_sanitized() {
        let raw = RawNutrients {
            energy_kcal: f64::NAN,
            fat: f64::INFINITY,
            ..Default::default()
        };
        let n = normalize(&raw);
        assert_eq!(n.energy_kcal, 0.0);
        assert_eq!(n.fat, 0.0);
    }

    #[test]
    fn test_full_product_nutriments() {
        let raw: RawNutrients = serde_json::from_str(
            r#"{
                "energy-kcal_100g": 389,
                "proteins_100g": 16.9,
                "carbohydrates_100g": 66.3,
                "fat_100g": 6.9,
                "fiber_100g": 10.6,
                "sugars_100g": 0.99,
                "sodium_100g": 0.002,
                "saturated-fat_100g": 1.2
            }"#,
        )
        .unwrap();
        let n = normalize(&raw);
        assert_eq!(n.energy_kcal, 389.0);
        assert_eq!(n.fiber, 10.6);
        assert_eq!(n.saturated_fat, 1.2);
    }
}
