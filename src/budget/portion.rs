//! Portion scaling
//!
//! Scales per-100 nutrient facts to an actual consumed portion.

use serde::Serialize;
use thiserror::Error;

use crate::models::PortionUnit;

use super::nutrients::NutrientsPer100;

#[derive(Debug, Error)]
pub enum PortionError {
    #[error("invalid portion quantity: {0}")]
    InvalidPortion(f64),
}

/// Nutrients for a concrete consumed portion.
///
/// Calories are rounded to a whole kcal at scaling time; macro grams
/// keep full precision so that day totals do not accumulate rounding
/// drift.
#[derive(Debug, Clone, Serialize)]
pub struct ScaledNutrients {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub quantity: f64,
    pub unit: PortionUnit,
}

/// Scale per-100 facts to a portion of `quantity` grams or millilitres.
///
/// The quantity must be finite and strictly positive.
pub fn scale(
    per100: &NutrientsPer100,
    quantity: f64,
    unit: PortionUnit,
) -> Result<ScaledNutrients, PortionError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(PortionError::InvalidPortion(quantity));
    }

    let factor = quantity / 100.0;
    Ok(ScaledNutrients {
        calories: (per100.energy_kcal * factor).round() as i64,
        protein: per100.protein * factor,
        carbs: per100.carbohydrates * factor,
        fat: per100.fat * factor,
        quantity,
        unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per100(kcal: f64, protein: f64, carbs: f64, fat: f64) -> NutrientsPer100 {
        NutrientsPer100 {
            energy_kcal: kcal,
            protein,
            carbohydrates: carbs,
            fat,
            ..Default::default()
        }
    }

    #[test]
    fn test_250g_of_50_kcal_product() {
        let scaled = scale(&per100(50.0, 4.0, 8.0, 1.0), 250.0, PortionUnit::G).unwrap();
        assert_eq!(scaled.calories, 125);
        assert_eq!(scaled.protein, 10.0);
        assert_eq!(scaled.carbs, 20.0);
        assert_eq!(scaled.fat, 2.5);
    }

    #[test]
    fn test_identity_at_100() {
        let scaled = scale(&per100(389.0, 16.9, 66.3, 6.9), 100.0, PortionUnit::G).unwrap();
        assert_eq!(scaled.calories, 389);
        assert_eq!(scaled.protein, 16.9);
        assert_eq!(scaled.carbs, 66.3);
        assert_eq!(scaled.fat, 6.9);
    }

    #[test]
    fn test_calories_round_half_up() {
        // 30g of 365 kcal/100g = 109.5 kcal
        let scaled = scale(&per100(365.0, 0.0, 0.0, 0.0), 30.0, PortionUnit::G).unwrap();
        assert_eq!(scaled.calories, 110);
    }

    #[test]
    fn test_macros_keep_full_precision() {
        let scaled = scale(&per100(0.0, 16.9, 0.0, 0.0), 30.0, PortionUnit::G).unwrap();
        assert!((scaled.protein - 5.07).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_portions_rejected() {
        let facts = per100(100.0, 1.0, 1.0, 1.0);
        assert!(scale(&facts, 0.0, PortionUnit::G).is_err());
        assert!(scale(&facts, -50.0, PortionUnit::Ml).is_err());
        assert!(scale(&facts, f64::NAN, PortionUnit::G).is_err());
        assert!(scale(&facts, f64::INFINITY, PortionUnit::G).is_err());
    }
}
