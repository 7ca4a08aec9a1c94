//! Daily progress reconciliation
//!
//! Sums what was logged on a day and compares it against the budget.
//! This path never fails: malformed stored values read as zero, and
//! overconsumption shows up as negative remaining amounts.

use serde::Serialize;

use crate::models::Meal;

use super::calculator::MacroTargets;

/// Consumed totals for a set of meal entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Totals {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Remaining budget after consumption; negative when over budget
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Remaining {
    pub calories: i64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// A day's consumption reconciled against its targets
#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub target: MacroTargets,
    pub consumed: Totals,
    pub remaining: Remaining,
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Sum the consumed nutrients across meal entries
pub fn consumed_totals(meals: &[Meal]) -> Totals {
    meals.iter().fold(Totals::zero(), |acc, meal| Totals {
        calories: acc.calories + meal.calories,
        protein: acc.protein + finite_or_zero(meal.protein),
        carbs: acc.carbs + finite_or_zero(meal.carbs),
        fat: acc.fat + finite_or_zero(meal.fat),
    })
}

/// Reconcile a day's meal entries against its macro targets
pub fn reconcile(meals: &[Meal], target: MacroTargets) -> Progress {
    let consumed = consumed_totals(meals);
    let remaining = Remaining {
        calories: target.calories - consumed.calories,
        protein_g: target.protein_g as f64 - consumed.protein,
        carbs_g: target.carbs_g as f64 - consumed.carbs,
        fat_g: target.fat_g as f64 - consumed.fat,
    };
    Progress {
        target,
        consumed,
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PortionUnit;

    fn meal(calories: i64, protein: f64, carbs: f64, fat: f64) -> Meal {
        Meal {
            id: 0,
            food_name: "test".to_string(),
            calories,
            protein,
            carbs,
            fat,
            quantity: 100.0,
            unit: PortionUnit::G,
            eaten_at: String::new(),
            created_at: String::new(),
        }
    }

    fn targets() -> MacroTargets {
        MacroTargets {
            calories: 1979,
            protein_g: 99,
            carbs_g: 247,
            fat_g: 66,
        }
    }

    #[test]
    fn test_empty_day_leaves_full_budget() {
        let progress = reconcile(&[], targets());
        assert_eq!(progress.consumed, Totals::zero());
        assert_eq!(progress.remaining.calories, 1979);
        assert_eq!(progress.remaining.protein_g, 99.0);
    }

    #[test]
    fn test_consumption_is_summed() {
        let meals = vec![meal(400, 20.0, 50.0, 10.0), meal(600, 35.5, 60.0, 22.5)];
        let progress = reconcile(&meals, targets());
        assert_eq!(progress.consumed.calories, 1000);
        assert_eq!(progress.consumed.protein, 55.5);
        assert_eq!(progress.remaining.calories, 979);
        assert_eq!(progress.remaining.fat_g, 33.5);
    }

    #[test]
    fn test_overconsumption_goes_negative() {
        let meals = vec![meal(2500, 150.0, 300.0, 90.0)];
        let progress = reconcile(&meals, targets());
        assert_eq!(progress.remaining.calories, -521);
        assert!(progress.remaining.protein_g < 0.0);
        assert!(progress.remaining.fat_g < 0.0);
    }

    #[test]
    fn test_non_finite_stored_values_read_as_zero() {
        let meals = vec![meal(300, f64::NAN, f64::INFINITY, 5.0)];
        let progress = reconcile(&meals, targets());
        assert_eq!(progress.consumed.protein, 0.0);
        assert_eq!(progress.consumed.carbs, 0.0);
        assert_eq!(progress.consumed.fat, 5.0);
    }
}
