//! Daily energy budget calculator
//!
//! Mifflin-St Jeor resting energy expenditure scaled by an activity
//! multiplier, then adjusted for the user's goal and split into macro
//! gram targets.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Goal, Profile, Sex};

#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("profile is missing {0}")]
    IncompleteProfile(&'static str),
}

/// Goal-adjusted daily targets
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MacroTargets {
    pub calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

/// Maintenance calories for a profile: Mifflin-St Jeor BMR times the
/// activity multiplier, rounded to a whole kcal.
///
/// Age is the plain year difference, ignoring whether the birthday has
/// passed this year. Every biometric field must be set; the goal is
/// deliberately not an input here.
pub fn compute_daily_calories(profile: &Profile, today: NaiveDate) -> Result<i64, BudgetError> {
    let weight = profile
        .weight_kg
        .ok_or(BudgetError::IncompleteProfile("weight_kg"))?;
    let height = profile
        .height_cm
        .ok_or(BudgetError::IncompleteProfile("height_cm"))?;
    let dob = profile
        .date_of_birth
        .ok_or(BudgetError::IncompleteProfile("date_of_birth"))?;
    let sex = profile.sex.ok_or(BudgetError::IncompleteProfile("sex"))?;
    let activity = profile
        .activity_level
        .ok_or(BudgetError::IncompleteProfile("activity_level"))?;

    let age = i64::from(today.year() - dob.year());

    let bmr = 10.0 * weight + 6.25 * height - 5.0 * age as f64
        + match sex {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        };

    Ok((bmr * activity.multiplier()).round() as i64)
}

/// Full daily budget for a profile: maintenance calories, the goal
/// adjustment, and the macro split.
pub fn compute_budget(profile: &Profile, today: NaiveDate) -> Result<MacroTargets, BudgetError> {
    let base = compute_daily_calories(profile, today)?;
    Ok(budget_for(base, profile.goal))
}

/// Apply the goal adjustment and macro split to maintenance calories.
///
/// Percentages per goal (protein/carbs/fat):
/// lose_weight 35/35/30, gain_muscle 30/55/15, maintain 20/50/30.
/// Protein and carbs carry 4 kcal per gram, fat 9.
pub fn budget_for(base_calories: i64, goal: Goal) -> MacroTargets {
    let (adjust, protein_pct, carbs_pct, fat_pct) = match goal {
        Goal::LoseWeight => (-300, 35.0, 35.0, 30.0),
        Goal::GainMuscle => (300, 30.0, 55.0, 15.0),
        Goal::Maintain => (0, 20.0, 50.0, 30.0),
    };

    let calories = base_calories + adjust;
    let kcal = calories as f64;

    MacroTargets {
        calories,
        protein_g: (kcal * protein_pct / 100.0 / 4.0).round() as i64,
        carbs_g: (kcal * carbs_pct / 100.0 / 4.0).round() as i64,
        fat_g: (kcal * fat_pct / 100.0 / 9.0).round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityLevel;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn full_profile() -> Profile {
        Profile {
            id: 1,
            weight_kg: Some(80.0),
            height_cm: Some(180.0),
            date_of_birth: Some(date("1996-06-15")),
            sex: Some(Sex::Male),
            activity_level: Some(ActivityLevel::Moderate),
            goal: Goal::Maintain,
            daily_calorie_goal: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_male_moderate_maintenance() {
        // BMR = 800 + 1125 - 150 + 5 = 1780; 1780 * 1.55 = 2759
        let calories = compute_daily_calories(&full_profile(), date("2026-08-29")).unwrap();
        assert_eq!(calories, 2759);
    }

    #[test]
    fn test_female_sedentary_maintenance() {
        let profile = Profile {
            weight_kg: Some(60.0),
            height_cm: Some(165.0),
            date_of_birth: Some(date("2001-03-10")),
            sex: Some(Sex::Female),
            activity_level: Some(ActivityLevel::Sedentary),
            ..full_profile()
        };
        // BMR = 600 + 1031.25 - 125 - 161 = 1345.25; * 1.2 = 1614.3
        let calories = compute_daily_calories(&profile, date("2026-08-29")).unwrap();
        assert_eq!(calories, 1614);
    }

    #[test]
    fn test_age_is_plain_year_difference() {
        let mut profile = full_profile();
        profile.date_of_birth = Some(date("2000-12-31"));
        // Born Dec 31 2000, computed Jan 1 2026: treated as 26, not 25
        let early = compute_daily_calories(&profile, date("2026-01-01")).unwrap();
        let late = compute_daily_calories(&profile, date("2026-12-31")).unwrap();
        assert_eq!(early, late);
    }

    #[test]
    fn test_missing_fields_are_incomplete() {
        for strip in 0..5 {
            let mut profile = full_profile();
            match strip {
                0 => profile.weight_kg = None,
                1 => profile.height_cm = None,
                2 => profile.date_of_birth = None,
                3 => profile.sex = None,
                _ => profile.activity_level = None,
            }
            assert!(matches!(
                compute_daily_calories(&profile, date("2026-08-29")),
                Err(BudgetError::IncompleteProfile(_))
            ));
        }
    }

    #[test]
    fn test_maintain_split_1979() {
        let targets = budget_for(1979, Goal::Maintain);
        assert_eq!(targets.calories, 1979);
        assert_eq!(targets.protein_g, 99);
        assert_eq!(targets.carbs_g, 247);
        assert_eq!(targets.fat_g, 66);
    }

    #[test]
    fn test_lose_weight_split_from_1979_base() {
        let targets = budget_for(1979, Goal::LoseWeight);
        assert_eq!(targets.calories, 1679);
        assert_eq!(targets.protein_g, 147);
        assert_eq!(targets.carbs_g, 147);
        assert_eq!(targets.fat_g, 56);
    }

    #[test]
    fn test_gain_muscle_split() {
        let targets = budget_for(2000, Goal::GainMuscle);
        assert_eq!(targets.calories, 2300);
        assert_eq!(targets.protein_g, 173); // 2300 * 0.30 / 4 = 172.5
        assert_eq!(targets.carbs_g, 316); // 2300 * 0.55 / 4 = 316.25
        assert_eq!(targets.fat_g, 38); // 2300 * 0.15 / 9 = 38.33
    }

    #[test]
    fn test_goal_calorie_ordering() {
        let base = 2400;
        let lose = budget_for(base, Goal::LoseWeight);
        let keep = budget_for(base, Goal::Maintain);
        let gain = budget_for(base, Goal::GainMuscle);
        assert!(lose.calories < keep.calories);
        assert!(keep.calories < gain.calories);
    }

    #[test]
    fn test_energy_identity_within_rounding() {
        for base in [1400, 1979, 2759] {
            for goal in [Goal::LoseWeight, Goal::Maintain, Goal::GainMuscle] {
                let t = budget_for(base, goal);
                let from_macros = t.protein_g * 4 + t.carbs_g * 4 + t.fat_g * 9;
                assert!(
                    (from_macros - t.calories).abs() <= 3,
                    "base {base} goal {goal:?}: {from_macros} vs {}",
                    t.calories
                );
            }
        }
    }
}
