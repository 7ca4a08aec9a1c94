//! Energy and macro budget engine
//!
//! Pure functions only: normalization of upstream nutrient facts,
//! portion scaling, the daily budget calculation, and day progress
//! reconciliation. Persistence and transport live elsewhere.

pub mod calculator;
pub mod nutrients;
pub mod portion;
pub mod progress;

pub use calculator::{budget_for, compute_budget, compute_daily_calories, BudgetError, MacroTargets};
pub use nutrients::{normalize, NutrientsPer100, RawNutrients};
pub use portion::{scale, PortionError, ScaledNutrients};
pub use progress::{consumed_totals, reconcile, Progress, Remaining, Totals};
