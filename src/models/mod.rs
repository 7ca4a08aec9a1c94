//! Data models
//!
//! Rust structs representing database entities.

mod favorite;
mod meal;
mod profile;
mod scan;
mod water;

pub use favorite::Favorite;
pub use meal::{Meal, MealCreate, PortionUnit};
pub use profile::{ActivityLevel, Goal, Profile, ProfileUpdate, Sex};
pub use scan::ScanRecord;
pub use water::WaterEntry;
