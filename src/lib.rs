//! Caltrack Library
//!
//! Core functionality for calorie and macro budget tracking.

pub mod budget;
pub mod build_info;
pub mod db;
pub mod lookup;
pub mod mcp;
pub mod models;
pub mod tools;
