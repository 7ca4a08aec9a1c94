//! MCP tool implementations

pub mod favorites;
pub mod meals;
pub mod profile;
pub mod status;
pub mod water;
