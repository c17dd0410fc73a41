//! Macroplan Library
//!
//! Nutrition target engine for onboarding plus the profile store and MCP
//! surface around it.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
