//! Macroplan Tools module
//!
//! MCP tool implementations for onboarding targets.

pub mod status;
pub mod targets;
