//! Macroplan MCP Server Implementation
//!
//! Implements the MCP server with all target tools.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::nutrition::{
    GoalType, OnboardingAnswers, Pace, SexAtBirth, UnitsSystem, DEFAULT_ACTIVITY_MULTIPLIER,
};
use crate::tools::status::StatusTracker;
use crate::tools::targets;

/// Macroplan MCP Service
#[derive(Clone)]
pub struct MacroplanService {
    status_tracker: Arc<StatusTracker>,
    database: Database,
    tool_router: ToolRouter<MacroplanService>,
}

impl MacroplanService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(database_path)),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(user_id: &str) -> McpError {
    McpError::invalid_params(format!("Profile not found: {}", user_id), None)
}

/// Resolve the calculation date, defaulting to the local calendar day
fn resolve_date(as_of: Option<&str>) -> Result<NaiveDate, McpError> {
    match as_of {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
            McpError::invalid_params(format!("Invalid as_of date '{}': {}", s, e), None)
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnswersParams {
    /// male or female
    pub sex_at_birth: String,
    /// Height in cm (metric) or TOTAL inches (imperial)
    pub height_value: f64,
    /// Current weight in kg (metric) or lb (imperial)
    pub current_weight: f64,
    /// Birth year, e.g. 1990
    pub birth_year: i32,
    /// Birth month, 1-12
    pub birth_month: u32,
    /// fat_loss, build_muscle, get_stronger, improve_health, maintain
    #[serde(default = "default_goal_type")]
    pub goal_type: String,
    /// gentle, standard, aggressive (default standard)
    #[serde(default = "default_pace")]
    pub pace: String,
    /// metric or imperial (default metric)
    #[serde(default = "default_units")]
    pub units_system: String,
    /// Goal weight in the same unit as current_weight
    pub goal_weight: Option<f64>,
    /// Lifestyle activity factor (default 1.375)
    #[serde(default = "default_activity_multiplier")]
    pub activity_multiplier: f64,
    /// Added to the activity factor for exercise frequency (default 0)
    #[serde(default)]
    pub exercise_bump: f64,
}

fn default_goal_type() -> String { "maintain".to_string() }
fn default_pace() -> String { "standard".to_string() }
fn default_units() -> String { "metric".to_string() }
fn default_activity_multiplier() -> f64 { DEFAULT_ACTIVITY_MULTIPLIER }

impl AnswersParams {
    fn into_answers(self) -> Result<OnboardingAnswers, McpError> {
        let sex_at_birth = SexAtBirth::from_str(&self.sex_at_birth).ok_or_else(|| {
            McpError::invalid_params(
                format!("Invalid sex_at_birth '{}': expected male or female", self.sex_at_birth),
                None,
            )
        })?;
        let units_system = UnitsSystem::from_str(&self.units_system).ok_or_else(|| {
            McpError::invalid_params(
                format!("Invalid units_system '{}': expected metric or imperial", self.units_system),
                None,
            )
        })?;

        Ok(OnboardingAnswers {
            sex_at_birth,
            height_value: self.height_value,
            current_weight: self.current_weight,
            birth_year: self.birth_year,
            birth_month: self.birth_month,
            goal_type: GoalType::from_str(&self.goal_type),
            pace: Pace::from_str(&self.pace),
            units_system,
            goal_weight: self.goal_weight.unwrap_or(0.0),
            has_goal_weight: self.goal_weight.is_some(),
            activity_multiplier: self.activity_multiplier,
            exercise_bump: self.exercise_bump,
        })
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveAnswersParams {
    /// User the answers belong to
    pub user_id: String,
    #[serde(flatten)]
    pub answers: AnswersParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateTargetsParams {
    #[serde(flatten)]
    pub answers: AnswersParams,
    /// Calculation date YYYY-MM-DD (default today)
    pub as_of: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserTargetsParams {
    /// User ID
    pub user_id: String,
    /// Calculation date YYYY-MM-DD (default today)
    pub as_of: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserParams {
    /// User ID
    pub user_id: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MacroplanService {
    // --- Status ---

    #[tool(description = "Get the current status of the Macroplan service including build info, database status, and process information")]
    fn macroplan_status(&self) -> Result<CallToolResult, McpError> {
        to_json(&self.status_tracker.get_status())
    }

    #[tool(description = "Get step-by-step instructions for computing and saving nutrition targets. Call this before starting an onboarding session.")]
    fn targets_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::TARGETS_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(TARGETS_INSTRUCTIONS)]))
    }

    // --- Answers ---

    #[tool(description = "Save (or replace) a user's onboarding answers. Previously applied targets stay until apply_targets is called again.")]
    fn save_onboarding_answers(&self, Parameters(p): Parameters<SaveAnswersParams>) -> Result<CallToolResult, McpError> {
        let answers = p.answers.into_answers()?;
        let result = targets::save_onboarding_answers(&self.database, &p.user_id, &answers)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Targets ---

    #[tool(description = "Calculate calories, macros and goal date from answers given inline. Nothing is stored.")]
    fn calculate_targets(&self, Parameters(p): Parameters<CalculateTargetsParams>) -> Result<CallToolResult, McpError> {
        let today = resolve_date(p.as_of.as_deref())?;
        let answers = p.answers.into_answers()?;
        to_json(&targets::preview_answers(&answers, None, today))
    }

    #[tool(description = "Preview the targets computed from a user's saved answers, with BMR and TDEE breakdown. Nothing is stored.")]
    fn preview_targets(&self, Parameters(p): Parameters<UserTargetsParams>) -> Result<CallToolResult, McpError> {
        let today = resolve_date(p.as_of.as_deref())?;
        let result = targets::preview_targets(&self.database, &p.user_id, today)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(preview) => to_json(&preview),
            None => Err(not_found(&p.user_id)),
        }
    }

    #[tool(description = "Compute targets from a user's saved answers and save calories and macros to the profile. Replaces any earlier targets.")]
    fn apply_targets(&self, Parameters(p): Parameters<UserTargetsParams>) -> Result<CallToolResult, McpError> {
        let today = resolve_date(p.as_of.as_deref())?;
        let result = targets::apply_targets(&self.database, &p.user_id, today)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(applied) => to_json(&applied),
            None => Err(not_found(&p.user_id)),
        }
    }

    // --- Profiles ---

    #[tool(description = "Get a user's profile: saved answers, stored targets and goal flags")]
    fn get_profile(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let result = targets::get_profile(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => to_json(&profile),
            None => Err(not_found(&p.user_id)),
        }
    }

    #[tool(description = "List all profiles with their stored targets")]
    fn list_profiles(&self) -> Result<CallToolResult, McpError> {
        let result = targets::list_profiles(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a user's profile including answers and targets")]
    fn delete_profile(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let result = targets::delete_profile(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for MacroplanService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "macroplan".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Macroplan".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Macroplan - daily calorie and macro targets from onboarding answers. \
                 IMPORTANT: Call targets_instructions first. \
                 Answers: save_onboarding_answers. \
                 Targets: calculate_targets (inline, stateless), preview_targets, apply_targets. \
                 Profiles: get_profile, list_profiles, delete_profile. \
                 Status: macroplan_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(json: serde_json::Value) -> AnswersParams {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_answers_params_defaults() {
        let answers = params(serde_json::json!({
            "sex_at_birth": "female",
            "height_value": 165.0,
            "current_weight": 60.0,
            "birth_year": 1990,
            "birth_month": 4
        }))
        .into_answers()
        .unwrap();

        assert_eq!(answers.goal_type, GoalType::Maintain);
        assert_eq!(answers.pace, Pace::Standard);
        assert_eq!(answers.units_system, UnitsSystem::Metric);
        assert!(!answers.has_goal_weight);
        assert_eq!(answers.activity_multiplier, DEFAULT_ACTIVITY_MULTIPLIER);
    }

    #[test]
    fn test_goal_weight_sets_flag() {
        let answers = params(serde_json::json!({
            "sex_at_birth": "male",
            "height_value": 70.0,
            "current_weight": 180.0,
            "birth_year": 1985,
            "birth_month": 2,
            "units_system": "imperial",
            "goal_weight": 170.0
        }))
        .into_answers()
        .unwrap();

        assert!(answers.has_goal_weight);
        assert_eq!(answers.goal_weight, 170.0);
        assert_eq!(answers.units_system, UnitsSystem::Imperial);
    }

    #[test]
    fn test_invalid_sex_rejected() {
        let result = params(serde_json::json!({
            "sex_at_birth": "unknown",
            "height_value": 170.0,
            "current_weight": 70.0,
            "birth_year": 1990,
            "birth_month": 1
        }))
        .into_answers();
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_date() {
        assert_eq!(
            resolve_date(Some("2026-10-18")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        );
        assert!(resolve_date(Some("18/10/2026")).is_err());
        assert!(resolve_date(None).is_ok());
    }

    #[test]
    fn test_unknown_user_is_invalid_params() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn)).unwrap();
        let service = MacroplanService::new(PathBuf::from(":memory:"), db);

        let err = service
            .get_profile(Parameters(UserParams {
                user_id: "nobody".to_string(),
            }))
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("nobody"));

        let err = service
            .apply_targets(Parameters(UserTargetsParams {
                user_id: "nobody".to_string(),
                as_of: Some("2026-10-18".to_string()),
            }))
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let err = service
            .preview_targets(Parameters(UserTargetsParams {
                user_id: "nobody".to_string(),
                as_of: None,
            }))
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_save_params_flatten() {
        let p: SaveAnswersParams = serde_json::from_value(serde_json::json!({
            "user_id": "u1",
            "sex_at_birth": "male",
            "height_value": 180.0,
            "current_weight": 80.0,
            "birth_year": 1996,
            "birth_month": 5,
            "goal_type": "fat_loss"
        }))
        .unwrap();
        assert_eq!(p.user_id, "u1");
        assert_eq!(p.answers.into_answers().unwrap().goal_type, GoalType::FatLoss);
    }
}
