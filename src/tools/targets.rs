//! Onboarding target MCP tools
//!
//! Store answer snapshots, preview the computed targets and persist them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::{Profile, StoredTargets};
use crate::nutrition::{
    self, EnergyEstimate, NormalizedBody, NutritionTargets, OnboardingAnswers,
};

/// Response for save_onboarding_answers
#[derive(Debug, Serialize)]
pub struct SaveAnswersResponse {
    pub user_id: String,
    pub created: bool,
    pub answers: OnboardingAnswers,
    /// Targets on file still come from the previous answers until applied again
    pub targets_stale: bool,
}

/// Computed targets shown for confirmation, nothing persisted
#[derive(Debug, Serialize)]
pub struct TargetPreview {
    pub user_id: Option<String>,
    pub computed_on: NaiveDate,
    pub body: NormalizedBody,
    pub energy: EnergyEstimate,
    pub targets: NutritionTargets,
    pub percent_total: i64,
}

/// Response for apply_targets
#[derive(Debug, Serialize)]
pub struct ApplyTargetsResponse {
    pub user_id: String,
    pub targets: NutritionTargets,
    pub goals_configured: bool,
    pub computed_targets_enabled: bool,
    pub targets_updated_at: Option<String>,
}

/// Profile summary for listing
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub user_id: String,
    pub goal_type: String,
    pub units_system: String,
    pub targets: Option<StoredTargets>,
    pub goals_configured: bool,
    pub targets_stale: bool,
    pub updated_at: String,
}

/// Response for list_profiles
#[derive(Debug, Serialize)]
pub struct ListProfilesResponse {
    pub profiles: Vec<ProfileSummary>,
    pub total: usize,
}

/// Response for delete_profile
#[derive(Debug, Serialize)]
pub struct DeleteProfileResponse {
    pub user_id: String,
    pub deleted: bool,
}

// ============================================================================
// Answer Tools
// ============================================================================

/// Store (or replace) the onboarding answers for a user
pub fn save_onboarding_answers(
    db: &Database,
    user_id: &str,
    answers: &OnboardingAnswers,
) -> Result<SaveAnswersResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let existing = Profile::get_by_user(&conn, user_id)
        .map_err(|e| format!("Failed to check profile: {}", e))?;

    let profile = Profile::save_answers(&conn, user_id, answers)
        .map_err(|e| format!("Failed to save answers: {}", e))?;

    tracing::info!(user_id, created = existing.is_none(), "Saved onboarding answers");

    Ok(SaveAnswersResponse {
        user_id: profile.user_id,
        created: existing.is_none(),
        targets_stale: profile.targets_stale,
        answers: profile.answers,
    })
}

// ============================================================================
// Target Tools
// ============================================================================

/// Compute targets for an answer snapshot without touching storage
pub fn preview_answers(
    answers: &OnboardingAnswers,
    user_id: Option<String>,
    today: NaiveDate,
) -> TargetPreview {
    let calc = nutrition::calculate(answers, today);

    TargetPreview {
        user_id,
        computed_on: today,
        percent_total: calc.targets.macro_percents.total(),
        body: calc.body,
        energy: calc.energy,
        targets: calc.targets,
    }
}

/// Compute targets from a user's stored answers without persisting them
pub fn preview_targets(
    db: &Database,
    user_id: &str,
    today: NaiveDate,
) -> Result<Option<TargetPreview>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::get_by_user(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;

    Ok(profile.map(|p| preview_answers(&p.answers, Some(p.user_id), today)))
}

/// Compute targets from a user's stored answers and persist them
///
/// Nothing is written if the computation can't be stored; the caller sees the
/// storage error and the computed result is dropped.
pub fn apply_targets(
    db: &Database,
    user_id: &str,
    today: NaiveDate,
) -> Result<Option<ApplyTargetsResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = match Profile::get_by_user(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
    {
        Some(p) => p,
        None => return Ok(None),
    };

    let targets = nutrition::calculate_targets(&profile.answers, today);

    let saved = Profile::save_targets(&conn, user_id, &targets)
        .map_err(|e| format!("Failed to save targets: {}", e))?;

    Ok(saved.map(|p| {
        tracing::info!(
            user_id,
            calories = targets.calories,
            protein = targets.macros.protein,
            carbs = targets.macros.carbs,
            fat = targets.macros.fat,
            "Applied nutrition targets"
        );
        ApplyTargetsResponse {
            user_id: p.user_id,
            targets,
            goals_configured: p.goals_configured,
            computed_targets_enabled: p.computed_targets_enabled,
            targets_updated_at: p.targets_updated_at,
        }
    }))
}

// ============================================================================
// Profile Tools
// ============================================================================

pub fn get_profile(db: &Database, user_id: &str) -> Result<Option<Profile>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Profile::get_by_user(&conn, user_id).map_err(|e| format!("Failed to get profile: {}", e))
}

pub fn list_profiles(db: &Database) -> Result<ListProfilesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profiles = Profile::list(&conn).map_err(|e| format!("Failed to list profiles: {}", e))?;

    let summaries: Vec<ProfileSummary> = profiles
        .into_iter()
        .map(|p| ProfileSummary {
            goal_type: p.answers.goal_type.as_str().to_string(),
            units_system: p.answers.units_system.as_str().to_string(),
            user_id: p.user_id,
            targets: p.targets,
            goals_configured: p.goals_configured,
            targets_stale: p.targets_stale,
            updated_at: p.updated_at,
        })
        .collect();

    Ok(ListProfilesResponse {
        total: summaries.len(),
        profiles: summaries,
    })
}

pub fn delete_profile(db: &Database, user_id: &str) -> Result<DeleteProfileResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted =
        Profile::delete(&conn, user_id).map_err(|e| format!("Failed to delete profile: {}", e))?;

    if deleted {
        tracing::info!(user_id, "Deleted profile");
    }

    Ok(DeleteProfileResponse {
        user_id: user_id.to_string(),
        deleted,
    })
}
