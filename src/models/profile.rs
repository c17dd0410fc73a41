//! Profile model
//!
//! One row per user: the onboarding answer snapshot plus the targets last
//! computed from it.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::nutrition::{
    GoalType, MacroGrams, NutritionTargets, OnboardingAnswers, Pace, SexAtBirth, UnitsSystem,
};

/// Targets as persisted on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTargets {
    pub calories: i64,
    pub macros: MacroGrams,
}

/// A user's profile record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user_id: String,
    pub answers: OnboardingAnswers,
    pub targets: Option<StoredTargets>,
    pub goals_configured: bool,
    pub computed_targets_enabled: bool,
    /// Answers were edited after the stored targets were computed
    pub targets_stale: bool,
    pub targets_updated_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Read a text column through a strict parser, rejecting unknown values
fn parse_text_column<T>(
    row: &Row,
    column: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let text: String = row.get(column)?;
    match parse(&text) {
        Some(value) => Ok(value),
        None => Err(rusqlite::Error::FromSqlConversionFailure(
            row.as_ref().column_index(column)?,
            Type::Text,
            format!("invalid {} '{}'", column, text).into(),
        )),
    }
}

impl Profile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let goal_str: String = row.get("goal_type")?;
        let pace_str: String = row.get("pace")?;

        let answers = OnboardingAnswers {
            sex_at_birth: parse_text_column(row, "sex_at_birth", SexAtBirth::from_str)?,
            height_value: row.get("height_value")?,
            current_weight: row.get("current_weight")?,
            birth_year: row.get("birth_year")?,
            birth_month: row.get("birth_month")?,
            goal_type: GoalType::from_str(&goal_str),
            pace: Pace::from_str(&pace_str),
            units_system: parse_text_column(row, "units_system", UnitsSystem::from_str)?,
            goal_weight: row.get("goal_weight")?,
            has_goal_weight: row.get("has_goal_weight")?,
            activity_multiplier: row.get("activity_multiplier")?,
            exercise_bump: row.get("exercise_bump")?,
        };

        let calories: Option<i64> = row.get("target_calories")?;
        let protein: Option<i64> = row.get("target_protein")?;
        let carbs: Option<i64> = row.get("target_carbs")?;
        let fat: Option<i64> = row.get("target_fat")?;

        let targets = match (calories, protein, carbs, fat) {
            (Some(calories), Some(protein), Some(carbs), Some(fat)) => Some(StoredTargets {
                calories,
                macros: MacroGrams {
                    protein,
                    carbs,
                    fat,
                },
            }),
            _ => None,
        };

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            answers,
            targets,
            goals_configured: row.get("goals_configured")?,
            computed_targets_enabled: row.get("computed_targets_enabled")?,
            targets_stale: row.get("targets_stale")?,
            targets_updated_at: row.get("targets_updated_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Store the onboarding answers for a user (upsert)
    ///
    /// Previously persisted targets are left alone until the next
    /// [`Profile::save_targets`]. Saving answers that differ from the stored
    /// ones marks existing targets stale.
    pub fn save_answers(
        conn: &Connection,
        user_id: &str,
        answers: &OnboardingAnswers,
    ) -> DbResult<Self> {
        let targets_stale = match Self::get_by_user(conn, user_id)? {
            Some(existing) => {
                existing.targets.is_some()
                    && (existing.targets_stale || existing.answers != *answers)
            }
            None => false,
        };

        conn.execute(
            r#"
            INSERT INTO profiles (
                user_id, sex_at_birth, height_value, current_weight, birth_year, birth_month,
                goal_type, pace, units_system, goal_weight, has_goal_weight,
                activity_multiplier, exercise_bump, targets_stale
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(user_id) DO UPDATE SET
                sex_at_birth = excluded.sex_at_birth,
                height_value = excluded.height_value,
                current_weight = excluded.current_weight,
                birth_year = excluded.birth_year,
                birth_month = excluded.birth_month,
                goal_type = excluded.goal_type,
                pace = excluded.pace,
                units_system = excluded.units_system,
                goal_weight = excluded.goal_weight,
                has_goal_weight = excluded.has_goal_weight,
                activity_multiplier = excluded.activity_multiplier,
                exercise_bump = excluded.exercise_bump,
                targets_stale = excluded.targets_stale,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                answers.sex_at_birth.as_str(),
                answers.height_value,
                answers.current_weight,
                answers.birth_year,
                answers.birth_month,
                answers.goal_type.as_str(),
                answers.pace.as_str(),
                answers.units_system.as_str(),
                answers.goal_weight,
                answers.has_goal_weight,
                answers.activity_multiplier,
                answers.exercise_bump,
                targets_stale,
            ],
        )?;

        Self::get_by_user(conn, user_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a profile by user ID
    pub fn get_by_user(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all profiles ordered by user ID
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles ORDER BY user_id")?;
        let profiles = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(profiles)
    }

    /// Persist computed targets and mark the goals as configured
    ///
    /// Replaces whatever targets were stored before. Returns `None` if the
    /// user has no profile.
    pub fn save_targets(
        conn: &Connection,
        user_id: &str,
        targets: &NutritionTargets,
    ) -> DbResult<Option<Self>> {
        let rows = conn.execute(
            r#"
            UPDATE profiles SET
                target_calories = ?1,
                target_protein = ?2,
                target_carbs = ?3,
                target_fat = ?4,
                goals_configured = 1,
                computed_targets_enabled = 1,
                targets_stale = 0,
                targets_updated_at = datetime('now'),
                updated_at = datetime('now')
            WHERE user_id = ?5
            "#,
            params![
                targets.calories,
                targets.macros.protein,
                targets.macros.carbs,
                targets.macros.fat,
                user_id,
            ],
        )?;

        if rows == 0 {
            return Ok(None);
        }

        Self::get_by_user(conn, user_id)
    }

    /// Delete a profile
    pub fn delete(conn: &Connection, user_id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM profiles WHERE user_id = ?1", [user_id])?;
        Ok(rows > 0)
    }
}
