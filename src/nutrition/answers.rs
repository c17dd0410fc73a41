//! Onboarding answer snapshot
//!
//! The read-only input record the target engine is computed from.

use serde::{Deserialize, Serialize};

/// Baseline lifestyle activity factor used when none was collected
pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.375;

/// Sex at birth, selects the BMR branch and the calorie floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SexAtBirth {
    Male,
    Female,
}

impl SexAtBirth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SexAtBirth::Male => "male",
            SexAtBirth::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(SexAtBirth::Male),
            "female" | "f" => Some(SexAtBirth::Female),
            _ => None,
        }
    }
}

/// Stated goal, selects the macro ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    FatLoss,
    BuildMuscle,
    GetStronger,
    ImproveHealth,
    Maintain,
    /// Anything the form sent that we don't know; uses the default ratios
    #[default]
    #[serde(other)]
    Unrecognized,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::FatLoss => "fat_loss",
            GoalType::BuildMuscle => "build_muscle",
            GoalType::GetStronger => "get_stronger",
            GoalType::ImproveHealth => "improve_health",
            GoalType::Maintain => "maintain",
            GoalType::Unrecognized => "unrecognized",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fat_loss" => GoalType::FatLoss,
            "build_muscle" => GoalType::BuildMuscle,
            "get_stronger" => GoalType::GetStronger,
            "improve_health" => GoalType::ImproveHealth,
            "maintain" => GoalType::Maintain,
            "unrecognized" => GoalType::Unrecognized,
            other => {
                tracing::warn!("Unrecognized goal type '{}', using default macro ratios", other);
                GoalType::Unrecognized
            }
        }
    }
}

/// Rate of progress toward a weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Gentle,
    Aggressive,
    #[default]
    #[serde(other)]
    Standard,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Gentle => "gentle",
            Pace::Standard => "standard",
            Pace::Aggressive => "aggressive",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "gentle" => Pace::Gentle,
            "standard" => Pace::Standard,
            "aggressive" => Pace::Aggressive,
            other => {
                tracing::warn!("Unrecognized pace '{}', using standard", other);
                Pace::Standard
            }
        }
    }

    /// Daily kcal adjustment magnitude
    pub fn daily_adjustment_kcal(&self) -> i64 {
        match self {
            Pace::Gentle => 250,
            Pace::Standard => 400,
            Pace::Aggressive => 550,
        }
    }

    /// Weight change per week, in whatever unit the weights were entered in
    pub fn weekly_rate(&self) -> f64 {
        match self {
            Pace::Gentle => 0.5,
            Pace::Standard => 0.8,
            Pace::Aggressive => 1.1,
        }
    }
}

/// Measurement system the height and weights were entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitsSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitsSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitsSystem::Metric => "metric",
            UnitsSystem::Imperial => "imperial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Some(UnitsSystem::Metric),
            "imperial" => Some(UnitsSystem::Imperial),
            _ => None,
        }
    }
}

fn default_activity_multiplier() -> f64 {
    DEFAULT_ACTIVITY_MULTIPLIER
}

/// Snapshot of onboarding answers
///
/// Height is cm (metric) or total inches (imperial). Both weights share the
/// unit of `units_system`. Values are assumed validated by the form that
/// collected them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingAnswers {
    pub sex_at_birth: SexAtBirth,
    pub height_value: f64,
    pub current_weight: f64,
    pub birth_year: i32,
    pub birth_month: u32,
    #[serde(default)]
    pub goal_type: GoalType,
    #[serde(default)]
    pub pace: Pace,
    #[serde(default)]
    pub units_system: UnitsSystem,
    #[serde(default)]
    pub goal_weight: f64,
    #[serde(default)]
    pub has_goal_weight: bool,
    #[serde(default = "default_activity_multiplier")]
    pub activity_multiplier: f64,
    #[serde(default)]
    pub exercise_bump: f64,
}

impl OnboardingAnswers {
    /// A goal weight was supplied and differs from the current weight
    pub fn has_distinct_goal(&self) -> bool {
        self.has_goal_weight && self.goal_weight != self.current_weight
    }

    /// Goal weight set and above the current weight
    pub fn is_gaining(&self) -> bool {
        self.has_goal_weight && self.goal_weight > self.current_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_type_from_str() {
        assert_eq!(GoalType::from_str("fat_loss"), GoalType::FatLoss);
        assert_eq!(GoalType::from_str("Build-Muscle"), GoalType::BuildMuscle);
        assert_eq!(GoalType::from_str("yoga"), GoalType::Unrecognized);
    }

    #[test]
    fn test_pace_falls_back_to_standard() {
        assert_eq!(Pace::from_str("aggressive"), Pace::Aggressive);
        assert_eq!(Pace::from_str("turbo"), Pace::Standard);
        assert_eq!(Pace::from_str("turbo").daily_adjustment_kcal(), 400);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "sex_at_birth": "female",
            "height_value": 165.0,
            "current_weight": 60.0,
            "birth_year": 1990,
            "birth_month": 4
        }"#;
        let answers: OnboardingAnswers = serde_json::from_str(json).unwrap();
        assert_eq!(answers.activity_multiplier, DEFAULT_ACTIVITY_MULTIPLIER);
        assert_eq!(answers.exercise_bump, 0.0);
        assert_eq!(answers.pace, Pace::Standard);
        assert_eq!(answers.units_system, UnitsSystem::Metric);
        assert!(!answers.has_goal_weight);
    }

    #[test]
    fn test_deserialize_unknown_enum_values() {
        let json = r#"{
            "sex_at_birth": "male",
            "height_value": 70.0,
            "current_weight": 180.0,
            "birth_year": 1985,
            "birth_month": 1,
            "goal_type": "run_marathon",
            "pace": "ludicrous",
            "units_system": "imperial"
        }"#;
        let answers: OnboardingAnswers = serde_json::from_str(json).unwrap();
        assert_eq!(answers.goal_type, GoalType::Unrecognized);
        assert_eq!(answers.pace, Pace::Standard);
        assert_eq!(answers.units_system, UnitsSystem::Imperial);
    }

    #[test]
    fn test_goal_direction() {
        let json = r#"{
            "sex_at_birth": "male",
            "height_value": 180.0,
            "current_weight": 80.0,
            "birth_year": 1996,
            "birth_month": 1,
            "goal_weight": 85.0,
            "has_goal_weight": true
        }"#;
        let mut answers: OnboardingAnswers = serde_json::from_str(json).unwrap();
        assert!(answers.is_gaining());
        assert!(answers.has_distinct_goal());

        answers.goal_weight = 80.0;
        assert!(!answers.is_gaining());
        assert!(!answers.has_distinct_goal());

        answers.goal_weight = 90.0;
        answers.has_goal_weight = false;
        assert!(!answers.is_gaining());
    }
}
