//! Nutrition target engine
//!
//! Normalizes onboarding answers, estimates energy expenditure, allocates a
//! calorie target into macros and projects a goal date. Every stage is a pure
//! function; [`calculate_targets`] runs them in order.

pub mod answers;
pub mod energy;
pub mod macros;
pub mod projection;
pub mod targets;
pub mod units;

use chrono::NaiveDate;
use serde::Serialize;

pub use answers::{
    GoalType, OnboardingAnswers, Pace, SexAtBirth, UnitsSystem, DEFAULT_ACTIVITY_MULTIPLIER,
};
pub use energy::{EnergyEstimate, MAX_ACTIVITY_MULTIPLIER};
pub use targets::{MacroGrams, MacroPercents, NutritionTargets};
pub use units::NormalizedBody;

/// Targets together with the intermediate values that produced them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetCalculation {
    pub body: NormalizedBody,
    pub energy: EnergyEstimate,
    pub targets: NutritionTargets,
}

/// Run the full pipeline, keeping the intermediate stages
pub fn calculate(answers: &OnboardingAnswers, today: NaiveDate) -> TargetCalculation {
    let body = units::normalize(answers, today);
    let energy = energy::estimate(
        &body,
        answers.sex_at_birth,
        answers.activity_multiplier,
        answers.exercise_bump,
    );
    let allocation = macros::allocate(energy.tdee, answers);
    let goal_date = projection::project_goal_date(answers, today);

    tracing::debug!(
        calories = allocation.calories,
        protein = allocation.macros.protein,
        carbs = allocation.macros.carbs,
        fat = allocation.macros.fat,
        ?goal_date,
        "Calculated nutrition targets"
    );

    TargetCalculation {
        body,
        energy,
        targets: NutritionTargets {
            calories: allocation.calories,
            macros: allocation.macros,
            macro_percents: allocation.macro_percents,
            goal_date,
        },
    }
}

/// Daily calorie and macro targets for an answer snapshot
pub fn calculate_targets(answers: &OnboardingAnswers, today: NaiveDate) -> NutritionTargets {
    calculate(answers, today).targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    /// Male, 30, 80 kg, 180 cm, cutting to 75 kg at standard pace
    fn reference_answers() -> OnboardingAnswers {
        OnboardingAnswers {
            sex_at_birth: SexAtBirth::Male,
            height_value: 180.0,
            current_weight: 80.0,
            birth_year: 1996,
            birth_month: 5,
            goal_type: GoalType::FatLoss,
            pace: Pace::Standard,
            units_system: UnitsSystem::Metric,
            goal_weight: 75.0,
            has_goal_weight: true,
            activity_multiplier: 1.375,
            exercise_bump: 0.0,
        }
    }

    fn assert_invariants(answers: &OnboardingAnswers, targets: &NutritionTargets) {
        let floor = macros::calorie_floor(answers.sex_at_birth);
        assert!(targets.calories >= floor);
        assert!(targets.macros.protein >= macros::DISPLAY_PROTEIN_FLOOR_G);
        let lb = units::weight_lb(answers.current_weight, answers.units_system);
        assert!(targets.macros.fat >= macros::fat_floor_g(lb));
        assert!(targets.macros.carbs >= 0);
        let total = targets.macro_percents.total();
        assert!((97..=103).contains(&total));
    }

    #[test]
    fn test_reference_scenario() {
        let calc = calculate(&reference_answers(), today());
        assert_eq!(calc.body.age, 30);
        assert!((calc.energy.bmr - 1780.0).abs() < 1e-9);
        assert_eq!(calc.energy.tdee, 2448);

        let targets = calc.targets;
        assert_eq!(targets.calories, 2048);
        assert_eq!(
            targets.macros,
            MacroGrams {
                protein: 150,
                carbs: 234,
                fat: 57
            }
        );
        assert_eq!(targets.goal_date, NaiveDate::from_ymd_opt(2026, 12, 6));
    }

    #[test]
    fn test_idempotent() {
        let answers = reference_answers();
        let first = calculate_targets(&answers, today());
        let second = calculate_targets(&answers, today());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_unit_invariance() {
        let metric = OnboardingAnswers {
            has_goal_weight: false,
            ..reference_answers()
        };
        let imperial = OnboardingAnswers {
            units_system: UnitsSystem::Imperial,
            current_weight: metric.current_weight / units::KG_PER_LB,
            height_value: metric.height_value / units::CM_PER_INCH,
            ..metric.clone()
        };

        let a = calculate_targets(&metric, today());
        let b = calculate_targets(&imperial, today());
        assert!((a.calories - b.calories).abs() <= 1);
    }

    #[test]
    fn test_maintenance_has_no_goal_date() {
        let answers = OnboardingAnswers {
            has_goal_weight: false,
            ..reference_answers()
        };
        let targets = calculate_targets(&answers, today());
        assert_eq!(targets.calories, 2448);
        assert_eq!(targets.goal_date, None);
    }

    #[test]
    fn test_female_floor() {
        let answers = OnboardingAnswers {
            sex_at_birth: SexAtBirth::Female,
            height_value: 150.0,
            current_weight: 45.0,
            birth_year: 1950,
            goal_weight: 40.0,
            pace: Pace::Aggressive,
            activity_multiplier: 1.2,
            ..reference_answers()
        };
        let targets = calculate_targets(&answers, today());
        assert_eq!(targets.calories, macros::FEMALE_CALORIE_FLOOR);
        assert_invariants(&answers, &targets);
    }

    #[test]
    fn test_absurd_weight_saturates() {
        let answers = OnboardingAnswers {
            units_system: UnitsSystem::Imperial,
            current_weight: 1.0e19,
            height_value: 70.0,
            ..reference_answers()
        };
        let targets = calculate_targets(&answers, today());
        assert_invariants(&answers, &targets);
        assert_eq!(targets.macros.carbs, 0);
        assert_eq!(targets.goal_date, None);
    }

    #[test]
    fn test_invariants_across_profiles() {
        let sexes = [SexAtBirth::Male, SexAtBirth::Female];
        let goals = [
            GoalType::FatLoss,
            GoalType::BuildMuscle,
            GoalType::GetStronger,
            GoalType::ImproveHealth,
            GoalType::Maintain,
            GoalType::Unrecognized,
        ];
        let paces = [Pace::Gentle, Pace::Standard, Pace::Aggressive];

        for sex in sexes {
            for goal in goals {
                for pace in paces {
                    for (weight, goal_weight) in [(45.0, 50.0), (80.0, 75.0), (140.0, 100.0)] {
                        let answers = OnboardingAnswers {
                            sex_at_birth: sex,
                            goal_type: goal,
                            pace,
                            current_weight: weight,
                            goal_weight,
                            exercise_bump: 0.2,
                            ..reference_answers()
                        };
                        let calc = calculate(&answers, today());
                        assert!(calc.energy.effective_multiplier <= MAX_ACTIVITY_MULTIPLIER);
                        assert_invariants(&answers, &calc.targets);
                    }
                }
            }
        }
    }
}
