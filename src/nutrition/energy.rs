//! Energy expenditure estimation
//!
//! Mifflin-St Jeor BMR scaled by a clamped activity multiplier.
//!
//! Reference: Mifflin, M.D., et al. (1990). A new predictive equation for
//! resting energy expenditure. *American Journal of Clinical Nutrition*,
//! 51(2), 241-247.

use serde::Serialize;

use super::answers::SexAtBirth;
use super::units::NormalizedBody;

/// Hard ceiling on activity multiplier plus exercise bump
pub const MAX_ACTIVITY_MULTIPLIER: f64 = 1.70;

const MSJ_WEIGHT_COEF: f64 = 10.0;
const MSJ_HEIGHT_COEF: f64 = 6.25;
const MSJ_AGE_COEF: f64 = 5.0;
const MSJ_MALE_CONSTANT: f64 = 5.0;
const MSJ_FEMALE_CONSTANT: f64 = -161.0;

/// Breakdown of the expenditure estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyEstimate {
    pub bmr: f64,
    pub effective_multiplier: f64,
    pub tdee: i64,
}

/// Basal metabolic rate in kcal/day
///
/// Formula: BMR = 10 x `weight_kg` + 6.25 x `height_cm` - 5 x age + s,
/// where s is +5 for males and -161 for females.
pub fn basal_metabolic_rate(body: &NormalizedBody, sex: SexAtBirth) -> f64 {
    let constant = match sex {
        SexAtBirth::Male => MSJ_MALE_CONSTANT,
        SexAtBirth::Female => MSJ_FEMALE_CONSTANT,
    };

    MSJ_WEIGHT_COEF * body.weight_kg + MSJ_HEIGHT_COEF * body.height_cm
        - MSJ_AGE_COEF * f64::from(body.age)
        + constant
}

/// Baseline activity plus exercise bump, capped at [`MAX_ACTIVITY_MULTIPLIER`]
pub fn effective_multiplier(activity_multiplier: f64, exercise_bump: f64) -> f64 {
    (activity_multiplier + exercise_bump).min(MAX_ACTIVITY_MULTIPLIER)
}

/// Estimate BMR and total daily energy expenditure
pub fn estimate(
    body: &NormalizedBody,
    sex: SexAtBirth,
    activity_multiplier: f64,
    exercise_bump: f64,
) -> EnergyEstimate {
    let bmr = basal_metabolic_rate(body, sex);
    let effective_multiplier = effective_multiplier(activity_multiplier, exercise_bump);
    let tdee = (bmr * effective_multiplier).round() as i64;

    tracing::debug!(bmr, effective_multiplier, tdee, "Estimated energy expenditure");

    EnergyEstimate {
        bmr,
        effective_multiplier,
        tdee,
    }
}
