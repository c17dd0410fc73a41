//! Unit and age normalization
//!
//! Converts entered measurements to a metric basis and derives integer age.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::answers::{OnboardingAnswers, UnitsSystem};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Pounds per kilogram
pub const LB_PER_KG: f64 = 2.20462;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Body measurements on a metric basis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedBody {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: i32,
}

/// Normalize the answer snapshot against `today`
pub fn normalize(answers: &OnboardingAnswers, today: NaiveDate) -> NormalizedBody {
    let (weight_kg, height_cm) = match answers.units_system {
        UnitsSystem::Imperial => (
            answers.current_weight * KG_PER_LB,
            answers.height_value * CM_PER_INCH,
        ),
        UnitsSystem::Metric => (answers.current_weight, answers.height_value),
    };

    NormalizedBody {
        weight_kg,
        height_cm,
        age: age_on(answers.birth_year, answers.birth_month, today),
    }
}

/// Whole years since birth, month precision only
///
/// The birthday counts as reached for the whole of its month.
pub fn age_on(birth_year: i32, birth_month: u32, today: NaiveDate) -> i32 {
    let mut age = today.year().saturating_sub(birth_year);
    if birth_month > today.month() {
        age = age.saturating_sub(1);
    }
    age
}

/// Current weight in pounds, the basis for protein and fat floors
pub fn weight_lb(current_weight: f64, units: UnitsSystem) -> f64 {
    match units {
        UnitsSystem::Imperial => current_weight,
        UnitsSystem::Metric => current_weight * LB_PER_KG,
    }
}
