//! Calorie target and macro allocation
//!
//! Turns TDEE into a floored daily calorie target, then splits it into
//! protein, fat and carbohydrate grams. Protein is sized per pound of body
//! weight, fat as a share of calories with a floor, and carbs take whatever
//! is left.

use super::answers::{GoalType, OnboardingAnswers, Pace, SexAtBirth};
use super::targets::{MacroGrams, MacroPercents};
use super::units::weight_lb;

pub const KCAL_PER_G_PROTEIN: i64 = 4;
pub const KCAL_PER_G_CARBS: i64 = 4;
pub const KCAL_PER_G_FAT: i64 = 9;

/// Lowest calorie target handed out, by sex
pub const MALE_CALORIE_FLOOR: i64 = 1500;
pub const FEMALE_CALORIE_FLOOR: i64 = 1200;

/// Reported protein never drops below this
pub const DISPLAY_PROTEIN_FLOOR_G: i64 = 50;

/// Absolute fat floor in grams
pub const MIN_FAT_G: i64 = 35;
/// Fat floor relative to body weight, grams per pound
pub const FAT_FLOOR_G_PER_LB: f64 = 0.25;

/// Share of the cutting deficit applied as a surplus when gaining
const SURPLUS_FACTOR: f64 = 0.5;

/// Calorie target plus its macro split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroAllocation {
    pub calories: i64,
    pub macros: MacroGrams,
    pub macro_percents: MacroPercents,
}

/// Grams of protein per pound of body weight
pub fn protein_g_per_lb(goal: GoalType) -> f64 {
    match goal {
        GoalType::FatLoss => 0.85,
        GoalType::BuildMuscle => 0.80,
        GoalType::GetStronger => 0.75,
        GoalType::ImproveHealth | GoalType::Maintain | GoalType::Unrecognized => 0.70,
    }
}

/// Fraction of calories assigned to fat before the floor
pub fn fat_share(goal: GoalType) -> f64 {
    match goal {
        GoalType::FatLoss => 0.25,
        GoalType::BuildMuscle | GoalType::GetStronger => 0.27,
        GoalType::ImproveHealth | GoalType::Maintain | GoalType::Unrecognized => 0.30,
    }
}

pub fn calorie_floor(sex: SexAtBirth) -> i64 {
    match sex {
        SexAtBirth::Male => MALE_CALORIE_FLOOR,
        SexAtBirth::Female => FEMALE_CALORIE_FLOOR,
    }
}

/// Minimum fat grams for a body weight in pounds
pub fn fat_floor_g(weight_lb: f64) -> i64 {
    ((FAT_FLOOR_G_PER_LB * weight_lb).round() as i64).max(MIN_FAT_G)
}

/// Daily calorie target from TDEE
///
/// Without a goal weight the target is maintenance. Gaining adds half the
/// pace adjustment, anything else subtracts the full adjustment. The sex
/// floor is applied last.
pub fn calorie_target(
    tdee: i64,
    sex: SexAtBirth,
    pace: Pace,
    has_goal_weight: bool,
    is_gaining: bool,
) -> i64 {
    let adjustment = pace.daily_adjustment_kcal();

    let calories = if !has_goal_weight {
        tdee
    } else if is_gaining {
        tdee.saturating_add((adjustment as f64 * SURPLUS_FACTOR).round() as i64)
    } else {
        tdee.saturating_sub(adjustment)
    };

    calories.max(calorie_floor(sex))
}

/// Calories left for carbs, saturating for absurd body weights
fn remaining_kcal(calories: i64, protein_g: i64, fat_g: i64) -> i64 {
    calories
        .saturating_sub(protein_g.saturating_mul(KCAL_PER_G_PROTEIN))
        .saturating_sub(fat_g.saturating_mul(KCAL_PER_G_FAT))
}

fn carbs_from_remaining(remaining: i64) -> i64 {
    (remaining.max(0) as f64 / KCAL_PER_G_CARBS as f64).round() as i64
}

/// Split a calorie target into macro grams and percentages
///
/// Carbs take the remainder after protein and fat. If that remainder is
/// negative, fat drops back to its floor and carbs are recomputed; protein is
/// never cut. The 50 g protein floor only affects the reported grams and the
/// percentages, not the carb balancing.
pub fn split_macros(calories: i64, weight_lb: f64, goal: GoalType) -> (MacroGrams, MacroPercents) {
    let protein_g = (weight_lb * protein_g_per_lb(goal)).round() as i64;
    let fat_floor = fat_floor_g(weight_lb);
    let mut fat_g =
        ((calories as f64 * fat_share(goal) / KCAL_PER_G_FAT as f64).round() as i64).max(fat_floor);

    let mut remaining = remaining_kcal(calories, protein_g, fat_g);
    let mut carbs_g = carbs_from_remaining(remaining);

    if remaining < 0 {
        tracing::debug!(
            calories,
            protein_g,
            fat_g,
            remaining,
            "Protein and fat exceed calorie target, falling back to fat floor"
        );
        fat_g = fat_floor;
        remaining = remaining_kcal(calories, protein_g, fat_g);
        carbs_g = carbs_from_remaining(remaining);
    }

    let display_protein = protein_g.max(DISPLAY_PROTEIN_FLOOR_G);

    let protein_kcal = display_protein as f64 * KCAL_PER_G_PROTEIN as f64;
    let carbs_kcal = carbs_g as f64 * KCAL_PER_G_CARBS as f64;
    let fat_kcal = fat_g as f64 * KCAL_PER_G_FAT as f64;
    let total = protein_kcal + carbs_kcal + fat_kcal;

    let percent = |kcal: f64| (kcal / total * 100.0).round() as i64;

    (
        MacroGrams {
            protein: display_protein,
            carbs: carbs_g,
            fat: fat_g,
        },
        MacroPercents {
            protein: percent(protein_kcal),
            carbs: percent(carbs_kcal),
            fat: percent(fat_kcal),
        },
    )
}

/// Calorie target and macro split for an answer snapshot
pub fn allocate(tdee: i64, answers: &OnboardingAnswers) -> MacroAllocation {
    let calories = calorie_target(
        tdee,
        answers.sex_at_birth,
        answers.pace,
        answers.has_goal_weight,
        answers.is_gaining(),
    );
    let weight_lb = weight_lb(answers.current_weight, answers.units_system);
    let (macros, macro_percents) = split_macros(calories, weight_lb, answers.goal_type);

    MacroAllocation {
        calories,
        macros,
        macro_percents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maintenance_without_goal_weight() {
        assert_eq!(calorie_target(2448, SexAtBirth::Male, Pace::Aggressive, false, false), 2448);
    }

    #[test]
    fn test_deficit_by_pace() {
        assert_eq!(calorie_target(2448, SexAtBirth::Male, Pace::Gentle, true, false), 2198);
        assert_eq!(calorie_target(2448, SexAtBirth::Male, Pace::Standard, true, false), 2048);
        assert_eq!(calorie_target(2448, SexAtBirth::Male, Pace::Aggressive, true, false), 1898);
    }

    #[test]
    fn test_surplus_is_halved() {
        assert_eq!(calorie_target(2448, SexAtBirth::Male, Pace::Gentle, true, true), 2573);
        assert_eq!(calorie_target(2448, SexAtBirth::Male, Pace::Standard, true, true), 2648);
        assert_eq!(calorie_target(2448, SexAtBirth::Male, Pace::Aggressive, true, true), 2723);
    }

    #[test]
    fn test_floor_applied_after_adjustment() {
        // 1600 - 400 = 1200 would be under the male floor
        assert_eq!(calorie_target(1600, SexAtBirth::Male, Pace::Standard, true, false), 1500);
        // Female floor is lower
        assert_eq!(calorie_target(1600, SexAtBirth::Female, Pace::Standard, true, false), 1200);
        // Surplus on top of a sub-floor TDEE still lands on the floor
        assert_eq!(calorie_target(1100, SexAtBirth::Female, Pace::Standard, true, true), 1300);
        assert_eq!(calorie_target(900, SexAtBirth::Female, Pace::Standard, true, true), 1200);
    }

    #[test]
    fn test_ratios_by_goal() {
        assert_eq!(protein_g_per_lb(GoalType::FatLoss), 0.85);
        assert_eq!(protein_g_per_lb(GoalType::Unrecognized), 0.70);
        assert_eq!(fat_share(GoalType::GetStronger), 0.27);
        assert_eq!(fat_share(GoalType::Unrecognized), 0.30);
    }

    #[test]
    fn test_fat_floor() {
        assert_eq!(fat_floor_g(176.3696), 44);
        assert_eq!(fat_floor_g(100.0), MIN_FAT_G);
    }

    #[test]
    fn test_reference_split() {
        let (macros, percents) = split_macros(2048, 80.0 * 2.20462, GoalType::FatLoss);
        assert_eq!(macros.protein, 150);
        assert_eq!(macros.fat, 57);
        assert_eq!(macros.carbs, 234);
        assert_eq!(percents.protein, 29);
        assert_eq!(percents.carbs, 46);
        assert_eq!(percents.fat, 25);
    }

    #[test]
    fn test_fat_floor_wins_over_share() {
        // 1200 * 0.30 / 9 = 40g, floor is 0.25 * 200 = 50g
        let (macros, _) = split_macros(1200, 200.0, GoalType::Maintain);
        assert_eq!(macros.fat, 50);
    }

    #[test]
    fn test_negative_remainder_uses_fat_floor() {
        // 255g protein (1020 kcal) plus the 75g fat floor (675 kcal) overshoot 1200
        let (macros, percents) = split_macros(1200, 300.0, GoalType::FatLoss);
        assert_eq!(macros.protein, 255);
        assert_eq!(macros.fat, fat_floor_g(300.0));
        assert_eq!(macros.carbs, 0);
        assert!(percents.total() >= 97 && percents.total() <= 103);
    }

    #[test]
    fn test_huge_weight_does_not_overflow() {
        let (macros, percents) = split_macros(i64::MAX, 1.0e19, GoalType::FatLoss);
        assert_eq!(macros.carbs, 0);
        assert_eq!(macros.fat, fat_floor_g(1.0e19));
        assert!((97..=103).contains(&percents.total()));

        assert_eq!(calorie_target(i64::MAX, SexAtBirth::Male, Pace::Gentle, true, true), i64::MAX);
        assert_eq!(calorie_target(i64::MIN, SexAtBirth::Female, Pace::Gentle, true, false), 1200);
    }

    #[test]
    fn test_display_protein_floor_quirk() {
        // Known quirk: 0.70 * 60 lb = 42g is balanced as 42g but reported as 50g
        let (macros, percents) = split_macros(1500, 60.0, GoalType::Maintain);
        assert_eq!(macros.protein, DISPLAY_PROTEIN_FLOOR_G);
        assert_eq!(macros.fat, 50);
        // Carbs come from 1500 - 42*4 - 50*9 = 882, not from the floored protein
        assert_eq!(macros.carbs, 221);
        assert_eq!(percents.protein, 13);
    }

    #[test]
    fn test_percentages_within_tolerance() {
        for calories in [1200, 1500, 1777, 2048, 2601, 3333] {
            for weight in [95.0, 140.0, 176.4, 230.0] {
                let (macros, percents) = split_macros(calories, weight, GoalType::BuildMuscle);
                assert!(macros.carbs >= 0);
                let total = percents.total();
                assert!((97..=103).contains(&total), "total {} for {} kcal", total, calories);
            }
        }
    }
}
