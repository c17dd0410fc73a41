//! Goal date projection
//!
//! Estimates when a weight goal is reached at the weekly rate implied by the
//! chosen pace. Whole weeks only.

use chrono::{Days, NaiveDate};

use super::answers::OnboardingAnswers;

/// Number of whole weeks to cover `weight_diff` at `weekly_rate`
pub fn weeks_to_goal(weight_diff: f64, weekly_rate: f64) -> u64 {
    (weight_diff / weekly_rate).ceil() as u64
}

/// Projected date the goal weight is reached
///
/// `None` without a goal weight, when the goal equals the current weight, or
/// when the date falls outside the representable calendar.
pub fn project_goal_date(answers: &OnboardingAnswers, today: NaiveDate) -> Option<NaiveDate> {
    if !answers.has_distinct_goal() {
        return None;
    }

    let weight_diff = (answers.goal_weight - answers.current_weight).abs();
    let weeks = weeks_to_goal(weight_diff, answers.pace.weekly_rate());

    let goal_date = weeks
        .checked_mul(7)
        .and_then(|days| today.checked_add_days(Days::new(days)));

    if goal_date.is_none() {
        tracing::warn!(weeks, "Goal date out of calendar range, skipping projection");
    }

    goal_date
}
