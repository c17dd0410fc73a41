//! Computed nutrition targets
//!
//! The output record of the engine, the only thing written to a profile.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily macro targets in grams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroGrams {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

/// Share of macro calories per nutrient, each rounded on its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPercents {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl MacroPercents {
    /// May land on 99 or 101 because of the independent roundings
    pub fn total(&self) -> i64 {
        self.protein + self.carbs + self.fat
    }
}

/// Calorie budget, macro split and optional goal date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories: i64,
    pub macros: MacroGrams,
    pub macro_percents: MacroPercents,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_date: Option<NaiveDate>,
}
