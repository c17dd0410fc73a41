//! Macroplan Status Tool
//!
//! Provides runtime status information about the service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Target workflow instructions for AI assistants
pub const TARGETS_INSTRUCTIONS: &str = r#"
# Macroplan Target Instructions

Macroplan turns a user's onboarding answers into a daily calorie budget and a
protein / carbs / fat split, plus an optional date for reaching a goal weight.

## Workflow

1. `save_onboarding_answers` with the user's answers (see fields below).
2. `preview_targets` to show the result. Nothing is saved yet.
3. Show calories, macro grams, macro percentages and the goal date to the user.
4. If they confirm, call `apply_targets`. This saves calories and macros on the
   profile and turns on `goals_configured` and `computed_targets_enabled`.
5. If they want to change an answer, go back to step 1. Applying again fully
   replaces the old targets.

## Answer Fields

| Field | Values |
|-------|--------|
| sex_at_birth | male, female |
| units_system | metric (cm, kg) or imperial (total inches, lb) |
| height_value | cm, or TOTAL inches (5'10" = 70) |
| current_weight | kg or lb, matching units_system |
| birth_year, birth_month | e.g. 1990, 6 |
| goal_type | fat_loss, build_muscle, get_stronger, improve_health, maintain |
| pace | gentle, standard, aggressive |
| has_goal_weight, goal_weight | goal in the same unit as current_weight |
| activity_multiplier | lifestyle factor, default 1.375 |
| exercise_bump | added for exercise frequency, default 0 |

Unknown goal types use the default ratios and unknown paces use standard.

## What to Expect

- Calories never go below 1500 (male) or 1200 (female).
- Activity multiplier plus exercise bump is capped at 1.70.
- Protein is at least 50 g; fat is at least 35 g or 0.25 g per lb.
- Percentages are rounded separately and can add up to 99 or 101.
- No goal weight, or a goal equal to the current weight, means maintenance
  calories and no goal date.
"#;

/// Service status information
#[derive(Debug, Serialize)]
pub struct MacroplanStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks service start time for uptime reporting
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> MacroplanStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        MacroplanStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
