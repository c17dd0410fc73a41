//! Recompute stored targets from saved onboarding answers
//! Usage: cargo run --bin recalculate_targets -- [user_id]

use macroplan::models::Profile;
use macroplan::{config, db, nutrition};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let user_filter = std::env::args().nth(1);

    let db_path = config::database_path();
    println!("Database: {}", db_path.display());

    let database = db::Database::new(&db_path)?;
    let today = chrono::Local::now().date_naive();

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;

        let profiles: Vec<Profile> = match user_filter.as_deref() {
            Some(user_id) => Profile::get_by_user(conn, user_id)?.into_iter().collect(),
            None => Profile::list(conn)?,
        };

        if profiles.is_empty() {
            println!("No profiles found");
            return Ok(());
        }

        for profile in &profiles {
            let old_calories = profile.targets.map(|t| t.calories);
            let targets = nutrition::calculate_targets(&profile.answers, today);
            Profile::save_targets(conn, &profile.user_id, &targets)?;

            println!("\nProfile: {}", profile.user_id);
            match old_calories {
                Some(old) => println!("  Calories: {} -> {}", old, targets.calories),
                None => println!("  Calories: (none) -> {}", targets.calories),
            }
            println!(
                "  Macros: {}g protein / {}g carbs / {}g fat",
                targets.macros.protein, targets.macros.carbs, targets.macros.fat
            );
            if let Some(goal_date) = targets.goal_date {
                println!("  Goal date: {}", goal_date);
            }
        }

        println!("\nRecalculated {} profile(s)", profiles.len());
        Ok(())
    })?;

    Ok(())
}
