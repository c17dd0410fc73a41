//! Runtime configuration
//!
//! Everything is read from the environment.

use std::path::{Path, PathBuf};

/// Overrides the SQLite database location
pub const DATABASE_PATH_ENV: &str = "MACROPLAN_DATABASE_PATH";

/// Log directive used when `RUST_LOG` doesn't mention this crate
pub const DEFAULT_LOG_DIRECTIVE: &str = "macroplan=info";

const DATABASE_FILE: &str = "macroplan.db";

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));
            default_database_path(&exe_dir)
        })
}

/// `<project root>/data/macroplan.db`, stepping out of `target/{debug,release}`
pub fn default_database_path(exe_dir: &Path) -> PathBuf {
    let mut path = exe_dir.to_path_buf();

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push(DATABASE_FILE);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_leaves_target_dir() {
        let path = default_database_path(Path::new("/work/macroplan/target/release"));
        assert_eq!(path, PathBuf::from("/work/macroplan/data/macroplan.db"));
    }

    #[test]
    fn test_default_path_next_to_installed_binary() {
        let path = default_database_path(Path::new("/opt/macroplan/bin"));
        assert_eq!(path, PathBuf::from("/opt/macroplan/bin/data/macroplan.db"));
    }
}
