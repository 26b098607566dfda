use std::path::PathBuf;

use directories::ProjectDirs;

pub const SCORE_FILE_NAME: &str = "scores.json";

/// Score table under the platform data directory, if the platform has one.
pub fn default_score_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "Crawler").map(|dirs| dirs.data_dir().join(SCORE_FILE_NAME))
}

/// An explicit path wins over the platform default.
pub fn resolve_score_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(default_score_path)
}
