use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Only two
/// options are recognized — the store location and the CSV corpus path.
pub struct Config {
    /// SQLite database file (STORYKEEP_DB_PATH, defaults to ./storykeep.db)
    pub db_path: String,
    /// CSV corpus of stories (STORYKEEP_CSV_PATH, defaults to ./stories.csv)
    pub csv_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Both options have defaults, so loading never fails today; the
    /// Result return keeps the call sites stable if validation grows.
    pub fn load() -> Result<Self> {
        Ok(Self {
            db_path: env::var("STORYKEEP_DB_PATH").unwrap_or_else(|_| "./storykeep.db".to_string()),
            csv_path: env::var("STORYKEEP_CSV_PATH")
                .unwrap_or_else(|_| "./stories.csv".to_string()),
        })
    }
}
