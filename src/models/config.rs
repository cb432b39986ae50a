//! Configuration model loaded from external sources.

use serde::Deserialize;

/// Public location of the free-exercise-db catalog.
pub const DEFAULT_EXERCISE_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/yuhonas/free-exercise-db/main/dist/exercises.json";

fn default_exercise_catalog_url() -> String {
    DEFAULT_EXERCISE_CATALOG_URL.to_string()
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// Key material for signing flash-message cookies (at least 64 bytes).
    pub secret: String,
    #[serde(default = "default_exercise_catalog_url")]
    pub exercise_catalog_url: String,
}
