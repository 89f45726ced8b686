use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "trivia";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Path of the SQLite database file.
    pub database_path: String,
    /// The address to bind to.
    pub address: String,
    pub max_connections: u32,
    /// Answer `currentCategory` with a random category everywhere. When off,
    /// category listings report the requested category and the rest carry `null`.
    pub legacy_current_category: bool,
}

impl Settings {
    /// Defaults, then `trivia.toml` if present, then `TRIVIA_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::builder()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix("TRIVIA").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database_path", "trivia.db")?
            .set_default("address", "0.0.0.0:8080")?
            .set_default("max_connections", 5)?
            .set_default("legacy_current_category", true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize() {
        let settings: Settings = Settings::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.database_path, "trivia.db");
        assert_eq!(settings.address, "0.0.0.0:8080");
        assert_eq!(settings.max_connections, 5);
        assert!(settings.legacy_current_category);
    }

    #[test]
    fn sources_override_defaults() {
        let settings: Settings = Settings::builder()
            .unwrap()
            .set_override("address", "127.0.0.1:5000")
            .unwrap()
            .set_override("legacy_current_category", false)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.address, "127.0.0.1:5000");
        assert!(!settings.legacy_current_category);
    }
}
